//! Tests for the `create` application service.
//!
//! Verifies build-source selection, request shaping and that local staging
//! failures abort before anything reaches the remote service.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use anyhow::Result;
use cvd_core::application::ports::LocalImageStager;
use cvd_core::application::services::create::create_cvds;
use cvd_core::domain::{
    AndroidCiBuild, AndroidCiBuildSource, BuildError, BuildSource, CiBuilds, CreateCvdRequest,
    CreateOptions, Cvd, FetchArtifactsRequest, ImageSource,
};

use crate::mocks::{Call, FakeService, ROOT_URI, StaticStager, UnusedStager, remote};

fn main_build() -> AndroidCiBuild {
    AndroidCiBuild::new("aosp-main", "11525173", "aosp_cf_x86_64_phone-trunk_staging-userdebug")
}

fn ci_options(builds: CiBuilds, num_instances: u32) -> CreateOptions {
    CreateOptions {
        host: "h1".to_string(),
        source: ImageSource::AndroidCi(builds),
        num_instances,
    }
}

fn local_options(num_instances: u32) -> CreateOptions {
    CreateOptions {
        host: "h1".to_string(),
        source: ImageSource::LocalImage,
        num_instances,
    }
}

/// Stager that fails the way a stale host package does.
struct StaleStager;

impl LocalImageStager for StaleStager {
    async fn required_files(&self) -> Result<Vec<PathBuf>> {
        Err(BuildError::HostPackageStale(PathBuf::from("/ho/cvd-host_package.tar.gz")).into())
    }
}

// ── Android CI branch ────────────────────────────────────────────────────────

#[tokio::test]
async fn ci_create_fetches_main_bundle_then_creates() {
    let service = FakeService::new().with_created(vec![remote("cvd-1")]);
    let opts = ci_options(CiBuilds::main(main_build()), 1);

    let created = create_cvds(&service, &UnusedStager, &opts)
        .await
        .expect("create");

    assert_eq!(
        service.calls(),
        vec![
            Call::FetchArtifacts(
                "h1".to_string(),
                FetchArtifactsRequest::main_bundle(main_build())
            ),
            Call::CreateCvd(
                "h1".to_string(),
                CreateCvdRequest::new(
                    BuildSource::AndroidCi(AndroidCiBuildSource {
                        main_build: main_build(),
                        kernel_build: None,
                        bootloader_build: None,
                        system_image_build: None,
                    }),
                    0,
                )
            ),
        ]
    );
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].cvd, Cvd::new(ROOT_URI, "h1", "cvd-1"));
    assert_eq!(created[0].status, "Running");
    assert!(created[0].connection_status.is_none());
}

#[tokio::test]
async fn ci_create_sends_each_provided_slot() {
    let kernel = AndroidCiBuild::new("aosp-kernel-common", "8000", "kernel_virt_x86_64");
    let system = AndroidCiBuild::new("aosp-main", "9000", "aosp_x86_64-userdebug");
    let builds = CiBuilds::main(main_build())
        .with_kernel(kernel.clone())
        .with_bootloader(AndroidCiBuild::default())
        .with_system_image(system.clone());
    let service = FakeService::new().with_created(vec![remote("cvd-1")]);

    create_cvds(&service, &UnusedStager, &ci_options(builds, 3))
        .await
        .expect("create");

    let Some(Call::CreateCvd(_, request)) = service.calls().pop() else {
        panic!("expected a create call");
    };
    assert_eq!(request.additional_instances_num, 2);
    let BuildSource::AndroidCi(source) = request.cvd.build_source else {
        panic!("expected an android ci build source");
    };
    assert_eq!(source.kernel_build, Some(kernel));
    assert_eq!(source.bootloader_build, None);
    assert_eq!(source.system_image_build, Some(system));
}

#[tokio::test]
async fn ci_fetch_failure_skips_creation() {
    let service = FakeService::new().failing_fetch();

    let err = create_cvds(&service, &UnusedStager, &ci_options(CiBuilds::main(main_build()), 1))
        .await
        .expect_err("fetch fails");

    assert!(err.to_string().contains("failed to create instance"), "{err}");
    assert!(format!("{err:#}").contains("build not found"), "{err:#}");
    assert!(
        !service
            .calls()
            .iter()
            .any(|c| matches!(c, Call::CreateCvd(..)))
    );
}

#[tokio::test]
async fn create_failure_is_all_or_nothing() {
    let service = FakeService::new()
        .with_created(vec![remote("cvd-1"), remote("cvd-2")])
        .failing_create();

    let err = create_cvds(&service, &UnusedStager, &ci_options(CiBuilds::main(main_build()), 2))
        .await
        .expect_err("create fails");

    let chain = format!("{err:#}");
    assert!(chain.starts_with("failed to create instance"), "{chain}");
    assert!(chain.contains("create cvd on host \"h1\""), "{chain}");
}

// ── Local image branch ───────────────────────────────────────────────────────

#[tokio::test]
async fn local_create_uploads_staged_files_then_creates_from_upload_dir() {
    let files = vec![
        PathBuf::from("/po/boot.img"),
        PathBuf::from("/po/super.img"),
        PathBuf::from("/ho/cvd-host_package.tar.gz"),
    ];
    let service = FakeService::new().with_created(vec![remote("cvd-1"), remote("cvd-2")]);

    let created = create_cvds(&service, &StaticStager(files.clone()), &local_options(2))
        .await
        .expect("create");

    assert_eq!(
        service.calls(),
        vec![
            Call::CreateUpload("h1".to_string()),
            Call::UploadFiles {
                host: "h1".to_string(),
                upload_dir: "upload-1".to_string(),
                files,
            },
            Call::CreateCvd(
                "h1".to_string(),
                CreateCvdRequest::new(
                    BuildSource::UserArtifacts {
                        artifacts_dir: "upload-1".to_string(),
                    },
                    1,
                )
            ),
        ]
    );
    let names: Vec<_> = created.iter().map(|c| c.cvd.name.as_str()).collect();
    assert_eq!(names, vec!["cvd-1", "cvd-2"]);
    assert!(created.iter().all(|c| c.cvd.host == "h1"));
}

#[tokio::test]
async fn local_staging_failure_aborts_before_any_remote_call() {
    let service = FakeService::new().with_created(vec![remote("cvd-1")]);

    let err = create_cvds(&service, &StaleStager, &local_options(1))
        .await
        .expect_err("stale package");

    assert!(service.calls().is_empty(), "{:?}", service.calls());
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::HostPackageStale(_))
    ));
    assert!(format!("{err:#}").contains("out of date"), "{err:#}");
}

#[tokio::test]
async fn zero_instances_creates_exactly_one() {
    let service = FakeService::new().with_created(vec![remote("cvd-1")]);

    create_cvds(&service, &StaticStager(Vec::new()), &local_options(0))
        .await
        .expect("create");

    let Some(Call::CreateCvd(_, request)) = service.calls().pop() else {
        panic!("expected a create call");
    };
    assert_eq!(request.additional_instances_num, 0);
}
