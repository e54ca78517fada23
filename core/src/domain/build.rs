//! Build sources and the creation requests derived from them.
//!
//! Pure types only: choosing where images come from and shaping the request
//! that the host orchestrator receives.

use serde::{Deserialize, Serialize};

// ── CI build descriptors ─────────────────────────────────────────────────────

/// Coordinates of an Android CI build.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AndroidCiBuild {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,
}

impl AndroidCiBuild {
    #[must_use]
    pub fn new(branch: &str, build_id: &str, target: &str) -> Self {
        Self {
            branch: branch.to_string(),
            build_id: build_id.to_string(),
            target: target.to_string(),
        }
    }

    /// True when no coordinate is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branch.is_empty() && self.build_id.is_empty() && self.target.is_empty()
    }
}

/// CI builds for a single creation: a mandatory main build plus optional
/// replacements for individual image slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CiBuilds {
    pub main: AndroidCiBuild,
    pub kernel: Option<AndroidCiBuild>,
    pub bootloader: Option<AndroidCiBuild>,
    pub system_image: Option<AndroidCiBuild>,
}

impl CiBuilds {
    #[must_use]
    pub fn main(main: AndroidCiBuild) -> Self {
        Self {
            main,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kernel(mut self, build: AndroidCiBuild) -> Self {
        self.kernel = Some(build);
        self
    }

    #[must_use]
    pub fn with_bootloader(mut self, build: AndroidCiBuild) -> Self {
        self.bootloader = Some(build);
        self
    }

    #[must_use]
    pub fn with_system_image(mut self, build: AndroidCiBuild) -> Self {
        self.system_image = Some(build);
        self
    }
}

// ── Create options ───────────────────────────────────────────────────────────

/// Where the images for new instances come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Upload the images of the local Android build tree.
    LocalImage,
    /// Have the host fetch artifacts from Android CI.
    AndroidCi(CiBuilds),
}

/// Caller-facing options for creating instances on one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    pub host: String,
    pub source: ImageSource,
    /// Total instances to create; `0` and `1` both mean one.
    pub num_instances: u32,
}

impl CreateOptions {
    /// Extra instances requested on top of the first one.
    #[must_use]
    pub fn additional_instances_num(&self) -> u32 {
        self.num_instances.saturating_sub(1)
    }

    #[must_use]
    pub fn uses_local_image(&self) -> bool {
        matches!(self.source, ImageSource::LocalImage)
    }
}

// ── Orchestrator requests ────────────────────────────────────────────────────

/// CI build source sent to the host orchestrator. Slots left `None` are not
/// sent at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AndroidCiBuildSource {
    pub main_build: AndroidCiBuild,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_build: Option<AndroidCiBuild>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootloader_build: Option<AndroidCiBuild>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_image_build: Option<AndroidCiBuild>,
}

impl From<&CiBuilds> for AndroidCiBuildSource {
    /// Optional slots holding an empty descriptor are dropped, never sent as
    /// a request for an unidentified build.
    fn from(builds: &CiBuilds) -> Self {
        let provided = |slot: &Option<AndroidCiBuild>| slot.clone().filter(|b| !b.is_empty());
        Self {
            main_build: builds.main.clone(),
            kernel_build: provided(&builds.kernel),
            bootloader_build: provided(&builds.bootloader),
            system_image_build: provided(&builds.system_image),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BuildSource {
    #[serde(rename = "user_build_source")]
    UserArtifacts { artifacts_dir: String },
    #[serde(rename = "android_ci_build_source")]
    AndroidCi(AndroidCiBuildSource),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CvdSpec {
    pub build_source: BuildSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCvdRequest {
    pub cvd: CvdSpec,
    pub additional_instances_num: u32,
}

impl CreateCvdRequest {
    #[must_use]
    pub fn new(build_source: BuildSource, additional_instances_num: u32) -> Self {
        Self {
            cvd: CvdSpec { build_source },
            additional_instances_num,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleType {
    Main,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AndroidCiBundle {
    pub build: AndroidCiBuild,
    #[serde(rename = "type")]
    pub bundle_type: BundleType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchArtifactsRequest {
    pub android_ci_bundle: AndroidCiBundle,
}

impl FetchArtifactsRequest {
    /// Request the main bundle of `build`.
    #[must_use]
    pub fn main_bundle(build: AndroidCiBuild) -> Self {
        Self {
            android_ci_bundle: AndroidCiBundle {
                build,
                bundle_type: BundleType::Main,
            },
        }
    }
}
