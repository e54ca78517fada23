//! Property-based tests for instance counts and manifest parsing.
//!
//! Uses `proptest` to verify invariants across many random inputs.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use cvd_core::domain::images::required_image_paths;
use cvd_core::domain::{CreateOptions, ImageSource};

proptest! {
    /// One creation call always yields `max(n - 1, 0)` additional instances.
    #[test]
    fn prop_additional_instances_is_one_less_than_total(n in 0u32..10_000) {
        let opts = CreateOptions {
            host: "h1".to_string(),
            source: ImageSource::LocalImage,
            num_instances: n,
        };
        prop_assert_eq!(opts.additional_instances_num(), n.saturating_sub(1));
    }

    /// Every manifest line maps to one path under product out, in order.
    #[test]
    fn prop_required_images_preserve_order(
        names in prop::collection::vec("[a-z_]{1,12}\\.img", 0..20),
        trailing_newline in any::<bool>(),
    ) {
        let mut content = names.join("\n");
        if trailing_newline {
            content.push('\n');
        }
        let paths = required_image_paths(&content, Path::new("/po"));
        let expected: Vec<PathBuf> = names.iter().map(|n| Path::new("/po").join(n)).collect();
        prop_assert_eq!(paths, expected);
    }
}
