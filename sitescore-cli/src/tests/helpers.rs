//! Fixture writers shared by the rank command tests.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

pub(super) const SAMPLE_REQUEST: &str = r#"{
    "indicators": {
        "LAND_AREA": {"min": 0, "max": 1000, "weight": 80},
        "DISASTER_COUNT": {"min": 0, "max": 4, "weight": 20}
    }
}"#;

pub(super) const SAMPLE_PARCELS: &str = r#"[
    {"id": "north", "region_code": "1111010100", "land_area": 300, "disaster_counts": [3]},
    {"id": "east", "region_code": "1111010200", "land_area": "900", "disaster_counts": [0]},
    {"id": "south", "region_code": "2611010100", "land_area": 600, "disaster_counts": [2, 2]}
]"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

pub(super) fn utf8_workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}
