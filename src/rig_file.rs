use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::dna_calib_reader::DnaCalibReader;
use crate::raw::RawRig;

/// Load a rig stored as JSON.
pub fn load_rig(path: &Path) -> Result<DnaCalibReader> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to load rig: {}", path.display()))?;
    let rig: RawRig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse rig JSON: {}", path.display()))?;
    Ok(DnaCalibReader::from_raw(rig))
}

/// Save a rig as pretty-printed JSON.
pub fn save_rig(path: &Path, rig: &DnaCalibReader) -> Result<()> {
    let content =
        serde_json::to_string_pretty(rig.raw()).context("failed to serialize rig as JSON")?;
    fs::write(path, content).with_context(|| format!("failed to save rig: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::fixture_rig;

    #[test]
    fn given_saved_rig_when_loading_then_contents_match() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("rig.json");
        let rig = fixture_rig();

        save_rig(&path, &rig).expect("save rig");
        let loaded = load_rig(&path).expect("load rig");

        assert_eq!(loaded, rig);
    }

    #[test]
    fn given_definition_only_json_when_loading_then_optional_layers_default() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("bare.json");
        let mut raw = serde_json::to_value(fixture_rig().raw()).expect("to value");
        let object = raw.as_object_mut().expect("rig is an object");
        object.remove("behavior");
        object.remove("geometry");
        fs::write(&path, raw.to_string()).expect("write json");

        let loaded = load_rig(&path).expect("load rig");

        assert!(loaded.raw().geometry.meshes.is_empty());
        assert!(loaded.raw().behavior.joints.joint_groups.is_empty());
        assert_eq!(loaded.raw().definition.joint_names.len(), 4);
    }

    #[test]
    fn given_missing_file_when_loading_then_error_names_the_path() {
        let error = load_rig(Path::new("/nonexistent/rig.json")).expect_err("missing file");

        assert!(format!("{error:#}").contains("/nonexistent/rig.json"));
    }

    #[test]
    fn given_uneven_position_axes_when_loading_then_parse_fails() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("uneven.json");
        let mut raw = serde_json::to_value(fixture_rig().raw()).expect("to value");
        raw["geometry"]["meshes"][0]["positions"]["ys"] = serde_json::json!([0.0]);
        fs::write(&path, raw.to_string()).expect("write json");

        let error = load_rig(&path).expect_err("uneven axes should be rejected");

        let message = format!("{error:#}");
        assert!(message.contains("failed to parse rig JSON"));
        assert!(message.contains("axis arrays have different lengths"));
    }
}
