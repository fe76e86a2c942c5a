use tracing::{debug, info};

use super::Command;
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;

/// How a rename command finds the entry it renames.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Index(u16),
    Name(String),
}

/// Renames one joint, addressed by index or by its current name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameJointCommand {
    selector: Selector,
    new_name: String,
}

impl RenameJointCommand {
    pub fn by_index(joint_index: u16, new_name: impl Into<String>) -> Self {
        Self {
            selector: Selector::Index(joint_index),
            new_name: new_name.into(),
        }
    }

    pub fn by_name(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            selector: Selector::Name(old_name.into()),
            new_name: new_name.into(),
        }
    }
}

impl Command for RenameJointCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        let index = match &self.selector {
            Selector::Index(index) => Some(*index),
            Selector::Name(name) => output.find_joint(name),
        };
        match index {
            Some(index) => {
                output.set_joint_name(index, self.new_name.clone());
                info!(joint = index, name = %self.new_name, "renamed joint");
            }
            None => debug!(selector = ?self.selector, "joint not found, nothing renamed"),
        }
        Ok(())
    }
}

/// Renames one blend-shape channel, addressed by index or by its current name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameBlendShapeCommand {
    selector: Selector,
    new_name: String,
}

impl RenameBlendShapeCommand {
    pub fn by_index(channel_index: u16, new_name: impl Into<String>) -> Self {
        Self {
            selector: Selector::Index(channel_index),
            new_name: new_name.into(),
        }
    }

    pub fn by_name(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            selector: Selector::Name(old_name.into()),
            new_name: new_name.into(),
        }
    }
}

impl Command for RenameBlendShapeCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        let index = match &self.selector {
            Selector::Index(index) => Some(*index),
            Selector::Name(name) => output.find_blend_shape_channel(name),
        };
        match index {
            Some(index) => {
                output.set_blend_shape_channel_name(index, self.new_name.clone());
                info!(channel = index, name = %self.new_name, "renamed blend shape");
            }
            None => debug!(selector = ?self.selector, "blend shape not found, nothing renamed"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::fixture_rig;
    use crate::reader::DefinitionReader;

    #[test]
    fn given_index_or_name_when_renaming_joint_then_name_changes() {
        let mut rig = fixture_rig();

        RenameJointCommand::by_index(2, "spine")
            .run(&mut rig)
            .expect("rename by index");
        RenameJointCommand::by_name("JD", "neck")
            .run(&mut rig)
            .expect("rename by name");

        assert_eq!(rig.joint_name(2), "spine");
        assert_eq!(rig.joint_name(3), "neck");
    }

    #[test]
    fn given_blend_shape_when_renaming_then_channel_name_changes() {
        let mut rig = fixture_rig();

        RenameBlendShapeCommand::by_name("bs1", "jawOpen")
            .run(&mut rig)
            .expect("rename by name");
        RenameBlendShapeCommand::by_index(0, "blink")
            .run(&mut rig)
            .expect("rename by index");

        assert_eq!(rig.blend_shape_channel_name(0), "blink");
        assert_eq!(rig.blend_shape_channel_name(1), "jawOpen");
    }

    #[test]
    fn given_unknown_target_when_renaming_then_rig_is_unchanged() {
        let original = fixture_rig();
        let mut rig = original.clone();

        RenameJointCommand::by_name("missing", "x")
            .run(&mut rig)
            .expect("unknown name is skipped");
        RenameBlendShapeCommand::by_index(40, "x")
            .run(&mut rig)
            .expect("unknown index is skipped");

        assert_eq!(rig, original);
    }
}
