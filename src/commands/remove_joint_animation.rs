use tracing::info;

use super::Command;
use super::joint_rows::retain_rows;
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;
use crate::types::joint_of_output_index;

/// Stops joints from being driven by joint groups while keeping them in the
/// skeleton.
///
/// Only joint-group rows and joint lists change; names, hierarchy, neutral
/// pose, LOD windows and skin weights are left as they are.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemoveJointAnimationCommand {
    joint_indices: Vec<u16>,
}

impl RemoveJointAnimationCommand {
    pub fn new(joint_index: u16) -> Self {
        Self {
            joint_indices: vec![joint_index],
        }
    }

    pub fn with_indices(joint_indices: Vec<u16>) -> Self {
        Self { joint_indices }
    }

    pub fn set_joint_index(&mut self, joint_index: u16) {
        self.joint_indices = vec![joint_index];
    }

    pub fn set_joint_indices(&mut self, joint_indices: Vec<u16>) {
        self.joint_indices = joint_indices;
    }
}

impl Command for RemoveJointAnimationCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        let targets = &self.joint_indices;
        let mut dropped = 0;
        for group in &mut output.raw_mut().behavior.joints.joint_groups {
            dropped += retain_rows(group, |row| {
                !targets.contains(&joint_of_output_index(row))
            });
            group.joint_indices.retain(|joint| !targets.contains(joint));
        }

        info!(joints = ?targets, dropped_rows = dropped, "removed joint animation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::fixture_rig;
    use crate::reader::{BehaviorReader, DefinitionReader, GeometryReader};

    #[test]
    fn given_animated_joint_when_removing_animation_then_only_group_rows_change() {
        let mut rig = fixture_rig();

        RemoveJointAnimationCommand::new(2)
            .run(&mut rig)
            .expect("animation removal should succeed");

        assert_eq!(rig.joint_group_output_indices(1), &[28, 33]);
        assert_eq!(rig.joint_group_values(1), &[1.5, 2.0]);
        assert_eq!(rig.joint_group_lods(1), &[2, 0]);
        assert_eq!(rig.joint_group_joint_indices(1), &[3]);
        assert_eq!(rig.joint_group_output_indices(0), &[0, 3, 10, 15]);

        assert_eq!(rig.joint_count(), 4);
        assert_eq!(rig.joint_name(2), "JC");
        assert_eq!(rig.joint_row_count(), 36);
        assert_eq!(rig.joint_indices_for_lod(1), &[0, 2]);
        assert_eq!(rig.skin_weights_joint_indices(0, 3), &[2, 3]);
    }

    #[test]
    fn given_several_joints_when_removing_animation_then_emptied_groups_lose_inputs() {
        let mut rig = fixture_rig();

        RemoveJointAnimationCommand::with_indices(vec![2, 3])
            .run(&mut rig)
            .expect("animation removal should succeed");

        assert!(rig.joint_group_output_indices(1).is_empty());
        assert!(rig.joint_group_input_indices(1).is_empty());
        assert_eq!(rig.joint_group_lods(1), &[0, 0]);
        assert_eq!(rig.joint_group_count(), 2);
    }

    #[test]
    fn given_unanimated_joint_when_removing_animation_then_rig_is_unchanged() {
        let original = fixture_rig();
        let mut rig = original.clone();

        RemoveJointAnimationCommand::new(9)
            .run(&mut rig)
            .expect("animation removal should succeed");

        assert_eq!(rig, original);
    }
}
