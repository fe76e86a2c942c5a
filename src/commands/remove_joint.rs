use tracing::{debug, info};

use super::Command;
use super::joint_rows::retain_rows;
use super::remap::JointRemap;
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;
use crate::raw::{RawDefinition, RawJoints, RawVertexSkinWeights};
use crate::reader::DefinitionReader;
use crate::types::{ATTRIBUTES_PER_JOINT, INVALID_INDEX, joint_of_output_index};

/// Removes joints from every table of the rig.
///
/// All indices of one run are resolved against the rig as it was before the
/// run, so `{1, 2}` removes the joints that were 1 and 2. Surviving joints
/// are renumbered densely and every table referencing joints follows.
/// Indices outside the rig are ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemoveJointCommand {
    joint_indices: Vec<u16>,
}

impl RemoveJointCommand {
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

impl Command for RemoveJointCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        let remap = JointRemap::new(output.joint_count(), &self.joint_indices);
        if remap.removed_count() == 0 {
            debug!(requested = ?self.joint_indices, "no joint to remove");
            return Ok(());
        }

        let rig = output.raw_mut();
        compact_definition(&mut rig.definition, &remap);
        let dropped_rows = compact_joint_groups(&mut rig.behavior.joints, &remap);
        for mesh in &mut rig.geometry.meshes {
            for influences in &mut mesh.skin_weights {
                compact_skin_weights(influences, &remap);
            }
        }

        info!(
            removed = remap.removed_count(),
            remaining = remap.surviving_count(),
            dropped_rows,
            "removed joints"
        );
        Ok(())
    }
}

fn compact_definition(definition: &mut RawDefinition, remap: &JointRemap) {
    // A self-parented root maps onto its own new index; orphans become roots.
    let parents = std::mem::take(&mut definition.joint_hierarchy);
    definition.joint_hierarchy = parents
        .iter()
        .enumerate()
        .filter(|(old, _)| remap.keeps(*old))
        .map(|(_, parent)| remap.get(*parent).unwrap_or(INVALID_INDEX))
        .collect();

    let mut index = 0;
    definition.joint_names.retain(|_| {
        let kept = remap.keeps(index);
        index += 1;
        kept
    });

    for window in &mut definition.lod_joint_mapping {
        *window = window.iter().filter_map(|joint| remap.get(*joint)).collect();
    }

    definition
        .neutral_joint_translations
        .retain_indices(|old| remap.keeps(old));
    definition
        .neutral_joint_rotations
        .retain_indices(|old| remap.keeps(old));
}

fn compact_joint_groups(joints: &mut RawJoints, remap: &JointRemap) -> usize {
    let surviving = u16::try_from(remap.surviving_count()).unwrap_or(u16::MAX);
    joints.row_count = surviving.saturating_mul(ATTRIBUTES_PER_JOINT);

    let mut dropped = 0;
    for group in &mut joints.joint_groups {
        dropped += retain_rows(group, |output| {
            !remap.is_removed(joint_of_output_index(output))
        });
        for output in &mut group.output_indices {
            if let Some(joint) = remap.get(joint_of_output_index(*output)) {
                *output = joint * ATTRIBUTES_PER_JOINT + *output % ATTRIBUTES_PER_JOINT;
            }
        }
        group.joint_indices = group
            .joint_indices
            .iter()
            .filter_map(|joint| remap.get(*joint))
            .collect();
    }
    dropped
}

fn compact_skin_weights(influences: &mut RawVertexSkinWeights, remap: &JointRemap) {
    if !influences
        .joint_indices
        .iter()
        .any(|joint| remap.is_removed(*joint))
    {
        for joint in &mut influences.joint_indices {
            if let Some(new_index) = remap.get(*joint) {
                *joint = new_index;
            }
        }
        return;
    }

    let mut weights = Vec::with_capacity(influences.weights.len());
    let mut joint_indices = Vec::with_capacity(influences.joint_indices.len());
    for (weight, joint) in influences.weights.iter().zip(&influences.joint_indices) {
        if let Some(new_index) = remap.get(*joint) {
            weights.push(*weight);
            joint_indices.push(new_index);
        }
    }

    let sum: f32 = weights.iter().sum();
    if sum > 0.0 {
        weights.iter_mut().for_each(|weight| *weight /= sum);
    }

    influences.weights = weights;
    influences.joint_indices = joint_indices;
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::fixtures::fixture_rig;
    use crate::reader::{BehaviorReader, GeometryReader};

    #[test]
    fn given_middle_joint_when_removing_then_definition_is_compacted() {
        let mut rig = fixture_rig();

        RemoveJointCommand::new(1)
            .run(&mut rig)
            .expect("removal should succeed");

        assert_eq!(rig.joint_count(), 3);
        assert_eq!(rig.joint_name(0), "JA");
        assert_eq!(rig.joint_name(1), "JC");
        assert_eq!(rig.joint_name(2), "JD");
        assert_eq!(rig.joint_parent_index(0), 0);
        assert_eq!(rig.joint_parent_index(1), INVALID_INDEX);
        assert_eq!(rig.joint_parent_index(2), 1);
        assert_eq!(rig.joint_indices_for_lod(0), &[0, 1, 2]);
        assert_eq!(rig.joint_indices_for_lod(1), &[0, 1]);
        assert_eq!(rig.neutral_joint_translation_xs(), &[1.0, 3.0, 4.0]);
        assert_eq!(rig.neutral_joint_rotation_zs(), &[0.0, 30.0, 90.0]);
    }

    #[test]
    fn given_middle_joint_when_removing_then_joint_group_rows_follow() {
        let mut rig = fixture_rig();

        RemoveJointCommand::new(1)
            .run(&mut rig)
            .expect("removal should succeed");

        assert_eq!(rig.joint_row_count(), 27);
        assert_eq!(rig.joint_group_count(), 2);
        assert_eq!(rig.joint_group_output_indices(0), &[0, 3]);
        assert_eq!(rig.joint_group_values(0), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(rig.joint_group_lods(0), &[2, 2]);
        assert_eq!(rig.joint_group_joint_indices(0), &[0]);
        assert_eq!(rig.joint_group_output_indices(1), &[9, 13, 19, 24]);
        assert_eq!(rig.joint_group_joint_indices(1), &[1, 2]);
        assert_eq!(rig.joint_group_lods(1), &[4, 2]);
    }

    #[test]
    fn given_middle_joint_when_removing_then_skin_weights_are_renormalized() {
        let mut rig = fixture_rig();

        RemoveJointCommand::new(1)
            .run(&mut rig)
            .expect("removal should succeed");

        assert_eq!(rig.skin_weights_joint_indices(0, 0), &[0]);
        assert_eq!(rig.skin_weights_joint_indices(0, 1), &[0]);
        assert_eq!(rig.skin_weights_values(0, 1), &[1.0]);
        assert_eq!(rig.skin_weights_joint_indices(0, 2), &[1]);
        assert_eq!(rig.skin_weights_values(0, 2), &[1.0]);
        assert_eq!(rig.skin_weights_joint_indices(0, 3), &[1, 2]);
        assert_relative_eq!(rig.skin_weights_values(0, 3)[0], 0.4, epsilon = 1e-6);
        assert_relative_eq!(rig.skin_weights_values(0, 3)[1], 0.6, epsilon = 1e-6);
    }

    #[test]
    fn given_any_subset_when_removing_then_every_vertex_stays_normalized() {
        for subset in [vec![0], vec![2], vec![0, 3], vec![1, 2, 3]] {
            let mut rig = fixture_rig();

            RemoveJointCommand::with_indices(subset.clone())
                .run(&mut rig)
                .expect("removal should succeed");

            for vertex in 0..rig.skin_weights_count(0) {
                let weights = rig.skin_weights_values(0, vertex);
                let joints = rig.skin_weights_joint_indices(0, vertex);
                assert_eq!(weights.len(), joints.len());
                if !weights.is_empty() {
                    assert_relative_eq!(weights.iter().sum::<f32>(), 1.0, epsilon = 1e-4);
                }
            }
        }
    }

    #[test]
    fn given_batch_removal_when_compared_to_sequential_then_states_match() {
        let mut batch = fixture_rig();
        let mut sequential = fixture_rig();

        RemoveJointCommand::with_indices(vec![1, 2])
            .run(&mut batch)
            .expect("batch removal");
        let mut command = RemoveJointCommand::new(1);
        command.run(&mut sequential).expect("first removal");
        command.set_joint_index(1);
        command.run(&mut sequential).expect("second removal");

        assert_eq!(batch, sequential);
        assert_eq!(batch.joint_count(), 2);
        assert_eq!(batch.joint_name(1), "JD");
        assert_eq!(batch.joint_parent_index(1), INVALID_INDEX);
        assert_eq!(batch.joint_group_output_indices(1), &[10, 15]);
    }

    #[test]
    fn given_every_joint_when_removing_then_tables_are_empty_but_shaped() {
        let mut batch = fixture_rig();
        let mut one_by_one = fixture_rig();

        RemoveJointCommand::with_indices(vec![0, 1, 2, 3])
            .run(&mut batch)
            .expect("batch removal");
        let front = RemoveJointCommand::new(0);
        for _ in 0..4 {
            front.run(&mut one_by_one).expect("front removal");
        }

        for rig in [&batch, &one_by_one] {
            assert_eq!(rig.joint_count(), 0);
            assert_eq!(rig.joint_row_count(), 0);
            assert!(rig.joint_indices_for_lod(0).is_empty());
            assert!(rig.joint_indices_for_lod(1).is_empty());
            assert_eq!(rig.joint_group_count(), 2);
            for group in 0..2 {
                assert_eq!(rig.joint_group_lods(group), &[0, 0]);
                assert!(rig.joint_group_values(group).is_empty());
                assert!(rig.joint_group_input_indices(group).is_empty());
            }
            assert_eq!(rig.skin_weights_count(0), 4);
            assert!(rig.skin_weights_values(0, 3).is_empty());
        }
        assert_eq!(batch, one_by_one);
    }

    #[test]
    fn given_out_of_range_index_when_removing_then_rig_is_unchanged() {
        let original = fixture_rig();
        let mut rig = original.clone();

        RemoveJointCommand::new(7)
            .run(&mut rig)
            .expect("out-of-range removal is not an error");

        assert_eq!(rig, original);
    }
}
