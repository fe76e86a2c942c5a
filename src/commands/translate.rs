use nalgebra::Vector3;
use tracing::info;

use super::Command;
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;
use crate::reader::DefinitionReader;

/// Moves the whole rig by a fixed offset.
///
/// Root joint translations and every vertex position shift; child joints
/// are stored relative to their parent and blend-shape deltas are relative
/// vectors, so neither changes.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateCommand {
    translation: Vector3<f32>,
}

impl TranslateCommand {
    pub fn new(translation: Vector3<f32>) -> Self {
        Self { translation }
    }

    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.translation = translation;
    }
}

impl Command for TranslateCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        let roots: Vec<u16> = (0..output.joint_count())
            .filter(|joint| output.is_root_joint(*joint))
            .collect();
        let delta = self.translation;
        let rig = output.raw_mut();

        let translations = &mut rig.definition.neutral_joint_translations;
        for joint in &roots {
            let index = usize::from(*joint);
            if let Some(current) = translations.get(index) {
                translations.set(index, current + delta);
            }
        }

        for mesh in &mut rig.geometry.meshes {
            mesh.positions.map_in_place(|position| position + delta);
        }

        info!(
            roots = roots.len(),
            meshes = rig.geometry.meshes.len(),
            "translated rig by ({}, {}, {})",
            delta.x,
            delta.y,
            delta.z
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{fixture_rig, flat_fixture_rig};
    use crate::reader::GeometryReader;

    #[test]
    fn given_root_joint_when_translating_then_offset_is_added() {
        let mut rig = flat_fixture_rig();

        TranslateCommand::new(Vector3::new(1.0, 2.0, 3.0))
            .run(&mut rig)
            .expect("translate should succeed");

        assert_eq!(rig.neutral_joint_translation(0), Vector3::new(2.0, 5.0, 7.0));
        assert_eq!(rig.neutral_joint_translation(3), Vector3::new(5.0, 8.0, 10.0));
    }

    #[test]
    fn given_hierarchy_when_translating_then_only_roots_and_vertices_move() {
        let mut rig = fixture_rig();

        TranslateCommand::new(Vector3::new(1.0, 2.0, 3.0))
            .run(&mut rig)
            .expect("translate should succeed");

        assert_eq!(rig.neutral_joint_translation(0), Vector3::new(2.0, 5.0, 7.0));
        assert_eq!(rig.neutral_joint_translation(1), Vector3::new(2.0, 4.0, 5.0));
        assert_eq!(rig.vertex_position(0, 1), Vector3::new(2.0, 2.0, 3.0));
        assert_eq!(
            rig.blend_shape_target_delta(0, 0, 2),
            Vector3::new(0.0, 0.0, 2.0)
        );
        assert_eq!(rig.neutral_joint_rotation(1), Vector3::new(15.0, 30.0, 45.0));
    }

    #[test]
    fn given_command_applied_twice_when_running_then_offset_accumulates() {
        let mut rig = flat_fixture_rig();
        let mut command = TranslateCommand::new(Vector3::new(1.0, 0.0, 0.0));

        command.run(&mut rig).expect("first run");
        command.set_translation(Vector3::new(0.0, 1.0, 0.0));
        command.run(&mut rig).expect("second run");

        assert_eq!(rig.neutral_joint_translation(0), Vector3::new(2.0, 4.0, 4.0));
    }
}
