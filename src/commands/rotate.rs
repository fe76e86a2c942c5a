use nalgebra::{Rotation3, Vector3};
use tracing::info;

use super::Command;
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;
use crate::reader::{DefinitionReader, DescriptorReader};
use crate::types::RotationUnit;

/// Rotates the whole rig around a pivot.
///
/// Angles are Euler XYZ in degrees. Root joints get both their translation
/// (about `origin`) and their orientation rotated; child joints live in
/// their parent's frame and are left alone. Vertex positions rotate about
/// `origin`, blend-shape deltas about the zero vector.
#[derive(Debug, Clone, PartialEq)]
pub struct RotateCommand {
    degrees: Vector3<f32>,
    origin: Vector3<f32>,
}

fn euler_matrix(angles: Vector3<f32>, to_radians: f32) -> Rotation3<f32> {
    Rotation3::from_euler_angles(
        angles.x * to_radians,
        angles.y * to_radians,
        angles.z * to_radians,
    )
}

impl RotateCommand {
    pub fn new(degrees: Vector3<f32>, origin: Vector3<f32>) -> Self {
        Self { degrees, origin }
    }

    pub fn set_rotation(&mut self, degrees: Vector3<f32>) {
        self.degrees = degrees;
    }

    pub fn set_origin(&mut self, origin: Vector3<f32>) {
        self.origin = origin;
    }
}

impl Command for RotateCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        let rotation = euler_matrix(
            self.degrees,
            RotationUnit::Degrees.factor_to(RotationUnit::Radians),
        );
        let to_radians = output.rotation_unit().factor_to(RotationUnit::Radians);
        let from_radians = RotationUnit::Radians.factor_to(output.rotation_unit());
        let roots: Vec<u16> = (0..output.joint_count())
            .filter(|joint| output.is_root_joint(*joint))
            .collect();
        let origin = self.origin;
        let rig = output.raw_mut();

        let definition = &mut rig.definition;
        for joint in &roots {
            let index = usize::from(*joint);
            if let Some(translation) = definition.neutral_joint_translations.get(index) {
                definition
                    .neutral_joint_translations
                    .set(index, rotation * (translation - origin) + origin);
            }
            if let Some(angles) = definition.neutral_joint_rotations.get(index) {
                let composed = rotation * euler_matrix(angles, to_radians);
                let (x, y, z) = composed.euler_angles();
                definition
                    .neutral_joint_rotations
                    .set(index, Vector3::new(x, y, z) * from_radians);
            }
        }

        for mesh in &mut rig.geometry.meshes {
            mesh.positions
                .map_in_place(|position| rotation * (position - origin) + origin);
            for target in &mut mesh.blend_shape_targets {
                target.deltas.map_in_place(|delta| rotation * delta);
            }
        }

        info!(
            roots = roots.len(),
            "rotated rig by ({}, {}, {}) degrees",
            self.degrees.x,
            self.degrees.y,
            self.degrees.z
        );
        Ok(())
    }
}
