use nalgebra::Vector3;
use tracing::info;

use super::Command;
use super::joint_rows::scale_attribute_rows;
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;
use crate::reader::DefinitionReader;
use crate::types::AttributeKind;

/// Uniformly scales the rig about a pivot.
///
/// Absolute data (root joint translations, vertex positions) scales about
/// `origin`. Relative data (child joint translations, blend-shape deltas and
/// the translation rows of joint groups) scales without it. Rotations and
/// scale rows are unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleCommand {
    scale: f32,
    origin: Vector3<f32>,
}

impl ScaleCommand {
    pub fn new(scale: f32, origin: Vector3<f32>) -> Self {
        Self { scale, origin }
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn set_origin(&mut self, origin: Vector3<f32>) {
        self.origin = origin;
    }
}

impl Command for ScaleCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        let roots: Vec<bool> = (0..output.joint_count())
            .map(|joint| output.is_root_joint(joint))
            .collect();
        let (scale, origin) = (self.scale, self.origin);
        let rig = output.raw_mut();

        let translations = &mut rig.definition.neutral_joint_translations;
        for (index, is_root) in roots.iter().enumerate() {
            let Some(current) = translations.get(index) else {
                continue;
            };
            let scaled = if *is_root {
                (current - origin) * scale + origin
            } else {
                current * scale
            };
            translations.set(index, scaled);
        }

        scale_attribute_rows(
            &mut rig.behavior.joints.joint_groups,
            AttributeKind::Translation,
            scale,
        );

        for mesh in &mut rig.geometry.meshes {
            mesh.positions
                .map_in_place(|position| (position - origin) * scale + origin);
            for target in &mut mesh.blend_shape_targets {
                target.deltas.scale(scale);
            }
        }

        info!(scale, "scaled rig");
        Ok(())
    }
}
