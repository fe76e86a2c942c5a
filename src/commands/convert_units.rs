use tracing::info;

use super::Command;
use super::joint_rows::scale_attribute_rows;
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;
use crate::reader::DescriptorReader;
use crate::types::{AttributeKind, RotationUnit, TranslationUnit};

/// Re-expresses every length and angle of the rig in new units.
///
/// Lengths are joint translations, vertex positions, blend-shape deltas and
/// translation rows of joint groups. Angles are joint rotations and rotation
/// rows. An axis whose unit already matches is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertUnitsCommand {
    translation_unit: TranslationUnit,
    rotation_unit: RotationUnit,
}

impl ConvertUnitsCommand {
    pub fn new(translation_unit: TranslationUnit, rotation_unit: RotationUnit) -> Self {
        Self {
            translation_unit,
            rotation_unit,
        }
    }

    pub fn set_translation_unit(&mut self, unit: TranslationUnit) {
        self.translation_unit = unit;
    }

    pub fn set_rotation_unit(&mut self, unit: RotationUnit) {
        self.rotation_unit = unit;
    }
}

impl Command for ConvertUnitsCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        let current_translation = output.translation_unit();
        let current_rotation = output.rotation_unit();

        if current_translation != self.translation_unit {
            let factor = current_translation.factor_to(self.translation_unit);
            let rig = output.raw_mut();
            rig.definition.neutral_joint_translations.scale(factor);
            scale_attribute_rows(
                &mut rig.behavior.joints.joint_groups,
                AttributeKind::Translation,
                factor,
            );
            for mesh in &mut rig.geometry.meshes {
                mesh.positions.scale(factor);
                for target in &mut mesh.blend_shape_targets {
                    target.deltas.scale(factor);
                }
            }
            output.set_translation_unit(self.translation_unit);
            info!(
                from = ?current_translation,
                to = ?self.translation_unit,
                "converted translation unit"
            );
        }

        if current_rotation != self.rotation_unit {
            let factor = current_rotation.factor_to(self.rotation_unit);
            let rig = output.raw_mut();
            rig.definition.neutral_joint_rotations.scale(factor);
            scale_attribute_rows(
                &mut rig.behavior.joints.joint_groups,
                AttributeKind::Rotation,
                factor,
            );
            output.set_rotation_unit(self.rotation_unit);
            info!(
                from = ?current_rotation,
                to = ?self.rotation_unit,
                "converted rotation unit"
            );
        }

        Ok(())
    }
}
