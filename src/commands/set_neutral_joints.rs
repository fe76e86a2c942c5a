use tracing::info;

use super::Command;
use super::vector_ops::{VectorOperation, apply_vector_operation};
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;
use crate::vector3::RawVector3Vector;

/// Combines new neutral translations into the joints, index for index.
#[derive(Debug, Clone, PartialEq)]
pub struct SetNeutralJointTranslationsCommand {
    translations: RawVector3Vector,
    masks: Vec<f32>,
    operation: VectorOperation,
}

impl SetNeutralJointTranslationsCommand {
    pub fn new(translations: RawVector3Vector, operation: VectorOperation) -> Self {
        Self::with_masks(translations, Vec::new(), operation)
    }

    pub fn with_masks(
        translations: RawVector3Vector,
        masks: Vec<f32>,
        operation: VectorOperation,
    ) -> Self {
        Self {
            translations,
            masks,
            operation,
        }
    }

    pub fn set_translations(&mut self, translations: RawVector3Vector) {
        self.translations = translations;
    }

    pub fn set_masks(&mut self, masks: Vec<f32>) {
        self.masks = masks;
    }

    pub fn set_operation(&mut self, operation: VectorOperation) {
        self.operation = operation;
    }
}

impl Command for SetNeutralJointTranslationsCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        if !self.masks.is_empty() && self.masks.len() != self.translations.len() {
            return Err(CalibError::TranslationsMasksCountMismatch {
                translations: self.translations.len(),
                masks: self.masks.len(),
            });
        }

        apply_vector_operation(
            &mut output.raw_mut().definition.neutral_joint_translations,
            &self.translations,
            &self.masks,
            self.operation,
        );
        info!(
            count = self.translations.len(),
            operation = ?self.operation,
            "set neutral joint translations"
        );
        Ok(())
    }
}

/// Combines new neutral rotations into the joints, index for index.
///
/// Values are taken in the rig's rotation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SetNeutralJointRotationsCommand {
    rotations: RawVector3Vector,
    masks: Vec<f32>,
    operation: VectorOperation,
}

impl SetNeutralJointRotationsCommand {
    pub fn new(rotations: RawVector3Vector, operation: VectorOperation) -> Self {
        Self::with_masks(rotations, Vec::new(), operation)
    }

    pub fn with_masks(rotations: RawVector3Vector, masks: Vec<f32>, operation: VectorOperation) -> Self {
        Self {
            rotations,
            masks,
            operation,
        }
    }

    pub fn set_rotations(&mut self, rotations: RawVector3Vector) {
        self.rotations = rotations;
    }

    pub fn set_masks(&mut self, masks: Vec<f32>) {
        self.masks = masks;
    }

    pub fn set_operation(&mut self, operation: VectorOperation) {
        self.operation = operation;
    }
}

impl Command for SetNeutralJointRotationsCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        if !self.masks.is_empty() && self.masks.len() != self.rotations.len() {
            return Err(CalibError::RotationsMasksCountMismatch {
                rotations: self.rotations.len(),
                masks: self.masks.len(),
            });
        }

        apply_vector_operation(
            &mut output.raw_mut().definition.neutral_joint_rotations,
            &self.rotations,
            &self.masks,
            self.operation,
        );
        info!(
            count = self.rotations.len(),
            operation = ?self.operation,
            "set neutral joint rotations"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector3;

    use super::*;
    use crate::fixtures::fixture_rig;
    use crate::reader::DefinitionReader;

    fn uniform(value: f32, count: usize) -> RawVector3Vector {
        vec![Vector3::new(value, value, value); count].into()
    }

    #[test]
    fn given_add_when_setting_translations_then_every_joint_is_offset() {
        let mut rig = fixture_rig();

        SetNeutralJointTranslationsCommand::new(uniform(1.0, 4), VectorOperation::Add)
            .run(&mut rig)
            .expect("set should succeed");

        assert_eq!(rig.neutral_joint_translation(0), Vector3::new(2.0, 4.0, 5.0));
        assert_eq!(rig.neutral_joint_translation(3), Vector3::new(5.0, 7.0, 8.0));
    }

    #[test]
    fn given_masked_interpolation_when_setting_rotations_then_only_weighted_joints_move() {
        let mut rig = fixture_rig();

        SetNeutralJointRotationsCommand::with_masks(
            uniform(0.0, 4),
            vec![0.0, 1.0, 0.5, 0.0],
            VectorOperation::Interpolate,
        )
        .run(&mut rig)
        .expect("set should succeed");

        assert_eq!(rig.neutral_joint_rotation(1), Vector3::zeros());
        assert_eq!(rig.neutral_joint_rotation(2), Vector3::new(5.0, 10.0, 15.0));
        assert_eq!(rig.neutral_joint_rotation(3), Vector3::new(5.0, 0.0, 90.0));
    }

    #[test]
    fn given_mismatched_masks_when_setting_then_matching_error_is_returned() {
        let mut rig = fixture_rig();

        let translations = SetNeutralJointTranslationsCommand::with_masks(
            uniform(1.0, 4),
            vec![1.0],
            VectorOperation::Add,
        )
        .run(&mut rig)
        .expect_err("mismatch should be rejected");
        let rotations = SetNeutralJointRotationsCommand::with_masks(
            uniform(1.0, 2),
            vec![1.0, 1.0, 1.0],
            VectorOperation::Add,
        )
        .run(&mut rig)
        .expect_err("mismatch should be rejected");

        assert_eq!(translations.code(), "TranslationsMasksCountMismatch");
        assert_eq!(rotations.code(), "RotationsMasksCountMismatch");
        assert_eq!(rig, fixture_rig());
    }
}
