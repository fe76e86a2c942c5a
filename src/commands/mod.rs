//! Edit commands applied in place to a [`DnaCalibReader`].
//!
//! Every command validates its own parameters before touching the rig, so an
//! `Err` always means nothing was mutated. Indices that do not resolve inside
//! the rig are skipped silently.

mod clear_blend_shapes;
mod convert_units;
mod joint_rows;
mod prune_blend_shape_targets;
mod remap;
mod remove_joint;
mod remove_joint_animation;
mod rename;
mod rotate;
mod scale;
mod set_blend_shape_target_deltas;
mod set_lods;
mod set_neutral_joints;
mod set_skin_weights;
mod set_vertex_positions;
mod translate;
mod vector_ops;

use tracing::debug;

use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;

pub use clear_blend_shapes::ClearBlendShapesCommand;
pub use convert_units::ConvertUnitsCommand;
pub use prune_blend_shape_targets::PruneBlendShapeTargetsCommand;
pub use remove_joint::RemoveJointCommand;
pub use remove_joint_animation::RemoveJointAnimationCommand;
pub use rename::{RenameBlendShapeCommand, RenameJointCommand};
pub use rotate::RotateCommand;
pub use scale::ScaleCommand;
pub use set_blend_shape_target_deltas::SetBlendShapeTargetDeltasCommand;
pub use set_lods::SetLodsCommand;
pub use set_neutral_joints::{SetNeutralJointRotationsCommand, SetNeutralJointTranslationsCommand};
pub use set_skin_weights::SetSkinWeightsCommand;
pub use set_vertex_positions::SetVertexPositionsCommand;
pub use translate::TranslateCommand;
pub use vector_ops::VectorOperation;

/// A single in-place edit of a rig.
///
/// Applying the same command twice applies its effect twice.
pub trait Command {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError>;
}

/// Runs commands in order and stops at the first failure.
///
/// Commands that ran before the failing one keep their effect.
#[derive(Default)]
pub struct CommandSequence {
    commands: Vec<Box<dyn Command>>,
}

impl CommandSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, command: impl Command + 'static) {
        self.commands.push(Box::new(command));
    }

    pub fn add_boxed(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Command for CommandSequence {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        for (index, command) in self.commands.iter().enumerate() {
            debug!(step = index, "running command");
            command.run(output)?;
        }
        Ok(())
    }
}
