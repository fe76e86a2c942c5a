use tracing::{debug, info};

use super::Command;
use super::vector_ops::{VectorOperation, apply_vector_operation};
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;
use crate::vector3::RawVector3Vector;

/// Combines new vertex positions into one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct SetVertexPositionsCommand {
    mesh_index: u16,
    positions: RawVector3Vector,
    masks: Vec<f32>,
    operation: VectorOperation,
}

impl SetVertexPositionsCommand {
    pub fn new(mesh_index: u16, positions: RawVector3Vector, operation: VectorOperation) -> Self {
        Self::with_masks(mesh_index, positions, Vec::new(), operation)
    }

    /// `masks` weighs each position's contribution; it must be empty or as
    /// long as `positions`.
    pub fn with_masks(
        mesh_index: u16,
        positions: RawVector3Vector,
        masks: Vec<f32>,
        operation: VectorOperation,
    ) -> Self {
        Self {
            mesh_index,
            positions,
            masks,
            operation,
        }
    }

    pub fn set_mesh_index(&mut self, mesh_index: u16) {
        self.mesh_index = mesh_index;
    }

    pub fn set_positions(&mut self, positions: RawVector3Vector) {
        self.positions = positions;
    }

    pub fn set_masks(&mut self, masks: Vec<f32>) {
        self.masks = masks;
    }

    pub fn set_operation(&mut self, operation: VectorOperation) {
        self.operation = operation;
    }
}

impl Command for SetVertexPositionsCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        if !self.masks.is_empty() && self.masks.len() != self.positions.len() {
            return Err(CalibError::PositionsMasksCountMismatch {
                positions: self.positions.len(),
                masks: self.masks.len(),
            });
        }

        let Some(mesh) = output.mesh_mut(self.mesh_index) else {
            debug!(mesh = self.mesh_index, "mesh not found, positions left alone");
            return Ok(());
        };
        apply_vector_operation(
            &mut mesh.positions,
            &self.positions,
            &self.masks,
            self.operation,
        );

        info!(
            mesh = self.mesh_index,
            count = self.positions.len(),
            operation = ?self.operation,
            "set vertex positions"
        );
        Ok(())
    }
}
