use tracing::{debug, info};

use super::Command;
use super::vector_ops::{VectorOperation, apply_vector_operation};
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;
use crate::vector3::RawVector3Vector;

/// Combines new deltas into one blend-shape target.
///
/// When vertex indices are supplied they replace the target's own. If that
/// changes which vertices the target touches, the old deltas no longer line
/// up and the supplied ones are stored as they are. A target without
/// deltas only accepts new ones that match its vertex index count.
#[derive(Debug, Clone, PartialEq)]
pub struct SetBlendShapeTargetDeltasCommand {
    mesh_index: u16,
    target_index: u16,
    deltas: RawVector3Vector,
    vertex_indices: Vec<u32>,
    masks: Vec<f32>,
    operation: VectorOperation,
}

impl SetBlendShapeTargetDeltasCommand {
    pub fn new(
        mesh_index: u16,
        target_index: u16,
        deltas: RawVector3Vector,
        operation: VectorOperation,
    ) -> Self {
        Self {
            mesh_index,
            target_index,
            deltas,
            vertex_indices: Vec::new(),
            masks: Vec::new(),
            operation,
        }
    }

    pub fn with_vertex_indices(mut self, vertex_indices: Vec<u32>) -> Self {
        self.vertex_indices = vertex_indices;
        self
    }

    pub fn with_masks(mut self, masks: Vec<f32>) -> Self {
        self.masks = masks;
        self
    }

    pub fn set_mesh_index(&mut self, mesh_index: u16) {
        self.mesh_index = mesh_index;
    }

    pub fn set_target_index(&mut self, target_index: u16) {
        self.target_index = target_index;
    }

    pub fn set_deltas(&mut self, deltas: RawVector3Vector) {
        self.deltas = deltas;
    }

    pub fn set_vertex_indices(&mut self, vertex_indices: Vec<u32>) {
        self.vertex_indices = vertex_indices;
    }

    pub fn set_masks(&mut self, masks: Vec<f32>) {
        self.masks = masks;
    }

    pub fn set_operation(&mut self, operation: VectorOperation) {
        self.operation = operation;
    }
}

impl Command for SetBlendShapeTargetDeltasCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        if !self.vertex_indices.is_empty() && self.vertex_indices.len() != self.deltas.len() {
            return Err(CalibError::DeltasVertexIndicesCountMismatch {
                deltas: self.deltas.len(),
                vertex_indices: self.vertex_indices.len(),
            });
        }
        if !self.masks.is_empty() && self.masks.len() != self.deltas.len() {
            return Err(CalibError::DeltasMasksCountMismatch {
                deltas: self.deltas.len(),
                masks: self.masks.len(),
            });
        }

        let Some(target) = output
            .mesh_mut(self.mesh_index)
            .and_then(|mesh| mesh.blend_shape_targets.get_mut(usize::from(self.target_index)))
        else {
            debug!(
                mesh = self.mesh_index,
                target = self.target_index,
                "blend-shape target not found, deltas left alone"
            );
            return Ok(());
        };

        // An emptied target would take the supplied deltas wholesale.
        if self.vertex_indices.is_empty()
            && target.deltas.is_empty()
            && self.deltas.len() != target.vertex_indices.len()
        {
            return Err(CalibError::DeltasVertexIndicesCountMismatch {
                deltas: self.deltas.len(),
                vertex_indices: target.vertex_indices.len(),
            });
        }
        if !self.vertex_indices.is_empty() && self.vertex_indices != target.vertex_indices {
            target.vertex_indices = self.vertex_indices.clone();
            target.deltas.clear();
        }
        apply_vector_operation(&mut target.deltas, &self.deltas, &self.masks, self.operation);

        info!(
            mesh = self.mesh_index,
            target = self.target_index,
            count = self.deltas.len(),
            operation = ?self.operation,
            "set blend-shape target deltas"
        );
        Ok(())
    }
}
