use tracing::info;

use super::Command;
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;

/// Replaces the influence list of a single vertex.
///
/// Weights are stored exactly as given; nothing is renormalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SetSkinWeightsCommand {
    mesh_index: u16,
    vertex_index: u32,
    weights: Vec<f32>,
    joint_indices: Vec<u16>,
}

impl SetSkinWeightsCommand {
    pub fn new(mesh_index: u16, vertex_index: u32, weights: Vec<f32>, joint_indices: Vec<u16>) -> Self {
        Self {
            mesh_index,
            vertex_index,
            weights,
            joint_indices,
        }
    }

    pub fn set_mesh_index(&mut self, mesh_index: u16) {
        self.mesh_index = mesh_index;
    }

    pub fn set_vertex_index(&mut self, vertex_index: u32) {
        self.vertex_index = vertex_index;
    }

    pub fn set_weights(&mut self, weights: Vec<f32>) {
        self.weights = weights;
    }

    pub fn set_joint_indices(&mut self, joint_indices: Vec<u16>) {
        self.joint_indices = joint_indices;
    }
}

impl Command for SetSkinWeightsCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        if self.weights.len() != self.joint_indices.len() {
            return Err(CalibError::SkinWeightsJointIndicesCountMismatch {
                weights: self.weights.len(),
                joint_indices: self.joint_indices.len(),
            });
        }

        output.set_skin_weights(
            self.mesh_index,
            self.vertex_index,
            self.weights.clone(),
            self.joint_indices.clone(),
        );
        info!(
            mesh = self.mesh_index,
            vertex = self.vertex_index,
            influences = self.weights.len(),
            "set skin weights"
        );
        Ok(())
    }
}
