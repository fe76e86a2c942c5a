use tracing::{debug, info};

use super::Command;
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;

/// Removes blend-shape deltas too small to matter.
///
/// A delta is dropped together with its vertex index when its length is
/// strictly below the threshold. Survivors keep their relative order.
#[derive(Debug, Clone, PartialEq)]
pub struct PruneBlendShapeTargetsCommand {
    threshold: f32,
}

impl PruneBlendShapeTargetsCommand {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }
}

impl Command for PruneBlendShapeTargetsCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        let threshold = self.threshold;
        let mut pruned = 0;
        for (mesh_index, mesh) in output.raw_mut().geometry.meshes.iter_mut().enumerate() {
            for (target_index, target) in mesh.blend_shape_targets.iter_mut().enumerate() {
                let keep: Vec<bool> = target
                    .deltas
                    .iter()
                    .map(|delta| delta.norm() >= threshold)
                    .collect();
                let removed = keep.iter().filter(|kept| !**kept).count();
                if removed == 0 {
                    continue;
                }

                target
                    .deltas
                    .retain_indices(|index| keep.get(index).copied().unwrap_or(false));
                let mut index = 0;
                target.vertex_indices.retain(|_| {
                    let kept = keep.get(index).copied().unwrap_or(false);
                    index += 1;
                    kept
                });

                debug!(
                    mesh = mesh_index,
                    target = target_index,
                    removed,
                    "pruned blend-shape target"
                );
                pruned += removed;
            }
        }

        info!(threshold, pruned, "pruned blend-shape deltas");
        Ok(())
    }
}
