use tracing::info;

use super::Command;
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;

/// Drops every blend-shape target and the channel routing that drives them.
///
/// Channel names and the length of the channel LOD table survive; every LOD
/// boundary drops to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearBlendShapesCommand;

impl ClearBlendShapesCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ClearBlendShapesCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        let rig = output.raw_mut();
        let mut cleared = 0;
        for mesh in &mut rig.geometry.meshes {
            cleared += mesh.blend_shape_targets.len();
            mesh.blend_shape_targets.clear();
        }

        let channels = &mut rig.behavior.blend_shape_channels;
        channels.lods.iter_mut().for_each(|lod| *lod = 0);
        channels.input_indices.clear();
        channels.output_indices.clear();

        info!(targets = cleared, "cleared blend shapes");
        Ok(())
    }
}
