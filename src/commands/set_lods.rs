use std::collections::BTreeSet;

use tracing::{debug, info};

use super::Command;
use crate::dna_calib_reader::DnaCalibReader;
use crate::error::CalibError;
use crate::raw::{RawAnimatedMaps, RawBlendShapeChannels, RawJointGroup};
use crate::reader::DescriptorReader;
use crate::types::joint_of_output_index;

/// Keeps only the selected levels of detail.
///
/// The selection is deduplicated, unknown LODs are dropped and the remaining
/// ones are kept in ascending order, so the most detailed surviving LOD
/// becomes LOD 0. Rows of behavior tables that no surviving LOD can reach are
/// trimmed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetLodsCommand {
    lods: Vec<u16>,
}

fn pick<T: Clone + Default>(table: &[T], selection: &[u16]) -> Vec<T> {
    selection
        .iter()
        .map(|lod| table.get(usize::from(*lod)).cloned().unwrap_or_default())
        .collect()
}

fn top_rows(lods: &[u16]) -> usize {
    lods.first().copied().map(usize::from).unwrap_or(0)
}

fn trim_joint_group(group: &mut RawJointGroup, selection: &[u16]) {
    group.lods = pick(&group.lods, selection);
    let rows = top_rows(&group.lods).min(group.output_indices.len());
    let columns = group.column_count();
    group.output_indices.truncate(rows);
    group.values.truncate(rows * columns);
    if rows == 0 {
        group.input_indices.clear();
        group.values.clear();
    }

    let referenced: BTreeSet<u16> = group
        .output_indices
        .iter()
        .map(|output| joint_of_output_index(*output))
        .collect();
    group.joint_indices.retain(|joint| referenced.contains(joint));
}

fn trim_blend_shape_channels(channels: &mut RawBlendShapeChannels, selection: &[u16]) {
    channels.lods = pick(&channels.lods, selection);
    let rows = top_rows(&channels.lods);
    channels.input_indices.truncate(rows);
    channels.output_indices.truncate(rows);
}

fn trim_animated_maps(maps: &mut RawAnimatedMaps, selection: &[u16]) {
    maps.lods = pick(&maps.lods, selection);
    let rows = top_rows(&maps.lods);
    maps.input_indices.truncate(rows);
    maps.output_indices.truncate(rows);
    maps.from_values.truncate(rows);
    maps.to_values.truncate(rows);
    maps.slope_values.truncate(rows);
    maps.cut_values.truncate(rows);
}

impl SetLodsCommand {
    pub fn new(lods: Vec<u16>) -> Self {
        Self { lods }
    }

    pub fn set_lods(&mut self, lods: Vec<u16>) {
        self.lods = lods;
    }
}

impl Command for SetLodsCommand {
    fn run(&self, output: &mut DnaCalibReader) -> Result<(), CalibError> {
        let lod_count = output.lod_count();
        let selection: Vec<u16> = self
            .lods
            .iter()
            .copied()
            .filter(|lod| *lod < lod_count)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if selection.is_empty() {
            return Err(CalibError::InvalidLodSelection {
                requested: self.lods.clone(),
                lod_count,
            });
        }
        if selection.len() != self.lods.len() {
            debug!(requested = ?self.lods, kept = ?selection, "normalized LOD selection");
        }

        let rig = output.raw_mut();
        let definition = &mut rig.definition;
        definition.lod_joint_mapping = pick(&definition.lod_joint_mapping, &selection);
        definition.lod_blend_shape_mapping = pick(&definition.lod_blend_shape_mapping, &selection);
        definition.lod_animated_map_mapping = pick(&definition.lod_animated_map_mapping, &selection);
        definition.lod_mesh_mapping = pick(&definition.lod_mesh_mapping, &selection);

        let behavior = &mut rig.behavior;
        for group in &mut behavior.joints.joint_groups {
            trim_joint_group(group, &selection);
        }
        trim_blend_shape_channels(&mut behavior.blend_shape_channels, &selection);
        trim_animated_maps(&mut behavior.animated_maps, &selection);

        let new_count = u16::try_from(selection.len()).unwrap_or(u16::MAX);
        output.set_lod_count(new_count);
        info!(lods = ?selection, "set LODs");
        Ok(())
    }
}
