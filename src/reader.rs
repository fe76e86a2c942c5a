//! Capability-tagged read interfaces over rig data.
//!
//! A rig source always provides the descriptor and definition layers. The
//! behavior and geometry layers are optional and are discovered through
//! [`Reader::behavior`] and [`Reader::geometry`], mirroring older DNA files
//! that lack some layers entirely.
//!
//! Every accessor tolerates out-of-range indices and answers with an empty
//! slice, an empty string, zero or a zero vector.

use nalgebra::Vector3;

use crate::types::{RotationUnit, TranslationUnit};

pub trait DescriptorReader {
    fn name(&self) -> &str;
    fn translation_unit(&self) -> TranslationUnit;
    fn rotation_unit(&self) -> RotationUnit;
    fn lod_count(&self) -> u16;
}

pub trait DefinitionReader {
    fn raw_control_count(&self) -> u16;
    fn raw_control_name(&self, index: u16) -> &str;

    fn joint_count(&self) -> u16;
    fn joint_name(&self, index: u16) -> &str;
    fn joint_parent_index(&self, index: u16) -> u16;
    fn joint_indices_for_lod(&self, lod: u16) -> &[u16];

    fn blend_shape_channel_count(&self) -> u16;
    fn blend_shape_channel_name(&self, index: u16) -> &str;
    fn blend_shape_channel_indices_for_lod(&self, lod: u16) -> &[u16];

    fn animated_map_count(&self) -> u16;
    fn animated_map_name(&self, index: u16) -> &str;
    fn animated_map_indices_for_lod(&self, lod: u16) -> &[u16];

    fn mesh_count(&self) -> u16;
    fn mesh_name(&self, index: u16) -> &str;
    fn mesh_indices_for_lod(&self, lod: u16) -> &[u16];

    fn neutral_joint_translation(&self, index: u16) -> Vector3<f32>;
    fn neutral_joint_translation_xs(&self) -> &[f32];
    fn neutral_joint_translation_ys(&self) -> &[f32];
    fn neutral_joint_translation_zs(&self) -> &[f32];

    fn neutral_joint_rotation(&self, index: u16) -> Vector3<f32>;
    fn neutral_joint_rotation_xs(&self) -> &[f32];
    fn neutral_joint_rotation_ys(&self) -> &[f32];
    fn neutral_joint_rotation_zs(&self) -> &[f32];
}

pub trait BehaviorReader {
    fn joint_row_count(&self) -> u16;
    fn joint_column_count(&self) -> u16;

    fn joint_group_count(&self) -> u16;
    fn joint_group_lods(&self, group: u16) -> &[u16];
    fn joint_group_input_indices(&self, group: u16) -> &[u16];
    fn joint_group_output_indices(&self, group: u16) -> &[u16];
    fn joint_group_values(&self, group: u16) -> &[f32];
    fn joint_group_joint_indices(&self, group: u16) -> &[u16];

    fn blend_shape_channel_lods(&self) -> &[u16];
    fn blend_shape_channel_input_indices(&self) -> &[u16];
    fn blend_shape_channel_output_indices(&self) -> &[u16];

    fn animated_map_lods(&self) -> &[u16];
    fn animated_map_input_indices(&self) -> &[u16];
    fn animated_map_output_indices(&self) -> &[u16];
    fn animated_map_from_values(&self) -> &[f32];
    fn animated_map_to_values(&self) -> &[f32];
    fn animated_map_slope_values(&self) -> &[f32];
    fn animated_map_cut_values(&self) -> &[f32];
}

pub trait GeometryReader {
    fn vertex_position_count(&self, mesh: u16) -> u32;
    fn vertex_position(&self, mesh: u16, vertex: u32) -> Vector3<f32>;
    fn vertex_position_xs(&self, mesh: u16) -> &[f32];
    fn vertex_position_ys(&self, mesh: u16) -> &[f32];
    fn vertex_position_zs(&self, mesh: u16) -> &[f32];

    fn vertex_texture_coordinate_us(&self, mesh: u16) -> &[f32];
    fn vertex_texture_coordinate_vs(&self, mesh: u16) -> &[f32];

    fn maximum_influence_per_vertex(&self, mesh: u16) -> u16;
    fn skin_weights_count(&self, mesh: u16) -> u32;
    fn skin_weights_values(&self, mesh: u16, vertex: u32) -> &[f32];
    fn skin_weights_joint_indices(&self, mesh: u16, vertex: u32) -> &[u16];

    fn blend_shape_target_count(&self, mesh: u16) -> u16;
    fn blend_shape_channel_index(&self, mesh: u16, target: u16) -> u16;
    fn blend_shape_target_delta_count(&self, mesh: u16, target: u16) -> u32;
    fn blend_shape_target_delta(&self, mesh: u16, target: u16, delta: u32) -> Vector3<f32>;
    fn blend_shape_target_delta_xs(&self, mesh: u16, target: u16) -> &[f32];
    fn blend_shape_target_delta_ys(&self, mesh: u16, target: u16) -> &[f32];
    fn blend_shape_target_delta_zs(&self, mesh: u16, target: u16) -> &[f32];
    fn blend_shape_target_vertex_indices(&self, mesh: u16, target: u16) -> &[u32];
}

/// A complete rig source with optional behavior and geometry layers.
pub trait Reader: DescriptorReader + DefinitionReader {
    fn behavior(&self) -> Option<&dyn BehaviorReader> {
        None
    }

    fn geometry(&self) -> Option<&dyn GeometryReader> {
        None
    }
}
