//! Owned storage layers of a rig, one struct per capability layer.

use serde::{Deserialize, Serialize};

use crate::types::{RotationUnit, TranslationUnit};
use crate::vector3::RawVector3Vector;

// ─── Descriptor ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDescriptor {
    pub name: String,
    pub translation_unit: TranslationUnit,
    pub rotation_unit: RotationUnit,
    pub lod_count: u16,
}

// ─── Definition ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDefinition {
    pub raw_control_names: Vec<String>,
    pub joint_names: Vec<String>,
    /// Parent index per joint. A root points at itself or at `INVALID_INDEX`.
    pub joint_hierarchy: Vec<u16>,
    /// Joint indices active at each LOD, LOD0 first.
    pub lod_joint_mapping: Vec<Vec<u16>>,
    pub blend_shape_channel_names: Vec<String>,
    pub lod_blend_shape_mapping: Vec<Vec<u16>>,
    pub animated_map_names: Vec<String>,
    pub lod_animated_map_mapping: Vec<Vec<u16>>,
    pub mesh_names: Vec<String>,
    pub lod_mesh_mapping: Vec<Vec<u16>>,
    pub neutral_joint_translations: RawVector3Vector,
    pub neutral_joint_rotations: RawVector3Vector,
}

// ─── Behavior ─────────────────────────────────────────────────────────────────

/// Sparse coefficient matrix mapping control inputs to joint attribute rows.
///
/// `values` is row-major with `lods[0]` rows and `input_indices.len()` columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawJointGroup {
    pub lods: Vec<u16>,
    pub input_indices: Vec<u16>,
    pub output_indices: Vec<u16>,
    pub values: Vec<f32>,
    pub joint_indices: Vec<u16>,
}

impl RawJointGroup {
    pub fn column_count(&self) -> usize {
        self.input_indices.len()
    }

    pub fn row_count(&self) -> usize {
        self.output_indices.len()
    }

    /// Coefficients of one output row, if present.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        let columns = self.column_count();
        self.values.get(row * columns..(row + 1) * columns)
    }

    pub fn row_mut(&mut self, row: usize) -> Option<&mut [f32]> {
        let columns = self.column_count();
        self.values.get_mut(row * columns..(row + 1) * columns)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawJoints {
    pub row_count: u16,
    pub col_count: u16,
    pub joint_groups: Vec<RawJointGroup>,
}

/// Routing of control inputs to blend-shape channel outputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBlendShapeChannels {
    pub lods: Vec<u16>,
    pub input_indices: Vec<u16>,
    pub output_indices: Vec<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAnimatedMaps {
    pub lods: Vec<u16>,
    pub input_indices: Vec<u16>,
    pub output_indices: Vec<u16>,
    pub from_values: Vec<f32>,
    pub to_values: Vec<f32>,
    pub slope_values: Vec<f32>,
    pub cut_values: Vec<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBehavior {
    pub joints: RawJoints,
    pub blend_shape_channels: RawBlendShapeChannels,
    pub animated_maps: RawAnimatedMaps,
}

// ─── Geometry ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTextureCoordinates {
    pub us: Vec<f32>,
    pub vs: Vec<f32>,
}

/// Joint influences of a single vertex; both lists always have equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVertexSkinWeights {
    pub weights: Vec<f32>,
    pub joint_indices: Vec<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBlendShapeTarget {
    pub blend_shape_channel_index: u16,
    pub vertex_indices: Vec<u32>,
    pub deltas: RawVector3Vector,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMesh {
    pub positions: RawVector3Vector,
    pub texture_coordinates: RawTextureCoordinates,
    pub maximum_influence_per_vertex: u16,
    pub skin_weights: Vec<RawVertexSkinWeights>,
    pub blend_shape_targets: Vec<RawBlendShapeTarget>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGeometry {
    pub meshes: Vec<RawMesh>,
}

// ─── Whole rig ────────────────────────────────────────────────────────────────

/// Every layer of a rig, as persisted by `rig_file`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRig {
    pub descriptor: RawDescriptor,
    pub definition: RawDefinition,
    #[serde(default)]
    pub behavior: RawBehavior,
    #[serde(default)]
    pub geometry: RawGeometry,
}
