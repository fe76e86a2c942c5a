//! Mutable, fully owned rig store that commands operate on.

use nalgebra::Vector3;

use crate::raw::{
    RawAnimatedMaps, RawBehavior, RawBlendShapeChannels, RawBlendShapeTarget, RawDefinition,
    RawDescriptor, RawGeometry, RawJointGroup, RawJoints, RawMesh, RawRig, RawTextureCoordinates,
    RawVertexSkinWeights,
};
use crate::reader::{BehaviorReader, DefinitionReader, DescriptorReader, GeometryReader, Reader};
use crate::types::{INVALID_INDEX, RotationUnit, TranslationUnit};
use crate::vector3::RawVector3Vector;

/// Writable superset of the [`Reader`] contract.
///
/// Construction deep-copies everything, so the store never aliases its
/// source. Bulk setters replace whole arrays at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnaCalibReader {
    rig: RawRig,
}

fn slice_of<T>(values: Option<&Vec<T>>) -> &[T] {
    values.map(Vec::as_slice).unwrap_or(&[])
}

fn name_of(names: &[String], index: u16) -> &str {
    names.get(usize::from(index)).map(String::as_str).unwrap_or("")
}

fn count_u16(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}

fn count_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl DnaCalibReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_raw(rig: RawRig) -> Self {
        Self { rig }
    }

    /// Deep-copy every layer the source provides.
    pub fn from_reader(source: &dyn Reader) -> Self {
        let lod_count = source.lod_count();
        let descriptor = RawDescriptor {
            name: source.name().to_string(),
            translation_unit: source.translation_unit(),
            rotation_unit: source.rotation_unit(),
            lod_count,
        };

        let per_lod = |f: &dyn Fn(u16) -> Vec<u16>| (0..lod_count).map(f).collect::<Vec<_>>();

        let definition = RawDefinition {
            raw_control_names: (0..source.raw_control_count())
                .map(|i| source.raw_control_name(i).to_string())
                .collect(),
            joint_names: (0..source.joint_count())
                .map(|i| source.joint_name(i).to_string())
                .collect(),
            joint_hierarchy: (0..source.joint_count())
                .map(|i| source.joint_parent_index(i))
                .collect(),
            lod_joint_mapping: per_lod(&|lod| source.joint_indices_for_lod(lod).to_vec()),
            blend_shape_channel_names: (0..source.blend_shape_channel_count())
                .map(|i| source.blend_shape_channel_name(i).to_string())
                .collect(),
            lod_blend_shape_mapping: per_lod(&|lod| {
                source.blend_shape_channel_indices_for_lod(lod).to_vec()
            }),
            animated_map_names: (0..source.animated_map_count())
                .map(|i| source.animated_map_name(i).to_string())
                .collect(),
            lod_animated_map_mapping: per_lod(&|lod| {
                source.animated_map_indices_for_lod(lod).to_vec()
            }),
            mesh_names: (0..source.mesh_count())
                .map(|i| source.mesh_name(i).to_string())
                .collect(),
            lod_mesh_mapping: per_lod(&|lod| source.mesh_indices_for_lod(lod).to_vec()),
            neutral_joint_translations: RawVector3Vector::from_axes(
                source.neutral_joint_translation_xs().to_vec(),
                source.neutral_joint_translation_ys().to_vec(),
                source.neutral_joint_translation_zs().to_vec(),
            ),
            neutral_joint_rotations: RawVector3Vector::from_axes(
                source.neutral_joint_rotation_xs().to_vec(),
                source.neutral_joint_rotation_ys().to_vec(),
                source.neutral_joint_rotation_zs().to_vec(),
            ),
        };

        let behavior = source
            .behavior()
            .map(copy_behavior)
            .unwrap_or_default();
        let geometry = source
            .geometry()
            .map(|geometry| copy_geometry(geometry, source.mesh_count()))
            .unwrap_or_default();

        Self::from_raw(RawRig {
            descriptor,
            definition,
            behavior,
            geometry,
        })
    }

    pub fn raw(&self) -> &RawRig {
        &self.rig
    }

    pub fn into_raw(self) -> RawRig {
        self.rig
    }

    pub(crate) fn raw_mut(&mut self) -> &mut RawRig {
        &mut self.rig
    }

    // ─── Lookup helpers ──────────────────────────────────────────────────────

    /// A joint is a root when it is its own parent or has no parent at all.
    pub fn is_root_joint(&self, index: u16) -> bool {
        match self.rig.definition.joint_hierarchy.get(usize::from(index)) {
            Some(&parent) => parent == index || parent == INVALID_INDEX,
            None => false,
        }
    }

    pub fn find_joint(&self, name: &str) -> Option<u16> {
        self.rig
            .definition
            .joint_names
            .iter()
            .position(|candidate| candidate == name)
            .map(count_u16)
    }

    pub fn find_blend_shape_channel(&self, name: &str) -> Option<u16> {
        self.rig
            .definition
            .blend_shape_channel_names
            .iter()
            .position(|candidate| candidate == name)
            .map(count_u16)
    }

    pub(crate) fn mesh(&self, mesh: u16) -> Option<&RawMesh> {
        self.rig.geometry.meshes.get(usize::from(mesh))
    }

    pub(crate) fn mesh_mut(&mut self, mesh: u16) -> Option<&mut RawMesh> {
        self.rig.geometry.meshes.get_mut(usize::from(mesh))
    }

    fn target(&self, mesh: u16, target: u16) -> Option<&RawBlendShapeTarget> {
        self.mesh(mesh)?
            .blend_shape_targets
            .get(usize::from(target))
    }

    fn joint_group(&self, group: u16) -> Option<&RawJointGroup> {
        self.rig.behavior.joints.joint_groups.get(usize::from(group))
    }

    fn joint_group_mut(&mut self, group: u16) -> Option<&mut RawJointGroup> {
        self.rig
            .behavior
            .joints
            .joint_groups
            .get_mut(usize::from(group))
    }

    // ─── Setters ─────────────────────────────────────────────────────────────

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.rig.descriptor.name = name.into();
    }

    pub fn set_translation_unit(&mut self, unit: TranslationUnit) {
        self.rig.descriptor.translation_unit = unit;
    }

    pub fn set_rotation_unit(&mut self, unit: RotationUnit) {
        self.rig.descriptor.rotation_unit = unit;
    }

    pub fn set_lod_count(&mut self, lod_count: u16) {
        self.rig.descriptor.lod_count = lod_count;
    }

    pub fn set_joint_name(&mut self, index: u16, name: impl Into<String>) {
        if let Some(slot) = self
            .rig
            .definition
            .joint_names
            .get_mut(usize::from(index))
        {
            *slot = name.into();
        }
    }

    pub fn set_joint_hierarchy(&mut self, parents: Vec<u16>) {
        self.rig.definition.joint_hierarchy = parents;
    }

    pub fn set_joint_indices_for_lod(&mut self, lod: u16, indices: Vec<u16>) {
        if let Some(slot) = self
            .rig
            .definition
            .lod_joint_mapping
            .get_mut(usize::from(lod))
        {
            *slot = indices;
        }
    }

    pub fn set_blend_shape_channel_name(&mut self, index: u16, name: impl Into<String>) {
        if let Some(slot) = self
            .rig
            .definition
            .blend_shape_channel_names
            .get_mut(usize::from(index))
        {
            *slot = name.into();
        }
    }

    pub fn set_neutral_joint_translations(&mut self, translations: RawVector3Vector) {
        self.rig.definition.neutral_joint_translations = translations;
    }

    pub fn set_neutral_joint_rotations(&mut self, rotations: RawVector3Vector) {
        self.rig.definition.neutral_joint_rotations = rotations;
    }

    pub fn set_joint_group_lods(&mut self, group: u16, lods: Vec<u16>) {
        if let Some(g) = self.joint_group_mut(group) {
            g.lods = lods;
        }
    }

    pub fn set_joint_group_input_indices(&mut self, group: u16, indices: Vec<u16>) {
        if let Some(g) = self.joint_group_mut(group) {
            g.input_indices = indices;
        }
    }

    pub fn set_joint_group_output_indices(&mut self, group: u16, indices: Vec<u16>) {
        if let Some(g) = self.joint_group_mut(group) {
            g.output_indices = indices;
        }
    }

    pub fn set_joint_group_values(&mut self, group: u16, values: Vec<f32>) {
        if let Some(g) = self.joint_group_mut(group) {
            g.values = values;
        }
    }

    pub fn set_joint_group_joint_indices(&mut self, group: u16, indices: Vec<u16>) {
        if let Some(g) = self.joint_group_mut(group) {
            g.joint_indices = indices;
        }
    }

    pub fn set_vertex_positions(&mut self, mesh: u16, positions: RawVector3Vector) {
        if let Some(m) = self.mesh_mut(mesh) {
            m.positions = positions;
        }
    }

    /// Replace the influence list of one vertex.
    ///
    /// The per-vertex table grows up to the mesh's vertex count when needed;
    /// vertices beyond both the table and the mesh are ignored.
    pub fn set_skin_weights(
        &mut self,
        mesh: u16,
        vertex: u32,
        weights: Vec<f32>,
        joint_indices: Vec<u16>,
    ) {
        let Some(m) = self.mesh_mut(mesh) else {
            return;
        };
        let vertex = vertex as usize;
        let capacity = m.skin_weights.len().max(m.positions.len());
        if vertex >= capacity {
            return;
        }
        if vertex >= m.skin_weights.len() {
            m.skin_weights
                .resize_with(vertex + 1, RawVertexSkinWeights::default);
        }
        m.skin_weights[vertex] = RawVertexSkinWeights {
            weights,
            joint_indices,
        };
    }

    pub fn set_blend_shape_target_deltas(
        &mut self,
        mesh: u16,
        target: u16,
        deltas: RawVector3Vector,
    ) {
        if let Some(t) = self
            .mesh_mut(mesh)
            .and_then(|m| m.blend_shape_targets.get_mut(usize::from(target)))
        {
            t.deltas = deltas;
        }
    }

    pub fn set_blend_shape_target_vertex_indices(
        &mut self,
        mesh: u16,
        target: u16,
        vertex_indices: Vec<u32>,
    ) {
        if let Some(t) = self
            .mesh_mut(mesh)
            .and_then(|m| m.blend_shape_targets.get_mut(usize::from(target)))
        {
            t.vertex_indices = vertex_indices;
        }
    }
}

fn copy_behavior(source: &dyn BehaviorReader) -> RawBehavior {
    let joint_groups = (0..source.joint_group_count())
        .map(|g| RawJointGroup {
            lods: source.joint_group_lods(g).to_vec(),
            input_indices: source.joint_group_input_indices(g).to_vec(),
            output_indices: source.joint_group_output_indices(g).to_vec(),
            values: source.joint_group_values(g).to_vec(),
            joint_indices: source.joint_group_joint_indices(g).to_vec(),
        })
        .collect();

    RawBehavior {
        joints: RawJoints {
            row_count: source.joint_row_count(),
            col_count: source.joint_column_count(),
            joint_groups,
        },
        blend_shape_channels: RawBlendShapeChannels {
            lods: source.blend_shape_channel_lods().to_vec(),
            input_indices: source.blend_shape_channel_input_indices().to_vec(),
            output_indices: source.blend_shape_channel_output_indices().to_vec(),
        },
        animated_maps: RawAnimatedMaps {
            lods: source.animated_map_lods().to_vec(),
            input_indices: source.animated_map_input_indices().to_vec(),
            output_indices: source.animated_map_output_indices().to_vec(),
            from_values: source.animated_map_from_values().to_vec(),
            to_values: source.animated_map_to_values().to_vec(),
            slope_values: source.animated_map_slope_values().to_vec(),
            cut_values: source.animated_map_cut_values().to_vec(),
        },
    }
}

fn copy_geometry(source: &dyn GeometryReader, mesh_count: u16) -> RawGeometry {
    let meshes = (0..mesh_count)
        .map(|mesh| RawMesh {
            positions: RawVector3Vector::from_axes(
                source.vertex_position_xs(mesh).to_vec(),
                source.vertex_position_ys(mesh).to_vec(),
                source.vertex_position_zs(mesh).to_vec(),
            ),
            texture_coordinates: RawTextureCoordinates {
                us: source.vertex_texture_coordinate_us(mesh).to_vec(),
                vs: source.vertex_texture_coordinate_vs(mesh).to_vec(),
            },
            maximum_influence_per_vertex: source.maximum_influence_per_vertex(mesh),
            skin_weights: (0..source.skin_weights_count(mesh))
                .map(|vertex| RawVertexSkinWeights {
                    weights: source.skin_weights_values(mesh, vertex).to_vec(),
                    joint_indices: source.skin_weights_joint_indices(mesh, vertex).to_vec(),
                })
                .collect(),
            blend_shape_targets: (0..source.blend_shape_target_count(mesh))
                .map(|target| RawBlendShapeTarget {
                    blend_shape_channel_index: source.blend_shape_channel_index(mesh, target),
                    vertex_indices: source.blend_shape_target_vertex_indices(mesh, target).to_vec(),
                    deltas: RawVector3Vector::from_axes(
                        source.blend_shape_target_delta_xs(mesh, target).to_vec(),
                        source.blend_shape_target_delta_ys(mesh, target).to_vec(),
                        source.blend_shape_target_delta_zs(mesh, target).to_vec(),
                    ),
                })
                .collect(),
        })
        .collect();

    RawGeometry { meshes }
}

// ─── Reader contract ──────────────────────────────────────────────────────────

impl DescriptorReader for DnaCalibReader {
    fn name(&self) -> &str {
        &self.rig.descriptor.name
    }

    fn translation_unit(&self) -> TranslationUnit {
        self.rig.descriptor.translation_unit
    }

    fn rotation_unit(&self) -> RotationUnit {
        self.rig.descriptor.rotation_unit
    }

    fn lod_count(&self) -> u16 {
        self.rig.descriptor.lod_count
    }
}

impl DefinitionReader for DnaCalibReader {
    fn raw_control_count(&self) -> u16 {
        count_u16(self.rig.definition.raw_control_names.len())
    }

    fn raw_control_name(&self, index: u16) -> &str {
        name_of(&self.rig.definition.raw_control_names, index)
    }

    fn joint_count(&self) -> u16 {
        count_u16(self.rig.definition.joint_names.len())
    }

    fn joint_name(&self, index: u16) -> &str {
        name_of(&self.rig.definition.joint_names, index)
    }

    fn joint_parent_index(&self, index: u16) -> u16 {
        self.rig
            .definition
            .joint_hierarchy
            .get(usize::from(index))
            .copied()
            .unwrap_or(INVALID_INDEX)
    }

    fn joint_indices_for_lod(&self, lod: u16) -> &[u16] {
        slice_of(self.rig.definition.lod_joint_mapping.get(usize::from(lod)))
    }

    fn blend_shape_channel_count(&self) -> u16 {
        count_u16(self.rig.definition.blend_shape_channel_names.len())
    }

    fn blend_shape_channel_name(&self, index: u16) -> &str {
        name_of(&self.rig.definition.blend_shape_channel_names, index)
    }

    fn blend_shape_channel_indices_for_lod(&self, lod: u16) -> &[u16] {
        slice_of(
            self.rig
                .definition
                .lod_blend_shape_mapping
                .get(usize::from(lod)),
        )
    }

    fn animated_map_count(&self) -> u16 {
        count_u16(self.rig.definition.animated_map_names.len())
    }

    fn animated_map_name(&self, index: u16) -> &str {
        name_of(&self.rig.definition.animated_map_names, index)
    }

    fn animated_map_indices_for_lod(&self, lod: u16) -> &[u16] {
        slice_of(
            self.rig
                .definition
                .lod_animated_map_mapping
                .get(usize::from(lod)),
        )
    }

    fn mesh_count(&self) -> u16 {
        count_u16(self.rig.definition.mesh_names.len())
    }

    fn mesh_name(&self, index: u16) -> &str {
        name_of(&self.rig.definition.mesh_names, index)
    }

    fn mesh_indices_for_lod(&self, lod: u16) -> &[u16] {
        slice_of(self.rig.definition.lod_mesh_mapping.get(usize::from(lod)))
    }

    fn neutral_joint_translation(&self, index: u16) -> Vector3<f32> {
        self.rig
            .definition
            .neutral_joint_translations
            .get(usize::from(index))
            .unwrap_or_else(Vector3::zeros)
    }

    fn neutral_joint_translation_xs(&self) -> &[f32] {
        &self.rig.definition.neutral_joint_translations.xs
    }

    fn neutral_joint_translation_ys(&self) -> &[f32] {
        &self.rig.definition.neutral_joint_translations.ys
    }

    fn neutral_joint_translation_zs(&self) -> &[f32] {
        &self.rig.definition.neutral_joint_translations.zs
    }

    fn neutral_joint_rotation(&self, index: u16) -> Vector3<f32> {
        self.rig
            .definition
            .neutral_joint_rotations
            .get(usize::from(index))
            .unwrap_or_else(Vector3::zeros)
    }

    fn neutral_joint_rotation_xs(&self) -> &[f32] {
        &self.rig.definition.neutral_joint_rotations.xs
    }

    fn neutral_joint_rotation_ys(&self) -> &[f32] {
        &self.rig.definition.neutral_joint_rotations.ys
    }

    fn neutral_joint_rotation_zs(&self) -> &[f32] {
        &self.rig.definition.neutral_joint_rotations.zs
    }
}

impl BehaviorReader for DnaCalibReader {
    fn joint_row_count(&self) -> u16 {
        self.rig.behavior.joints.row_count
    }

    fn joint_column_count(&self) -> u16 {
        self.rig.behavior.joints.col_count
    }

    fn joint_group_count(&self) -> u16 {
        count_u16(self.rig.behavior.joints.joint_groups.len())
    }

    fn joint_group_lods(&self, group: u16) -> &[u16] {
        slice_of(self.joint_group(group).map(|g| &g.lods))
    }

    fn joint_group_input_indices(&self, group: u16) -> &[u16] {
        slice_of(self.joint_group(group).map(|g| &g.input_indices))
    }

    fn joint_group_output_indices(&self, group: u16) -> &[u16] {
        slice_of(self.joint_group(group).map(|g| &g.output_indices))
    }

    fn joint_group_values(&self, group: u16) -> &[f32] {
        slice_of(self.joint_group(group).map(|g| &g.values))
    }

    fn joint_group_joint_indices(&self, group: u16) -> &[u16] {
        slice_of(self.joint_group(group).map(|g| &g.joint_indices))
    }

    fn blend_shape_channel_lods(&self) -> &[u16] {
        &self.rig.behavior.blend_shape_channels.lods
    }

    fn blend_shape_channel_input_indices(&self) -> &[u16] {
        &self.rig.behavior.blend_shape_channels.input_indices
    }

    fn blend_shape_channel_output_indices(&self) -> &[u16] {
        &self.rig.behavior.blend_shape_channels.output_indices
    }

    fn animated_map_lods(&self) -> &[u16] {
        &self.rig.behavior.animated_maps.lods
    }

    fn animated_map_input_indices(&self) -> &[u16] {
        &self.rig.behavior.animated_maps.input_indices
    }

    fn animated_map_output_indices(&self) -> &[u16] {
        &self.rig.behavior.animated_maps.output_indices
    }

    fn animated_map_from_values(&self) -> &[f32] {
        &self.rig.behavior.animated_maps.from_values
    }

    fn animated_map_to_values(&self) -> &[f32] {
        &self.rig.behavior.animated_maps.to_values
    }

    fn animated_map_slope_values(&self) -> &[f32] {
        &self.rig.behavior.animated_maps.slope_values
    }

    fn animated_map_cut_values(&self) -> &[f32] {
        &self.rig.behavior.animated_maps.cut_values
    }
}

impl GeometryReader for DnaCalibReader {
    fn vertex_position_count(&self, mesh: u16) -> u32 {
        self.mesh(mesh)
            .map(|m| count_u32(m.positions.len()))
            .unwrap_or(0)
    }

    fn vertex_position(&self, mesh: u16, vertex: u32) -> Vector3<f32> {
        self.mesh(mesh)
            .and_then(|m| m.positions.get(vertex as usize))
            .unwrap_or_else(Vector3::zeros)
    }

    fn vertex_position_xs(&self, mesh: u16) -> &[f32] {
        slice_of(self.mesh(mesh).map(|m| &m.positions.xs))
    }

    fn vertex_position_ys(&self, mesh: u16) -> &[f32] {
        slice_of(self.mesh(mesh).map(|m| &m.positions.ys))
    }

    fn vertex_position_zs(&self, mesh: u16) -> &[f32] {
        slice_of(self.mesh(mesh).map(|m| &m.positions.zs))
    }

    fn vertex_texture_coordinate_us(&self, mesh: u16) -> &[f32] {
        slice_of(self.mesh(mesh).map(|m| &m.texture_coordinates.us))
    }

    fn vertex_texture_coordinate_vs(&self, mesh: u16) -> &[f32] {
        slice_of(self.mesh(mesh).map(|m| &m.texture_coordinates.vs))
    }

    fn maximum_influence_per_vertex(&self, mesh: u16) -> u16 {
        self.mesh(mesh)
            .map(|m| m.maximum_influence_per_vertex)
            .unwrap_or(0)
    }

    fn skin_weights_count(&self, mesh: u16) -> u32 {
        self.mesh(mesh)
            .map(|m| count_u32(m.skin_weights.len()))
            .unwrap_or(0)
    }

    fn skin_weights_values(&self, mesh: u16, vertex: u32) -> &[f32] {
        slice_of(
            self.mesh(mesh)
                .and_then(|m| m.skin_weights.get(vertex as usize))
                .map(|w| &w.weights),
        )
    }

    fn skin_weights_joint_indices(&self, mesh: u16, vertex: u32) -> &[u16] {
        slice_of(
            self.mesh(mesh)
                .and_then(|m| m.skin_weights.get(vertex as usize))
                .map(|w| &w.joint_indices),
        )
    }

    fn blend_shape_target_count(&self, mesh: u16) -> u16 {
        self.mesh(mesh)
            .map(|m| count_u16(m.blend_shape_targets.len()))
            .unwrap_or(0)
    }

    fn blend_shape_channel_index(&self, mesh: u16, target: u16) -> u16 {
        self.target(mesh, target)
            .map(|t| t.blend_shape_channel_index)
            .unwrap_or(INVALID_INDEX)
    }

    fn blend_shape_target_delta_count(&self, mesh: u16, target: u16) -> u32 {
        self.target(mesh, target)
            .map(|t| count_u32(t.deltas.len()))
            .unwrap_or(0)
    }

    fn blend_shape_target_delta(&self, mesh: u16, target: u16, delta: u32) -> Vector3<f32> {
        self.target(mesh, target)
            .and_then(|t| t.deltas.get(delta as usize))
            .unwrap_or_else(Vector3::zeros)
    }

    fn blend_shape_target_delta_xs(&self, mesh: u16, target: u16) -> &[f32] {
        slice_of(self.target(mesh, target).map(|t| &t.deltas.xs))
    }

    fn blend_shape_target_delta_ys(&self, mesh: u16, target: u16) -> &[f32] {
        slice_of(self.target(mesh, target).map(|t| &t.deltas.ys))
    }

    fn blend_shape_target_delta_zs(&self, mesh: u16, target: u16) -> &[f32] {
        slice_of(self.target(mesh, target).map(|t| &t.deltas.zs))
    }

    fn blend_shape_target_vertex_indices(&self, mesh: u16, target: u16) -> &[u32] {
        slice_of(self.target(mesh, target).map(|t| &t.vertex_indices))
    }
}

impl Reader for DnaCalibReader {
    fn behavior(&self) -> Option<&dyn BehaviorReader> {
        Some(self)
    }

    fn geometry(&self) -> Option<&dyn GeometryReader> {
        Some(self)
    }
}
