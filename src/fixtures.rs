//! Small hand-built rig shared by unit tests.
//!
//! Four joints `JA`..`JD` with hierarchy `JA <- JB <- JC <- JD`, two LODs,
//! two joint groups, one mesh with four vertices and two blend-shape targets.

use nalgebra::Vector3;

use crate::dna_calib_reader::DnaCalibReader;
use crate::raw::{
    RawAnimatedMaps, RawBehavior, RawBlendShapeChannels, RawBlendShapeTarget, RawDefinition,
    RawDescriptor, RawGeometry, RawJointGroup, RawJoints, RawMesh, RawRig, RawTextureCoordinates,
    RawVertexSkinWeights,
};
use crate::types::{RotationUnit, TranslationUnit};
use crate::vector3::RawVector3Vector;

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn vectors(values: &[[f32; 3]]) -> RawVector3Vector {
    values
        .iter()
        .map(|[x, y, z]| Vector3::new(*x, *y, *z))
        .collect()
}

fn skin(weights: &[f32], joint_indices: &[u16]) -> RawVertexSkinWeights {
    RawVertexSkinWeights {
        weights: weights.to_vec(),
        joint_indices: joint_indices.to_vec(),
    }
}

pub(crate) fn fixture_raw_rig() -> RawRig {
    RawRig {
        descriptor: RawDescriptor {
            name: "fixture".to_string(),
            translation_unit: TranslationUnit::Cm,
            rotation_unit: RotationUnit::Degrees,
            lod_count: 2,
        },
        definition: RawDefinition {
            raw_control_names: names(&["c0", "c1", "c2"]),
            joint_names: names(&["JA", "JB", "JC", "JD"]),
            joint_hierarchy: vec![0, 0, 1, 2],
            lod_joint_mapping: vec![vec![0, 1, 2, 3], vec![0, 2]],
            blend_shape_channel_names: names(&["bs0", "bs1"]),
            lod_blend_shape_mapping: vec![vec![0, 1], vec![0]],
            animated_map_names: names(&["am0"]),
            lod_animated_map_mapping: vec![vec![0], vec![0]],
            mesh_names: names(&["head"]),
            lod_mesh_mapping: vec![vec![0], vec![0]],
            neutral_joint_translations: vectors(&[
                [1.0, 3.0, 4.0],
                [2.0, 4.0, 5.0],
                [3.0, 5.0, 6.0],
                [4.0, 6.0, 7.0],
            ]),
            neutral_joint_rotations: vectors(&[
                [0.0, 0.0, 0.0],
                [15.0, 30.0, 45.0],
                [10.0, 20.0, 30.0],
                [5.0, 0.0, 90.0],
            ]),
        },
        behavior: RawBehavior {
            joints: RawJoints {
                row_count: 36,
                col_count: 3,
                joint_groups: vec![
                    // JA tx, JA rx, JB ty, JB sx
                    RawJointGroup {
                        lods: vec![4, 2],
                        input_indices: vec![0, 1],
                        output_indices: vec![0, 3, 10, 15],
                        values: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
                        joint_indices: vec![0, 1],
                    },
                    // JC tx, JC ry, JD ty, JD sx
                    RawJointGroup {
                        lods: vec![4, 2],
                        input_indices: vec![2],
                        output_indices: vec![18, 22, 28, 33],
                        values: vec![0.5, 1.0, 1.5, 2.0],
                        joint_indices: vec![2, 3],
                    },
                ],
            },
            blend_shape_channels: RawBlendShapeChannels {
                lods: vec![2, 1],
                input_indices: vec![0, 1],
                output_indices: vec![0, 1],
            },
            animated_maps: RawAnimatedMaps {
                lods: vec![1, 1],
                input_indices: vec![2],
                output_indices: vec![0],
                from_values: vec![0.0],
                to_values: vec![1.0],
                slope_values: vec![1.0],
                cut_values: vec![0.0],
            },
        },
        geometry: RawGeometry {
            meshes: vec![RawMesh {
                positions: vectors(&[
                    [0.0, 0.0, 0.0],
                    [1.0, 0.0, 0.0],
                    [0.0, 1.0, 0.0],
                    [0.0, 0.0, 1.0],
                ]),
                texture_coordinates: RawTextureCoordinates {
                    us: vec![0.0, 0.5, 0.5, 1.0],
                    vs: vec![0.0, 0.5, 0.5, 1.0],
                },
                maximum_influence_per_vertex: 2,
                skin_weights: vec![
                    skin(&[1.0], &[0]),
                    skin(&[0.5, 0.5], &[0, 1]),
                    skin(&[0.25, 0.75], &[1, 2]),
                    skin(&[0.4, 0.6], &[2, 3]),
                ],
                blend_shape_targets: vec![
                    RawBlendShapeTarget {
                        blend_shape_channel_index: 0,
                        vertex_indices: vec![0, 1, 2],
                        deltas: vectors(&[[0.1, 0.0, 0.0], [0.0, 0.5, 0.0], [0.0, 0.0, 2.0]]),
                    },
                    RawBlendShapeTarget {
                        blend_shape_channel_index: 1,
                        vertex_indices: vec![3],
                        deltas: vectors(&[[1.0, 1.0, 1.0]]),
                    },
                ],
            }],
        },
    }
}

pub(crate) fn fixture_rig() -> DnaCalibReader {
    DnaCalibReader::from_raw(fixture_raw_rig())
}

/// Same rig with every joint parented to itself.
pub(crate) fn flat_fixture_rig() -> DnaCalibReader {
    let mut rig = fixture_raw_rig();
    rig.definition.joint_hierarchy = vec![0, 1, 2, 3];
    DnaCalibReader::from_raw(rig)
}
