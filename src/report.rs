use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dna_calib_reader::DnaCalibReader;
use crate::reader::{DefinitionReader, DescriptorReader};
use crate::types::{INVALID_INDEX, RotationUnit, TranslationUnit};
use crate::uv_overlap::is_uv_map_overlapping;

const SKIN_WEIGHT_SUM_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(severity: Severity, code: &str, message: String) -> Self {
        Self {
            severity,
            code: code.to_string(),
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RigReport {
    pub name: String,
    pub translation_unit: TranslationUnit,
    pub rotation_unit: RotationUnit,
    pub lod_count: u16,
    pub joint_count: usize,
    pub joint_group_count: usize,
    pub blend_shape_channel_count: usize,
    pub mesh_count: usize,
    pub total_vertices: usize,
    pub total_blend_shape_targets: usize,
    pub issues: Vec<ValidationIssue>,
}

impl RigReport {
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }
}

/// Summarize a rig and check the cross-table invariants commands rely on.
pub fn analyze_rig(rig: &DnaCalibReader) -> RigReport {
    let mut issues = Vec::<ValidationIssue>::new();
    issues.extend(validate_definition(rig));
    issues.extend(validate_behavior(rig));
    issues.extend(validate_geometry(rig));

    let raw = rig.raw();
    let report = RigReport {
        name: rig.name().to_string(),
        translation_unit: rig.translation_unit(),
        rotation_unit: rig.rotation_unit(),
        lod_count: rig.lod_count(),
        joint_count: usize::from(rig.joint_count()),
        joint_group_count: raw.behavior.joints.joint_groups.len(),
        blend_shape_channel_count: usize::from(rig.blend_shape_channel_count()),
        mesh_count: raw.geometry.meshes.len(),
        total_vertices: raw.geometry.meshes.iter().map(|m| m.positions.len()).sum(),
        total_blend_shape_targets: raw
            .geometry
            .meshes
            .iter()
            .map(|m| m.blend_shape_targets.len())
            .sum(),
        issues,
    };
    debug!(issues = report.issues.len(), "analyzed rig");
    report
}

fn validate_definition(rig: &DnaCalibReader) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let definition = &rig.raw().definition;
    let joint_count = definition.joint_names.len();

    if definition.joint_hierarchy.len() != joint_count {
        issues.push(ValidationIssue::new(
            Severity::Error,
            "HIERARCHY_LENGTH",
            format!(
                "joint hierarchy has {} entries for {} joints",
                definition.joint_hierarchy.len(),
                joint_count
            ),
        ));
    }
    for (joint, parent) in definition.joint_hierarchy.iter().enumerate() {
        if *parent != INVALID_INDEX && usize::from(*parent) >= joint_count {
            issues.push(ValidationIssue::new(
                Severity::Error,
                "PARENT_OUT_OF_RANGE",
                format!("joint {} has parent {} outside the rig", joint, parent),
            ));
        }
    }

    for (label, len) in [
        ("translations", definition.neutral_joint_translations.len()),
        ("rotations", definition.neutral_joint_rotations.len()),
    ] {
        if len != joint_count {
            issues.push(ValidationIssue::new(
                Severity::Error,
                "NEUTRAL_POSE_LENGTH",
                format!("{} neutral {} for {} joints", len, label, joint_count),
            ));
        }
    }

    if definition.lod_joint_mapping.len() != usize::from(rig.lod_count()) {
        issues.push(ValidationIssue::new(
            Severity::Warning,
            "LOD_WINDOW_COUNT",
            format!(
                "{} joint LOD windows for {} LODs",
                definition.lod_joint_mapping.len(),
                rig.lod_count()
            ),
        ));
    }
    for (lod, window) in definition.lod_joint_mapping.iter().enumerate() {
        if let Some(joint) = window.iter().find(|joint| usize::from(**joint) >= joint_count) {
            issues.push(ValidationIssue::new(
                Severity::Error,
                "LOD_JOINT_OUT_OF_RANGE",
                format!("LOD {} references missing joint {}", lod, joint),
            ));
        }
    }

    issues
}

fn validate_behavior(rig: &DnaCalibReader) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (index, group) in rig.raw().behavior.joints.joint_groups.iter().enumerate() {
        let rows = group.lods.first().copied().map(usize::from).unwrap_or(0);
        if group.output_indices.len() != rows
            || group.values.len() != rows * group.input_indices.len()
        {
            issues.push(ValidationIssue::new(
                Severity::Error,
                "JOINT_GROUP_SHAPE",
                format!(
                    "joint group {} has {} outputs and {} values for {} rows x {} inputs",
                    index,
                    group.output_indices.len(),
                    group.values.len(),
                    rows,
                    group.input_indices.len()
                ),
            ));
        }
        if group.lods.windows(2).any(|pair| pair[1] > pair[0]) {
            issues.push(ValidationIssue::new(
                Severity::Warning,
                "JOINT_GROUP_LOD_ORDER",
                format!("joint group {} has increasing LOD row counts {:?}", index, group.lods),
            ));
        }
    }
    issues
}

fn validate_geometry(rig: &DnaCalibReader) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (index, mesh) in rig.raw().geometry.meshes.iter().enumerate() {
        let mismatched = mesh
            .skin_weights
            .iter()
            .filter(|skin| skin.weights.len() != skin.joint_indices.len())
            .count();
        if mismatched > 0 {
            issues.push(ValidationIssue::new(
                Severity::Error,
                "SKIN_WEIGHT_LENGTH",
                format!(
                    "mesh {} has {} vertices with mismatched weight/joint lists",
                    index, mismatched
                ),
            ));
        }

        let unnormalized = mesh
            .skin_weights
            .iter()
            .filter(|skin| !skin.weights.is_empty())
            .filter(|skin| {
                let sum: f32 = skin.weights.iter().sum();
                (sum - 1.0).abs() > SKIN_WEIGHT_SUM_TOLERANCE
            })
            .count();
        if unnormalized > 0 {
            issues.push(ValidationIssue::new(
                Severity::Warning,
                "SKIN_WEIGHT_SUM",
                format!(
                    "mesh {} has {} vertices whose weights do not sum to 1",
                    index, unnormalized
                ),
            ));
        }

        for (target_index, target) in mesh.blend_shape_targets.iter().enumerate() {
            if target.vertex_indices.len() != target.deltas.len() {
                issues.push(ValidationIssue::new(
                    Severity::Error,
                    "BLEND_SHAPE_TARGET_LENGTH",
                    format!(
                        "mesh {} target {} has {} vertex indices for {} deltas",
                        index,
                        target_index,
                        target.vertex_indices.len(),
                        target.deltas.len()
                    ),
                ));
            }
        }

        let uvs = &mesh.texture_coordinates;
        if is_uv_map_overlapping(&uvs.us, &uvs.vs, 1) {
            issues.push(ValidationIssue::new(
                Severity::Info,
                "UV_OVERLAP",
                format!("mesh {} has overlapping texture coordinates", index),
            ));
        }
    }
    issues
}
