//! JSON calibration plans: an ordered list of commands stored on disk.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::commands::{
    ClearBlendShapesCommand, Command, CommandSequence, ConvertUnitsCommand,
    PruneBlendShapeTargetsCommand, RemoveJointAnimationCommand, RemoveJointCommand,
    RenameBlendShapeCommand, RenameJointCommand, RotateCommand, ScaleCommand,
    SetBlendShapeTargetDeltasCommand, SetLodsCommand, SetNeutralJointRotationsCommand,
    SetNeutralJointTranslationsCommand, SetSkinWeightsCommand, SetVertexPositionsCommand,
    TranslateCommand, VectorOperation,
};
use crate::types::{RotationUnit, TranslationUnit};
use crate::vector3::RawVector3Vector;

/// A joint or blend shape, addressed by index or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryRef {
    Index(u16),
    Name(String),
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlanStep {
    Translate {
        translation: [f32; 3],
    },
    Rotate {
        degrees: [f32; 3],
        #[serde(default)]
        origin: [f32; 3],
    },
    Scale {
        scale: f32,
        #[serde(default)]
        origin: [f32; 3],
    },
    ConvertUnits {
        translation_unit: TranslationUnit,
        rotation_unit: RotationUnit,
    },
    RemoveJoint {
        joint_indices: Vec<u16>,
    },
    RemoveJointAnimation {
        joint_indices: Vec<u16>,
    },
    ClearBlendShapes,
    PruneBlendShapeTargets {
        threshold: f32,
    },
    SetLods {
        lods: Vec<u16>,
    },
    RenameJoint {
        joint: EntryRef,
        new_name: String,
    },
    RenameBlendShape {
        blend_shape: EntryRef,
        new_name: String,
    },
    SetSkinWeights {
        mesh_index: u16,
        vertex_index: u32,
        weights: Vec<f32>,
        joint_indices: Vec<u16>,
    },
    SetVertexPositions {
        mesh_index: u16,
        positions: Vec<[f32; 3]>,
        #[serde(default)]
        masks: Vec<f32>,
        #[serde(default)]
        operation: VectorOperation,
    },
    SetNeutralJointTranslations {
        translations: Vec<[f32; 3]>,
        #[serde(default)]
        masks: Vec<f32>,
        #[serde(default)]
        operation: VectorOperation,
    },
    SetNeutralJointRotations {
        rotations: Vec<[f32; 3]>,
        #[serde(default)]
        masks: Vec<f32>,
        #[serde(default)]
        operation: VectorOperation,
    },
    SetBlendShapeTargetDeltas {
        mesh_index: u16,
        target_index: u16,
        deltas: Vec<[f32; 3]>,
        #[serde(default)]
        vertex_indices: Vec<u32>,
        #[serde(default)]
        masks: Vec<f32>,
        #[serde(default)]
        operation: VectorOperation,
    },
}

fn vectors(values: &[[f32; 3]]) -> RawVector3Vector {
    values.iter().map(|value| Vector3::from(*value)).collect()
}

impl PlanStep {
    /// Build the command this step describes.
    pub fn to_command(&self) -> Box<dyn Command> {
        match self {
            PlanStep::Translate { translation } => {
                Box::new(TranslateCommand::new(Vector3::from(*translation)))
            }
            PlanStep::Rotate { degrees, origin } => Box::new(RotateCommand::new(
                Vector3::from(*degrees),
                Vector3::from(*origin),
            )),
            PlanStep::Scale { scale, origin } => {
                Box::new(ScaleCommand::new(*scale, Vector3::from(*origin)))
            }
            PlanStep::ConvertUnits {
                translation_unit,
                rotation_unit,
            } => Box::new(ConvertUnitsCommand::new(*translation_unit, *rotation_unit)),
            PlanStep::RemoveJoint { joint_indices } => {
                Box::new(RemoveJointCommand::with_indices(joint_indices.clone()))
            }
            PlanStep::RemoveJointAnimation { joint_indices } => Box::new(
                RemoveJointAnimationCommand::with_indices(joint_indices.clone()),
            ),
            PlanStep::ClearBlendShapes => Box::new(ClearBlendShapesCommand::new()),
            PlanStep::PruneBlendShapeTargets { threshold } => {
                Box::new(PruneBlendShapeTargetsCommand::new(*threshold))
            }
            PlanStep::SetLods { lods } => Box::new(SetLodsCommand::new(lods.clone())),
            PlanStep::RenameJoint { joint, new_name } => Box::new(match joint {
                EntryRef::Index(index) => RenameJointCommand::by_index(*index, new_name.clone()),
                EntryRef::Name(name) => RenameJointCommand::by_name(name.clone(), new_name.clone()),
            }),
            PlanStep::RenameBlendShape {
                blend_shape,
                new_name,
            } => Box::new(match blend_shape {
                EntryRef::Index(index) => {
                    RenameBlendShapeCommand::by_index(*index, new_name.clone())
                }
                EntryRef::Name(name) => {
                    RenameBlendShapeCommand::by_name(name.clone(), new_name.clone())
                }
            }),
            PlanStep::SetSkinWeights {
                mesh_index,
                vertex_index,
                weights,
                joint_indices,
            } => Box::new(SetSkinWeightsCommand::new(
                *mesh_index,
                *vertex_index,
                weights.clone(),
                joint_indices.clone(),
            )),
            PlanStep::SetVertexPositions {
                mesh_index,
                positions,
                masks,
                operation,
            } => Box::new(SetVertexPositionsCommand::with_masks(
                *mesh_index,
                vectors(positions),
                masks.clone(),
                *operation,
            )),
            PlanStep::SetNeutralJointTranslations {
                translations,
                masks,
                operation,
            } => Box::new(SetNeutralJointTranslationsCommand::with_masks(
                vectors(translations),
                masks.clone(),
                *operation,
            )),
            PlanStep::SetNeutralJointRotations {
                rotations,
                masks,
                operation,
            } => Box::new(SetNeutralJointRotationsCommand::with_masks(
                vectors(rotations),
                masks.clone(),
                *operation,
            )),
            PlanStep::SetBlendShapeTargetDeltas {
                mesh_index,
                target_index,
                deltas,
                vertex_indices,
                masks,
                operation,
            } => Box::new(
                SetBlendShapeTargetDeltasCommand::new(
                    *mesh_index,
                    *target_index,
                    vectors(deltas),
                    *operation,
                )
                .with_vertex_indices(vertex_indices.clone())
                .with_masks(masks.clone()),
            ),
        }
    }
}

/// Persisted list of calibration steps used by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<PlanStep>,
}

impl CalibrationPlan {
    pub fn to_sequence(&self) -> CommandSequence {
        let mut sequence = CommandSequence::new();
        for step in &self.steps {
            sequence.add_boxed(step.to_command());
        }
        sequence
    }
}

/// Save a calibration plan to a JSON file.
pub fn save_plan(path: &Path, plan: &CalibrationPlan) -> Result<()> {
    let content =
        serde_json::to_string_pretty(plan).context("failed to serialize calibration plan as JSON")?;
    fs::write(path, content)
        .with_context(|| format!("failed to save calibration plan: {}", path.display()))?;
    Ok(())
}

/// Load a calibration plan from a JSON file.
pub fn load_plan(path: &Path) -> Result<CalibrationPlan> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to load calibration plan: {}", path.display()))?;
    let plan: CalibrationPlan =
        serde_json::from_str(&content).context("failed to parse calibration plan JSON")?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::fixture_rig;
    use crate::reader::{DefinitionReader, DescriptorReader};

    #[test]
    fn given_json_plan_when_parsing_then_tags_and_defaults_resolve() {
        let json = r#"{
            "steps": [
                {"command": "remove_joint", "joint_indices": [1, 2]},
                {"command": "scale", "scale": 2.0},
                {"command": "rename_joint", "joint": "JA", "new_name": "root"},
                {"command": "rename_blend_shape", "blend_shape": 0, "new_name": "blink"},
                {"command": "clear_blend_shapes"},
                {"command": "convert_units", "translation_unit": "m", "rotation_unit": "degrees"}
            ]
        }"#;

        let plan: CalibrationPlan = serde_json::from_str(json).expect("parse plan");

        assert_eq!(plan.steps.len(), 6);
        assert_eq!(
            plan.steps[1],
            PlanStep::Scale {
                scale: 2.0,
                origin: [0.0, 0.0, 0.0]
            }
        );
        assert_eq!(
            plan.steps[2],
            PlanStep::RenameJoint {
                joint: EntryRef::Name("JA".to_string()),
                new_name: "root".to_string()
            }
        );
        assert!(matches!(
            plan.steps[3],
            PlanStep::RenameBlendShape {
                blend_shape: EntryRef::Index(0),
                ..
            }
        ));
    }

    #[test]
    fn given_plan_when_running_sequence_then_steps_apply_in_order() {
        let plan = CalibrationPlan {
            description: None,
            steps: vec![
                PlanStep::RemoveJoint {
                    joint_indices: vec![1],
                },
                PlanStep::RenameJoint {
                    joint: EntryRef::Index(1),
                    new_name: "spine".to_string(),
                },
                PlanStep::SetLods { lods: vec![0] },
            ],
        };
        let mut rig = fixture_rig();

        plan.to_sequence().run(&mut rig).expect("plan should run");

        assert_eq!(rig.joint_count(), 3);
        assert_eq!(rig.joint_name(1), "spine");
        assert_eq!(rig.lod_count(), 1);
    }

    #[test]
    fn given_saved_plan_when_loading_then_steps_survive() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("plan.json");
        let plan = CalibrationPlan {
            description: Some("trim face".to_string()),
            steps: vec![
                PlanStep::PruneBlendShapeTargets { threshold: 0.01 },
                PlanStep::SetVertexPositions {
                    mesh_index: 0,
                    positions: vec![[1.0, 2.0, 3.0]],
                    masks: vec![],
                    operation: VectorOperation::Add,
                },
            ],
        };

        save_plan(&path, &plan).expect("save plan");
        let loaded = load_plan(&path).expect("load plan");

        assert_eq!(loaded, plan);
    }

    #[test]
    fn given_unknown_command_when_loading_then_parse_error_is_reported() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("plan.json");
        fs::write(&path, r#"{"steps": [{"command": "explode"}]}"#).expect("write plan");

        let error = load_plan(&path).expect_err("unknown command");

        assert!(format!("{error:#}").contains("failed to parse calibration plan JSON"));
    }
}
