use thiserror::Error;

/// Contract violations detected by calibration commands.
///
/// A command returning one of these has aborted before touching the rig.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalibError {
    #[error("Number of set positions ({positions}) differs from number of set masks ({masks}).")]
    PositionsMasksCountMismatch { positions: usize, masks: usize },

    #[error("Number of set deltas ({deltas}) differs from number of set masks ({masks}).")]
    DeltasMasksCountMismatch { deltas: usize, masks: usize },

    #[error(
        "Number of set deltas ({deltas}) differs from number of set vertex indices ({vertex_indices})."
    )]
    DeltasVertexIndicesCountMismatch {
        deltas: usize,
        vertex_indices: usize,
    },

    #[error(
        "Number of set translations ({translations}) differs from number of set masks ({masks})."
    )]
    TranslationsMasksCountMismatch { translations: usize, masks: usize },

    #[error("Number of set rotations ({rotations}) differs from number of set masks ({masks}).")]
    RotationsMasksCountMismatch { rotations: usize, masks: usize },

    #[error(
        "Number of set skin weights ({weights}) differs from number of set joint indices ({joint_indices})."
    )]
    SkinWeightsJointIndicesCountMismatch {
        weights: usize,
        joint_indices: usize,
    },

    #[error("None of the requested LODs ({requested:?}) exist in a rig with {lod_count} LODs.")]
    InvalidLodSelection { requested: Vec<u16>, lod_count: u16 },
}

impl CalibError {
    /// Stable identifier of the failure, independent of the formatted message.
    pub fn code(&self) -> &'static str {
        match self {
            CalibError::PositionsMasksCountMismatch { .. } => "PositionsMasksCountMismatch",
            CalibError::DeltasMasksCountMismatch { .. } => "DeltasMasksCountMismatch",
            CalibError::DeltasVertexIndicesCountMismatch { .. } => {
                "DeltasVertexIndicesCountMismatch"
            }
            CalibError::TranslationsMasksCountMismatch { .. } => "TranslationsMasksCountMismatch",
            CalibError::RotationsMasksCountMismatch { .. } => "RotationsMasksCountMismatch",
            CalibError::SkinWeightsJointIndicesCountMismatch { .. } => {
                "SkinWeightsJointIndicesCountMismatch"
            }
            CalibError::InvalidLodSelection { .. } => "InvalidLodSelection",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_mask_mismatch_when_formatted_then_counts_are_embedded() {
        let error = CalibError::PositionsMasksCountMismatch {
            positions: 3,
            masks: 2,
        };

        assert_eq!(
            error.to_string(),
            "Number of set positions (3) differs from number of set masks (2)."
        );
        assert_eq!(error.code(), "PositionsMasksCountMismatch");
    }

    #[test]
    fn given_lod_selection_error_when_formatted_then_lod_count_is_included() {
        let error = CalibError::InvalidLodSelection {
            requested: vec![5, 6],
            lod_count: 2,
        };

        let message = error.to_string();
        assert!(message.contains("[5, 6]"));
        assert!(message.contains("2 LODs"));
        assert_eq!(error.code(), "InvalidLodSelection");
    }
}
