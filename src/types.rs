use serde::{Deserialize, Serialize};

// ─── Index conventions ────────────────────────────────────────────────────────

/// Sentinel used for "no index", most notably the parent of a root joint
/// whose parent was removed.
pub const INVALID_INDEX: u16 = u16::MAX;

/// Number of joint-group output rows reserved for every joint:
/// translation xyz, rotation xyz, scale xyz.
pub const ATTRIBUTES_PER_JOINT: u16 = 9;

/// Which transform channel a joint-group output row drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Translation,
    Rotation,
    Scale,
}

impl AttributeKind {
    /// Classify a joint-group output index by its position in the joint's
    /// attribute block.
    pub fn of_output_index(output_index: u16) -> Self {
        match output_index % ATTRIBUTES_PER_JOINT {
            0..=2 => AttributeKind::Translation,
            3..=5 => AttributeKind::Rotation,
            _ => AttributeKind::Scale,
        }
    }
}

/// Joint owning the attribute block an output index falls into.
pub fn joint_of_output_index(output_index: u16) -> u16 {
    output_index / ATTRIBUTES_PER_JOINT
}

// ─── Units ────────────────────────────────────────────────────────────────────

/// Unit of every length-valued field in a rig.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationUnit {
    #[default]
    Cm,
    M,
}

impl TranslationUnit {
    /// Multiplier that converts a length from `self` into `target`.
    pub fn factor_to(self, target: TranslationUnit) -> f32 {
        match (self, target) {
            (TranslationUnit::Cm, TranslationUnit::M) => 0.01,
            (TranslationUnit::M, TranslationUnit::Cm) => 100.0,
            _ => 1.0,
        }
    }
}

/// Unit of every angle-valued field in a rig.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationUnit {
    #[default]
    Degrees,
    Radians,
}

impl RotationUnit {
    /// Multiplier that converts an angle from `self` into `target`.
    pub fn factor_to(self, target: RotationUnit) -> f32 {
        match (self, target) {
            (RotationUnit::Degrees, RotationUnit::Radians) => std::f32::consts::PI / 180.0,
            (RotationUnit::Radians, RotationUnit::Degrees) => 180.0 / std::f32::consts::PI,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_output_indices_when_classifying_then_attribute_blocks_are_respected() {
        assert_eq!(AttributeKind::of_output_index(0), AttributeKind::Translation);
        assert_eq!(AttributeKind::of_output_index(2), AttributeKind::Translation);
        assert_eq!(AttributeKind::of_output_index(12), AttributeKind::Rotation);
        assert_eq!(AttributeKind::of_output_index(15), AttributeKind::Scale);
        assert_eq!(joint_of_output_index(15), 1);
        assert_eq!(joint_of_output_index(36), 4);
    }

    #[test]
    fn given_unit_pairs_when_computing_factor_then_conversion_is_symmetric() {
        let there = TranslationUnit::Cm.factor_to(TranslationUnit::M);
        let back = TranslationUnit::M.factor_to(TranslationUnit::Cm);
        assert!((there * back - 1.0).abs() < 1e-6);
        assert_eq!(TranslationUnit::Cm.factor_to(TranslationUnit::Cm), 1.0);

        let there = RotationUnit::Degrees.factor_to(RotationUnit::Radians);
        let back = RotationUnit::Radians.factor_to(RotationUnit::Degrees);
        assert!((there * back - 1.0).abs() < 1e-6);
        assert!((180.0 * there - std::f32::consts::PI).abs() < 1e-6);
    }
}
