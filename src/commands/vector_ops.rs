use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::vector3::RawVector3Vector;

/// How supplied values combine with the values already stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VectorOperation {
    #[default]
    Interpolate,
    Add,
    Subtract,
    Multiply,
}

impl VectorOperation {
    fn combine(self, existing: Vector3<f32>, supplied: Vector3<f32>) -> Vector3<f32> {
        match self {
            VectorOperation::Interpolate => supplied,
            VectorOperation::Add => existing + supplied,
            VectorOperation::Subtract => existing - supplied,
            VectorOperation::Multiply => existing.component_mul(&supplied),
        }
    }
}

/// Combine `supplied` into `existing` element by element.
///
/// An empty `existing` is simply replaced, whatever the operation. Otherwise
/// each element becomes `existing + (op(existing, supplied) - existing) * mask`
/// where a missing mask counts as 1. Elements past the end of either side are
/// left alone.
pub(super) fn apply_vector_operation(
    existing: &mut RawVector3Vector,
    supplied: &RawVector3Vector,
    masks: &[f32],
    operation: VectorOperation,
) {
    if existing.is_empty() {
        *existing = supplied.clone();
        return;
    }

    let count = existing.len().min(supplied.len());
    for index in 0..count {
        let (Some(current), Some(value)) = (existing.get(index), supplied.get(index)) else {
            continue;
        };
        let mask = masks.get(index).copied().unwrap_or(1.0);
        let combined = operation.combine(current, value);
        if mask == 1.0 {
            existing.set(index, combined);
        } else {
            existing.set(index, current + (combined - current) * mask);
        }
    }
}
