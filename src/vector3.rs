//! Struct-of-arrays storage for 3D points and vectors.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when deserialized axis arrays disagree in length.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("axis arrays have different lengths (xs {xs}, ys {ys}, zs {zs})")]
pub struct UnevenAxesError {
    pub xs: usize,
    pub ys: usize,
    pub zs: usize,
}

#[derive(Deserialize)]
struct AxisArrays {
    xs: Vec<f32>,
    ys: Vec<f32>,
    zs: Vec<f32>,
}

/// Three parallel coordinate sequences of equal length.
///
/// Bulk per-axis slices are what the transform commands iterate over; single
/// elements are handed out as `nalgebra::Vector3<f32>`. Deserialization
/// rejects axes of different lengths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AxisArrays")]
pub struct RawVector3Vector {
    pub xs: Vec<f32>,
    pub ys: Vec<f32>,
    pub zs: Vec<f32>,
}

impl RawVector3Vector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from three axis arrays, truncating to the shortest one so the
    /// equal-length invariant always holds.
    pub fn from_axes(mut xs: Vec<f32>, mut ys: Vec<f32>, mut zs: Vec<f32>) -> Self {
        let len = xs.len().min(ys.len()).min(zs.len());
        xs.truncate(len);
        ys.truncate(len);
        zs.truncate(len);
        Self { xs, ys, zs }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vector3<f32>> {
        Some(Vector3::new(
            *self.xs.get(index)?,
            *self.ys.get(index)?,
            *self.zs.get(index)?,
        ))
    }

    /// Overwrite one element; out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: Vector3<f32>) {
        if let (Some(x), Some(y), Some(z)) = (
            self.xs.get_mut(index),
            self.ys.get_mut(index),
            self.zs.get_mut(index),
        ) {
            *x = value.x;
            *y = value.y;
            *z = value.z;
        }
    }

    pub fn push(&mut self, value: Vector3<f32>) {
        self.xs.push(value.x);
        self.ys.push(value.y);
        self.zs.push(value.z);
    }

    pub fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
        self.zs.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Vector3<f32>> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.zs)
            .map(|((x, y), z)| Vector3::new(*x, *y, *z))
    }

    /// Replace every element with `f(element)`.
    pub fn map_in_place(&mut self, mut f: impl FnMut(Vector3<f32>) -> Vector3<f32>) {
        let axes = self.xs.iter_mut().zip(&mut self.ys).zip(&mut self.zs);
        for ((x, y), z) in axes {
            let mapped = f(Vector3::new(*x, *y, *z));
            *x = mapped.x;
            *y = mapped.y;
            *z = mapped.z;
        }
    }

    /// Multiply every coordinate by `factor`.
    pub fn scale(&mut self, factor: f32) {
        for axis in [&mut self.xs, &mut self.ys, &mut self.zs] {
            axis.iter_mut().for_each(|value| *value *= factor);
        }
    }

    /// Keep only the elements whose index satisfies `keep`, preserving order.
    pub fn retain_indices(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let flags: Vec<bool> = (0..self.len()).map(&mut keep).collect();
        for axis in [&mut self.xs, &mut self.ys, &mut self.zs] {
            let mut flag = flags.iter();
            axis.retain(|_| flag.next().copied().unwrap_or(false));
        }
    }
}

impl TryFrom<AxisArrays> for RawVector3Vector {
    type Error = UnevenAxesError;

    fn try_from(AxisArrays { xs, ys, zs }: AxisArrays) -> Result<Self, Self::Error> {
        if xs.len() != ys.len() || xs.len() != zs.len() {
            return Err(UnevenAxesError {
                xs: xs.len(),
                ys: ys.len(),
                zs: zs.len(),
            });
        }
        Ok(Self { xs, ys, zs })
    }
}

impl FromIterator<Vector3<f32>> for RawVector3Vector {
    fn from_iter<I: IntoIterator<Item = Vector3<f32>>>(iter: I) -> Self {
        let mut out = RawVector3Vector::new();
        for value in iter {
            out.push(value);
        }
        out
    }
}

impl From<Vec<Vector3<f32>>> for RawVector3Vector {
    fn from(values: Vec<Vector3<f32>>) -> Self {
        values.into_iter().collect()
    }
}
