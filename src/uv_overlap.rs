//! Detection and separation of texture coordinates that land on the same spot.
//!
//! Two coordinates overlap when both components agree within
//! [`UV_TOLERANCE`]. Coordinates are bucketed into tolerance-sized grid
//! cells and only neighbouring cells are compared, so the cost stays close
//! to linear in the number of coordinates.

use std::collections::HashMap;

use tracing::debug;

/// Distance within which two texture coordinates count as the same point.
pub const UV_TOLERANCE: f32 = 1e-4;

fn grid_cell(u: f32, v: f32) -> (i64, i64) {
    (
        (u / UV_TOLERANCE).floor() as i64,
        (v / UV_TOLERANCE).floor() as i64,
    )
}

fn within_tolerance(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.0 - b.0).abs() <= UV_TOLERANCE && (a.1 - b.1).abs() <= UV_TOLERANCE
}

/// Flags, in order, every coordinate that repeats an earlier one.
///
/// A match can sit in the next cell over, so the 3x3 block around each
/// coordinate is searched.
fn repeated_coordinates(us: &[f32], vs: &[f32]) -> Vec<bool> {
    let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::with_capacity(us.len());
    let mut repeated = Vec::with_capacity(us.len());
    for (index, point) in us.iter().copied().zip(vs.iter().copied()).enumerate() {
        let (cell_u, cell_v) = grid_cell(point.0, point.1);
        let is_repeat = (-1..=1).any(|du| {
            (-1..=1).any(|dv| {
                cells
                    .get(&(cell_u + du, cell_v + dv))
                    .is_some_and(|earlier| {
                        earlier
                            .iter()
                            .any(|other| within_tolerance(point, (us[*other], vs[*other])))
                    })
            })
        });
        cells.entry((cell_u, cell_v)).or_default().push(index);
        repeated.push(is_repeat);
    }
    repeated
}

/// True when at least `min_overlap_count` coordinates repeat an earlier one.
///
/// Mismatched `us`/`vs` lengths never overlap.
pub fn is_uv_map_overlapping(us: &[f32], vs: &[f32], min_overlap_count: usize) -> bool {
    if us.len() != vs.len() {
        return false;
    }
    let overlaps = repeated_coordinates(us, vs)
        .into_iter()
        .filter(|repeated| *repeated)
        .count();
    overlaps >= min_overlap_count
}

/// Shifts every repeated coordinate by `(offset_u, offset_v)`.
///
/// The first coordinate at a given spot keeps its place; later ones move.
/// Returns how many coordinates were moved. Mismatched lengths move nothing.
pub fn offset_overlapping_uv_map_region(
    us: &mut [f32],
    vs: &mut [f32],
    offset_u: f32,
    offset_v: f32,
) -> usize {
    if us.len() != vs.len() {
        return 0;
    }

    let repeated = repeated_coordinates(us, vs);
    let mut moved = 0;
    for (index, is_repeat) in repeated.iter().enumerate() {
        if *is_repeat {
            us[index] += offset_u;
            vs[index] += offset_v;
            moved += 1;
        }
    }
    debug!(moved, offset_u, offset_v, "offset overlapping UVs");
    moved
}
