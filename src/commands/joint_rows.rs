//! Row-level edits on joint-group coefficient matrices.

use crate::raw::RawJointGroup;
use crate::types::AttributeKind;

/// Keep only the rows whose output index satisfies `keep`.
///
/// Values of dropped rows go with them and every LOD boundary shrinks by
/// the number of dropped rows it used to cover. A group left without rows
/// also loses its input columns. Returns the number of dropped rows.
pub(super) fn retain_rows(group: &mut RawJointGroup, mut keep: impl FnMut(u16) -> bool) -> usize {
    let flags: Vec<bool> = group
        .output_indices
        .iter()
        .map(|output| keep(*output))
        .collect();
    let dropped = flags.iter().filter(|kept| !**kept).count();
    if dropped == 0 {
        return 0;
    }

    let mut values = Vec::with_capacity((flags.len() - dropped) * group.column_count());
    for (row, kept) in flags.iter().enumerate() {
        if *kept && let Some(coefficients) = group.row(row) {
            values.extend_from_slice(coefficients);
        }
    }

    for lod in group.lods.iter_mut() {
        let visible = usize::from(*lod).min(flags.len());
        let dropped_here = flags[..visible].iter().filter(|kept| !**kept).count();
        *lod = lod.saturating_sub(u16::try_from(dropped_here).unwrap_or(u16::MAX));
    }

    let mut flag = flags.iter();
    group
        .output_indices
        .retain(|_| flag.next().copied().unwrap_or(false));
    group.values = values;

    if group.output_indices.is_empty() {
        group.input_indices.clear();
        group.values.clear();
    }

    dropped
}

/// Multiply every row driving an attribute of `kind` by `factor`.
pub(super) fn scale_attribute_rows(groups: &mut [RawJointGroup], kind: AttributeKind, factor: f32) {
    for group in groups {
        for row in 0..group.row_count() {
            if AttributeKind::of_output_index(group.output_indices[row]) != kind {
                continue;
            }
            if let Some(coefficients) = group.row_mut(row) {
                coefficients.iter_mut().for_each(|value| *value *= factor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> RawJointGroup {
        RawJointGroup {
            lods: vec![4, 2, 1],
            input_indices: vec![0, 1],
            output_indices: vec![0, 3, 10, 15],
            values: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            joint_indices: vec![0, 1],
        }
    }

    #[test]
    fn given_rows_of_one_joint_when_retaining_then_lods_shrink_per_visibility() {
        let mut g = group();

        let dropped = retain_rows(&mut g, |output| output != 3 && output != 15);

        assert_eq!(dropped, 2);
        assert_eq!(g.output_indices, vec![0, 10]);
        assert_eq!(g.values, vec![1.0, 2.0, 5.0, 6.0]);
        assert_eq!(g.lods, vec![2, 1, 1]);
        assert_eq!(g.input_indices, vec![0, 1]);
    }

    #[test]
    fn given_every_row_dropped_when_retaining_then_group_is_emptied() {
        let mut g = group();

        let dropped = retain_rows(&mut g, |_| false);

        assert_eq!(dropped, 4);
        assert!(g.output_indices.is_empty());
        assert!(g.values.is_empty());
        assert!(g.input_indices.is_empty());
        assert_eq!(g.lods, vec![0, 0, 0]);
    }

    #[test]
    fn given_translation_kind_when_scaling_rows_then_other_rows_are_untouched() {
        let mut groups = vec![group()];

        scale_attribute_rows(&mut groups, AttributeKind::Translation, 10.0);

        assert_eq!(
            groups[0].values,
            vec![10.0, 20.0, 3.0, 4.0, 50.0, 60.0, 7.0, 8.0]
        );
    }
}
