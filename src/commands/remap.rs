use std::collections::BTreeSet;

/// Old-index to new-index table for a batch of removed joints.
///
/// Built once per removal so every dependent table (hierarchy, LOD windows,
/// joint groups, skin weights) sees the same compacted numbering.
#[derive(Debug, Clone)]
pub(super) struct JointRemap {
    mapping: Vec<Option<u16>>,
    removed: usize,
}

impl JointRemap {
    /// Indices at or beyond `joint_count` are ignored; duplicates count once.
    pub(super) fn new(joint_count: u16, removed_indices: &[u16]) -> Self {
        let removed_set: BTreeSet<u16> = removed_indices
            .iter()
            .copied()
            .filter(|index| *index < joint_count)
            .collect();

        let mut next = 0u16;
        let mapping = (0..joint_count)
            .map(|index| {
                if removed_set.contains(&index) {
                    None
                } else {
                    let new_index = next;
                    next += 1;
                    Some(new_index)
                }
            })
            .collect();

        Self {
            mapping,
            removed: removed_set.len(),
        }
    }

    pub(super) fn removed_count(&self) -> usize {
        self.removed
    }

    pub(super) fn surviving_count(&self) -> usize {
        self.mapping.len() - self.removed
    }

    /// New index of a surviving joint; `None` for removed or unknown joints.
    pub(super) fn get(&self, old_index: u16) -> Option<u16> {
        self.mapping.get(usize::from(old_index)).copied().flatten()
    }

    pub(super) fn is_removed(&self, old_index: u16) -> bool {
        matches!(self.mapping.get(usize::from(old_index)), Some(None))
    }

    pub(super) fn keeps(&self, old_index: usize) -> bool {
        matches!(self.mapping.get(old_index), Some(Some(_)))
    }
}
