//! Ordered mapping between original and visible row/column indices.

/// Bijection between original indices and compacted visible indices.
///
/// Hidden entries have no visible index. Visible indices are assigned in
/// ascending original order without gaps, so the mapping is strictly
/// monotonic on present entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleIndexMap {
    /// `to_visible[original]` is the visible index, `None` when hidden.
    to_visible: Vec<Option<usize>>,
    /// `to_original[visible]` is the original index.
    to_original: Vec<usize>,
}

impl VisibleIndexMap {
    /// Build the map for `len` original indices with the given hidden set.
    ///
    /// Hidden indices at or beyond `len` are ignored.
    pub fn new(len: usize, hidden: &[usize]) -> Self {
        let mut to_visible = Vec::with_capacity(len);
        let mut to_original = Vec::with_capacity(len);
        for original in 0..len {
            if hidden.contains(&original) {
                to_visible.push(None);
            } else {
                to_visible.push(Some(to_original.len()));
                to_original.push(original);
            }
        }
        Self {
            to_visible,
            to_original,
        }
    }

    /// Map with nothing hidden.
    pub fn identity(len: usize) -> Self {
        Self::new(len, &[])
    }

    /// Visible index for an original index, `None` if hidden or out of range.
    ///
    /// Accepts signed input because translated merge bounds may be negative.
    pub fn visible(&self, original: i64) -> Option<usize> {
        let original = usize::try_from(original).ok()?;
        self.to_visible.get(original).copied().flatten()
    }

    /// Original index for a visible index.
    pub fn original(&self, visible: usize) -> Option<usize> {
        self.to_original.get(visible).copied()
    }

    pub fn is_hidden(&self, original: usize) -> bool {
        matches!(self.to_visible.get(original), Some(None))
    }

    /// Number of original indices covered by the map.
    pub fn original_len(&self) -> usize {
        self.to_visible.len()
    }

    /// Number of visible indices.
    pub fn visible_len(&self) -> usize {
        self.to_original.len()
    }

    /// Original indices in visible order.
    pub fn visible_originals(&self) -> impl Iterator<Item = usize> + '_ {
        self.to_original.iter().copied()
    }

    /// Visible indices for the original half-open range `[start, end)`,
    /// skipping hidden and out-of-range entries.
    pub fn visible_in(&self, start: i64, end: i64) -> Vec<usize> {
        let start = usize::try_from(start).unwrap_or(0);
        let end = usize::try_from(end).unwrap_or(0).min(self.original_len());
        self.to_visible
            .get(start..end)
            .map(|slice| slice.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}
