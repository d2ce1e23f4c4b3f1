use core::cmp::Ordering;

use super::ZIndex;

/// Total paint-order key.
///
/// Ordering rules:
/// 1) `z`: ascending (back-to-front)
/// 2) `order`: ascending (traversal / insertion order for equal z)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.z.cmp(&other.z).then(self.order.cmp(&other.order))
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sorts `items` back-to-front.
///
/// Keys are unique once `order` is included, so an unstable sort is safe and
/// still yields the same order every frame.
pub fn sort_in_paint_order<T>(items: &mut [T], key: impl Fn(&T) -> SortKey) {
    items.sort_unstable_by_key(key);
}
