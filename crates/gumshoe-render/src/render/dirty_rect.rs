use crate::coords::Rect;

/// Beyond this many rects per frame, a full redraw is cheaper.
pub const MAX_DIRTY_RECTS: usize = 100;
pub const DEFAULT_MERGE_THRESHOLD: f32 = 50.0;

/// Collects changed screen regions for one frame and merges nearby ones.
///
/// Usage per frame: `reset`, `add` every changed region, then redraw only
/// `optimized_rects()`.
#[derive(Debug, Clone)]
pub struct DirtyRectTracker {
    width: f32,
    height: f32,
    merge_threshold: f32,
    rects: Vec<Rect>,
    full_redraw: bool,
}

impl DirtyRectTracker {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_threshold(width, height, DEFAULT_MERGE_THRESHOLD)
    }

    /// Rects whose horizontal and vertical gaps are both within
    /// `merge_threshold` pixels are merged.
    pub fn with_threshold(width: f32, height: f32, merge_threshold: f32) -> Self {
        Self {
            width,
            height,
            merge_threshold,
            rects: Vec::new(),
            full_redraw: false,
        }
    }

    pub fn reset(&mut self) {
        self.rects.clear();
        self.full_redraw = false;
    }

    /// Records a changed region, clamped to the canvas. Zero-area regions are
    /// ignored.
    pub fn add(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let x = x.min(self.width).max(0.0);
        let y = y.min(self.height).max(0.0);
        let width = width.min(self.width - x).max(0.0);
        let height = height.min(self.height - y).max(0.0);
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        if self.full_redraw {
            return;
        }

        self.rects.push(Rect::new(x, y, width, height));
        if self.rects.len() > MAX_DIRTY_RECTS {
            self.mark_full_redraw();
        }
    }

    /// Replaces everything with one full-canvas rect.
    pub fn mark_full_redraw(&mut self) {
        self.full_redraw = true;
        self.rects.clear();
        self.rects.push(Rect::new(0.0, 0.0, self.width, self.height));
    }

    #[inline]
    pub fn is_full_redraw(&self) -> bool {
        self.full_redraw
    }

    /// Raw rects recorded this frame.
    #[inline]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Merges rects until no pair is within the threshold of another.
    pub fn optimized_rects(&self) -> Vec<Rect> {
        let mut merged = self.rects.clone();
        if self.full_redraw {
            return merged;
        }

        let mut changed = true;
        while changed && merged.len() > 1 {
            changed = false;
            let mut next = Vec::with_capacity(merged.len());

            let mut i = 0;
            while i < merged.len() {
                let mut rect = merged[i];
                let mut j = i + 1;
                while j < merged.len() {
                    if self.should_merge(rect, merged[j]) {
                        rect = rect.union(merged.remove(j));
                        changed = true;
                    } else {
                        j += 1;
                    }
                }
                next.push(rect);
                i += 1;
            }
            merged = next;
        }
        merged
    }

    fn should_merge(&self, a: Rect, b: Rect) -> bool {
        let gap = a.gap_to(b);
        gap.x <= self.merge_threshold && gap.y <= self.merge_threshold
    }

    #[inline]
    pub fn dirty_rect_count(&self) -> usize {
        self.rects.len()
    }

    pub fn optimized_rect_count(&self) -> usize {
        self.optimized_rects().len()
    }

    /// How many recorded rects merging saved, as a rounded percentage.
    pub fn reduction_percentage(&self) -> u32 {
        let original = self.rects.len();
        if original == 0 {
            return 0;
        }
        let optimized = self.optimized_rect_count();
        ((original - optimized) as f64 / original as f64 * 100.0).round() as u32
    }

    /// Adopts new canvas dimensions; everything must be redrawn.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.mark_full_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> DirtyRectTracker {
        DirtyRectTracker::new(800.0, 600.0)
    }

    #[test]
    fn clamps_to_canvas_and_skips_empty() {
        let mut t = tracker();
        t.add(-10.0, -10.0, 30.0, 30.0);
        t.add(790.0, 590.0, 50.0, 50.0);
        t.add(900.0, 10.0, 10.0, 10.0);
        t.add(10.0, 10.0, 0.0, 5.0);

        assert_eq!(t.rects(), [Rect::new(0.0, 0.0, 30.0, 30.0), Rect::new(790.0, 590.0, 10.0, 10.0)]);
    }

    #[test]
    fn nearby_rects_merge_into_bounding_box() {
        let mut t = tracker();
        t.add(0.0, 0.0, 10.0, 10.0);
        t.add(40.0, 0.0, 10.0, 10.0);

        assert_eq!(t.optimized_rects(), vec![Rect::new(0.0, 0.0, 50.0, 10.0)]);
        assert_eq!(t.reduction_percentage(), 50);
    }

    #[test]
    fn distant_rects_stay_separate() {
        let mut t = tracker();
        t.add(0.0, 0.0, 10.0, 10.0);
        t.add(500.0, 500.0, 10.0, 10.0);

        assert_eq!(t.optimized_rect_count(), 2);
        assert_eq!(t.reduction_percentage(), 0);
    }

    #[test]
    fn merging_cascades_until_stable() {
        let mut t = DirtyRectTracker::with_threshold(800.0, 600.0, 5.0);
        // `a` and `c` are too far apart until `b` bridges them.
        t.add(0.0, 0.0, 10.0, 10.0);
        t.add(30.0, 0.0, 10.0, 10.0);
        t.add(14.0, 0.0, 12.0, 10.0);

        assert_eq!(t.optimized_rects(), vec![Rect::new(0.0, 0.0, 40.0, 10.0)]);
        assert_eq!(t.reduction_percentage(), 67);
    }

    #[test]
    fn too_many_rects_switch_to_full_redraw() {
        let mut t = DirtyRectTracker::with_threshold(800.0, 600.0, 0.0);
        for i in 0..=MAX_DIRTY_RECTS {
            t.add((i % 20) as f32 * 40.0, (i / 20) as f32 * 40.0, 4.0, 4.0);
        }
        assert!(t.is_full_redraw());
        assert_eq!(t.optimized_rects(), vec![Rect::new(0.0, 0.0, 800.0, 600.0)]);
    }

    #[test]
    fn reset_and_resize() {
        let mut t = tracker();
        t.add(1.0, 1.0, 2.0, 2.0);
        t.reset();
        assert_eq!(t.dirty_rect_count(), 0);
        assert!(t.optimized_rects().is_empty());
        assert_eq!(t.reduction_percentage(), 0);

        t.resize(320.0, 240.0);
        assert!(t.is_full_redraw());
        assert_eq!(t.rects(), [Rect::new(0.0, 0.0, 320.0, 240.0)]);
    }
}
