use serde::{Deserialize, Serialize};

/// A rectangle in pixel coordinates, origin at the top-left of the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Clip this region to a `width` x `height` frame.
    ///
    /// Returns the half-open pixel span `(x0, y0, x1, y1)`, or `None` when
    /// nothing of the region lies inside the frame.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x1 = self.x.saturating_add(self.w).min(width);
        let y1 = self.y.saturating_add(self.h).min(height);
        if self.x >= x1 || self.y >= y1 {
            return None;
        }
        Some((self.x, self.y, x1, y1))
    }
}

/// One entry of the spec document: a 1-based inclusive frame range and the
/// regions to erase while it is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecItem {
    #[serde(rename = "startAt")]
    pub start_frame: u64,

    #[serde(rename = "endWith")]
    pub end_frame: u64,

    pub regions: Vec<Region>,
}

impl SpecItem {
    /// Whether this item applies to the 1-based frame `index`
    pub fn is_active(&self, index: u64) -> bool {
        (self.start_frame..=self.end_frame).contains(&index)
    }
}

/// Ordered list of spec items. Overlapping items combine as a union.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Spec {
    items: Vec<SpecItem>,
}

impl Spec {
    pub fn new(items: Vec<SpecItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[SpecItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All regions active at the 1-based frame `index`, in document order
    pub fn active_regions(&self, index: u64) -> impl Iterator<Item = &Region> {
        self.items
            .iter()
            .filter(move |item| item.is_active(index))
            .flat_map(|item| item.regions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_inside_frame() {
        let region = Region::new(2, 3, 4, 5);
        assert_eq!(region.clip_to(100, 100), Some((2, 3, 6, 8)));
    }

    #[test]
    fn test_clip_overhanging_frame() {
        let region = Region::new(8, 8, 10, 10);
        assert_eq!(region.clip_to(12, 10), Some((8, 8, 12, 10)));
    }

    #[test]
    fn test_clip_outside_frame() {
        assert_eq!(Region::new(20, 0, 5, 5).clip_to(20, 20), None);
        assert_eq!(Region::new(0, 30, 5, 5).clip_to(20, 20), None);
    }

    #[test]
    fn test_active_regions_inclusive_bounds() {
        let spec = Spec::new(vec![
            SpecItem { start_frame: 3, end_frame: 5, regions: vec![Region::new(0, 0, 10, 10)] },
            SpecItem { start_frame: 5, end_frame: 6, regions: vec![Region::new(1, 1, 2, 2)] },
        ]);

        assert_eq!(spec.active_regions(2).count(), 0);
        assert_eq!(spec.active_regions(3).count(), 1);
        assert_eq!(spec.active_regions(5).count(), 2);
        assert_eq!(spec.active_regions(6).count(), 1);
        assert_eq!(spec.active_regions(7).count(), 0);
    }
}
