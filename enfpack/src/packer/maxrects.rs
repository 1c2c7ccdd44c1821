//! MaxRects bin packing.
//!
//! Maintains a set of free rectangles covering the unoccupied region of a
//! fixed-size bin. Placing a rectangle splits every overlapping free
//! rectangle into up to four residual slabs, then prunes free rectangles
//! contained in another. Rectangles are plain values; nothing relies on
//! identity.

use crate::packer::Rule;

/// A rectangle in atlas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub rotated: bool,
}

pub(crate) struct MaxRects {
    used: Vec<Rect>,
    free: Vec<Rect>,
    w: i32,
    h: i32,
    allow_rotate: bool,
}

impl MaxRects {
    pub fn new(w: i32, h: i32, allow_rotate: bool) -> MaxRects {
        let mut free = Vec::with_capacity(128);
        free.push(Rect {
            x: 0,
            y: 0,
            w,
            h,
            rotated: false,
        });

        MaxRects {
            used: Vec::with_capacity(128),
            free,
            w,
            h,
            allow_rotate,
        }
    }

    /// Place a `w`×`h` rectangle under the given rule.
    ///
    /// Both orientations are scored when rotation is allowed; the candidate
    /// with the lexicographically smallest `(primary, secondary)` score
    /// wins. Returns `None` when nothing fits.
    pub fn insert(&mut self, w: i32, h: i32, rule: Rule) -> Option<Rect> {
        let mut best = Rect::default();
        let mut pri = i32::MAX;
        let mut sec = i32::MAX;
        let mut found = false;

        for i in 0..self.free.len() {
            let fr = self.free[i];

            if fr.w >= w && fr.h >= h {
                let (p, s) = self.score(rule, fr, w, h);
                if p < pri || (p == pri && s < sec) {
                    pri = p;
                    sec = s;
                    best = Rect {
                        x: fr.x,
                        y: fr.y,
                        w,
                        h,
                        rotated: false,
                    };
                    found = true;
                }
            }

            if self.allow_rotate && fr.w >= h && fr.h >= w {
                let (p, s) = self.score(rule, fr, h, w);
                if p < pri || (p == pri && s < sec) {
                    pri = p;
                    sec = s;
                    best = Rect {
                        x: fr.x,
                        y: fr.y,
                        w: h,
                        h: w,
                        rotated: true,
                    };
                    found = true;
                }
            }
        }

        if !found {
            return None;
        }

        self.place(best);
        Some(best)
    }

    fn place(&mut self, used: Rect) {
        let mut i = 0;
        while i < self.free.len() {
            if self.split_free(i, used) {
                self.free.remove(i);
            } else {
                i += 1;
            }
        }

        self.prune_free();
        self.used.push(used);
    }

    fn score(&self, rule: Rule, fr: Rect, rw: i32, rh: i32) -> (i32, i32) {
        let leftover_h = (fr.w - rw).abs();
        let leftover_v = (fr.h - rh).abs();
        let short_side = leftover_h.min(leftover_v);
        let long_side = leftover_h.max(leftover_v);

        match rule {
            Rule::BestShortSideFit => (short_side, long_side),
            Rule::BestLongSideFit => (long_side, short_side),
            Rule::BestAreaFit => (fr.w * fr.h - rw * rh, short_side),
            // primary: top edge Y, secondary: X
            Rule::BottomLeft => (fr.y + rh, fr.x),
            // maximize contact => minimize its negation
            Rule::ContactPoint => (-self.contact_score(fr.x, fr.y, rw, rh), 0),
        }
    }

    /// Perimeter length touching the bin walls plus edges shared with
    /// already-placed rectangles.
    fn contact_score(&self, x: i32, y: i32, w: i32, h: i32) -> i32 {
        let mut score = 0;
        if x == 0 || x + w == self.w {
            score += h;
        }
        if y == 0 || y + h == self.h {
            score += w;
        }

        for u in &self.used {
            if u.x == x + w || u.x + u.w == x {
                score += common_interval(u.y, u.y + u.h, y, y + h);
            }
            if u.y == y + h || u.y + u.h == y {
                score += common_interval(u.x, u.x + u.w, x, x + w);
            }
        }

        score
    }

    /// Split a free rectangle against a placement, appending the residual
    /// slabs. Returns whether the two overlapped (and the free rectangle
    /// must be dropped).
    fn split_free(&mut self, free_idx: usize, used: Rect) -> bool {
        let fr = self.free[free_idx];

        // Separating axis: no overlap, nothing to split.
        if used.x >= fr.x + fr.w
            || used.x + used.w <= fr.x
            || used.y >= fr.y + fr.h
            || used.y + used.h <= fr.y
        {
            return false;
        }

        if used.x < fr.x + fr.w && used.x + used.w > fr.x {
            // top slab
            if used.y > fr.y && used.y < fr.y + fr.h {
                self.free.push(Rect {
                    x: fr.x,
                    y: fr.y,
                    w: fr.w,
                    h: used.y - fr.y,
                    rotated: false,
                });
            }
            // bottom slab
            if used.y + used.h < fr.y + fr.h {
                self.free.push(Rect {
                    x: fr.x,
                    y: used.y + used.h,
                    w: fr.w,
                    h: fr.y + fr.h - (used.y + used.h),
                    rotated: false,
                });
            }
        }

        if used.y < fr.y + fr.h && used.y + used.h > fr.y {
            // left slab
            if used.x > fr.x && used.x < fr.x + fr.w {
                self.free.push(Rect {
                    x: fr.x,
                    y: fr.y,
                    w: used.x - fr.x,
                    h: fr.h,
                    rotated: false,
                });
            }
            // right slab
            if used.x + used.w < fr.x + fr.w {
                self.free.push(Rect {
                    x: used.x + used.w,
                    y: fr.y,
                    w: fr.x + fr.w - (used.x + used.w),
                    h: fr.h,
                    rotated: false,
                });
            }
        }

        true
    }

    /// Drop every free rectangle contained in another free rectangle.
    fn prune_free(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let mut removed_i = false;
            let mut j = i + 1;
            while j < self.free.len() {
                let a = self.free[i];
                let b = self.free[j];
                if contained_in(a, b) {
                    self.free.remove(i);
                    removed_i = true;
                    break;
                }
                if contained_in(b, a) {
                    self.free.remove(j);
                } else {
                    j += 1;
                }
            }
            if !removed_i {
                i += 1;
            }
        }
    }

    #[cfg(test)]
    fn free_rects(&self) -> &[Rect] {
        &self.free
    }
}

fn common_interval(a0: i32, a1: i32, b0: i32, b1: i32) -> i32 {
    if a1 <= b0 || b1 <= a0 {
        return 0;
    }
    a1.min(b1) - a0.max(b0)
}

fn contained_in(a: Rect, b: Rect) -> bool {
    a.x >= b.x && a.y >= b.y && a.x + a.w <= b.x + b.w && a.y + a.h <= b.y + b.h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: Rect, b: Rect) -> bool {
        a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
    }

    #[test]
    fn test_insert_into_empty_bin() {
        let mut bin = MaxRects::new(64, 64, false);
        let rect = bin.insert(10, 20, Rule::BestShortSideFit).unwrap();
        assert_eq!((rect.x, rect.y, rect.w, rect.h), (0, 0, 10, 20));
        assert!(!rect.rotated);
    }

    #[test]
    fn test_insert_too_large_fails() {
        let mut bin = MaxRects::new(16, 16, false);
        assert!(bin.insert(17, 4, Rule::BestShortSideFit).is_none());
        assert!(bin.insert(4, 17, Rule::BestShortSideFit).is_none());
    }

    #[test]
    fn test_rotation_allows_tall_rect_in_wide_bin() {
        let mut bin = MaxRects::new(32, 8, true);
        let rect = bin.insert(4, 20, Rule::BestShortSideFit).unwrap();
        assert!(rect.rotated);
        assert_eq!((rect.w, rect.h), (20, 4));
    }

    #[test]
    fn test_rotation_disabled_fails_for_tall_rect() {
        let mut bin = MaxRects::new(32, 8, false);
        assert!(bin.insert(4, 20, Rule::BestShortSideFit).is_none());
    }

    #[test]
    fn test_placements_never_overlap() {
        for rule in [
            Rule::BestShortSideFit,
            Rule::BestLongSideFit,
            Rule::BestAreaFit,
            Rule::BottomLeft,
            Rule::ContactPoint,
        ] {
            let mut bin = MaxRects::new(64, 64, false);
            let sizes = [(20, 30), (30, 10), (15, 15), (8, 40), (25, 5), (12, 12)];
            let mut placed = Vec::new();
            for (w, h) in sizes {
                if let Some(r) = bin.insert(w, h, rule) {
                    placed.push(r);
                }
            }
            assert!(!placed.is_empty());
            for i in 0..placed.len() {
                assert!(
                    placed[i].x >= 0
                        && placed[i].y >= 0
                        && placed[i].x + placed[i].w <= 64
                        && placed[i].y + placed[i].h <= 64,
                    "rule {rule:?}: out of bounds: {:?}",
                    placed[i]
                );
                for j in i + 1..placed.len() {
                    assert!(
                        !overlaps(placed[i], placed[j]),
                        "rule {rule:?}: {:?} overlaps {:?}",
                        placed[i],
                        placed[j]
                    );
                }
            }
        }
    }

    #[test]
    fn test_free_rects_stay_inside_bin_and_uncontained() {
        let mut bin = MaxRects::new(64, 64, false);
        for (w, h) in [(20, 30), (30, 10), (15, 15)] {
            bin.insert(w, h, Rule::BestAreaFit).unwrap();
        }

        let free = bin.free_rects().to_vec();
        for (i, a) in free.iter().enumerate() {
            assert!(a.x >= 0 && a.y >= 0 && a.x + a.w <= 64 && a.y + a.h <= 64);
            for (j, b) in free.iter().enumerate() {
                if i != j {
                    assert!(
                        !contained_in(*a, *b),
                        "free rect {a:?} is contained in {b:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_bottom_left_prefers_lowest_then_leftmost() {
        let mut bin = MaxRects::new(64, 64, false);
        let first = bin.insert(10, 10, Rule::BottomLeft).unwrap();
        assert_eq!((first.x, first.y), (0, 0));
        let second = bin.insert(10, 10, Rule::BottomLeft).unwrap();
        // Same top edge as the first, next to it.
        assert_eq!(second.y, 0);
        assert_eq!(second.x, 10);
    }

    #[test]
    fn test_contact_point_hugs_walls() {
        let mut bin = MaxRects::new(64, 64, false);
        bin.insert(10, 10, Rule::ContactPoint).unwrap();
        let second = bin.insert(10, 10, Rule::ContactPoint).unwrap();
        // Touching both the wall and the first rectangle beats a free-floating spot.
        let touches_used = second.x == 10 || second.y == 10;
        let touches_wall = second.x == 0 || second.y == 0;
        assert!(touches_used && touches_wall, "placement {second:?}");
    }

    #[test]
    fn test_common_interval() {
        assert_eq!(common_interval(0, 10, 5, 15), 5);
        assert_eq!(common_interval(0, 10, 10, 20), 0);
        assert_eq!(common_interval(0, 10, 2, 8), 6);
        assert_eq!(common_interval(5, 6, 0, 100), 1);
    }

    #[test]
    fn test_contained_in_is_tight() {
        let a = Rect { x: 1, y: 1, w: 2, h: 2, rotated: false };
        let b = Rect { x: 0, y: 0, w: 4, h: 4, rotated: false };
        assert!(contained_in(a, b));
        assert!(!contained_in(b, a));
        assert!(contained_in(a, a));
    }

    #[test]
    fn test_fills_bin_exactly() {
        // Four quadrants tile a 32x32 bin completely.
        let mut bin = MaxRects::new(32, 32, false);
        for _ in 0..4 {
            assert!(bin.insert(16, 16, Rule::BestShortSideFit).is_some());
        }
        assert!(bin.insert(1, 1, Rule::BestShortSideFit).is_none());
    }
}
