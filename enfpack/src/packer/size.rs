//! Power-of-two atlas size search.

use crate::packer::maxrects::MaxRects;
use crate::packer::{Config, ImageInfo};

/// Find the best power-of-two atlas size for the given (sorted) inputs.
///
/// Candidates keep the binary log difference between axes at most 1 (or
/// exactly square under `force_square`), are scored by
/// `area * (1 + aspect_penalty * (aspect - 1))`, and tie-break toward the
/// wider atlas (taller under `prefer_height`). May return a size above
/// `max_size` when even the largest candidate cannot hold the widest input;
/// the caller turns that into an error.
pub(crate) fn find_optimal_size(images: &[&ImageInfo], cfg: &Config) -> (i32, i32) {
    let mut min_w = 0;
    let mut min_h = 0;
    for im in images {
        min_w = min_w.max(im.width + 2 * cfg.gap);
        min_h = min_h.max(im.height + 2 * cfg.gap);
    }

    let mut size = cfg.min_size;
    if min_w > size {
        size = next_power_of_two(min_w);
    }
    if min_h > size {
        size = next_power_of_two(min_h);
    }

    let mut best_w = size;
    let mut best_h = size;
    let mut best_score = f64::MAX;

    let mut try_size = |w: i32, h: i32| {
        if w > cfg.max_size || h > cfg.max_size {
            return;
        }
        if cfg.force_square {
            if w != h {
                return;
            }
        } else if abs_power_diff(w, h) > 1 {
            return;
        }
        if !can_fit(images, w, h, cfg) {
            return;
        }

        let aspect = f64::from(w.max(h)) / f64::from(w.min(h));
        let score = f64::from(w) * f64::from(h) * (1.0 + cfg.aspect_penalty * (aspect - 1.0));

        // Stable tie-break: default horizontal, prefer_height vertical.
        let wins_tie = (!cfg.prefer_height && w >= h) || (cfg.prefer_height && h >= w);
        if score < best_score || (score == best_score && wins_tie) {
            best_score = score;
            best_w = w;
            best_h = h;
        }
    };

    if cfg.force_square {
        let mut s = size;
        while s <= cfg.max_size {
            try_size(s, s);
            s *= 2;
        }
        return (best_w, best_h);
    }

    // The outer loop follows the preference so ties resolve the same way
    // regardless of enumeration order.
    if cfg.prefer_height {
        let mut w = size;
        while w <= cfg.max_size {
            let mut h = size;
            while h <= cfg.max_size {
                try_size(w, h);
                h *= 2;
            }
            w *= 2;
        }
    } else {
        let mut h = size;
        while h <= cfg.max_size {
            let mut w = size;
            while w <= cfg.max_size {
                try_size(w, h);
                w *= 2;
            }
            h *= 2;
        }
    }

    (best_w, best_h)
}

/// Feasibility probe: a fresh bin must accept every input with its gap halo.
fn can_fit(images: &[&ImageInfo], w: i32, h: i32, cfg: &Config) -> bool {
    let mut bin = MaxRects::new(w, h, cfg.allow_rotate);
    for im in images {
        let pw = im.width + 2 * cfg.gap;
        let ph = im.height + 2 * cfg.gap;
        if bin.insert(pw, ph, cfg.rule).is_none() {
            return false;
        }
    }
    true
}

/// Smallest power of two `>= n` (1 for non-positive input).
pub(crate) fn next_power_of_two(n: i32) -> i32 {
    if n <= 0 {
        return 1;
    }
    if n & (n - 1) == 0 {
        return n;
    }
    let mut p = 1;
    while p < n {
        p <<= 1;
    }
    p
}

/// Absolute difference of the binary log ceilings of two sizes.
fn abs_power_diff(a: i32, b: i32) -> i32 {
    (power_of_two_ceil(a) - power_of_two_ceil(b)).abs()
}

fn power_of_two_ceil(n: i32) -> i32 {
    if n <= 0 {
        return 0;
    }
    let mut p = 0;
    let mut v = 1;
    while v < n {
        v <<= 1;
        p += 1;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::Rule;
    use image::RgbaImage;

    fn info(name: &str, width: i32, height: i32) -> ImageInfo {
        ImageInfo {
            name: name.to_string(),
            width,
            height,
            image: RgbaImage::new(width as u32, height as u32),
        }
    }

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(2), 2);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(17), 32);
        assert_eq!(next_power_of_two(64), 64);
    }

    #[test]
    fn test_abs_power_diff() {
        assert_eq!(abs_power_diff(64, 64), 0);
        assert_eq!(abs_power_diff(64, 32), 1);
        assert_eq!(abs_power_diff(128, 32), 2);
    }

    #[test]
    fn test_force_square() {
        let images = [info("one", 40, 20)];
        let refs: Vec<&ImageInfo> = images.iter().collect();
        let cfg = Config {
            min_size: 16,
            max_size: 128,
            force_square: true,
            rule: Rule::BestShortSideFit,
            aspect_penalty: 0.0,
            ..Config::default()
        };

        let (w, h) = find_optimal_size(&refs, &cfg);
        assert_eq!(w, h, "force_square must yield a square");
        assert!(w >= 40, "atlas must hold the 40px input, got {w}");
    }

    #[test]
    fn test_prefer_height_tie_break() {
        let images = [info("a", 30, 20), info("b", 30, 20)];
        let refs: Vec<&ImageInfo> = images.iter().collect();
        let mut cfg = Config {
            min_size: 16,
            max_size: 64,
            aspect_penalty: 0.25,
            rule: Rule::BestShortSideFit,
            ..Config::default()
        };

        assert_eq!(find_optimal_size(&refs, &cfg), (64, 32));

        cfg.prefer_height = true;
        assert_eq!(find_optimal_size(&refs, &cfg), (32, 64));
    }

    #[test]
    fn test_axes_stay_near_square() {
        let images = [info("a", 100, 10)];
        let refs: Vec<&ImageInfo> = images.iter().collect();
        let cfg = Config {
            min_size: 16,
            max_size: 1024,
            aspect_penalty: 0.0,
            rule: Rule::BestShortSideFit,
            ..Config::default()
        };

        let (w, h) = find_optimal_size(&refs, &cfg);
        assert!(abs_power_diff(w, h) <= 1, "{w}x{h} is too elongated");
        assert!(w >= 100);
    }

    #[test]
    fn test_oversized_input_returns_above_max() {
        let images = [info("huge", 512, 512)];
        let refs: Vec<&ImageInfo> = images.iter().collect();
        let cfg = Config {
            min_size: 64,
            max_size: 256,
            rule: Rule::BestShortSideFit,
            ..Config::default()
        };

        let (w, h) = find_optimal_size(&refs, &cfg);
        assert!(w > 256 || h > 256);
    }
}
