//! Input ordering for packing.

use std::cmp::Ordering;

use crate::packer::{Config, ImageInfo};

/// Stable sort of the inputs for both the size search and final placement.
///
/// Keys, all descending and gap-inclusive: longest side, area, height,
/// width.
pub(crate) fn sort_for_packing(images: &mut [&ImageInfo], cfg: &Config) {
    let gap2 = 2 * cfg.gap;

    images.sort_by(|a, b| {
        let (wa, ha) = (a.width + gap2, a.height + gap2);
        let (wb, hb) = (b.width + gap2, b.height + gap2);

        let ord = (wb.max(hb)).cmp(&wa.max(ha));
        if ord != Ordering::Equal {
            return ord;
        }

        let ord = (wb * hb).cmp(&(wa * ha));
        if ord != Ordering::Equal {
            return ord;
        }

        let ord = hb.cmp(&ha);
        if ord != Ordering::Equal {
            return ord;
        }

        wb.cmp(&wa)
    });
}
