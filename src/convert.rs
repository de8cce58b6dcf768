//! Alpha channel transfer between rasters and luma planes

use crate::image::ColorRange;
use crate::plane::PlaneMut;
use crate::raster::{A, BYTES_PER_PIXEL, Raster, RasterMut};

/// Scale a limited-range Y value to full range (8-bit)
#[inline]
fn limited_to_full_8(y: u8) -> u8 {
    // Limited range: Y ∈ [16, 235]
    // Full range: Y ∈ [0, 255]
    let y = y as i32;
    ((y - 16).max(0) * 255 / 219).min(255) as u8
}

/// Copy the alpha byte of every pixel into a luma plane
pub(crate) fn alpha_to_y8(raster: &Raster<'_>, y_plane: &mut PlaneMut<'_>) {
    for (y, row) in raster.rows().enumerate() {
        let dst = y_plane.row_mut(y);
        for (d, px) in dst.iter_mut().zip(row.chunks_exact(BYTES_PER_PIXEL)) {
            *d = px[A];
        }
    }
}

/// Write luma rows into the alpha byte of a raster, leaving color untouched
///
/// Rows and samples beyond the raster's extent are ignored.
pub(crate) fn add_alpha8<'a>(
    raster: &mut RasterMut<'_>,
    alpha_rows: impl Iterator<Item = &'a [u8]>,
    alpha_range: ColorRange,
) {
    for (alpha_row, img_row) in alpha_rows.zip(raster.rows_mut()) {
        for (&y, px) in alpha_row
            .iter()
            .zip(img_row.chunks_exact_mut(BYTES_PER_PIXEL))
        {
            px[A] = match alpha_range {
                ColorRange::Full => y,
                ColorRange::Limited => limited_to_full_8(y),
            };
        }
    }
}
