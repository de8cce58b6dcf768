//! YUV to BGRA color space conversion
//!
//! Decoded planes are upsampled with nearest-neighbor chroma and written
//! into a caller-owned raster. Only the part of the image covered by the
//! raster is converted.
//!
//! References:
//! - ITU-R BT.601 (SD video)
//! - ITU-R BT.709 (HD video)
//! - ITU-R BT.2020 (UHD video)

use crate::chroma::{Yuv, yuv_420_rows, yuv_422_rows, yuv_444_rows};
use crate::coefficients::YuvCoefficients;
use crate::image::ColorRange;
use crate::planar::{PixelFormat, PlaneIndex, PlanarImage};
use crate::raster::{A, B, BYTES_PER_PIXEL, G, R, RasterMut};

/// Per-sample YUV to RGB transform for one matrix and range
#[derive(Debug, Clone, Copy)]
struct YuvToRgb {
    kr: f32,
    kg: f32,
    kb: f32,
    range: ColorRange,
}

impl YuvToRgb {
    /// Luma (or identity channel) in [0, 1]
    #[inline]
    fn norm_luma(&self, y: u8) -> f32 {
        match self.range {
            ColorRange::Full => y as f32 / 255.0,
            ColorRange::Limited => (y as f32 - 16.0) / 219.0,
        }
    }

    /// Chroma centred on zero
    ///
    /// Full range undoes the encoder's +0.5 bias on the unit scale.
    #[inline]
    fn norm_chroma(&self, c: u8) -> f32 {
        match self.range {
            ColorRange::Full => c as f32 / 255.0 - 0.5,
            ColorRange::Limited => (c as f32 - 128.0) / 224.0,
        }
    }

    /// Formula:
    /// ```text
    /// R = Y + 2 * (1 - Kr) * V
    /// B = Y + 2 * (1 - Kb) * U
    /// G = (Y - Kr * R - Kb * B) / Kg
    /// ```
    #[inline]
    fn rgb(&self, px: Yuv<u8>) -> [u8; 3] {
        let y = self.norm_luma(px.y);
        let u = self.norm_chroma(px.u);
        let v = self.norm_chroma(px.v);

        let r = y + 2.0 * (1.0 - self.kr) * v;
        let b = y + 2.0 * (1.0 - self.kb) * u;
        let g = (y - self.kr * r - self.kb * b) / self.kg;

        [to_u8(r), to_u8(g), to_u8(b)]
    }

    /// Y/U/V hold G/B/R
    #[inline]
    fn identity(&self, px: Yuv<u8>) -> [u8; 3] {
        [
            to_u8(self.norm_luma(px.v)),
            to_u8(self.norm_luma(px.y)),
            to_u8(self.norm_luma(px.u)),
        ]
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[inline]
fn store(px: &mut [u8], [r, g, b]: [u8; 3]) {
    px[R] = r;
    px[G] = g;
    px[B] = b;
    px[A] = 255;
}

fn write_rows<I: Iterator<Item = Yuv<u8>>>(
    rows: impl Iterator<Item = I>,
    raster: &mut RasterMut<'_>,
    convert: impl Fn(Yuv<u8>) -> [u8; 3],
) {
    for (src, dst) in rows.zip(raster.rows_mut()) {
        for (px, out) in src.zip(dst.chunks_exact_mut(BYTES_PER_PIXEL)) {
            store(out, convert(px));
        }
    }
}

/// Convert a decoded image into opaque BGRA
///
/// The image must be at least as large as the raster. Monochrome images
/// (luma-only layout or monochrome flag) are written as gray.
pub(crate) fn yuv_to_bgra8(
    image: &PlanarImage,
    coefficients: &YuvCoefficients,
    raster: &mut RasterMut<'_>,
) {
    let transform = YuvToRgb {
        kr: coefficients.kr,
        kg: coefficients.kg,
        kb: coefficients.kb,
        range: image.range(),
    };

    let y = image.plane(PlaneIndex::Y);
    if image.is_monochrome() || image.format() == PixelFormat::I400 {
        for (src, dst) in y.rows().zip(raster.rows_mut()) {
            for (&luma, out) in src.iter().zip(dst.chunks_exact_mut(BYTES_PER_PIXEL)) {
                let gray = to_u8(transform.norm_luma(luma));
                store(out, [gray; 3]);
            }
        }
        return;
    }

    let u = image.plane(PlaneIndex::U);
    let v = image.plane(PlaneIndex::V);
    let convert = |px: Yuv<u8>| {
        if coefficients.is_identity() {
            transform.identity(px)
        } else {
            transform.rgb(px)
        }
    };

    match image.format() {
        PixelFormat::I444 => {
            write_rows(yuv_444_rows(y.rows(), u.rows(), v.rows()), raster, convert)
        }
        PixelFormat::I422 => {
            write_rows(yuv_422_rows(y.rows(), u.rows(), v.rows()), raster, convert)
        }
        PixelFormat::I420 => {
            write_rows(yuv_420_rows(y.rows(), u.rows(), v.rows()), raster, convert)
        }
        PixelFormat::I400 => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::yuv_coefficients;
    use crate::image::{ChromaSubsampling, ColorConversionInfo};
    use crate::planar::{HeapAllocator, color_image};
    use crate::raster::Raster;

    const BT601: YuvToRgb = YuvToRgb {
        kr: 0.299,
        kg: 0.587,
        kb: 0.114,
        range: ColorRange::Full,
    };

    fn yuv(y: u8, u: u8, v: u8) -> Yuv<u8> {
        Yuv { y, u, v }
    }

    fn assert_near(actual: [u8; 3], expected: [u8; 3]) {
        for (a, e) in actual.into_iter().zip(expected) {
            assert!(a.abs_diff(e) <= 1, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn test_yuv_to_rgb_neutrals() {
        assert_near(BT601.rgb(yuv(128, 128, 128)), [128, 128, 128]);
        assert_near(BT601.rgb(yuv(0, 128, 128)), [0, 0, 0]);
        assert_near(BT601.rgb(yuv(255, 128, 128)), [255, 255, 255]);
    }

    #[test]
    fn limited_range_black_and_white() {
        let limited = YuvToRgb {
            range: ColorRange::Limited,
            ..BT601
        };
        assert_eq!(limited.rgb(yuv(16, 128, 128)), [0, 0, 0]);
        assert_eq!(limited.rgb(yuv(235, 128, 128)), [255, 255, 255]);
    }

    #[test]
    fn primaries_from_encoder_values() {
        // planes the encoder produces at 4:4:4 BT.601
        assert_eq!(BT601.rgb(yuv(76, 84, 255)), [255, 0, 0]);
        assert_eq!(BT601.rgb(yuv(29, 255, 107)), [0, 0, 255]);
        assert_eq!(BT601.rgb(yuv(226, 0, 148)), [255, 255, 0]);
    }

    #[test]
    fn saturated_colors_round_trip_at_444() {
        let colors: [[u8; 4]; 3] = [[0, 0, 255, 255], [255, 0, 0, 255], [0, 255, 255, 255]];
        let data = colors.concat();
        let raster = Raster::new(&data, 3, 1, 12).unwrap();
        let info = ColorConversionInfo::default();
        let image = color_image(&HeapAllocator, &raster, &info, ChromaSubsampling::Cs444).unwrap();

        let mut out = vec![0u8; 12];
        let mut output = RasterMut::new(&mut out, 3, 1, 12).unwrap();
        yuv_to_bgra8(&image, &yuv_coefficients(&info).unwrap(), &mut output);
        assert_eq!(out, data);
    }

    fn image_420(w: u32, h: u32, y: u8, u: u8, v: u8) -> PlanarImage {
        let mut image = PlanarImage::allocate(PixelFormat::I420, w, h, 16).unwrap();
        image.set_range(ColorRange::Full);
        let [mut yp, mut up, mut vp] = image.planes_mut();
        yp.fill(y);
        up.fill(u);
        vp.fill(v);
        image
    }

    #[test]
    fn larger_image_is_cropped_to_raster() {
        let image = image_420(5, 5, 255, 255, 255);
        let mut data = vec![0u8; 2 * 3 * 4 + 4];
        let mut raster = RasterMut::new(&mut data, 3, 2, 16).unwrap();
        yuv_to_bgra8(&image, &YuvCoefficients::IDENTITY, &mut raster);
        assert!(data[..12].iter().all(|&b| b == 255));
        assert_eq!(&data[12..16], &[0, 0, 0, 0]);
        assert!(data[16..28].iter().all(|&b| b == 255));
    }

    #[test]
    fn monochrome_flag_ignores_chroma() {
        let mut image = image_420(2, 2, 100, 0, 255);
        image.set_monochrome(true);
        let mut data = vec![0u8; 16];
        let mut raster = RasterMut::new(&mut data, 2, 2, 8).unwrap();
        yuv_to_bgra8(&image, &YuvCoefficients::from_kr_kb(0.299, 0.114), &mut raster);
        assert_eq!(&data[..4], &[100, 100, 100, 255]);
    }

    #[test]
    fn identity_maps_gbr() {
        let mut image = PlanarImage::allocate(PixelFormat::I444, 1, 1, 16).unwrap();
        image.set_range(ColorRange::Full);
        {
            let [mut y, mut u, mut v] = image.planes_mut();
            y.set(0, 0, 20);
            u.set(0, 0, 30);
            v.set(0, 0, 10);
        }
        let mut data = vec![0u8; 4];
        let mut raster = RasterMut::new(&mut data, 1, 1, 4).unwrap();
        yuv_to_bgra8(&image, &YuvCoefficients::IDENTITY, &mut raster);
        assert_eq!(data, [30, 20, 10, 255]);
    }
}
