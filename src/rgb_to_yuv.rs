//! BGRA to planar YUV conversion with block-averaged chroma subsampling
//!
//! The raster is walked in 2x2 blocks. Luma is written per pixel at full
//! resolution; subsampled chroma is the mean of the samples actually present
//! in the block, so edge blocks of an odd-sized image divide by 1 or 2.

use crate::coefficients::YuvCoefficients;
use crate::image::ChromaSubsampling;
use crate::plane::PlaneMut;
use crate::raster::{B, G, R, Raster};

#[derive(Debug, Clone, Copy, Default)]
struct YuvSample {
    y: f32,
    u: f32,
    v: f32,
}

/// Round half up, as `floor(v + 0.5)`
#[inline]
fn round_half_up(v: f32) -> f32 {
    (v + 0.5).floor()
}

#[inline]
fn luma_to_unorm(y: f32) -> u8 {
    round_half_up(y.clamp(0.0, 1.0) * 255.0) as u8
}

/// Signed chroma is re-centred by +0.5 before quantization
#[inline]
fn chroma_to_unorm(c: f32) -> u8 {
    round_half_up((c + 0.5).clamp(0.0, 1.0) * 255.0) as u8
}

/// Convert a raster into Y/U/V planes
///
/// The planes must already have the dimensions implied by `subsampling`.
/// Chroma planes are not touched for [`ChromaSubsampling::Monochrome`].
/// [`ChromaSubsampling::Identity`] copies G, B and R into Y, U and V.
pub(crate) fn bgra_to_yuv8(
    raster: &Raster<'_>,
    coefficients: &YuvCoefficients,
    subsampling: ChromaSubsampling,
    y_plane: &mut PlaneMut<'_>,
    u_plane: &mut PlaneMut<'_>,
    v_plane: &mut PlaneMut<'_>,
) {
    if subsampling == ChromaSubsampling::Identity {
        identity_to_planes(raster, y_plane, u_plane, v_plane);
        return;
    }

    let YuvCoefficients { kr, kg, kb } = *coefficients;
    let width = raster.width() as usize;
    let height = raster.height() as usize;

    // indexed [row][column] within the block
    let mut block = [[YuvSample::default(); 2]; 2];

    for image_y in (0..height).step_by(2) {
        let block_height = if image_y + 1 < height { 2 } else { 1 };

        for image_x in (0..width).step_by(2) {
            let block_width = if image_x + 1 < width { 2 } else { 1 };

            for by in 0..block_height {
                for bx in 0..block_width {
                    let x = image_x + bx;
                    let y = image_y + by;
                    let px = raster.pixel(x, y);

                    let r = px[R] as f32 / 255.0;
                    let g = px[G] as f32 / 255.0;
                    let b = px[B] as f32 / 255.0;

                    let luma = kr * r + kg * g + kb * b;
                    let sample = YuvSample {
                        y: luma,
                        u: (b - luma) / (2.0 * (1.0 - kb)),
                        v: (r - luma) / (2.0 * (1.0 - kr)),
                    };
                    block[by][bx] = sample;

                    y_plane.set(x, y, luma_to_unorm(sample.y));

                    if subsampling == ChromaSubsampling::Cs444 {
                        u_plane.set(x, y, chroma_to_unorm(sample.u));
                        v_plane.set(x, y, chroma_to_unorm(sample.v));
                    }
                }
            }

            match subsampling {
                ChromaSubsampling::Cs420 => {
                    let mut sum_u = 0.0;
                    let mut sum_v = 0.0;
                    for row in &block[..block_height] {
                        for sample in &row[..block_width] {
                            sum_u += sample.u;
                            sum_v += sample.v;
                        }
                    }
                    let count = (block_width * block_height) as f32;
                    let (cx, cy) = (image_x / 2, image_y / 2);
                    u_plane.set(cx, cy, chroma_to_unorm(sum_u / count));
                    v_plane.set(cx, cy, chroma_to_unorm(sum_v / count));
                }
                ChromaSubsampling::Cs422 => {
                    let count = block_width as f32;
                    for (by, row) in block[..block_height].iter().enumerate() {
                        let (sum_u, sum_v) = row[..block_width]
                            .iter()
                            .fold((0.0, 0.0), |(u, v), s| (u + s.u, v + s.v));
                        let cx = image_x / 2;
                        u_plane.set(cx, image_y + by, chroma_to_unorm(sum_u / count));
                        v_plane.set(cx, image_y + by, chroma_to_unorm(sum_v / count));
                    }
                }
                _ => {}
            }
        }
    }
}

fn identity_to_planes(
    raster: &Raster<'_>,
    y_plane: &mut PlaneMut<'_>,
    u_plane: &mut PlaneMut<'_>,
    v_plane: &mut PlaneMut<'_>,
) {
    for (y, row) in raster.rows().enumerate() {
        let y_row = y_plane.row_mut(y);
        for (dst, px) in y_row.iter_mut().zip(row.chunks_exact(4)) {
            *dst = px[G];
        }
        let u_row = u_plane.row_mut(y);
        for (dst, px) in u_row.iter_mut().zip(row.chunks_exact(4)) {
            *dst = px[B];
        }
        let v_row = v_plane.row_mut(y);
        for (dst, px) in v_row.iter_mut().zip(row.chunks_exact(4)) {
            *dst = px[R];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planar::{PixelFormat, PlaneIndex, PlanarImage};

    const BT601: YuvCoefficients = YuvCoefficients::from_kr_kb(0.299, 0.114);

    /// BGRA raster from (r, g, b) triples, row-major
    fn bgra(pixels: &[(u8, u8, u8)]) -> Vec<u8> {
        pixels.iter().flat_map(|&(r, g, b)| [b, g, r, 255]).collect()
    }

    fn convert(data: &[u8], w: u32, h: u32, mode: ChromaSubsampling) -> PlanarImage {
        let raster = Raster::new(data, w, h, w as usize * 4).unwrap();
        let mut image =
            PlanarImage::allocate(PixelFormat::for_subsampling(mode), w, h, 16).unwrap();
        let [mut y, mut u, mut v] = image.planes_mut();
        let coefficients = if mode == ChromaSubsampling::Identity {
            YuvCoefficients::IDENTITY
        } else {
            BT601
        };
        bgra_to_yuv8(&raster, &coefficients, mode, &mut y, &mut u, &mut v);
        image
    }

    fn sample(image: &PlanarImage, index: PlaneIndex, x: usize, y: usize) -> u8 {
        image.plane(index).get(x, y)
    }

    #[test]
    fn quantization_of_primaries() {
        let data = bgra(&[(0, 0, 0), (255, 255, 255), (255, 0, 0), (128, 128, 128)]);
        let image = convert(&data, 4, 1, ChromaSubsampling::Cs444);
        let yuv = |x| {
            (
                sample(&image, PlaneIndex::Y, x, 0),
                sample(&image, PlaneIndex::U, x, 0),
                sample(&image, PlaneIndex::V, x, 0),
            )
        };
        let near = |a: u8, b: u8| (a as i32 - b as i32).abs() <= 1;
        assert_eq!(yuv(0), (0, 128, 128));
        assert_eq!(yuv(2), (76, 84, 255));
        for x in [1, 3] {
            let (y, u, v) = yuv(x);
            assert_eq!(y, if x == 1 { 255 } else { 128 });
            assert!(near(u, 128) && near(v, 128), "gray chroma {u} {v}");
        }
    }

    #[test]
    fn luma_is_independent_of_chroma_mode() {
        let pixels: Vec<(u8, u8, u8)> = (0..35u8)
            .map(|i| (i.wrapping_mul(37), i.wrapping_mul(91), 255 - i * 7))
            .collect();
        let data = bgra(&pixels);
        let full = convert(&data, 7, 5, ChromaSubsampling::Cs444);
        for mode in [ChromaSubsampling::Cs420, ChromaSubsampling::Cs422] {
            let sub = convert(&data, 7, 5, mode);
            for y in 0..5 {
                assert_eq!(
                    full.plane(PlaneIndex::Y).row(y),
                    sub.plane(PlaneIndex::Y).row(y),
                    "{mode:?} row {y}"
                );
            }
        }
    }

    #[test]
    fn subsampled_420_averages_full_block() {
        // two red and two blue pixels average to magenta chroma
        let data = bgra(&[(255, 0, 0), (0, 0, 255), (0, 0, 255), (255, 0, 0)]);
        let sub = convert(&data, 2, 2, ChromaSubsampling::Cs420);
        let full = convert(&data, 2, 2, ChromaSubsampling::Cs444);
        let mean = |index| {
            let p = full.plane(index);
            (p.get(0, 0) as i32 + p.get(1, 0) as i32 + p.get(0, 1) as i32 + p.get(1, 1) as i32) / 4
        };
        assert!((sample(&sub, PlaneIndex::U, 0, 0) as i32 - mean(PlaneIndex::U)).abs() <= 1);
        assert!((sample(&sub, PlaneIndex::V, 0, 0) as i32 - mean(PlaneIndex::V)).abs() <= 1);
    }

    #[test]
    fn odd_edges_divide_by_samples_present() {
        let pixels: Vec<(u8, u8, u8)> = vec![
            (10, 200, 30),
            (90, 10, 250),
            (250, 40, 0),
            (0, 0, 255),
            (200, 200, 10),
            (255, 0, 0),
            (60, 120, 180),
            (5, 5, 5),
            (0, 255, 0),
        ];
        let data = bgra(&pixels);
        let sub = convert(&data, 3, 3, ChromaSubsampling::Cs420);
        let full = convert(&data, 3, 3, ChromaSubsampling::Cs444);

        // 1x1 corner block keeps the single sample unscaled
        assert_eq!(
            sample(&sub, PlaneIndex::U, 1, 1),
            sample(&full, PlaneIndex::U, 2, 2)
        );
        assert_eq!(
            sample(&sub, PlaneIndex::V, 1, 1),
            sample(&full, PlaneIndex::V, 2, 2)
        );
    }

    #[test]
    fn uniform_color_survives_edge_blocks() {
        let data = bgra(&[(200, 30, 90); 15]);
        let full = convert(&data, 5, 3, ChromaSubsampling::Cs444);
        let expected_u = sample(&full, PlaneIndex::U, 0, 0);
        let expected_v = sample(&full, PlaneIndex::V, 0, 0);
        for mode in [ChromaSubsampling::Cs420, ChromaSubsampling::Cs422] {
            let sub = convert(&data, 5, 3, mode);
            for index in [PlaneIndex::U, PlaneIndex::V] {
                let expected = if index == PlaneIndex::U { expected_u } else { expected_v };
                for row in sub.plane(index).rows() {
                    assert!(row.iter().all(|&c| c == expected), "{mode:?} {index:?}");
                }
            }
        }
    }

    #[test]
    fn subsampled_422_averages_horizontal_pairs() {
        let data = bgra(&[(255, 0, 0), (255, 0, 0), (0, 0, 255), (0, 0, 0)]);
        let sub = convert(&data, 2, 2, ChromaSubsampling::Cs422);
        let full = convert(&data, 2, 2, ChromaSubsampling::Cs444);
        assert_eq!(sub.plane(PlaneIndex::U).height(), 2);
        assert_eq!(
            sample(&sub, PlaneIndex::V, 0, 0),
            sample(&full, PlaneIndex::V, 0, 0)
        );
        let pair = (sample(&full, PlaneIndex::U, 0, 1) as i32
            + sample(&full, PlaneIndex::U, 1, 1) as i32)
            / 2;
        assert!((sample(&sub, PlaneIndex::U, 0, 1) as i32 - pair).abs() <= 1);
    }

    #[test]
    fn monochrome_leaves_chroma_alone() {
        let data = bgra(&[(255, 0, 0); 4]);
        let image = convert(&data, 2, 2, ChromaSubsampling::Monochrome);
        assert_eq!(sample(&image, PlaneIndex::Y, 1, 1), 76);
        assert_eq!(sample(&image, PlaneIndex::U, 0, 0), 0);
    }

    #[test]
    fn identity_stores_gbr() {
        let data = bgra(&[(1, 2, 3), (250, 128, 7)]);
        let image = convert(&data, 2, 1, ChromaSubsampling::Identity);
        assert_eq!(image.plane(PlaneIndex::Y).row(0), &[2, 128]);
        assert_eq!(image.plane(PlaneIndex::U).row(0), &[3, 7]);
        assert_eq!(image.plane(PlaneIndex::V).row(0), &[1, 250]);
    }
}
