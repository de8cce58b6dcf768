//! End-to-end encode with rav1e and decode with rav1d

#![cfg(all(feature = "encode", feature = "decode"))]

use avif_planar::{
    ChromaSubsampling, DecoderConfig, EncoderOptions, Raster, RasterMut, Unstoppable,
};

fn gradient(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let b = (x * 255 / (width - 1)) as u8;
            let g = (y * 255 / (height - 1)) as u8;
            let r = 96;
            let a = ((x + y) * 255 / (width + height - 2)) as u8;
            data.extend_from_slice(&[b, g, r, a]);
        }
    }
    data
}

fn mean_abs_error(a: &[u8], b: &[u8], channels: core::ops::Range<usize>) -> f64 {
    let mut sum = 0u64;
    let mut count = 0u64;
    for (pa, pb) in a.chunks_exact(4).zip(b.chunks_exact(4)) {
        for c in channels.clone() {
            sum += (pa[c] as i64 - pb[c] as i64).unsigned_abs();
            count += 1;
        }
    }
    sum as f64 / count as f64
}

#[test]
fn color_and_alpha_survive_high_quality_encode() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (64, 48);
    let data = gradient(w, h);
    let raster = Raster::new(&data, w, h, w as usize * 4).unwrap();

    for mode in [
        ChromaSubsampling::Cs420,
        ChromaSubsampling::Cs444,
        ChromaSubsampling::Identity,
    ] {
        let options = EncoderOptions::new()
            .quality(95.0)
            .speed(10)
            .chroma_subsampling(mode);
        let compressed = avif_planar::encode(&raster, &options, true).unwrap();
        let alpha = compressed.alpha.as_ref().expect("alpha requested");
        assert!(!compressed.color.is_empty());

        let mut out = vec![0u8; data.len()];
        let mut output = RasterMut::new(&mut out, w, h, w as usize * 4).unwrap();
        let info = avif_planar::decode_color_with(
            &compressed.color,
            &DecoderConfig::default(),
            None,
            &mut output,
            &Unstoppable,
        )
        .unwrap();
        assert_eq!((info.width, info.height), (w, h));
        assert_eq!(info.bit_depth, 8);
        assert_eq!(info.chroma_subsampling, mode);

        avif_planar::decode_alpha(alpha, &mut output).unwrap();

        let color_error = mean_abs_error(&data, &out, 0..3);
        let alpha_error = mean_abs_error(&data, &out, 3..4);
        assert!(color_error < 4.0, "{mode:?}: mean color error {color_error}");
        assert!(alpha_error < 4.0, "{mode:?}: mean alpha error {alpha_error}");
    }
}

#[test]
fn monochrome_decodes_gray() {
    let (w, h) = (32, 32);
    let data = gradient(w, h);
    let raster = Raster::new(&data, w, h, w as usize * 4).unwrap();
    let options = EncoderOptions::new()
        .speed(10)
        .chroma_subsampling(ChromaSubsampling::Monochrome);
    let compressed = avif_planar::encode(&raster, &options, false).unwrap();
    assert!(compressed.alpha.is_none());

    let mut out = vec![0u8; data.len()];
    let mut output = RasterMut::new(&mut out, w, h, w as usize * 4).unwrap();
    let info = avif_planar::decode_color(&compressed.color, &mut output).unwrap();
    assert_eq!(info.chroma_subsampling, ChromaSubsampling::Monochrome);
    assert!(
        out.chunks_exact(4)
            .all(|px| px[0] == px[1] && px[1] == px[2] && px[3] == 255)
    );
}

#[test]
fn garbage_is_a_decode_error() {
    let mut out = vec![0u8; 16];
    let mut output = RasterMut::new(&mut out, 2, 2, 8).unwrap();
    let err = avif_planar::decode_color(&[0x12, 0x00, 0x0a, 0x0b], &mut output)
        .unwrap_err()
        .into_inner();
    assert!(matches!(err, avif_planar::Error::Codec(_)));
}
