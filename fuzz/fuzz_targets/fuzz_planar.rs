#![no_main]

use avif_planar::{
    ChromaSubsampling, ColorConversionInfo, ColorPrimaries, HeapAllocator, MatrixCoefficients,
    Raster, alpha_image, color_image,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let [w, h, mode, matrix, primaries, rest @ ..] = data else {
        return;
    };
    let (width, height) = (u32::from(*w % 32) + 1, u32::from(*h % 32) + 1);
    let stride = width as usize * 4;
    if rest.len() < stride * height as usize {
        return;
    }
    let Ok(raster) = Raster::new(rest, width, height, stride) else {
        return;
    };
    let Ok(subsampling) = ChromaSubsampling::try_from(i32::from(*mode % 6)) else {
        return;
    };
    let info = ColorConversionInfo {
        color_primaries: ColorPrimaries(*primaries),
        matrix_coefficients: MatrixCoefficients(*matrix % 16),
        ..ColorConversionInfo::default()
    };
    if let Ok(image) = color_image(&HeapAllocator, &raster, &info, subsampling) {
        assert_eq!(image.width(), width);
        assert_eq!(image.height(), height);
    }
    let _ = alpha_image(&HeapAllocator, &raster);
});
