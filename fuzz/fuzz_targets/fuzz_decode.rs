#![no_main]

use avif_planar::{DecoderConfig, RasterMut};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let config = DecoderConfig::new().frame_size_limit(1024 * 1024);
    let mut pixels = vec![0u8; 16 * 16 * 4];
    let Ok(mut output) = RasterMut::new(&mut pixels, 16, 16, 16 * 4) else {
        return;
    };
    let _ = avif_planar::decode_color_with(data, &config, None, &mut output, &enough::Unstoppable);
});
