//! Test doubles shared by the integration tests

#![allow(dead_code)]

use avif_planar::{
    Av1Decode, Av1Encode, CodecError, EncoderOptions, ImageAllocator, ImageKind, PixelFormat,
    PlanarImage,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Codec that "compresses" by remembering the planar image
///
/// The bitstream is a two-byte handle into the shared frame list, so a
/// clone used as decoder returns exactly what the encoder received.
#[derive(Clone, Default)]
pub struct Loopback {
    frames: Rc<RefCell<Vec<(ImageKind, PlanarImage)>>>,
    compress_calls: Rc<Cell<usize>>,
    fail_encode: Option<CodecError>,
}

impl Loopback {
    pub fn failing(err: CodecError) -> Self {
        Self {
            fail_encode: Some(err),
            ..Self::default()
        }
    }

    pub fn compress_calls(&self) -> usize {
        self.compress_calls.get()
    }

    pub fn frame(&self, index: usize) -> (ImageKind, PlanarImage) {
        self.frames.borrow()[index].clone()
    }
}

impl Av1Encode for Loopback {
    fn compress(
        &mut self,
        image: &PlanarImage,
        kind: ImageKind,
        _options: &EncoderOptions,
    ) -> Result<Vec<u8>, CodecError> {
        self.compress_calls.set(self.compress_calls.get() + 1);
        if let Some(err) = &self.fail_encode {
            return Err(err.clone());
        }
        let mut frames = self.frames.borrow_mut();
        frames.push((kind, image.clone()));
        Ok(vec![b'L', (frames.len() - 1) as u8])
    }
}

impl Av1Decode for Loopback {
    fn decompress(&mut self, data: &[u8]) -> Result<PlanarImage, CodecError> {
        match data {
            [b'L', index] => self
                .frames
                .borrow()
                .get(*index as usize)
                .map(|(_, image)| image.clone())
                .ok_or_else(|| CodecError::Decode("unknown frame".into())),
            _ => Err(CodecError::Decode("not a loopback stream".into())),
        }
    }
}

/// Heap allocator that counts calls and can refuse the n-th allocation
#[derive(Default)]
pub struct CountingAllocator {
    pub allocations: Cell<usize>,
    pub releases: Cell<usize>,
    /// 1-based index of the allocation that fails
    pub fail_at: Option<usize>,
}

impl CountingAllocator {
    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_at: Some(n),
            ..Self::default()
        }
    }
}

impl ImageAllocator for CountingAllocator {
    fn allocate(
        &self,
        format: PixelFormat,
        width: u32,
        height: u32,
        align: usize,
    ) -> Option<PlanarImage> {
        let n = self.allocations.get() + 1;
        if self.fail_at == Some(n) {
            return None;
        }
        self.allocations.set(n);
        PlanarImage::allocate(format, width, height, align)
    }

    fn release(&self, image: &mut PlanarImage) {
        self.releases.set(self.releases.get() + 1);
        image.release_planes();
    }
}

impl ImageAllocator for &CountingAllocator {
    fn allocate(
        &self,
        format: PixelFormat,
        width: u32,
        height: u32,
        align: usize,
    ) -> Option<PlanarImage> {
        (**self).allocate(format, width, height, align)
    }

    fn release(&self, image: &mut PlanarImage) {
        (**self).release(image)
    }
}

/// Deterministic BGRA test pattern with varying alpha
pub fn pattern(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let b = (x * 37 + y * 11) as u8;
            let g = (x * 5 + y * 53) as u8;
            let r = (x * 71 ^ y * 29) as u8;
            let a = (x * 13 + y * 7 + 1) as u8;
            data.extend_from_slice(&[b, g, r, a]);
        }
    }
    data
}
