//! Caller-owned interleaved BGRA rasters
//!
//! Pixels are 4 bytes in blue, green, red, alpha order. The stride is in
//! bytes and may include padding after each row.

use crate::error::{Error, Result};
use imgref::{ImgRef, ImgRefMut};
use rgb::alt::BGRA8;
use whereat::at;

/// Bytes per BGRA pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Channel offsets within a BGRA pixel
pub(crate) const B: usize = 0;
pub(crate) const G: usize = 1;
pub(crate) const R: usize = 2;
pub(crate) const A: usize = 3;

fn validate(len: usize, width: u32, height: u32, stride: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(at(Error::InvalidImage("width and height must be non-zero")));
    }
    let row_bytes = (width as usize)
        .checked_mul(BYTES_PER_PIXEL)
        .ok_or_else(|| at(Error::InvalidImage("row size overflows")))?;
    if stride < row_bytes {
        return Err(at(Error::InvalidImage("stride shorter than a row of pixels")));
    }
    let required = (height as usize - 1)
        .checked_mul(stride)
        .and_then(|n| n.checked_add(row_bytes))
        .ok_or_else(|| at(Error::InvalidImage("image size overflows")))?;
    if len < required {
        return Err(at(Error::InvalidImage("buffer too small for dimensions")));
    }
    Ok(())
}

/// Read-only raster, the source of an encode
#[derive(Debug, Clone, Copy)]
pub struct Raster<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> Raster<'a> {
    /// Wrap a BGRA buffer
    pub fn new(data: &'a [u8], width: u32, height: u32, stride: usize) -> Result<Self> {
        validate(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Wrap an `imgref` image of BGRA pixels
    pub fn from_img(img: ImgRef<'a, BGRA8>) -> Result<Self> {
        let width = u32::try_from(img.width())
            .map_err(|_| at(Error::InvalidImage("width exceeds u32")))?;
        let height = u32::try_from(img.height())
            .map_err(|_| at(Error::InvalidImage("height exceeds u32")))?;
        let stride = img.stride() * BYTES_PER_PIXEL;
        let pixels: &'a [BGRA8] = img.into_buf();
        Self::new(bytemuck::cast_slice(pixels), width, height, stride)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// BGRA bytes of the pixel at `(x, y)`
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(
            x < self.width as usize && y < self.height as usize,
            "pixel ({x}, {y}) out of bounds ({}x{})",
            self.width,
            self.height
        );
        let offset = y * self.stride + x * BYTES_PER_PIXEL;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[offset..offset + BYTES_PER_PIXEL]);
        px
    }

    /// Row `y` without padding
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    /// Iterate over rows without padding
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let raster = *self;
        (0..raster.height as usize).map(move |y| raster.row(y))
    }

    /// True when every alpha byte is 255, so no alpha image is needed
    pub fn is_opaque(&self) -> bool {
        self.rows()
            .all(|row| row.chunks_exact(BYTES_PER_PIXEL).all(|px| px[A] == 255))
    }
}

/// Writable raster, the destination of a decode
#[derive(Debug)]
pub struct RasterMut<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> RasterMut<'a> {
    /// Wrap a writable BGRA buffer
    pub fn new(data: &'a mut [u8], width: u32, height: u32, stride: usize) -> Result<Self> {
        validate(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Wrap a mutable `imgref` image of BGRA pixels
    pub fn from_img(img: ImgRefMut<'a, BGRA8>) -> Result<Self> {
        let width = u32::try_from(img.width())
            .map_err(|_| at(Error::InvalidImage("width exceeds u32")))?;
        let height = u32::try_from(img.height())
            .map_err(|_| at(Error::InvalidImage("height exceeds u32")))?;
        let stride = img.stride() * BYTES_PER_PIXEL;
        let pixels: &'a mut [BGRA8] = img.into_buf();
        Self::new(bytemuck::cast_slice_mut(pixels), width, height, stride)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Mutable row `y` without padding
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        &mut self.data[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    /// Iterate over mutable rows without padding
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> + '_ {
        let row_bytes = self.width as usize * BYTES_PER_PIXEL;
        let height = self.height as usize;
        self.data
            .chunks_mut(self.stride)
            .take(height)
            .map(move |row| &mut row[..row_bytes])
    }

    /// Reborrow as a read-only raster
    pub fn as_raster(&self) -> Raster<'_> {
        Raster {
            data: &*self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }
}
