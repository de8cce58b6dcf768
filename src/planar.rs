//! Codec planar image objects
//!
//! [`PlanarImage`] is the codec-facing representation of a still image: up
//! to three 8-bit planes with independent strides. Images handed to a codec
//! are obtained from an [`ImageAllocator`] and held in a [`ScopedImage`],
//! which returns them to the allocator on every exit path.

use crate::coefficients::{YuvCoefficients, yuv_coefficients};
use crate::convert::alpha_to_y8;
use crate::error::{Error, Result};
use crate::image::{ChromaSubsampling, ColorConversionInfo, ColorRange, MatrixCoefficients};
use crate::plane::{Plane, PlaneMut};
use crate::raster::Raster;
use crate::rgb_to_yuv::bgra_to_yuv8;
use core::ops::{Deref, DerefMut};
use whereat::at;

/// Row alignment used for images built from rasters
pub const IMAGE_ALIGN: usize = 16;

/// Memory layout of a planar image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Chroma at half width and half height
    I420,
    /// Chroma at half width
    I422,
    /// Chroma at full resolution
    I444,
    /// Luma only
    I400,
}

impl PixelFormat {
    /// Layout used to encode a given subsampling mode
    ///
    /// Monochrome images still use the 4:2:0 layout, with the monochrome
    /// flag set on the image.
    pub const fn for_subsampling(subsampling: ChromaSubsampling) -> Self {
        match subsampling {
            ChromaSubsampling::Monochrome | ChromaSubsampling::Cs420 => PixelFormat::I420,
            ChromaSubsampling::Cs422 => PixelFormat::I422,
            ChromaSubsampling::Cs444 | ChromaSubsampling::Identity => PixelFormat::I444,
        }
    }

    /// Subsampling mode a decoded image of this layout represents
    pub const fn subsampling(self) -> ChromaSubsampling {
        match self {
            PixelFormat::I420 => ChromaSubsampling::Cs420,
            PixelFormat::I422 => ChromaSubsampling::Cs422,
            PixelFormat::I444 => ChromaSubsampling::Cs444,
            PixelFormat::I400 => ChromaSubsampling::Monochrome,
        }
    }

    /// Chroma plane dimensions for a `width` x `height` luma plane
    pub const fn chroma_dimensions(self, width: usize, height: usize) -> (usize, usize) {
        match self {
            PixelFormat::I420 => (width.div_ceil(2), height.div_ceil(2)),
            PixelFormat::I422 => (width.div_ceil(2), height),
            PixelFormat::I444 => (width, height),
            PixelFormat::I400 => (0, 0),
        }
    }
}

/// Plane selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneIndex {
    Y = 0,
    U = 1,
    V = 2,
}

fn zeroed(len: usize) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).ok()?;
    buf.resize(len, 0);
    Some(buf)
}

fn aligned(width: usize, align: usize) -> Option<usize> {
    if align <= 1 || !align.is_power_of_two() {
        return Some(width);
    }
    Some(width.checked_add(align - 1)? & !(align - 1))
}

/// Planar 8-bit image in a codec's native layout
#[derive(Debug, Clone)]
pub struct PlanarImage {
    format: PixelFormat,
    width: u32,
    height: u32,
    range: ColorRange,
    monochrome: bool,
    color_info: ColorConversionInfo,
    planes: [Vec<u8>; 3],
    strides: [usize; 3],
}

impl PlanarImage {
    /// Allocate zeroed planes with rows aligned to `align` bytes
    ///
    /// Returns `None` when the dimensions are zero or memory is unavailable.
    pub fn allocate(format: PixelFormat, width: u32, height: u32, align: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let (w, h) = (width as usize, height as usize);
        let (cw, ch) = format.chroma_dimensions(w, h);
        let y_stride = aligned(w, align)?;
        let c_stride = aligned(cw, align)?;
        let y_len = y_stride.checked_mul(h)?;
        let c_len = c_stride.checked_mul(ch)?;
        Some(Self {
            format,
            width,
            height,
            range: ColorRange::Limited,
            monochrome: format == PixelFormat::I400,
            color_info: ColorConversionInfo::unspecified(),
            planes: [zeroed(y_len)?, zeroed(c_len)?, zeroed(c_len)?],
            strides: [y_stride, c_stride, c_stride],
        })
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn range(&self) -> ColorRange {
        self.range
    }

    pub fn set_range(&mut self, range: ColorRange) {
        self.range = range;
    }

    /// Whether only the luma plane carries data
    pub fn is_monochrome(&self) -> bool {
        self.monochrome
    }

    pub fn set_monochrome(&mut self, monochrome: bool) {
        self.monochrome = monochrome;
    }

    pub fn color_info(&self) -> &ColorConversionInfo {
        &self.color_info
    }

    pub fn set_color_info(&mut self, info: ColorConversionInfo) {
        self.color_info = info;
    }

    pub fn chroma_width(&self) -> usize {
        self.format
            .chroma_dimensions(self.width as usize, self.height as usize)
            .0
    }

    pub fn chroma_height(&self) -> usize {
        self.format
            .chroma_dimensions(self.width as usize, self.height as usize)
            .1
    }

    /// Width and height of one plane
    pub fn plane_dimensions(&self, index: PlaneIndex) -> (usize, usize) {
        match index {
            PlaneIndex::Y => (self.width as usize, self.height as usize),
            PlaneIndex::U | PlaneIndex::V => (self.chroma_width(), self.chroma_height()),
        }
    }

    /// Row stride of one plane in bytes
    pub fn stride(&self, index: PlaneIndex) -> usize {
        self.strides[index as usize]
    }

    /// Read-only view of one plane
    pub fn plane(&self, index: PlaneIndex) -> Plane<'_> {
        let (w, h) = self.plane_dimensions(index);
        let i = index as usize;
        Plane::new(&self.planes[i], w, h, self.strides[i])
    }

    /// Mutable view of one plane
    pub fn plane_mut(&mut self, index: PlaneIndex) -> PlaneMut<'_> {
        let (w, h) = self.plane_dimensions(index);
        let i = index as usize;
        PlaneMut::new(&mut self.planes[i], w, h, self.strides[i])
    }

    /// Mutable views of Y, U and V at once
    pub fn planes_mut(&mut self) -> [PlaneMut<'_>; 3] {
        let (w, h) = (self.width as usize, self.height as usize);
        let (cw, ch) = self.format.chroma_dimensions(w, h);
        let [ys, us, vs] = self.strides;
        let [y, u, v] = &mut self.planes;
        [
            PlaneMut::new(y, w, h, ys),
            PlaneMut::new(u, cw, ch, us),
            PlaneMut::new(v, cw, ch, vs),
        ]
    }

    /// Free plane memory, leaving an empty image
    pub fn release_planes(&mut self) {
        self.planes = [Vec::new(), Vec::new(), Vec::new()];
        self.strides = [0; 3];
        self.width = 0;
        self.height = 0;
    }
}

/// Source of planar images handed to a codec
pub trait ImageAllocator {
    /// Allocate an image, or `None` when memory is unavailable
    fn allocate(&self, format: PixelFormat, width: u32, height: u32, align: usize)
    -> Option<PlanarImage>;

    /// Return an image obtained from [`allocate`](Self::allocate)
    fn release(&self, image: &mut PlanarImage) {
        image.release_planes();
    }
}

/// Allocates planes on the heap
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapAllocator;

impl ImageAllocator for HeapAllocator {
    fn allocate(
        &self,
        format: PixelFormat,
        width: u32,
        height: u32,
        align: usize,
    ) -> Option<PlanarImage> {
        log::trace!("allocating {format:?} image {width}x{height}");
        PlanarImage::allocate(format, width, height, align)
    }
}

/// A [`PlanarImage`] released back to its allocator when dropped
pub struct ScopedImage<'a, A: ImageAllocator + ?Sized> {
    image: PlanarImage,
    allocator: &'a A,
}

impl<'a, A: ImageAllocator + ?Sized> ScopedImage<'a, A> {
    /// Allocate an image, failing with [`Error::OutOfMemory`]
    pub fn allocate(
        allocator: &'a A,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let image = allocator
            .allocate(format, width, height, IMAGE_ALIGN)
            .ok_or_else(|| at(Error::OutOfMemory))?;
        Ok(Self { image, allocator })
    }
}

impl<A: ImageAllocator + ?Sized> Deref for ScopedImage<'_, A> {
    type Target = PlanarImage;

    fn deref(&self) -> &PlanarImage {
        &self.image
    }
}

impl<A: ImageAllocator + ?Sized> DerefMut for ScopedImage<'_, A> {
    fn deref_mut(&mut self) -> &mut PlanarImage {
        &mut self.image
    }
}

impl<A: ImageAllocator + ?Sized> Drop for ScopedImage<'_, A> {
    fn drop(&mut self) {
        self.allocator.release(&mut self.image);
    }
}

/// Convert a raster's color channels into a new planar image
///
/// The coefficients are resolved before anything is allocated. Identity
/// mode always uses the identity matrix at 4:4:4; monochrome images carry
/// zeroed chroma planes and the monochrome flag.
pub fn color_image<'a, A: ImageAllocator + ?Sized>(
    allocator: &'a A,
    raster: &Raster<'_>,
    color_info: &ColorConversionInfo,
    subsampling: ChromaSubsampling,
) -> Result<ScopedImage<'a, A>> {
    let mut color_info = *color_info;
    let coefficients = if subsampling == ChromaSubsampling::Identity {
        color_info.matrix_coefficients = MatrixCoefficients::IDENTITY;
        YuvCoefficients::IDENTITY
    } else {
        yuv_coefficients(&color_info)?
    };
    // an identity matrix cannot be subsampled
    let subsampling = if coefficients.is_identity() && subsampling != ChromaSubsampling::Monochrome
    {
        ChromaSubsampling::Identity
    } else {
        subsampling
    };
    let format = PixelFormat::for_subsampling(subsampling);

    let mut image = ScopedImage::allocate(allocator, format, raster.width(), raster.height())?;
    image.set_range(ColorRange::Full);
    image.set_color_info(color_info);

    let [mut y, mut u, mut v] = image.planes_mut();
    bgra_to_yuv8(raster, &coefficients, subsampling, &mut y, &mut u, &mut v);
    if subsampling == ChromaSubsampling::Monochrome {
        u.fill(0);
        v.fill(0);
        image.set_monochrome(true);
    }
    Ok(image)
}

/// Copy a raster's alpha channel into a new monochrome image
///
/// The image uses the 4:2:0 layout with zeroed chroma, because codecs
/// commonly cannot allocate a luma-only image.
pub fn alpha_image<'a, A: ImageAllocator + ?Sized>(
    allocator: &'a A,
    raster: &Raster<'_>,
) -> Result<ScopedImage<'a, A>> {
    let mut image =
        ScopedImage::allocate(allocator, PixelFormat::I420, raster.width(), raster.height())?;
    image.set_range(ColorRange::Full);
    image.set_monochrome(true);

    let [mut y, mut u, mut v] = image.planes_mut();
    alpha_to_y8(raster, &mut y);
    u.fill(0);
    v.fill(0);
    Ok(image)
}
