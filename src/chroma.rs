//! Chroma upsampling iterators for YUV plane processing
//!
//! These iterators pair each luma sample with the chroma sample covering it,
//! one row at a time, using nearest-neighbor upsampling. Rows are yielded as
//! iterators so callers can zip them against a destination raster.

/// One luma sample with its chroma
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Yuv<T> {
    pub y: T,
    pub u: T,
    pub v: T,
}

fn pair_row<'a, T: Copy + 'a>(
    y: &'a [T],
    u: impl Iterator<Item = T> + 'a,
    v: impl Iterator<Item = T> + 'a,
) -> impl Iterator<Item = Yuv<T>> + 'a {
    y.iter()
        .copied()
        .zip(u.zip(v))
        .map(|(y, (u, v))| Yuv { y, u, v })
}

fn doubled<'a, T: Copy + 'a>(row: &'a [T]) -> impl Iterator<Item = T> + 'a {
    row.iter().copied().flat_map(|px| core::iter::repeat_n(px, 2))
}

/// Rows of equal-sized Y, U, V planes (4:4:4)
pub(crate) fn yuv_444_rows<'a, T: Copy + 'a>(
    y: impl Iterator<Item = &'a [T]> + 'a,
    u: impl Iterator<Item = &'a [T]> + 'a,
    v: impl Iterator<Item = &'a [T]> + 'a,
) -> impl Iterator<Item = impl Iterator<Item = Yuv<T>> + 'a> + 'a {
    y.zip(u.zip(v))
        .map(|(y, (u, v))| pair_row(y, u.iter().copied(), v.iter().copied()))
}

/// Rows of Y, U, V planes where U and V have half width (4:2:2)
pub(crate) fn yuv_422_rows<'a, T: Copy + 'a>(
    y: impl Iterator<Item = &'a [T]> + 'a,
    u: impl Iterator<Item = &'a [T]> + 'a,
    v: impl Iterator<Item = &'a [T]> + 'a,
) -> impl Iterator<Item = impl Iterator<Item = Yuv<T>> + 'a> + 'a {
    y.zip(u.zip(v))
        .map(|(y, (u, v))| pair_row(y, doubled(u), doubled(v)))
}

/// Rows of Y, U, V planes where U and V have half width and half height (4:2:0)
pub(crate) fn yuv_420_rows<'a, T: Copy + 'a>(
    y: impl Iterator<Item = &'a [T]> + 'a,
    u: impl Iterator<Item = &'a [T]> + 'a,
    v: impl Iterator<Item = &'a [T]> + 'a,
) -> impl Iterator<Item = impl Iterator<Item = Yuv<T>> + 'a> + 'a {
    let u = u.flat_map(|u_row| core::iter::repeat_n(u_row, 2));
    let v = v.flat_map(|v_row| core::iter::repeat_n(v_row, 2));
    y.zip(u.zip(v))
        .map(|(y, (u, v))| pair_row(y, doubled(u), doubled(v)))
}
