//! Strided views over 8-bit sample planes
//!
//! A sample at `(x, y)` lives at byte offset `y * stride + x`. Accessors are
//! bounds-checked against the logical width and height, not only the buffer.

/// Read-only view of one plane
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> Plane<'a> {
    /// Wrap `data` as a `width` x `height` plane with `stride` bytes per row
    ///
    /// # Panics
    ///
    /// Panics if `stride < width` or `data` cannot hold the last row.
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> Self {
        assert!(stride >= width, "stride {stride} shorter than width {width}");
        assert!(
            height == 0 || data.len() >= (height - 1) * stride + width,
            "plane buffer too small for {width}x{height} at stride {stride}"
        );
        Self {
            data,
            width,
            height,
            stride,
        }
    }

    /// Sample at `(x, y)`
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        assert!(
            x < self.width && y < self.height,
            "sample ({x}, {y}) out of bounds ({}x{})",
            self.width,
            self.height
        );
        self.data[y * self.stride + x]
    }

    /// Row `y`, trimmed to the plane width
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        assert!(y < self.height, "row {y} out of bounds ({})", self.height);
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let plane = *self;
        (0..plane.height).map(move |y| plane.row(y))
    }

    /// Underlying bytes, padding included
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }
}

/// Mutable view of one plane
#[derive(Debug)]
pub struct PlaneMut<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> PlaneMut<'a> {
    /// Wrap `data` as a writable `width` x `height` plane
    ///
    /// # Panics
    ///
    /// Panics if `stride < width` or `data` cannot hold the last row.
    pub fn new(data: &'a mut [u8], width: usize, height: usize, stride: usize) -> Self {
        assert!(stride >= width, "stride {stride} shorter than width {width}");
        assert!(
            height == 0 || data.len() >= (height - 1) * stride + width,
            "plane buffer too small for {width}x{height} at stride {stride}"
        );
        Self {
            data,
            width,
            height,
            stride,
        }
    }

    /// Write the sample at `(x, y)`
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        assert!(
            x < self.width && y < self.height,
            "sample ({x}, {y}) out of bounds ({}x{})",
            self.width,
            self.height
        );
        self.data[y * self.stride + x] = value;
    }

    /// Sample at `(x, y)`
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.as_plane().get(x, y)
    }

    /// Mutable row `y`, trimmed to the plane width
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of bounds ({})", self.height);
        let start = y * self.stride;
        &mut self.data[start..start + self.width]
    }

    /// Set every sample (padding excluded) to `value`
    pub fn fill(&mut self, value: u8) {
        for y in 0..self.height {
            self.row_mut(y).fill(value);
        }
    }

    /// Reborrow as a read-only view
    pub fn as_plane(&self) -> Plane<'_> {
        Plane {
            data: &*self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_stride() {
        let mut buf = vec![0u8; 3 * 8];
        let mut plane = PlaneMut::new(&mut buf, 5, 3, 8);
        plane.set(4, 2, 9);
        plane.set(0, 1, 7);
        assert_eq!(buf[2 * 8 + 4], 9);
        assert_eq!(buf[8], 7);
    }

    #[test]
    fn fill_leaves_padding_untouched() {
        let mut buf = vec![1u8; 2 * 4];
        PlaneMut::new(&mut buf, 3, 2, 4).fill(0);
        assert_eq!(buf, [0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn rows_are_trimmed_to_width() {
        let buf: Vec<u8> = (0..12).collect();
        let plane = Plane::new(&buf, 2, 3, 4);
        let rows: Vec<&[u8]> = plane.rows().collect();
        let expected: [&[u8]; 3] = [&[0, 1], &[4, 5], &[8, 9]];
        assert_eq!(rows, expected);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn padding_is_not_addressable() {
        let buf = vec![0u8; 8];
        Plane::new(&buf, 3, 2, 4).get(3, 0);
    }
}
