//! Pixel and framebuffer types
//!
//! The framebuffer is a fixed 8-row grid of red/green pixels. Its only
//! mutation contract toward the engine is whole-buffer replacement; the
//! row setters exist for building a buffer before it is handed over.

/// Number of scan rows, fixed by the 3-bit row-address bus
pub const ROWS: usize = 8;

/// Bytes per pixel in the flat wire/memory layout (`red`, `green`)
pub const BYTES_PER_PIXEL: usize = 2;

/// One matrix pixel: an 8-bit intensity per color channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
}

impl Pixel {
    /// Fully dark pixel
    pub const OFF: Pixel = Pixel::new(0, 0);

    pub const fn new(red: u8, green: u8) -> Self {
        Self { red, green }
    }
}

/// Byte buffer length did not match the framebuffer geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameSizeError {
    /// Length the geometry requires
    pub expected: usize,
    /// Length that was supplied
    pub actual: usize,
}

/// Fixed-size grid of pixels, `ROWS` × `COLS`, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer<const COLS: usize> {
    rows: [[Pixel; COLS]; ROWS],
}

impl<const COLS: usize> Default for Framebuffer<COLS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const COLS: usize> Framebuffer<COLS> {
    /// Size of one row in the flat byte layout
    pub const ROW_BYTES: usize = COLS * BYTES_PER_PIXEL;

    /// Size of the whole buffer in the flat byte layout
    pub const FRAME_BYTES: usize = ROWS * Self::ROW_BYTES;

    /// Create an all-dark framebuffer
    pub const fn new() -> Self {
        Self {
            rows: [[Pixel::OFF; COLS]; ROWS],
        }
    }

    /// Wrap an existing pixel grid
    pub const fn from_rows(rows: [[Pixel; COLS]; ROWS]) -> Self {
        Self { rows }
    }

    /// Build a framebuffer from the flat row-major `[r, g, r, g, ...]` layout
    ///
    /// The buffer must hold exactly `ROWS * COLS` pixels.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameSizeError> {
        if bytes.len() != Self::FRAME_BYTES {
            return Err(FrameSizeError {
                expected: Self::FRAME_BYTES,
                actual: bytes.len(),
            });
        }

        let mut frame = Self::new();
        for (row, chunk) in bytes.chunks_exact(Self::ROW_BYTES).enumerate() {
            frame.fill_row_from_bytes(row, chunk);
        }
        Ok(frame)
    }

    /// Pixels of one row
    ///
    /// # Panics
    /// If `row >= ROWS`.
    pub fn row(&self, row: usize) -> &[Pixel; COLS] {
        &self.rows[row]
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> &[[Pixel; COLS]; ROWS] {
        &self.rows
    }

    /// Replace one row
    ///
    /// # Panics
    /// If `row >= ROWS`.
    pub fn set_row(&mut self, row: usize, pixels: &[Pixel; COLS]) {
        self.rows[row] = *pixels;
    }

    /// Replace one row from its flat `[r, g, ...]` bytes
    ///
    /// # Panics
    /// If `row >= ROWS`.
    pub fn set_row_bytes(&mut self, row: usize, bytes: &[u8]) -> Result<(), FrameSizeError> {
        if bytes.len() != Self::ROW_BYTES {
            return Err(FrameSizeError {
                expected: Self::ROW_BYTES,
                actual: bytes.len(),
            });
        }
        self.fill_row_from_bytes(row, bytes);
        Ok(())
    }

    /// Set every pixel to the same value
    pub fn fill(&mut self, pixel: Pixel) {
        for row in self.rows.iter_mut() {
            row.fill(pixel);
        }
    }

    /// Set every pixel dark
    pub fn clear(&mut self) {
        self.fill(Pixel::OFF);
    }

    fn fill_row_from_bytes(&mut self, row: usize, bytes: &[u8]) {
        for (pixel, pair) in self.rows[row].iter_mut().zip(bytes.chunks_exact(BYTES_PER_PIXEL)) {
            *pixel = Pixel::new(pair[0], pair[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_dark() {
        let frame = Framebuffer::<4>::new();
        assert!(frame.rows().iter().flatten().all(|p| *p == Pixel::OFF));
    }

    #[test]
    fn test_from_bytes_row_major() {
        let mut bytes = [0u8; Framebuffer::<2>::FRAME_BYTES];
        // row 0, col 1
        bytes[2] = 10;
        bytes[3] = 20;
        // row 7, col 0
        bytes[28] = 255;
        bytes[29] = 1;

        let frame = Framebuffer::<2>::from_bytes(&bytes).unwrap();
        assert_eq!(frame.row(0)[1], Pixel::new(10, 20));
        assert_eq!(frame.row(7)[0], Pixel::new(255, 1));
        assert_eq!(frame.row(3)[0], Pixel::OFF);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_size() {
        let short = [0u8; 31];
        assert_eq!(
            Framebuffer::<2>::from_bytes(&short),
            Err(FrameSizeError {
                expected: 32,
                actual: 31
            })
        );

        let long = [0u8; 33];
        assert!(Framebuffer::<2>::from_bytes(&long).is_err());
    }

    #[test]
    fn test_set_row_bytes() {
        let mut frame = Framebuffer::<3>::new();
        frame.set_row_bytes(5, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(
            frame.row(5),
            &[Pixel::new(1, 2), Pixel::new(3, 4), Pixel::new(5, 6)]
        );

        assert!(frame.set_row_bytes(5, &[1, 2]).is_err());
        // Rejected write leaves the row untouched
        assert_eq!(frame.row(5)[0], Pixel::new(1, 2));
    }

    #[test]
    fn test_clear() {
        let mut frame = Framebuffer::<2>::new();
        frame.fill(Pixel::new(9, 9));
        frame.clear();
        assert_eq!(frame, Framebuffer::new());
    }
}
