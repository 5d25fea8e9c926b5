//! Pixel buffer of the LED matrix

use crate::color::Rgb;

const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Color of every pixel in the matrix.
///
/// Pixels are stored row-major, which is also the order of the device chain.
/// Dimensions are fixed at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBuffer<const ROWS: usize, const LEDS_PER_ROW: usize> {
    rows: [[Rgb; LEDS_PER_ROW]; ROWS],
}

impl<const ROWS: usize, const LEDS_PER_ROW: usize> ColorBuffer<ROWS, LEDS_PER_ROW> {
    /// Number of rows
    pub const ROWS: usize = ROWS;
    /// Number of pixels in one row
    pub const LEDS_PER_ROW: usize = LEDS_PER_ROW;
    /// Total number of pixels
    pub const LEN: usize = ROWS * LEDS_PER_ROW;

    /// Create a buffer with all pixels off
    pub const fn new() -> Self {
        Self::filled(BLACK)
    }

    /// Create a buffer with all pixels set to `color`
    pub const fn filled(color: Rgb) -> Self {
        Self {
            rows: [[color; LEDS_PER_ROW]; ROWS],
        }
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: Rgb) {
        for row in &mut self.rows {
            row.fill(color);
        }
    }

    /// Set every pixel of row `row` to `color`
    ///
    /// Rows outside the matrix are ignored.
    pub fn fill_row(&mut self, row: usize, color: Rgb) {
        if let Some(pixels) = self.rows.get_mut(row) {
            pixels.fill(color);
        }
    }

    /// Pixels of one row
    pub fn row(&self, row: usize) -> Option<&[Rgb; LEDS_PER_ROW]> {
        self.rows.get(row)
    }

    /// Pixel at position `index` in chain order
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.pixels().get(index).copied()
    }

    /// Overwrite the pixel at position `index` in chain order
    ///
    /// Indexes outside the matrix are ignored.
    pub fn set(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.rows.as_flattened_mut().get_mut(index) {
            *pixel = color;
        }
    }

    /// First pixel of the chain
    pub fn first(&self) -> Rgb {
        self.pixels().first().copied().unwrap_or(BLACK)
    }

    /// All pixels in chain order
    pub fn pixels(&self) -> &[Rgb] {
        self.rows.as_flattened()
    }

    /// Check if every pixel has the same color
    pub fn is_uniform(&self) -> bool {
        let first = self.first();
        self.pixels().iter().all(|pixel| *pixel == first)
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [[Rgb; LEDS_PER_ROW]; ROWS] {
        &mut self.rows
    }
}

impl<const ROWS: usize, const LEDS_PER_ROW: usize> Default for ColorBuffer<ROWS, LEDS_PER_ROW> {
    fn default() -> Self {
        Self::new()
    }
}
