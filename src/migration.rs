//! Row-staggered color migration
//!
//! A migration moves a uniformly colored matrix to a new solid color. Every
//! row fades linearly over `steps` ticks, but row `k` starts `k * steps / ROWS`
//! ticks after row 0, so the new color sweeps across the matrix as a wipe.
//!
//! [`Migration`] holds the per-tick algorithm and never blocks.
//! [`MigrationEngine`] drives it to completion: one frame and one smoothing
//! delay per tick, always `2 * steps` ticks regardless of the color distance.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::buffer::ColorBuffer;
use crate::color::Rgb;
use crate::pulse::PulseBus;
use crate::transmitter::FrameTransmitter;

/// Number of ticks a single row needs to reach the target color
pub const STEPS: u16 = 100;

/// Delay between two migration frames
pub const SMOOTHING_DELAY: Duration = Duration::from_millis(5);

/// Dim green shown by the power-on self test
pub const SELF_TEST_COLOR: Rgb = Rgb { r: 0, g: 64, b: 0 };

const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Timing of a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Ticks a single row needs to reach the target (at least 1)
    pub steps: u16,
    /// Delay after every transmitted frame
    pub frame_delay: Duration,
}

impl MigrationConfig {
    pub const DEFAULT: Self = Self {
        steps: STEPS,
        frame_delay: SMOOTHING_DELAY,
    };

    /// Total blocking time of one migration, settle delays excluded
    pub fn duration(&self) -> Duration {
        self.frame_delay * (2 * u32::from(self.steps.max(1)))
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Signed per-channel distance between source and target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColorDelta {
    r: i32,
    g: i32,
    b: i32,
}

impl ColorDelta {
    fn between(source: Rgb, target: Rgb) -> Self {
        Self {
            r: i32::from(target.r) - i32::from(source.r),
            g: i32::from(target.g) - i32::from(source.g),
            b: i32::from(target.b) - i32::from(source.b),
        }
    }
}

/// State of one migration between two solid colors.
///
/// Each row owns a threshold counter that is advanced once per tick. A row
/// is recolored only while its threshold lies in `(0, steps]`; before that it
/// keeps the source color, after that it keeps the target color.
#[derive(Debug, Clone)]
pub struct Migration<const ROWS: usize> {
    source: Rgb,
    target: Rgb,
    delta: ColorDelta,
    thresholds: [i32; ROWS],
    steps: i32,
    ticks: u32,
}

impl<const ROWS: usize> Migration<ROWS> {
    /// Start a migration from `source` to `target`
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn new(source: Rgb, target: Rgb, steps: u16) -> Self {
        let steps = i32::from(steps.max(1));
        let stagger = if ROWS == 0 { 0 } else { steps / ROWS as i32 };
        Self {
            source,
            target,
            delta: ColorDelta::between(source, target),
            thresholds: core::array::from_fn(|row| -stagger * row as i32),
            steps,
            ticks: 0,
        }
    }

    /// Start a migration from the current color of `buffer`.
    ///
    /// The source color is taken from the first pixel only; the buffer is
    /// assumed to be uniform.
    pub fn from_buffer<const LEDS_PER_ROW: usize>(
        buffer: &ColorBuffer<ROWS, LEDS_PER_ROW>,
        target: Rgb,
        steps: u16,
    ) -> Self {
        Self::new(buffer.first(), target, steps)
    }

    /// Advance the migration by one tick, recoloring active rows of `buffer`.
    ///
    /// Returns `false` without touching the buffer once all ticks are done.
    pub fn tick<const LEDS_PER_ROW: usize>(
        &mut self,
        buffer: &mut ColorBuffer<ROWS, LEDS_PER_ROW>,
    ) -> bool {
        if self.is_complete() {
            return false;
        }
        self.ticks += 1;

        let (source, delta, steps) = (self.source, self.delta, self.steps);
        for (threshold, row) in self.thresholds.iter_mut().zip(buffer.rows_mut()) {
            *threshold += 1;
            if *threshold > 0 && *threshold <= steps {
                row.fill(interpolate(source, delta, *threshold, steps));
            }
        }
        true
    }

    /// Threshold counter of a row
    pub fn threshold(&self, row: usize) -> Option<i32> {
        self.thresholds.get(row).copied()
    }

    /// Check if a row is recolored on the current tick
    pub fn is_row_active(&self, row: usize) -> bool {
        self.threshold(row)
            .is_some_and(|threshold| threshold > 0 && threshold <= self.steps)
    }

    /// Check if a row has reached the target color
    pub fn is_row_done(&self, row: usize) -> bool {
        self.threshold(row)
            .is_some_and(|threshold| threshold >= self.steps)
    }

    /// Ticks performed so far
    pub const fn ticks_elapsed(&self) -> u32 {
        self.ticks
    }

    /// Ticks of the whole migration
    #[allow(clippy::cast_sign_loss)]
    pub const fn total_ticks(&self) -> u32 {
        2 * self.steps as u32
    }

    pub const fn is_complete(&self) -> bool {
        self.ticks >= self.total_ticks()
    }

    pub const fn source(&self) -> Rgb {
        self.source
    }

    pub const fn target(&self) -> Rgb {
        self.target
    }
}

/// Color of a row at `threshold` out of `steps`, rounded down per channel
fn interpolate(source: Rgb, delta: ColorDelta, threshold: i32, steps: i32) -> Rgb {
    Rgb {
        r: lerp_floor(source.r, delta.r, threshold, steps),
        g: lerp_floor(source.g, delta.g, threshold, steps),
        b: lerp_floor(source.b, delta.b, threshold, steps),
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_floor(source: u8, delta: i32, threshold: i32, steps: i32) -> u8 {
    let value = (i32::from(source) * steps + delta * threshold).div_euclid(steps);
    value.clamp(0, 255) as u8
}

/// Blocking migration driver
///
/// Runs every tick of a [`Migration`], sending the full buffer after each
/// tick and waiting [`MigrationConfig::frame_delay`] before the next one.
/// A call blocks for [`MigrationConfig::duration`] plus the frame settle
/// delays and cannot be cancelled.
pub struct MigrationEngine<'a, B: PulseBus, D: DelayNs> {
    transmitter: FrameTransmitter<'a, B, D>,
    config: MigrationConfig,
}

impl<'a, B: PulseBus, D: DelayNs> MigrationEngine<'a, B, D> {
    /// Create an engine with default timings
    pub fn new(transmitter: FrameTransmitter<'a, B, D>) -> Self {
        Self::with_config(transmitter, MigrationConfig::DEFAULT)
    }

    pub fn with_config(transmitter: FrameTransmitter<'a, B, D>, config: MigrationConfig) -> Self {
        Self {
            transmitter,
            config,
        }
    }

    /// Animate `buffer` to the solid `target` color
    pub fn migrate<const ROWS: usize, const LEDS_PER_ROW: usize>(
        &mut self,
        buffer: &mut ColorBuffer<ROWS, LEDS_PER_ROW>,
        target: Rgb,
    ) {
        let mut migration = Migration::from_buffer(buffer, target, self.config.steps);
        #[cfg(feature = "esp32-log")]
        println!(
            "[MigrationEngine.migrate] ({}, {}, {}) -> ({}, {}, {}) in {} ticks",
            migration.source().r,
            migration.source().g,
            migration.source().b,
            target.r,
            target.g,
            target.b,
            migration.total_ticks()
        );

        while migration.tick(buffer) {
            self.transmitter.transmit(buffer.pixels());
            self.transmitter.pause(self.config.frame_delay);
        }

        #[cfg(feature = "esp32-log")]
        println!("[MigrationEngine.migrate] done");
    }

    /// Send the buffer as-is, without animation
    pub fn show<const ROWS: usize, const LEDS_PER_ROW: usize>(
        &mut self,
        buffer: &ColorBuffer<ROWS, LEDS_PER_ROW>,
    ) {
        self.transmitter.transmit(buffer.pixels());
    }

    /// Power-on check of the whole chain: wipe to dim green, then to black
    pub fn self_test<const ROWS: usize, const LEDS_PER_ROW: usize>(
        &mut self,
        buffer: &mut ColorBuffer<ROWS, LEDS_PER_ROW>,
    ) {
        self.migrate(buffer, SELF_TEST_COLOR);
        self.migrate(buffer, BLACK);
    }

    pub const fn config(&self) -> &MigrationConfig {
        &self.config
    }

    pub fn transmitter_mut(&mut self) -> &mut FrameTransmitter<'a, B, D> {
        &mut self.transmitter
    }
}
