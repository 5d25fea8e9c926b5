//! Frame transmission to the LED chain

use core::convert::Infallible;

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use smart_leds::SmartLedsWrite;

use crate::bus::SharedBus;
use crate::color::Rgb;
use crate::pulse::{PulseBus, PulseEncoding, encode_byte};

/// Minimum low time after a frame before the chain latches the new colors.
pub const SETTLE_DELAY: Duration = Duration::from_micros(500);

/// Number of bytes sent per pixel (green, red, blue)
pub const BYTES_PER_PIXEL: usize = 3;

/// Writes whole frames to the LED chain over a shared bus.
///
/// A frame is sent inside a single bus lock, so no other bus user can
/// interleave with it. The transmitter then holds the line idle for
/// [`SETTLE_DELAY`] before returning.
pub struct FrameTransmitter<'a, B: PulseBus, D: DelayNs> {
    bus: &'a SharedBus<B>,
    delay: D,
    encoding: PulseEncoding,
    settle: Duration,
}

impl<'a, B: PulseBus, D: DelayNs> FrameTransmitter<'a, B, D> {
    /// Create a transmitter with the 8 MHz SPI pulse encoding
    pub fn new(bus: &'a SharedBus<B>, delay: D) -> Self {
        Self::with_encoding(bus, delay, PulseEncoding::SPI_8MHZ)
    }

    /// Create a transmitter with custom pulse words
    pub fn with_encoding(bus: &'a SharedBus<B>, delay: D, encoding: PulseEncoding) -> Self {
        Self {
            bus,
            delay,
            encoding,
            settle: SETTLE_DELAY,
        }
    }

    /// Send one frame and wait for the chain to latch it
    pub fn transmit(&mut self, pixels: &[Rgb]) {
        self.transmit_iter(pixels.iter().copied());
    }

    /// Block for `duration`
    pub fn pause(&mut self, duration: Duration) {
        let micros = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
        self.delay.delay_us(micros);
    }

    /// Pulse encoding in use
    pub const fn encoding(&self) -> PulseEncoding {
        self.encoding
    }

    fn transmit_iter(&mut self, pixels: impl IntoIterator<Item = Rgb>) {
        let encoding = self.encoding;
        self.bus.lock(|bus| {
            for pixel in pixels {
                // Devices expect green first
                let grb: [u8; BYTES_PER_PIXEL] = [pixel.g, pixel.r, pixel.b];
                for byte in grb {
                    encode_byte(bus, encoding, byte);
                }
            }
            bus.flush();
        });
        self.pause(self.settle);
    }
}

impl<B: PulseBus, D: DelayNs> SmartLedsWrite for FrameTransmitter<'_, B, D> {
    type Error = Infallible;
    type Color = Rgb;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.transmit_iter(iterator.into_iter().map(Into::into));
        Ok(())
    }
}
