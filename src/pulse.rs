//! Single-wire pulse encoding
//!
//! NeoPixel devices are self-clocking: every data bit is one high pulse
//! followed by low time, and the width of the high part decides the bit.
//! Driving the wire from an SPI peripheral turns each data bit into one
//! bus word whose leading ones form the high pulse.

/// Number of pulses (bus words) emitted per encoded byte.
pub const PULSES_PER_BYTE: usize = 8;

/// Raw bus the pulses are shifted out on.
///
/// Implement this trait for the peripheral wired to the LED data line.
pub trait PulseBus {
    /// Transmit one raw bus word
    fn send(&mut self, word: u8);

    /// Wait until every queued word has left the bus
    fn flush(&mut self) {}
}

impl<T: PulseBus + ?Sized> PulseBus for &mut T {
    fn send(&mut self, word: u8) {
        (**self).send(word);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

/// Bus words standing for a logical 1 and a logical 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseEncoding {
    /// Long pulse (logical 1)
    pub one: u8,
    /// Short pulse (logical 0)
    pub zero: u8,
}

impl PulseEncoding {
    /// Pulse words for an SPI bus clocked at 8 MHz.
    ///
    /// Each SPI bit lasts 0.125µs: six high bits for a 1, four for a 0.
    pub const SPI_8MHZ: Self = Self {
        one: 0xFC,
        zero: 0xF0,
    };

    /// Bus word for a single data bit
    #[inline]
    pub const fn word(self, bit: bool) -> u8 {
        if bit { self.one } else { self.zero }
    }
}

impl Default for PulseEncoding {
    fn default() -> Self {
        Self::SPI_8MHZ
    }
}

/// Pulse pattern for a byte, most significant bit first
pub const fn pulses(encoding: PulseEncoding, value: u8) -> [u8; PULSES_PER_BYTE] {
    let mut words = [0; PULSES_PER_BYTE];
    let mut bits = value;
    let mut i = 0;
    while i < PULSES_PER_BYTE {
        words[i] = encoding.word(bits & 0x80 != 0);
        bits <<= 1;
        i += 1;
    }
    words
}

/// Shift one byte out on the bus as eight pulses
pub fn encode_byte<B: PulseBus + ?Sized>(bus: &mut B, encoding: PulseEncoding, value: u8) {
    for word in pulses(encoding, value) {
        bus.send(word);
    }
}
