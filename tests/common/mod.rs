//! Recording fakes for the bus and delay

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorKind, ErrorType, SpiBus};
use neo_matrix::{PulseBus, PulseEncoding, Rgb};

/// Bus that records every word it is asked to send
#[derive(Debug, Default)]
pub struct RecordingBus {
    pub words: Vec<u8>,
    pub flushes: usize,
}

impl PulseBus for RecordingBus {
    fn send(&mut self, word: u8) {
        self.words.push(word);
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

/// Delay that records every requested wait in nanoseconds
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub waits_ns: Vec<u32>,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.waits_ns.iter().map(|ns| u64::from(*ns)).sum::<u64>() / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ns.push(ns);
    }
}

/// SPI peripheral that records writes and can fail selected ones
#[derive(Debug, Default)]
pub struct RecordingSpi {
    pub writes: Vec<Vec<u8>>,
    pub flushes: usize,
    /// Zero-based indexes of `write` calls that return an error
    pub failing_writes: Vec<usize>,
    attempts: usize,
}

impl RecordingSpi {
    pub fn failing_at(failing_writes: &[usize]) -> Self {
        Self {
            failing_writes: failing_writes.to_vec(),
            ..Self::default()
        }
    }

    /// All successfully written words, in order
    pub fn words(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

impl ErrorType for RecordingSpi {
    type Error = ErrorKind;
}

impl SpiBus<u8> for RecordingSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.failing_writes.contains(&attempt) {
            return Err(ErrorKind::Other);
        }
        self.writes.push(words.to_vec());
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.write(&words.to_vec())?;
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

/// Turn recorded pulse words back into bytes
pub fn decode(words: &[u8], encoding: PulseEncoding) -> Vec<u8> {
    words
        .chunks(8)
        .map(|pulses| {
            pulses.iter().fold(0u8, |byte, word| {
                assert!(
                    *word == encoding.one || *word == encoding.zero,
                    "unexpected bus word {word:#04x}"
                );
                (byte << 1) | u8::from(*word == encoding.one)
            })
        })
        .collect()
}

/// Group decoded bytes into pixels, assuming green-red-blue order
pub fn decode_grb(bytes: &[u8]) -> Vec<Rgb> {
    bytes
        .chunks(3)
        .map(|grb| Rgb {
            r: grb[1],
            g: grb[0],
            b: grb[2],
        })
        .collect()
}
