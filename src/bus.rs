//! Shared data bus
//!
//! The LED chain shares its wire with another peripheral. A frame that is
//! interrupted by foreign bus traffic desynchronizes every device after the
//! interruption, so each user must take exclusive ownership of the bus
//! for the whole duration of its transfer.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::spi::SpiBus;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::pulse::PulseBus;

/// Bus guarded by a critical section.
///
/// All bus users access the bus through [`SharedBus::lock`], which keeps
/// interrupts out for the whole closure.
pub struct SharedBus<B> {
    inner: Mutex<RefCell<B>>,
}

impl<B> SharedBus<B> {
    /// Wrap a bus for shared use
    pub const fn new(bus: B) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(bus)),
        }
    }

    /// Run `f` with exclusive access to the bus.
    ///
    /// Nested calls from inside `f` panic on the inner borrow; code that may
    /// run while the bus is held uses [`SharedBus::try_lock`].
    pub fn lock<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        critical_section::with(|cs| {
            let mut bus = self.inner.borrow(cs).borrow_mut();
            f(&mut *bus)
        })
    }

    /// Run `f` with exclusive access to the bus, unless it is already held.
    ///
    /// Returns `None` without calling `f` when called from inside another
    /// `lock` or `try_lock` closure.
    pub fn try_lock<R>(&self, f: impl FnOnce(&mut B) -> R) -> Option<R> {
        critical_section::with(|cs| {
            let mut bus = self.inner.borrow(cs).try_borrow_mut().ok()?;
            Some(f(&mut *bus))
        })
    }

    /// Release the wrapped bus
    pub fn into_inner(self) -> B {
        self.inner.into_inner().into_inner()
    }
}

/// Pulse bus on top of an SPI peripheral.
///
/// Only MOSI is used; the peripheral clock sets the pulse resolution
/// (see [`PulseEncoding::SPI_8MHZ`](crate::pulse::PulseEncoding::SPI_8MHZ)).
pub struct SpiPulseBus<S> {
    spi: S,
}

impl<S: SpiBus<u8>> SpiPulseBus<S> {
    pub const fn new(spi: S) -> Self {
        Self { spi }
    }

    /// Release the SPI peripheral
    pub fn release(self) -> S {
        self.spi
    }
}

impl<S: SpiBus<u8>> PulseBus for SpiPulseBus<S> {
    fn send(&mut self, word: u8) {
        // A lost word corrupts this frame only; the next frame rewrites the chain
        if let Err(_err) = self.spi.write(&[word]) {
            #[cfg(feature = "esp32-log")]
            println!("[SpiPulseBus.send] write failed: {:?}", _err);
        }
    }

    fn flush(&mut self) {
        if let Err(_err) = self.spi.flush() {
            #[cfg(feature = "esp32-log")]
            println!("[SpiPulseBus.flush] flush failed: {:?}", _err);
        }
    }
}
