//! Light state and command application
//!
//! Keeps the user-facing state of the lamp (power, brightness, color and
//! color name), turns it into a migration target and reports the resulting
//! state back after every applied command.

use core::fmt::{self, Write};

use embedded_hal::delay::DelayNs;
use heapless::String;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::buffer::ColorBuffer;
use crate::channel::CommandChannel;
use crate::color::{Rgb, dim, rgb_from_u32};
use crate::migration::MigrationEngine;
use crate::pulse::PulseBus;

/// Maximum stored length of a color name, in bytes
pub const COLOR_NAME_CAPACITY: usize = 32;

/// Capacity of a serialized status report
pub const STATUS_JSON_CAPACITY: usize = 64;

/// Highest brightness, in percent
pub const MAX_BRIGHTNESS: u8 = 100;

/// Longest possible report
const LONGEST_STATUS: &str = r#"{"on":false,"brightness":255,"color":4294967295}"#;

const _: () = assert!(LONGEST_STATUS.len() <= STATUS_JSON_CAPACITY);

pub type ColorName = String<COLOR_NAME_CAPACITY>;
pub type StatusJson = String<STATUS_JSON_CAPACITY>;

/// User-facing state of the light
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightState {
    pub on: bool,
    /// Brightness in percent (0-100)
    pub brightness: u8,
    /// Color in 0xRRGGBB format
    pub color: u32,
    pub name: ColorName,
}

impl LightState {
    pub fn new(on: bool, brightness: u8, color: u32) -> Self {
        Self {
            on,
            brightness: brightness.min(MAX_BRIGHTNESS),
            color,
            name: ColorName::new(),
        }
    }

    /// Color the matrix should show for this state.
    ///
    /// Black when off, otherwise the color dimmed by the brightness
    /// percentage, rounded down per channel.
    pub fn effective_target(&self) -> Rgb {
        if !self.on {
            return Rgb { r: 0, g: 0, b: 0 };
        }
        dim(rgb_from_u32(self.color), self.brightness)
    }

    /// Update the fields present in `command`
    pub fn apply(&mut self, command: &LightCommand) {
        if let Some(on) = command.toggle {
            self.on = on;
        }
        if let Some(color) = command.color {
            self.color = color;
        }
        if let Some(name) = &command.name {
            self.name.clone_from(name);
        }
        if let Some(brightness) = command.brightness {
            self.brightness = brightness.min(MAX_BRIGHTNESS);
        }
    }

    /// Snapshot for reporting
    pub const fn status(&self) -> StatusReport {
        StatusReport {
            on: self.on,
            brightness: self.brightness,
            color: self.color,
        }
    }
}

impl Default for LightState {
    /// Off, 10% brightness, green
    fn default() -> Self {
        Self::new(false, 10, 0x00FF00)
    }
}

/// Requested change of the light state.
///
/// Absent fields leave the corresponding state untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightCommand {
    pub toggle: Option<bool>,
    pub color: Option<u32>,
    pub name: Option<ColorName>,
    pub brightness: Option<u8>,
}

impl LightCommand {
    #[must_use]
    pub fn with_toggle(mut self, on: bool) -> Self {
        self.toggle = Some(on);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// Set the color name, truncated to [`COLOR_NAME_CAPACITY`] bytes
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        let mut stored = ColorName::new();
        for ch in name.chars() {
            if stored.push(ch).is_err() {
                break;
            }
        }
        self.name = Some(stored);
        self
    }
}

/// State reported back after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub on: bool,
    pub brightness: u8,
    pub color: u32,
}

impl StatusReport {
    /// Serialize as `{"on":<bool>,"brightness":<int>,"color":<int>}`
    pub fn to_json(&self) -> StatusJson {
        let mut json = StatusJson::new();
        let _ = write!(json, "{self}");
        json
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"on\":{},\"brightness\":{},\"color\":{}}}",
            self.on, self.brightness, self.color
        )
    }
}

/// Owner of the matrix: applies commands and runs the resulting migrations
pub struct LightController<'a, B, D, const ROWS: usize, const LEDS_PER_ROW: usize>
where
    B: PulseBus,
    D: DelayNs,
{
    engine: MigrationEngine<'a, B, D>,
    buffer: ColorBuffer<ROWS, LEDS_PER_ROW>,
    state: LightState,
}

impl<'a, B, D, const ROWS: usize, const LEDS_PER_ROW: usize>
    LightController<'a, B, D, ROWS, LEDS_PER_ROW>
where
    B: PulseBus,
    D: DelayNs,
{
    /// Create a controller with a dark matrix
    pub fn new(engine: MigrationEngine<'a, B, D>, state: LightState) -> Self {
        Self {
            engine,
            buffer: ColorBuffer::new(),
            state,
        }
    }

    /// Run the power-on self test, then show the initial state
    pub fn start(&mut self) {
        self.engine.self_test(&mut self.buffer);
        if self.state.effective_target() != self.buffer.first() {
            self.transition();
        }
    }

    /// Apply a command, migrate to the new target and report the state
    pub fn apply(&mut self, command: &LightCommand) -> StatusReport {
        self.state.apply(command);
        #[cfg(feature = "esp32-log")]
        println!(
            "[LightController.apply] on={} brightness={} color={:06x}",
            self.state.on, self.state.brightness, self.state.color
        );
        self.transition();
        self.state.status()
    }

    /// Apply every queued command in order.
    ///
    /// `publish` receives the status after each command. Returns the number
    /// of applied commands.
    pub fn process_pending<const SIZE: usize>(
        &mut self,
        commands: &CommandChannel<SIZE>,
        mut publish: impl FnMut(&StatusReport),
    ) -> usize {
        let mut applied = 0;
        while let Some(command) = commands.try_receive() {
            let status = self.apply(&command);
            publish(&status);
            applied += 1;
        }
        applied
    }

    /// Migrate the matrix to the target of the current state
    pub fn transition(&mut self) {
        let target = self.state.effective_target();
        self.engine.migrate(&mut self.buffer, target);
    }

    pub const fn state(&self) -> &LightState {
        &self.state
    }

    pub const fn buffer(&self) -> &ColorBuffer<ROWS, LEDS_PER_ROW> {
        &self.buffer
    }

    pub fn engine_mut(&mut self) -> &mut MigrationEngine<'a, B, D> {
        &mut self.engine
    }
}
