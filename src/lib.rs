#![no_std]

pub mod buffer;
pub mod bus;
pub mod channel;
pub mod color;
pub mod dispatcher;
pub mod migration;
pub mod pulse;
pub mod transmitter;

pub use buffer::ColorBuffer;
pub use bus::{SharedBus, SpiPulseBus};
pub use channel::{ChannelFull, CommandChannel};
pub use dispatcher::{LightCommand, LightController, LightState, StatusReport};
pub use migration::{Migration, MigrationConfig, MigrationEngine, SMOOTHING_DELAY, STEPS};
pub use pulse::{PulseBus, PulseEncoding};
pub use transmitter::{FrameTransmitter, SETTLE_DELAY};

pub use color::Rgb;
pub use embassy_time::Duration;

/// Rows of the reference 4x4 matrix
pub const ROWS: usize = 4;

/// LEDs per row of the reference 4x4 matrix
pub const LEDS_PER_ROW: usize = 4;

/// Pixel buffer of the reference 4x4 matrix
pub type Matrix4x4 = ColorBuffer<ROWS, LEDS_PER_ROW>;
