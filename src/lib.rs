//! # rs-sevseg
//!
//! A two-digit multiplexed seven-segment counter: the display counts
//! 0..=42 and back down, forever, while an indicator LED blinks once per
//! count.
//!
//! ## Features
//!
//! - **Newest-value-wins mailboxes**: the counter never waits for a digit
//! - **Ghost-free multiplexing**: the two digits share segment lines, and
//!   ownership of the lines moves with a [`GateToken`] so only one digit is
//!   ever selected
//! - **Hardware abstraction**: a single [`DigitalOutput`] trait, with a mock
//!   for desktop testing and `embedded-hal` / ESP32 implementations
//! - **Async topology**: one tokio task per component (feature `runtime`)
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `segment` - digit to segment pattern lookup
//! - `mailbox` - single-slot overwrite channel
//! - `counter` - triangle-wave counter and its publisher
//! - `digit` - per-digit renderer
//! - `multiplex` - bus ownership and digit switching
//! - `topology` / `runtime` - wiring and tasks
//! - `hal` - concrete outputs (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_sevseg::{config::Config, hal::MockOutput, DigitSlot, Topology};
//!
//! let display = MockOutput::new();
//! let config = Config::default();
//! let mut topology = Topology::init(&config, display.clone(), MockOutput::new()).unwrap();
//!
//! topology.tick(); // publishes 0
//! topology.tick(); // publishes 1
//!
//! topology.refresh_digit().unwrap(); // left digit
//! let (slot, pattern) = topology.refresh_digit().unwrap();
//! assert_eq!(slot, DigitSlot::Right);
//! assert_eq!(pattern.decode(), Some(1));
//! ```

#![warn(missing_docs)]

/// Shared configuration system for desktop and ESP32.
pub mod config;
/// Triangle-wave counter and the generator that publishes it.
pub mod counter;
/// Digit slots and per-digit renderers.
pub mod digit;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Indicator LED.
pub mod indicator;
/// Single-slot newest-value-wins mailbox.
pub mod mailbox;
/// Bus ownership and digit switching.
pub mod multiplex;
/// Seven-segment encoding.
pub mod segment;
/// Component wiring and startup.
pub mod topology;
/// Core traits for hardware abstraction.
pub mod traits;

/// Tokio task topology.
#[cfg(feature = "runtime")]
pub mod runtime;

// Re-exports for convenience
pub use counter::{CountDirection, CounterGenerator, CounterValue, TriangleCounter};
pub use digit::{DigitRenderer, DigitSlot};
pub use indicator::IndicatorLed;
pub use mailbox::Mailbox;
pub use multiplex::{DisplayError, DisplayHardware, GateToken, GrantState, Multiplexer};
pub use segment::{encode, Segment, SegmentPattern};
pub use topology::{StartupError, Topology};
pub use traits::{DigitalOutput, Level, LineId};

#[cfg(feature = "runtime")]
pub use runtime::RuntimeError;

// Config re-exports
pub use config::{Config, ConfigError, DeviceConfig, PinConfig, TimingConfig};
