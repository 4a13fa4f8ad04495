//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `pins`: [`DigitalOutput`](crate::traits::DigitalOutput) over `embedded-hal` output pins
//!   (requires `embedded-hal` feature)
//! - `esp32`: ESP32-C3 SuperMini wiring (requires `esp32` feature)

pub mod mock;

#[cfg(feature = "embedded-hal")]
pub mod pins;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "embedded-hal")]
pub use pins::{PinBank, PinBankError};
