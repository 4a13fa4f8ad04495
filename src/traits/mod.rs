//! Trait definitions for hardware abstraction.
//!
//! This module defines the abstractions that allow rs-sevseg to:
//! - Run on different hardware (ESP32, any `embedded-hal` pins, desktop mock)
//! - Test the multiplexing sequence without a board attached
//!
//! # Submodules
//!
//! - `hardware`: Logic levels, line identifiers and the [`DigitalOutput`] capability
//!
//! Raw register access, pin direction setup and the scheduler itself stay
//! outside the crate; everything here only drives lines that are already
//! configured as outputs.

pub mod hardware;

pub use hardware::*;
