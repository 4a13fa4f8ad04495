//! ESP32-C3 SuperMini hardware abstraction layer for the seven-segment counter.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Display**: two-digit common-cathode seven-segment module, digits
//!   switched through NPN transistors (select lines active high)
//! - **Indicator**: onboard blue LED on GPIO8 (active low)
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

use esp_idf_hal::gpio::{AnyOutputPin, Output, OutputPin, PinDriver};
use esp_idf_hal::sys::EspError;

use crate::config::PinConfig;
use crate::hal::pins::{PinBank, PinBankError};
use crate::traits::{Level, LineId};

/// Pin driver type used for every line.
pub type Esp32Pin = PinDriver<'static, AnyOutputPin, Output>;

/// The ten display lines (8 segments + 2 digit selects).
pub type Esp32Display = PinBank<Esp32Pin, 10>;

/// The indicator LED line.
pub type Esp32Led = PinBank<Esp32Pin, 1>;

/// Errors from building the pin banks.
pub type Esp32PinError = PinBankError<EspError>;

/// Pin assignments for SuperMini ESP32-C3.
///
/// Segments sit on the low GPIO block so the module can be wired with a
/// single ribbon; GPIO8 carries the onboard LED.
pub mod pins {
    // =========================================================================
    // Segments (active high through 220R resistors)
    // =========================================================================

    /// Segment A
    pub const SEG_A: u8 = 0;
    /// Segment B
    pub const SEG_B: u8 = 1;
    /// Segment C
    pub const SEG_C: u8 = 2;
    /// Segment D
    pub const SEG_D: u8 = 3;
    /// Segment E
    pub const SEG_E: u8 = 4;
    /// Segment F
    pub const SEG_F: u8 = 5;
    /// Segment G
    pub const SEG_G: u8 = 6;
    /// Decimal point
    pub const SEG_DP: u8 = 7;

    // =========================================================================
    // Digit Select
    // =========================================================================

    /// Left (tens) digit transistor base
    pub const SELECT_LEFT: u8 = 10;

    /// Right (units) digit transistor base
    pub const SELECT_RIGHT: u8 = 20;

    // =========================================================================
    // Indicator
    // =========================================================================

    /// Onboard blue LED (active low)
    pub const LED: u8 = 8;
}

/// Line assignment for the SuperMini wiring.
pub fn pin_config() -> PinConfig {
    use crate::traits::LineId as L;

    PinConfig::default()
        .with_select_lines(L(pins::SELECT_LEFT), L(pins::SELECT_RIGHT))
        .with_segment_lines([
            L(pins::SEG_A),
            L(pins::SEG_B),
            L(pins::SEG_C),
            L(pins::SEG_D),
            L(pins::SEG_E),
            L(pins::SEG_F),
            L(pins::SEG_G),
            L(pins::SEG_DP),
        ])
        .with_led(L(pins::LED))
        .with_select_active(Level::High)
        .with_segment_active(Level::High)
        .with_led_active(Level::Low)
}

/// Configures `pin` as a push-pull output.
pub fn output_pin(pin: impl OutputPin) -> Result<Esp32Pin, EspError> {
    PinDriver::output(pin.downgrade_output())
}

/// Adds `pin` to `bank` as `line`, configuring it as an output.
pub fn register<const N: usize>(
    bank: PinBank<Esp32Pin, N>,
    line: u8,
    pin: impl OutputPin,
) -> Result<PinBank<Esp32Pin, N>, Esp32PinError> {
    let driver = output_pin(pin).map_err(PinBankError::Pin)?;
    bank.with_pin(LineId(line), driver)
}
