//! [`DigitalOutput`] over `embedded-hal` 1.0 output pins.
//!
//! [`PinBank`] maps [`LineId`]s onto already-configured output pins. Any HAL
//! whose pin driver implements `embedded_hal::digital::OutputPin` plugs in
//! directly; on ESP32 that is `esp_idf_hal::gpio::PinDriver`.
//!
//! # Example
//!
//! ```rust,ignore
//! use rs_sevseg::hal::PinBank;
//! use rs_sevseg::traits::LineId;
//!
//! let led = PinBank::<_, 1>::new().with_pin(LineId(8), led_pin)?;
//! ```
//!
//! [`DigitalOutput`]: crate::traits::DigitalOutput

use core::fmt;

use embedded_hal::digital::OutputPin;
use heapless::Vec;

use crate::traits::{DigitalOutput, Level, LineId};

/// Errors from a [`PinBank`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PinBankError<E> {
    /// No pin is registered for this line.
    UnknownLine(LineId),
    /// The line is already registered.
    DuplicateLine(LineId),
    /// The bank is full.
    Full,
    /// The pin driver reported an error.
    Pin(E),
}

impl<E: fmt::Debug> fmt::Display for PinBankError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLine(line) => write!(f, "no pin registered for {}", line),
            Self::DuplicateLine(line) => write!(f, "{} registered twice", line),
            Self::Full => write!(f, "pin bank is full"),
            Self::Pin(e) => write!(f, "pin error: {:?}", e),
        }
    }
}

impl<E: fmt::Debug> std::error::Error for PinBankError<E> {}

/// Up to `N` output pins addressed by line id.
pub struct PinBank<P, const N: usize> {
    pins: Vec<(LineId, P), N>,
}

impl<P: OutputPin, const N: usize> PinBank<P, N> {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Registers `pin` as `line`.
    ///
    /// # Errors
    ///
    /// [`PinBankError::DuplicateLine`] or [`PinBankError::Full`].
    pub fn with_pin(mut self, line: LineId, pin: P) -> Result<Self, PinBankError<P::Error>> {
        if self.pins.iter().any(|(l, _)| *l == line) {
            return Err(PinBankError::DuplicateLine(line));
        }
        self.pins
            .push((line, pin))
            .map_err(|_| PinBankError::Full)?;
        Ok(self)
    }

    /// Number of registered pins.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Returns true if no pin is registered.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

impl<P: OutputPin, const N: usize> Default for PinBank<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin, const N: usize> DigitalOutput for PinBank<P, N> {
    type Error = PinBankError<P::Error>;

    fn set_level(&mut self, line: LineId, level: Level) -> Result<(), Self::Error> {
        let (_, pin) = self
            .pins
            .iter_mut()
            .find(|(l, _)| *l == line)
            .ok_or(PinBankError::UnknownLine(line))?;
        match level {
            Level::High => pin.set_high(),
            Level::Low => pin.set_low(),
        }
        .map_err(PinBankError::Pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakePin {
        high: Rc<Cell<bool>>,
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high.set(true);
            Ok(())
        }
    }

    #[test]
    fn drives_registered_pin() {
        let pin = FakePin::default();
        let probe = Rc::clone(&pin.high);
        let mut bank = PinBank::<_, 2>::new().with_pin(LineId(5), pin).unwrap();

        bank.set_high(LineId(5)).unwrap();
        assert!(probe.get());
        bank.set_low(LineId(5)).unwrap();
        assert!(!probe.get());
    }

    #[test]
    fn unknown_line_is_an_error() {
        let mut bank = PinBank::<FakePin, 2>::new();
        assert_eq!(
            bank.set_high(LineId(1)),
            Err(PinBankError::UnknownLine(LineId(1)))
        );
    }

    #[test]
    fn duplicate_and_full_rejected() {
        let bank = PinBank::<_, 1>::new()
            .with_pin(LineId(1), FakePin::default())
            .unwrap();
        assert_eq!(bank.len(), 1);

        let err = PinBank::<_, 2>::new()
            .with_pin(LineId(1), FakePin::default())
            .unwrap()
            .with_pin(LineId(1), FakePin::default())
            .err();
        assert_eq!(err, Some(PinBankError::DuplicateLine(LineId(1))));

        let err = bank.with_pin(LineId(2), FakePin::default()).err();
        assert_eq!(err, Some(PinBankError::Full));
    }
}
