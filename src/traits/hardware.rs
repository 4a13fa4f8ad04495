//! Hardware abstraction traits for digital output lines.
//!
//! The display and the indicator LED are nothing but a handful of push-pull
//! outputs. This module defines the single capability the rest of the crate
//! needs from the platform: drive one line to a logic level.
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Level`] | Logic level of an output line |
//! | [`LineId`] | Identifier of one physical line (GPIO number) |
//! | [`DigitalOutput`] | Sets lines to a level |
//!
//! # Implementation
//!
//! For testing and desktop development, use [`crate::hal::MockOutput`].
//! Any `embedded-hal` 1.0 pin can be used through `hal::PinBank`
//! (requires `embedded-hal` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_sevseg::traits::{DigitalOutput, Level, LineId};
//! use rs_sevseg::hal::MockOutput;
//!
//! let mut out = MockOutput::new();
//! out.set_high(LineId(26)).unwrap();
//! out.set_level(LineId(11), Level::Low).unwrap();
//!
//! assert_eq!(out.level(LineId(26)), Some(Level::High));
//! assert_eq!(out.level(LineId(11)), Some(Level::Low));
//! ```

use core::fmt;
use core::ops::Not;

/// Logic level of an output line.
///
/// # Default
///
/// Defaults to [`Low`](Self::Low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Line driven low (0 V).
    #[default]
    Low,
    /// Line driven high (supply voltage).
    High,
}

impl Level {
    /// Returns the level as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_sevseg::Level;
    ///
    /// assert_eq!(Level::Low.as_str(), "low");
    /// assert_eq!(Level::High.as_str(), "high");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::High => "high",
        }
    }

    /// Returns `level` when `on` is true and its inverse otherwise.
    ///
    /// Used to translate "asserted" into an electrical level for lines that
    /// may be active-high or active-low.
    ///
    /// ```
    /// use rs_sevseg::Level;
    ///
    /// assert_eq!(Level::active(Level::Low, true), Level::Low);
    /// assert_eq!(Level::active(Level::Low, false), Level::High);
    /// ```
    #[inline]
    pub fn active(level: Level, on: bool) -> Level {
        if on {
            level
        } else {
            !level
        }
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Identifier of one physical output line.
///
/// On microcontrollers this is the GPIO number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LineId(pub u8);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.0)
    }
}

/// Digital output trait - drives output lines to a logic level.
///
/// Implement this for whatever owns the pins: a GPIO bank, a shift
/// register, or a test double.
///
/// # Implementation Notes
///
/// - `set_level` must be synchronous; the caller relies on write order
/// - Writing the level a line already has is allowed and must be harmless
/// - Unknown lines should be reported through `Self::Error`
///
/// # Example Implementation
///
/// ```rust
/// use rs_sevseg::traits::{DigitalOutput, Level, LineId};
///
/// struct PortA { bits: u32 }
///
/// impl DigitalOutput for PortA {
///     type Error = ();
///
///     fn set_level(&mut self, line: LineId, level: Level) -> Result<(), ()> {
///         if line.0 >= 32 {
///             return Err(());
///         }
///         match level {
///             Level::High => self.bits |= 1 << line.0,
///             Level::Low => self.bits &= !(1 << line.0),
///         }
///         Ok(())
///     }
/// }
///
/// let mut port = PortA { bits: 0 };
/// port.set_high(LineId(3)).unwrap();
/// assert_eq!(port.bits, 0b1000);
/// ```
pub trait DigitalOutput {
    /// Error type for line writes.
    type Error;

    /// Drive `line` to `level`.
    fn set_level(&mut self, line: LineId, level: Level) -> Result<(), Self::Error>;

    /// Convenience method to drive a line high.
    fn set_high(&mut self, line: LineId) -> Result<(), Self::Error> {
        self.set_level(line, Level::High)
    }

    /// Convenience method to drive a line low.
    fn set_low(&mut self, line: LineId) -> Result<(), Self::Error> {
        self.set_level(line, Level::Low)
    }
}

impl<T: DigitalOutput + ?Sized> DigitalOutput for &mut T {
    type Error = T::Error;

    fn set_level(&mut self, line: LineId, level: Level) -> Result<(), Self::Error> {
        (**self).set_level(line, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Level Tests
    // =========================================================================

    #[test]
    fn level_default_is_low() {
        assert_eq!(Level::default(), Level::Low);
    }

    #[test]
    fn level_not() {
        assert_eq!(!Level::Low, Level::High);
        assert_eq!(!Level::High, Level::Low);
    }

    #[test]
    fn level_active_translation() {
        assert_eq!(Level::active(Level::High, true), Level::High);
        assert_eq!(Level::active(Level::High, false), Level::Low);
        assert_eq!(Level::active(Level::Low, true), Level::Low);
        assert_eq!(Level::active(Level::Low, false), Level::High);
    }

    #[test]
    fn line_id_display() {
        assert_eq!(format!("{}", LineId(26)), "line 26");
    }

    // =========================================================================
    // DigitalOutput Default Methods Tests
    // =========================================================================

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(LineId, Level)>,
    }

    impl DigitalOutput for Recorder {
        type Error = ();

        fn set_level(&mut self, line: LineId, level: Level) -> Result<(), ()> {
            self.writes.push((line, level));
            Ok(())
        }
    }

    #[test]
    fn set_high_and_low_default_impls() {
        let mut out = Recorder::default();
        out.set_high(LineId(1)).unwrap();
        out.set_low(LineId(2)).unwrap();

        assert_eq!(
            out.writes,
            vec![(LineId(1), Level::High), (LineId(2), Level::Low)]
        );
    }

    #[test]
    fn mutable_reference_forwards() {
        fn drive<O: DigitalOutput<Error = ()>>(mut out: O) {
            out.set_high(LineId(7)).unwrap();
        }

        let mut out = Recorder::default();
        drive(&mut out);
        assert_eq!(out.writes, vec![(LineId(7), Level::High)]);
    }
}
