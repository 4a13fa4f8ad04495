//! Indicator LED pulsed on every counter update.

use crate::traits::{DigitalOutput, Level, LineId};

/// A single LED on its own output.
///
/// # Example
///
/// ```rust
/// use rs_sevseg::{hal::MockOutput, IndicatorLed, Level, LineId};
///
/// let probe = MockOutput::new();
/// let mut led = IndicatorLed::new(probe.clone(), LineId(13), Level::High);
///
/// led.on().unwrap();
/// assert_eq!(probe.level(LineId(13)), Some(Level::High));
/// led.off().unwrap();
/// assert!(!led.is_on());
/// ```
#[derive(Debug)]
pub struct IndicatorLed<L> {
    output: L,
    line: LineId,
    active: Level,
    on: bool,
}

impl<L: DigitalOutput> IndicatorLed<L> {
    /// Wraps `output`; the LED lights when `line` is at `active`.
    ///
    /// Nothing is written until [`on`](Self::on) or [`off`](Self::off).
    pub fn new(output: L, line: LineId, active: Level) -> Self {
        Self {
            output,
            line,
            active,
            on: false,
        }
    }

    /// Lights the LED.
    pub fn on(&mut self) -> Result<(), L::Error> {
        self.set(true)
    }

    /// Turns the LED off.
    pub fn off(&mut self) -> Result<(), L::Error> {
        self.set(false)
    }

    /// Returns true if the last successful write lit the LED.
    #[inline]
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// The line driving the LED.
    #[inline]
    pub fn line(&self) -> LineId {
        self.line
    }

    /// Releases the underlying output.
    pub fn into_output(self) -> L {
        self.output
    }

    fn set(&mut self, on: bool) -> Result<(), L::Error> {
        self.output
            .set_level(self.line, Level::active(self.active, on))?;
        self.on = on;
        Ok(())
    }
}
