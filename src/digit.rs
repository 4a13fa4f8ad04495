//! Digit slots and the per-digit renderer.
//!
//! A [`DigitRenderer`] owns one side of the display. Whenever it is handed
//! the bus (a [`GateToken`] for its slot) it pulls the newest count from its
//! mailbox, extracts its digit and drives the segment lines.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rs_sevseg::{
//!     config::PinConfig, encode, hal::MockOutput, CounterValue, DigitRenderer, DigitSlot,
//!     DisplayHardware, Mailbox, Multiplexer,
//! };
//!
//! let mailbox = Arc::new(Mailbox::new());
//! let mut left = DigitRenderer::new(DigitSlot::Left, Arc::clone(&mailbox));
//!
//! let hardware = DisplayHardware::new(MockOutput::new(), PinConfig::default());
//! let mut mux = Multiplexer::new(hardware).unwrap();
//!
//! mailbox.send(CounterValue::new(37).unwrap());
//! let mut token = mux.grant().unwrap();
//! assert_eq!(token.slot(), DigitSlot::Left);
//!
//! let shown = left.render(&mut token).unwrap();
//! assert_eq!(shown, encode(3));
//!
//! left.release(&mut token).unwrap();
//! mux.reclaim(token).unwrap();
//! ```

use core::fmt;
use std::sync::Arc;

use crate::counter::CounterValue;
use crate::mailbox::Mailbox;
use crate::multiplex::{DisplayError, GateToken};
use crate::segment::{encode, SegmentPattern};
use crate::traits::DigitalOutput;

/// Which physical digit a renderer controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DigitSlot {
    /// Tens digit.
    Left,
    /// Units digit.
    Right,
}

impl DigitSlot {
    /// Both slots, left first.
    pub const ALL: [DigitSlot; 2] = [DigitSlot::Left, DigitSlot::Right];

    /// The other digit.
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            DigitSlot::Left => DigitSlot::Right,
            DigitSlot::Right => DigitSlot::Left,
        }
    }

    /// Index into per-slot arrays (left = 0).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            DigitSlot::Left => 0,
            DigitSlot::Right => 1,
        }
    }

    /// Returns the slot as a lowercase string.
    pub const fn as_str(self) -> &'static str {
        match self {
            DigitSlot::Left => "left",
            DigitSlot::Right => "right",
        }
    }

    /// Extracts this slot's digit from a raw value.
    ///
    /// Left takes the tens (`value / 10`), right the units (`value % 10`).
    /// A tens digit above 9 is passed through unchanged and encodes as the
    /// blank marker.
    ///
    /// ```
    /// use rs_sevseg::DigitSlot;
    ///
    /// assert_eq!(DigitSlot::Left.digit_of(42), 4);
    /// assert_eq!(DigitSlot::Right.digit_of(42), 2);
    /// assert_eq!(DigitSlot::Left.digit_of(123), 12);
    /// ```
    pub fn digit_of(self, value: u16) -> u8 {
        let digit = match self {
            DigitSlot::Left => value / 10,
            DigitSlot::Right => value % 10,
        };
        u8::try_from(digit).unwrap_or(u8::MAX)
    }
}

impl fmt::Display for DigitSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders one digit of the counter.
///
/// Holds the last value it rendered so the digit stays lit between counter
/// updates: a renderer with nothing pending redraws what it showed last.
/// Before the first update that is 0.
#[derive(Debug)]
pub struct DigitRenderer {
    slot: DigitSlot,
    mailbox: Arc<Mailbox<CounterValue>>,
    last: CounterValue,
    last_pattern: Option<SegmentPattern>,
}

impl DigitRenderer {
    /// Creates a renderer for `slot` reading from `mailbox`.
    pub fn new(slot: DigitSlot, mailbox: Arc<Mailbox<CounterValue>>) -> Self {
        Self {
            slot,
            mailbox,
            last: CounterValue::MIN,
            last_pattern: None,
        }
    }

    /// The digit this renderer drives.
    #[inline]
    pub fn slot(&self) -> DigitSlot {
        self.slot
    }

    /// The counter value used by the most recent render.
    #[inline]
    pub fn last_value(&self) -> CounterValue {
        self.last
    }

    /// The pattern driven by the most recent render, if any.
    #[inline]
    pub fn last_pattern(&self) -> Option<SegmentPattern> {
        self.last_pattern
    }

    /// Takes the newest pending value, or keeps the last one.
    pub fn latest(&mut self) -> CounterValue {
        if let Some(value) = self.mailbox.try_receive() {
            self.last = value;
        }
        self.last
    }

    /// The pattern this renderer would show for `value`.
    #[inline]
    pub fn pattern_for(&self, value: CounterValue) -> SegmentPattern {
        encode(self.slot.digit_of(value.get()))
    }

    /// Drives the segment lines for the latest value.
    ///
    /// The multiplexer has already selected this digit when it issued the
    /// token, so only segment lines are written here.
    ///
    /// # Errors
    ///
    /// - [`DisplayError::WrongSlot`] if the token is for the other digit;
    ///   nothing is written
    /// - [`DisplayError::Output`] if a line write fails
    pub fn render<O: DigitalOutput>(
        &mut self,
        token: &mut GateToken<O>,
    ) -> Result<SegmentPattern, DisplayError<O::Error>> {
        if token.slot() != self.slot {
            return Err(DisplayError::WrongSlot {
                expected: self.slot,
                actual: token.slot(),
            });
        }

        let value = self.latest();
        let pattern = self.pattern_for(value);
        token.show(pattern)?;
        self.last_pattern = Some(pattern);
        Ok(pattern)
    }

    /// Turns every segment off at the end of the grant window.
    pub fn release<O: DigitalOutput>(
        &self,
        token: &mut GateToken<O>,
    ) -> Result<(), DisplayError<O::Error>> {
        token.blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PinConfig;
    use crate::hal::MockOutput;
    use crate::multiplex::{DisplayHardware, Multiplexer};
    use crate::segment::Segment;

    fn value(v: u16) -> CounterValue {
        CounterValue::new(v).unwrap()
    }

    fn multiplexer() -> Multiplexer<MockOutput> {
        Multiplexer::new(DisplayHardware::new(MockOutput::new(), PinConfig::default())).unwrap()
    }

    // =========================================================================
    // DigitSlot Tests
    // =========================================================================

    #[test]
    fn slot_other() {
        assert_eq!(DigitSlot::Left.other(), DigitSlot::Right);
        assert_eq!(DigitSlot::Right.other(), DigitSlot::Left);
    }

    #[test]
    fn slot_digit_extraction() {
        assert_eq!(DigitSlot::Left.digit_of(7), 0);
        assert_eq!(DigitSlot::Right.digit_of(7), 7);
        assert_eq!(DigitSlot::Left.digit_of(40), 4);
        assert_eq!(DigitSlot::Right.digit_of(40), 0);
    }

    #[test]
    fn slot_digit_out_of_range_encodes_blank() {
        assert_eq!(encode(DigitSlot::Left.digit_of(250)), SegmentPattern::BLANK);
        assert_eq!(encode(DigitSlot::Left.digit_of(u16::MAX)), SegmentPattern::BLANK);
    }

    #[test]
    fn slot_display() {
        assert_eq!(DigitSlot::Left.to_string(), "left");
        assert_eq!(DigitSlot::Right.to_string(), "right");
    }

    // =========================================================================
    // DigitRenderer Tests
    // =========================================================================

    #[test]
    fn renders_zero_before_first_update() {
        let mailbox = Arc::new(Mailbox::new());
        let mut right = DigitRenderer::new(DigitSlot::Right, mailbox);
        let mut mux = multiplexer();

        let mut token = mux.grant().unwrap(); // left
        right.release(&mut token).unwrap();
        mux.reclaim(token).unwrap();

        let mut token = mux.grant().unwrap(); // right
        assert_eq!(right.render(&mut token).unwrap(), encode(0));
        assert_eq!(right.last_value(), CounterValue::MIN);
    }

    #[test]
    fn holds_last_value_when_nothing_pending() {
        let mailbox = Arc::new(Mailbox::new());
        let mut renderer = DigitRenderer::new(DigitSlot::Right, Arc::clone(&mailbox));

        mailbox.send(value(13));
        assert_eq!(renderer.latest(), value(13));
        assert_eq!(renderer.latest(), value(13));

        mailbox.send(value(14));
        assert_eq!(renderer.latest(), value(14));
    }

    #[test]
    fn wrong_slot_token_rejected_without_writes() {
        let mailbox = Arc::new(Mailbox::new());
        let mut right = DigitRenderer::new(DigitSlot::Right, Arc::clone(&mailbox));
        let mut mux = multiplexer();

        mailbox.send(value(8));
        let mut token = mux.grant().unwrap(); // left
        let err = right.render(&mut token).unwrap_err();
        assert_eq!(
            err,
            DisplayError::WrongSlot {
                expected: DigitSlot::Right,
                actual: DigitSlot::Left
            }
        );
        // The value was not consumed
        assert!(mailbox.is_pending());
    }

    #[test]
    fn render_drives_segments_and_release_blanks() {
        let mailbox = Arc::new(Mailbox::new());
        let mut left = DigitRenderer::new(DigitSlot::Left, Arc::clone(&mailbox));
        let output = MockOutput::new();
        let pins = PinConfig::default();
        let mut mux =
            Multiplexer::new(DisplayHardware::new(output.clone(), pins.clone())).unwrap();

        mailbox.send(value(42));
        let mut token = mux.grant().unwrap();
        left.render(&mut token).unwrap();

        let lit: Vec<Segment> = Segment::ALL
            .into_iter()
            .filter(|s| output.level(pins.segment_line(*s)) == Some(pins.segment_active))
            .collect();
        assert_eq!(lit, encode(4).lit().collect::<Vec<_>>());
        assert_eq!(left.last_pattern(), Some(encode(4)));

        left.release(&mut token).unwrap();
        for segment in Segment::ALL {
            assert_eq!(
                output.level(pins.segment_line(segment)),
                Some(!pins.segment_active)
            );
        }
    }
}
