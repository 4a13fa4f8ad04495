//! Mock implementations for testing without hardware.
//!
//! This module provides a test double for [`DigitalOutput`], enabling
//! development and testing on desktop without a board attached.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockOutput`] | [`DigitalOutput`] | Records every line write, can inject failures |
//!
//! # Example
//!
//! ```rust
//! use rs_sevseg::hal::{LineEvent, MockOutput};
//! use rs_sevseg::traits::{DigitalOutput, Level, LineId};
//!
//! let mut display = MockOutput::new();
//! let observer = display.clone(); // shares the same log
//!
//! display.set_high(LineId(26)).unwrap();
//! display.set_low(LineId(11)).unwrap();
//!
//! assert_eq!(observer.level(LineId(26)), Some(Level::High));
//! assert_eq!(
//!     observer.events(),
//!     vec![
//!         LineEvent { line: LineId(26), level: Level::High },
//!         LineEvent { line: LineId(11), level: Level::Low },
//!     ]
//! );
//! ```
//!
//! [`DigitalOutput`]: crate::traits::DigitalOutput

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::PinConfig;
use crate::digit::DigitSlot;
use crate::segment::{Segment, SegmentPattern};
use crate::traits::{DigitalOutput, Level, LineId};

/// One recorded line write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineEvent {
    /// Line that was written.
    pub line: LineId,
    /// Level it was driven to.
    pub level: Level,
}

#[derive(Debug, Default)]
struct LineLog {
    levels: BTreeMap<LineId, Level>,
    events: Vec<LineEvent>,
    failing: BTreeSet<LineId>,
}

/// Mock digital output for testing.
///
/// Clones share one log, so a test can keep a clone as an observer while
/// the other handle is moved into the multiplexer (or into a spawned task).
/// Writes to lines registered with [`fail_on`](Self::fail_on) return
/// `Err(())` and are not recorded.
#[derive(Clone, Debug, Default)]
pub struct MockOutput {
    log: Arc<Mutex<LineLog>>,
}

impl MockOutput {
    /// Creates a mock with no lines written.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level of `line`, or `None` if it was never written.
    pub fn level(&self, line: LineId) -> Option<Level> {
        self.log().levels.get(&line).copied()
    }

    /// Every successful write, oldest first.
    pub fn events(&self) -> Vec<LineEvent> {
        self.log().events.clone()
    }

    /// Number of successful writes recorded.
    pub fn event_count(&self) -> usize {
        self.log().events.len()
    }

    /// Forgets recorded writes; current levels are kept.
    pub fn clear_events(&self) {
        self.log().events.clear();
    }

    /// Makes every write to `line` fail.
    pub fn fail_on(&self, line: LineId) {
        self.log().failing.insert(line);
    }

    /// Stops injecting failures.
    pub fn clear_failures(&self) {
        self.log().failing.clear();
    }

    /// Digits whose select line is currently at its active level.
    pub fn selected_digits(&self, pins: &PinConfig) -> Vec<DigitSlot> {
        let log = self.log();
        DigitSlot::ALL
            .into_iter()
            .filter(|slot| log.levels.get(&pins.select_line(*slot)) == Some(&pins.select_active))
            .collect()
    }

    /// Segments whose line is currently at its active level.
    pub fn lit_pattern(&self, pins: &PinConfig) -> SegmentPattern {
        let log = self.log();
        let lit: Vec<Segment> = Segment::ALL
            .into_iter()
            .filter(|s| log.levels.get(&pins.segment_line(*s)) == Some(&pins.segment_active))
            .collect();
        SegmentPattern::from_segments(&lit)
    }

    /// What a viewer sees right now: the single selected digit and the
    /// pattern on the bus. `None` if zero or both digits are selected.
    pub fn visible(&self, pins: &PinConfig) -> Option<(DigitSlot, SegmentPattern)> {
        match self.selected_digits(pins).as_slice() {
            [slot] => Some((*slot, self.lit_pattern(pins))),
            _ => None,
        }
    }

    fn log(&self) -> MutexGuard<'_, LineLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DigitalOutput for MockOutput {
    type Error = ();

    fn set_level(&mut self, line: LineId, level: Level) -> Result<(), ()> {
        let mut log = self.log();
        if log.failing.contains(&line) {
            return Err(());
        }
        log.levels.insert(line, level);
        log.events.push(LineEvent { line, level });
        Ok(())
    }
}
