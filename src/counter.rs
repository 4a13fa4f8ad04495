//! Up/down counter and its publisher.
//!
//! [`TriangleCounter`] produces the infinite sequence
//! `0, 1, ..., 42, 41, ..., 0, 1, ...`. [`CounterGenerator`] drives it once
//! per count period and publishes each value to the two digit mailboxes
//! (and optionally the indicator mailbox).
//!
//! # Ordering
//!
//! Each step first fixes the direction from the current value (0 counts up,
//! 42 counts down), then publishes the current value, then moves. A consumer
//! therefore always sees the boundary value itself before the count turns
//! around.
//!
//! # Example
//!
//! ```rust
//! use rs_sevseg::{CountDirection, TriangleCounter};
//!
//! let mut counter = TriangleCounter::new();
//! let first: Vec<u16> = counter.by_ref().take(3).map(|v| v.get()).collect();
//! assert_eq!(first, vec![0, 1, 2]);
//! assert_eq!(counter.direction(), CountDirection::Ascending);
//!
//! // One full round trip is 84 steps
//! let mut counter = TriangleCounter::new();
//! let round: Vec<u16> = counter.by_ref().take(85).map(|v| v.get()).collect();
//! assert_eq!(round[42], 42);
//! assert_eq!(round[84], 0);
//! ```

use std::sync::Arc;

use crate::mailbox::Mailbox;

/// A counter value in `[0, 42]`.
///
/// Only [`TriangleCounter`] creates values while running; [`CounterValue::new`]
/// exists for tests and for seeding renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CounterValue(u16);

impl CounterValue {
    /// Lowest value; the count turns upward here.
    pub const MIN: Self = Self(0);

    /// Highest value; the count turns downward here.
    pub const MAX: Self = Self(42);

    /// Creates a value, or `None` if it is outside `[0, 42]`.
    ///
    /// ```
    /// use rs_sevseg::CounterValue;
    ///
    /// assert_eq!(CounterValue::new(42).map(|v| v.get()), Some(42));
    /// assert!(CounterValue::new(43).is_none());
    /// ```
    pub const fn new(value: u16) -> Option<Self> {
        if value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the raw value.
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Tens digit (integer division by 10).
    #[inline]
    pub const fn tens(self) -> u16 {
        self.0 / 10
    }

    /// Units digit (remainder of division by 10).
    #[inline]
    pub const fn units(self) -> u16 {
        self.0 % 10
    }
}

impl core::fmt::Display for CounterValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Direction the counter is moving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CountDirection {
    /// Counting up towards [`CounterValue::MAX`].
    #[default]
    Ascending,
    /// Counting down towards [`CounterValue::MIN`].
    Descending,
}

impl CountDirection {
    /// Returns the opposite direction.
    pub const fn reversed(self) -> Self {
        match self {
            CountDirection::Ascending => CountDirection::Descending,
            CountDirection::Descending => CountDirection::Ascending,
        }
    }
}

/// Lazy, infinite, restartable triangle-wave sequence over `[0, 42]`.
///
/// Implements [`Iterator`]; `next()` never returns `None`.
#[derive(Clone, Debug, Default)]
pub struct TriangleCounter {
    current: CounterValue,
    direction: CountDirection,
}

impl TriangleCounter {
    /// Creates a counter starting at 0, ascending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a counter that will emit `start` next, moving in `direction`.
    ///
    /// The boundary rule still applies on the first step: starting at 42
    /// always turns downward, starting at 0 always turns upward.
    pub fn starting_at(start: CounterValue, direction: CountDirection) -> Self {
        Self {
            current: start,
            direction,
        }
    }

    /// Restarts the sequence at 0, ascending.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The value the next step will emit.
    #[inline]
    pub fn current(&self) -> CounterValue {
        self.current
    }

    /// The direction the counter is moving.
    #[inline]
    pub fn direction(&self) -> CountDirection {
        self.direction
    }

    /// Advances one step and returns the value to publish.
    ///
    /// The returned value is the one held *before* the increment.
    pub fn step(&mut self) -> CounterValue {
        if self.current == CounterValue::MIN {
            self.direction = CountDirection::Ascending;
        } else if self.current == CounterValue::MAX {
            self.direction = CountDirection::Descending;
        }

        let emitted = self.current;
        let next = match self.direction {
            CountDirection::Ascending => emitted.0 + 1,
            CountDirection::Descending => emitted.0 - 1,
        };
        self.current = CounterValue(next);
        emitted
    }
}

impl Iterator for TriangleCounter {
    type Item = CounterValue;

    fn next(&mut self) -> Option<CounterValue> {
        Some(self.step())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Publishes the counting sequence to the digit mailboxes.
///
/// Call [`tick`](Self::tick) once per count period. Publishing never blocks:
/// the mailboxes overwrite unread values, so a slow renderer only ever
/// misses intermediate counts.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rs_sevseg::{CounterGenerator, Mailbox};
///
/// let left = Arc::new(Mailbox::new());
/// let right = Arc::new(Mailbox::new());
/// let mut generator = CounterGenerator::new(Arc::clone(&left), Arc::clone(&right));
///
/// generator.tick();
/// generator.tick();
///
/// // Both renderers see the newest value only
/// assert_eq!(left.try_receive().map(|v| v.get()), Some(1));
/// assert_eq!(right.try_receive().map(|v| v.get()), Some(1));
/// ```
#[derive(Debug)]
pub struct CounterGenerator {
    counter: TriangleCounter,
    left: Arc<Mailbox<CounterValue>>,
    right: Arc<Mailbox<CounterValue>>,
    pulse: Option<Arc<Mailbox<CounterValue>>>,
}

impl CounterGenerator {
    /// Creates a generator publishing to the left and right digit mailboxes.
    pub fn new(left: Arc<Mailbox<CounterValue>>, right: Arc<Mailbox<CounterValue>>) -> Self {
        Self {
            counter: TriangleCounter::new(),
            left,
            right,
            pulse: None,
        }
    }

    /// Also publish every value to `pulse` (drives the indicator LED).
    pub fn with_pulse(mut self, pulse: Arc<Mailbox<CounterValue>>) -> Self {
        self.pulse = Some(pulse);
        self
    }

    /// Replace the underlying sequence (e.g. to start mid-way in tests).
    pub fn with_counter(mut self, counter: TriangleCounter) -> Self {
        self.counter = counter;
        self
    }

    /// Computes the next value, publishes it and returns it.
    pub fn tick(&mut self) -> CounterValue {
        let before = self.counter.direction();
        let value = self.counter.step();
        if self.counter.direction() != before {
            log::debug!("count turns {:?} at {}", self.counter.direction(), value);
        }

        self.left.send(value);
        self.right.send(value);
        if let Some(pulse) = &self.pulse {
            pulse.send(value);
        }
        log::trace!("published {}", value);
        value
    }

    /// Restarts the sequence at 0, ascending.
    pub fn restart(&mut self) {
        self.counter.reset();
    }

    /// The underlying sequence state.
    pub fn counter(&self) -> &TriangleCounter {
        &self.counter
    }
}
