//! Wiring of the counter, mailboxes, renderers, multiplexer and indicator.
//!
//! [`Topology::init`] is the single initialization step: it validates the
//! configuration, creates every mailbox and takes ownership of the outputs.
//! If it fails nothing has been started. With the `runtime` feature the
//! result is handed to `Topology::run`, which spawns one task per component.
//!
//! The synchronous [`tick`](Topology::tick) and
//! [`refresh_digit`](Topology::refresh_digit) steps drive the same pieces
//! without a runtime, which is how the display scenarios are tested.
//!
//! # Example
//!
//! ```rust
//! use rs_sevseg::{config::Config, hal::MockOutput, DigitSlot, Topology, TriangleCounter};
//! use rs_sevseg::{CountDirection, CounterValue};
//!
//! let display = MockOutput::new();
//! let config = Config::default();
//! let mut topology = Topology::init(&config, display.clone(), MockOutput::new())
//!     .unwrap()
//!     .start_at(TriangleCounter::starting_at(
//!         CounterValue::new(42).unwrap(),
//!         CountDirection::Ascending,
//!     ));
//!
//! assert_eq!(topology.tick().get(), 42);
//!
//! let (slot, pattern) = topology.refresh_digit().unwrap();
//! assert_eq!(slot, DigitSlot::Left);
//! assert_eq!(pattern.decode(), Some(4));
//! assert_eq!(display.visible(&config.pins), Some((DigitSlot::Left, pattern)));
//! ```

use core::fmt;
use std::sync::Arc;

use crate::config::{Config, ConfigError};
use crate::counter::{CounterGenerator, CounterValue, TriangleCounter};
use crate::digit::{DigitRenderer, DigitSlot};
use crate::indicator::IndicatorLed;
use crate::mailbox::Mailbox;
use crate::multiplex::{DisplayError, DisplayHardware, Multiplexer};
use crate::segment::SegmentPattern;
use crate::traits::DigitalOutput;

/// Fatal errors raised before any task starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartupError<E> {
    /// The configuration was rejected.
    Config(ConfigError),
    /// Blanking the display failed.
    Display(DisplayError<E>),
    /// Switching the indicator LED off failed.
    Indicator(E),
}

impl<E: fmt::Debug> fmt::Display for StartupError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {}", e),
            Self::Display(e) => write!(f, "display init failed: {}", e),
            Self::Indicator(e) => write!(f, "indicator init failed: {:?}", e),
        }
    }
}

impl<E: fmt::Debug> std::error::Error for StartupError<E> {}

impl<E> From<ConfigError> for StartupError<E> {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Every component of the counter display, wired together.
#[derive(Debug)]
pub struct Topology<O, L> {
    pub(crate) config: Config,
    pub(crate) generator: CounterGenerator,
    pub(crate) multiplexer: Multiplexer<O>,
    pub(crate) left: DigitRenderer,
    pub(crate) right: DigitRenderer,
    pub(crate) indicator: IndicatorLed<L>,
    pub(crate) pulse: Arc<Mailbox<CounterValue>>,
}

impl<O, L> Topology<O, L>
where
    O: DigitalOutput,
    L: DigitalOutput<Error = O::Error>,
{
    /// Validates `config` and takes ownership of the display and LED outputs.
    ///
    /// On success the display is blank with both digits deselected and the
    /// LED is off.
    ///
    /// # Errors
    ///
    /// - [`StartupError::Config`] if [`Config::validate`] fails; nothing is
    ///   written
    /// - [`StartupError::Display`] / [`StartupError::Indicator`] if an
    ///   initial line write fails
    pub fn init(config: &Config, display: O, led: L) -> Result<Self, StartupError<O::Error>> {
        config.validate()?;

        let left_mailbox = Arc::new(Mailbox::new());
        let right_mailbox = Arc::new(Mailbox::new());
        let pulse = Arc::new(Mailbox::new());

        let hardware = DisplayHardware::new(display, config.pins.clone());
        let multiplexer = Multiplexer::new(hardware).map_err(StartupError::Display)?;

        let mut indicator = IndicatorLed::new(led, config.pins.led, config.pins.led_active);
        indicator.off().map_err(StartupError::Indicator)?;

        let generator =
            CounterGenerator::new(Arc::clone(&left_mailbox), Arc::clone(&right_mailbox))
                .with_pulse(Arc::clone(&pulse));

        log::info!(
            "{}: display ready, counting every {}ms, {}Hz per digit",
            config.device.name,
            config.timing.count_period_ms,
            config.timing.refresh_hz()
        );

        Ok(Self {
            config: config.clone(),
            generator,
            multiplexer,
            left: DigitRenderer::new(DigitSlot::Left, left_mailbox),
            right: DigitRenderer::new(DigitSlot::Right, right_mailbox),
            indicator,
            pulse,
        })
    }
}

impl<O: DigitalOutput, L: DigitalOutput> Topology<O, L> {
    /// Replaces the count sequence, e.g. to start mid-range.
    pub fn start_at(self, counter: TriangleCounter) -> Self {
        Self {
            generator: self.generator.with_counter(counter),
            ..self
        }
    }

    /// The validated configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The counter generator.
    pub fn generator(&self) -> &CounterGenerator {
        &self.generator
    }

    /// The multiplexer.
    pub fn multiplexer(&self) -> &Multiplexer<O> {
        &self.multiplexer
    }

    /// The renderer for `slot`.
    pub fn renderer(&self, slot: DigitSlot) -> &DigitRenderer {
        match slot {
            DigitSlot::Left => &self.left,
            DigitSlot::Right => &self.right,
        }
    }

    /// The indicator LED.
    pub fn indicator(&self) -> &IndicatorLed<L> {
        &self.indicator
    }

    /// Takes the pending indicator pulse, if a value was published since the
    /// last call.
    pub fn take_pulse(&self) -> Option<CounterValue> {
        self.pulse.try_receive()
    }

    /// Publishes the next counter value.
    pub fn tick(&mut self) -> CounterValue {
        self.generator.tick()
    }

    /// Runs one grant window without waiting: switches to the next digit,
    /// lets its renderer drive the segments and takes the bus back.
    ///
    /// The digit stays lit until the next call.
    pub fn refresh_digit(&mut self) -> Result<(DigitSlot, SegmentPattern), DisplayError<O::Error>> {
        let mut token = self.multiplexer.grant()?;
        let slot = token.slot();
        let rendered = match slot {
            DigitSlot::Left => self.left.render(&mut token),
            DigitSlot::Right => self.right.render(&mut token),
        };
        self.multiplexer.reclaim(token)?;
        rendered.map(|pattern| (slot, pattern))
    }

    /// Turns the display and LED off and returns both outputs.
    pub fn shutdown(mut self) -> Result<(O, L), StartupError<O::Error>>
    where
        L: DigitalOutput<Error = O::Error>,
    {
        self.indicator.off().map_err(StartupError::Indicator)?;
        let hardware = self.multiplexer.into_hardware().map_err(StartupError::Display)?;
        Ok((hardware.into_output(), self.indicator.into_output()))
    }
}
