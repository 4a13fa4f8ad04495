//! Async task topology on tokio.
//!
//! [`Topology::run`] spawns five tasks:
//!
//! | Task | Period | Does |
//! |------|--------|------|
//! | counter | `count_period_ms` | publishes the next value to all mailboxes |
//! | gate | `multiplex_period_ms` | grants the bus, waits for the token back |
//! | left / right renderer | on grant | draws its digit, holds `hold_ms`, blanks |
//! | indicator | `multiplex_period_ms` | pulses the LED for `pulse_ms` per new value |
//!
//! Tokens travel over capacity-1 channels: one per renderer from the gate,
//! and one shared channel back. The gate is the only task that ever waits
//! with a deadline (`grant_timeout_ms`); a renderer that keeps the token
//! longer stops the whole topology with [`RuntimeError::GrantOverrun`].

use core::convert::Infallible;
use core::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};

use crate::counter::{CounterGenerator, CounterValue};
use crate::digit::{DigitRenderer, DigitSlot};
use crate::indicator::IndicatorLed;
use crate::mailbox::Mailbox;
use crate::multiplex::{DisplayError, GateToken, Multiplexer};
use crate::topology::Topology;
use crate::traits::DigitalOutput;

/// Errors that stop a running topology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeError<E> {
    /// Driving the display failed.
    Display(DisplayError<E>),
    /// Driving the indicator LED failed.
    Indicator(E),
    /// A renderer kept the bus past the grant timeout.
    GrantOverrun(DigitSlot),
    /// A renderer task is no longer receiving grants.
    RendererGone(DigitSlot),
    /// The gate task is gone; seen by the renderer of this slot.
    GateClosed(DigitSlot),
    /// A task panicked or was cancelled.
    TaskPanicked(String),
    /// Every task finished without reporting an error.
    NoTasks,
}

impl<E: fmt::Debug> fmt::Display for RuntimeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Display(e) => write!(f, "display: {}", e),
            Self::Indicator(e) => write!(f, "indicator write failed: {:?}", e),
            Self::GrantOverrun(slot) => write!(f, "{} renderer overran its grant", slot),
            Self::RendererGone(slot) => write!(f, "{} renderer stopped", slot),
            Self::GateClosed(slot) => write!(f, "gate closed under {} renderer", slot),
            Self::TaskPanicked(msg) => write!(f, "task failed: {}", msg),
            Self::NoTasks => write!(f, "no tasks running"),
        }
    }
}

impl<E: fmt::Debug> std::error::Error for RuntimeError<E> {}

impl<E> From<DisplayError<E>> for RuntimeError<E> {
    fn from(e: DisplayError<E>) -> Self {
        Self::Display(e)
    }
}

type TaskResult<E> = Result<Infallible, RuntimeError<E>>;

fn millis(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms))
}

fn periodic(period: Duration) -> time::Interval {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

impl<O, L> Topology<O, L>
where
    O: DigitalOutput + Send + 'static,
    L: DigitalOutput<Error = O::Error> + Send + 'static,
    O::Error: fmt::Debug + Send + 'static,
{
    /// Spawns every task and runs until one of them fails.
    ///
    /// Never returns `Ok`. Dropping the returned future aborts all tasks.
    pub async fn run(self) -> Result<Infallible, RuntimeError<O::Error>> {
        let Topology {
            config,
            generator,
            multiplexer,
            left,
            right,
            indicator,
            pulse,
        } = self;
        let timing = &config.timing;

        let (left_tx, left_rx) = mpsc::channel(1);
        let (right_tx, right_rx) = mpsc::channel(1);
        let (return_tx, return_rx) = mpsc::channel(1);

        let mut tasks: JoinSet<TaskResult<O::Error>> = JoinSet::new();
        tasks.spawn(counter_task(generator, millis(timing.count_period_ms)));
        tasks.spawn(gate_task(
            multiplexer,
            [left_tx, right_tx],
            return_rx,
            millis(timing.multiplex_period_ms),
            millis(timing.grant_timeout_ms),
        ));
        tasks.spawn(renderer_task(
            left,
            left_rx,
            return_tx.clone(),
            millis(timing.hold_ms),
        ));
        tasks.spawn(renderer_task(
            right,
            right_rx,
            return_tx,
            millis(timing.hold_ms),
        ));
        tasks.spawn(indicator_task(
            indicator,
            pulse,
            millis(timing.multiplex_period_ms),
            millis(timing.pulse_ms),
        ));

        log::info!("{}: {} tasks running", config.device.name, tasks.len());

        let outcome = match tasks.join_next().await {
            Some(Ok(Err(e))) => e,
            Some(Ok(Ok(never))) => match never {},
            Some(Err(e)) => RuntimeError::TaskPanicked(e.to_string()),
            None => RuntimeError::NoTasks,
        };
        log::error!("{}: stopping: {}", config.device.name, outcome);
        tasks.shutdown().await;
        Err(outcome)
    }
}

async fn counter_task<E>(mut generator: CounterGenerator, period: Duration) -> TaskResult<E> {
    let mut interval = periodic(period);
    loop {
        interval.tick().await;
        generator.tick();
    }
}

pub(crate) async fn gate_task<O: DigitalOutput>(
    mut multiplexer: Multiplexer<O>,
    renderers: [mpsc::Sender<GateToken<O>>; 2],
    mut returns: mpsc::Receiver<GateToken<O>>,
    period: Duration,
    grant_timeout: Duration,
) -> TaskResult<O::Error> {
    let mut interval = periodic(period);
    loop {
        interval.tick().await;

        let token = multiplexer.grant()?;
        let slot = token.slot();
        renderers[slot.index()]
            .send(token)
            .await
            .map_err(|_| RuntimeError::RendererGone(slot))?;

        match time::timeout(grant_timeout, returns.recv()).await {
            Ok(Some(token)) => multiplexer.reclaim(token)?,
            Ok(None) => return Err(RuntimeError::RendererGone(slot)),
            Err(_) => {
                log::warn!("{} renderer held the bus past {:?}", slot, grant_timeout);
                return Err(RuntimeError::GrantOverrun(slot));
            }
        }
    }
}

async fn renderer_task<O: DigitalOutput>(
    mut renderer: DigitRenderer,
    mut grants: mpsc::Receiver<GateToken<O>>,
    returns: mpsc::Sender<GateToken<O>>,
    hold: Duration,
) -> TaskResult<O::Error> {
    let slot = renderer.slot();
    loop {
        let mut token = grants
            .recv()
            .await
            .ok_or(RuntimeError::GateClosed(slot))?;

        renderer.render(&mut token)?;
        time::sleep(hold).await;
        renderer.release(&mut token)?;

        returns
            .send(token)
            .await
            .map_err(|_| RuntimeError::GateClosed(slot))?;
    }
}

async fn indicator_task<L: DigitalOutput>(
    mut led: IndicatorLed<L>,
    pulse: Arc<Mailbox<CounterValue>>,
    poll: Duration,
    width: Duration,
) -> TaskResult<L::Error> {
    let mut interval = periodic(poll);
    loop {
        interval.tick().await;
        if pulse.try_receive().is_none() {
            continue;
        }
        led.on().map_err(RuntimeError::Indicator)?;
        time::sleep(width).await;
        led.off().map_err(RuntimeError::Indicator)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PinConfig;
    use crate::hal::MockOutput;
    use crate::multiplex::DisplayHardware;

    fn multiplexer() -> Multiplexer<MockOutput> {
        Multiplexer::new(DisplayHardware::new(MockOutput::new(), PinConfig::default())).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn gate_reports_overrun_when_token_kept() {
        let (left_tx, mut left_rx) = mpsc::channel(1);
        let (right_tx, _right_rx) = mpsc::channel(1);
        let (_return_tx, return_rx) = mpsc::channel(1);

        let gate = tokio::spawn(gate_task(
            multiplexer(),
            [left_tx, right_tx],
            return_rx,
            Duration::from_millis(4),
            Duration::from_millis(10),
        ));

        // Take the token and sit on it
        let _token = left_rx.recv().await.unwrap();
        let result = gate.await.unwrap();
        assert_eq!(result.unwrap_err(), RuntimeError::GrantOverrun(DigitSlot::Left));
    }

    #[tokio::test(start_paused = true)]
    async fn gate_reports_missing_renderer() {
        let (left_tx, left_rx) = mpsc::channel(1);
        let (right_tx, _right_rx) = mpsc::channel(1);
        let (_return_tx, return_rx) = mpsc::channel(1);
        drop(left_rx);

        let result = gate_task(
            multiplexer(),
            [left_tx, right_tx],
            return_rx,
            Duration::from_millis(4),
            Duration::from_millis(10),
        )
        .await;
        assert_eq!(result.unwrap_err(), RuntimeError::RendererGone(DigitSlot::Left));
    }

    #[tokio::test(start_paused = true)]
    async fn renderer_reports_closed_gate() {
        let (grant_tx, grant_rx) = mpsc::channel::<GateToken<MockOutput>>(1);
        let (return_tx, _return_rx) = mpsc::channel(1);
        drop(grant_tx);

        let renderer = DigitRenderer::new(DigitSlot::Right, Arc::new(Mailbox::new()));
        let result = renderer_task(renderer, grant_rx, return_tx, Duration::from_millis(3)).await;
        assert_eq!(result.unwrap_err(), RuntimeError::GateClosed(DigitSlot::Right));
    }

    #[tokio::test(start_paused = true)]
    async fn indicator_pulses_once_per_value() {
        let probe = MockOutput::new();
        let pins = PinConfig::default();
        let led = IndicatorLed::new(probe.clone(), pins.led, pins.led_active);
        let pulse = Arc::new(Mailbox::new());
        pulse.send(CounterValue::MIN);

        let task = tokio::spawn(indicator_task(
            led,
            Arc::clone(&pulse),
            Duration::from_millis(4),
            Duration::from_millis(250),
        ));

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(probe.level(pins.led), Some(pins.led_active));

        time::sleep(Duration::from_millis(300)).await;
        assert_eq!(probe.level(pins.led), Some(!pins.led_active));
        // One on, one off
        assert_eq!(probe.event_count(), 2);

        task.abort();
    }

    #[test]
    fn runtime_error_messages() {
        let err: RuntimeError<()> = RuntimeError::GrantOverrun(DigitSlot::Right);
        assert_eq!(err.to_string(), "right renderer overran its grant");

        let err: RuntimeError<()> = DisplayError::GrantOutstanding.into();
        assert_eq!(err.to_string(), "display: bus already granted");
    }
}
