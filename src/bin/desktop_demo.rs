//! Desktop demo running the full task topology on mock outputs.
//!
//! The display lines are simulated with [`MockOutput`]; a monitor task
//! samples them every millisecond, remembers what each digit last showed
//! and prints the two-digit readout twice per count period.
//!
//! # Usage
//!
//! ```sh
//! cargo run --bin desktop_demo            # runs for 10 seconds
//! cargo run --bin desktop_demo -- 30      # runs for 30 seconds
//! ```

use std::convert::Infallible;
use std::time::Duration;

use anyhow::Context;
use rs_sevseg::hal::MockOutput;
use rs_sevseg::{Config, PinConfig, Topology};

/// Default run time in seconds
const DEFAULT_SECONDS: u64 = 10;

/// Sampling interval of the simulated display
const SAMPLE_INTERVAL: Duration = Duration::from_millis(1);

fn main() -> anyhow::Result<()> {
    let seconds = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("invalid run time {:?}", arg))?,
        None => DEFAULT_SECONDS,
    };

    println!("=================================");
    println!("  rs-sevseg Desktop Demo");
    println!("=================================");
    println!();

    // Central configuration - modify this for your setup
    let config = Config::default();

    let display = MockOutput::new();
    let led = MockOutput::new();
    let topology = Topology::init(&config, display.clone(), led.clone())?;

    println!(
        "Counting every {}ms, multiplexing at {}Hz per digit, for {}s",
        config.timing.count_period_ms,
        config.timing.refresh_hz(),
        seconds
    );
    println!();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async {
        let print_every = Duration::from_millis(u64::from(config.timing.count_period_ms / 2));
        tokio::select! {
            result = topology.run() => match result {
                Ok(never) => match never {},
                Err(e) => Err(e.into()),
            },
            never = monitor(display, led, config.pins.clone(), print_every) => match never {},
            _ = tokio::time::sleep(Duration::from_secs(seconds)) => {
                println!();
                println!("Done.");
                Ok(())
            }
        }
    })
}

/// Samples the simulated lines and prints the readout.
async fn monitor(
    display: MockOutput,
    led: MockOutput,
    pins: PinConfig,
    print_every: Duration,
) -> Infallible {
    let mut shown: [Option<u8>; 2] = [None, None];
    let mut sample = tokio::time::interval(SAMPLE_INTERVAL);
    let mut print = tokio::time::interval(print_every.max(SAMPLE_INTERVAL));

    loop {
        tokio::select! {
            _ = sample.tick() => {
                if let Some((slot, pattern)) = display.visible(&pins) {
                    if let Some(digit) = pattern.decode() {
                        shown[slot.index()] = Some(digit);
                    }
                }
            }
            _ = print.tick() => {
                let lit = led.level(pins.led) == Some(pins.led_active);
                println!(
                    "[ {} {} ] {}",
                    glyph(shown[0]),
                    glyph(shown[1]),
                    if lit { "*" } else { " " }
                );
            }
        }
    }
}

fn glyph(digit: Option<u8>) -> char {
    digit
        .and_then(|d| char::from_digit(u32::from(d), 10))
        .unwrap_or('-')
}
