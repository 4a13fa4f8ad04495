//! ESP32-C3 SuperMini seven-segment counter.
//!
//! This is the main entry point for the physical hardware. It:
//! - Configures the ten display lines and the onboard LED as outputs
//! - Blanks the display and switches the LED off
//! - Runs the counter, gate, renderer and indicator tasks on a
//!   current-thread tokio runtime
//!
//! Any startup or runtime failure is logged and returned, which aborts and
//! reboots the board.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --bin esp32_main --features esp32 --target riscv32imc-esp-espidf
//! espflash flash --monitor target/riscv32imc-esp-espidf/release/esp32_main
//! ```

use esp_idf_hal::peripherals::Peripherals;
use rs_sevseg::hal::esp32::{self, pins, Esp32Display, Esp32Led};
use rs_sevseg::{Config, DeviceConfig, Topology};

/// Number of eventfd handles tokio needs for its reactor
const TOKIO_EVENTFDS: usize = 5;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    esp_idf_svc::io::vfs::initialize_eventfd(TOKIO_EVENTFDS)?;

    println!();
    println!("================================");
    println!("  rs-sevseg SuperMini Counter");
    println!("================================");
    println!();

    let config = Config::default()
        .with_pins(esp32::pin_config())
        .with_device(DeviceConfig::default().with_name("rs-sevseg SuperMini"));

    let peripherals = Peripherals::take()?;
    let gpio = peripherals.pins;

    // =========================================================================
    // Display lines (segments GPIO0-7, digit select GPIO10/20)
    // =========================================================================
    let display = Esp32Display::new();
    let display = esp32::register(display, pins::SEG_A, gpio.gpio0)?;
    let display = esp32::register(display, pins::SEG_B, gpio.gpio1)?;
    let display = esp32::register(display, pins::SEG_C, gpio.gpio2)?;
    let display = esp32::register(display, pins::SEG_D, gpio.gpio3)?;
    let display = esp32::register(display, pins::SEG_E, gpio.gpio4)?;
    let display = esp32::register(display, pins::SEG_F, gpio.gpio5)?;
    let display = esp32::register(display, pins::SEG_G, gpio.gpio6)?;
    let display = esp32::register(display, pins::SEG_DP, gpio.gpio7)?;
    let display = esp32::register(display, pins::SELECT_LEFT, gpio.gpio10)?;
    let display = esp32::register(display, pins::SELECT_RIGHT, gpio.gpio20)?;
    println!("[OK] Display lines configured ({} outputs)", display.len());

    // =========================================================================
    // Indicator LED (GPIO8, active low)
    // =========================================================================
    let led = esp32::register(Esp32Led::new(), pins::LED, gpio.gpio8)?;
    println!("[OK] Indicator LED configured (GPIO{})", pins::LED);

    let topology = Topology::init(&config, display, led)?;
    println!("[OK] Display blanked, {}Hz per digit", config.timing.refresh_hz());
    println!();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(topology.run()) {
        Ok(never) => match never {},
        Err(e) => {
            log::error!("counter stopped: {}", e);
            Err(e.into())
        }
    }
}
