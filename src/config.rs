//! Configuration: line assignment, timing and device identity.
//!
//! Uses `heapless::String` for the device name so the same types work on
//! the board and on desktop.
//!
//! # Example
//!
//! ```rust
//! use rs_sevseg::config::{Config, DeviceConfig, TimingConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert!(config.validate().is_ok());
//!
//! // Or customize
//! let config = Config::default()
//!     .with_timing(TimingConfig::default().with_multiplex_period_ms(5).with_hold_ms(4))
//!     .with_device(DeviceConfig::default().with_name("bench display"));
//! assert_eq!(config.device.name.as_str(), "bench display");
//! ```

use core::fmt;

use heapless::String as HString;

use crate::digit::DigitSlot;
use crate::segment::Segment;
use crate::traits::{Level, LineId};

/// Maximum length for short config strings (device names)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating at a char boundary if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|end| *end <= MAX_SHORT_STRING)
        .last()
        .unwrap_or(0);
    let _ = hs.push_str(&s[..end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Physical line assignment
    pub pins: PinConfig,
    /// Count, multiplex and pulse timing
    pub timing: TimingConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl Config {
    /// Set pin configuration
    pub fn with_pins(mut self, pins: PinConfig) -> Self {
        self.pins = pins;
        self
    }

    /// Set timing configuration
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }

    /// Checks the configuration before anything touches hardware.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DuplicateLine`] if two roles share a line
    /// - [`ConfigError::ZeroPeriod`] if any period is zero
    /// - [`ConfigError::RefreshTooSlow`] if the multiplex period exceeds
    ///   [`MAX_MULTIPLEX_PERIOD_MS`]
    /// - [`ConfigError::HoldExceedsPeriod`] if a renderer would hold the bus
    ///   longer than one multiplex period
    /// - [`ConfigError::TimeoutBelowHold`] if the grant watchdog would fire
    ///   before a well-behaved renderer is done
    /// - [`ConfigError::PulseExceedsPeriod`] unless the indicator LED goes
    ///   dark between counts, allowing one multiplex period of poll delay
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pins.validate()?;
        self.timing.validate()
    }
}

// ============================================================================
// Pin Config
// ============================================================================

/// Physical line assignment and active levels.
///
/// Defaults match a common-cathode two-digit module: the digit-select
/// (common cathode) lines are active low, the segment lines active high.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinConfig {
    /// Common terminal of the left (tens) digit
    pub select_left: LineId,
    /// Common terminal of the right (units) digit
    pub select_right: LineId,
    /// Segment lines in order A, B, C, D, E, F, G, DP
    pub segments: [LineId; Segment::COUNT],
    /// Indicator LED
    pub led: LineId,
    /// Level that turns a digit on
    pub select_active: Level,
    /// Level that lights a segment
    pub segment_active: Level,
    /// Level that lights the indicator LED
    pub led_active: Level,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            select_left: LineId(11),
            select_right: LineId(10),
            segments: [
                LineId(26), // A
                LineId(27), // B
                LineId(29), // C
                LineId(18), // D
                LineId(25), // E
                LineId(7),  // F
                LineId(28), // G
                LineId(24), // DP
            ],
            led: LineId(13),
            select_active: Level::Low,
            segment_active: Level::High,
            led_active: Level::High,
        }
    }
}

impl PinConfig {
    /// Set the digit-select lines
    pub fn with_select_lines(mut self, left: LineId, right: LineId) -> Self {
        self.select_left = left;
        self.select_right = right;
        self
    }

    /// Set the segment lines (A, B, C, D, E, F, G, DP)
    pub fn with_segment_lines(mut self, segments: [LineId; Segment::COUNT]) -> Self {
        self.segments = segments;
        self
    }

    /// Set the indicator LED line
    pub fn with_led(mut self, led: LineId) -> Self {
        self.led = led;
        self
    }

    /// Set the level that turns a digit on
    pub fn with_select_active(mut self, level: Level) -> Self {
        self.select_active = level;
        self
    }

    /// Set the level that lights a segment
    pub fn with_segment_active(mut self, level: Level) -> Self {
        self.segment_active = level;
        self
    }

    /// Set the level that lights the indicator LED
    pub fn with_led_active(mut self, level: Level) -> Self {
        self.led_active = level;
        self
    }

    /// The digit-select line owned by `slot`
    #[inline]
    pub fn select_line(&self, slot: DigitSlot) -> LineId {
        match slot {
            DigitSlot::Left => self.select_left,
            DigitSlot::Right => self.select_right,
        }
    }

    /// The line driving `segment`
    #[inline]
    pub fn segment_line(&self, segment: Segment) -> LineId {
        self.segments[segment.index()]
    }

    /// Every configured line: both selects, the segments, then the LED
    pub fn all_lines(&self) -> impl Iterator<Item = LineId> + '_ {
        [self.select_left, self.select_right]
            .into_iter()
            .chain(self.segments.iter().copied())
            .chain(core::iter::once(self.led))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let lines: heapless::Vec<LineId, 11> = self.all_lines().collect();
        for (i, line) in lines.iter().enumerate() {
            if lines[..i].contains(line) {
                return Err(ConfigError::DuplicateLine(*line));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Timing Config
// ============================================================================

/// Longest multiplex period that still lights each digit at 100 Hz
pub const MAX_MULTIPLEX_PERIOD_MS: u32 = 5;

/// Task periods in milliseconds
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    /// Time between counter steps
    pub count_period_ms: u32,
    /// Time between bus grants; each digit is lit every second grant
    pub multiplex_period_ms: u32,
    /// How long a renderer drives the bus once granted
    pub hold_ms: u32,
    /// Watchdog: longest a renderer may keep the bus
    pub grant_timeout_ms: u32,
    /// How long the indicator LED stays on per count
    pub pulse_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            count_period_ms: 500,
            // 4 ms per grant = 125 Hz per digit
            multiplex_period_ms: 4,
            hold_ms: 3,
            grant_timeout_ms: 50,
            pulse_ms: 250,
        }
    }
}

impl TimingConfig {
    /// Set the count period
    pub fn with_count_period_ms(mut self, ms: u32) -> Self {
        self.count_period_ms = ms;
        self
    }

    /// Set the multiplex period
    pub fn with_multiplex_period_ms(mut self, ms: u32) -> Self {
        self.multiplex_period_ms = ms;
        self
    }

    /// Set the bus hold window
    pub fn with_hold_ms(mut self, ms: u32) -> Self {
        self.hold_ms = ms;
        self
    }

    /// Set the grant watchdog timeout
    pub fn with_grant_timeout_ms(mut self, ms: u32) -> Self {
        self.grant_timeout_ms = ms;
        self
    }

    /// Set the indicator pulse length
    pub fn with_pulse_ms(mut self, ms: u32) -> Self {
        self.pulse_ms = ms;
        self
    }

    /// Refresh rate of one digit in hertz
    pub fn refresh_hz(&self) -> u32 {
        1000 / self.multiplex_period_ms.max(1).saturating_mul(2)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("count_period_ms", self.count_period_ms),
            ("multiplex_period_ms", self.multiplex_period_ms),
            ("hold_ms", self.hold_ms),
            ("pulse_ms", self.pulse_ms),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::ZeroPeriod(*name));
        }
        if self.multiplex_period_ms > MAX_MULTIPLEX_PERIOD_MS {
            return Err(ConfigError::RefreshTooSlow {
                period_ms: self.multiplex_period_ms,
                max_ms: MAX_MULTIPLEX_PERIOD_MS,
            });
        }
        if self.hold_ms > self.multiplex_period_ms {
            return Err(ConfigError::HoldExceedsPeriod {
                hold_ms: self.hold_ms,
                period_ms: self.multiplex_period_ms,
            });
        }
        if self.grant_timeout_ms < self.hold_ms {
            return Err(ConfigError::TimeoutBelowHold {
                timeout_ms: self.grant_timeout_ms,
                hold_ms: self.hold_ms,
            });
        }
        // The indicator polls once per multiplex period, so a pulse can start
        // that late after its count
        if self.pulse_ms.saturating_add(self.multiplex_period_ms) >= self.count_period_ms {
            return Err(ConfigError::PulseExceedsPeriod {
                pulse_ms: self.pulse_ms,
                period_ms: self.count_period_ms,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-sevseg"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Configuration rejected at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The same line is assigned to two roles
    DuplicateLine(LineId),
    /// A period or window is zero
    ZeroPeriod(&'static str),
    /// Multiplex period too long for a flicker-free refresh
    RefreshTooSlow {
        /// Configured multiplex period
        period_ms: u32,
        /// Longest accepted multiplex period
        max_ms: u32,
    },
    /// Hold window longer than the multiplex period
    HoldExceedsPeriod {
        /// Configured hold window
        hold_ms: u32,
        /// Configured multiplex period
        period_ms: u32,
    },
    /// Grant watchdog shorter than the hold window
    TimeoutBelowHold {
        /// Configured watchdog timeout
        timeout_ms: u32,
        /// Configured hold window
        hold_ms: u32,
    },
    /// Indicator pulse plus one poll does not fit in the count period
    PulseExceedsPeriod {
        /// Configured pulse length
        pulse_ms: u32,
        /// Configured count period
        period_ms: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLine(line) => write!(f, "{} is assigned twice", line),
            Self::ZeroPeriod(name) => write!(f, "{} must be non-zero", name),
            Self::RefreshTooSlow { period_ms, max_ms } => write!(
                f,
                "multiplex period {}ms exceeds {}ms, digits would flicker",
                period_ms, max_ms
            ),
            Self::HoldExceedsPeriod { hold_ms, period_ms } => write!(
                f,
                "hold window {}ms exceeds multiplex period {}ms",
                hold_ms, period_ms
            ),
            Self::TimeoutBelowHold {
                timeout_ms,
                hold_ms,
            } => write!(
                f,
                "grant timeout {}ms is shorter than hold window {}ms",
                timeout_ms, hold_ms
            ),
            Self::PulseExceedsPeriod {
                pulse_ms,
                period_ms,
            } => write!(
                f,
                "indicator pulse {}ms leaves no dark gap in count period {}ms",
                pulse_ms, period_ms
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.timing.count_period_ms, 500);
        assert_eq!(config.pins.select_left, LineId(11));
        assert_eq!(config.pins.select_right, LineId(10));
        assert_eq!(config.pins.led, LineId(13));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_refresh_is_flicker_free() {
        assert!(TimingConfig::default().refresh_hz() >= 100);
    }

    #[test]
    fn refresh_hz_saturates_on_huge_period() {
        let timing = TimingConfig::default().with_multiplex_period_ms(u32::MAX / 2 + 1);
        assert_eq!(timing.refresh_hz(), 0);
        let timing = TimingConfig::default().with_multiplex_period_ms(u32::MAX);
        assert_eq!(timing.refresh_hz(), 0);
    }

    #[test]
    fn segment_lines_follow_segment_order() {
        let pins = PinConfig::default();
        assert_eq!(pins.segment_line(Segment::A), LineId(26));
        assert_eq!(pins.segment_line(Segment::F), LineId(7));
        assert_eq!(pins.segment_line(Segment::Dp), LineId(24));
    }

    #[test]
    fn select_line_per_slot() {
        let pins = PinConfig::default();
        assert_eq!(pins.select_line(DigitSlot::Left), LineId(11));
        assert_eq!(pins.select_line(DigitSlot::Right), LineId(10));
    }

    #[test]
    fn all_lines_lists_eleven() {
        assert_eq!(PinConfig::default().all_lines().count(), 11);
    }

    #[test]
    fn duplicate_line_rejected() {
        let config = Config::default().with_pins(PinConfig::default().with_led(LineId(26)));
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateLine(LineId(26)))
        );
    }

    #[test]
    fn shared_select_line_rejected() {
        let pins = PinConfig::default().with_select_lines(LineId(3), LineId(3));
        assert_eq!(
            Config::default().with_pins(pins).validate(),
            Err(ConfigError::DuplicateLine(LineId(3)))
        );
    }

    #[test]
    fn zero_period_rejected() {
        let config =
            Config::default().with_timing(TimingConfig::default().with_count_period_ms(0));
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroPeriod("count_period_ms"))
        );
    }

    #[test]
    fn hold_longer_than_period_rejected() {
        let timing = TimingConfig::default()
            .with_multiplex_period_ms(2)
            .with_hold_ms(3);
        assert_eq!(
            Config::default().with_timing(timing).validate(),
            Err(ConfigError::HoldExceedsPeriod {
                hold_ms: 3,
                period_ms: 2
            })
        );
    }

    #[test]
    fn timeout_below_hold_rejected() {
        let timing = TimingConfig::default().with_grant_timeout_ms(1);
        assert_eq!(
            Config::default().with_timing(timing).validate(),
            Err(ConfigError::TimeoutBelowHold {
                timeout_ms: 1,
                hold_ms: 3
            })
        );
    }

    #[test]
    fn slow_refresh_rejected() {
        let timing = TimingConfig::default()
            .with_multiplex_period_ms(MAX_MULTIPLEX_PERIOD_MS + 1)
            .with_hold_ms(3);
        assert_eq!(
            Config::default().with_timing(timing).validate(),
            Err(ConfigError::RefreshTooSlow {
                period_ms: 6,
                max_ms: 5
            })
        );

        let timing = TimingConfig::default().with_multiplex_period_ms(u32::MAX);
        assert_eq!(
            Config::default().with_timing(timing).validate(),
            Err(ConfigError::RefreshTooSlow {
                period_ms: u32::MAX,
                max_ms: 5
            })
        );
    }

    #[test]
    fn slowest_accepted_refresh_is_100_hz() {
        let timing = TimingConfig::default()
            .with_multiplex_period_ms(MAX_MULTIPLEX_PERIOD_MS)
            .with_hold_ms(4);
        assert_eq!(timing.refresh_hz(), 100);
        assert!(Config::default().with_timing(timing).validate().is_ok());
    }

    #[test]
    fn pulse_filling_count_period_rejected() {
        // 496 + 4ms poll reaches the 500ms count period
        for pulse_ms in [496, 500, 600, u32::MAX] {
            let timing = TimingConfig::default().with_pulse_ms(pulse_ms);
            assert_eq!(
                Config::default().with_timing(timing).validate(),
                Err(ConfigError::PulseExceedsPeriod {
                    pulse_ms,
                    period_ms: 500
                })
            );
        }

        let timing = TimingConfig::default().with_pulse_ms(495);
        assert!(Config::default().with_timing(timing).validate().is_ok());
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::DuplicateLine(LineId(5)).to_string(),
            "line 5 is assigned twice"
        );
        assert_eq!(
            ConfigError::ZeroPeriod("pulse_ms").to_string(),
            "pulse_ms must be non-zero"
        );
        assert_eq!(
            ConfigError::PulseExceedsPeriod {
                pulse_ms: 500,
                period_ms: 500
            }
            .to_string(),
            "indicator pulse 500ms leaves no dark gap in count period 500ms"
        );
    }

    #[test]
    fn short_string_truncation() {
        let long_input = "a".repeat(100);
        let s = short_string(&long_input);
        assert_eq!(s.len(), MAX_SHORT_STRING);

        // Multi-byte chars are never split
        let wide = "é".repeat(40);
        let s = short_string(&wide);
        assert_eq!(s.len(), 64);
        assert!(s.chars().all(|c| c == 'é'));
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_pins(
                PinConfig::default()
                    .with_led(LineId(8))
                    .with_led_active(Level::Low),
            )
            .with_timing(TimingConfig::default().with_pulse_ms(100))
            .with_device(DeviceConfig::default().with_name("Desk"));

        assert_eq!(config.pins.led, LineId(8));
        assert_eq!(config.pins.led_active, Level::Low);
        assert_eq!(config.timing.pulse_ms, 100);
        assert_eq!(config.device.name.as_str(), "Desk");
    }
}
