//! Time-multiplexing of the two digits onto the shared segment bus.
//!
//! Both digits share the eight segment lines; only the digit whose common
//! terminal is active lights up. The [`Multiplexer`] owns the
//! [`DisplayHardware`] and, once per multiplex period, lends it to exactly one
//! renderer as a [`GateToken`]. Because the token *moves* the hardware, no
//! other component can touch a line while a renderer holds it.
//!
//! # Switching sequence
//!
//! Every grant runs the same sequence:
//!
//! 1. drive every segment line inactive,
//! 2. drive the other digit's select line inactive,
//! 3. drive the granted digit's select line active,
//! 4. hand out the token (the renderer then sets segment lines).
//!
//! Step 2 always precedes step 3, so at no instant are both digits selected.
//!
//! # Example
//!
//! ```rust
//! use rs_sevseg::{
//!     config::PinConfig, hal::MockOutput, DigitSlot, DisplayHardware, GrantState, Multiplexer,
//! };
//!
//! let output = MockOutput::new();
//! let pins = PinConfig::default();
//! let mut mux = Multiplexer::new(DisplayHardware::new(output.clone(), pins.clone())).unwrap();
//!
//! let token = mux.grant().unwrap();
//! assert_eq!(token.slot(), DigitSlot::Left);
//! assert_eq!(mux.state(), GrantState::GrantLeft);
//! assert_eq!(output.level(pins.select_left), Some(pins.select_active));
//! assert_eq!(output.level(pins.select_right), Some(!pins.select_active));
//!
//! // Only one token at a time
//! assert!(mux.grant().is_err());
//!
//! mux.reclaim(token).unwrap();
//! assert_eq!(mux.grant().unwrap().slot(), DigitSlot::Right);
//! ```

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::PinConfig;
use crate::digit::DigitSlot;
use crate::segment::{Segment, SegmentPattern};
use crate::traits::{DigitalOutput, Level};

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while driving the display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayError<E> {
    /// A line write failed.
    Output(E),
    /// A grant was requested while a token is still out.
    GrantOutstanding,
    /// A token was returned that this multiplexer is not waiting for: it
    /// already holds the hardware, or the token came from another
    /// multiplexer or an earlier grant.
    UnexpectedToken,
    /// A renderer was handed the other digit's token.
    WrongSlot {
        /// Slot of the renderer
        expected: DigitSlot,
        /// Slot of the token it received
        actual: DigitSlot,
    },
}

impl<E: fmt::Debug> fmt::Display for DisplayError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output(e) => write!(f, "line write failed: {:?}", e),
            Self::GrantOutstanding => write!(f, "bus already granted"),
            Self::UnexpectedToken => write!(f, "token does not match the outstanding grant"),
            Self::WrongSlot { expected, actual } => {
                write!(f, "{} renderer handed the {} digit", expected, actual)
            }
        }
    }
}

impl<E: fmt::Debug> std::error::Error for DisplayError<E> {}

// ============================================================================
// Display Hardware
// ============================================================================

/// Exclusive handle on the display lines.
///
/// Pairs a [`DigitalOutput`] with the line assignment and translates
/// "on/off" into the configured active levels. There is exactly one of these
/// per display; it lives inside the [`Multiplexer`] or inside the single
/// outstanding [`GateToken`].
#[derive(Debug)]
pub struct DisplayHardware<O> {
    output: O,
    pins: PinConfig,
}

impl<O: DigitalOutput> DisplayHardware<O> {
    /// Wraps `output`, driving the lines named in `pins`.
    pub fn new(output: O, pins: PinConfig) -> Self {
        Self { output, pins }
    }

    /// Line assignment in use.
    pub fn pins(&self) -> &PinConfig {
        &self.pins
    }

    /// The underlying output.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Releases the underlying output.
    pub fn into_output(self) -> O {
        self.output
    }

    fn set_segment(&mut self, segment: Segment, on: bool) -> Result<(), O::Error> {
        let line = self.pins.segment_line(segment);
        let level = Level::active(self.pins.segment_active, on);
        self.output.set_level(line, level)
    }

    fn set_select(&mut self, slot: DigitSlot, on: bool) -> Result<(), O::Error> {
        let line = self.pins.select_line(slot);
        let level = Level::active(self.pins.select_active, on);
        self.output.set_level(line, level)
    }

    /// Drives every segment line to match `pattern`, in order A..G, DP.
    fn show(&mut self, pattern: SegmentPattern) -> Result<(), O::Error> {
        for segment in Segment::ALL {
            self.set_segment(segment, pattern.is_lit(segment))?;
        }
        Ok(())
    }

    fn blank(&mut self) -> Result<(), O::Error> {
        self.show(SegmentPattern::EMPTY)
    }

    fn select(&mut self, slot: DigitSlot) -> Result<(), O::Error> {
        self.set_select(slot.other(), false)?;
        self.set_select(slot, true)
    }

    fn deselect_all(&mut self) -> Result<(), O::Error> {
        for slot in DigitSlot::ALL {
            self.set_select(slot, false)?;
        }
        Ok(())
    }

    fn switch_to(&mut self, slot: DigitSlot) -> Result<(), O::Error> {
        self.blank()?;
        self.select(slot)
    }

    fn shut_off(&mut self) -> Result<(), O::Error> {
        self.blank()?;
        self.deselect_all()
    }
}

// ============================================================================
// Gate Token
// ============================================================================

/// Permission to drive the shared segment bus for one grant window.
///
/// Owns the display hardware while it exists. Issued by
/// [`Multiplexer::grant`], returned with [`Multiplexer::reclaim`]. The
/// digit-select lines are already set for [`slot`](Self::slot); the holder
/// can only change segment lines.
#[derive(Debug)]
pub struct GateToken<O> {
    owner: u32,
    slot: DigitSlot,
    sequence: u64,
    hardware: DisplayHardware<O>,
}

impl<O: DigitalOutput> GateToken<O> {
    /// The digit that is selected for this window.
    #[inline]
    pub fn slot(&self) -> DigitSlot {
        self.slot
    }

    /// Grant number, starting at 1.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Drives the segment lines to `pattern`.
    pub fn show(&mut self, pattern: SegmentPattern) -> Result<(), DisplayError<O::Error>> {
        self.hardware.show(pattern).map_err(DisplayError::Output)
    }

    /// Turns every segment line off.
    pub fn blank(&mut self) -> Result<(), DisplayError<O::Error>> {
        self.hardware.blank().map_err(DisplayError::Output)
    }
}

// ============================================================================
// Multiplexer
// ============================================================================

static NEXT_MULTIPLEXER_ID: AtomicU32 = AtomicU32::new(0);

/// Which digit currently holds the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantState {
    /// Left digit selected.
    GrantLeft,
    /// Right digit selected.
    GrantRight,
}

impl GrantState {
    /// The digit this state selects.
    #[inline]
    pub const fn slot(self) -> DigitSlot {
        match self {
            GrantState::GrantLeft => DigitSlot::Left,
            GrantState::GrantRight => DigitSlot::Right,
        }
    }

    /// The state entered on the next grant.
    #[inline]
    pub const fn next(self) -> Self {
        match self {
            GrantState::GrantLeft => GrantState::GrantRight,
            GrantState::GrantRight => GrantState::GrantLeft,
        }
    }
}

/// Two-state multiplexer alternating the bus between the digits.
///
/// Transitions are unconditional: every [`grant`](Self::grant) moves to the
/// other state, whatever the digits show. Timing is the caller's job (the
/// runtime gate task calls `grant` once per multiplex period).
#[derive(Debug)]
pub struct Multiplexer<O> {
    id: u32,
    hardware: Option<DisplayHardware<O>>,
    state: GrantState,
    grants: u64,
}

impl<O: DigitalOutput> Multiplexer<O> {
    /// Takes ownership of the display, blanking it and deselecting both
    /// digits.
    ///
    /// The first grant goes to the left digit.
    pub fn new(mut hardware: DisplayHardware<O>) -> Result<Self, DisplayError<O::Error>> {
        hardware.shut_off().map_err(DisplayError::Output)?;
        Ok(Self {
            id: NEXT_MULTIPLEXER_ID.fetch_add(1, Ordering::Relaxed),
            hardware: Some(hardware),
            state: GrantState::GrantRight,
            grants: 0,
        })
    }

    /// The most recently entered state.
    #[inline]
    pub fn state(&self) -> GrantState {
        self.state
    }

    /// Number of grants issued so far.
    #[inline]
    pub fn grants(&self) -> u64 {
        self.grants
    }

    /// Returns true while a token is out.
    #[inline]
    pub fn is_granted(&self) -> bool {
        self.hardware.is_none()
    }

    /// The display hardware, unless a token holds it.
    pub fn hardware(&self) -> Option<&DisplayHardware<O>> {
        self.hardware.as_ref()
    }

    /// Switches to the other digit and lends the bus to it.
    ///
    /// # Errors
    ///
    /// - [`DisplayError::GrantOutstanding`] if the previous token has not
    ///   been reclaimed
    /// - [`DisplayError::Output`] if a line write fails; the multiplexer
    ///   keeps the hardware and stays in its current state
    pub fn grant(&mut self) -> Result<GateToken<O>, DisplayError<O::Error>> {
        let mut hardware = self.hardware.take().ok_or(DisplayError::GrantOutstanding)?;
        let next = self.state.next();

        if let Err(e) = hardware.switch_to(next.slot()) {
            self.hardware = Some(hardware);
            return Err(DisplayError::Output(e));
        }

        self.state = next;
        self.grants += 1;
        log::trace!("grant {} to {} digit", self.grants, next.slot());
        Ok(GateToken {
            owner: self.id,
            slot: next.slot(),
            sequence: self.grants,
            hardware,
        })
    }

    /// Takes the bus back at the end of a grant window.
    ///
    /// Segment lines are left as the renderer left them; the next
    /// [`grant`](Self::grant) blanks them before switching.
    ///
    /// # Errors
    ///
    /// [`DisplayError::UnexpectedToken`] unless `token` is the one issued by
    /// this multiplexer's latest grant. The token is dropped and the grant
    /// stays outstanding.
    pub fn reclaim(&mut self, token: GateToken<O>) -> Result<(), DisplayError<O::Error>> {
        if self.hardware.is_some() || token.owner != self.id || token.sequence != self.grants {
            return Err(DisplayError::UnexpectedToken);
        }
        self.hardware = Some(token.hardware);
        Ok(())
    }

    /// Turns the display off and returns the hardware.
    ///
    /// # Errors
    ///
    /// [`DisplayError::GrantOutstanding`] if a token is still out.
    pub fn into_hardware(mut self) -> Result<DisplayHardware<O>, DisplayError<O::Error>> {
        let mut hardware = self.hardware.take().ok_or(DisplayError::GrantOutstanding)?;
        hardware.shut_off().map_err(DisplayError::Output)?;
        Ok(hardware)
    }
}
