//! Radio session
//!
//! [`Session`] sequences the chip and the board through the lifecycle the
//! protocol stack drives:
//!
//! ```text
//! Closed --open--> Sleeping --wake_up--> Standby --init--> Tx | Rx
//!    ^                |  ^                  ^                  |
//!    +-----close------+  +------sleep-------+-----de_init------+
//! ```
//!
//! Calling an operation in any other state fails with [`Error::State`].
//!
//! Send and receive complete either inside the call
//! ([`ExecutionMode::Blocking`]) or later through the callbacks bound in
//! [`ExecutionMode::Callback`], after the stack has called
//! [`Session::process`].

use core::marker::PhantomData;

use crate::chip::Chip;
use crate::commands::Version;
use crate::encoder::{Dbpsk, LineEncoder};
use crate::error::{ChipBlock, Error};
use crate::hal::{Hal, IrqLine};
use crate::params::ExecutionMode;
use crate::timer::Timer;

mod irq;
mod latency;
mod power;
mod rx;
mod tx;

pub use latency::Latency;
pub use power::{CALIBRATION_DELAY_MS, STANDBY_DELAY_MS, WAKE_UP_DELAY_MS};
pub use tx::{pa_config_for, ramp_delays, RampDelays, LOW_POWER_PA_MAX_DBM, TX_TIMEOUT_MS};

/// Version of this radio adapter, as reported to the protocol stack
pub const ADAPTER_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// [`Error`] for a given chip, board and timer
pub type SessionError<C, H, T> =
    Error<<C as Chip>::Error, <H as Hal>::Error, <T as Timer>::Error>;

/// Lifecycle position of the radio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioState {
    /// Board not opened
    Closed,
    /// Board opened, chip asleep or not yet woken up
    Sleeping,
    /// Chip calibrated and in standby
    Standby,
    /// Configured for uplink
    Tx,
    /// Configured for downlink
    Rx,
}

/// Radio session over an LR11xx chip.
///
/// `E` is the line encoder applied to uplink frames.
pub struct Session<C, H, T, E = Dbpsk> {
    chip: C,
    hal: H,
    timer: T,
    irq: &'static IrqLine,
    mode: ExecutionMode,
    state: RadioState,
    tx_done: bool,
    rx_done: bool,
    error: bool,
    /// A send or receive was triggered and has not completed yet
    in_flight: bool,
    on_tx_complete: Option<fn()>,
    on_rx_data: Option<fn()>,
    bit_rate_bps: u16,
    ramp: RampDelays,
    version: Option<Version>,
    encoder: PhantomData<E>,
}

impl<C, H, T, E> Session<C, H, T, E>
where
    C: Chip,
    H: Hal,
    T: Timer,
    E: LineEncoder,
{
    /// Creates a closed session.
    ///
    /// `irq` is the flag the board's interrupt handler raises; it must not
    /// be shared with another session.
    pub fn new(chip: C, hal: H, timer: T, irq: &'static IrqLine, mode: ExecutionMode) -> Self {
        Self {
            chip,
            hal,
            timer,
            irq,
            mode,
            state: RadioState::Closed,
            tx_done: false,
            rx_done: false,
            error: false,
            in_flight: false,
            on_tx_complete: None,
            on_rx_data: None,
            bit_rate_bps: 0,
            ramp: RampDelays::default(),
            version: None,
            encoder: PhantomData,
        }
    }

    /// Releases the chip, board and timer.
    pub fn release(self) -> (C, H, T) {
        (self.chip, self.hal, self.timer)
    }

    pub fn state(&self) -> RadioState {
        self.state
    }

    pub fn is_tx_done(&self) -> bool {
        self.tx_done
    }

    pub fn is_rx_done(&self) -> bool {
        self.rx_done
    }

    /// The chip raised its error interrupt during the current attempt.
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Version string of the adapter itself, see [`ADAPTER_VERSION`].
    pub fn adapter_version(&self) -> &'static str {
        ADAPTER_VERSION
    }

    /// Version read during the last successful wake-up.
    pub fn chip_version(&self) -> Option<Version> {
        self.version
    }

    /// Bit rate of the last TX configuration.
    pub fn bit_rate_bps(&self) -> u16 {
        self.bit_rate_bps
    }

    fn expect_state(&self, allowed: &[RadioState]) -> Result<(), SessionError<C, H, T>> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            warn!("radio operation not allowed in state {:?}", self.state);
            Err(Error::State)
        }
    }

    /// Rejects a new attempt while the previous one has not completed.
    fn expect_idle(&self) -> Result<(), SessionError<C, H, T>> {
        if self.in_flight {
            warn!("radio operation still in progress");
            return Err(Error::State);
        }
        Ok(())
    }

    fn reset_err(source: C::Error) -> SessionError<C, H, T> {
        Error::Chip {
            block: ChipBlock::Reset,
            source,
        }
    }

    fn wakeup_err(source: C::Error) -> SessionError<C, H, T> {
        Error::Chip {
            block: ChipBlock::Wakeup,
            source,
        }
    }

    fn system_err(source: C::Error) -> SessionError<C, H, T> {
        Error::Chip {
            block: ChipBlock::System,
            source,
        }
    }

    fn radio_err(source: C::Error) -> SessionError<C, H, T> {
        Error::Chip {
            block: ChipBlock::Radio,
            source,
        }
    }

    fn regmem_err(source: C::Error) -> SessionError<C, H, T> {
        Error::Chip {
            block: ChipBlock::Regmem,
            source,
        }
    }

    fn hal_err(source: H::Error) -> SessionError<C, H, T> {
        Error::Hardware(source)
    }

    fn timer_err(source: T::Error) -> SessionError<C, H, T> {
        Error::Timer(source)
    }

    /// Forgets the outcome of the last send or receive.
    fn clear_completion(&mut self) {
        self.tx_done = false;
        self.rx_done = false;
        self.error = false;
    }

    fn set_state(&mut self, state: RadioState) {
        debug!("radio state {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}
