#![cfg_attr(not(test), no_std)]
//! LR11xx Sigfox Radio Adapter
//!
//! This crate lets a Sigfox-style uplink/downlink protocol stack drive a
//! Semtech LR11xx transceiver. It turns protocol intents ("send this
//! bitstream", "listen for a downlink", "go to sleep") into the ordered chip
//! commands, RF path switching and interrupt handling they require.
//!
//! # Features
//! - Differential BPSK uplink at 100 or 600 bps, encoded by a pluggable
//!   [`LineEncoder`]
//! - GFSK downlink reception with the protocol frame-type sync word
//! - Automatic PA selection: low-power PA up to 14 dBm, high-power PA above
//! - Blocking or callback-driven completion, chosen at construction
//! - Latency estimates for every phase of an operation
//!
//! # Architecture
//! - [`Session`]: the radio state machine, power lifecycle, TX and RX
//!   pipelines, interrupt processing and latency table
//! - [`Chip`]: the chip driver boundary, one method per command
//! - [`Device`]: [`Chip`] implementation over `embedded-hal` SPI
//! - [`commands`]: the LR11xx commands as typed `regiface` commands
//! - [`Hal`]: board support (interrupt line, delays, RF switch wiring,
//!   TX/RX enable signals)
//! - [`Timer`]: the receive window timer
//!
//! # Usage
//! Operations must follow the power lifecycle:
//!
//! 1. [`Session::open`] hooks the board and its interrupt
//! 2. [`Session::wake_up`] resets, calibrates and parks the chip in standby
//! 3. [`Session::init`] configures frequency, modulation and PA
//! 4. [`Session::send`] or [`Session::receive`]
//! 5. [`Session::de_init`] returns to standby
//! 6. [`Session::sleep`] and finally [`Session::close`]
//!
//! Anything else is rejected with [`Error::State`].
//!
//! The board forwards its radio interrupt to the [`IrqHandle`] it receives
//! in [`Hal::open`]. The session then drains it in [`Session::process`],
//! either from its blocking loops or, in callback mode, when the stack
//! reacts to the process callback.
//!
//! # Example
//! ```no_run
//! use lr11xx_rf::{
//!     Chip, ExecutionMode, Hal, IrqLine, Modulation, RadioParameters, Role, Session,
//!     SessionError, Timer, TxRequest,
//! };
//!
//! static RADIO_IRQ: IrqLine = IrqLine::new();
//!
//! fn send_uplink<C: Chip, H: Hal, T: Timer>(
//!     radio: &mut Session<C, H, T>,
//!     frame: &[u8],
//! ) -> Result<(), SessionError<C, H, T>> {
//!     radio.open()?;
//!     radio.wake_up()?;
//!     radio.init(&RadioParameters {
//!         role: Role::Tx,
//!         frequency_hz: 868_130_000,
//!         modulation: Modulation::Dbpsk,
//!         bit_rate_bps: 100,
//!         deviation_hz: 0,
//!         tx_power_dbm: 14,
//!     })?;
//!     radio.send(&TxRequest::new(frame))?;
//!     radio.de_init()?;
//!     radio.sleep()?;
//!     radio.close()
//! }
//!
//! fn run<C: Chip, H: Hal, T: Timer>(chip: C, hal: H, timer: T) {
//!     let mut radio = Session::new(chip, hal, timer, &RADIO_IRQ, ExecutionMode::Blocking);
//!     if send_uplink(&mut radio, &[0xAB, 0xCD]).is_err() {
//!         radio.recover();
//!     }
//! }
//! ```
//!
//! # Logging
//! Enable the `defmt` or the `log` feature to get lifecycle, interrupt and
//! failure logs.

pub use regiface::errors::Error as DeviceError;
use regiface::*;

mod fmt;

pub mod chip;
pub mod commands;
pub mod device;
pub mod encoder;
pub mod error;
pub mod hal;
pub mod params;
pub mod session;
pub mod timer;

pub use chip::Chip;
pub use device::Device;
pub use encoder::{Dbpsk, LineEncoder};
pub use error::{ChipBlock, Error, ErrorKind};
pub use hal::{FemRole, Hal, HalLatency, IrqHandle, IrqLine};
pub use params::*;
pub use session::{Latency, RadioState, RampDelays, Session, SessionError, ADAPTER_VERSION};
pub use timer::Timer;
