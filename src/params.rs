//! Per-operation parameters and execution mode

use crate::error::ErrorKind;

/// Largest uplink bitstream accepted by [`Session::send`](crate::Session::send)
pub const UL_BITSTREAM_MAX_BYTES: usize = 26;
/// Size of a downlink frame after the sync word
pub const DL_PHY_CONTENT_BYTES: usize = 15;
/// Downlink frame type, used as GFSK sync word
pub const DL_FRAME_TYPE: [u8; 2] = [0xB2, 0x27];

/// Modulation of the next operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Modulation {
    /// Unmodulated carrier
    None,
    /// Differential BPSK, uplink
    Dbpsk,
    /// GFSK, downlink
    Gfsk,
}

impl TryFrom<u8> for Modulation {
    type Error = ErrorKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Dbpsk),
            2 => Ok(Self::Gfsk),
            _ => Err(ErrorKind::Modulation),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    Tx,
    Rx,
}

/// Radio configuration applied by [`Session::init`](crate::Session::init)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioParameters {
    pub role: Role,
    pub frequency_hz: u32,
    pub modulation: Modulation,
    pub bit_rate_bps: u16,
    /// GFSK only
    pub deviation_hz: u32,
    /// TX only
    pub tx_power_dbm: i8,
}

/// Uplink frame
#[derive(Debug, Clone, Copy)]
pub struct TxRequest<'a> {
    pub bitstream: &'a [u8],
    /// Called from [`Session::process`](crate::Session::process) once the
    /// frame is out, callback mode only
    pub on_complete: Option<fn()>,
}

impl<'a> TxRequest<'a> {
    pub fn new(bitstream: &'a [u8]) -> Self {
        Self {
            bitstream,
            on_complete: None,
        }
    }
}

/// Downlink listen request
#[derive(Debug, Clone, Copy, Default)]
pub struct RxRequest {
    /// Called from [`Session::process`](crate::Session::process) once a
    /// frame is in the radio buffer, callback mode only
    pub on_data_received: Option<fn()>,
}

/// Result of [`Session::receive`](crate::Session::receive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxOutcome {
    /// A frame is waiting in the radio buffer
    DataReceived,
    /// The receive window timer elapsed first
    TimedOut,
    /// Reception started, completion is reported through the callback
    Armed,
}

/// Callbacks bound when the session is opened
#[derive(Debug, Clone, Copy, Default)]
pub struct Callbacks {
    /// Called from the interrupt handler when an event needs processing.
    /// The stack is expected to call
    /// [`Session::process`](crate::Session::process) from its own context.
    pub process: Option<fn()>,
    /// Called when processing fails or the chip reports an error
    pub error: Option<fn(ErrorKind)>,
}

/// How send and receive complete
#[derive(Debug, Clone, Copy, Default)]
pub enum ExecutionMode {
    /// Operations poll the interrupt line and return once done
    #[default]
    Blocking,
    /// Operations return right away and completion is reported through
    /// callbacks
    Callback(Callbacks),
}

impl ExecutionMode {
    pub(crate) fn callbacks(&self) -> Option<&Callbacks> {
        match self {
            ExecutionMode::Blocking => None,
            ExecutionMode::Callback(callbacks) => Some(callbacks),
        }
    }
}
