use core::fmt;

use crate::commands::ChipErrors;

/// Chip command family that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipBlock {
    Reset,
    Wakeup,
    System,
    Radio,
    Regmem,
}

/// Classification of a failure, as reported to the error callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Operation called out of lifecycle order
    State,
    ChipReset,
    ChipWakeup,
    ChipSystem,
    ChipRadio,
    ChipRegmem,
    /// The chip raised its error interrupt
    ChipIrq,
    /// Calibration or oscillator errors latched after wake-up
    ChipErrors,
    Hardware,
    Timer,
    Modulation,
    BufferSize,
    /// Failure while processing an interrupt
    Generic,
}

/// Session error, generic over the chip, board and timer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<C, H, T> {
    /// Operation called out of lifecycle order, or before its
    /// precondition holds
    State,
    Chip { block: ChipBlock, source: C },
    /// Wake-up found latched chip errors
    LatchedErrors(ChipErrors),
    Hardware(H),
    Timer(T),
    /// Bitstream or destination buffer too long
    BufferSize,
    /// The chip raised its error interrupt during a blocking operation
    Aborted,
}

impl<C, H, T> Error<C, H, T> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::State => ErrorKind::State,
            Error::Chip { block, .. } => match block {
                ChipBlock::Reset => ErrorKind::ChipReset,
                ChipBlock::Wakeup => ErrorKind::ChipWakeup,
                ChipBlock::System => ErrorKind::ChipSystem,
                ChipBlock::Radio => ErrorKind::ChipRadio,
                ChipBlock::Regmem => ErrorKind::ChipRegmem,
            },
            Error::LatchedErrors(_) => ErrorKind::ChipErrors,
            Error::Hardware(_) => ErrorKind::Hardware,
            Error::Timer(_) => ErrorKind::Timer,
            Error::BufferSize => ErrorKind::BufferSize,
            Error::Aborted => ErrorKind::Generic,
        }
    }
}

impl<C: fmt::Debug, H: fmt::Debug, T: fmt::Debug> fmt::Display for Error<C, H, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::State => write!(f, "operation not allowed in the current radio state"),
            Error::Chip { block, source } => write!(f, "{block:?} command failed: {source:?}"),
            Error::LatchedErrors(errors) => {
                write!(f, "chip reported errors {:#06x}", errors.bits())
            }
            Error::Hardware(e) => write!(f, "hardware error: {e:?}"),
            Error::Timer(e) => write!(f, "timer error: {e:?}"),
            Error::BufferSize => write!(f, "buffer size out of range"),
            Error::Aborted => write!(f, "chip raised an error interrupt"),
        }
    }
}
