//! Status commands
//!
//! Commands reading back chip state: the status words and pending
//! interrupts, the firmware version, and the latched error register.
//!
//! Every response starts with the `Stat1` byte the chip shifts out at the
//! beginning of a read transaction.

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::FromByteArray;

use crate::commands::IrqMask;
use crate::{Command, NoParameters};

/// Outcome of the previous command, from `Stat1` bits 3:1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandStatus {
    /// Command could not be executed
    Fail,
    /// Command rejected because of invalid parameters
    ParameterError,
    /// Command executed
    Ok,
    /// Command executed and data is available
    Data,
    /// Reserved encoding
    Unknown(u8),
}

impl From<u8> for CommandStatus {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Fail,
            0x01 => Self::ParameterError,
            0x02 => Self::Ok,
            0x03 => Self::Data,
            other => Self::Unknown(other),
        }
    }
}

/// Chip status returned by GetStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub command: CommandStatus,
    /// At least one interrupt is pending
    pub irq_pending: bool,
    /// Raw `Stat2` byte (reset source, chip mode, boot state)
    pub stat2: u8,
    /// Pending interrupt sources
    pub irq: IrqMask,
}

impl FromByteArray for Status {
    type Error = Infallible;
    type Array = [u8; 6];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            command: CommandStatus::from((bytes[0] >> 1) & 0x07),
            irq_pending: bytes[0] & 0x01 != 0,
            stat2: bytes[1],
            irq: IrqMask::from_bits_retain(u32::from_be_bytes([
                bytes[2], bytes[3], bytes[4], bytes[5],
            ])),
        })
    }
}

/// GetStatus command (0x0100)
///
/// Reads the status words and the pending interrupt register without
/// clearing anything.
#[derive(Debug, Clone)]
pub struct GetStatus;

impl Command for GetStatus {
    type IdType = u16;
    type CommandParameters = NoParameters;
    type ResponseParameters = Status;

    fn id() -> Self::IdType {
        0x0100
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// Hardware and firmware version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version {
    pub hardware: u8,
    /// 0x01 LR1110, 0x02 LR1120, 0x03 LR1121
    pub chip_type: u8,
    pub firmware: u16,
}

impl FromByteArray for Version {
    type Error = Infallible;
    type Array = [u8; 5];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            hardware: bytes[1],
            chip_type: bytes[2],
            firmware: u16::from_be_bytes([bytes[3], bytes[4]]),
        })
    }
}

/// GetVersion command (0x0101)
#[derive(Debug, Clone)]
pub struct GetVersion;

impl Command for GetVersion {
    type IdType = u16;
    type CommandParameters = NoParameters;
    type ResponseParameters = Version;

    fn id() -> Self::IdType {
        0x0101
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

bitflags! {
    /// Latched chip errors
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChipErrors: u16 {
        const LF_RC_CALIBRATION = 1 << 0;
        const HF_RC_CALIBRATION = 1 << 1;
        const ADC_CALIBRATION = 1 << 2;
        const PLL_CALIBRATION = 1 << 3;
        const IMG_CALIBRATION = 1 << 4;
        const HF_XOSC_START = 1 << 5;
        const LF_XOSC_START = 1 << 6;
        const PLL_LOCK = 1 << 7;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChipErrors {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ChipErrors({=u16:#x})", self.bits())
    }
}

impl FromByteArray for ChipErrors {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self::from_bits_retain(u16::from_be_bytes([
            bytes[1], bytes[2],
        ])))
    }
}

/// GetErrors command (0x010D)
#[derive(Debug, Clone)]
pub struct GetErrors;

impl Command for GetErrors {
    type IdType = u16;
    type CommandParameters = NoParameters;
    type ResponseParameters = ChipErrors;

    fn id() -> Self::IdType {
        0x010D
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}
