//! Buffer memory commands
//!
//! The radio buffer is 256 bytes shared between TX and RX. Reads and writes
//! carry a payload whose length is only known at runtime, so they are
//! issued through [`Device::write_buffer`](crate::Device::write_buffer) and
//! [`Device::read_buffer`](crate::Device::read_buffer) rather than as
//! fixed-size [`Command`]s.

use core::convert::Infallible;

use crate::{Command, NoParameters, ToByteArray};

/// WriteBuffer8 opcode, followed by up to 255 data bytes
pub const WRITE_BUFFER8: u16 = 0x0109;

/// ReadBuffer8 opcode, followed by [`ReadBufferParams`]
pub const READ_BUFFER8: u16 = 0x010A;

/// Window of the RX buffer to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadBufferParams {
    pub offset: u8,
    pub len: u8,
}

impl ToByteArray for ReadBufferParams {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.offset, self.len])
    }
}

/// ClearRxBuffer command (0x010B)
///
/// Zeroes the whole radio buffer.
#[derive(Debug, Clone)]
pub struct ClearRxBuffer;

impl Command for ClearRxBuffer {
    type IdType = u16;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x010B
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}
