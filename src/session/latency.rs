use crate::chip::Chip;
use crate::encoder::LineEncoder;
use crate::error::Error;
use crate::hal::{Hal, HalLatency};
use crate::timer::Timer;

use super::{Session, SessionError};

/// Fixed part of the wake-up sequence, settling delays included
const WAKE_UP_BASE_MS: u32 = 532;
/// Bits sent before the payload timing starts
const SEND_START_BITS: u32 = 2;
/// Bits sent after the payload before TX done
const SEND_STOP_BITS: u32 = 9;
const RECEIVE_STOP_MS: u32 = 5;

/// Phase of a radio operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Latency {
    WakeUp,
    InitTx,
    SendStart,
    SendStop,
    DeInitTx,
    Sleep,
    InitRx,
    ReceiveStart,
    ReceiveStop,
    DeInitRx,
}

fn bit_time_ms(bits: u32, bit_rate_bps: u16) -> Option<u32> {
    (bit_rate_bps != 0).then(|| bits * 1000 / u32::from(bit_rate_bps))
}

impl<C, H, T, E> Session<C, H, T, E>
where
    C: Chip,
    H: Hal,
    T: Timer,
    E: LineEncoder,
{
    /// Expected duration of `phase` in milliseconds.
    ///
    /// Send timings depend on the bit rate of the last TX configuration and
    /// fail with [`Error::State`] while it is zero.
    pub fn latency(&mut self, phase: Latency) -> Result<u32, SessionError<C, H, T>> {
        match phase {
            Latency::WakeUp => {
                let reset = self
                    .hal
                    .latency(HalLatency::Reset)
                    .map_err(Self::hal_err)?;
                let wake_up = self
                    .hal
                    .latency(HalLatency::WakeUp)
                    .map_err(Self::hal_err)?;
                Ok(WAKE_UP_BASE_MS + reset + wake_up)
            }
            Latency::SendStart => {
                bit_time_ms(SEND_START_BITS, self.bit_rate_bps).ok_or(Error::State)
            }
            Latency::SendStop => {
                bit_time_ms(SEND_STOP_BITS, self.bit_rate_bps).ok_or(Error::State)
            }
            Latency::ReceiveStop => Ok(RECEIVE_STOP_MS),
            Latency::InitTx
            | Latency::DeInitTx
            | Latency::Sleep
            | Latency::InitRx
            | Latency::ReceiveStart
            | Latency::DeInitRx => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_timing_scales_with_bit_rate() {
        assert_eq!(bit_time_ms(SEND_START_BITS, 100), Some(20));
        assert_eq!(bit_time_ms(SEND_STOP_BITS, 100), Some(90));
        assert_eq!(bit_time_ms(SEND_START_BITS, 600), Some(3));
        assert_eq!(bit_time_ms(SEND_STOP_BITS, 600), Some(15));
    }

    #[test]
    fn zero_bit_rate_has_no_timing() {
        assert_eq!(bit_time_ms(SEND_START_BITS, 0), None);
    }
}
