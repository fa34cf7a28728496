use crate::chip::Chip;
use crate::commands::{
    AddressFiltering, CrcType, GfskPacketParams, GfskSyncWord, HeaderType, PreambleDetector,
    Timeout, Whitening,
};
use crate::encoder::LineEncoder;
use crate::error::Error;
use crate::hal::Hal;
use crate::params::{RxOutcome, RxRequest, DL_FRAME_TYPE, DL_PHY_CONTENT_BYTES};
use crate::timer::Timer;

use super::{RadioState, Session, SessionError};

/// Downlink framing: fixed 15-byte frame after a 16-bit sync word, no CRC
/// and no whitening.
const DOWNLINK_PACKET: GfskPacketParams = GfskPacketParams {
    preamble_len_bits: 16,
    preamble_detector: PreambleDetector::Min16Bits,
    sync_word_len_bits: 16,
    address_filtering: AddressFiltering::Disabled,
    header_type: HeaderType::FixedLength,
    payload_len_bytes: DL_PHY_CONTENT_BYTES as u8,
    crc_type: CrcType::Off,
    whitening: Whitening::Off,
};

impl<C, H, T, E> Session<C, H, T, E>
where
    C: Chip,
    H: Hal,
    T: Timer,
    E: LineEncoder,
{
    /// Listens for a downlink frame.
    ///
    /// In blocking mode this returns once a frame arrives or the receive
    /// window timer elapses, whichever comes first. In callback mode it
    /// returns [`RxOutcome::Armed`] as soon as the receiver is on.
    pub fn receive(&mut self, request: &RxRequest) -> Result<RxOutcome, SessionError<C, H, T>> {
        self.expect_state(&[RadioState::Rx])?;
        self.expect_idle()?;

        self.on_rx_data = self.mode.callbacks().and(request.on_data_received);
        self.rx_done = false;
        self.error = false;

        self.chip
            .set_gfsk_packet_params(DOWNLINK_PACKET)
            .map_err(Self::radio_err)?;
        self.chip
            .set_gfsk_sync_word(GfskSyncWord::from_prefix(&DL_FRAME_TYPE))
            .map_err(Self::radio_err)?;
        self.chip.set_rx_boosted(true).map_err(Self::radio_err)?;
        self.hal.rx_on().map_err(Self::hal_err)?;
        self.chip
            .set_rx(Timeout::CONTINUOUS)
            .map_err(Self::radio_err)?;
        self.in_flight = true;

        if self.mode.callbacks().is_some() {
            return Ok(RxOutcome::Armed);
        }

        let outcome = self.wait_rx_done();
        self.in_flight = false;
        outcome
    }

    fn wait_rx_done(&mut self) -> Result<RxOutcome, SessionError<C, H, T>> {
        loop {
            if self.irq.is_pending() {
                self.process()?;
                if self.error {
                    error!("radio raised an error during rx");
                    return Err(Error::Aborted);
                }
                if self.rx_done {
                    return Ok(RxOutcome::DataReceived);
                }
            }
            if self.timer.has_elapsed().map_err(Self::timer_err)? {
                debug!("rx window elapsed");
                return Ok(RxOutcome::TimedOut);
            }
        }
    }

    /// Copies the received downlink frame into `payload` and returns the
    /// averaged RSSI in dBm.
    ///
    /// Returns `Ok(None)` when the chip does not flag the packet as
    /// received; `payload` is left untouched then. A frame can be read
    /// once: the buffer is cleared afterwards and further calls fail with
    /// [`Error::State`] until the next reception.
    pub fn get_payload_and_signal(
        &mut self,
        payload: &mut [u8],
    ) -> Result<Option<i16>, SessionError<C, H, T>> {
        if payload.len() > DL_PHY_CONTENT_BYTES {
            return Err(Error::BufferSize);
        }
        self.expect_state(&[RadioState::Standby, RadioState::Rx])?;
        if !self.rx_done {
            warn!("no downlink frame received");
            return Err(Error::State);
        }

        let status = self
            .chip
            .get_gfsk_packet_status()
            .map_err(Self::radio_err)?;
        if !status.is_received {
            return Ok(None);
        }

        let buffer = self
            .chip
            .get_rx_buffer_status()
            .map_err(Self::radio_err)?;
        self.chip
            .read_buffer(buffer.start_pointer, payload)
            .map_err(Self::regmem_err)?;
        self.chip.clear_rx_buffer().map_err(Self::regmem_err)?;
        self.rx_done = false;

        Ok(Some(status.rssi_avg))
    }
}
