use crate::chip::Chip;
use crate::commands::{
    BpskModulationParams, BpskPacketParams, BpskPulseShape, GfskBandwidth,
    GfskModulationParams, GfskPulseShape, PaConfig, PaRegSupply, PaSelection, PacketType,
    RampTime, StandbyConfig, Timeout, TxParams,
};
use crate::encoder::LineEncoder;
use crate::error::Error;
use crate::hal::Hal;
use crate::params::{Modulation, RadioParameters, Role, TxRequest, UL_BITSTREAM_MAX_BYTES};
use crate::timer::Timer;

use super::{RadioState, Session, SessionError};

/// Highest power served by the low-power PA
pub const LOW_POWER_PA_MAX_DBM: i8 = 14;
const PA_DUTY_CYCLE: u8 = 0x04;
const PA_HP_SLICES_MAX: u8 = 0x07;

/// Guard timeout of a single uplink frame
pub const TX_TIMEOUT_MS: u32 = 5000;

/// Appended after the payload so the encoder has a defined trailing symbol
const STOP_MARKER: u8 = 0x80;

/// Ramp compensation around a BPSK frame, in chip units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampDelays {
    pub up: u16,
    pub down: u16,
}

/// Ramp compensation for the uplink bit rates the protocol uses.
///
/// Returns `None` for any other rate.
pub fn ramp_delays(bit_rate_bps: u16) -> Option<RampDelays> {
    match bit_rate_bps {
        100 => Some(RampDelays {
            up: 0x1306,
            down: 0x1D70,
        }),
        600 => Some(RampDelays {
            up: 0x0325,
            down: 0x04E1,
        }),
        _ => None,
    }
}

/// Power amplifier setup for a target output power.
///
/// Above 14 dBm the high-power PA runs from the battery rail with every
/// slice enabled, otherwise the low-power PA runs from the regulator.
pub fn pa_config_for(tx_power_dbm: i8) -> PaConfig {
    if tx_power_dbm > LOW_POWER_PA_MAX_DBM {
        PaConfig {
            selection: PaSelection::HighPower,
            supply: PaRegSupply::Vbat,
            duty_cycle: PA_DUTY_CYCLE,
            hp_slices: PA_HP_SLICES_MAX,
        }
    } else {
        PaConfig {
            selection: PaSelection::LowPower,
            supply: PaRegSupply::Vreg,
            duty_cycle: PA_DUTY_CYCLE,
            hp_slices: 0,
        }
    }
}

impl<C, H, T, E> Session<C, H, T, E>
where
    C: Chip,
    H: Hal,
    T: Timer,
    E: LineEncoder,
{
    /// Programs frequency, modulation and, for uplinks, the power amplifier.
    pub fn init(&mut self, params: &RadioParameters) -> Result<(), SessionError<C, H, T>> {
        self.expect_state(&[RadioState::Standby])?;

        self.chip
            .set_rf_frequency(params.frequency_hz)
            .map_err(Self::radio_err)?;

        match params.modulation {
            Modulation::Dbpsk => {
                self.chip
                    .set_packet_type(PacketType::Bpsk)
                    .map_err(Self::radio_err)?;
                self.chip
                    .set_bpsk_modulation_params(BpskModulationParams {
                        bit_rate: params.bit_rate_bps.into(),
                        pulse_shape: BpskPulseShape::Dbpsk,
                    })
                    .map_err(Self::radio_err)?;
            }
            Modulation::Gfsk => {
                self.chip
                    .set_packet_type(PacketType::Gfsk)
                    .map_err(Self::radio_err)?;
                self.chip
                    .set_gfsk_modulation_params(GfskModulationParams {
                        bit_rate: params.bit_rate_bps.into(),
                        pulse_shape: GfskPulseShape::Bt1_0,
                        bandwidth: GfskBandwidth::Bw4800,
                        deviation: params.deviation_hz,
                    })
                    .map_err(Self::radio_err)?;
            }
            Modulation::None => {}
        }

        match params.role {
            Role::Tx => {
                self.bit_rate_bps = params.bit_rate_bps;
                self.chip
                    .set_pa_config(pa_config_for(params.tx_power_dbm))
                    .map_err(Self::radio_err)?;
                self.chip
                    .set_tx_params(TxParams {
                        power: params.tx_power_dbm,
                        ramp_time: RampTime::Micros208,
                    })
                    .map_err(Self::radio_err)?;
                self.set_state(RadioState::Tx);
            }
            Role::Rx => self.set_state(RadioState::Rx),
        }
        Ok(())
    }

    /// Returns the chip to standby and turns both RF paths off, whichever
    /// was in use. Also abandons an operation still in progress.
    pub fn de_init(&mut self) -> Result<(), SessionError<C, H, T>> {
        self.expect_state(&[RadioState::Standby, RadioState::Tx, RadioState::Rx])?;

        self.chip
            .set_standby(StandbyConfig::Xosc)
            .map_err(Self::system_err)?;
        self.hal.rx_off().map_err(Self::hal_err)?;
        self.hal.tx_off().map_err(Self::hal_err)?;

        self.in_flight = false;
        self.set_state(RadioState::Standby);
        Ok(())
    }

    /// Encodes and transmits an uplink frame.
    ///
    /// In blocking mode this returns once the chip reports TX done, or
    /// fails with [`Error::Aborted`] if it reports an error instead. In
    /// callback mode it returns as soon as transmission has started.
    pub fn send(&mut self, request: &TxRequest<'_>) -> Result<(), SessionError<C, H, T>> {
        self.expect_state(&[RadioState::Tx])?;
        self.expect_idle()?;

        let len = request.bitstream.len();
        if len > UL_BITSTREAM_MAX_BYTES {
            return Err(Error::BufferSize);
        }

        self.on_tx_complete = self.mode.callbacks().and(request.on_complete);
        self.tx_done = false;
        self.error = false;

        let mut frame = [0u8; UL_BITSTREAM_MAX_BYTES + 1];
        frame[..len].copy_from_slice(request.bitstream);
        frame[len] = STOP_MARKER;

        let payload_bits = len * 8;
        let mut encoded = [0u8; UL_BITSTREAM_MAX_BYTES + 1];
        E::encode(&frame[..=len], payload_bits + 2, &mut encoded);
        let encoded_len = usize::from(E::payload_len_in_bytes(payload_bits)).min(encoded.len());

        match ramp_delays(self.bit_rate_bps) {
            Some(ramp) => self.ramp = ramp,
            None => warn!(
                "no ramp timing for {} bps, keeping {:?}",
                self.bit_rate_bps,
                self.ramp
            ),
        }

        self.chip
            .set_bpsk_packet_params(BpskPacketParams {
                payload_len_bytes: E::payload_len_in_bytes(payload_bits),
                ramp_up_delay: self.ramp.up,
                ramp_down_delay: self.ramp.down,
                payload_len_bits: E::payload_len_in_bits(payload_bits),
            })
            .map_err(Self::radio_err)?;
        self.chip
            .write_buffer(&encoded[..encoded_len])
            .map_err(Self::regmem_err)?;
        self.hal.tx_on().map_err(Self::hal_err)?;
        self.chip
            .set_tx(Timeout::from_millis(TX_TIMEOUT_MS))
            .map_err(Self::radio_err)?;
        self.in_flight = true;

        if self.mode.callbacks().is_some() {
            return Ok(());
        }

        let result = self.wait_tx_done();
        self.in_flight = false;
        result
    }

    fn wait_tx_done(&mut self) -> Result<(), SessionError<C, H, T>> {
        loop {
            if self.irq.is_pending() {
                self.process()?;
                if self.error {
                    error!("radio raised an error during tx");
                    return Err(Error::Aborted);
                }
            }
            if self.tx_done {
                return Ok(());
            }
            core::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pa_switches_above_14_dbm() {
        let low = pa_config_for(14);
        assert_eq!(low.selection, PaSelection::LowPower);
        assert_eq!(low.supply, PaRegSupply::Vreg);
        assert_eq!(low.hp_slices, 0);

        let high = pa_config_for(15);
        assert_eq!(high.selection, PaSelection::HighPower);
        assert_eq!(high.supply, PaRegSupply::Vbat);
        assert_eq!(high.hp_slices, 7);

        assert_eq!(low.duty_cycle, high.duty_cycle);
        assert_eq!(pa_config_for(-9), low);
        assert_eq!(pa_config_for(22), high);
    }

    #[test]
    fn ramp_table_covers_uplink_rates() {
        assert_eq!(
            ramp_delays(100),
            Some(RampDelays {
                up: 0x1306,
                down: 0x1D70
            })
        );
        assert_eq!(
            ramp_delays(600),
            Some(RampDelays {
                up: 0x0325,
                down: 0x04E1
            })
        );
    }

    #[test]
    fn ramp_table_has_no_entry_for_other_rates() {
        assert_eq!(ramp_delays(0), None);
        assert_eq!(ramp_delays(300), None);
        assert_eq!(ramp_delays(601), None);
    }
}
