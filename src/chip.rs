//! Chip driver boundary
//!
//! The session never talks to the bus directly. It drives the transceiver
//! through [`Chip`], one method per command it issues. [`Device`](crate::Device)
//! implements it over SPI; tests and alternative transports can provide
//! their own implementation.

use core::fmt::Debug;

use crate::commands::{
    BpskModulationParams, BpskPacketParams, CalibrationMask, ChipErrors, DioIrqConfig,
    GfskModulationParams, GfskPacketParams, GfskPacketStatus, GfskSyncWord, IrqMask,
    LfClockConfig, PaConfig, PacketType, RegMode, RfSwitchConfig, RxBufferStatus, SleepConfig,
    StandbyConfig, TcxoConfig, Timeout, TxParams, Version,
};

/// Register-level control of an LR11xx transceiver.
///
/// Every method either fully succeeds or reports `Self::Error`; the session
/// does not retry.
pub trait Chip {
    type Error: Debug;

    /// Pulses the reset line and waits for the chip to boot.
    fn reset(&mut self) -> Result<(), Self::Error>;
    /// Brings the chip out of sleep.
    fn wakeup(&mut self) -> Result<(), Self::Error>;

    fn set_reg_mode(&mut self, mode: RegMode) -> Result<(), Self::Error>;
    fn set_dio_as_rf_switch(&mut self, config: RfSwitchConfig) -> Result<(), Self::Error>;
    fn config_lf_clock(&mut self, config: LfClockConfig) -> Result<(), Self::Error>;
    fn clear_errors(&mut self) -> Result<(), Self::Error>;
    fn set_tcxo_mode(&mut self, config: TcxoConfig) -> Result<(), Self::Error>;
    fn calibrate(&mut self, mask: CalibrationMask) -> Result<(), Self::Error>;
    fn set_standby(&mut self, config: StandbyConfig) -> Result<(), Self::Error>;
    fn set_sleep(&mut self, config: SleepConfig) -> Result<(), Self::Error>;
    fn set_dio_irq_params(&mut self, config: DioIrqConfig) -> Result<(), Self::Error>;
    fn clear_irq_status(&mut self, mask: IrqMask) -> Result<(), Self::Error>;
    /// Reads the pending interrupts and clears exactly those.
    fn get_and_clear_irq_status(&mut self) -> Result<IrqMask, Self::Error>;
    fn get_version(&mut self) -> Result<Version, Self::Error>;
    fn get_errors(&mut self) -> Result<ChipErrors, Self::Error>;

    fn set_rf_frequency(&mut self, frequency_hz: u32) -> Result<(), Self::Error>;
    fn set_packet_type(&mut self, packet_type: PacketType) -> Result<(), Self::Error>;
    fn set_bpsk_modulation_params(
        &mut self,
        params: BpskModulationParams,
    ) -> Result<(), Self::Error>;
    fn set_gfsk_modulation_params(
        &mut self,
        params: GfskModulationParams,
    ) -> Result<(), Self::Error>;
    fn set_pa_config(&mut self, config: PaConfig) -> Result<(), Self::Error>;
    fn set_tx_params(&mut self, params: TxParams) -> Result<(), Self::Error>;
    fn set_bpsk_packet_params(&mut self, params: BpskPacketParams) -> Result<(), Self::Error>;
    fn set_gfsk_packet_params(&mut self, params: GfskPacketParams) -> Result<(), Self::Error>;
    fn set_gfsk_sync_word(&mut self, sync_word: GfskSyncWord) -> Result<(), Self::Error>;
    fn set_rx_boosted(&mut self, enabled: bool) -> Result<(), Self::Error>;
    fn set_tx(&mut self, timeout: Timeout) -> Result<(), Self::Error>;
    fn set_rx(&mut self, timeout: Timeout) -> Result<(), Self::Error>;
    fn get_gfsk_packet_status(&mut self) -> Result<GfskPacketStatus, Self::Error>;
    fn get_rx_buffer_status(&mut self) -> Result<RxBufferStatus, Self::Error>;

    /// Writes `data` at the start of the radio buffer.
    fn write_buffer(&mut self, data: &[u8]) -> Result<(), Self::Error>;
    /// Fills `data` from the radio buffer starting at `offset`.
    fn read_buffer(&mut self, offset: u8, data: &mut [u8]) -> Result<(), Self::Error>;
    fn clear_rx_buffer(&mut self) -> Result<(), Self::Error>;
}
