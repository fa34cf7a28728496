//! LR11xx SPI device
//!
//! [`Device`] wraps the SPI bus and the two control lines of the chip and
//! implements [`Chip`] on top of them.
//!
//! Every exchange follows the LR11xx two-phase protocol:
//! - wait for BUSY low, then send the 16-bit opcode and its parameters
//! - if the command returns data, wait for BUSY low again and read the
//!   response in a second transaction; the first byte is `Stat1`
//!
//! # Example
//! ```no_run
//! # fn demo<SPI, BUSY, NRESET, DELAY>(spi: SPI, busy: BUSY, nreset: NRESET, delay: DELAY)
//! # -> Result<(), lr11xx_rf::DeviceError>
//! # where
//! #     SPI: embedded_hal::spi::SpiDevice,
//! #     BUSY: embedded_hal::digital::InputPin,
//! #     NRESET: embedded_hal::digital::OutputPin,
//! #     DELAY: embedded_hal::delay::DelayNs,
//! # {
//! use lr11xx_rf::{commands::GetVersion, Device};
//!
//! let mut device = Device::new(spi, busy, nreset, delay);
//! device.reset()?;
//! let version = device.execute_command(GetVersion)?;
//! # let _ = version;
//! # Ok(())
//! # }
//! ```

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::{Operation, SpiDevice};
use regiface::{errors::Error as RegifaceError, ByteArray, Command, FromByteArray, ToByteArray};

use crate::chip::Chip;
use crate::commands::{
    BpskModulationParams, BpskPacketParams, Calibrate, CalibrationMask, ChipErrors,
    ClearErrors, ClearIrq, ClearRxBuffer, ConfigLfClock, DioIrqConfig, GetErrors,
    GetGfskPacketStatus, GetRxBufferStatus, GetStatus, GetVersion, GfskModulationParams,
    GfskPacketParams, GfskPacketStatus, GfskSyncWord, IrqMask, LfClockConfig, PaConfig,
    PacketType, ReadBufferParams, RegMode, RfFrequency, RfSwitchConfig, RxBoosted,
    RxBufferStatus, SetBpskModulationParams, SetBpskPacketParams, SetDioAsRfSwitch,
    SetDioIrqParams, SetGfskModulationParams, SetGfskPacketParams, SetGfskSyncWord,
    SetPaConfig, SetPacketType, SetRegMode, SetRfFrequency, SetRx, SetRxBoosted, SetSleep,
    SetStandby, SetTcxoMode, SetTx, SetTxParams, SleepConfig, StandbyConfig, TcxoConfig,
    Timeout, TxParams, Version, READ_BUFFER8, WRITE_BUFFER8,
};

/// BUSY is polled every microsecond for at most this many polls
const BUSY_POLL_LIMIT: u32 = 100_000;
/// NRESET low time
const RESET_PULSE_MS: u32 = 1;
/// NSS low time needed to wake the chip from sleep
const WAKEUP_NSS_LOW_NS: u32 = 100_000;

/// LR11xx transceiver on an SPI bus.
///
/// `BUSY` and `NRESET` are the chip's BUSY output and reset input. `DELAY`
/// paces the reset pulse and BUSY polling.
pub struct Device<SPI, BUSY, NRESET, DELAY> {
    spi: SPI,
    busy: BUSY,
    nreset: NRESET,
    delay: DELAY,
}

impl<SPI, BUSY, NRESET, DELAY> Device<SPI, BUSY, NRESET, DELAY> {
    pub fn new(spi: SPI, busy: BUSY, nreset: NRESET, delay: DELAY) -> Self {
        Self {
            spi,
            busy,
            nreset,
            delay,
        }
    }

    /// Releases the bus, pins and delay.
    pub fn release(self) -> (SPI, BUSY, NRESET, DELAY) {
        (self.spi, self.busy, self.nreset, self.delay)
    }
}

impl<SPI, BUSY, NRESET, DELAY> Device<SPI, BUSY, NRESET, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    NRESET: OutputPin,
    DELAY: DelayNs,
{
    /// Blocks until the chip releases BUSY.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - BUSY could not be read, or stayed high
    ///   for longer than 100 ms
    pub fn wait_busy(&mut self) -> Result<(), RegifaceError> {
        for _ in 0..BUSY_POLL_LIMIT {
            if self.busy.is_low().map_err(|_| RegifaceError::BusError)? {
                return Ok(());
            }
            self.delay.delay_us(1);
        }
        Err(RegifaceError::BusError)
    }

    /// Hardware reset through NRESET.
    ///
    /// Returns once the chip has booted and released BUSY.
    pub fn reset(&mut self) -> Result<(), RegifaceError> {
        self.nreset.set_low().map_err(|_| RegifaceError::BusError)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.nreset.set_high().map_err(|_| RegifaceError::BusError)?;
        self.wait_busy()
    }

    /// Wakes the chip from sleep by holding NSS low until it starts up.
    pub fn wakeup(&mut self) -> Result<(), RegifaceError> {
        self.spi
            .transaction(&mut [Operation::DelayNs(WAKEUP_NSS_LOW_NS)])
            .map_err(|_| RegifaceError::BusError)?;
        self.wait_busy()
    }

    /// Writes bytes at the start of the radio buffer.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn write_buffer(&mut self, bytes: &[u8]) -> Result<(), RegifaceError> {
        self.wait_busy()?;
        self.spi
            .transaction(&mut [
                Operation::Write(&WRITE_BUFFER8.to_be_bytes()),
                Operation::Write(bytes),
            ])
            .map_err(|_| RegifaceError::BusError)
    }

    /// Reads `bytes.len()` bytes from the radio buffer starting at `offset`.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed, or more than
    ///   255 bytes were requested
    pub fn read_buffer(&mut self, offset: u8, bytes: &mut [u8]) -> Result<(), RegifaceError> {
        let len = u8::try_from(bytes.len()).map_err(|_| RegifaceError::BusError)?;
        let params = infallible(ReadBufferParams { offset, len }.to_bytes());

        self.wait_busy()?;
        self.spi
            .transaction(&mut [
                Operation::Write(&READ_BUFFER8.to_be_bytes()),
                Operation::Write(&params),
            ])
            .map_err(|_| RegifaceError::BusError)?;

        let mut stat1 = [0u8; 1];
        self.wait_busy()?;
        self.spi
            .transaction(&mut [Operation::Read(&mut stat1), Operation::Read(bytes)])
            .map_err(|_| RegifaceError::BusError)
    }

    /// Executes a command on the device.
    ///
    /// Commands without a response complete after the first transaction.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed or BUSY timed out
    /// * `RegifaceError::DeserializationError` - Failed to parse command response
    pub fn execute_command<C>(&mut self, command: C) -> Result<C::ResponseParameters, RegifaceError>
    where
        C: Command<IdType = u16>,
        C::CommandParameters: ToByteArray<Error = Infallible>,
    {
        let request = infallible(command.invoking_parameters().to_bytes());
        let mut raw_response = <C::ResponseParameters as FromByteArray>::Array::new();

        self.wait_busy()?;
        self.spi
            .transaction(&mut [
                Operation::Write(&C::id().to_be_bytes()),
                Operation::Write(request.as_ref()),
            ])
            .map_err(|_| RegifaceError::BusError)?;

        if !raw_response.as_ref().is_empty() {
            self.wait_busy()?;
            self.spi
                .transaction(&mut [Operation::Read(raw_response.as_mut())])
                .map_err(|_| RegifaceError::BusError)?;
        }

        C::ResponseParameters::from_bytes(raw_response)
            .map_err(|_| RegifaceError::DeserializationError)
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

impl<SPI, BUSY, NRESET, DELAY> Chip for Device<SPI, BUSY, NRESET, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    NRESET: OutputPin,
    DELAY: DelayNs,
{
    type Error = RegifaceError;

    fn reset(&mut self) -> Result<(), Self::Error> {
        Device::reset(self)
    }

    fn wakeup(&mut self) -> Result<(), Self::Error> {
        Device::wakeup(self)
    }

    fn set_reg_mode(&mut self, mode: RegMode) -> Result<(), Self::Error> {
        self.execute_command(SetRegMode { mode }).map(drop)
    }

    fn set_dio_as_rf_switch(&mut self, config: RfSwitchConfig) -> Result<(), Self::Error> {
        self.execute_command(SetDioAsRfSwitch { config }).map(drop)
    }

    fn config_lf_clock(&mut self, config: LfClockConfig) -> Result<(), Self::Error> {
        self.execute_command(ConfigLfClock { config }).map(drop)
    }

    fn clear_errors(&mut self) -> Result<(), Self::Error> {
        self.execute_command(ClearErrors).map(drop)
    }

    fn set_tcxo_mode(&mut self, config: TcxoConfig) -> Result<(), Self::Error> {
        self.execute_command(SetTcxoMode { config }).map(drop)
    }

    fn calibrate(&mut self, mask: CalibrationMask) -> Result<(), Self::Error> {
        self.execute_command(Calibrate { mask }).map(drop)
    }

    fn set_standby(&mut self, config: StandbyConfig) -> Result<(), Self::Error> {
        self.execute_command(SetStandby { config }).map(drop)
    }

    fn set_sleep(&mut self, config: SleepConfig) -> Result<(), Self::Error> {
        self.execute_command(SetSleep { config }).map(drop)
    }

    fn set_dio_irq_params(&mut self, config: DioIrqConfig) -> Result<(), Self::Error> {
        self.execute_command(SetDioIrqParams { config }).map(drop)
    }

    fn clear_irq_status(&mut self, mask: IrqMask) -> Result<(), Self::Error> {
        self.execute_command(ClearIrq { mask }).map(drop)
    }

    fn get_and_clear_irq_status(&mut self) -> Result<IrqMask, Self::Error> {
        let irq = self.execute_command(GetStatus)?.irq;
        if !irq.is_empty() {
            self.execute_command(ClearIrq { mask: irq })?;
        }
        Ok(irq)
    }

    fn get_version(&mut self) -> Result<Version, Self::Error> {
        self.execute_command(GetVersion)
    }

    fn get_errors(&mut self) -> Result<ChipErrors, Self::Error> {
        self.execute_command(GetErrors)
    }

    fn set_rf_frequency(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        self.execute_command(SetRfFrequency {
            frequency: RfFrequency(frequency_hz),
        })
        .map(drop)
    }

    fn set_packet_type(&mut self, packet_type: PacketType) -> Result<(), Self::Error> {
        self.execute_command(SetPacketType { packet_type }).map(drop)
    }

    fn set_bpsk_modulation_params(
        &mut self,
        params: BpskModulationParams,
    ) -> Result<(), Self::Error> {
        self.execute_command(SetBpskModulationParams { params })
            .map(drop)
    }

    fn set_gfsk_modulation_params(
        &mut self,
        params: GfskModulationParams,
    ) -> Result<(), Self::Error> {
        self.execute_command(SetGfskModulationParams { params })
            .map(drop)
    }

    fn set_pa_config(&mut self, config: PaConfig) -> Result<(), Self::Error> {
        self.execute_command(SetPaConfig { config }).map(drop)
    }

    fn set_tx_params(&mut self, params: TxParams) -> Result<(), Self::Error> {
        self.execute_command(SetTxParams { params }).map(drop)
    }

    fn set_bpsk_packet_params(&mut self, params: BpskPacketParams) -> Result<(), Self::Error> {
        self.execute_command(SetBpskPacketParams { params }).map(drop)
    }

    fn set_gfsk_packet_params(&mut self, params: GfskPacketParams) -> Result<(), Self::Error> {
        self.execute_command(SetGfskPacketParams { params }).map(drop)
    }

    fn set_gfsk_sync_word(&mut self, sync_word: GfskSyncWord) -> Result<(), Self::Error> {
        self.execute_command(SetGfskSyncWord { sync_word }).map(drop)
    }

    fn set_rx_boosted(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.execute_command(SetRxBoosted {
            boosted: RxBoosted(enabled),
        })
        .map(drop)
    }

    fn set_tx(&mut self, timeout: Timeout) -> Result<(), Self::Error> {
        self.execute_command(SetTx { timeout }).map(drop)
    }

    fn set_rx(&mut self, timeout: Timeout) -> Result<(), Self::Error> {
        self.execute_command(SetRx { timeout }).map(drop)
    }

    fn get_gfsk_packet_status(&mut self) -> Result<GfskPacketStatus, Self::Error> {
        self.execute_command(GetGfskPacketStatus)
    }

    fn get_rx_buffer_status(&mut self) -> Result<RxBufferStatus, Self::Error> {
        self.execute_command(GetRxBufferStatus)
    }

    fn write_buffer(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        Device::write_buffer(self, data)
    }

    fn read_buffer(&mut self, offset: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        Device::read_buffer(self, offset, data)
    }

    fn clear_rx_buffer(&mut self) -> Result<(), Self::Error> {
        self.execute_command(ClearRxBuffer).map(drop)
    }
}
