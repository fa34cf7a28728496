//! System commands
//!
//! Commands in the `0x01xx` opcode family: power modes, regulator and
//! oscillator setup, calibration, RF switch wiring and interrupt routing.
//!
//! Most of these are only accepted while the chip is in standby. The
//! reset-and-wake sequence issues them in a fixed order before any radio
//! configuration takes place.

use bitflags::bitflags;
use core::convert::Infallible;

use crate::{Command, NoParameters, ToByteArray};

/// Regulator used to supply the digital core and radio blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegMode {
    /// Linear regulator only
    Ldo = 0x00,
    /// DC-DC converter, LDO used while the converter starts
    DcDc = 0x01,
}

impl ToByteArray for RegMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self as u8])
    }
}

/// SetRegMode command (0x0110)
#[derive(Debug, Clone)]
pub struct SetRegMode {
    pub mode: RegMode,
}

impl Command for SetRegMode {
    type IdType = u16;
    type CommandParameters = RegMode;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0110
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.mode
    }
}

bitflags! {
    /// DIO lines usable as RF switch controls
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RfSwitchDio: u8 {
        const DIO5 = 1 << 0;
        const DIO6 = 1 << 1;
        const DIO7 = 1 << 2;
        const DIO8 = 1 << 3;
        const DIO10 = 1 << 4;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RfSwitchDio {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "RfSwitchDio({=u8:#x})", self.bits())
    }
}

/// RF switch table
///
/// `enable` selects which DIOs the chip drives at all. Every other field is
/// the set of DIOs driven high while the chip is in the matching mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RfSwitchConfig {
    pub enable: RfSwitchDio,
    pub standby: RfSwitchDio,
    pub rx: RfSwitchDio,
    pub tx: RfSwitchDio,
    pub tx_hp: RfSwitchDio,
    pub tx_hf: RfSwitchDio,
    pub gnss: RfSwitchDio,
    pub wifi: RfSwitchDio,
}

impl ToByteArray for RfSwitchConfig {
    type Error = Infallible;
    type Array = [u8; 8];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([
            self.enable.bits(),
            self.standby.bits(),
            self.rx.bits(),
            self.tx.bits(),
            self.tx_hp.bits(),
            self.tx_hf.bits(),
            self.gnss.bits(),
            self.wifi.bits(),
        ])
    }
}

/// SetDioAsRfSwitch command (0x0112)
#[derive(Debug, Clone)]
pub struct SetDioAsRfSwitch {
    pub config: RfSwitchConfig,
}

impl Command for SetDioAsRfSwitch {
    type IdType = u16;
    type CommandParameters = RfSwitchConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0112
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

/// Source of the 32.768 kHz low-frequency clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LfClock {
    /// Internal RC oscillator
    Rc = 0x00,
    /// 32.768 kHz crystal
    Xtal = 0x01,
    /// External clock on DIO11
    External = 0x02,
}

/// Low-frequency clock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LfClockConfig {
    pub source: LfClock,
    /// Hold BUSY high until the 32 kHz crystal is ready
    pub wait_xtal_ready: bool,
}

impl ToByteArray for LfClockConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.source as u8 & 0x03) | ((self.wait_xtal_ready as u8) << 2)])
    }
}

/// ConfigLfClock command (0x0116)
#[derive(Debug, Clone)]
pub struct ConfigLfClock {
    pub config: LfClockConfig,
}

impl Command for ConfigLfClock {
    type IdType = u16;
    type CommandParameters = LfClockConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0116
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

/// ClearErrors command (0x010E)
///
/// Clears every latched error reported by [`GetErrors`](crate::commands::GetErrors).
#[derive(Debug, Clone)]
pub struct ClearErrors;

impl Command for ClearErrors {
    type IdType = u16;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x010E
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// Supply voltage presented to the TCXO on VTCXO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TcxoVoltage {
    V1_6 = 0x00,
    V1_7 = 0x01,
    V1_8 = 0x02,
    V2_2 = 0x03,
    V2_4 = 0x04,
    V2_7 = 0x05,
    V3_0 = 0x06,
    V3_3 = 0x07,
}

/// TCXO configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TcxoConfig {
    pub voltage: TcxoVoltage,
    /// Start-up timeout in 30.52 µs steps, 24 bits wide
    pub timeout: u32,
}

impl ToByteArray for TcxoConfig {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let timeout = self.timeout.to_be_bytes();
        Ok([self.voltage as u8, timeout[1], timeout[2], timeout[3]])
    }
}

/// SetTcxoMode command (0x0117)
///
/// Makes the chip power an external TCXO and wait for it before using the
/// high-frequency clock. Calibration must be rerun afterwards.
#[derive(Debug, Clone)]
pub struct SetTcxoMode {
    pub config: TcxoConfig,
}

impl Command for SetTcxoMode {
    type IdType = u16;
    type CommandParameters = TcxoConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0117
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

bitflags! {
    /// Blocks to calibrate
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CalibrationMask: u8 {
        const LF_RC = 1 << 0;
        const HF_RC = 1 << 1;
        const PLL = 1 << 2;
        const ADC = 1 << 3;
        const IMG = 1 << 4;
        const PLL_TX = 1 << 5;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CalibrationMask {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "CalibrationMask({=u8:#x})", self.bits())
    }
}

impl ToByteArray for CalibrationMask {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.bits()])
    }
}

/// Calibrate command (0x010F)
#[derive(Debug, Clone)]
pub struct Calibrate {
    pub mask: CalibrationMask,
}

impl Command for Calibrate {
    type IdType = u16;
    type CommandParameters = CalibrationMask;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x010F
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.mask
    }
}

/// Oscillator kept running in standby
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StandbyConfig {
    /// RC oscillator
    Rc = 0x00,
    /// Crystal oscillator, faster transition to TX/RX
    Xosc = 0x01,
}

impl ToByteArray for StandbyConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self as u8])
    }
}

/// SetStandby command (0x011C)
#[derive(Debug, Clone)]
pub struct SetStandby {
    pub config: StandbyConfig,
}

impl Command for SetStandby {
    type IdType = u16;
    type CommandParameters = StandbyConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x011C
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

bitflags! {
    /// Sleep behaviour flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SleepFlags: u8 {
        /// Retain configuration in sleep (warm start)
        const WARM_START = 1 << 0;
        /// Wake up when the RTC timeout elapses
        const RTC_WAKEUP = 1 << 1;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SleepFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "SleepFlags({=u8:#x})", self.bits())
    }
}

/// Sleep configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SleepConfig {
    pub flags: SleepFlags,
    /// RTC wake-up delay in 30.52 µs steps, ignored without `RTC_WAKEUP`
    pub sleep_time: u32,
}

impl ToByteArray for SleepConfig {
    type Error = Infallible;
    type Array = [u8; 5];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let time = self.sleep_time.to_be_bytes();
        Ok([self.flags.bits(), time[0], time[1], time[2], time[3]])
    }
}

/// SetSleep command (0x011B)
///
/// After a cold sleep every configuration is lost and the chip has to go
/// through the full wake-up sequence again.
#[derive(Debug, Clone)]
pub struct SetSleep {
    pub config: SleepConfig,
}

impl Command for SetSleep {
    type IdType = u16;
    type CommandParameters = SleepConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x011B
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

bitflags! {
    /// Interrupt sources
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct IrqMask: u32 {
        const TX_DONE = 1 << 2;
        const RX_DONE = 1 << 3;
        const PREAMBLE_DETECTED = 1 << 4;
        const SYNC_WORD_HEADER_VALID = 1 << 5;
        const HEADER_ERROR = 1 << 6;
        const CRC_ERROR = 1 << 7;
        const CAD_DONE = 1 << 8;
        const CAD_DETECTED = 1 << 9;
        const TIMEOUT = 1 << 10;
        const LR_FHSS_HOP = 1 << 11;
        const GNSS_SCAN_DONE = 1 << 19;
        const WIFI_SCAN_DONE = 1 << 20;
        const EOL = 1 << 21;
        const CMD_ERROR = 1 << 22;
        const ERROR = 1 << 23;
        const FSK_LEN_ERROR = 1 << 24;
        const FSK_ADDR_ERROR = 1 << 25;
    }
}

impl IrqMask {
    /// Mask used to clear every pending interrupt
    pub const ALL: Self = Self::from_bits_retain(0x0FFF_FFFF);
}

#[cfg(feature = "defmt")]
impl defmt::Format for IrqMask {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "IrqMask({=u32:#x})", self.bits())
    }
}

impl ToByteArray for IrqMask {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.bits().to_be_bytes())
    }
}

/// Interrupt routing to the two IRQ lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DioIrqConfig {
    /// Sources raising DIO9
    pub irq1: IrqMask,
    /// Sources raising DIO11
    pub irq2: IrqMask,
}

impl ToByteArray for DioIrqConfig {
    type Error = Infallible;
    type Array = [u8; 8];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut bytes = [0; 8];
        bytes[..4].copy_from_slice(&self.irq1.bits().to_be_bytes());
        bytes[4..].copy_from_slice(&self.irq2.bits().to_be_bytes());
        Ok(bytes)
    }
}

/// SetDioIrqParams command (0x0113)
#[derive(Debug, Clone)]
pub struct SetDioIrqParams {
    pub config: DioIrqConfig,
}

impl Command for SetDioIrqParams {
    type IdType = u16;
    type CommandParameters = DioIrqConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0113
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

/// ClearIrq command (0x0114)
#[derive(Debug, Clone)]
pub struct ClearIrq {
    pub mask: IrqMask,
}

impl Command for ClearIrq {
    type IdType = u16;
    type CommandParameters = IrqMask;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0114
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.mask
    }
}
