//! Radio commands
//!
//! Commands in the `0x02xx` opcode family: carrier frequency, packet type,
//! modulation and packet framing, power amplifier setup, and the TX/RX
//! triggers together with the packet status readback.
//!
//! The packet type must be selected before modulation or packet parameters
//! are written, since their layout depends on it.

use core::convert::Infallible;

use regiface::FromByteArray;

use crate::{Command, NoParameters, ToByteArray};

/// Carrier frequency in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RfFrequency(pub u32);

impl ToByteArray for RfFrequency {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.0.to_be_bytes())
    }
}

/// SetRfFrequency command (0x020B)
#[derive(Debug, Clone)]
pub struct SetRfFrequency {
    pub frequency: RfFrequency,
}

impl Command for SetRfFrequency {
    type IdType = u16;
    type CommandParameters = RfFrequency;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x020B
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.frequency
    }
}

/// Modem selected for the next operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketType {
    None = 0x00,
    Gfsk = 0x01,
    LoRa = 0x02,
    /// Transmit-only BPSK modem
    Bpsk = 0x03,
}

impl ToByteArray for PacketType {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self as u8])
    }
}

/// SetPacketType command (0x020E)
#[derive(Debug, Clone)]
pub struct SetPacketType {
    pub packet_type: PacketType,
}

impl Command for SetPacketType {
    type IdType = u16;
    type CommandParameters = PacketType;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x020E
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.packet_type
    }
}

/// BPSK pulse shaping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BpskPulseShape {
    /// Differential BPSK shaping used for Sigfox uplinks
    Dbpsk = 0x16,
}

/// BPSK modulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BpskModulationParams {
    pub bit_rate: u32,
    pub pulse_shape: BpskPulseShape,
}

impl ToByteArray for BpskModulationParams {
    type Error = Infallible;
    type Array = [u8; 5];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let br = self.bit_rate.to_be_bytes();
        Ok([br[0], br[1], br[2], br[3], self.pulse_shape as u8])
    }
}

/// SetModulationParams command (0x020F) for the BPSK modem
#[derive(Debug, Clone)]
pub struct SetBpskModulationParams {
    pub params: BpskModulationParams,
}

impl Command for SetBpskModulationParams {
    type IdType = u16;
    type CommandParameters = BpskModulationParams;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x020F
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.params
    }
}

/// GFSK Gaussian filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GfskPulseShape {
    Off = 0x00,
    Bt0_3 = 0x08,
    Bt0_5 = 0x09,
    Bt0_7 = 0x0A,
    Bt1_0 = 0x0B,
}

/// GFSK receiver bandwidth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GfskBandwidth {
    Bw4800 = 0x1F,
    Bw5800 = 0x17,
    Bw7300 = 0x0F,
    Bw9700 = 0x1E,
    Bw11700 = 0x16,
    Bw14600 = 0x0E,
    Bw19500 = 0x1D,
    Bw23400 = 0x15,
}

/// GFSK modulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GfskModulationParams {
    pub bit_rate: u32,
    pub pulse_shape: GfskPulseShape,
    pub bandwidth: GfskBandwidth,
    /// Frequency deviation in Hz
    pub deviation: u32,
}

impl ToByteArray for GfskModulationParams {
    type Error = Infallible;
    type Array = [u8; 10];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut bytes = [0; 10];
        bytes[..4].copy_from_slice(&self.bit_rate.to_be_bytes());
        bytes[4] = self.pulse_shape as u8;
        bytes[5] = self.bandwidth as u8;
        bytes[6..].copy_from_slice(&self.deviation.to_be_bytes());
        Ok(bytes)
    }
}

/// SetModulationParams command (0x020F) for the GFSK modem
#[derive(Debug, Clone)]
pub struct SetGfskModulationParams {
    pub params: GfskModulationParams,
}

impl Command for SetGfskModulationParams {
    type IdType = u16;
    type CommandParameters = GfskModulationParams;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x020F
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.params
    }
}

/// BPSK packet parameters
///
/// The ramp fields are timing compensations applied around the payload
/// and depend on the bit rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BpskPacketParams {
    pub payload_len_bytes: u8,
    pub ramp_up_delay: u16,
    pub ramp_down_delay: u16,
    pub payload_len_bits: u16,
}

impl ToByteArray for BpskPacketParams {
    type Error = Infallible;
    type Array = [u8; 7];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let up = self.ramp_up_delay.to_be_bytes();
        let down = self.ramp_down_delay.to_be_bytes();
        let bits = self.payload_len_bits.to_be_bytes();
        Ok([
            self.payload_len_bytes,
            up[0],
            up[1],
            down[0],
            down[1],
            bits[0],
            bits[1],
        ])
    }
}

/// SetPacketParams command (0x0210) for the BPSK modem
#[derive(Debug, Clone)]
pub struct SetBpskPacketParams {
    pub params: BpskPacketParams,
}

impl Command for SetBpskPacketParams {
    type IdType = u16;
    type CommandParameters = BpskPacketParams;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0210
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.params
    }
}

/// Minimum preamble length before the detector triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PreambleDetector {
    Off = 0x00,
    Min8Bits = 0x04,
    Min16Bits = 0x05,
    Min24Bits = 0x06,
    Min32Bits = 0x07,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressFiltering {
    Disabled = 0x00,
    Node = 0x01,
    NodeAndBroadcast = 0x02,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaderType {
    /// Payload length known by both ends
    FixedLength = 0x00,
    VariableLength = 0x01,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcType {
    Off = 0x01,
    OneByte = 0x00,
    TwoBytes = 0x02,
    OneByteInverted = 0x04,
    TwoBytesInverted = 0x06,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Whitening {
    Off = 0x00,
    On = 0x01,
}

/// GFSK packet parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GfskPacketParams {
    pub preamble_len_bits: u16,
    pub preamble_detector: PreambleDetector,
    pub sync_word_len_bits: u8,
    pub address_filtering: AddressFiltering,
    pub header_type: HeaderType,
    pub payload_len_bytes: u8,
    pub crc_type: CrcType,
    pub whitening: Whitening,
}

impl ToByteArray for GfskPacketParams {
    type Error = Infallible;
    type Array = [u8; 9];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let preamble = self.preamble_len_bits.to_be_bytes();
        Ok([
            preamble[0],
            preamble[1],
            self.preamble_detector as u8,
            self.sync_word_len_bits,
            self.address_filtering as u8,
            self.header_type as u8,
            self.payload_len_bytes,
            self.crc_type as u8,
            self.whitening as u8,
        ])
    }
}

/// SetPacketParams command (0x0210) for the GFSK modem
#[derive(Debug, Clone)]
pub struct SetGfskPacketParams {
    pub params: GfskPacketParams,
}

impl Command for SetGfskPacketParams {
    type IdType = u16;
    type CommandParameters = GfskPacketParams;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0210
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.params
    }
}

/// GFSK sync word, most significant byte first
///
/// Only the first `sync_word_len_bits` bits configured in the packet
/// parameters are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GfskSyncWord(pub [u8; 8]);

impl GfskSyncWord {
    /// Left-aligns `word` in the 8-byte field, zero-filling the rest
    pub fn from_prefix(word: &[u8]) -> Self {
        let mut bytes = [0; 8];
        let len = word.len().min(bytes.len());
        bytes[..len].copy_from_slice(&word[..len]);
        Self(bytes)
    }
}

impl ToByteArray for GfskSyncWord {
    type Error = Infallible;
    type Array = [u8; 8];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.0)
    }
}

/// SetGfskSyncWord command (0x0206)
#[derive(Debug, Clone)]
pub struct SetGfskSyncWord {
    pub sync_word: GfskSyncWord,
}

impl Command for SetGfskSyncWord {
    type IdType = u16;
    type CommandParameters = GfskSyncWord;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0206
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.sync_word
    }
}

/// Power amplifier selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaSelection {
    /// Low-power PA, up to +14 dBm
    LowPower = 0x00,
    /// High-power PA, up to +22 dBm
    HighPower = 0x01,
    /// High-frequency PA (2.4 GHz)
    HighFrequency = 0x02,
}

/// Supply rail of the power amplifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaRegSupply {
    /// Internal regulator
    Vreg = 0x00,
    /// Battery rail
    Vbat = 0x01,
}

/// Power amplifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaConfig {
    pub selection: PaSelection,
    pub supply: PaRegSupply,
    pub duty_cycle: u8,
    /// Number of high-power PA slices, 0 to 7
    pub hp_slices: u8,
}

impl ToByteArray for PaConfig {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([
            self.selection as u8,
            self.supply as u8,
            self.duty_cycle,
            self.hp_slices,
        ])
    }
}

/// SetPaConfig command (0x0215)
#[derive(Debug, Clone)]
pub struct SetPaConfig {
    pub config: PaConfig,
}

impl Command for SetPaConfig {
    type IdType = u16;
    type CommandParameters = PaConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0215
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

/// Power amplifier ramp time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampTime {
    Micros16 = 0x00,
    Micros32 = 0x01,
    Micros48 = 0x02,
    Micros64 = 0x03,
    Micros80 = 0x04,
    Micros96 = 0x05,
    Micros112 = 0x06,
    Micros128 = 0x07,
    Micros144 = 0x08,
    Micros160 = 0x09,
    Micros176 = 0x0A,
    Micros192 = 0x0B,
    Micros208 = 0x0C,
    Micros240 = 0x0D,
    Micros272 = 0x0E,
    Micros304 = 0x0F,
}

/// TX output parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxParams {
    /// Output power in dBm, range depends on the selected PA
    pub power: i8,
    pub ramp_time: RampTime,
}

impl ToByteArray for TxParams {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.power as u8, self.ramp_time as u8])
    }
}

/// SetTxParams command (0x0211)
///
/// Must follow SetPaConfig, the power range depends on the PA in use.
#[derive(Debug, Clone)]
pub struct SetTxParams {
    pub params: TxParams,
}

impl Command for SetTxParams {
    type IdType = u16;
    type CommandParameters = TxParams;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0211
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.params
    }
}

/// RX gain boost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxBoosted(pub bool);

impl ToByteArray for RxBoosted {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.0 as u8])
    }
}

/// SetRxBoosted command (0x0227)
///
/// Improves sensitivity by about 2 dB for a higher RX current.
#[derive(Debug, Clone)]
pub struct SetRxBoosted {
    pub boosted: RxBoosted,
}

impl Command for SetRxBoosted {
    type IdType = u16;
    type CommandParameters = RxBoosted;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0227
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.boosted
    }
}

/// TX/RX timeout in steps of the 32.768 kHz RTC, 24 bits wide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout(u32);

impl Timeout {
    /// No timeout for TX, continuous mode for RX
    pub const NONE: Self = Self(0);
    /// RX stays on until a packet is received
    pub const CONTINUOUS: Self = Self(0x00FF_FFFF);

    /// Raw RTC steps, saturated to 24 bits
    pub const fn from_rtc_steps(steps: u32) -> Self {
        if steps > Self::CONTINUOUS.0 {
            Self::CONTINUOUS
        } else {
            Self(steps)
        }
    }

    pub const fn from_millis(ms: u32) -> Self {
        Self::from_rtc_steps(((ms as u64 * 32_768) / 1000) as u32)
    }

    pub const fn rtc_steps(self) -> u32 {
        self.0
    }
}

impl ToByteArray for Timeout {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let steps = self.0.to_be_bytes();
        Ok([steps[1], steps[2], steps[3]])
    }
}

/// SetTx command (0x020A)
///
/// Starts transmitting the buffer. TX_DONE or TIMEOUT is raised at the end.
#[derive(Debug, Clone)]
pub struct SetTx {
    pub timeout: Timeout,
}

impl Command for SetTx {
    type IdType = u16;
    type CommandParameters = Timeout;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x020A
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.timeout
    }
}

/// SetRx command (0x0209)
#[derive(Debug, Clone)]
pub struct SetRx {
    pub timeout: Timeout,
}

impl Command for SetRx {
    type IdType = u16;
    type CommandParameters = Timeout;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0209
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.timeout
    }
}

/// Status of the last GFSK packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GfskPacketStatus {
    /// RSSI at sync word detection in dBm
    pub rssi_sync: i16,
    /// RSSI averaged over the packet in dBm
    pub rssi_avg: i16,
    pub rx_len_bytes: u8,
    pub is_addr_err: bool,
    pub is_crc_err: bool,
    pub is_len_err: bool,
    pub is_abort_err: bool,
    pub is_received: bool,
    pub is_sent: bool,
}

impl FromByteArray for GfskPacketStatus {
    type Error = Infallible;
    type Array = [u8; 5];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let flags = bytes[4];
        Ok(Self {
            rssi_sync: -(bytes[1] as i16) / 2,
            rssi_avg: -(bytes[2] as i16) / 2,
            rx_len_bytes: bytes[3],
            is_addr_err: flags & 0x20 != 0,
            is_crc_err: flags & 0x10 != 0,
            is_len_err: flags & 0x08 != 0,
            is_abort_err: flags & 0x04 != 0,
            is_received: flags & 0x02 != 0,
            is_sent: flags & 0x01 != 0,
        })
    }
}

/// GetPacketStatus command (0x0204), GFSK layout
#[derive(Debug, Clone)]
pub struct GetGfskPacketStatus;

impl Command for GetGfskPacketStatus {
    type IdType = u16;
    type CommandParameters = NoParameters;
    type ResponseParameters = GfskPacketStatus;

    fn id() -> Self::IdType {
        0x0204
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// Location of the last received payload in the RX buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxBufferStatus {
    pub payload_len: u8,
    pub start_pointer: u8,
}

impl FromByteArray for RxBufferStatus {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            payload_len: bytes[1],
            start_pointer: bytes[2],
        })
    }
}

/// GetRxBufferStatus command (0x0203)
#[derive(Debug, Clone)]
pub struct GetRxBufferStatus;

impl Command for GetRxBufferStatus {
    type IdType = u16;
    type CommandParameters = NoParameters;
    type ResponseParameters = RxBufferStatus;

    fn id() -> Self::IdType {
        0x0203
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_converts_millis_to_rtc_steps() {
        assert_eq!(Timeout::from_millis(1000).rtc_steps(), 32_768);
        assert_eq!(Timeout::from_millis(5000).to_bytes(), Ok([0x02, 0x80, 0x00]));
        assert_eq!(Timeout::from_millis(u32::MAX), Timeout::CONTINUOUS);
        assert_eq!(Timeout::CONTINUOUS.to_bytes(), Ok([0xFF, 0xFF, 0xFF]));
    }

    #[test]
    fn bpsk_packet_params_layout() {
        let params = BpskPacketParams {
            payload_len_bytes: 3,
            ramp_up_delay: 0x1306,
            ramp_down_delay: 0x1D70,
            payload_len_bits: 18,
        };
        assert_eq!(
            params.to_bytes(),
            Ok([0x03, 0x13, 0x06, 0x1D, 0x70, 0x00, 0x12])
        );
    }

    #[test]
    fn gfsk_modulation_params_layout() {
        let params = GfskModulationParams {
            bit_rate: 600,
            pulse_shape: GfskPulseShape::Bt1_0,
            bandwidth: GfskBandwidth::Bw4800,
            deviation: 800,
        };
        assert_eq!(
            params.to_bytes(),
            Ok([0x00, 0x00, 0x02, 0x58, 0x0B, 0x1F, 0x00, 0x00, 0x03, 0x20])
        );
    }

    #[test]
    fn gfsk_packet_params_layout() {
        let params = GfskPacketParams {
            preamble_len_bits: 16,
            preamble_detector: PreambleDetector::Min16Bits,
            sync_word_len_bits: 16,
            address_filtering: AddressFiltering::Disabled,
            header_type: HeaderType::FixedLength,
            payload_len_bytes: 15,
            crc_type: CrcType::Off,
            whitening: Whitening::Off,
        };
        assert_eq!(
            params.to_bytes(),
            Ok([0x00, 0x10, 0x05, 0x10, 0x00, 0x00, 0x0F, 0x01, 0x00])
        );
    }

    #[test]
    fn sync_word_is_left_aligned() {
        assert_eq!(
            GfskSyncWord::from_prefix(&[0xB2, 0x27]).0,
            [0xB2, 0x27, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn packet_status_decodes_rssi_and_flags() {
        let status = GfskPacketStatus::from_bytes([0x06, 0xF0, 0xC8, 0x0F, 0x02]).unwrap();
        assert_eq!(status.rssi_sync, -120);
        assert_eq!(status.rssi_avg, -100);
        assert_eq!(status.rx_len_bytes, 15);
        assert!(status.is_received);
        assert!(!status.is_crc_err);
    }

    #[test]
    fn tx_params_keep_negative_power() {
        let params = TxParams {
            power: -9,
            ramp_time: RampTime::Micros208,
        };
        assert_eq!(params.to_bytes(), Ok([0xF7, 0x0C]));
    }
}
