//! Uplink line coding
//!
//! The BPSK modem transmits the phase of every symbol as given. The
//! differential coding the protocol expects is applied beforehand by a
//! [`LineEncoder`].

/// Transform applied to the uplink bitstream before it is written to the
/// radio buffer.
pub trait LineEncoder {
    /// Encodes the first `bit_count` bits of `input` into `output`, MSB first.
    ///
    /// `output` must hold at least `bit_count.div_ceil(8)` bytes.
    fn encode(input: &[u8], bit_count: usize, output: &mut [u8]);

    /// Transmitted length for a payload of `payload_bits` bits.
    fn payload_len_in_bits(payload_bits: usize) -> u16;

    fn payload_len_in_bytes(payload_bits: usize) -> u8 {
        Self::payload_len_in_bits(payload_bits).div_ceil(8) as u8
    }
}

/// Differential BPSK: a `0` flips the carrier phase, a `1` keeps it.
///
/// Two extra bits are sent after the payload so the last phase transition
/// and the ramp-down are part of the frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dbpsk;

impl LineEncoder for Dbpsk {
    fn encode(input: &[u8], bit_count: usize, output: &mut [u8]) {
        let len = bit_count.div_ceil(8);
        output[..len].fill(0);

        let mut phase = false;
        for i in 0..bit_count {
            let bit = input[i / 8] & (0x80 >> (i % 8)) != 0;
            if !bit {
                phase = !phase;
            }
            if phase {
                output[i / 8] |= 0x80 >> (i % 8);
            }
        }
    }

    fn payload_len_in_bits(payload_bits: usize) -> u16 {
        (payload_bits + 2) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_toggle_every_symbol() {
        let mut out = [0xFF; 1];
        Dbpsk::encode(&[0x00], 8, &mut out);
        assert_eq!(out, [0xAA]);
    }

    #[test]
    fn ones_keep_phase() {
        let mut out = [0xFF; 1];
        Dbpsk::encode(&[0xFF], 8, &mut out);
        assert_eq!(out, [0x00]);
    }

    #[test]
    fn stop_marker_bits_are_encoded() {
        let mut out = [0; 3];
        Dbpsk::encode(&[0xAB, 0xCD, 0x80], 18, &mut out);
        assert_eq!(out, [0x67, 0xDC, 0x40]);
    }

    #[test]
    fn lengths_include_two_trailing_bits() {
        assert_eq!(Dbpsk::payload_len_in_bits(16), 18);
        assert_eq!(Dbpsk::payload_len_in_bytes(16), 3);
        assert_eq!(Dbpsk::payload_len_in_bits(208), 210);
        assert_eq!(Dbpsk::payload_len_in_bytes(208), 27);
    }
}
