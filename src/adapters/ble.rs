//! Bluetooth Heart Rate Measurement decoding
//!
//! Decodes the standard GATT Heart Rate Measurement characteristic payload.
//! Byte 0 is a flags byte; bit 0 selects an 8-bit bpm in byte 1 or a 16-bit
//! little-endian bpm in bytes 1-2. All other flag bits (sensor contact,
//! energy expended, RR intervals) are ignored here.

use uuid::{uuid, Uuid};

/// GATT Heart Rate service (0x180D)
pub const HEART_RATE_SERVICE: Uuid = uuid!("0000180d-0000-1000-8000-00805f9b34fb");

/// GATT Heart Rate Measurement characteristic (0x2A37)
pub const HEART_RATE_MEASUREMENT: Uuid = uuid!("00002a37-0000-1000-8000-00805f9b34fb");

/// Flags-byte bit selecting the 16-bit bpm format
const FLAG_HR_FORMAT_U16: u8 = 0x01;

/// Decode a Heart Rate Measurement payload to bpm.
///
/// Returns 0 for empty or truncated payloads; callers treat 0 as invalid and
/// do not forward it into the engine.
pub fn parse_heart_rate_measurement(data: &[u8]) -> u16 {
    let Some(&flags) = data.first() else {
        return 0;
    };

    if flags & FLAG_HR_FORMAT_U16 != 0 && data.len() >= 3 {
        u16::from_le_bytes([data[1], data[2]])
    } else if data.len() >= 2 {
        data[1] as u16
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_8bit_format() {
        assert_eq!(parse_heart_rate_measurement(&[0x00, 72]), 72);
        // Trailing fields (energy expended, RR intervals) ignored
        assert_eq!(parse_heart_rate_measurement(&[0x10, 95, 0x20, 0x01]), 95);
    }

    #[test]
    fn test_parse_16bit_little_endian() {
        // 0x0102 = 258
        assert_eq!(parse_heart_rate_measurement(&[0x01, 0x02, 0x01]), 258);
        assert_eq!(parse_heart_rate_measurement(&[0x01, 180, 0x00]), 180);
    }

    #[test]
    fn test_other_flag_bits_ignored() {
        // Sensor-contact bits set, format bit clear
        assert_eq!(parse_heart_rate_measurement(&[0x06, 130]), 130);
    }

    #[test]
    fn test_empty_payload_yields_zero() {
        assert_eq!(parse_heart_rate_measurement(&[]), 0);
    }

    #[test]
    fn test_truncated_payloads() {
        // Flags only, no value byte
        assert_eq!(parse_heart_rate_measurement(&[0x00]), 0);
        // 16-bit format claimed but only one value byte present: falls back
        // to the 8-bit read, matching the reference decoder
        assert_eq!(parse_heart_rate_measurement(&[0x01, 88]), 88);
    }
}
