#![doc = r#"
The variable-length quantity codec.

Delta-times and meta-event payload lengths are stored as big-endian 7-bit
groups, most significant group first. Every byte except the last carries a
continuation marker in its top bit. Four bytes is the widest quantity a
standard file may contain, so values are capped at 2^28 - 1.
"#]

use crate::{DecodeError, DecodeResult};

/// The largest value a four-byte variable-length quantity can carry.
pub const MAX: u32 = 0x0FFF_FFFF;

/// Encodes `value` as a variable-length quantity.
///
/// `encode(0)` yields a single zero byte. Values above [`MAX`] fail with
/// [`DecodeError::ValueOutOfRange`].
pub fn encode(value: u32) -> DecodeResult<Vec<u8>> {
    if value > MAX {
        return Err(DecodeError::ValueOutOfRange(value));
    }
    let mut out = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest != 0 {
        out.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    out.reverse();
    Ok(out)
}

/// Decodes the variable-length quantity at the front of `bytes`.
///
/// Returns the value and the unconsumed remainder of the slice. Fails with
/// [`DecodeError::TruncatedInput`] if the slice ends before a terminating
/// byte (top bit clear) is found, and [`DecodeError::ValueOutOfRange`] if a
/// fifth continuation byte shows up.
pub fn decode(bytes: &[u8]) -> DecodeResult<(u32, &[u8])> {
    let mut value: u32 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if i == 4 {
            return Err(DecodeError::ValueOutOfRange(value));
        }
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((value, &bytes[i + 1..]));
        }
    }
    Err(DecodeError::TruncatedInput("variable-length quantity"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips() {
        for value in [0, 1, 127, 128, 16383, 16384, 2097151, 2097152, MAX] {
            let encoded = encode(value).unwrap();
            assert_eq!(decode(&encoded).unwrap(), (value, &[][..]));
        }
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0).unwrap(), vec![0x00]);
        assert_eq!(encode(127).unwrap(), vec![0x7F]);
        assert_eq!(encode(128).unwrap(), vec![0x81, 0x00]);
        assert_eq!(encode(16383).unwrap(), vec![0xFF, 0x7F]);
        assert_eq!(encode(MAX).unwrap(), vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn leaves_the_remainder() {
        let (value, rest) = decode(&[0x81, 0x00, 0x90, 0x3C]).unwrap();
        assert_eq!(value, 128);
        assert_eq!(rest, &[0x90, 0x3C]);
    }

    #[test]
    fn rejects_oversized_values() {
        assert_eq!(encode(MAX + 1), Err(DecodeError::ValueOutOfRange(MAX + 1)));
    }

    #[test]
    fn rejects_missing_terminator() {
        assert_eq!(
            decode(&[0x81, 0x80]),
            Err(DecodeError::TruncatedInput("variable-length quantity"))
        );
        assert_eq!(
            decode(&[]),
            Err(DecodeError::TruncatedInput("variable-length quantity"))
        );
    }

    #[test]
    fn rejects_a_fifth_byte() {
        assert!(matches!(
            decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]),
            Err(DecodeError::ValueOutOfRange(_))
        ));
    }
}
