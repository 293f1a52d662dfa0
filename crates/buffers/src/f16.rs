//! Half-precision (16-bit) floating point utilities.

/// Encodes a double as an IEEE 754 half-precision bit pattern.
///
/// Rounds to nearest, ties to even. Returns `None` when the rounded
/// magnitude does not fit the half-precision range (the value would turn
/// into an infinity). Values below the smallest subnormal round to a signed
/// zero. NaN becomes the quiet NaN `0x7e00` with the sign preserved.
///
/// # Example
///
/// ```
/// use cbor_pack_buffers::encode_f16;
///
/// assert_eq!(encode_f16(1.0), Some(0x3C00));
/// assert_eq!(encode_f16(-2.0), Some(0xC000));
/// assert_eq!(encode_f16(65504.0), Some(0x7BFF));
/// assert_eq!(encode_f16(65520.0), None);
/// ```
pub fn encode_f16(value: f64) -> Option<u16> {
    let bits = value.to_bits();
    let sign = ((bits >> 48) & 0x8000) as u16;
    if value.is_nan() {
        return Some(sign | 0x7E00);
    }
    if value.is_infinite() {
        return Some(sign | 0x7C00);
    }
    let exponent = ((bits >> 52) & 0x7FF) as i32;
    if exponent == 0 {
        // Zero, or a double subnormal far below the half range.
        return Some(sign);
    }
    let unbiased = exponent - 1023;
    if unbiased > 15 {
        return None;
    }
    let significand = (bits & 0x000F_FFFF_FFFF_FFFF) | (1 << 52);
    let (normal, shift) = if unbiased >= -14 {
        (true, 42u32)
    } else {
        (false, (28 - unbiased) as u32)
    };
    if shift > 63 {
        return Some(sign);
    }
    let mut rounded = significand >> shift;
    let remainder = significand & ((1u64 << shift) - 1);
    let halfway = 1u64 << (shift - 1);
    if remainder > halfway || (remainder == halfway && rounded & 1 == 1) {
        rounded += 1;
    }
    let encoded = if normal {
        (((unbiased + 15) as u64) << 10) + rounded - 1024
    } else {
        rounded
    };
    if encoded >= 0x7C00 {
        return None;
    }
    Some(sign | encoded as u16)
}

/// Decodes a half-precision (16-bit) floating point value.
///
/// The input is the raw binary representation (u16) of an IEEE 754 half-precision float.
///
/// # Example
///
/// ```
/// use cbor_pack_buffers::decode_f16;
///
/// // Positive zero
/// assert_eq!(decode_f16(0x0000), 0.0);
///
/// // One
/// assert_eq!(decode_f16(0x3C00), 1.0);
///
/// // Negative infinity
/// assert!(decode_f16(0xFC00).is_infinite() && decode_f16(0xFC00).is_sign_negative());
///
/// // NaN
/// assert!(decode_f16(0x7C01).is_nan());
/// ```
pub fn decode_f16(binary: u16) -> f64 {
    let exponent = ((binary & 0x7C00) >> 10) as i32;
    let fraction = (binary & 0x03FF) as f64;
    let sign = if (binary >> 15) & 1 == 1 { -1.0 } else { 1.0 };

    if exponent == 0 {
        // Subnormal or zero
        sign * 6.103515625e-5 * (fraction / 1024.0)
    } else if exponent == 0x1F {
        if fraction != 0.0 {
            f64::NAN
        } else {
            sign * f64::INFINITY
        }
    } else {
        sign * 2f64.powi(exponent - 15) * (1.0 + fraction / 1024.0)
    }
}
