//! Framing, numbers, strings and the fixed-byte tokens.

use cbor_pack_buffers::{decode_f16, encode_f16, to_float32};
use malachite::base::num::conversion::traits::PowerOf2Digits;
use malachite::{Integer, Natural};

use super::Encoder;
use crate::constants::*;
use crate::types::SimpleValue;

/// Half-precision pattern for NaN and the infinities, which use the
/// two-byte form in every mode.
fn non_finite_f16(value: f64) -> Option<u16> {
    if value.is_nan() {
        Some(F16_NAN)
    } else if value == f64::INFINITY {
        Some(F16_INFINITY)
    } else if value == f64::NEG_INFINITY {
        Some(F16_NEG_INFINITY)
    } else {
        None
    }
}

/// Minimal big-endian bytes of a non-negative integer.
fn magnitude_bytes(magnitude: &Integer) -> Vec<u8> {
    match Natural::try_from(magnitude) {
        Ok(natural) => PowerOf2Digits::<u8>::to_power_of_2_digits_desc(&natural, 8),
        Err(_) => Vec::new(),
    }
}

impl Encoder<'_> {
    /// Writes a major type and its argument, using the shortest of the
    /// immediate, 1, 2, 4 and 8 byte forms.
    pub fn encode_length(&mut self, major: u8, length: u64) {
        let head = major << 5;
        if length < 24 {
            self.writer.u8(head | length as u8);
        } else if length <= 0xff {
            self.writer.u8(head | MINOR_U8);
            self.writer.u8(length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(head | MINOR_U16, length as u16);
        } else if length <= 0xffff_ffff {
            self.writer.u8u32(head | MINOR_U32, length as u32);
        } else {
            self.writer.u8u64(head | MINOR_U64, length);
        }
    }

    pub fn encode_int(&mut self, value: i64) {
        if value >= 0 {
            self.encode_length(MAJOR_UIN, value as u64);
        } else {
            self.encode_length(MAJOR_NIN, (-1 - value) as u64);
        }
    }

    pub fn encode_uint(&mut self, value: u64) {
        self.encode_length(MAJOR_UIN, value);
    }

    /// Integers that fit major types 0 and 1 use them; anything wider
    /// becomes a tag 2 / tag 3 bignum over a byte string.
    pub fn encode_big_int(&mut self, value: &Integer) {
        let (major, tag, magnitude) = if *value >= Integer::from(0) {
            (MAJOR_UIN, TAG_POSITIVE_BIGNUM, value.clone())
        } else {
            (MAJOR_NIN, TAG_NEGATIVE_BIGNUM, -(value + Integer::from(1)))
        };
        if let Ok(small) = u64::try_from(&magnitude) {
            self.encode_length(major, small);
            return;
        }
        self.encode_length(MAJOR_TAG, tag);
        let bytes = magnitude_bytes(&magnitude);
        self.encode_bytes(&bytes);
    }

    /// Writes a double-precision float.
    pub fn encode_float(&mut self, value: f64) {
        match non_finite_f16(value) {
            Some(bits) => self.writer.u8u16(CBOR_F16, bits),
            None => self.writer.u8f64(CBOR_F64, value),
        }
    }

    /// Writes the narrowest of half, single and double precision that
    /// holds `value` exactly.
    pub fn encode_minimal_float(&mut self, value: f64) {
        if let Some(bits) = non_finite_f16(value) {
            self.writer.u8u16(CBOR_F16, bits);
            return;
        }
        if let Some(half) = encode_f16(value) {
            if decode_f16(half) == value {
                self.writer.u8u16(CBOR_F16, half);
                return;
            }
        }
        match to_float32(value) {
            Some(single) => self.writer.u8f32(CBOR_F32, single),
            None => self.writer.u8f64(CBOR_F64, value),
        }
    }

    pub(crate) fn encode_float_value(&mut self, value: f64) {
        if self.options.canonical {
            self.encode_minimal_float(value);
        } else {
            self.encode_float(value);
        }
    }

    pub fn encode_bool(&mut self, value: bool) {
        self.writer.u8(if value { CBOR_TRUE } else { CBOR_FALSE });
    }

    pub fn encode_null(&mut self) {
        self.writer.u8(CBOR_NULL);
    }

    pub fn encode_undefined(&mut self) {
        self.writer.u8(CBOR_UNDEFINED);
    }

    pub fn encode_simple_value(&mut self, value: SimpleValue) {
        self.encode_length(MAJOR_TKN, u64::from(value.value()));
    }

    pub fn encode_bytes(&mut self, bytes: &[u8]) {
        if self.string_referencing {
            if let Some(index) = self.strings.bytes_ref(bytes) {
                self.encode_stringref(index);
                return;
            }
        }
        self.encode_length(MAJOR_BIN, bytes.len() as u64);
        self.writer.buf(bytes);
    }

    pub fn encode_str(&mut self, s: &str) {
        if self.string_referencing {
            if let Some(index) = self.strings.text_ref(s) {
                self.encode_stringref(index);
                return;
            }
        }
        self.encode_length(MAJOR_STR, s.len() as u64);
        self.writer.utf8(s);
    }

    fn encode_stringref(&mut self, index: u64) {
        self.encode_length(MAJOR_TAG, TAG_STRINGREF);
        self.encode_uint(index);
    }
}
