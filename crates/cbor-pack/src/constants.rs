//! CBOR wire constants.

// MAJOR type values (bits 7-5 of the initial byte)
pub const MAJOR_UIN: u8 = 0b000;
pub const MAJOR_NIN: u8 = 0b001;
pub const MAJOR_BIN: u8 = 0b010;
pub const MAJOR_STR: u8 = 0b011;
pub const MAJOR_ARR: u8 = 0b100;
pub const MAJOR_MAP: u8 = 0b101;
pub const MAJOR_TAG: u8 = 0b110;
pub const MAJOR_TKN: u8 = 0b111;

// Minor values selecting the width of the argument that follows.
pub const MINOR_U8: u8 = 24;
pub const MINOR_U16: u8 = 25;
pub const MINOR_U32: u8 = 26;
pub const MINOR_U64: u8 = 27;

// Major type 7 tokens
pub const CBOR_FALSE: u8 = 0xf4;
pub const CBOR_TRUE: u8 = 0xf5;
pub const CBOR_NULL: u8 = 0xf6;
pub const CBOR_UNDEFINED: u8 = 0xf7;
pub const CBOR_F16: u8 = 0xf9;
pub const CBOR_F32: u8 = 0xfa;
pub const CBOR_F64: u8 = 0xfb;

/// Half-precision bit patterns used for non-finite floats in every mode.
pub const F16_NAN: u16 = 0x7e00;
pub const F16_INFINITY: u16 = 0x7c00;
pub const F16_NEG_INFINITY: u16 = 0xfc00;

// Semantic tag numbers
pub const TAG_DATETIME_STRING: u64 = 0;
pub const TAG_EPOCH_DATETIME: u64 = 1;
pub const TAG_POSITIVE_BIGNUM: u64 = 2;
pub const TAG_NEGATIVE_BIGNUM: u64 = 3;
pub const TAG_DECIMAL_FRACTION: u64 = 4;
pub const TAG_STRINGREF: u64 = 25;
pub const TAG_SHAREABLE: u64 = 28;
pub const TAG_SHAREDREF: u64 = 29;
pub const TAG_RATIONAL: u64 = 30;
pub const TAG_REGEXP: u64 = 35;
pub const TAG_MIME: u64 = 36;
pub const TAG_UUID: u64 = 37;
pub const TAG_EPOCH_DATE: u64 = 100;
pub const TAG_STRINGREF_NAMESPACE: u64 = 256;
pub const TAG_SET: u64 = 258;
pub const TAG_IP_ADDRESS: u64 = 260;
pub const TAG_IP_NETWORK: u64 = 261;
pub const TAG_DATE_STRING: u64 = 1004;

/// Day number of 1970-01-01 counted from 0001-01-01 as day 1.
pub const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;
