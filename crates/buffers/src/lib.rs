//! Binary buffer utilities for cbor-pack.
//!
//! # Overview
//!
//! - [`Writer`] - Writes binary data to an auto-growing buffer
//! - [`encode_f16`] / [`decode_f16`] - IEEE 754 half-precision conversion
//! - [`to_float32`] / [`is_float32`] - Exact single-precision narrowing
//! - [`cmp_canonical`] - Length-first byte-string ordering
//!
//! # Example
//!
//! ```
//! use cbor_pack_buffers::{decode_f16, encode_f16, Writer};
//!
//! let half = encode_f16(2.5).unwrap();
//! assert_eq!(decode_f16(half), 2.5);
//!
//! let mut writer = Writer::new();
//! writer.u8u16(0xf9, half);
//! assert_eq!(writer.flush(), [0xf9, 0x41, 0x00]);
//! ```

mod cmp;
mod f16;
mod float32;
mod writer;

pub use cmp::{cmp_canonical, is_canonically_sorted};
pub use f16::{decode_f16, encode_f16};
pub use float32::{is_float32, to_float32};
pub use writer::Writer;
