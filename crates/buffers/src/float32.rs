//! Single-precision narrowing utilities.

/// Narrows a double to `f32` when that loses nothing.
///
/// Returns `None` when the value overflows the single-precision range or
/// when the narrowed value differs from the original. NaN narrows to NaN.
///
/// # Example
///
/// ```
/// use cbor_pack_buffers::to_float32;
///
/// assert_eq!(to_float32(100000.0), Some(100000.0f32));
/// assert_eq!(to_float32(0.1), None);
/// assert_eq!(to_float32(1e300), None);
/// ```
pub fn to_float32(n: f64) -> Option<f32> {
    let narrowed = n as f32;
    if narrowed.is_infinite() && n.is_finite() {
        return None;
    }
    if narrowed as f64 == n || (n.is_nan() && narrowed.is_nan()) {
        Some(narrowed)
    } else {
        None
    }
}

/// Checks if a number can be exactly represented as a 32-bit floating point value.
///
/// ```
/// use cbor_pack_buffers::is_float32;
///
/// assert!(is_float32(1.0));
/// assert!(is_float32(0.25));
/// assert!(!is_float32(0.1));  // 0.1 cannot be exactly represented in f32
/// ```
pub fn is_float32(n: f64) -> bool {
    to_float32(n).is_some()
}
