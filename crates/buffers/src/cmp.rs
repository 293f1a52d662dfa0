//! Byte slice comparison utilities.

use std::cmp::Ordering;

/// Compares two byte slices, first by length, then by each byte.
///
/// This is the ordering canonical CBOR uses for map keys and set members.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use cbor_pack_buffers::cmp_canonical;
///
/// assert_eq!(cmp_canonical(&[0xff], &[0x00, 0x00]), Ordering::Less);
/// assert_eq!(cmp_canonical(&[1, 2, 3], &[1, 2, 3]), Ordering::Equal);
/// assert_eq!(cmp_canonical(&[1, 3], &[1, 2]), Ordering::Greater);
/// ```
pub fn cmp_canonical(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Returns `true` if the slices appear in non-decreasing canonical order.
pub fn is_canonically_sorted<T: AsRef<[u8]>>(items: &[T]) -> bool {
    items
        .windows(2)
        .all(|pair| cmp_canonical(pair[0].as_ref(), pair[1].as_ref()) != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_canonical() {
        assert_eq!(cmp_canonical(&[], &[]), Ordering::Equal);
        assert_eq!(cmp_canonical(&[1, 2], &[1, 2, 3]), Ordering::Less);
        assert_eq!(cmp_canonical(&[1, 2, 3], &[1, 2]), Ordering::Greater);
        assert_eq!(cmp_canonical(&[1, 2, 3], &[1, 3, 2]), Ordering::Less);
    }

    #[test]
    fn test_is_canonically_sorted() {
        assert!(is_canonically_sorted::<Vec<u8>>(&[]));
        assert!(is_canonically_sorted(&[vec![9], vec![1, 1], vec![1, 2]]));
        assert!(!is_canonically_sorted(&[vec![1, 1], vec![9]]));
    }
}
