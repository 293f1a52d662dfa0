//! Auto-growing binary buffer writer.

/// A binary buffer writer backed by a growable byte vector.
///
/// Bytes are written at cursor `x`; [`Writer::flush`] hands back everything
/// written since the previous flush and rewinds the cursor, keeping the
/// allocation for the next round.
///
/// # Example
///
/// ```
/// use cbor_pack_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x83);
/// writer.buf(&[0x01, 0x02, 0x03]);
/// assert_eq!(writer.flush(), [0x83, 0x01, 0x02, 0x03]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Writer {
    /// The underlying storage.
    pub uint8: Vec<u8>,
    /// Current cursor position.
    pub x: usize,
}

impl Writer {
    pub fn new() -> Self {
        Self::with_alloc_size(64)
    }

    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: vec![0; alloc_size],
            x: 0,
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.x
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0
    }

    /// Makes sure at least `capacity` more bytes fit after the cursor.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let required = self.x + capacity;
        if required > self.uint8.len() {
            let grown = (self.uint8.len() * 2).max(required);
            self.uint8.resize(grown, 0);
        }
    }

    /// Rewinds the cursor without releasing the allocation.
    pub fn reset(&mut self) {
        self.x = 0;
    }

    /// Returns the bytes written since the last flush and rewinds.
    pub fn flush(&mut self) -> Vec<u8> {
        let out = self.uint8[..self.x].to_vec();
        self.x = 0;
        out
    }

    pub fn u8(&mut self, value: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = value;
        self.x += 1;
    }

    pub fn u16(&mut self, value: u16) {
        self.buf(&value.to_be_bytes());
    }

    pub fn u32(&mut self, value: u32) {
        self.buf(&value.to_be_bytes());
    }

    pub fn u64(&mut self, value: u64) {
        self.buf(&value.to_be_bytes());
    }

    pub fn f32(&mut self, value: f32) {
        self.buf(&value.to_bits().to_be_bytes());
    }

    pub fn f64(&mut self, value: f64) {
        self.buf(&value.to_bits().to_be_bytes());
    }

    pub fn u8u16(&mut self, head: u8, value: u16) {
        self.ensure_capacity(3);
        self.u8(head);
        self.u16(value);
    }

    pub fn u8u32(&mut self, head: u8, value: u32) {
        self.ensure_capacity(5);
        self.u8(head);
        self.u32(value);
    }

    pub fn u8u64(&mut self, head: u8, value: u64) {
        self.ensure_capacity(9);
        self.u8(head);
        self.u64(value);
    }

    pub fn u8f32(&mut self, head: u8, value: f32) {
        self.ensure_capacity(5);
        self.u8(head);
        self.f32(value);
    }

    pub fn u8f64(&mut self, head: u8, value: f64) {
        self.ensure_capacity(9);
        self.u8(head);
        self.f64(value);
    }

    /// Copies a byte slice into the buffer.
    pub fn buf(&mut self, bytes: &[u8]) {
        let length = bytes.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(bytes);
        self.x += length;
    }

    pub fn utf8(&mut self, s: &str) {
        self.buf(s.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grows_past_initial_allocation() {
        let mut w = Writer::with_alloc_size(2);
        w.buf(&[1, 2, 3, 4, 5]);
        w.u8(6);
        assert_eq!(w.len(), 6);
        assert_eq!(w.flush(), [1, 2, 3, 4, 5, 6]);
        assert!(w.is_empty());
    }

    #[test]
    fn test_zero_alloc_size() {
        let mut w = Writer::with_alloc_size(0);
        w.u8u64(0x1b, 1);
        assert_eq!(w.flush(), [0x1b, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_big_endian_layout() {
        let mut w = Writer::new();
        w.u16(0x0102);
        w.u32(0x03040506);
        w.f32(1.0);
        assert_eq!(
            w.flush(),
            [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x3f, 0x80, 0x00, 0x00]
        );
    }

    #[test]
    fn test_reset_discards_window() {
        let mut w = Writer::new();
        w.utf8("abc");
        w.reset();
        w.utf8("z");
        assert_eq!(w.flush(), b"z");
    }
}
