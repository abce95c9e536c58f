use super::History;

/// Ring buffer holding the trailing `window_size` bytes of a stream
///
/// Physical storage is rounded up to a power of two so positions map to
/// slots with a mask. Logical positions keep increasing after the ring wraps.
pub struct SlidingWindow {
    buffer: Box<[u8]>,
    mask: usize,
    /// Reachable span for back-references (W)
    window_size: usize,
    /// Total bytes ever written
    total_written: usize,
}

impl SlidingWindow {
    pub fn new(window_size: usize) -> Self {
        let capacity = window_size.max(1).next_power_of_two();
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            mask: capacity - 1,
            window_size: window_size.max(1),
            total_written: 0,
        }
    }

    /// Add a single byte to the window
    #[inline]
    pub fn push_byte(&mut self, byte: u8) {
        self.buffer[self.total_written & self.mask] = byte;
        self.total_written += 1;
    }

    /// Add multiple bytes to the window
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push_byte(b);
        }
    }

    /// Append `length` bytes from `distance` back, handing each produced byte to `f`.
    ///
    /// Bytes are read one at a time from the ring as it is being written,
    /// so `length` may exceed `distance`.
    #[inline]
    pub fn replay_with<F: FnMut(u8)>(&mut self, distance: usize, length: usize, mut f: F) {
        debug_assert!(distance >= 1 && distance <= self.reachable());

        for _ in 0..length {
            let byte = self.buffer[(self.total_written - distance) & self.mask];
            self.push_byte(byte);
            f(byte);
        }
    }

    /// Configured reachable span
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Physical ring size
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Reset the window
    pub fn clear(&mut self) {
        self.total_written = 0;
    }
}

impl History for SlidingWindow {
    fn position(&self) -> usize {
        self.total_written
    }

    fn reachable(&self) -> usize {
        self.total_written.min(self.window_size)
    }

    fn get(&self, pos: usize) -> Option<u8> {
        if pos >= self.total_written || self.total_written - pos > self.buffer.len() {
            return None;
        }
        Some(self.buffer[pos & self.mask])
    }

    fn extend_bytes(&mut self, bytes: &[u8]) {
        self.push_bytes(bytes);
    }

    fn replay(&mut self, distance: usize, length: usize) {
        self.replay_with(distance, length, |_| {});
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_basic() {
        let mut window = SlidingWindow::new(16);
        window.push_bytes(b"ABC");

        assert_eq!(window.position(), 3);
        assert_eq!(window.get(0), Some(b'A'));
        assert_eq!(window.get(2), Some(b'C'));
        assert_eq!(window.get(3), None);
    }

    #[test]
    fn test_window_rle() {
        let mut window = SlidingWindow::new(16);
        window.push_byte(b'A');

        let mut produced = Vec::new();
        window.replay_with(1, 5, |b| produced.push(b));
        assert_eq!(produced, b"AAAAA");
        assert_eq!(window.position(), 6);
    }

    #[test]
    fn test_window_rle_pattern() {
        let mut window = SlidingWindow::new(16);
        window.push_bytes(b"AB");

        let mut produced = Vec::new();
        window.replay_with(2, 6, |b| produced.push(b));
        assert_eq!(produced, b"ABABAB");
    }

    #[test]
    fn test_window_wrap() {
        let mut window = SlidingWindow::new(32768);

        for i in 0..40000u32 {
            window.push_byte((i & 0xFF) as u8);
        }

        assert_eq!(window.reachable(), 32768);
        assert_eq!(window.position(), 40000);
        // Most recent byte is (39999 & 0xFF) = 63
        assert_eq!(window.get(39999), Some(63));
        // Scrolled out of the ring
        assert_eq!(window.get(0), None);
    }

    #[test]
    fn test_non_power_of_two_window() {
        let mut window = SlidingWindow::new(100);
        assert_eq!(window.capacity(), 128);
        assert_eq!(window.window_size(), 100);

        window.push_bytes(&[7u8; 150]);
        assert_eq!(window.reachable(), 100);
        // Still physically retained even though past the reachable span
        assert_eq!(window.get(30), Some(7));
        assert_eq!(window.get(10), None);
    }

    #[test]
    fn test_clear() {
        let mut window = SlidingWindow::new(8);
        window.push_bytes(b"xyz");
        window.clear();
        assert_eq!(window.position(), 0);
        assert_eq!(window.reachable(), 0);
    }
}
