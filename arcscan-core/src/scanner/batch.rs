//! Point batching for the console stream
//!
//! Points are held back until either a full batch has accumulated or the
//! batch interval has elapsed since the last release.

use super::point_cloud::Point3;

/// Accumulates points into batches of at most `N`
pub struct PointBatcher<const N: usize> {
    pending: heapless::Vec<Point3, N>,
    batch_size: usize,
    interval_ms: u64,
    last_release_ms: u64,
}

impl<const N: usize> PointBatcher<N> {
    /// Create a batcher releasing every `batch_size` points or `interval_ms`
    ///
    /// `batch_size` is clamped to `1..=N`.
    pub fn new(batch_size: usize, interval_ms: u64, now_ms: u64) -> Self {
        Self {
            pending: heapless::Vec::new(),
            batch_size: batch_size.clamp(1, N),
            interval_ms,
            last_release_ms: now_ms,
        }
    }

    /// Add a point, returning a batch if one is ready
    pub fn push(&mut self, point: Point3, now_ms: u64) -> Option<heapless::Vec<Point3, N>> {
        // Capacity is never reached: the batch is released at batch_size <= N
        let _ = self.pending.push(point);

        let full = self.pending.len() >= self.batch_size;
        let stale = now_ms.saturating_sub(self.last_release_ms) >= self.interval_ms;
        if full || stale {
            self.flush(now_ms)
        } else {
            None
        }
    }

    /// Release whatever is pending
    pub fn flush(&mut self, now_ms: u64) -> Option<heapless::Vec<Point3, N>> {
        if self.pending.is_empty() {
            return None;
        }
        self.last_release_ms = now_ms;
        Some(core::mem::take(&mut self.pending))
    }

    /// Points waiting for release
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
