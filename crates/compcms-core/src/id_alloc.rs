//! Unique id allocation for profiles and transforms
//!
//! Ids live in 32-bit buckets, one bit per id. Id 0 is never handed out.

use tracing::trace;

#[derive(Debug)]
pub struct IdAllocator {
    buckets: Vec<u32>,
    lowest_free_bucket: usize,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        // Two buckets to start, id 0 taken.
        Self {
            buckets: vec![1, 0],
            lowest_free_bucket: 0,
        }
    }

    /// Take the lowest free id
    pub fn get_id(&mut self) -> u32 {
        let index = self.lowest_free_bucket;
        let bucket = &mut self.buckets[index];
        assert_ne!(*bucket, u32::MAX, "lowest free bucket is full");

        let bit = bucket.trailing_ones();
        *bucket |= 1 << bit;
        let id = 32 * index as u32 + bit;

        if *bucket == u32::MAX {
            self.update_lowest_free_bucket();
        }

        trace!(id, "allocated id");
        id
    }

    /// Return `id` to the pool. Releasing 0 or a free id is a bug.
    pub fn put_id(&mut self, id: u32) {
        assert_ne!(id, 0, "id 0 is reserved");

        let index = (id / 32) as usize;
        let bit = id % 32;
        assert!(index < self.buckets.len(), "id {} was never allocated", id);

        let bucket = &mut self.buckets[index];
        assert!(*bucket & (1 << bit) != 0, "id {} is not allocated", id);

        *bucket &= !(1 << bit);
        self.lowest_free_bucket = self.lowest_free_bucket.min(index);
    }

    fn update_lowest_free_bucket(&mut self) {
        if let Some(offset) = self.buckets[self.lowest_free_bucket..]
            .iter()
            .position(|&b| b != u32::MAX)
        {
            self.lowest_free_bucket += offset;
            return;
        }

        self.lowest_free_bucket = self.buckets.len();
        let grown = self.buckets.len() * 2;
        self.buckets.resize(grown, 0);
    }
}

impl Drop for IdAllocator {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            assert!(self.buckets[0] & 1 != 0, "id 0 must stay reserved");
        }
    }
}
