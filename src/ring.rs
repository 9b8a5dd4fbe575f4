//! Fixed-capacity single-producer/single-consumer sample ring.
//!
//! Capacity is a power of two so cursors wrap with a mask instead of a division. Writes
//! never overwrite unread samples and reads never block: both truncate to what fits and
//! report how many samples actually moved, leaving the caller to account for the loss.

use crate::NoiezError;

/// Wrap-around queue of mono `f32` samples.
pub struct RingBuffer {
    data: Box<[f32]>,
    mask: usize,
    write_pos: usize,
    read_pos: usize,
    len: usize,
}

impl RingBuffer {
    /// Allocate a ring holding `capacity` samples. `capacity` must be a non-zero power of two.
    pub fn new(capacity: usize) -> Result<Self, NoiezError> {
        if !capacity.is_power_of_two() {
            return Err(NoiezError::CapacityNotPowerOfTwo(capacity));
        }
        Ok(Self {
            data: vec![0.0f32; capacity].into_boxed_slice(),
            mask: capacity - 1,
            write_pos: 0,
            read_pos: 0,
            len: 0,
        })
    }

    /// Total capacity in samples.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Samples ready for reading.
    pub fn available_read(&self) -> usize {
        self.len
    }

    /// Samples that can be written without dropping any.
    pub fn available_write(&self) -> usize {
        self.capacity() - self.len
    }

    /// Whether no samples are queued.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the ring cannot accept another sample.
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Copy as many of `samples` as fit, returning the number written.
    pub fn write(&mut self, samples: &[f32]) -> usize {
        let to_write = samples.len().min(self.available_write());
        if to_write == 0 {
            return 0;
        }

        let capacity = self.capacity();
        let first = (capacity - self.write_pos).min(to_write);
        self.data[self.write_pos..self.write_pos + first].copy_from_slice(&samples[..first]);

        let second = to_write - first;
        if second > 0 {
            self.data[..second].copy_from_slice(&samples[first..to_write]);
        }

        self.write_pos = (self.write_pos + to_write) & self.mask;
        self.len += to_write;
        to_write
    }

    /// Copy up to `out.len()` queued samples into `out`, returning the number read.
    pub fn read(&mut self, out: &mut [f32]) -> usize {
        let to_read = out.len().min(self.len);
        if to_read == 0 {
            return 0;
        }

        let capacity = self.capacity();
        let first = (capacity - self.read_pos).min(to_read);
        out[..first].copy_from_slice(&self.data[self.read_pos..self.read_pos + first]);

        let second = to_read - first;
        if second > 0 {
            out[first..to_read].copy_from_slice(&self.data[..second]);
        }

        self.read_pos = (self.read_pos + to_read) & self.mask;
        self.len -= to_read;
        to_read
    }
}
