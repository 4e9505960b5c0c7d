//! Dynamic GPU buffer management with automatic resizing
//!
//! Record arrays change length whenever strands or colliders are added, so
//! their buffers grow with a 2x strategy and are never shrunk.

use std::marker::PhantomData;
use std::mem::size_of;

/// Smallest buffer ever allocated, in bytes.
const MIN_CAPACITY: usize = 64;

/// A GPU buffer that can grow dynamically
///
/// Uses a 2x growth strategy when capacity is exceeded.
/// Never shrinks (GPU buffers cannot be resized in place).
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize, // Capacity in bytes
    len: usize,      // Current data length in bytes
    usage: wgpu::BufferUsages,
    label: String,
}

impl DynamicBuffer {
    /// Buffer with the given initial byte capacity.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = initial_capacity.max(MIN_CAPACITY);
        Self {
            buffer: Self::allocate(device, label, capacity, usage),
            capacity,
            len: 0,
            usage,
            label: label.to_owned(),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Write data to buffer, growing if necessary
    ///
    /// Returns `true` if buffer was reallocated (bind groups need recreation)
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let data_bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = data_bytes.len();

        let reallocated = if needed > self.capacity {
            let new_capacity = grown_capacity(self.capacity, needed);
            log::debug!(
                "{}: growing {} -> {} bytes",
                self.label,
                self.capacity,
                new_capacity
            );
            self.buffer =
                Self::allocate(device, &self.label, new_capacity, self.usage);
            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, data_bytes);
        }
        self.len = needed;

        reallocated
    }

    /// Underlying wgpu buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Bytes written by the last [`DynamicBuffer::write`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the last write was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Capacity after growing `capacity` to hold `needed` bytes: 2x the need,
/// at least 1KB more than before.
fn grown_capacity(capacity: usize, needed: usize) -> usize {
    needed.saturating_mul(2).max(capacity + 1024)
}

/// Typed wrapper for DynamicBuffer with cleaner API
///
/// Tracks record count rather than byte length.
pub struct TypedBuffer<T> {
    inner: DynamicBuffer,
    count: usize,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Buffer with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self {
            inner: DynamicBuffer::new(
                device,
                label,
                size_of::<T>() * capacity,
                usage,
            ),
            count: 0,
            _marker: PhantomData,
        }
    }

    /// Write records to buffer, growing if necessary
    ///
    /// Returns `true` if buffer was reallocated (bind groups need recreation)
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        self.count = data.len();
        self.inner.write(device, queue, data)
    }

    /// Underlying wgpu buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        self.inner.buffer()
    }

    /// Records written by the last [`TypedBuffer::write`].
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Records that fit without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity() / size_of::<T>()
    }

    /// `(used_bytes, allocated_bytes)`.
    #[must_use]
    pub fn byte_usage(&self) -> (usize, usize) {
        (self.inner.len(), self.inner.capacity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::noop_device;
    use crate::strand::StrandIndex;

    #[test]
    fn growth_doubles_the_need() {
        assert_eq!(grown_capacity(64, 4096), 8192);
    }

    #[test]
    fn growth_adds_at_least_a_kilobyte() {
        assert_eq!(grown_capacity(1000, 1001), 2024);
    }

    #[test]
    fn write_reports_reallocation_and_never_shrinks() {
        let (device, queue) = noop_device();
        let usage = wgpu::BufferUsages::STORAGE;
        let mut buffer = DynamicBuffer::new(&device, "test", 256, usage);
        assert!(buffer.is_empty());

        assert!(!buffer.write(&device, &queue, &[0u32; 64]));
        assert_eq!((buffer.len(), buffer.capacity()), (256, 256));

        let before = buffer.buffer().clone();
        assert!(buffer.write(&device, &queue, &[0u32; 100]));
        assert_eq!(buffer.capacity(), 1280);
        assert_ne!(buffer.buffer(), &before);

        assert!(!buffer.write(&device, &queue, &[0u32; 4]));
        assert_eq!((buffer.len(), buffer.capacity()), (16, 1280));

        assert!(!buffer.write::<u32>(&device, &queue, &[]));
        assert!(buffer.is_empty());
    }

    #[test]
    fn small_requests_get_the_minimum_allocation() {
        let (device, _queue) = noop_device();
        let buffer =
            DynamicBuffer::new(&device, "tiny", 4, wgpu::BufferUsages::UNIFORM);
        assert_eq!(buffer.capacity(), MIN_CAPACITY);
    }

    #[test]
    fn typed_buffer_counts_records() {
        let (device, queue) = noop_device();
        let mut buffer = TypedBuffer::<StrandIndex>::with_capacity(
            &device,
            "strands",
            4,
            wgpu::BufferUsages::STORAGE,
        );
        // 48 bytes requested, rounded up to 64.
        assert_eq!(buffer.capacity(), 5);

        let records = [StrandIndex::new(0, 0, 2); 6];
        assert!(!buffer.write(&device, &queue, &records[..5]));
        assert!(buffer.write(&device, &queue, &records));
        assert_eq!(buffer.count(), 6);
        assert_eq!(buffer.byte_usage(), (72, 1088));
        assert_eq!(buffer.capacity(), 1088 / 12);
    }
}
