//! GPU resource management utilities.
//!
//! Provides growable record buffers and the bind group that exposes strand
//! indices and colliders to the simulation shaders.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Strand index and collider storage buffers with their bind group.
pub mod hair_buffers;

pub use hair_buffers::HairSimBuffers;

/// Stub device and queue on wgpu's noop backend.
#[cfg(test)]
pub(crate) fn noop_device() -> (wgpu::Device, wgpu::Queue) {
    wgpu::Device::noop(&wgpu::DeviceDescriptor::default())
}
