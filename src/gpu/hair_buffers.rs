//! GPU storage for the records a hair simulation pass reads.
//!
//! One bind group carries everything:
//!
//! | binding | contents                  | type              |
//! |---------|---------------------------|-------------------|
//! | 0       | `array<StrandIndex>`      | storage, read     |
//! | 1       | `array<CapsuleCollider>`  | storage, read     |
//! | 2       | `array<SphereCollider>`   | storage, read     |
//! | 3       | `ColliderCounts`          | uniform           |
//!
//! Collider buffers never shrink, so shaders must bound their loops by
//! `ColliderCounts` rather than `arrayLength`.

use std::mem::size_of;

use wgpu::util::DeviceExt;

use super::dynamic_buffer::TypedBuffer;
use crate::collider::{CapsuleCollider, ColliderCounts, ColliderSet, SphereCollider};
use crate::options::GpuOptions;
use crate::strand::{StrandIndex, StrandLayout};

/// Stages that may read the hair simulation bind group.
const VISIBILITY: wgpu::ShaderStages =
    wgpu::ShaderStages::COMPUTE.union(wgpu::ShaderStages::VERTEX);

/// Compute/vertex-visible read-only storage buffer binding.
fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: VISIBILITY,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Compute/vertex-visible uniform buffer binding.
fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: VISIBILITY,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Strand index, collider and collider-count buffers plus their bind group.
///
/// All simulation pipelines reference [`HairSimBuffers::layout`] at creation
/// time and bind [`HairSimBuffers::bind_group`] at dispatch time. The bind
/// group is rebuilt whenever an upload reallocates a buffer, so it must be
/// re-fetched after every upload.
pub struct HairSimBuffers {
    strand_indices: TypedBuffer<StrandIndex>,
    capsules: TypedBuffer<CapsuleCollider>,
    spheres: TypedBuffer<SphereCollider>,
    counts: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl HairSimBuffers {
    /// Empty buffers sized by `options`.
    #[must_use]
    pub fn new(device: &wgpu::Device, options: &GpuOptions) -> Self {
        let storage = wgpu::BufferUsages::STORAGE;
        let strand_indices = TypedBuffer::with_capacity(
            device,
            "Strand Index Buffer",
            options.initial_strand_capacity,
            storage,
        );
        let capsules = TypedBuffer::with_capacity(
            device,
            "Capsule Collider Buffer",
            options.initial_collider_capacity,
            storage,
        );
        let spheres = TypedBuffer::with_capacity(
            device,
            "Sphere Collider Buffer",
            options.initial_collider_capacity,
            storage,
        );
        let counts =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Collider Counts Buffer"),
                contents: bytemuck::bytes_of(&ColliderCounts::default()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Hair Sim Bind Group Layout"),
                entries: &[
                    storage_entry(0),
                    storage_entry(1),
                    storage_entry(2),
                    uniform_entry(3),
                ],
            });

        let bind_group = Self::create_bind_group(
            device,
            &layout,
            &strand_indices,
            &capsules,
            &spheres,
            &counts,
        );

        Self {
            strand_indices,
            capsules,
            spheres,
            counts,
            layout,
            bind_group,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        strand_indices: &TypedBuffer<StrandIndex>,
        capsules: &TypedBuffer<CapsuleCollider>,
        spheres: &TypedBuffer<SphereCollider>,
        counts: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Hair Sim Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: strand_indices.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: capsules.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: spheres.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: counts.as_entire_binding(),
                },
            ],
        })
    }

    fn rebuild_bind_group(&mut self, device: &wgpu::Device) {
        self.bind_group = Self::create_bind_group(
            device,
            &self.layout,
            &self.strand_indices,
            &self.capsules,
            &self.spheres,
            &self.counts,
        );
    }

    /// Upload the per-vertex records of `layout`.
    ///
    /// Returns `true` if the bind group was rebuilt.
    pub fn upload_strands(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &StrandLayout,
    ) -> bool {
        let records = layout.strand_indices();
        let reallocated = self.strand_indices.write(device, queue, &records);
        if reallocated {
            self.rebuild_bind_group(device);
        }
        reallocated
    }

    /// Upload colliders and their counts, typically once per frame.
    ///
    /// Returns `true` if the bind group was rebuilt.
    pub fn upload_colliders(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        colliders: &ColliderSet,
    ) -> bool {
        let capsules_grew =
            self.capsules.write(device, queue, colliders.capsules());
        let spheres_grew = self.spheres.write(device, queue, colliders.spheres());
        queue.write_buffer(
            &self.counts,
            0,
            bytemuck::bytes_of(&colliders.counts()),
        );

        let reallocated = capsules_grew || spheres_grew;
        if reallocated {
            self.rebuild_bind_group(device);
        }
        reallocated
    }

    /// Bind group layout for pipeline creation.
    #[must_use]
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Bind group for dispatch; changes after a reallocating upload.
    #[must_use]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Number of strand vertices uploaded.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.strand_indices.count()
    }

    /// GPU buffer sizes: `(label, used_bytes, allocated_bytes)`.
    #[must_use]
    pub fn buffer_info(&self) -> Vec<(&'static str, usize, usize)> {
        let counts_bytes = size_of::<ColliderCounts>();
        let info = |label, (used, allocated)| (label, used, allocated);
        vec![
            info("Strand Index", self.strand_indices.byte_usage()),
            info("Capsule Collider", self.capsules.byte_usage()),
            info("Sphere Collider", self.spheres.byte_usage()),
            ("Collider Counts", counts_bytes, counts_bytes),
        ]
    }
}
