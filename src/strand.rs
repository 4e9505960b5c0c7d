//! Per-vertex strand index records and the strand layout that generates them.
//!
//! Every simulated vertex carries a [`StrandIndex`] telling the shader which
//! strand it belongs to, where it sits inside that strand, and how long the
//! strand is. [`StrandLayout`] is the host-side table of per-strand vertex
//! counts those records are generated from (and rebuilt from when a record
//! array is read back).

use std::mem::offset_of;
use std::ops::Range;

use crate::error::TressFxError;
use crate::interop::{FieldOffset, GpuRecord};

/// Fewest vertices a strand may have (one segment).
pub const MIN_VERTICES_PER_STRAND: usize = 2;

/// Indexes one vertex to its hair strand.
/// Must match the WGSL `StrandIndex` struct layout exactly.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct StrandIndex {
    /// Index of this vertex within its strand, 0-based.
    pub vertex_in_strand_id: i32,
    /// Identifier of the owning strand.
    pub hair_id: i32,
    /// Total vertex count of the owning strand.
    pub vertex_count_in_strand: i32,
}

impl StrandIndex {
    /// Record with the given fields, unchecked.
    #[must_use]
    pub const fn new(
        vertex_in_strand_id: i32,
        hair_id: i32,
        vertex_count_in_strand: i32,
    ) -> Self {
        Self {
            vertex_in_strand_id,
            hair_id,
            vertex_count_in_strand,
        }
    }

    /// Record with the given fields, rejecting ids outside the strand.
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::InvalidStrandIndex`] (position 0) if any id is
    /// negative or `vertex_in_strand_id >= vertex_count_in_strand`.
    pub fn try_new(
        vertex_in_strand_id: i32,
        hair_id: i32,
        vertex_count_in_strand: i32,
    ) -> Result<Self, TressFxError> {
        let index =
            Self::new(vertex_in_strand_id, hair_id, vertex_count_in_strand);
        match index.check() {
            Ok(()) => Ok(index),
            Err(reason) => {
                Err(TressFxError::InvalidStrandIndex { position: 0, reason })
            }
        }
    }

    /// Whether `0 <= vertex_in_strand_id < vertex_count_in_strand` and the
    /// hair id is non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    /// First vertex of its strand (the one attached to the scalp).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.vertex_in_strand_id == 0
    }

    /// Last vertex of its strand.
    #[must_use]
    pub fn is_tip(&self) -> bool {
        self.vertex_count_in_strand.checked_sub(1)
            == Some(self.vertex_in_strand_id)
    }

    fn check(&self) -> Result<(), &'static str> {
        if self.hair_id < 0 {
            return Err("negative hair id");
        }
        if self.vertex_in_strand_id < 0 {
            return Err("negative vertex id");
        }
        if self.vertex_in_strand_id >= self.vertex_count_in_strand {
            return Err("vertex id not below the strand vertex count");
        }
        Ok(())
    }
}

impl GpuRecord for StrandIndex {
    const WGSL_NAME: &'static str = "StrandIndex";
    const KIND: u32 = 1;
    const FIELDS: &'static [FieldOffset] = &[
        FieldOffset::new(
            "vertex_in_strand_id",
            offset_of!(StrandIndex, vertex_in_strand_id),
        ),
        FieldOffset::new("hair_id", offset_of!(StrandIndex, hair_id)),
        FieldOffset::new(
            "vertex_count_in_strand",
            offset_of!(StrandIndex, vertex_count_in_strand),
        ),
    ];
}

/// Vertex counts of every strand, in hair id order.
///
/// Global vertex ids are assigned strand by strand: strand `h` owns the
/// contiguous range [`StrandLayout::strand_range`]`(h)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrandLayout {
    /// `offsets[h]` is the first global vertex of strand `h`;
    /// `offsets[hair_count]` is the total vertex count.
    offsets: Vec<usize>,
}

impl Default for StrandLayout {
    fn default() -> Self {
        Self { offsets: vec![0] }
    }
}

impl StrandLayout {
    /// Layout from per-strand vertex counts.
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::StrandTooShort`] for a strand with fewer than
    /// [`MIN_VERTICES_PER_STRAND`] vertices and
    /// [`TressFxError::TooManyVertices`] if the totals overflow `i32`.
    pub fn from_vertex_counts<I>(counts: I) -> Result<Self, TressFxError>
    where
        I: IntoIterator<Item = usize>,
    {
        // Grows as strands validate; the iterator's hint is not trusted.
        let mut offsets = vec![0];
        let mut total = 0usize;
        for (hair_id, vertex_count) in counts.into_iter().enumerate() {
            if vertex_count < MIN_VERTICES_PER_STRAND {
                return Err(TressFxError::StrandTooShort {
                    hair_id,
                    vertex_count,
                });
            }
            total = total
                .checked_add(vertex_count)
                .filter(|&t| t <= i32::MAX as usize)
                .ok_or_else(|| {
                    TressFxError::TooManyVertices(
                        total.saturating_add(vertex_count),
                    )
                })?;
            offsets.push(total);
        }
        log::debug!(
            "strand layout: {} strands, {} vertices",
            offsets.len() - 1,
            total
        );
        Ok(Self { offsets })
    }

    /// Layout of `hair_count` strands with the same vertex count each.
    ///
    /// # Errors
    ///
    /// Same as [`StrandLayout::from_vertex_counts`].
    pub fn uniform(
        hair_count: usize,
        vertices_per_strand: usize,
    ) -> Result<Self, TressFxError> {
        if hair_count > 0 && vertices_per_strand < MIN_VERTICES_PER_STRAND {
            return Err(TressFxError::StrandTooShort {
                hair_id: 0,
                vertex_count: vertices_per_strand,
            });
        }
        if hair_count.saturating_mul(vertices_per_strand) > i32::MAX as usize
        {
            return Err(TressFxError::TooManyVertices(
                hair_count.saturating_mul(vertices_per_strand),
            ));
        }
        Self::from_vertex_counts(std::iter::repeat_n(
            vertices_per_strand,
            hair_count,
        ))
    }

    /// Rebuild a layout from a flat record array in global vertex order.
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::InvalidStrandIndex`] naming the first record
    /// that breaks the layout: hair ids must start at 0 and grow by one per
    /// strand, vertex ids must run `0..count` inside each strand, and every
    /// record of a strand must carry the same count.
    pub fn from_strand_indices(
        indices: &[StrandIndex],
    ) -> Result<Self, TressFxError> {
        let invalid = |position, reason| TressFxError::InvalidStrandIndex {
            position,
            reason,
        };

        let mut counts = Vec::new();
        let mut position = 0;
        while position < indices.len() {
            let root = indices[position];
            root.check().map_err(|reason| invalid(position, reason))?;
            if root.hair_id as usize != counts.len() {
                return Err(invalid(position, "hair ids are not sequential"));
            }
            if !root.is_root() {
                return Err(invalid(position, "strand does not start at vertex 0"));
            }

            let count = root.vertex_count_in_strand as usize;
            if count < MIN_VERTICES_PER_STRAND {
                return Err(invalid(position, "strand has fewer than 2 vertices"));
            }
            if position + count > indices.len() {
                return Err(invalid(position, "strand runs past the end"));
            }
            for (offset, index) in
                indices[position..position + count].iter().enumerate()
            {
                if index.hair_id != root.hair_id
                    || index.vertex_count_in_strand != root.vertex_count_in_strand
                {
                    return Err(invalid(
                        position + offset,
                        "strand record disagrees with its root",
                    ));
                }
                if index.vertex_in_strand_id as usize != offset {
                    return Err(invalid(
                        position + offset,
                        "vertex ids are not sequential",
                    ));
                }
            }
            counts.push(count);
            position += count;
        }

        Self::from_vertex_counts(counts)
    }

    /// Number of strands.
    #[must_use]
    pub fn hair_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Total number of vertices across all strands.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Whether the layout holds no strands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hair_count() == 0
    }

    /// Vertex count of strand `hair_id`, `None` if out of range.
    #[must_use]
    pub fn vertex_count_in_strand(&self, hair_id: usize) -> Option<usize> {
        self.strand_range(hair_id).map(|r| r.len())
    }

    /// Global vertex range owned by strand `hair_id`.
    #[must_use]
    pub fn strand_range(&self, hair_id: usize) -> Option<Range<usize>> {
        let start = *self.offsets.get(hair_id)?;
        let end = *self.offsets.get(hair_id + 1)?;
        Some(start..end)
    }

    /// Record of global vertex `vertex`, `None` if out of range.
    #[must_use]
    pub fn strand_index_of(&self, vertex: usize) -> Option<StrandIndex> {
        if vertex >= self.vertex_count() {
            return None;
        }
        // First offset strictly greater than `vertex`, minus one.
        let hair_id = self.offsets.partition_point(|&o| o <= vertex) - 1;
        let start = self.offsets[hair_id];
        let count = self.offsets[hair_id + 1] - start;
        Some(StrandIndex::new(
            (vertex - start) as i32,
            hair_id as i32,
            count as i32,
        ))
    }

    /// Iterate the records of every vertex in global vertex order.
    pub fn iter(&self) -> impl Iterator<Item = StrandIndex> + '_ {
        self.offsets.windows(2).enumerate().flat_map(|(hair_id, w)| {
            let count = (w[1] - w[0]) as i32;
            (0..count).map(move |v| StrandIndex::new(v, hair_id as i32, count))
        })
    }

    /// Flat per-vertex record array, ready for upload.
    #[must_use]
    pub fn strand_indices(&self) -> Vec<StrandIndex> {
        let mut out = Vec::with_capacity(self.vertex_count());
        out.extend(self.iter());
        out
    }
}
