//! Packed binary blobs holding one record array.
//!
//! A blob is a 20-byte header followed by the raw record bytes exactly as
//! they are uploaded to the GPU:
//!
//! | offset | field          | value                          |
//! |--------|----------------|--------------------------------|
//! | 0      | magic          | `b"TFXB"`                      |
//! | 4      | format version | [`FORMAT_VERSION`]             |
//! | 8      | record kind    | [`GpuRecord::KIND`]            |
//! | 12     | record stride  | `size_of::<T>()`               |
//! | 16     | record count   |                                |
//!
//! Header words are little-endian `u32`s. Record bytes are in native order,
//! which is little-endian on every target wgpu runs on.

use std::io::{self, Read, Write};
use std::mem::size_of;

use crate::error::TressFxError;
use crate::interop::GpuRecord;
use crate::strand::{StrandIndex, StrandLayout};

/// Leading bytes of every blob.
pub const MAGIC: [u8; 4] = *b"TFXB";
/// Current blob format version.
pub const FORMAT_VERSION: u32 = 1;
/// Header size in bytes.
pub const HEADER_LEN: usize = 20;

fn format_error(msg: impl Into<String>) -> TressFxError {
    TressFxError::Format(msg.into())
}

/// Write `records` as a blob.
///
/// # Errors
///
/// Returns [`TressFxError::Format`] if there are more than `u32::MAX`
/// records and [`TressFxError::Io`] if writing fails.
pub fn write_records<T: GpuRecord, W: Write>(
    writer: &mut W,
    records: &[T],
) -> Result<(), TressFxError> {
    let count = u32::try_from(records.len())
        .map_err(|_| format_error("more than u32::MAX records"))?;

    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(&MAGIC);
    let words = [FORMAT_VERSION, T::KIND, size_of::<T>() as u32, count];
    for (chunk, word) in header[4..].chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }

    writer.write_all(&header)?;
    writer.write_all(bytemuck::cast_slice(records))?;
    log::debug!("packed {count} {} records", T::WGSL_NAME);
    Ok(())
}

/// Read a blob of `T` records.
///
/// # Errors
///
/// Returns [`TressFxError::Format`] for a wrong magic or version, a blob
/// holding another record kind or stride, and a truncated payload;
/// [`TressFxError::Io`] for other read failures.
pub fn read_records<T: GpuRecord, R: Read>(
    reader: &mut R,
) -> Result<Vec<T>, TressFxError> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => format_error("truncated header"),
        _ => TressFxError::Io(e),
    })?;

    if header[..4] != MAGIC {
        return Err(format_error("not a record blob"));
    }
    let word = |i: usize| {
        let start = 4 + i * 4;
        u32::from_le_bytes([
            header[start],
            header[start + 1],
            header[start + 2],
            header[start + 3],
        ])
    };
    let (version, kind, stride, count) = (word(0), word(1), word(2), word(3));

    if version != FORMAT_VERSION {
        return Err(format_error(format!("unsupported version {version}")));
    }
    if kind != T::KIND {
        return Err(format_error(format!(
            "blob holds record kind {kind}, expected {} ({})",
            T::KIND,
            T::WGSL_NAME
        )));
    }
    if stride as usize != size_of::<T>() {
        return Err(format_error(format!(
            "record stride {stride}, expected {}",
            size_of::<T>()
        )));
    }

    let expected = u64::from(count) * u64::from(stride);
    let mut bytes = Vec::new();
    let read = reader.take(expected).read_to_end(&mut bytes)?;
    if (read as u64) < expected {
        return Err(format_error(format!(
            "payload has {read} bytes, header promises {expected}"
        )));
    }
    Ok(bytemuck::pod_collect_to_vec(&bytes))
}

/// Read a [`StrandIndex`] blob and rebuild its strand layout.
///
/// # Errors
///
/// Any [`read_records`] error, or [`TressFxError::InvalidStrandIndex`] if
/// the records do not form a consistent layout.
pub fn read_strand_layout<R: Read>(
    reader: &mut R,
) -> Result<StrandLayout, TressFxError> {
    let records = read_records::<StrandIndex, _>(reader)?;
    StrandLayout::from_strand_indices(&records)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::collider::SphereCollider;

    fn strand_blob() -> Vec<u8> {
        let layout = StrandLayout::from_vertex_counts([3, 2]).unwrap();
        let mut blob = Vec::new();
        write_records(&mut blob, &layout.strand_indices()).unwrap();
        blob
    }

    #[test]
    fn header_layout() {
        let blob = strand_blob();
        assert_eq!(blob.len(), HEADER_LEN + 5 * 12);
        assert_eq!(&blob[..4], b"TFXB");
        assert_eq!(&blob[4..8], &1u32.to_le_bytes());
        assert_eq!(&blob[8..12], &StrandIndex::KIND.to_le_bytes());
        assert_eq!(&blob[12..16], &12u32.to_le_bytes());
        assert_eq!(&blob[16..20], &5u32.to_le_bytes());
    }

    #[test]
    fn strand_layout_survives_packing() {
        let blob = strand_blob();
        let layout = read_strand_layout(&mut blob.as_slice()).unwrap();
        assert_eq!(layout, StrandLayout::from_vertex_counts([3, 2]).unwrap());
    }

    #[test]
    fn empty_blob_reads_back_empty() {
        let mut blob = Vec::new();
        write_records::<SphereCollider, _>(&mut blob, &[]).unwrap();
        assert_eq!(blob.len(), HEADER_LEN);
        let spheres = read_records::<SphereCollider, _>(&mut blob.as_slice())
            .unwrap();
        assert!(spheres.is_empty());
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let blob = strand_blob();
        let err = read_records::<SphereCollider, _>(&mut blob.as_slice())
            .unwrap_err();
        assert!(err.to_string().contains("SphereCollider"));
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let blob = strand_blob();
        let cut = &blob[..blob.len() - 1];
        let err = read_records::<StrandIndex, _>(&mut &cut[..]).unwrap_err();
        assert!(matches!(err, TressFxError::Format(_)));
    }

    #[test]
    fn truncated_header_is_rejected() {
        let err = read_records::<StrandIndex, _>(&mut &b"TFXB"[..]).unwrap_err();
        assert!(matches!(err, TressFxError::Format(_)));
    }

    #[test]
    fn bad_magic_and_version_are_rejected() {
        let mut blob = strand_blob();
        blob[0] = b'X';
        assert!(read_records::<StrandIndex, _>(&mut blob.as_slice()).is_err());

        let mut blob = strand_blob();
        blob[4..8].copy_from_slice(&2u32.to_le_bytes());
        let err = read_records::<StrandIndex, _>(&mut blob.as_slice()).unwrap_err();
        assert!(err.to_string().contains("version 2"));
    }

    #[test]
    fn records_read_back_bit_exact() {
        let spheres = [
            SphereCollider::new(Vec3::new(0.5, 1.5, -2.0), 0.25),
            SphereCollider::new(Vec3::ZERO, 3.0),
        ];
        let mut blob = Vec::new();
        write_records(&mut blob, &spheres).unwrap();
        let back = read_records::<SphereCollider, _>(&mut blob.as_slice())
            .unwrap();
        assert_eq!(back, spheres);
    }

    #[test]
    fn corrupt_strand_records_are_reported() {
        let mut blob = strand_blob();
        // hair_id of the fourth record (second strand root)
        let at = HEADER_LEN + 3 * 12 + 4;
        blob[at..at + 4].copy_from_slice(&7i32.to_ne_bytes());
        let err = read_strand_layout(&mut blob.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            TressFxError::InvalidStrandIndex { position: 3, .. }
        ));
    }
}
