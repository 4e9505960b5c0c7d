//! Host/shader interop: the [`GpuRecord`] contract, the WGSL declarations of
//! every record, layout verification, and shader composition.
//!
//! Each record type is declared twice, once as a `#[repr(C)]` Rust struct and
//! once in `assets/shaders/modules/tressfx_structs.wgsl`. [`verify_layouts`]
//! parses the WGSL with naga and fails if the two disagree on size or on the
//! offset of any named field.

/// naga-based comparison of Rust and WGSL struct layouts.
pub mod layout;
/// WGSL shader composition with `#import tressfx::structs` support.
pub mod shader_composer;

pub use layout::{
    verify_layouts, verify_record, wgsl_struct_layouts, MemberLayout,
    StructLayout,
};
pub use shader_composer::{ShaderComposer, STRUCTS_IMPORT_PATH};

/// WGSL declarations of every record type.
pub const STRUCTS_WGSL: &str =
    include_str!("../../assets/shaders/modules/tressfx_structs.wgsl");

/// Byte offset of one named field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOffset {
    /// Rust field name.
    pub name: &'static str,
    /// Name of the matching WGSL member.
    pub wgsl_name: &'static str,
    /// Offset from the start of the record in bytes.
    pub offset: usize,
}

impl FieldOffset {
    /// Field with the same name in Rust and WGSL.
    #[must_use]
    pub const fn new(name: &'static str, offset: usize) -> Self {
        Self::renamed(name, name, offset)
    }

    /// Field whose WGSL member has another name.
    ///
    /// naga_oil refuses module members that naga would rename on writeback,
    /// such as names ending in a digit, so those fields get a WGSL alias.
    #[must_use]
    pub const fn renamed(
        name: &'static str,
        wgsl_name: &'static str,
        offset: usize,
    ) -> Self {
        Self { name, wgsl_name, offset }
    }
}

/// A plain-data record uploaded to the GPU as-is.
///
/// Implementors are `#[repr(C)]` and mirror a struct in [`STRUCTS_WGSL`].
pub trait GpuRecord: bytemuck::Pod {
    /// Name of the mirroring WGSL struct.
    const WGSL_NAME: &'static str;
    /// Tag identifying the record type in packed blobs.
    const KIND: u32;
    /// Named fields that must sit at the same offset in WGSL. Padding
    /// fields are left out.
    const FIELDS: &'static [FieldOffset];
}
