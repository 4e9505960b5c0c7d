use std::mem::size_of;

use super::{GpuRecord, STRUCTS_WGSL};
use crate::collider::{CapsuleCollider, ColliderCounts, SphereCollider};
use crate::error::TressFxError;
use crate::strand::StrandIndex;

/// Offset of one WGSL struct member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberLayout {
    /// Member name (empty if naga reports none).
    pub name: String,
    /// Byte offset within the struct.
    pub offset: u32,
}

/// Size and member offsets of one WGSL struct, as computed by naga.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
    /// Struct name.
    pub name: String,
    /// Size in bytes, including trailing padding to the struct alignment.
    pub size: u32,
    /// Members in declaration order.
    pub members: Vec<MemberLayout>,
}

impl StructLayout {
    /// Member named `name`.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberLayout> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Parse WGSL `source` and report the layout of every named struct.
///
/// # Errors
///
/// Returns [`TressFxError::Shader`] with the rendered naga diagnostic if
/// `source` does not parse.
pub fn wgsl_struct_layouts(
    source: &str,
) -> Result<Vec<StructLayout>, TressFxError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| TressFxError::Shader(e.emit_to_string(source)))?;

    let layouts = module
        .types
        .iter()
        .filter_map(|(_, ty)| match &ty.inner {
            naga::TypeInner::Struct { members, span } => Some(StructLayout {
                name: ty.name.clone()?,
                size: *span,
                members: members
                    .iter()
                    .map(|m| MemberLayout {
                        name: m.name.clone().unwrap_or_default(),
                        offset: m.offset,
                    })
                    .collect(),
            }),
            _ => None,
        })
        .collect();
    Ok(layouts)
}

/// Check `T` against its WGSL declaration in `layouts`.
///
/// # Errors
///
/// Returns [`TressFxError::LayoutMismatch`] if the struct is missing, the
/// sizes differ, or a field of [`GpuRecord::FIELDS`] is missing or sits at a
/// different offset.
pub fn verify_record<T: GpuRecord>(
    layouts: &[StructLayout],
) -> Result<(), TressFxError> {
    let name = T::WGSL_NAME;
    let wgsl = layouts.iter().find(|l| l.name == name).ok_or_else(|| {
        TressFxError::LayoutMismatch(format!("no WGSL struct named {name}"))
    })?;

    let rust_size = size_of::<T>();
    if rust_size != wgsl.size as usize {
        return Err(TressFxError::LayoutMismatch(format!(
            "{name}: Rust size {rust_size} != WGSL size {}",
            wgsl.size
        )));
    }

    for field in T::FIELDS {
        let member = wgsl.member(field.wgsl_name).ok_or_else(|| {
            TressFxError::LayoutMismatch(format!(
                "{name}: WGSL struct has no member {} (Rust field {})",
                field.wgsl_name, field.name
            ))
        })?;
        if member.offset as usize != field.offset {
            return Err(TressFxError::LayoutMismatch(format!(
                "{name}.{}: Rust offset {} != WGSL offset {}",
                field.wgsl_name, field.offset, member.offset
            )));
        }
    }
    Ok(())
}

/// Check every record type against [`STRUCTS_WGSL`].
///
/// # Errors
///
/// Returns the first parse or layout error.
pub fn verify_layouts() -> Result<(), TressFxError> {
    let layouts = wgsl_struct_layouts(STRUCTS_WGSL)?;
    verify_record::<StrandIndex>(&layouts)?;
    verify_record::<CapsuleCollider>(&layouts)?;
    verify_record::<SphereCollider>(&layouts)?;
    verify_record::<ColliderCounts>(&layouts)?;
    log::debug!("{} record layouts match WGSL", layouts.len());
    Ok(())
}
