//! Crate-level error types.

use std::fmt;

use crate::strand::MIN_VERTICES_PER_STRAND;

/// Errors produced by the tressfx-interop crate.
#[derive(Debug)]
pub enum TressFxError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML configuration parsing/serialization failure.
    ConfigParse(String),
    /// A strand has fewer vertices than a segment needs.
    StrandTooShort {
        /// Hair id of the offending strand.
        hair_id: usize,
        /// Vertex count that was requested for it.
        vertex_count: usize,
    },
    /// Vertex or hair totals do not fit the `i32` fields of a record.
    TooManyVertices(usize),
    /// A flat record array does not describe a consistent strand layout.
    InvalidStrandIndex {
        /// Position of the first offending record.
        position: usize,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A collider has a non-finite component or a negative radius.
    InvalidCollider {
        /// `"capsule"` or `"sphere"`.
        kind: &'static str,
        /// Index the collider would have had in its array.
        index: usize,
    },
    /// Rust and WGSL disagree on the memory layout of a record.
    LayoutMismatch(String),
    /// WGSL parsing or shader composition failure.
    Shader(String),
    /// Malformed binary record blob.
    Format(String),
}

impl fmt::Display for TressFxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(msg) => {
                write!(f, "config parse error: {msg}")
            }
            Self::StrandTooShort {
                hair_id,
                vertex_count,
            } => write!(
                f,
                "strand {hair_id} has {vertex_count} vertices, at least \
                 {MIN_VERTICES_PER_STRAND} are required"
            ),
            Self::TooManyVertices(n) => {
                write!(f, "{n} exceeds the i32 range of strand records")
            }
            Self::InvalidStrandIndex { position, reason } => {
                write!(f, "invalid strand index at {position}: {reason}")
            }
            Self::InvalidCollider { kind, index } => write!(
                f,
                "{kind} collider {index} has a non-finite component or a \
                 negative radius"
            ),
            Self::LayoutMismatch(msg) => {
                write!(f, "layout mismatch: {msg}")
            }
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Format(msg) => write!(f, "blob format error: {msg}"),
        }
    }
}

impl std::error::Error for TressFxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TressFxError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
