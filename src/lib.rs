// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Host/GPU interop records for strand-based hair simulation on wgpu.
//!
//! Three plain-data records cross the host/shader boundary every frame or
//! configuration change: a per-vertex [`strand::StrandIndex`], and the
//! [`collider::CapsuleCollider`] and [`collider::SphereCollider`] collision
//! volumes. This crate declares them, builds and validates them, checks
//! their layout against the WGSL declarations, and uploads them.
//!
//! # Key entry points
//!
//! - [`strand::StrandLayout`] - per-strand vertex counts, generates the
//!   per-vertex records
//! - [`collider::ColliderSet`] - validated colliders, re-posed per frame
//! - [`interop::verify_layouts`] - Rust/WGSL layout check via naga
//! - [`gpu::HairSimBuffers`] - storage buffers and bind group for shaders
//! - [`options::HairConfig`] - TOML configuration
//! - [`pack`] - binary blobs of record arrays
//!
//! No simulation happens here: integrating strands and resolving collisions
//! is left to the shaders that consume these records.

pub mod collider;
pub mod error;
pub mod gpu;
pub mod interop;
pub mod options;
pub mod pack;
pub mod strand;

pub use error::TressFxError;
