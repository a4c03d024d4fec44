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
// Complexity limits
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
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Mesh annotation engine for finite-element pre-processing.
//!
//! A user loads a mesh, clicks on it to select nodes, and marks those nodes
//! as fixed (zero-displacement boundary conditions) or loads them with point
//! forces. This crate holds the logic behind that workflow; rendering, file
//! dialogs and the solver live elsewhere.
//!
//! # Key entry points
//!
//! - [`engine::Preprocessor`] - owns the mesh and all annotation state,
//!   executes [`engine::Command`]s
//! - [`picking::resolve`] / [`picking::SpatialPicker`] - nearest-vertex
//!   picking with a length-scaled tolerance
//! - [`annotations::AnnotationStore`] - fixed nodes and forces, validated
//!   against the mesh in force
//! - [`session::SelectionSession`] - picking mode and active selection as one
//!   state machine
//! - [`options::Options`] - TOML-backed tunables
//!
//! # Flow
//!
//! A rendering surface forwards raw pick points as [`engine::Command::Pick`];
//! the session resolves them through the picker and tracks the selection.
//! Fix, unfix and force commands act on that selection. After each command
//! the host checks [`engine::Preprocessor::is_dirty`] and redraws from
//! [`engine::Preprocessor::render_snapshot`].

pub mod annotations;
pub mod engine;
pub mod error;
pub mod input;
pub mod mesh;
pub mod options;
pub mod picking;
pub mod session;

pub use engine::{Command, Preprocessor, RenderSnapshot, Status};
pub use error::PrepError;
pub use mesh::{JsonMeshSource, Mesh, MeshSource};
