//! PCF Core - Avro Parsing Canonical Form
//!
//! Turns a decoded Avro schema into the deterministic, whitespace-free text
//! the Avro specification calls its Parsing Canonical Form. Two schemas that
//! differ only in formatting, attribute order, documentation or aliases
//! share one canonical form, so the form can be compared textually or fed to
//! a fingerprint function.
//!
//! # Architecture
//!
//! ```text
//! Schema JSON → serde_json → Value → Canonicalizer → Canonical Form
//!                                                        ↓
//!                                             fingerprint / comparison
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: Same input always produces identical output
//! - **Pure**: No I/O, no logging, no shared mutable state
//! - **Bounded**: Nesting depth is capped by [`CanonicalizerConfig`]

pub mod canonical;
pub mod error;
pub mod value;

pub use canonical::{
    canonicalize, canonicalize_str, canonicalize_with, field_order, CanonicalizerConfig,
    FIELD_ORDER,
};
pub use error::{Error, Result};
pub use value::Value;
