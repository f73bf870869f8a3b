//! A decoder for the HAFAS binary journey format.
//!
//! HAFAS servers run by several European transit providers can answer journey
//! queries in a compact binary format. Bogie decodes such a response into
//! [`Journey`](journey::Journey) records, with planned and realtime times,
//! platforms, delays and intermediate stops.
//!
//! Most users should begin with the functions in the [`avec`] module. The
//! [`sans`] module exposes the record layouts and table lookups the decoder
//! is built from, for applications that need to inspect a document directly.
//!
//! Decoding is synchronous and holds no state between documents.
//! Diagnostics are emitted through [`tracing`]; no subscriber is installed.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `serde`: derive `Serialize` for decoded journeys.

pub mod avec;
pub mod config;
pub mod journey;
pub mod sans;
pub mod vehicle;
