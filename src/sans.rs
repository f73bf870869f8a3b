//! Building blocks for decoding documents.
//!
//! This module is intended for applications that need to inspect a document
//! piece by piece. See [`crate::avec`] for functions decoding a whole
//! document at once.
//!
//! # Document Structure
//!
//! A document is addressed by absolute offsets rather than read front to
//! back. The [`layout::FileHeader`] at offset 0 locates
//! every other area:
//!
//! - The journey header array, directly after the file header, and the
//! planned part records it points to.
//!
//! - A string pool, a station table, a comment area and a service-day area,
//! referred to by 16-bit offsets or indices from the fixed-size records.
//!
//! - An extension header carrying the server's error code, the text encoding
//! of the string pool, and the positions of the journey details block and the
//! attribute area.
//!
//! All reads go through a [`cursor::Cursor`], which checks every offset
//! against the document length. Table lookups are side excursions: they leave
//! the cursor where they found it.

pub mod attributes;
pub mod cursor;
pub mod header;
pub mod journey;
pub mod layout;
pub mod service_days;
pub mod stations;
pub mod strings;
