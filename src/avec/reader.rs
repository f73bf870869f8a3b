//! Reader-based decoder implementation.
//!
//! Documents are addressed by absolute offsets, so the reader is drained into
//! memory before decoding starts.

use std::io::Read;

use thiserror::Error;

use crate::sans::header::Document;

use super::{DecoderConfig, FromJourneys, slice};

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// An error decoding the document.
    #[error(transparent)]
    Decode(#[from] slice::Error),
}

/// Decode the journeys of a document from a reader, publishing to a receiver.
///
/// This method is also re-exported as `bogie::avec::decode_reader`.
pub fn decode(
    r: &mut impl Read,
    config: &DecoderConfig,
    o: &mut impl FromJourneys,
) -> Result<Document, Error> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;

    Ok(slice::decode(&buf, config, o)?)
}
