//! Convenience interfaces for decoding whole documents.
//!
//! The functions in this module decode every journey of a document and
//! publish them to a [`FromJourneys`] receiver, in the order they appear in
//! the document. Journeys are only published once the whole document decoded
//! successfully; a document either yields all of its journeys or an error.

pub mod reader;
pub mod slice;

pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;

pub use crate::config::DecoderConfig;

use crate::journey::Journey;

/// Receive decoded journeys.
pub trait FromJourneys {
    /// Add a journey, in document order.
    fn add_journey(&mut self, journey: Journey);
}

impl FromJourneys for Vec<Journey> {
    fn add_journey(&mut self, journey: Journey) {
        self.push(journey);
    }
}

/// Decode every journey of a document held in a slice.
pub fn decode_journeys(r: &[u8], config: &DecoderConfig) -> Result<Vec<Journey>, slice::Error> {
    let mut journeys = Vec::new();
    decode_slice(r, config, &mut journeys)?;
    Ok(journeys)
}
