//! Slice-based decoder implementation.

use either::Either::{Left, Right};
use encoding_rs::WINDOWS_1252;
use thiserror::Error;
use tracing::debug;

use crate::sans::{
    attributes::{AttributeTable, CommentTable},
    cursor::{Cursor, OutOfRange},
    header::{
        self, Document, ExtensionHeaderError, FileHeaderError, ProtocolError, RawExtensionHeader,
    },
    journey::{JourneyDecoder, JourneyDetails, JourneyError, Tables},
    service_days::ServiceDayTable,
    stations::StationTable,
    strings::StringTable,
};

use super::{DecoderConfig, FromJourneys};

/// Errors occurring while decoding from a slice.
#[derive(Debug, Error)]
pub enum Error {
    /// Incorrect file header.
    #[error("Incorrect file header: {0}")]
    Header(#[from] FileHeaderError),
    /// Incorrect extension header.
    #[error("Incorrect extension header: {0}")]
    Extension(#[from] ExtensionHeaderError),
    /// The server reported an error in place of results.
    #[error("Server reported an error: {0}")]
    Protocol(#[from] ProtocolError),
    /// A journey could not be decoded.
    #[error("Could not decode journey: {0}")]
    Journey(#[from] JourneyError),
    /// A read fell outside the document.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

/// Decode the journeys of a document held in a slice, publishing to a
/// receiver.
///
/// Returns the document-level facts. A document for which the server reported
/// no journeys decodes successfully with a journey count of zero.
///
/// This method is also re-exported as `bogie::avec::decode_slice`.
pub fn decode(
    r: &[u8],
    config: &DecoderConfig,
    o: &mut impl FromJourneys,
) -> Result<Document, Error> {
    let c = &mut Cursor::new(r);

    let file = header::read_file_header(c)?;

    let extension = RawExtensionHeader::read(c, file.extension_position.get() as usize)?;

    // Server errors win over anything the string pool may hold.
    if let Err(err) = extension.check() {
        debug!(code = extension.error_code(), "server reported an error");
        Err(err)?;
    }

    // The encoding label itself is read before the encoding is known.
    let strings = StringTable::new(file.strings_position.get() as usize);
    let extension = extension.resolve(c, &strings)?;

    let encoding = config
        .encoding
        .or_else(|| extension.encoding())
        .unwrap_or(WINDOWS_1252);
    let strings = strings.with_encoding(encoding);

    let mut document = Document {
        version: file.version.get(),
        request_id: extension.request_id.clone(),
        sequence: extension.sequence,
        base_date: header::date(file.date.get())?,
        encoding,
        origin: strings.resolve(c, file.origin.name.get())?,
        target: strings.resolve(c, file.target.name.get())?,
        journey_count: file.journey_count.get(),
    };

    debug!(
        version = document.version,
        journeys = document.journey_count,
        encoding = encoding.name(),
        request_id = %document.request_id,
        "decoding journey document"
    );

    let extension = match extension.advance()? {
        Left(extension) => extension,
        Right(_) => {
            debug!("server reported no journeys");
            document.journey_count = 0;
            return Ok(document);
        }
    };

    let decoder = JourneyDecoder {
        tables: Tables {
            strings,
            stations: StationTable::new(file.stations_position.get() as usize),
            comments: CommentTable::new(file.comments_position.get() as usize),
            attributes: AttributeTable::new(extension.attributes_position as usize),
            service_days: ServiceDayTable::new(file.service_days_position.get() as usize),
        },
        details: JourneyDetails::read(c, extension.journey_details_position)?,
        connection_attributes: extension.connection_attributes_position.map(|p| p as usize),
        base_date: document.base_date,
        origin: document.origin.clone(),
        target: document.target.clone(),
        config,
    };

    let journeys = (0..document.journey_count)
        .map(|j| decoder.decode(c, j))
        .collect::<Result<Vec<_>, _>>()?;

    for journey in journeys {
        o.add_journey(journey);
    }

    Ok(document)
}
