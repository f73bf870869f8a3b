//! The file header, the extension header, and server error codes.

use chrono::{Days, NaiveDate};
use either::Either::{self, Left, Right};
use encoding_rs::Encoding;
use thiserror::Error;
use tracing::warn;

use super::{
    cursor::{Cursor, OutOfRange},
    layout::{
        EXTENSION_HEADER_ATTRIBUTES_LENGTH, EXTENSION_HEADER_MIN_LENGTH, ExtensionHeaderRecord,
        FILE_HEADER_SIZE, FileHeader, U32,
    },
    strings::StringTable,
};

/// Format versions this decoder understands.
pub const VERSIONS: [u16; 2] = [5, 6];

/// Error code with which servers report an empty result.
pub const NO_JOURNEYS: u16 = 890;

/// An error reading the file header.
#[derive(Debug, Error)]
pub enum FileHeaderError {
    /// The document cannot hold a file header.
    #[error("Document too short ({0} bytes).")]
    TooShort(usize),
    /// Unknown format version.
    #[error("Unknown format version ({0}).")]
    UnknownVersion(u16),
    /// The base date cannot be represented.
    #[error("Base date out of range ({0} days).")]
    DateOutOfRange(u16),
}

/// Read and validate the file header at the start of a document.
pub fn read_file_header(c: &mut Cursor) -> Result<FileHeader, FileHeaderError> {
    if c.len() < FILE_HEADER_SIZE {
        Err(FileHeaderError::TooShort(c.len()))?;
    }

    let header: FileHeader = c
        .read_at(0, "file header")
        .map_err(|_| FileHeaderError::TooShort(c.len()))?;

    let version = header.version.get();
    if !VERSIONS.contains(&version) {
        Err(FileHeaderError::UnknownVersion(version))?;
    }

    Ok(header)
}

/// Convert a stored day count to a date, counting from 1980-01-01.
pub fn date(days: u16) -> Result<NaiveDate, FileHeaderError> {
    NaiveDate::from_ymd_opt(1980, 1, 1)
        .and_then(|epoch| epoch.checked_add_days(Days::new(days.into())))
        .ok_or(FileHeaderError::DateOutOfRange(days))
}

/// An error reading the extension header.
#[derive(Debug, Error)]
pub enum ExtensionHeaderError {
    /// Declared length below the minimum.
    #[error("Extension header too short ({0} bytes).")]
    TooShort(u32),
    /// The header lies outside the document.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

/// An error code reported by the server in place of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Session expired.")]
    SessionExpired,
    #[error("Server timed out.")]
    Timeout,
    #[error("Departure and arrival stops are too close.")]
    TooClose,
    #[error("Address could not be resolved.")]
    UnresolvableAddress,
    #[error("Service is down.")]
    ServiceDown,
    #[error("Unknown departure stop.")]
    UnknownDeparture,
    #[error("Unknown via stop.")]
    UnknownVia,
    #[error("Unknown arrival stop.")]
    UnknownArrival,
    #[error("Invalid date.")]
    InvalidDate,
    /// Any other non-zero code.
    #[error("Unknown error code ({0}).")]
    Unknown(u16),
}

impl ProtocolError {
    /// Translate a non-zero error code other than [`NO_JOURNEYS`].
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::SessionExpired,
            887 => Self::Timeout,
            895 | 9380 => Self::TooClose,
            9220 => Self::UnresolvableAddress,
            9240 => Self::ServiceDown,
            9260 => Self::UnknownDeparture,
            9280 => Self::UnknownVia,
            9300 => Self::UnknownArrival,
            9360 => Self::InvalidDate,
            _ => Self::Unknown(code),
        }
    }

    /// Fail on every code except success and [`NO_JOURNEYS`].
    pub fn check(code: u16) -> Result<(), Self> {
        match code {
            0 | NO_JOURNEYS => Ok(()),
            code => Err(Self::from_code(code)),
        }
    }
}

/// Marker for a server response that holds no journeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoJourneys;

/// The fixed fields of the extension header, before any string is resolved.
///
/// Servers reporting an error may send a document whose string pool is
/// unusable, so the error code is available from here.
#[derive(Debug)]
pub struct RawExtensionHeader {
    length: u32,
    record: ExtensionHeaderRecord,
    connection_attributes_position: Option<u32>,
}

impl RawExtensionHeader {
    /// Read the fixed fields at an absolute position. The cursor position is
    /// unchanged afterward.
    pub fn read(c: &mut Cursor, position: usize) -> Result<Self, ExtensionHeaderError> {
        let length = c.read_at::<U32>(position, "extension header length")?.get();
        if length < EXTENSION_HEADER_MIN_LENGTH {
            Err(ExtensionHeaderError::TooShort(length))?;
        }

        let record: ExtensionHeaderRecord = c.read_at(position, "extension header")?;

        let connection_attributes_position = if length >= EXTENSION_HEADER_ATTRIBUTES_LENGTH {
            let offset = position + EXTENSION_HEADER_MIN_LENGTH as usize;
            let value = c.read_at::<U32>(offset, "connection attributes position")?.get();
            (value != 0).then_some(value)
        } else {
            None
        };

        Ok(Self {
            length,
            record,
            connection_attributes_position,
        })
    }

    /// The server's error code, `0` on success.
    pub fn error_code(&self) -> u16 {
        self.record.error_code.get()
    }

    /// Fail with the server's error, unless it reported success or no
    /// journeys.
    pub fn check(&self) -> Result<(), ProtocolError> {
        ProtocolError::check(self.error_code())
    }

    /// Resolve the header's strings.
    pub fn resolve(
        self,
        c: &mut Cursor,
        strings: &StringTable,
    ) -> Result<ExtensionHeader, ExtensionHeaderError> {
        let record = &self.record;

        Ok(ExtensionHeader {
            length: self.length,
            sequence: record.sequence.get(),
            request_id: strings.resolve(c, record.request_id.get())?,
            journey_details_position: record.journey_details_position.get(),
            error_code: record.error_code.get(),
            encoding_label: strings.resolve(c, record.encoding.get())?,
            context: strings.resolve(c, record.context.get())?,
            attributes_position: record.attributes_position.get(),
            connection_attributes_position: self.connection_attributes_position,
        })
    }
}

/// The decoded extension header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionHeader {
    pub length: u32,
    pub sequence: u16,
    pub request_id: String,
    /// Absolute position of the journey details block.
    pub journey_details_position: u32,
    pub error_code: u16,
    /// Label of the text encoding used by the string table.
    pub encoding_label: String,
    pub context: String,
    /// Absolute position of the attribute area.
    pub attributes_position: u32,
    /// Absolute position of the per-journey attribute index, when present.
    pub connection_attributes_position: Option<u32>,
}

impl ExtensionHeader {
    /// Read the extension header at an absolute position and resolve its
    /// strings. The cursor position is unchanged afterward.
    pub fn read(
        c: &mut Cursor,
        strings: &StringTable,
        position: usize,
    ) -> Result<Self, ExtensionHeaderError> {
        RawExtensionHeader::read(c, position)?.resolve(c, strings)
    }

    /// The declared text encoding, if it names one `encoding_rs` knows.
    pub fn encoding(&self) -> Option<&'static Encoding> {
        if self.encoding_label.is_empty() {
            return None;
        }

        let encoding = Encoding::for_label(self.encoding_label.as_bytes());
        if encoding.is_none() {
            warn!(label = %self.encoding_label, "unrecognised text encoding");
        }

        encoding
    }

    /// Check the server's error code.
    ///
    /// Returns the header itself when the document holds results, or
    /// [`NoJourneys`] for the benign empty-result code.
    pub fn advance(self) -> Result<Either<Self, NoJourneys>, ProtocolError> {
        ProtocolError::check(self.error_code)?;

        match self.error_code {
            NO_JOURNEYS => Ok(Right(NoJourneys)),
            _ => Ok(Left(self)),
        }
    }
}

/// Document-level facts, decoded before any journey.
#[derive(Debug, Clone)]
pub struct Document {
    pub version: u16,
    pub request_id: String,
    pub sequence: u16,
    pub base_date: NaiveDate,
    pub encoding: &'static Encoding,
    pub origin: String,
    pub target: String,
    /// Journeys declared by the file header. Zero when the server reported
    /// no journeys.
    pub journey_count: u16,
}
