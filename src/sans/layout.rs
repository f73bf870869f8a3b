//! Wire layouts of the fixed-size records in a document.
//!
//! Offsets in the comments are relative to the start of each record. All
//! multi-byte integers are stored in [`Order`].

use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

/// Byte order of every multi-byte integer in a document.
pub type Order = zerocopy::byteorder::BigEndian;

pub type U16 = zerocopy::byteorder::U16<Order>;
pub type I16 = zerocopy::byteorder::I16<Order>;
pub type U32 = zerocopy::byteorder::U32<Order>;
pub type I32 = zerocopy::byteorder::I32<Order>;

/// Offset of the first journey header, and base of part record offsets.
pub const JOURNEYS_POSITION: usize = 0x4a;

pub const FILE_HEADER_SIZE: usize = size_of::<FileHeader>();
pub const LOCATION_SIZE: usize = size_of::<Location>();
pub const JOURNEY_HEADER_SIZE: usize = size_of::<JourneyHeader>();
pub const PART_RECORD_SIZE: usize = size_of::<PartRecord>();
pub const STATION_RECORD_SIZE: usize = size_of::<StationRecord>();
pub const STOP_RECORD_SIZE: usize = size_of::<StopRecord>();
pub const PREDICTED_PART_RECORD_SIZE: usize = size_of::<PredictedPartRecord>();

/// Extension headers shorter than this are malformed.
pub const EXTENSION_HEADER_MIN_LENGTH: u32 = 0x2c;
/// Extension headers at least this long carry a connection attributes position.
pub const EXTENSION_HEADER_ATTRIBUTES_LENGTH: u32 = 0x30;

/// Document header, at offset 0.
#[repr(C)]
#[derive(Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct FileHeader {
    pub version: U16,
    pub origin: Location,
    pub target: Location,
    pub journey_count: U16,
    pub service_days_position: U32,
    pub strings_position: U32,
    pub date: U16,
    pub secondary_date: U16,
    pub _reserved_2c: [u8; 10],
    pub stations_position: U32,
    pub comments_position: U32,
    pub _reserved_3e: [u8; 8],
    pub extension_position: U32,
}

/// A requested origin or target, echoed in the file header.
#[repr(C)]
#[derive(Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct Location {
    pub name: U16,
    pub _reserved: U16,
    pub kind: U16,
    pub longitude: I32,
    pub latitude: I32,
}

/// One entry of the journey header array, at `0x4a + 12 * j`.
#[repr(C)]
#[derive(Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct JourneyHeader {
    pub service_days_offset: U16,
    /// Relative to [`JOURNEYS_POSITION`].
    pub parts_offset: U32,
    pub part_count: U16,
    pub changes: U16,
    pub duration: U16,
}

/// One planned journey part, at `0x4a + parts_offset + 20 * i`.
#[repr(C)]
#[derive(Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct PartRecord {
    pub departure_time: U16,
    pub departure_station: U16,
    pub arrival_time: U16,
    pub arrival_station: U16,
    pub kind: U16,
    pub line: U16,
    pub departure_platform: U16,
    pub arrival_platform: U16,
    pub attributes_index: U16,
    pub comments_offset: U16,
}

/// One slot of the station table.
#[repr(C)]
#[derive(Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct StationRecord {
    pub name: U16,
    pub external_id: U32,
    pub longitude: I32,
    pub latitude: I32,
}

/// Fixed prefix of the extension header.
#[repr(C)]
#[derive(Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct ExtensionHeaderRecord {
    pub length: U32,
    pub _reserved_04: U32,
    pub sequence: U16,
    pub request_id: U16,
    pub journey_details_position: U32,
    pub error_code: U16,
    pub _reserved_12: [u8; 14],
    pub encoding: U16,
    pub context: U16,
    pub _reserved_24: U32,
    pub attributes_position: U32,
}

/// Header of the journey details block.
#[repr(C)]
#[derive(Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct JourneyDetailsHeader {
    pub version: U16,
    pub _reserved: U16,
    pub index_offset: U16,
    pub part_offset: U16,
    pub part_stride: U16,
    pub stop_stride: U16,
    pub stops_offset: U16,
}

/// Realtime summary of one journey.
#[repr(C)]
#[derive(Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct JourneyDetailsRecord {
    pub realtime_status: U16,
    pub delay: U16,
}

/// Realtime counterpart of a [`PartRecord`].
#[repr(C)]
#[derive(Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct PredictedPartRecord {
    pub departure_time: U16,
    pub arrival_time: U16,
    pub departure_platform: U16,
    pub arrival_platform: U16,
    pub flags: U16,
    pub _reserved: U16,
    pub first_stop: U16,
    pub stop_count: U16,
}

/// One stop served by a journey part, endpoints included.
#[repr(C)]
#[derive(Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct StopRecord {
    pub planned_departure_time: U16,
    pub planned_arrival_time: U16,
    pub planned_departure_platform: U16,
    pub planned_arrival_platform: U16,
    pub _reserved_08: U32,
    pub predicted_departure_time: U16,
    pub predicted_arrival_time: U16,
    pub predicted_departure_platform: U16,
    pub predicted_arrival_platform: U16,
    pub flags: U16,
    pub _reserved_16: U16,
    pub station: U16,
}
