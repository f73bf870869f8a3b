//! Resolution of station indices into stops.

use super::{
    cursor::{Cursor, OutOfRange},
    layout::{STATION_RECORD_SIZE, StationRecord},
    strings::StringTable,
};
use crate::journey::Stop;

/// Coordinates are stored as integer microdegrees.
const COORDINATE_SCALE: f64 = 1_000_000.0;

/// The station table: fixed-size [`StationRecord`] slots.
#[derive(Debug, Clone, Copy)]
pub struct StationTable {
    position: usize,
}

impl StationTable {
    /// A table at an absolute position.
    pub fn new(position: usize) -> Self {
        Self { position }
    }

    /// Resolve a station index. The cursor position is unchanged afterward.
    pub fn resolve(
        &self,
        c: &mut Cursor,
        strings: &StringTable,
        index: u16,
    ) -> Result<Stop, OutOfRange> {
        let offset = self.position + STATION_RECORD_SIZE * usize::from(index);
        let record: StationRecord = c.read_at(offset, "station record")?;

        Ok(Stop {
            name: strings.resolve(c, record.name.get())?,
            external_id: record.external_id.get(),
            longitude: f64::from(record.longitude.get()) / COORDINATE_SCALE,
            latitude: f64::from(record.latitude.get()) / COORDINATE_SCALE,
        })
    }
}
