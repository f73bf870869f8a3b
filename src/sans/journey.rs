//! Decoding of individual journeys.
//!
//! A journey is spread over several areas of a document: a header in the
//! journey header array, planned part records after it, realtime records in
//! the journey details block, and lookups into the shared tables. The
//! [`JourneyDecoder`] holds the positions of all of these and assembles one
//! [`Journey`] per call.

use chrono::{Days, Duration, NaiveDate, NaiveDateTime};
use tartan_bitfield::bitfield;
use thiserror::Error;
use tracing::trace;

use super::{
    attributes::{AttributeTable, CommentTable},
    cursor::{Cursor, OutOfRange},
    layout::{
        JOURNEY_HEADER_SIZE, JOURNEYS_POSITION, JourneyDetailsHeader, JourneyDetailsRecord,
        JourneyHeader, PART_RECORD_SIZE, PREDICTED_PART_RECORD_SIZE, PartRecord,
        PredictedPartRecord, STOP_RECORD_SIZE, StopRecord, U16,
    },
    service_days::ServiceDayTable,
    stations::StationTable,
    strings::StringTable,
};
use crate::{
    config::DecoderConfig,
    journey::{Event, Journey, RoutePart, SubJourneyStop},
    vehicle,
};

/// Stored time value meaning "no time".
const ABSENT: u16 = 0xffff;

/// Realtime status of a cancelled journey.
const CANCELLED: u16 = 2;

/// Attribute key carrying the provider's connection identifier.
const CONNECTION_ID: &str = "ConnectionId";

/// The only journey details version this decoder understands.
const DETAILS_VERSION: u16 = 1;

bitfield! {
    struct RealtimeFlags(u16) {
        [4] arrival_cancelled,
        [5] departure_cancelled,
    }
}

/// An error decoding a journey.
#[derive(Debug, Error)]
pub enum JourneyError {
    /// The extension header does not point at a journey details block.
    #[error("Journey details are missing.")]
    MissingDetails,
    /// Unknown journey details version.
    #[error("Unknown journey details version ({0}).")]
    UnknownDetailsVersion(u16),
    /// A record stride the decoder cannot read.
    #[error("Unsupported {record} stride ({stride} bytes).")]
    UnsupportedStride { record: &'static str, stride: u16 },
    /// A journey has no entry in the journey details index.
    #[error("Journey {0} has no details.")]
    MissingJourneyDetails(u16),
    /// A time cannot be represented.
    #[error("Time out of range ({0}).")]
    TimeOutOfRange(u16),
    /// A read fell outside the document.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

/// Layout of the journey details block.
#[derive(Debug, Clone, Copy)]
pub struct JourneyDetails {
    position: usize,
    index_offset: usize,
    part_offset: usize,
    part_stride: usize,
    stops_offset: usize,
}

impl JourneyDetails {
    /// Read the header of the journey details block at an absolute position.
    pub fn read(c: &mut Cursor, position: u32) -> Result<Self, JourneyError> {
        if position == 0 {
            Err(JourneyError::MissingDetails)?;
        }

        let position = position as usize;
        let header: JourneyDetailsHeader = c.read_at(position, "journey details header")?;

        let version = header.version.get();
        if version != DETAILS_VERSION {
            Err(JourneyError::UnknownDetailsVersion(version))?;
        }

        let part_stride = header.part_stride.get();
        if usize::from(part_stride) < PREDICTED_PART_RECORD_SIZE {
            Err(JourneyError::UnsupportedStride {
                record: "predicted part",
                stride: part_stride,
            })?;
        }

        let stop_stride = header.stop_stride.get();
        if usize::from(stop_stride) != STOP_RECORD_SIZE {
            Err(JourneyError::UnsupportedStride {
                record: "stop",
                stride: stop_stride,
            })?;
        }

        Ok(Self {
            position,
            index_offset: header.index_offset.get().into(),
            part_offset: header.part_offset.get().into(),
            part_stride: part_stride.into(),
            stops_offset: header.stops_offset.get().into(),
        })
    }

    /// Absolute position of a journey's details, from the index.
    fn journey_position(&self, c: &mut Cursor, j: u16) -> Result<usize, JourneyError> {
        let entry = self.position + self.index_offset + 2 * usize::from(j);
        let offset = c.read_at::<U16>(entry, "journey details index")?.get();

        if offset == 0 {
            Err(JourneyError::MissingJourneyDetails(j))?;
        }

        Ok(self.position + usize::from(offset))
    }

    fn part_position(&self, journey_position: usize, i: u16) -> usize {
        journey_position + self.part_offset + self.part_stride * usize::from(i)
    }

    fn stop_position(&self, index: usize) -> usize {
        self.position + self.stops_offset + STOP_RECORD_SIZE * index
    }
}

/// The shared lookup tables of a document.
#[derive(Debug, Clone, Copy)]
pub struct Tables {
    pub strings: StringTable,
    pub stations: StationTable,
    pub comments: CommentTable,
    pub attributes: AttributeTable,
    pub service_days: ServiceDayTable,
}

/// Everything needed to decode the journeys of one document.
#[derive(Debug)]
pub struct JourneyDecoder<'a> {
    pub tables: Tables,
    pub details: JourneyDetails,
    /// Absolute position of the per-journey attribute index, if any.
    pub connection_attributes: Option<usize>,
    pub base_date: NaiveDate,
    pub origin: String,
    pub target: String,
    pub config: &'a DecoderConfig,
}

impl JourneyDecoder<'_> {
    /// Decode the journey at index `j`.
    pub fn decode(&self, c: &mut Cursor, j: u16) -> Result<Journey, JourneyError> {
        let strings = &self.tables.strings;

        let header: JourneyHeader = c.read_at(
            JOURNEYS_POSITION + JOURNEY_HEADER_SIZE * usize::from(j),
            "journey header",
        )?;

        let service_days =
            self.tables
                .service_days
                .resolve(c, strings, header.service_days_offset.get())?;
        let day_offset = service_days.day_offset;

        let details_position = self.details.journey_position(c, j)?;
        let details: JourneyDetailsRecord = c.read_at(details_position, "journey details")?;

        let cancelled = details.realtime_status.get() == CANCELLED;
        let delay_minutes = match details.delay.get() {
            ABSENT => None,
            delay => Some(i32::from(delay)),
        };

        let mut journey_news = Vec::new();
        if !service_days.text.is_empty() {
            journey_news.push(service_days.text);
        }
        if cancelled {
            journey_news.push("Journey cancelled".to_owned());
        }

        let part_count = header.part_count.get();
        let parts_position = JOURNEYS_POSITION + header.parts_offset.get() as usize;

        let mut parts = Vec::with_capacity(part_count.into());
        for i in 0..part_count {
            let part = self.decode_part(c, parts_position, details_position, day_offset, i)?;
            parts.push(part);
        }

        if let Some(first) = parts.first_mut() {
            if first.departure.platform_changed() {
                let note = platform_note(&first.departure.planned_platform);
                append_line(&mut first.news, &note);
            }
        }

        if let Some(last) = parts.last_mut() {
            if last.arrival.platform_changed() {
                let note = platform_note(&last.arrival.planned_platform);
                append_line(&mut last.news, &note);
            }
        }

        trace!(journey = j, parts = part_count, day_offset, "decoded journey");

        Ok(Journey {
            external_id: self.connection_id(c, j)?,
            start_stop_name: self.origin.clone(),
            target_stop_name: self.target.clone(),
            departure_date_time: parts.first().and_then(|p| p.departure.planned),
            arrival_date_time: parts.last().and_then(|p| p.arrival.planned),
            duration_minutes: duration_minutes(header.duration.get()),
            changes: header.changes.get(),
            delay_minutes,
            cancelled,
            journey_news: journey_news.join("\n"),
            parts,
        })
    }

    fn decode_part(
        &self,
        c: &mut Cursor,
        parts_position: usize,
        details_position: usize,
        day_offset: u32,
        i: u16,
    ) -> Result<RoutePart, JourneyError> {
        let Tables {
            strings,
            stations,
            comments,
            attributes,
            ..
        } = &self.tables;

        let record: PartRecord =
            c.read_at(parts_position + PART_RECORD_SIZE * usize::from(i), "part record")?;

        let departure_stop = stations.resolve(c, strings, record.departure_station.get())?;
        let arrival_stop = stations.resolve(c, strings, record.arrival_station.get())?;

        // Lines are stored as "vehicle#line", or as the line alone.
        let combined = strings.resolve(c, record.line.get())?;
        let (vehicle_name, transport_line) = match combined.split_once('#') {
            Some((vehicle_name, line)) => (vehicle_name.trim(), line.trim()),
            None => (combined.as_str(), combined.as_str()),
        };

        let part_attributes = attributes.chain(c, strings, record.attributes_index.get())?;
        let vehicle_type = vehicle::resolve(
            record.kind.get(),
            vehicle_name,
            &part_attributes,
            self.config,
        );

        let news = comments
            .read(c, strings, record.comments_offset.get())?
            .join(", ");

        let predicted: PredictedPartRecord = c.read_at(
            self.details.part_position(details_position, i),
            "predicted part record",
        )?;
        let flags = RealtimeFlags(predicted.flags.get());

        let departure = Event {
            planned: self.planned_time(record.departure_time.get(), day_offset)?,
            predicted: self.predicted_time(predicted.departure_time.get(), day_offset)?,
            planned_platform: strings.resolve(c, record.departure_platform.get())?,
            predicted_platform: strings.resolve(c, predicted.departure_platform.get())?,
        };

        let arrival = Event {
            planned: self.planned_time(record.arrival_time.get(), day_offset)?,
            predicted: self.predicted_time(predicted.arrival_time.get(), day_offset)?,
            planned_platform: strings.resolve(c, record.arrival_platform.get())?,
            predicted_platform: strings.resolve(c, predicted.arrival_platform.get())?,
        };

        let sub_journey = self.sub_journey(
            c,
            predicted.first_stop.get(),
            predicted.stop_count.get(),
            day_offset,
        )?;

        Ok(RoutePart {
            departure_stop,
            arrival_stop,
            vehicle_type,
            transport_line: transport_line.to_owned(),
            departure,
            arrival,
            departure_cancelled: flags.departure_cancelled(),
            arrival_cancelled: flags.arrival_cancelled(),
            news,
            sub_journey,
        })
    }

    /// Decode the stops strictly between a part's endpoints. The stop block
    /// starts and ends with the endpoints themselves.
    fn sub_journey(
        &self,
        c: &mut Cursor,
        first: u16,
        count: u16,
        day_offset: u32,
    ) -> Result<Vec<SubJourneyStop>, JourneyError> {
        if count < 3 {
            return Ok(Vec::new());
        }

        let first = usize::from(first);
        (1..usize::from(count) - 1)
            .map(|k| self.decode_stop(c, first + k, day_offset))
            .collect()
    }

    fn decode_stop(
        &self,
        c: &mut Cursor,
        index: usize,
        day_offset: u32,
    ) -> Result<SubJourneyStop, JourneyError> {
        let strings = &self.tables.strings;

        let record: StopRecord = c.read_at(self.details.stop_position(index), "stop record")?;
        let flags = RealtimeFlags(record.flags.get());

        let arrival = Event {
            planned: self.planned_time(record.planned_arrival_time.get(), day_offset)?,
            predicted: self.predicted_time(record.predicted_arrival_time.get(), day_offset)?,
            planned_platform: strings.resolve(c, record.planned_arrival_platform.get())?,
            predicted_platform: strings.resolve(c, record.predicted_arrival_platform.get())?,
        };

        let departure = Event {
            planned: self.planned_time(record.planned_departure_time.get(), day_offset)?,
            predicted: self.predicted_time(record.predicted_departure_time.get(), day_offset)?,
            planned_platform: strings.resolve(c, record.planned_departure_platform.get())?,
            predicted_platform: strings.resolve(c, record.predicted_departure_platform.get())?,
        };

        Ok(SubJourneyStop {
            stop: self.tables.stations.resolve(c, strings, record.station.get())?,
            arrival,
            departure,
            arrival_cancelled: flags.arrival_cancelled(),
            departure_cancelled: flags.departure_cancelled(),
        })
    }

    fn connection_id(&self, c: &mut Cursor, j: u16) -> Result<Option<String>, JourneyError> {
        let Some(position) = self.connection_attributes else {
            return Ok(None);
        };

        let entry = position + 2 * usize::from(j);
        let index = c.read_at::<U16>(entry, "connection attributes index")?.get();

        let attributes = self
            .tables
            .attributes
            .chain(c, &self.tables.strings, index)?;

        Ok(attributes.get(CONNECTION_ID).map(str::to_owned))
    }

    fn planned_time(&self, raw: u16, day_offset: u32) -> Result<Option<NaiveDateTime>, JourneyError> {
        time(self.base_date, raw, day_offset)
    }

    /// Predicted times of zero mean no realtime update was published.
    fn predicted_time(
        &self,
        raw: u16,
        day_offset: u32,
    ) -> Result<Option<NaiveDateTime>, JourneyError> {
        match raw {
            0 => Ok(None),
            raw => time(self.base_date, raw, day_offset),
        }
    }
}

/// Convert a stored `hhmm` value to a date and time. Hours may exceed 23 for
/// services running past midnight.
pub fn time(
    base_date: NaiveDate,
    raw: u16,
    day_offset: u32,
) -> Result<Option<NaiveDateTime>, JourneyError> {
    if raw == ABSENT {
        return Ok(None);
    }

    let minutes = i64::from(raw / 100) * 60 + i64::from(raw % 100);

    base_date
        .checked_add_days(Days::new(day_offset.into()))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|midnight| midnight.checked_add_signed(Duration::minutes(minutes)))
        .map(Some)
        .ok_or(JourneyError::TimeOutOfRange(raw))
}

fn duration_minutes(raw: u16) -> Option<u32> {
    (raw != ABSENT).then(|| u32::from(raw / 100) * 60 + u32::from(raw % 100))
}

fn platform_note(planned: &str) -> String {
    if planned.is_empty() {
        "Platform changed".to_owned()
    } else {
        format!("Platform changed from {planned}")
    }
}

fn append_line(news: &mut String, line: &str) {
    if !news.is_empty() {
        news.push('\n');
    }
    news.push_str(line);
}
