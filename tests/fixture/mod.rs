//! Builder for synthetic journey documents.

#![allow(dead_code)]

use encoding_rs::{Encoding, WINDOWS_1252};

/// Stored time value meaning "no time".
pub const ABSENT: u16 = 0xffff;

pub const FOOTWAY: u16 = 1;

#[derive(Debug, Clone)]
pub struct StopSpec {
    pub station: u16,
    pub planned_departure: u16,
    pub planned_arrival: u16,
    pub planned_departure_platform: &'static str,
    pub planned_arrival_platform: &'static str,
    pub predicted_departure: u16,
    pub predicted_arrival: u16,
    pub predicted_departure_platform: &'static str,
    pub predicted_arrival_platform: &'static str,
    pub flags: u16,
}

impl Default for StopSpec {
    fn default() -> Self {
        Self {
            station: 0,
            planned_departure: ABSENT,
            planned_arrival: ABSENT,
            planned_departure_platform: "",
            planned_arrival_platform: "",
            predicted_departure: 0,
            predicted_arrival: 0,
            predicted_departure_platform: "",
            predicted_arrival_platform: "",
            flags: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PartSpec {
    pub departure_time: u16,
    pub departure_station: u16,
    pub arrival_time: u16,
    pub arrival_station: u16,
    pub kind: u16,
    pub line: &'static str,
    pub departure_platform: &'static str,
    pub arrival_platform: &'static str,
    pub attributes: Vec<(&'static str, &'static str)>,
    pub comments: Vec<&'static str>,
    pub predicted_departure: u16,
    pub predicted_arrival: u16,
    pub predicted_departure_platform: &'static str,
    pub predicted_arrival_platform: &'static str,
    pub flags: u16,
    pub stops: Vec<StopSpec>,
}

impl Default for PartSpec {
    fn default() -> Self {
        Self {
            departure_time: ABSENT,
            departure_station: 0,
            arrival_time: ABSENT,
            arrival_station: 0,
            kind: 0,
            line: "",
            departure_platform: "",
            arrival_platform: "",
            attributes: vec![],
            comments: vec![],
            predicted_departure: 0,
            predicted_arrival: 0,
            predicted_departure_platform: "",
            predicted_arrival_platform: "",
            flags: 0,
            stops: vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct JourneySpec {
    pub service_days: &'static str,
    pub bit_base: u16,
    pub bits: Vec<u8>,
    pub changes: u16,
    pub duration: u16,
    pub realtime_status: u16,
    pub delay: u16,
    pub connection_id: Option<&'static str>,
    pub parts: Vec<PartSpec>,
}

impl Default for JourneySpec {
    fn default() -> Self {
        Self {
            service_days: "",
            bit_base: 0,
            bits: vec![0x80],
            changes: 0,
            duration: ABSENT,
            realtime_status: 0,
            delay: ABSENT,
            connection_id: None,
            parts: vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Fixture {
    pub version: u16,
    /// Days since 1980-01-01.
    pub date: u16,
    pub origin: &'static str,
    pub target: &'static str,
    /// Name, external id, longitude and latitude in microdegrees.
    pub stations: Vec<(&'static str, u32, i32, i32)>,
    pub journeys: Vec<JourneySpec>,
    /// Overrides the journey count in the file header.
    pub declared_journeys: Option<u16>,
    pub error_code: u16,
    pub encoding: &'static str,
    pub extension_length: u32,
    pub details_version: u16,
    pub stop_stride: u16,
    pub omit_details: bool,
    /// Overrides the string table position in the file header.
    pub strings_position: Option<u32>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            version: 6,
            // 2024-03-15
            date: 16_145,
            origin: "Origin",
            target: "Target",
            stations: vec![],
            journeys: vec![],
            declared_journeys: None,
            error_code: 0,
            encoding: "iso-8859-1",
            extension_length: 0x30,
            details_version: 1,
            stop_stride: 26,
            omit_details: false,
            strings_position: None,
        }
    }
}

struct Pool {
    bytes: Vec<u8>,
    encoding: &'static Encoding,
}

impl Pool {
    fn add(&mut self, s: &str) -> u16 {
        if s.is_empty() {
            return 0;
        }

        let offset = self.bytes.len() as u16;
        let (encoded, _, _) = self.encoding.encode(s);
        self.bytes.extend_from_slice(&encoded);
        self.bytes.push(0);
        offset
    }
}

fn u16be(r: &mut Vec<u8>, v: u16) {
    r.extend_from_slice(&v.to_be_bytes());
}

fn u32be(r: &mut Vec<u8>, v: u32) {
    r.extend_from_slice(&v.to_be_bytes());
}

fn i32be(r: &mut Vec<u8>, v: i32) {
    r.extend_from_slice(&v.to_be_bytes());
}

/// Append an attribute chain, returning its index in words.
fn chain(attributes: &mut Vec<u8>, pool: &mut Pool, pairs: &[(&str, &str)]) -> u16 {
    if pairs.is_empty() {
        return 0;
    }

    let index = (attributes.len() / 4) as u16;
    for (key, value) in pairs {
        u16be(attributes, pool.add(key));
        u16be(attributes, pool.add(value));
    }
    attributes.extend_from_slice(&[0; 4]);
    index
}

fn comment_block(comments: &mut Vec<u8>, pool: &mut Pool, lines: &[&str]) -> u16 {
    if lines.is_empty() {
        return 0;
    }

    let offset = comments.len() as u16;
    u16be(comments, lines.len() as u16);
    for line in lines {
        u16be(comments, pool.add(line));
    }
    offset
}

impl Fixture {
    pub fn build(&self) -> Vec<u8> {
        let encoding = Encoding::for_label(self.encoding.as_bytes()).unwrap_or(WINDOWS_1252);
        let mut pool = Pool {
            bytes: vec![0],
            encoding,
        };

        let origin = pool.add(self.origin);
        let target = pool.add(self.target);
        let encoding_label = pool.add(self.encoding);
        let request_id = pool.add("req-1");

        let mut stations = Vec::new();
        for (name, id, longitude, latitude) in &self.stations {
            u16be(&mut stations, pool.add(name));
            u32be(&mut stations, *id);
            i32be(&mut stations, *longitude);
            i32be(&mut stations, *latitude);
        }

        let count = self.journeys.len();
        let index_len = 2 * count;

        let mut service_days = Vec::new();
        let mut comments = vec![0, 0];
        let mut attributes = vec![0; 4];
        let mut connection_index = Vec::new();
        let mut headers = Vec::new();
        let mut parts = Vec::new();
        let mut details_index = Vec::new();
        let mut details_body = Vec::new();
        let mut stops = Vec::new();
        let mut part_total = 0;
        let mut stop_total = 0u16;

        for journey in &self.journeys {
            let service_days_offset = service_days.len() as u16;
            u16be(&mut service_days, pool.add(journey.service_days));
            u16be(&mut service_days, journey.bit_base);
            u16be(&mut service_days, journey.bits.len() as u16);
            service_days.extend_from_slice(&journey.bits);

            let connection = match journey.connection_id {
                Some(id) => chain(&mut attributes, &mut pool, &[("ConnectionId", id)]),
                None => 0,
            };
            u16be(&mut connection_index, connection);

            u16be(&mut headers, service_days_offset);
            u32be(&mut headers, (12 * count + 20 * part_total) as u32);
            u16be(&mut headers, journey.parts.len() as u16);
            u16be(&mut headers, journey.changes);
            u16be(&mut headers, journey.duration);

            u16be(&mut details_index, (14 + index_len + details_body.len()) as u16);
            u16be(&mut details_body, journey.realtime_status);
            u16be(&mut details_body, journey.delay);

            for part in &journey.parts {
                part_total += 1;

                u16be(&mut parts, part.departure_time);
                u16be(&mut parts, part.departure_station);
                u16be(&mut parts, part.arrival_time);
                u16be(&mut parts, part.arrival_station);
                u16be(&mut parts, part.kind);
                u16be(&mut parts, pool.add(part.line));
                u16be(&mut parts, pool.add(part.departure_platform));
                u16be(&mut parts, pool.add(part.arrival_platform));
                u16be(&mut parts, chain(&mut attributes, &mut pool, &part.attributes));
                u16be(&mut parts, comment_block(&mut comments, &mut pool, &part.comments));

                u16be(&mut details_body, part.predicted_departure);
                u16be(&mut details_body, part.predicted_arrival);
                u16be(&mut details_body, pool.add(part.predicted_departure_platform));
                u16be(&mut details_body, pool.add(part.predicted_arrival_platform));
                u16be(&mut details_body, part.flags);
                u16be(&mut details_body, 0);
                u16be(&mut details_body, stop_total);
                u16be(&mut details_body, part.stops.len() as u16);

                for stop in &part.stops {
                    stop_total += 1;

                    u16be(&mut stops, stop.planned_departure);
                    u16be(&mut stops, stop.planned_arrival);
                    u16be(&mut stops, pool.add(stop.planned_departure_platform));
                    u16be(&mut stops, pool.add(stop.planned_arrival_platform));
                    u32be(&mut stops, 0);
                    u16be(&mut stops, stop.predicted_departure);
                    u16be(&mut stops, stop.predicted_arrival);
                    u16be(&mut stops, pool.add(stop.predicted_departure_platform));
                    u16be(&mut stops, pool.add(stop.predicted_arrival_platform));
                    u16be(&mut stops, stop.flags);
                    u16be(&mut stops, 0);
                    u16be(&mut stops, stop.station);
                }
            }
        }

        let mut details = Vec::new();
        u16be(&mut details, self.details_version);
        u16be(&mut details, 0);
        u16be(&mut details, 14);
        u16be(&mut details, 4);
        u16be(&mut details, 16);
        u16be(&mut details, self.stop_stride);
        u16be(&mut details, (14 + index_len + details_body.len()) as u16);
        details.extend_from_slice(&details_index);
        details.extend_from_slice(&details_body);
        details.extend_from_slice(&stops);

        let strings_position = 0x4a + headers.len() + parts.len();
        let service_days_position = strings_position + pool.bytes.len();
        let stations_position = service_days_position + service_days.len();
        let comments_position = stations_position + stations.len();
        let attributes_position = comments_position + comments.len();
        let connection_position = attributes_position + attributes.len();
        let details_position = connection_position + connection_index.len();
        let extension_position = details_position + details.len();

        let mut r = Vec::new();
        u16be(&mut r, self.version);
        for name in [origin, target] {
            u16be(&mut r, name);
            u16be(&mut r, 0);
            u16be(&mut r, 1);
            i32be(&mut r, 0);
            i32be(&mut r, 0);
        }
        u16be(&mut r, self.declared_journeys.unwrap_or(count as u16));
        u32be(&mut r, service_days_position as u32);
        u32be(&mut r, self.strings_position.unwrap_or(strings_position as u32));
        u16be(&mut r, self.date);
        u16be(&mut r, self.date);
        r.extend_from_slice(&[0; 10]);
        u32be(&mut r, stations_position as u32);
        u32be(&mut r, comments_position as u32);
        r.extend_from_slice(&[0; 8]);
        u32be(&mut r, extension_position as u32);
        assert_eq!(r.len(), 0x4a);

        r.extend_from_slice(&headers);
        r.extend_from_slice(&parts);
        r.extend_from_slice(&pool.bytes);
        r.extend_from_slice(&service_days);
        r.extend_from_slice(&stations);
        r.extend_from_slice(&comments);
        r.extend_from_slice(&attributes);
        r.extend_from_slice(&connection_index);
        r.extend_from_slice(&details);

        let details_pointer = if self.omit_details { 0 } else { details_position };
        let has_connections = self.journeys.iter().any(|j| j.connection_id.is_some());
        let connection_pointer = if has_connections { connection_position } else { 0 };

        u32be(&mut r, self.extension_length);
        u32be(&mut r, 0);
        u16be(&mut r, 1);
        u16be(&mut r, request_id);
        u32be(&mut r, details_pointer as u32);
        u16be(&mut r, self.error_code);
        r.extend_from_slice(&[0; 14]);
        u16be(&mut r, encoding_label);
        u16be(&mut r, 0);
        u32be(&mut r, 0);
        u32be(&mut r, attributes_position as u32);
        u32be(&mut r, connection_pointer as u32);

        r
    }
}

/// Three stations along a line, and a fourth nearby.
pub fn stations() -> Vec<(&'static str, u32, i32, i32)> {
    vec![
        ("Aachen Hbf", 8_000_001, 6_091_499, 50_767_800),
        ("Köln Hbf", 8_000_207, 6_958_730, 50_943_029),
        ("Köln Messe/Deutz", 8_003_368, 6_975_000, 50_940_871),
        ("Düsseldorf Hbf", 8_000_085, 6_794_316, 51_219_960),
    ]
}
