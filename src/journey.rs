//! Decoded journeys.
//!
//! A [`Journey`] is one itinerary from the requested origin to the requested
//! target, made of one or more [`RoutePart`]s. Each part carries planned and
//! predicted (realtime) values side by side; accessors on [`Event`] pick the
//! predicted value when one was published.
//!
//! The `route_*` accessors on [`Journey`] flatten the parts into parallel
//! per-part sequences. Their delay variants report unknown delays as
//! [`UNKNOWN_DELAY`].

use chrono::NaiveDateTime;

use crate::vehicle::VehicleType;

/// Delay reported by the flattened `route_*` accessors when no prediction exists.
pub const UNKNOWN_DELAY: i64 = -1;

/// A stop, as stored in the station table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Stop {
    pub name: String,
    /// Provider-specific station number.
    pub external_id: u32,
    /// Degrees east.
    pub longitude: f64,
    /// Degrees north.
    pub latitude: f64,
}

/// A departure or arrival at a stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Event {
    pub planned: Option<NaiveDateTime>,
    /// `None` when no realtime update was published.
    pub predicted: Option<NaiveDateTime>,
    pub planned_platform: String,
    /// Empty when no realtime update was published.
    pub predicted_platform: String,
}

impl Event {
    /// The predicted time, falling back to the planned time.
    pub fn time(&self) -> Option<NaiveDateTime> {
        self.predicted.or(self.planned)
    }

    /// Minutes between the planned and predicted times, if both are known.
    pub fn delay_minutes(&self) -> Option<i64> {
        Some((self.predicted? - self.planned?).num_minutes())
    }

    /// The predicted platform, falling back to the planned platform.
    pub fn platform(&self) -> &str {
        if self.predicted_platform.is_empty() {
            &self.planned_platform
        } else {
            &self.predicted_platform
        }
    }

    /// Whether a predicted platform was published that differs from the plan.
    pub fn platform_changed(&self) -> bool {
        !self.predicted_platform.is_empty() && self.predicted_platform != self.planned_platform
    }
}

/// An intermediate stop of a journey part.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SubJourneyStop {
    pub stop: Stop,
    pub arrival: Event,
    pub departure: Event,
    pub arrival_cancelled: bool,
    pub departure_cancelled: bool,
}

/// One leg of a journey, on a single vehicle or on foot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoutePart {
    pub departure_stop: Stop,
    pub arrival_stop: Stop,
    pub vehicle_type: VehicleType,
    pub transport_line: String,
    pub departure: Event,
    pub arrival: Event,
    pub departure_cancelled: bool,
    pub arrival_cancelled: bool,
    /// Provider comments and platform change notes, one per line.
    pub news: String,
    /// Stops strictly between the departure and arrival stops.
    pub sub_journey: Vec<SubJourneyStop>,
}

/// A complete itinerary from origin to target.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Journey {
    /// The provider's connection identifier, when published.
    pub external_id: Option<String>,
    pub start_stop_name: String,
    pub target_stop_name: String,
    /// Planned departure of the first part.
    pub departure_date_time: Option<NaiveDateTime>,
    /// Planned arrival of the last part.
    pub arrival_date_time: Option<NaiveDateTime>,
    pub duration_minutes: Option<u32>,
    pub changes: u16,
    /// `None` when the provider reported no delay information.
    pub delay_minutes: Option<i32>,
    pub cancelled: bool,
    /// Service-day description and cancellation notes, one per line.
    pub journey_news: String,
    pub parts: Vec<RoutePart>,
}

impl Journey {
    /// Departure stop of every part, followed by the requested target.
    ///
    /// The last entry is [`target_stop_name`](Self::target_stop_name), which
    /// may name an address rather than the last part's arrival station. Use
    /// [`RoutePart::arrival_stop`] for the station itself.
    pub fn route_stops(&self) -> Vec<&str> {
        self.parts
            .iter()
            .map(|p| p.departure_stop.name.as_str())
            .chain([self.target_stop_name.as_str()])
            .collect()
    }

    /// Line of every part, e.g. `"RE 1"`.
    pub fn route_transport_lines(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.transport_line.as_str()).collect()
    }

    /// Vehicle type of every part.
    pub fn route_types_of_vehicles(&self) -> Vec<VehicleType> {
        self.parts.iter().map(|p| p.vehicle_type).collect()
    }

    /// Departure time of every part, predicted where published.
    pub fn route_times_departure(&self) -> Vec<Option<NaiveDateTime>> {
        self.parts.iter().map(|p| p.departure.time()).collect()
    }

    /// Departure delays in minutes, with unknown delays as [`UNKNOWN_DELAY`].
    ///
    /// A departure one minute early also reads as `-1`. Use
    /// [`Event::delay_minutes`] to tell the two apart.
    pub fn route_times_departure_delay(&self) -> Vec<i64> {
        self.parts
            .iter()
            .map(|p| p.departure.delay_minutes().unwrap_or(UNKNOWN_DELAY))
            .collect()
    }

    /// Arrival time of every part, predicted where published.
    pub fn route_times_arrival(&self) -> Vec<Option<NaiveDateTime>> {
        self.parts.iter().map(|p| p.arrival.time()).collect()
    }

    /// Arrival delays in minutes, with unknown delays as [`UNKNOWN_DELAY`].
    ///
    /// As with departures, an arrival one minute early also reads as `-1`.
    pub fn route_times_arrival_delay(&self) -> Vec<i64> {
        self.parts
            .iter()
            .map(|p| p.arrival.delay_minutes().unwrap_or(UNKNOWN_DELAY))
            .collect()
    }

    /// Departure platform of every part, predicted where published.
    pub fn route_platforms_departure(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.departure.platform()).collect()
    }

    /// Arrival platform of every part, predicted where published.
    pub fn route_platforms_arrival(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.arrival.platform()).collect()
    }

    /// Comments and platform notes of every part.
    pub fn route_news(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.news.as_str()).collect()
    }

    /// Intermediate stops of every part.
    pub fn route_sub_journeys(&self) -> Vec<&[SubJourneyStop]> {
        self.parts.iter().map(|p| p.sub_journey.as_slice()).collect()
    }

    /// The journey delay, with unknown delays reported as [`UNKNOWN_DELAY`].
    pub fn delay_or_unknown(&self) -> i64 {
        self.delay_minutes.map_or(UNKNOWN_DELAY, i64::from)
    }
}
