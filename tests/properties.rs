mod fixture;

use bogie::{
    avec::{DecoderConfig, decode_journeys, slice::Error},
    journey::UNKNOWN_DELAY,
    sans::header::ProtocolError,
};
use fixture::{Fixture, JourneySpec, PartSpec, stations};
use proptest::prelude::*;

/// Planned times fall before noon and predictions after it, so a published
/// prediction never yields a delay equal to the sentinel.
fn hhmm() -> impl Strategy<Value = u16> {
    (0u16..12, 0u16..60).prop_map(|(h, m)| 100 * h + m)
}

fn prediction() -> impl Strategy<Value = u16> {
    prop_oneof![Just(0), (12u16..24, 0u16..60).prop_map(|(h, m)| 100 * h + m)]
}

prop_compose! {
    fn part()(
        departure_time in hhmm(),
        arrival_time in hhmm(),
        departure_station in 0u16..4,
        arrival_station in 0u16..4,
        predicted_departure in prediction(),
        predicted_arrival in prediction(),
    ) -> PartSpec {
        PartSpec {
            departure_time,
            departure_station,
            arrival_time,
            arrival_station,
            line: "RB#RB 33",
            predicted_departure,
            predicted_arrival,
            ..PartSpec::default()
        }
    }
}

fn build(journeys: Vec<JourneySpec>) -> Vec<u8> {
    Fixture {
        stations: stations(),
        journeys,
        ..Fixture::default()
    }
    .build()
}

proptest! {
    #[test]
    fn one_more_stop_than_parts(parts in prop::collection::vec(part(), 0..6)) {
        let names: Vec<_> = stations().into_iter().map(|(name, ..)| name).collect();
        let r = build(vec![JourneySpec { parts: parts.clone(), ..JourneySpec::default() }]);

        let journeys = decode_journeys(&r, &DecoderConfig::default()).unwrap();
        let stops = journeys[0].route_stops();

        prop_assert_eq!(stops.len(), parts.len() + 1);
        for (stop, part) in stops.iter().zip(&parts) {
            prop_assert_eq!(*stop, names[usize::from(part.departure_station)]);
        }
        prop_assert_eq!(stops[parts.len()], "Target");
    }

    #[test]
    fn unknown_delay_iff_no_prediction(parts in prop::collection::vec(part(), 1..6)) {
        let r = build(vec![JourneySpec { parts: parts.clone(), ..JourneySpec::default() }]);

        let journeys = decode_journeys(&r, &DecoderConfig::default()).unwrap();
        let departures = journeys[0].route_times_departure_delay();
        let arrivals = journeys[0].route_times_arrival_delay();

        for (i, part) in parts.iter().enumerate() {
            prop_assert_eq!(departures[i] == UNKNOWN_DELAY, part.predicted_departure == 0);
            prop_assert_eq!(arrivals[i] == UNKNOWN_DELAY, part.predicted_arrival == 0);
        }
    }

    #[test]
    fn error_codes_abort(code in 1u16..) {
        prop_assume!(code != 890);

        let r = Fixture {
            error_code: code,
            ..Fixture::default()
        }
        .build();

        match decode_journeys(&r, &DecoderConfig::default()) {
            Err(Error::Protocol(err)) => prop_assert_eq!(err, ProtocolError::from_code(code)),
            other => prop_assert!(false, "unexpected result {:?}", other),
        }
    }
}
