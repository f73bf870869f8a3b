//! Vehicle types and their lookup from provider names.

use tracing::warn;

use crate::{config::DecoderConfig, sans::attributes::Attributes};

/// Part type flag marking a footway between stops.
pub const FOOTWAY: u16 = 1;

/// The kind of vehicle serving a journey part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum VehicleType {
    #[default]
    Unknown,
    Tram,
    Bus,
    Subway,
    InterurbanTrain,
    Metro,
    TrolleyBus,
    RegionalTrain,
    RegionalExpressTrain,
    InterregionalTrain,
    IntercityTrain,
    HighSpeedTrain,
    Feet,
    Ferry,
    Ship,
    Plane,
}

/// Product names and abbreviations used by HAFAS providers, lowercase.
const NAMES: &[(&str, VehicleType)] = &[
    ("ice", VehicleType::HighSpeedTrain),
    ("tgv", VehicleType::HighSpeedTrain),
    ("thalys", VehicleType::HighSpeedTrain),
    ("rj", VehicleType::HighSpeedTrain),
    ("rjx", VehicleType::HighSpeedTrain),
    ("railjet", VehicleType::HighSpeedTrain),
    ("ic", VehicleType::IntercityTrain),
    ("ec", VehicleType::IntercityTrain),
    ("icn", VehicleType::IntercityTrain),
    ("en", VehicleType::IntercityTrain),
    ("cnl", VehicleType::IntercityTrain),
    ("nj", VehicleType::IntercityTrain),
    ("ir", VehicleType::InterregionalTrain),
    ("ire", VehicleType::InterregionalTrain),
    ("d", VehicleType::InterregionalTrain),
    ("re", VehicleType::RegionalExpressTrain),
    ("rex", VehicleType::RegionalExpressTrain),
    ("rb", VehicleType::RegionalTrain),
    ("r", VehicleType::RegionalTrain),
    ("regio", VehicleType::RegionalTrain),
    ("s", VehicleType::InterurbanTrain),
    ("sbahn", VehicleType::InterurbanTrain),
    ("s-bahn", VehicleType::InterurbanTrain),
    ("u", VehicleType::Subway),
    ("ubahn", VehicleType::Subway),
    ("u-bahn", VehicleType::Subway),
    ("m", VehicleType::Metro),
    ("metro", VehicleType::Metro),
    ("str", VehicleType::Tram),
    ("tram", VehicleType::Tram),
    ("stb", VehicleType::Tram),
    ("bus", VehicleType::Bus),
    ("nbus", VehicleType::Bus),
    ("ast", VehicleType::Bus),
    ("ruf", VehicleType::Bus),
    ("obus", VehicleType::TrolleyBus),
    ("trolleybus", VehicleType::TrolleyBus),
    ("fähre", VehicleType::Ferry),
    ("fäh", VehicleType::Ferry),
    ("ferry", VehicleType::Ferry),
    ("schiff", VehicleType::Ship),
    ("ship", VehicleType::Ship),
    ("fussweg", VehicleType::Feet),
    ("fußweg", VehicleType::Feet),
    ("walk", VehicleType::Feet),
    ("flug", VehicleType::Plane),
    ("plane", VehicleType::Plane),
];

impl VehicleType {
    /// Look up a product name or abbreviation, ignoring case and surrounding
    /// whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();

        NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, vehicle)| *vehicle)
    }

    /// Whether any rule resolved the type.
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    /// Whether the vehicle is a train of any class, from S-Bahn up.
    pub fn is_train(self) -> bool {
        matches!(
            self,
            Self::InterurbanTrain
                | Self::RegionalTrain
                | Self::RegionalExpressTrain
                | Self::InterregionalTrain
                | Self::IntercityTrain
                | Self::HighSpeedTrain
        )
    }
}

/// The leading run of alphabetic characters, e.g. `"ICE"` for `"ICE 578"`.
pub fn alphabetic_prefix(s: &str) -> &str {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_alphabetic())
        .map_or(s.len(), |(i, _)| i);
    &s[..end]
}

/// Resolve the vehicle type of a journey part.
///
/// Tries, in order: the footway flag, the vehicle name, the part's
/// `Operator`, `Category` and `Class` attributes, the alphabetic prefix of the
/// vehicle name, and finally the provider default.
pub fn resolve(
    kind: u16,
    name: &str,
    attributes: &Attributes,
    config: &DecoderConfig,
) -> VehicleType {
    if kind == FOOTWAY {
        return VehicleType::Feet;
    }

    let vehicle = VehicleType::from_name(name)
        .or_else(|| {
            ["Operator", "Category"]
                .into_iter()
                .filter_map(|key| attributes.get(key))
                .find_map(VehicleType::from_name)
        })
        .or_else(|| {
            let class = attributes.get("Class")?.trim().parse().ok()?;
            config.vehicle_for_class(class)
        })
        .or_else(|| VehicleType::from_name(alphabetic_prefix(name)))
        .unwrap_or(config.default_vehicle_type);

    if !vehicle.is_known() {
        warn!(name, kind, "unresolved vehicle type");
    }

    vehicle
}
