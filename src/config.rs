//! Provider-specific decoding options.

use encoding_rs::Encoding;

use crate::vehicle::VehicleType;

/// Product class bits most HAFAS providers share.
const DEFAULT_CLASSES: [(u32, VehicleType); 10] = [
    (1, VehicleType::HighSpeedTrain),
    (2, VehicleType::IntercityTrain),
    (4, VehicleType::InterregionalTrain),
    (8, VehicleType::RegionalTrain),
    (16, VehicleType::InterurbanTrain),
    (32, VehicleType::Bus),
    (64, VehicleType::Ferry),
    (128, VehicleType::Subway),
    (256, VehicleType::Tram),
    (512, VehicleType::Bus),
];

/// Options describing the provider a document came from.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Text encoding of the string table, overriding the document's own
    /// declaration.
    pub encoding: Option<&'static Encoding>,
    /// Vehicle type of parts no other rule resolves.
    pub default_vehicle_type: VehicleType,
    /// Vehicle types by HAFAS product class bit.
    pub classes: Vec<(u32, VehicleType)>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            encoding: None,
            default_vehicle_type: VehicleType::Unknown,
            classes: DEFAULT_CLASSES.to_vec(),
        }
    }
}

impl DecoderConfig {
    /// The defaults shared by most providers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode strings with `encoding`, whatever the document declares.
    pub fn with_encoding(self, encoding: &'static Encoding) -> Self {
        Self {
            encoding: Some(encoding),
            ..self
        }
    }

    /// Use `default_vehicle_type` for parts no other rule resolves.
    pub fn with_default_vehicle_type(self, default_vehicle_type: VehicleType) -> Self {
        Self {
            default_vehicle_type,
            ..self
        }
    }

    /// Replace the product class table.
    pub fn with_classes(self, classes: impl IntoIterator<Item = (u32, VehicleType)>) -> Self {
        Self {
            classes: classes.into_iter().collect(),
            ..self
        }
    }

    /// The vehicle type of a product class. A value with several bits set
    /// resolves through its lowest set bit.
    pub fn vehicle_for_class(&self, class: u32) -> Option<VehicleType> {
        let lookup = |bits| {
            self.classes
                .iter()
                .find(|(c, _)| *c == bits)
                .map(|(_, vehicle)| *vehicle)
        };

        lookup(class).or_else(|| match class {
            0 => None,
            class => lookup(1 << class.trailing_zeros()),
        })
    }
}
