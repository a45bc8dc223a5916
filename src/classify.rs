//! Classification of migration intensity values into visual encodings.
//!
//! Every intensity value maps to exactly one [`FlowClass`], which determines the colour and stroke
//! width used to draw a flow between two cities. Values which fall outside the defined bins
//! (including negative values and NaN) are assigned to [`FlowClass::Undefined`] rather than
//! treated as errors, so that a single bad value never prevents a map from being drawn.
use derive_more::Display;
use serde_string_enum::DeserializeLabeledStringEnum;
use strum::EnumIter;

/// The upper bound of the highest defined bin. Values at or above it are undefined.
pub const MAX_DEFINED_INTENSITY: f64 = 9000.0;

/// The bins for defined classes: (lower bound, upper bound, class)
const BINS: [(f64, f64, FlowClass); 4] = [
    (0.0, 300.0, FlowClass::Neutral),
    (300.0, 1000.0, FlowClass::Low),
    (1000.0, 2500.0, FlowClass::Medium),
    (2500.0, MAX_DEFINED_INTENSITY, FlowClass::High),
];

/// An RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Colour {
    const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The visual class of a migration flow
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum FlowClass {
    /// Flows of intensity 0-300
    #[display("neutral")]
    Neutral,
    /// Flows of intensity 300-1000
    #[display("low")]
    Low,
    /// Flows of intensity 1000-2500
    #[display("medium")]
    Medium,
    /// Flows of intensity 2500-9000
    #[display("high")]
    High,
    /// Flows whose intensity is outside all of the defined bins
    #[display("undefined")]
    Undefined,
}

impl FlowClass {
    /// The defined classes in ascending order of intensity, as shown in the legend
    pub const LEGEND: [FlowClass; 4] = [
        FlowClass::Neutral,
        FlowClass::Low,
        FlowClass::Medium,
        FlowClass::High,
    ];

    /// The colour used to draw flows of this class
    pub fn colour(self) -> Colour {
        match self {
            Self::Neutral => Colour::new(211, 211, 211), // lightgrey
            Self::Low => Colour::new(144, 238, 144),     // lightgreen
            Self::Medium => Colour::new(255, 165, 0),    // orange
            Self::High => Colour::new(255, 0, 0),        // red
            Self::Undefined => Colour::new(128, 128, 128),
        }
    }

    /// The stroke width used to draw flows of this class
    pub fn width(self) -> f64 {
        match self {
            Self::Neutral => 0.3,
            Self::Low => 1.5,
            Self::Medium => 2.0,
            Self::High => 2.5,
            Self::Undefined => 0.5,
        }
    }

    /// The legend label for this class, or `None` if the class has no legend entry
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Neutral => Some("0-300"),
            Self::Low => Some("300-1000"),
            Self::Medium => Some("1000-2500"),
            Self::High => Some("2500-9000"),
            Self::Undefined => None,
        }
    }
}

/// Which end of each bin includes the threshold value.
///
/// The two conventions only disagree for values exactly equal to 300, 1000 or 2500.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, DeserializeLabeledStringEnum)]
pub enum BinEdges {
    /// Bins are `[lower, upper)`, so a threshold value belongs to the higher bin
    #[default]
    #[string = "lower_inclusive"]
    LowerInclusive,
    /// Bins are `(lower, upper]`, so a threshold value belongs to the lower bin
    #[string = "upper_inclusive"]
    UpperInclusive,
}

/// Classify a migration intensity value.
///
/// # Arguments
///
/// * `intensity` - The migration intensity
/// * `edges` - Which convention to use for values lying exactly on a threshold
pub fn classify(intensity: f64, edges: BinEdges) -> FlowClass {
    // NB: NaN is never contained in the range
    if !(0.0..MAX_DEFINED_INTENSITY).contains(&intensity) {
        return FlowClass::Undefined;
    }

    for (_, upper, class) in BINS {
        let in_bin = match edges {
            BinEdges::LowerInclusive => intensity < upper,
            BinEdges::UpperInclusive => intensity <= upper,
        };
        if in_bin {
            return class;
        }
    }

    FlowClass::Undefined
}

/// Whether the intensity falls inside one of the defined bins
pub fn is_defined(intensity: f64, edges: BinEdges) -> bool {
    classify(intensity, edges) != FlowClass::Undefined
}
