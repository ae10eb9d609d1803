//! Maps an overall impact score onto one of six ordered interpretation bands.

use serde::{Serialize, Serializer};

/// Interpretation bands, lowest to highest.
///
/// Boundaries are closed at the bottom: -7, -3, 0, 3 and 7 each belong to
/// the band above them. Scores outside [-10, 10] land in the extreme bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Interpretation {
    VeryNegative,
    Negative,
    SlightlyNegative,
    NeutralToSlightlyPositive,
    Positive,
    VeryPositive,
}

impl Interpretation {
    pub fn classify(score: f64) -> Self {
        if score < -7.0 {
            Interpretation::VeryNegative
        } else if score < -3.0 {
            Interpretation::Negative
        } else if score < 0.0 {
            Interpretation::SlightlyNegative
        } else if score < 3.0 {
            Interpretation::NeutralToSlightlyPositive
        } else if score < 7.0 {
            Interpretation::Positive
        } else {
            Interpretation::VeryPositive
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Interpretation::VeryNegative => "very negative impact on operations and efficiency",
            Interpretation::Negative => "negative impact on operations and efficiency",
            Interpretation::SlightlyNegative => {
                "slightly negative impact on operations and efficiency"
            }
            Interpretation::NeutralToSlightlyPositive => {
                "neutral to slightly positive impact on operations and efficiency"
            }
            Interpretation::Positive => "positive impact on operations and efficiency",
            Interpretation::VeryPositive => "very positive impact on operations and efficiency",
        }
    }
}

impl Serialize for Interpretation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
