use serde::{Deserialize, Serialize};

/// Conventional bands used when describing a score to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRange {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl ScoreRange {
    pub const fn from_score(score: u16) -> Self {
        match score {
            800.. => Self::Excellent,
            740..=799 => Self::VeryGood,
            670..=739 => Self::Good,
            580..=669 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent (800-850)",
            Self::VeryGood => "Very Good (740-799)",
            Self::Good => "Good (670-739)",
            Self::Fair => "Fair (580-669)",
            Self::Poor => "Poor (300-579)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(ScoreRange::from_score(850), ScoreRange::Excellent);
        assert_eq!(ScoreRange::from_score(800), ScoreRange::Excellent);
        assert_eq!(ScoreRange::from_score(799), ScoreRange::VeryGood);
        assert_eq!(ScoreRange::from_score(740), ScoreRange::VeryGood);
        assert_eq!(ScoreRange::from_score(739), ScoreRange::Good);
        assert_eq!(ScoreRange::from_score(670), ScoreRange::Good);
        assert_eq!(ScoreRange::from_score(669), ScoreRange::Fair);
        assert_eq!(ScoreRange::from_score(580), ScoreRange::Fair);
        assert_eq!(ScoreRange::from_score(579), ScoreRange::Poor);
        assert_eq!(ScoreRange::from_score(0), ScoreRange::Poor);
    }

    #[test]
    fn labels_include_bounds() {
        assert_eq!(ScoreRange::Good.label(), "Good (670-739)");
        assert_eq!(ScoreRange::Poor.label(), "Poor (300-579)");
    }
}
