use serde::Serialize;

/// Floor of the "good" performance band.
pub const GOOD_FLOOR: f64 = 80.0;
/// Floor of the "fair" performance band.
pub const FAIR_FLOOR: f64 = 50.0;

/// A percentage in [0, 100].
///
/// Zero denominators and non-finite upstream values collapse to 0 so that
/// NaN or Infinity never reaches a table cell or an exported row. The raw
/// fractional value is kept; rounding happens only at display time so that
/// ranking never ties two records that merely round to the same integer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Rate(f64);

impl Rate {
    pub const ZERO: Self = Rate(0.0);

    /// Percentage of `numerator` over `denominator`; 0 when the
    /// denominator is 0.
    pub fn from_counts(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            return Self::ZERO;
        }
        Self::from_percent(numerator as f64 / denominator as f64 * 100.0)
    }

    /// Wrap a percentage that arrived pre-aggregated from upstream.
    pub fn from_percent(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Rate(value.clamp(0.0, 100.0))
    }

    /// Unrounded value for sorting and ranking.
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Rounded half-up to the nearest whole percent.
    pub fn display(self) -> u32 {
        self.0.round() as u32
    }

    /// One-decimal rendering used by report columns.
    pub fn one_decimal(self) -> String {
        format!("{:.1}", self.0)
    }

    pub fn band(self) -> ScoreBand {
        ScoreBand::classify(self.0)
    }
}

/// Shorthand for [`Rate::from_counts`].
pub fn rate(numerator: u64, denominator: u64) -> Rate {
    Rate::from_counts(numerator, denominator)
}

/// Color band for a score or rate. Thresholds are fixed, not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn classify(value: f64) -> Self {
        if value >= GOOD_FLOOR {
            Self::Good
        } else if value >= FAIR_FLOOR {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Thousands-grouped rendering for count columns and dashboard cards.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
