use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Requested historical window for the time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Range {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl Range {
    pub const ALL: [Self; 8] = [
        Self::OneDay,
        Self::FiveDays,
        Self::OneMonth,
        Self::SixMonths,
        Self::YearToDate,
        Self::OneYear,
        Self::FiveYears,
        Self::Max,
    ];

    /// Query-parameter form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1m",
            Self::SixMonths => "6m",
            Self::YearToDate => "ytd",
            Self::OneYear => "1y",
            Self::FiveYears => "5y",
            Self::Max => "max",
        }
    }

    /// Tab-label form shown by the render layer.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneDay => "1D",
            Self::FiveDays => "5D",
            Self::OneMonth => "1M",
            Self::SixMonths => "6M",
            Self::YearToDate => "YTD",
            Self::OneYear => "1Y",
            Self::FiveYears => "5Y",
            Self::Max => "MAX",
        }
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Range {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Self::OneDay),
            "5d" => Ok(Self::FiveDays),
            "1m" => Ok(Self::OneMonth),
            "6m" => Ok(Self::SixMonths),
            "ytd" => Ok(Self::YearToDate),
            "1y" => Ok(Self::OneYear),
            "5y" => Ok(Self::FiveYears),
            "max" => Ok(Self::Max),
            other => Err(ValidationError::InvalidRange {
                value: other.to_owned(),
            }),
        }
    }
}

/// Whether chart values are expressed as absolute price or percent change.
///
/// A closed enum on purpose: it drives both the fetch key and the display
/// formatter, so there is no string comparison scattered through rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Price,
    Percent,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Percent => "percent",
        }
    }

    /// Format a chart value for display under this mode.
    pub fn format_value(self, value: f64) -> String {
        match self {
            Self::Price => format!("${value:.2}"),
            Self::Percent => format!("{value:.2}%"),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(Self::Price),
            "percent" => Ok(Self::Percent),
            other => Err(ValidationError::InvalidMode {
                value: other.to_owned(),
            }),
        }
    }
}

/// Holds the user's current range and mode selection.
///
/// Setters report whether the value actually changed; a no-op set must not
/// trigger a redundant fetch upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeModeSelector {
    range: Range,
    mode: Mode,
}

impl RangeModeSelector {
    pub const fn new(range: Range, mode: Mode) -> Self {
        Self { range, mode }
    }

    pub fn set_range(&mut self, range: Range) -> bool {
        if self.range == range {
            return false;
        }
        self.range = range;
        true
    }

    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        true
    }

    pub const fn current(&self) -> (Range, Mode) {
        (self.range, self.mode)
    }

    pub const fn range(&self) -> Range {
        self.range
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }
}
