//! Insight types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The check that produced an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Mean inflation across the selected regions
    RegionalAverage,
    /// Region with the highest mean inflation
    GeographicPattern,
    /// Direction of the selected country's inflation over time
    CountryTrend,
    /// Countries above the high-inflation threshold
    HighInflation,
    /// Countries with negative inflation
    Deflation,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::RegionalAverage => "regional_average",
            InsightKind::GeographicPattern => "geographic_pattern",
            InsightKind::CountryTrend => "country_trend",
            InsightKind::HighInflation => "high_inflation",
            InsightKind::Deflation => "deflation",
        }
    }

    pub fn all() -> &'static [InsightKind] {
        &[
            InsightKind::RegionalAverage,
            InsightKind::GeographicPattern,
            InsightKind::CountryTrend,
            InsightKind::HighInflation,
            InsightKind::Deflation,
        ]
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regional_average" => Ok(InsightKind::RegionalAverage),
            "geographic_pattern" => Ok(InsightKind::GeographicPattern),
            "country_trend" => Ok(InsightKind::CountryTrend),
            "high_inflation" => Ok(InsightKind::HighInflation),
            "deflation" => Ok(InsightKind::Deflation),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational
    Info,
    /// Worth a closer look
    Attention,
    Warning,
    Alert,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Warning => "warning",
            Severity::Alert => "alert",
        }
    }

    /// Numeric priority (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Info => 1,
            Severity::Attention => 2,
            Severity::Warning => 3,
            Severity::Alert => 4,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Info => "💡",
            Severity::Attention => "🔎",
            Severity::Warning => "⚠️",
            Severity::Alert => "🚨",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "attention" => Ok(Severity::Attention),
            "warning" => Ok(Severity::Warning),
            "alert" => Ok(Severity::Alert),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Direction of a country's inflation between its earliest and latest years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increased,
    Decreased,
    Stable,
}

impl TrendDirection {
    /// Classify by comparing two means with a one-point dead band
    pub fn classify(earlier: f64, recent: f64) -> Self {
        if recent > earlier + 1.0 {
            TrendDirection::Increased
        } else if recent < earlier - 1.0 {
            TrendDirection::Decreased
        } else {
            TrendDirection::Stable
        }
    }

    /// Wording used in insight messages
    pub fn phrase(&self) -> &'static str {
        match self {
            TrendDirection::Increased => "increased",
            TrendDirection::Decreased => "decreased",
            TrendDirection::Stable => "remained relatively stable",
        }
    }
}

/// A single fact statement about the current selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Insight {
    pub fn new(
        kind: InsightKind,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            title: title.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}
