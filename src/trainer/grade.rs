//! Answer quality grades attached to every puzzle choice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid quality grade: {0:?} (expected one of best, good, bad, worst)")]
pub struct InvalidGradeError(pub String);

/// Ordered worst < bad < good < best, so `Ord` follows answer quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QualityGrade {
    Worst,
    Bad,
    Good,
    Best,
}

impl QualityGrade {
    pub const ALL: [QualityGrade; 4] = [
        QualityGrade::Best,
        QualityGrade::Good,
        QualityGrade::Bad,
        QualityGrade::Worst,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QualityGrade::Best => "best",
            QualityGrade::Good => "good",
            QualityGrade::Bad => "bad",
            QualityGrade::Worst => "worst",
        }
    }

    pub fn is_best(self) -> bool {
        self == QualityGrade::Best
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityGrade {
    type Err = InvalidGradeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "best" => Ok(QualityGrade::Best),
            "good" => Ok(QualityGrade::Good),
            "bad" => Ok(QualityGrade::Bad),
            "worst" => Ok(QualityGrade::Worst),
            _ => Err(InvalidGradeError(raw.to_string())),
        }
    }
}

impl TryFrom<String> for QualityGrade {
    type Error = InvalidGradeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualityGrade> for String {
    fn from(value: QualityGrade) -> Self {
        value.as_str().to_string()
    }
}
