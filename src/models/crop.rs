//! Crop and severity enums

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal disease-impact tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
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
            "Low" => Ok(Severity::Low),
            "Medium" => Ok(Severity::Medium),
            "High" => Ok(Severity::High),
            "Critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Crop types accepted by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropType {
    Tomato,
    Potato,
    Pepper,
    Cucumber,
    Wheat,
    Rice,
    Corn,
    Bean,
    Other,
}

impl CropType {
    pub const ALL: [CropType; 9] = [
        CropType::Tomato,
        CropType::Potato,
        CropType::Pepper,
        CropType::Cucumber,
        CropType::Wheat,
        CropType::Rice,
        CropType::Corn,
        CropType::Bean,
        CropType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Tomato => "Tomato",
            CropType::Potato => "Potato",
            CropType::Pepper => "Pepper",
            CropType::Cucumber => "Cucumber",
            CropType::Wheat => "Wheat",
            CropType::Rice => "Rice",
            CropType::Corn => "Corn",
            CropType::Bean => "Bean",
            CropType::Other => "Other",
        }
    }
}

impl Default for CropType {
    fn default() -> Self {
        CropType::Other
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CropType {
    type Err = String;

    /// Exact, case-sensitive match on the crop name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CropType::ALL
            .iter()
            .copied()
            .find(|crop| crop.as_str() == s)
            .ok_or_else(|| format!("unknown crop type '{}'", s))
    }
}
