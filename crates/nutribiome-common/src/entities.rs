//! Closed vocabularies shared by the trait table, the nutrient model and the web layer.
//!
//! Both enums serialise to the exact names used in the input literature tables
//! (`"SCFA"`, `"pH_reduction"`, `"Vitamin_B12"`, ...). Parsing is case-insensitive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NutribiomeError;

// ── Functional traits ────────────────────────────────────────────────────────

/// Functional trait carried by a species (via its genus prior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Trait {
    /// Short-chain fatty acid production
    #[serde(rename = "SCFA")]
    Scfa,
    /// Luminal pH reduction
    #[serde(rename = "pH_reduction")]
    PhReduction,
    /// Epithelial barrier support
    #[serde(rename = "Barrier_support")]
    BarrierSupport,
    /// B-vitamin / folate biosynthesis
    #[serde(rename = "Vitamin_Biosynthesis")]
    VitaminBiosynthesis,
    /// Iron-scavenging siderophore production
    #[serde(rename = "Siderophore")]
    Siderophore,
}

impl Trait {
    pub const ALL: [Trait; 5] = [
        Trait::Scfa,
        Trait::PhReduction,
        Trait::BarrierSupport,
        Trait::VitaminBiosynthesis,
        Trait::Siderophore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trait::Scfa => "SCFA",
            Trait::PhReduction => "pH_reduction",
            Trait::BarrierSupport => "Barrier_support",
            Trait::VitaminBiosynthesis => "Vitamin_Biosynthesis",
            Trait::Siderophore => "Siderophore",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trait {
    type Err = NutribiomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Trait::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| NutribiomeError::UnknownTrait(s.to_string()))
    }
}

// ── Nutrients ────────────────────────────────────────────────────────────────

/// Nutrient whose absorption is scored. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nutrient {
    Iron,
    #[serde(rename = "Vitamin_B12")]
    VitaminB12,
    Folate,
    Calcium,
    Magnesium,
    Zinc,
}

impl Nutrient {
    pub const ALL: [Nutrient; 6] = [
        Nutrient::Iron,
        Nutrient::VitaminB12,
        Nutrient::Folate,
        Nutrient::Calcium,
        Nutrient::Magnesium,
        Nutrient::Zinc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Iron => "Iron",
            Nutrient::VitaminB12 => "Vitamin_B12",
            Nutrient::Folate => "Folate",
            Nutrient::Calcium => "Calcium",
            Nutrient::Magnesium => "Magnesium",
            Nutrient::Zinc => "Zinc",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nutrient {
    type Err = NutribiomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Nutrient::ALL
            .iter()
            .copied()
            .find(|n| n.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| NutribiomeError::UnknownNutrient(s.to_string()))
    }
}
