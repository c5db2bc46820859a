//! Funnel variants and their static metadata.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the two alternate onboarding funnels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowVariant {
    #[default]
    V1,
    V2,
}

/// Display metadata for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantInfo {
    pub name: &'static str,
    /// Total number of funnel steps.
    pub pages: u32,
    /// Informational bullet points for the developer panel.
    pub highlights: &'static [&'static str],
}

const V1_INFO: VariantInfo = VariantInfo {
    name: "Version 1 (Baseline)",
    pages: 37,
    highlights: &[
        "Original onboarding flow",
        "Standard question progression",
        "Classic value proposition",
    ],
};

const V2_INFO: VariantInfo = VariantInfo {
    name: "Version 2 (Optimized)",
    pages: 40,
    highlights: &[
        "Enhanced engagement mechanics",
        "Improved conversion funnel",
        "Personalized result presentation",
        "Additional soft commitment points",
    ],
};

impl FlowVariant {
    /// Every variant, in display order.
    pub const ALL: [FlowVariant; 2] = [FlowVariant::V1, FlowVariant::V2];

    pub fn info(self) -> &'static VariantInfo {
        match self {
            Self::V1 => &V1_INFO,
            Self::V2 => &V2_INFO,
        }
    }

    pub fn pages(self) -> u32 {
        self.info().pages
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl std::fmt::Display for FlowVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FlowVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(Error::UnknownVariant(other.to_string())),
        }
    }
}

/// A registry row: variant id plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct VariantEntry {
    pub id: FlowVariant,
    #[serde(flatten)]
    pub info: &'static VariantInfo,
}

/// The full registry, in display order.
pub fn all_variants() -> Vec<VariantEntry> {
    FlowVariant::ALL
        .into_iter()
        .map(|id| VariantEntry {
            id,
            info: id.info(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_counts() {
        assert_eq!(FlowVariant::V1.pages(), 37);
        assert_eq!(FlowVariant::V2.pages(), 40);
        assert_eq!(FlowVariant::default(), FlowVariant::V1);
    }

    #[test]
    fn highlights_are_listed() {
        assert_eq!(FlowVariant::V1.info().highlights.len(), 3);
        assert_eq!(FlowVariant::V2.info().highlights.len(), 4);
        assert!(FlowVariant::V2.info().name.contains("Optimized"));
    }

    #[test]
    fn parse_known_and_unknown_ids() {
        assert_eq!("v1".parse::<FlowVariant>().unwrap(), FlowVariant::V1);
        assert_eq!(" v2 ".parse::<FlowVariant>().unwrap(), FlowVariant::V2);
        assert!(matches!(
            "v3".parse::<FlowVariant>(),
            Err(Error::UnknownVariant(id)) if id == "v3"
        ));
        assert!("V1".parse::<FlowVariant>().is_err());
    }

    #[test]
    fn display_matches_serde() {
        for variant in FlowVariant::ALL {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(format!("\"{variant}\""), json);
        }
    }

    #[test]
    fn registry_entries_serialize_flat() {
        let json = serde_json::to_value(all_variants()).unwrap();
        assert_eq!(json[0]["id"], "v1");
        assert_eq!(json[0]["pages"], 37);
        assert_eq!(json[1]["id"], "v2");
        assert_eq!(json[1]["name"], "Version 2 (Optimized)");
        assert_eq!(json[1]["highlights"].as_array().unwrap().len(), 4);
    }
}
