//! Memo generation preferences.
//!
//! Preferences are typed configuration: enumerated tone/length/audience/format
//! plus a list of weighted sections. Section weights are validated at
//! construction so an out-of-range weight never reaches a prompt.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Audience, ExportFormat, MemoLength, Tone};
use crate::errors::CoreError;

/// Highest importance a section can carry.
pub const MAX_SECTION_WEIGHT: u8 = 25;
/// Lowest importance an enabled section can carry.
pub const MIN_ENABLED_WEIGHT: u8 = 1;

/// One memo section with its relative importance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SectionWeight {
    pub name: String,
    pub weight: u8,
    pub enabled: bool,
}

impl SectionWeight {
    /// Build a validated section.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an empty name, a weight above 25,
    /// or an enabled section with weight 0.
    pub fn new(name: impl Into<String>, weight: u8, enabled: bool) -> Result<Self, CoreError> {
        let section = Self {
            name: name.into(),
            weight,
            enabled,
        };
        section.validate()?;
        Ok(section)
    }

    /// Check the range rules on an already-built section.
    ///
    /// # Errors
    ///
    /// Same rules as [`SectionWeight::new`].
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("section name must not be empty".into()));
        }
        if self.weight > MAX_SECTION_WEIGHT {
            return Err(CoreError::Validation(format!(
                "section '{}' weight {} exceeds {MAX_SECTION_WEIGHT}",
                self.name, self.weight
            )));
        }
        if self.enabled && self.weight < MIN_ENABLED_WEIGHT {
            return Err(CoreError::Validation(format!(
                "enabled section '{}' needs a weight between {MIN_ENABLED_WEIGHT} and {MAX_SECTION_WEIGHT}",
                self.name
            )));
        }
        Ok(())
    }
}

const DEFAULT_SECTIONS: &[(&str, u8, bool)] = &[
    ("Executive Summary", 25, true),
    ("Objective of the Memo", 15, true),
    ("Problem Statement", 20, true),
    ("Solution Description", 20, true),
    ("Business Overview (Model, Plan, Product-Market Fit)", 18, true),
    ("Market Analysis (TAM, SAM, SOM, Trends)", 22, true),
    ("Competitive Landscape (Competitors, SWOT, Differentiation)", 20, true),
    ("Product Development Status (Roadmap, Milestones)", 15, true),
    ("Sales & Distribution (GTM Strategy, CAC, LTV)", 15, true),
    ("Key Metrics & Financials (Growth, Projections, Burn Rate)", 18, true),
    ("Management Team (Founders, Executives, Advisors)", 22, true),
    ("Investment Thesis", 25, true),
    ("Strategic Fit", 12, true),
    ("Risks and Mitigation", 16, true),
    ("Valuation and Deal Structure", 10, true),
    ("Exit Strategies", 10, true),
    ("Screening Report (Red Flags, Green Flags, AI Confidence)", 25, true),
    ("Investment Score", 0, false),
];

/// The standard investment memo outline.
#[must_use]
pub fn default_sections() -> Vec<SectionWeight> {
    DEFAULT_SECTIONS
        .iter()
        .map(|&(name, weight, enabled)| SectionWeight {
            name: name.to_string(),
            weight,
            enabled,
        })
        .collect()
}

/// Preferences for the investment memo stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MemoPreferences {
    pub tone: Tone,
    pub length: MemoLength,
    pub custom_instructions: String,
    pub sections: Vec<SectionWeight>,
}

impl Default for MemoPreferences {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            length: MemoLength::default(),
            custom_instructions: String::new(),
            sections: default_sections(),
        }
    }
}

impl MemoPreferences {
    /// Sections that will be requested from the model, in outline order.
    pub fn enabled_sections(&self) -> impl Iterator<Item = &SectionWeight> {
        self.sections.iter().filter(|s| s.enabled)
    }

    /// Validate every section plus set-level rules.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` on the first broken rule: an invalid
    /// section, a duplicate section name, or no enabled section at all.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = std::collections::HashSet::new();
        for section in &self.sections {
            section.validate()?;
            if !seen.insert(section.name.to_lowercase()) {
                return Err(CoreError::Validation(format!(
                    "duplicate section '{}'",
                    section.name
                )));
            }
        }
        if self.enabled_sections().next().is_none() {
            return Err(CoreError::Validation(
                "at least one section must be enabled".into(),
            ));
        }
        Ok(())
    }

    /// Set the weight of a named section, enabling it.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown section and
    /// `CoreError::Validation` for an out-of-range weight.
    pub fn set_weight(&mut self, name: &str, weight: u8) -> Result<(), CoreError> {
        let section = self.section_mut(name)?;
        let candidate = SectionWeight::new(section.name.clone(), weight, true)?;
        *section = candidate;
        Ok(())
    }

    /// Toggle whether a named section is requested.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown section. Enabling a
    /// section with weight 0 bumps it to the minimum weight.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), CoreError> {
        let section = self.section_mut(name)?;
        section.enabled = enabled;
        if enabled && section.weight < MIN_ENABLED_WEIGHT {
            section.weight = MIN_ENABLED_WEIGHT;
        }
        Ok(())
    }

    fn section_mut(&mut self, name: &str) -> Result<&mut SectionWeight, CoreError> {
        self.sections
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::not_found("section", name))
    }
}

/// Preferences for the curated memo stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CuratedPreferences {
    pub audience: Audience,
    pub format: ExportFormat,
    pub custom_instructions: String,
}
