//! Risk categories and cleanup of the free-text `RiskLevel` column.
//!
//! Cleanup runs in two stages: missing entries are first filled with the most
//! frequent raw value, then every value is trimmed, capitalized and mapped.
//! Anything that still fails to map lands in [`RiskCategory::Low`].

use std::collections::BTreeMap;
use std::fmt;

/// Header of the target column in uploaded files.
pub const RISK_LEVEL_COLUMN: &str = "RiskLevel";

/// Three-level risk category predicted by the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskCategory {
    /// Unmapped and missing labels also land here.
    #[default]
    Low,
    Mid,
    High,
}

impl RiskCategory {
    /// All categories ordered by class code.
    pub const ALL: [RiskCategory; 3] = [RiskCategory::Low, RiskCategory::Mid, RiskCategory::High];

    /// Number of distinct categories.
    pub const COUNT: usize = Self::ALL.len();

    /// Integer class code used by the classifiers.
    pub fn code(self) -> usize {
        match self {
            RiskCategory::Low => 0,
            RiskCategory::Mid => 1,
            RiskCategory::High => 2,
        }
    }

    /// Decode a class code; `None` for anything outside `0..=2`.
    pub fn from_code(code: usize) -> Option<Self> {
        Self::ALL.get(code).copied()
    }

    /// Display string shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk",
            RiskCategory::Mid => "Mid Risk",
            RiskCategory::High => "High Risk",
        }
    }

    /// Map an already trimmed and capitalized value.
    fn from_capitalized(value: &str) -> Option<Self> {
        match value {
            "Low risk" => Some(RiskCategory::Low),
            "Mid risk" => Some(RiskCategory::Mid),
            "High risk" => Some(RiskCategory::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cleaned target column plus counts of the values that needed defaulting.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLabels {
    /// One category per input row.
    pub categories: Vec<RiskCategory>,
    /// Missing entries replaced by the column mode before mapping.
    pub mode_filled: usize,
    /// Entries that did not map (or stayed missing) and became `Low`.
    pub defaulted: usize,
}

/// Clean a raw `RiskLevel` column into categories with no gaps.
pub fn normalize_risk_levels(raw: &[Option<&str>]) -> NormalizedLabels {
    let mode = column_mode(raw);
    let mut mode_filled = 0usize;
    let mut defaulted = 0usize;
    let categories = raw
        .iter()
        .map(|value| {
            let filled = match (value, mode) {
                (Some(value), _) => Some(*value),
                (None, Some(mode)) => {
                    mode_filled += 1;
                    Some(mode)
                }
                (None, None) => None,
            };
            match filled.and_then(map_risk_level) {
                Some(category) => category,
                None => {
                    defaulted += 1;
                    RiskCategory::default()
                }
            }
        })
        .collect();
    NormalizedLabels {
        categories,
        mode_filled,
        defaulted,
    }
}

/// Trim, capitalize and map one raw value; `None` when it is not a known category.
pub fn map_risk_level(raw: &str) -> Option<RiskCategory> {
    RiskCategory::from_capitalized(&capitalize(raw.trim()))
}

/// Map one raw value, defaulting to `Low` when it does not match.
pub fn normalize_risk_level(raw: &str) -> RiskCategory {
    map_risk_level(raw).unwrap_or_default()
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Most frequent present value; ties go to the smallest value.
fn column_mode<'a>(raw: &[Option<&'a str>]) -> Option<&'a str> {
    let mut counts: BTreeMap<&'a str, usize> = BTreeMap::new();
    for value in raw.iter().flatten() {
        *counts.entry(*value).or_insert(0) += 1;
    }
    let mut best: Option<(&'a str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
