use serde::{Deserialize, Serialize};
use std::fmt;

pub const HIGH_CONFIDENCE_MIN: u8 = 80;
pub const MEDIUM_CONFIDENCE_MIN: u8 = 50;

/// One incident's normalized analysis, as every display panel reads it.
///
/// Built once by [`crate::transform`] and never patched afterwards; a new
/// analysis replaces the whole value. The three counts always equal the
/// lengths of the sequences they describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub incident_id: String,
    pub confidence: u8,
    pub confidence_label: ConfidenceLabel,
    pub steps_count: usize,
    pub factors_count: usize,
    pub fixes_count: usize,
    pub executive_summary: String,
    pub root_cause: String,
    pub root_cause_confidence: u8,
    pub contributing_factors: Vec<String>,
    pub symptoms: Vec<String>,
    pub causal_chain: Vec<CausalStep>,
    pub fixes: Vec<Fix>,
    pub reasoning_steps: Vec<ReasoningStep>,
}

impl AnalysisResult {
    pub fn counts_consistent(&self) -> bool {
        self.steps_count == self.reasoning_steps.len()
            && self.factors_count == self.contributing_factors.len()
            && self.fixes_count == self.fixes.len()
    }

    /// Fixes grouped for display: IMMEDIATE, then SHORT_TERM, then LONG_TERM.
    /// Empty groups are left out and input order is kept inside a group.
    pub fn fixes_by_priority(&self) -> Vec<(FixPriority, Vec<&Fix>)> {
        FixPriority::ALL
            .iter()
            .filter_map(|priority| {
                let group: Vec<&Fix> = self
                    .fixes
                    .iter()
                    .filter(|fix| fix.priority == *priority)
                    .collect();
                if group.is_empty() {
                    None
                } else {
                    Some((*priority, group))
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CausalStep {
    pub step_number: u32,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub event: String,
    pub service: String,
    pub confidence: u8,
    pub confidence_label: ConfidenceLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub priority: FixPriority,
    pub category: String,
    pub category_icon: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_steps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_impact: Option<String>,
}

impl Fix {
    pub fn has_details(&self) -> bool {
        self.implementation_steps.is_some() || self.expected_impact.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningStep {
    pub step_number: u32,
    pub title: String,
    pub conclusion: String,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

impl ConfidenceLabel {
    /// Threshold policy shared by every derived label.
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_CONFIDENCE_MIN {
            ConfidenceLabel::High
        } else if score >= MEDIUM_CONFIDENCE_MIN {
            ConfidenceLabel::Medium
        } else {
            ConfidenceLabel::Low
        }
    }

    /// Score used when a backend reports only a label.
    pub fn representative_score(self) -> u8 {
        match self {
            ConfidenceLabel::High => 90,
            ConfidenceLabel::Medium => 70,
            ConfidenceLabel::Low => 30,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Some(ConfidenceLabel::High),
            "MEDIUM" => Some(ConfidenceLabel::Medium),
            "LOW" => Some(ConfidenceLabel::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLabel::High => "HIGH",
            ConfidenceLabel::Medium => "MEDIUM",
            ConfidenceLabel::Low => "LOW",
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn derive_label(score: u8) -> ConfidenceLabel {
    ConfidenceLabel::from_score(score)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepType {
    RootCause,
    Symptom,
    Propagation,
}

impl StepType {
    /// Exact whitelist; no case or separator folding.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ROOT_CAUSE" => Some(StepType::RootCause),
            "SYMPTOM" => Some(StepType::Symptom),
            "PROPAGATION" => Some(StepType::Propagation),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepType::RootCause => "ROOT_CAUSE",
            StepType::Symptom => "SYMPTOM",
            StepType::Propagation => "PROPAGATION",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixPriority {
    Immediate,
    ShortTerm,
    LongTerm,
}

impl FixPriority {
    pub const ALL: [FixPriority; 3] = [
        FixPriority::Immediate,
        FixPriority::ShortTerm,
        FixPriority::LongTerm,
    ];

    /// Accepts `IMMEDIATE`, `short-term`, `Long_Term` and friends.
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_enumerant(value).as_str() {
            "IMMEDIATE" => Some(FixPriority::Immediate),
            "SHORT_TERM" => Some(FixPriority::ShortTerm),
            "LONG_TERM" => Some(FixPriority::LongTerm),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FixPriority::Immediate => "IMMEDIATE",
            FixPriority::ShortTerm => "SHORT_TERM",
            FixPriority::LongTerm => "LONG_TERM",
        }
    }

    pub fn section_title(self) -> &'static str {
        match self {
            FixPriority::Immediate => "Immediate Action Required",
            FixPriority::ShortTerm => "Short-term Improvements",
            FixPriority::LongTerm => "Long-term Strategy",
        }
    }
}

impl fmt::Display for FixPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn category_icon(category: &str) -> &'static str {
    match category.trim().to_ascii_uppercase().as_str() {
        "CONFIGURATION" => "\u{2699}\u{FE0F}",
        "OBSERVABILITY" => "\u{1F441}\u{FE0F}",
        "PROCESS" => "\u{1F4CB}",
        "INFRASTRUCTURE" => "\u{1F3D7}\u{FE0F}",
        "CODE" => "\u{1F4BB}",
        _ => "\u{1F527}",
    }
}

fn normalize_enumerant(value: &str) -> String {
    value.trim().to_ascii_uppercase().replace('-', "_")
}
