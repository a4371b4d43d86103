use crate::cli::Profile;
use crate::domain::constants::{EXIT_ALERT, EXIT_INDETERMINATE, EXIT_OK};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// One HTTP exchange, captured without following redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub url: String,
    pub status_code: u16,
    /// Lower-cased header names; repeated headers are joined with `", "`.
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub final_url: String,
}

impl FetchResult {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHop {
    pub from_url: String,
    pub status_code: u16,
    pub to_url: String,
}

/// Normalized spellings of one reference phrase. Membership only, order irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextVariantSet {
    variants: BTreeSet<String>,
}

impl TextVariantSet {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(String::as_str)
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.variants.contains(variant)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl FromIterator<String> for TextVariantSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            variants: iter.into_iter().filter(|v| !v.is_empty()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    Present,
    Absent,
    Indeterminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pillar {
    Status,
    Canonical,
    Content,
    Listing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarOutcome {
    Pass,
    Fail,
    /// Ambiguous infrastructure answer (401/403/5xx, transport failure).
    Inconclusive,
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarResult {
    pub pillar: Pillar,
    pub outcome: PillarOutcome,
    pub detail: String,
}

/// Structured entry from a listing endpoint (or the page itself for HTML checks).
/// Absent keys default to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Evidence {
    pub checked_url: String,
    pub status_code: Option<u16>,
    pub pillars: Vec<PillarResult>,
    pub canonical: Option<String>,
    pub redirects: Vec<RedirectHop>,
    pub record: Option<ListingRecord>,
}

impl Evidence {
    pub fn for_url(url: &str) -> Self {
        Self {
            checked_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn failed_pillar(&self) -> Option<&PillarResult> {
        self.pillars
            .iter()
            .find(|p| p.outcome == PillarOutcome::Fail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub reason: Option<String>,
    pub evidence: Evidence,
}

impl Verdict {
    pub fn present(evidence: Evidence) -> Self {
        Self {
            status: VerdictStatus::Present,
            reason: None,
            evidence,
        }
    }

    pub fn absent(evidence: Evidence, reason: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::Absent,
            reason: Some(reason.into()),
            evidence,
        }
    }

    pub fn indeterminate(evidence: Evidence, reason: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::Indeterminate,
            reason: Some(reason.into()),
            evidence,
        }
    }

    /// Boolean projection used by the state diff; `None` means "do not touch state".
    pub fn found(&self) -> Option<bool> {
        match self.status {
            VerdictStatus::Present => Some(true),
            VerdictStatus::Absent => Some(false),
            VerdictStatus::Indeterminate => None,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self.status {
            VerdictStatus::Present => EXIT_OK,
            VerdictStatus::Absent => EXIT_ALERT,
            VerdictStatus::Indeterminate => EXIT_INDETERMINATE,
        }
    }
}

/// On-disk record, one per monitored target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub found: bool,
    #[serde(default)]
    pub evidence: Option<ListingRecord>,
    pub checked_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Changed,
    Unchanged,
    Indeterminate,
    /// State diffing disabled; the exit code comes straight from the verdict.
    Untracked,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub target: String,
    pub profile: Profile,
    pub verdict: VerdictStatus,
    pub outcome: Outcome,
    pub exit_code: u8,
    pub reason: Option<String>,
    pub evidence: Evidence,
}
