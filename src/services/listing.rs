use crate::domain::errors::CheckError;
use crate::domain::models::{
    FetchResult, ListingRecord, Pillar, PillarOutcome, PillarResult, RedirectHop, TextVariantSet,
    Verdict,
};
use crate::services::markup::fragment_text;
use crate::services::text_match;
use crate::services::verifier::{base_evidence, status_pillar};
use serde::de::IgnoredAny;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    title: RawTitle,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    slug: Option<String>,
}

/// CMS endpoints return either `"title": "..."` or `"title": {"rendered": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTitle {
    Rendered { rendered: String },
    Plain(String),
    Other(IgnoredAny),
}

impl Default for RawTitle {
    fn default() -> Self {
        RawTitle::Other(IgnoredAny)
    }
}

impl From<RawRecord> for ListingRecord {
    fn from(raw: RawRecord) -> Self {
        let title = match raw.title {
            RawTitle::Rendered { rendered } | RawTitle::Plain(rendered) => {
                fragment_text(&rendered).trim().to_string()
            }
            RawTitle::Other(_) => String::new(),
        };
        ListingRecord {
            title,
            link: raw.link.unwrap_or_default(),
            date: raw.date.unwrap_or_default(),
            slug: raw.slug.unwrap_or_default(),
        }
    }
}

/// Parse a listing payload. Anything but a JSON array of objects is malformed.
pub fn parse_listing(url: &str, body: &str) -> Result<Vec<ListingRecord>, CheckError> {
    let malformed = |reason: String| CheckError::MalformedResponse {
        url: url.to_string(),
        reason,
    };
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| malformed(format!("body is not JSON: {e}")))?;
    if !value.is_array() {
        return Err(malformed(format!(
            "expected a JSON list of records, got {}",
            json_kind(&value)
        )));
    }
    let raw: Vec<RawRecord> = serde_json::from_value(value)
        .map_err(|e| malformed(format!("unexpected record shape: {e}")))?;
    Ok(raw.into_iter().map(ListingRecord::from).collect())
}

pub fn verify_listing(
    fetch: &FetchResult,
    history: &[RedirectHop],
    variants: &TextVariantSet,
) -> Result<Verdict, CheckError> {
    let mut evidence = match status_pillar(fetch, base_evidence(fetch, history)) {
        Ok(evidence) => evidence,
        Err(verdict) => return Ok(verdict),
    };

    let records = parse_listing(&fetch.url, &fetch.body)?;
    tracing::debug!(records = records.len(), url = %fetch.url, "listing parsed");

    match records
        .into_iter()
        .find(|r| text_match::matches(&r.title, variants))
    {
        Some(record) => {
            evidence.pillars.push(PillarResult {
                pillar: Pillar::Listing,
                outcome: PillarOutcome::Pass,
                detail: format!("matched record {:?}", record.title),
            });
            evidence.record = Some(record);
            Ok(Verdict::present(evidence))
        }
        None => {
            let detail = "no record title matches the reference phrase".to_string();
            evidence.pillars.push(PillarResult {
                pillar: Pillar::Listing,
                outcome: PillarOutcome::Fail,
                detail: detail.clone(),
            });
            Ok(Verdict::absent(evidence, detail))
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}
