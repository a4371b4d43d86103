//! Multi-pillar existence verdict for one fetched address.
//!
//! Ambiguous infrastructure answers (401/403/5xx) short-circuit to
//! INDETERMINATE and never alert. A definite mismatch in any configured pillar
//! (gone status, wrong canonical, missing phrase) downgrades to ABSENT.

use crate::domain::models::{
    Evidence, FetchResult, ListingRecord, Pillar, PillarOutcome, PillarResult, RedirectHop,
    TextVariantSet, Verdict,
};
use crate::services::markup::{same_url, Page};
use crate::services::text_match;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PillarPolicy {
    pub canonical: bool,
    pub content: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Candidate,
    Gone,
    Moved,
    Ambiguous,
}

pub fn classify_status(code: u16) -> StatusClass {
    match code {
        200 => StatusClass::Candidate,
        404 | 410 => StatusClass::Gone,
        300..=399 => StatusClass::Moved,
        _ => StatusClass::Ambiguous,
    }
}

/// Evidence skeleton shared by every profile: origin address, final status, hop chain.
pub fn base_evidence(fetch: &FetchResult, history: &[RedirectHop]) -> Evidence {
    let origin = history
        .first()
        .map(|h| h.from_url.as_str())
        .unwrap_or(fetch.url.as_str());
    Evidence {
        status_code: Some(fetch.status_code),
        redirects: history.to_vec(),
        ..Evidence::for_url(origin)
    }
}

/// Status pillar. `Err` carries the final verdict when the status alone decides.
pub fn status_pillar(fetch: &FetchResult, mut evidence: Evidence) -> Result<Evidence, Verdict> {
    let code = fetch.status_code;
    let (outcome, detail) = match classify_status(code) {
        StatusClass::Candidate => (PillarOutcome::Pass, format!("HTTP {code}")),
        StatusClass::Gone => (PillarOutcome::Fail, format!("HTTP {code}: resource is gone")),
        StatusClass::Moved => (
            PillarOutcome::Fail,
            format!("HTTP {code}: the exact address no longer answers directly"),
        ),
        StatusClass::Ambiguous => (
            PillarOutcome::Inconclusive,
            format!("HTTP {code}: ambiguous status"),
        ),
    };
    evidence.pillars.push(PillarResult {
        pillar: Pillar::Status,
        outcome,
        detail: detail.clone(),
    });
    match outcome {
        PillarOutcome::Pass => Ok(evidence),
        PillarOutcome::Fail => Err(Verdict::absent(evidence, detail)),
        _ => Err(Verdict::indeterminate(evidence, detail)),
    }
}

pub fn verify(
    target_url: &str,
    fetch: &FetchResult,
    history: &[RedirectHop],
    variants: &TextVariantSet,
    policy: &PillarPolicy,
) -> Verdict {
    let mut evidence = match status_pillar(fetch, base_evidence(fetch, history)) {
        Ok(evidence) => evidence,
        Err(verdict) => return verdict,
    };

    let page = Page::parse(&fetch.body);
    let canonical = page.canonical();
    evidence.canonical = canonical.clone();

    evidence.pillars.push(if policy.canonical {
        match canonical.as_deref() {
            Some(c) if same_url(c, target_url) => pass(Pillar::Canonical, format!("canonical {c}")),
            Some(c) => fail(
                Pillar::Canonical,
                format!("canonical {c} does not point at {target_url}"),
            ),
            None => fail(Pillar::Canonical, "no canonical or og:url address on page"),
        }
    } else {
        not_configured(Pillar::Canonical)
    });

    evidence.pillars.push(if policy.content {
        if text_match::matches(&page.visible_text(), variants) {
            pass(Pillar::Content, "reference phrase found")
        } else {
            fail(Pillar::Content, "reference phrase not found in page text")
        }
    } else {
        not_configured(Pillar::Content)
    });

    if let Some(failed) = evidence.failed_pillar() {
        let reason = failed.detail.clone();
        return Verdict::absent(evidence, reason);
    }

    evidence.record = Some(ListingRecord {
        title: page.title().unwrap_or_default(),
        link: canonical.unwrap_or_else(|| fetch.final_url.clone()),
        date: String::new(),
        slug: slug_of(target_url),
    });
    Verdict::present(evidence)
}

fn slug_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segs| segs.rfind(|s| !s.is_empty()).map(str::to_string))
        })
        .unwrap_or_default()
}

fn pass(pillar: Pillar, detail: impl Into<String>) -> PillarResult {
    PillarResult {
        pillar,
        outcome: PillarOutcome::Pass,
        detail: detail.into(),
    }
}

fn fail(pillar: Pillar, detail: impl Into<String>) -> PillarResult {
    PillarResult {
        pillar,
        outcome: PillarOutcome::Fail,
        detail: detail.into(),
    }
}

fn not_configured(pillar: Pillar) -> PillarResult {
    PillarResult {
        pillar,
        outcome: PillarOutcome::NotApplicable,
        detail: "not configured".to_string(),
    }
}
