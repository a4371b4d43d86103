use crate::cli::Profile;
use crate::domain::errors::CheckError;
use crate::domain::models::{
    Evidence, Outcome, Pillar, PillarOutcome, PillarResult, RunReport, TextVariantSet, Verdict,
    VerdictStatus,
};
use crate::services::clock::Clock;
use crate::services::config::Settings;
use crate::services::decision::{self, DecisionController};
use crate::services::storage::{FlagArtifact, StateStore};
use crate::services::transport::Transport;
use crate::services::{listing, redirect, text_match, verifier};

/// Fetch one address (optionally through its redirect chain) and verify it.
///
/// Transport failures and redirect loops become an INDETERMINATE verdict for
/// that address; a malformed listing payload aborts the run.
pub fn check_address(
    settings: &Settings,
    transport: &dyn Transport,
    url: &str,
    variants: &TextVariantSet,
) -> Result<Verdict, CheckError> {
    tracing::info!(url, profile = ?settings.profile, "checking address");
    let fetched = if settings.follow_redirects {
        redirect::resolve(transport, url, settings.max_hops)
    } else {
        transport
            .get(url)
            .map(|r| (r, Vec::new()))
            .map_err(CheckError::from)
    };
    let (fetch, history) = match fetched {
        Ok(fetched) => fetched,
        Err(e) if e.is_indeterminate() => {
            tracing::error!(url, error = %e, "no usable response");
            let mut evidence = Evidence::for_url(url);
            evidence.pillars.push(PillarResult {
                pillar: Pillar::Status,
                outcome: PillarOutcome::Inconclusive,
                detail: e.to_string(),
            });
            return Ok(Verdict::indeterminate(evidence, e.to_string()));
        }
        Err(e) => return Err(e),
    };

    for hop in &history {
        tracing::debug!(
            status = hop.status_code,
            from = %hop.from_url,
            to = %hop.to_url,
            "redirect chain"
        );
    }
    tracing::debug!(
        status = fetch.status_code,
        length = fetch.body.len(),
        location = fetch.header("location").unwrap_or("-"),
        "response received"
    );

    let verdict = match settings.profile {
        Profile::Page => verifier::verify(
            &settings.target_url,
            &fetch,
            &history,
            variants,
            &settings.pillars,
        ),
        Profile::Api => listing::verify_listing(&fetch, &history, variants)?,
    };
    tracing::debug!(
        canonical = ?verdict.evidence.canonical,
        status = ?verdict.status,
        "address verdict"
    );
    Ok(verdict)
}

/// First PRESENT wins; otherwise any INDETERMINATE keeps the run silent; otherwise ABSENT.
pub fn combine(verdicts: Vec<Verdict>) -> Option<Verdict> {
    let pick = verdicts
        .iter()
        .position(|v| v.status == VerdictStatus::Present)
        .or_else(|| {
            verdicts
                .iter()
                .position(|v| v.status == VerdictStatus::Indeterminate)
        })
        .unwrap_or(0);
    verdicts.into_iter().nth(pick)
}

pub fn run_check(
    settings: &Settings,
    transport: &dyn Transport,
    clock: &dyn Clock,
) -> Result<RunReport, CheckError> {
    let variants = settings
        .text_to_check
        .as_deref()
        .map(|t| text_match::variants(t, &settings.variant_rules))
        .unwrap_or_default();
    if !variants.is_empty() {
        tracing::debug!(
            variants = ?variants.iter().collect::<Vec<_>>(),
            "reference phrase variants"
        );
    }

    let mut verdicts = Vec::new();
    for url in settings.addresses() {
        let verdict = check_address(settings, transport, url, &variants)?;
        let present = verdict.status == VerdictStatus::Present;
        verdicts.push(verdict);
        if present {
            break;
        }
    }
    let verdict = combine(verdicts)
        .ok_or_else(|| CheckError::Config("no address to check".to_string()))?;

    let reason = verdict.reason.as_deref().unwrap_or("");
    match verdict.status {
        VerdictStatus::Present => {
            tracing::info!(url = %verdict.evidence.checked_url, "content present")
        }
        VerdictStatus::Absent => tracing::warn!(reason, "content absent"),
        VerdictStatus::Indeterminate => tracing::warn!(reason, "indeterminate, no alert"),
    }

    let outcome = if settings.track_state {
        let store = StateStore::new(&settings.state_path);
        let flag = FlagArtifact::new(&settings.flag_path);
        DecisionController::new(&store, &flag, clock).settle(&verdict)?
    } else {
        Outcome::Untracked
    };

    Ok(RunReport {
        target: settings.target_url.clone(),
        profile: settings.profile,
        verdict: verdict.status,
        outcome,
        exit_code: decision::exit_code(outcome, &verdict),
        reason: verdict.reason,
        evidence: verdict.evidence,
    })
}
