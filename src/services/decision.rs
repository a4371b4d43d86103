use crate::domain::constants::{EXIT_CHANGED, EXIT_INDETERMINATE, EXIT_OK};
use crate::domain::errors::CheckError;
use crate::domain::models::{Outcome, PersistedState, Verdict};
use crate::services::clock::{timestamp, Clock};
use crate::services::storage::{FlagArtifact, PreviousState, StateStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// INDETERMINATE verdict: state and flag are left alone.
    Skip,
    /// No prior record; persisted but never reported as a change.
    FirstObservation,
    Same,
    Changed { from: bool, to: bool },
}

pub fn transition(prev: &PreviousState, curr: Option<bool>) -> Transition {
    match (prev.found(), curr) {
        (_, None) => Transition::Skip,
        (None, Some(_)) => Transition::FirstObservation,
        (Some(from), Some(to)) if from != to => Transition::Changed { from, to },
        (Some(_), Some(_)) => Transition::Same,
    }
}

pub fn exit_code(outcome: Outcome, verdict: &Verdict) -> u8 {
    match outcome {
        Outcome::Changed => EXIT_CHANGED,
        Outcome::Unchanged => EXIT_OK,
        Outcome::Indeterminate => EXIT_INDETERMINATE,
        Outcome::Untracked => verdict.exit_code(),
    }
}

pub struct DecisionController<'a> {
    store: &'a StateStore,
    flag: &'a FlagArtifact,
    clock: &'a dyn Clock,
}

impl<'a> DecisionController<'a> {
    pub fn new(store: &'a StateStore, flag: &'a FlagArtifact, clock: &'a dyn Clock) -> Self {
        Self { store, flag, clock }
    }

    /// Diff the finalized verdict against the stored record; writes state at most once,
    /// after the flag has been settled.
    pub fn settle(&self, verdict: &Verdict) -> Result<Outcome, CheckError> {
        let prev = self.store.load();
        let step = transition(&prev, verdict.found());
        tracing::debug!(?prev, ?step, "state transition");

        let found = match (step, verdict.found()) {
            (Transition::Skip, _) | (_, None) => {
                tracing::info!("indeterminate verdict, state and flag left untouched");
                return Ok(Outcome::Indeterminate);
            }
            (_, Some(found)) => found,
        };

        // The record only advances once the flag matches the outcome.
        let checked_at = timestamp(self.clock);
        let outcome = match step {
            Transition::Changed { from, to } => {
                self.flag.raise(&format!("changed found={from} -> found={to} at {checked_at}"))?;
                tracing::warn!(
                    from,
                    to,
                    flag = %self.flag.path().display(),
                    "state changed, flag raised"
                );
                Outcome::Changed
            }
            _ => {
                if self.flag.clear()? {
                    tracing::info!(flag = %self.flag.path().display(), "stale flag removed");
                }
                Outcome::Unchanged
            }
        };

        self.store.save(&PersistedState {
            found,
            evidence: if found {
                verdict.evidence.record.clone()
            } else {
                None
            },
            checked_at,
        })?;
        Ok(outcome)
    }
}
