//! Submission state machine.
//!
//! [`update`] is the only place where [`FormState`] changes. It never performs
//! I/O: a submit that passes validation yields an [`Effect`] that the caller
//! runs, and the caller reports back with [`Msg::Settled`].
//!
//! ```text
//! Idle ──Submit──▶ (validating) ──ok──▶ Pending ──Settled──▶ Settled(Success|Failure)
//!   ▲                   │                                        │
//!   └──── too few ──────┘◀──────────────── Submit ───────────────┘
//! ```

use crate::core::address_list::AddressList;
use crate::core::reconcile::{self, Outcome, Settlement};
use crate::domain::model::ResultItem;
use crate::utils::error::FormError;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SubmissionId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// `addresses` is the batch snapshot; later list edits do not touch it.
    Pending {
        submission: SubmissionId,
        addresses: Vec<String>,
    },
    Settled(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Edit { position: usize, value: String },
    Append,
    Remove { position: usize },
    Submit,
    Settled {
        submission: SubmissionId,
        settlement: Settlement,
        at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchMetadata {
        submission: SubmissionId,
        urls: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    addresses: AddressList,
    validation_error: Option<String>,
    results: Vec<ResultItem>,
    phase: Phase,
    submissions: u64,
    settled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: FormState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn stay(state: FormState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::with_addresses(AddressList::initialize())
    }

    pub fn with_addresses(addresses: AddressList) -> Self {
        Self {
            addresses,
            validation_error: None,
            results: Vec::new(),
            phase: Phase::Idle,
            submissions: 0,
            settled_at: None,
        }
    }

    pub fn addresses(&self) -> &AddressList {
        &self.addresses
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    pub fn results(&self) -> &[ResultItem] {
        &self.results
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Settled(outcome) => Some(outcome),
            _ => None,
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn update(state: &FormState, msg: Msg) -> Transition {
    let mut next = state.clone();

    match msg {
        Msg::Edit { position, value } => {
            if let Err(e) = next.addresses.edit(position, value) {
                tracing::warn!("⚠️ Edit ignored: {}", e);
            }
            Transition::stay(next)
        }
        Msg::Append => {
            next.addresses.append();
            tracing::debug!("Added URL field, form now has {}", next.addresses.len());
            Transition::stay(next)
        }
        Msg::Remove { position } => {
            match next.addresses.remove(position) {
                Ok(()) => tracing::debug!("Removed URL field at position {}", position),
                Err(e @ FormError::BelowMinimumSlots { .. }) => {
                    tracing::warn!("⚠️ Remove refused: {}", e);
                    next.validation_error = Some(e.to_string());
                }
                Err(e) => tracing::warn!("⚠️ Remove ignored: {}", e),
            }
            Transition::stay(next)
        }
        Msg::Submit => submit(next),
        Msg::Settled {
            submission,
            settlement,
            at,
        } => settle(next, submission, settlement, at),
    }
}

fn submit(mut next: FormState) -> Transition {
    if next.is_loading() {
        tracing::debug!("Submit ignored while a request is pending");
        return Transition::stay(next);
    }

    let addresses = match reconcile::validate_batch(&next.addresses) {
        Ok(addresses) => addresses,
        Err(e) => {
            tracing::warn!("⚠️ Submission rejected: {}", e);
            next.validation_error = Some(e.to_string());
            next.phase = Phase::Idle;
            return Transition::stay(next);
        }
    };
    next.validation_error = None;

    // 格式錯誤與網路錯誤走同一條失敗路徑
    if let Err(e) = reconcile::check_syntax(&addresses) {
        tracing::warn!("⚠️ Batch failed before dispatch: {}", e);
        next.results = reconcile::failure_batch(&addresses, &e.to_string());
        next.phase = Phase::Settled(Outcome::Failure);
        next.settled_at = Some(Utc::now());
        return Transition::stay(next);
    }

    next.submissions += 1;
    let submission = SubmissionId(next.submissions);
    tracing::info!(
        "📤 Submitting {} URLs (submission #{})",
        addresses.len(),
        submission.0
    );

    next.phase = Phase::Pending {
        submission,
        addresses: addresses.clone(),
    };
    Transition {
        state: next,
        effect: Some(Effect::FetchMetadata {
            submission,
            urls: addresses,
        }),
    }
}

fn settle(
    mut next: FormState,
    submission: SubmissionId,
    settlement: Settlement,
    at: DateTime<Utc>,
) -> Transition {
    let addresses = match &next.phase {
        Phase::Pending {
            submission: pending,
            addresses,
        } if *pending == submission => addresses.clone(),
        _ => {
            tracing::debug!("Ignoring stale settlement #{}", submission.0);
            return Transition::stay(next);
        }
    };

    let (results, outcome) = reconcile::reconcile(&addresses, settlement);
    let failed = results.iter().filter(|r| r.is_failure()).count();
    match outcome {
        Outcome::Success => tracing::info!(
            "✅ Submission #{} settled: {} ok, {} failed",
            submission.0,
            results.len() - failed,
            failed
        ),
        Outcome::Failure => tracing::error!("❌ Submission #{} failed", submission.0),
    }

    next.results = results;
    next.phase = Phase::Settled(outcome);
    next.settled_at = Some(at);
    Transition::stay(next)
}
