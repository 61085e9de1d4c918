use crate::core::controller::FormState;
use crate::core::reconcile::Outcome;
use crate::domain::model::{ResultItem, SlotId};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SUBMIT_LABEL: &str = "Submit";
pub const LOADING_LABEL: &str = "Fetching...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub id: SlotId,
    pub position: usize,
    pub value: String,
    pub placeholder: String,
    pub removable: bool,
}

/// Everything a renderer is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub slots: Vec<SlotView>,
    pub validation_error: Option<String>,
    pub results: Vec<ResultItem>,
    pub loading: bool,
    pub submit_enabled: bool,
    pub submit_label: String,
    pub outcome: Option<Outcome>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl FormView {
    pub fn from_state(state: &FormState) -> Self {
        let addresses = state.addresses();
        let slots = addresses
            .slots()
            .into_iter()
            .map(|slot| SlotView {
                removable: addresses.is_removable(slot.position),
                placeholder: format!("URL {}", slot.position + 1),
                id: slot.id,
                position: slot.position,
                value: slot.value,
            })
            .collect();

        let loading = state.is_loading();
        Self {
            slots,
            validation_error: state.validation_error().map(str::to_string),
            results: state.results().to_vec(),
            loading,
            submit_enabled: !loading,
            submit_label: if loading { LOADING_LABEL } else { SUBMIT_LABEL }.to_string(),
            outcome: state.outcome(),
            settled_at: state.settled_at(),
        }
    }
}
