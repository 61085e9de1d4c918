use crate::core::controller::{update, Effect, FormState, Msg, SubmissionId, Transition};
use crate::core::reconcile::Settlement;
use crate::core::view::FormView;
use crate::domain::ports::MetadataCollaborator;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;

/// 持有表單狀態並執行 update 產生的副作用
///
/// `dispatch` is the single entry point for every change. The collaborator call
/// runs on a spawned task and comes back as [`Msg::Settled`] through a channel,
/// so the form stays editable while a batch is in flight.
pub struct FormEngine<C: MetadataCollaborator + 'static> {
    state: FormState,
    collaborator: Arc<C>,
    settlements_tx: mpsc::UnboundedSender<Msg>,
    settlements_rx: mpsc::UnboundedReceiver<Msg>,
}

impl<C: MetadataCollaborator + 'static> FormEngine<C> {
    pub fn new(collaborator: C) -> Self {
        Self::with_state(collaborator, FormState::new())
    }

    pub fn with_state(collaborator: C, state: FormState) -> Self {
        let (settlements_tx, settlements_rx) = mpsc::unbounded_channel();
        Self {
            state,
            collaborator: Arc::new(collaborator),
            settlements_tx,
            settlements_rx,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn view(&self) -> FormView {
        FormView::from_state(&self.state)
    }

    pub fn dispatch(&mut self, msg: Msg) -> &FormState {
        let Transition { state, effect } = update(&self.state, msg);
        self.state = state;
        if let Some(effect) = effect {
            self.run(effect);
        }
        &self.state
    }

    fn run(&self, effect: Effect) {
        match effect {
            Effect::FetchMetadata { submission, urls } => {
                let collaborator = Arc::clone(&self.collaborator);
                let tx = self.settlements_tx.clone();

                tokio::spawn(async move {
                    tracing::debug!("Fetching metadata for submission #{}", submission.0);
                    let result = collaborator.fetch_metadata(&urls).await;
                    if let Err(e) = &result {
                        tracing::error!("❌ Metadata request failed: {}", e);
                    }

                    let msg = Msg::Settled {
                        submission,
                        settlement: Settlement::from_result(result),
                        at: Utc::now(),
                    };
                    // 表單已關閉時直接丟棄結果
                    if tx.send(msg).is_err() {
                        tracing::debug!(
                            "Form closed before submission #{} settled",
                            submission.0
                        );
                    }
                });
            }
        }
    }

    /// Waits for the in-flight submission to settle and applies it.
    ///
    /// Returns `None` right away when nothing is pending.
    pub async fn next_settlement(&mut self) -> Option<SubmissionId> {
        while self.state.is_loading() {
            let msg = self.settlements_rx.recv().await?;
            let submission = match &msg {
                Msg::Settled { submission, .. } => *submission,
                _ => continue,
            };
            self.dispatch(msg);
            if !self.state.is_loading() {
                return Some(submission);
            }
        }
        None
    }

    pub async fn submit_and_wait(&mut self) -> &FormState {
        self.dispatch(Msg::Submit);
        self.next_settlement().await;
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address_list::AddressList;
    use crate::core::reconcile::Outcome;
    use crate::domain::model::{MetadataRecord, FAILED_TITLE};
    use crate::utils::error::{FormError, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::{oneshot, Notify};

    /// 可控制回應時機的假服務
    struct FakeCollaborator {
        calls: Arc<AtomicUsize>,
        gate: Option<Arc<Notify>>,
        requests: Arc<Mutex<Vec<Vec<String>>>>,
        response: std::result::Result<Vec<MetadataRecord>, String>,
        echo: bool,
        finished: Mutex<Option<oneshot::Sender<()>>>,
        alive: Arc<()>,
    }

    fn record(title: &str) -> MetadataRecord {
        MetadataRecord {
            title: title.to_string(),
            description: format!("{} description", title),
            image: None,
            error: None,
        }
    }

    impl FakeCollaborator {
        fn returning(titles: &[&str]) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                gate: None,
                requests: Arc::new(Mutex::new(Vec::new())),
                response: Ok(titles.iter().map(|t| record(t)).collect()),
                echo: false,
                finished: Mutex::new(None),
                alive: Arc::new(()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                ..Self::returning(&[])
            }
        }

        /// 每個網址回傳 "Title of <url>"
        fn echoing() -> Self {
            Self {
                echo: true,
                ..Self::returning(&[])
            }
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn signalling(self, finished: oneshot::Sender<()>) -> Self {
            *self.finished.lock().unwrap() = Some(finished);
            self
        }
    }

    #[async_trait::async_trait]
    impl MetadataCollaborator for FakeCollaborator {
        async fn fetch_metadata(&self, urls: &[String]) -> Result<Vec<MetadataRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(urls.to_vec());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if let Some(finished) = self.finished.lock().unwrap().take() {
                let _ = finished.send(());
            }
            if self.echo {
                return Ok(urls.iter().map(|u| record(&format!("Title of {}", u))).collect());
            }
            self.response
                .clone()
                .map_err(|message| FormError::CollaboratorError { message })
        }
    }

    fn filled() -> FormState {
        FormState::with_addresses(AddressList::from_values([
            "https://example.com",
            "https://example2.com",
            "https://example3.com",
        ]))
    }

    #[tokio::test]
    async fn test_submit_and_wait_success() {
        let fake = FakeCollaborator::returning(&[
            "Example Domain",
            "Example Domain 2",
            "Example Domain 3",
        ]);
        let requests = Arc::clone(&fake.requests);
        let mut engine = FormEngine::with_state(fake, filled());

        let state = engine.submit_and_wait().await;

        assert_eq!(state.outcome(), Some(Outcome::Success));
        let titles: Vec<&str> = state.results().iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["Example Domain", "Example Domain 2", "Example Domain 3"]);
        assert!(state.results().iter().all(|r| !r.is_failure()));
        assert_eq!(
            requests.lock().unwrap()[0],
            vec!["https://example.com", "https://example2.com", "https://example3.com"]
        );
    }

    #[tokio::test]
    async fn test_network_error_fails_every_item() {
        let mut engine = FormEngine::with_state(FakeCollaborator::failing("Network Error"), filled());

        let state = engine.submit_and_wait().await;

        assert_eq!(state.outcome(), Some(Outcome::Failure));
        assert_eq!(state.results().len(), 3);
        assert!(state
            .results()
            .iter()
            .all(|r| r.failure_message() == Some("Network Error") && r.title() == FAILED_TITLE));
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_insufficient_input_makes_no_call() {
        let fake = FakeCollaborator::returning(&["a", "b", "c"]);
        let calls = Arc::clone(&fake.calls);
        let mut engine = FormEngine::new(fake);
        engine.dispatch(Msg::Edit {
            position: 0,
            value: "https://example.com".to_string(),
        });
        engine.dispatch(Msg::Edit {
            position: 1,
            value: "https://example2.com".to_string(),
        });

        let state = engine.submit_and_wait().await;

        assert_eq!(state.validation_error(), Some("Please enter at least 3 URLs."));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_while_pending_is_a_no_op() {
        let gate = Arc::new(Notify::new());
        let fake = FakeCollaborator::returning(&["a", "b", "c"]).gated(Arc::clone(&gate));
        let calls = Arc::clone(&fake.calls);
        let mut engine = FormEngine::with_state(fake, filled());

        engine.dispatch(Msg::Submit);
        assert!(engine.state().is_loading());
        engine.dispatch(Msg::Submit);
        engine.dispatch(Msg::Append);
        assert_eq!(engine.state().addresses().len(), 4);

        gate.notify_one();
        let settled = engine.next_settlement().await;

        assert_eq!(settled, Some(SubmissionId(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!engine.view().loading);
    }

    #[tokio::test]
    async fn test_resubmit_replaces_results() {
        let mut engine = FormEngine::with_state(FakeCollaborator::returning(&["a", "b", "c"]), filled());

        engine.submit_and_wait().await;
        let first = engine.state().results().to_vec();
        let state = engine.submit_and_wait().await;

        assert_eq!(state.results().len(), 3);
        assert_eq!(state.results(), first.as_slice());
    }

    #[tokio::test]
    async fn test_different_second_batch_replaces_results() {
        let fake = FakeCollaborator::echoing();
        let requests = Arc::clone(&fake.requests);
        let state = FormState::with_addresses(AddressList::from_values([
            "https://one.com",
            "https://two.com",
            "https://three.com",
            "https://four.com",
        ]));
        let mut engine = FormEngine::with_state(fake, state);
        assert_eq!(engine.submit_and_wait().await.results().len(), 4);

        engine.dispatch(Msg::Remove { position: 1 });
        let state = engine.submit_and_wait().await;

        let titles: Vec<&str> = state.results().iter().map(|r| r.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Title of https://one.com",
                "Title of https://three.com",
                "Title of https://four.com"
            ]
        );
        let addresses: Vec<&str> = state.results().iter().map(|r| r.address()).collect();
        assert_eq!(
            addresses,
            vec!["https://one.com", "https://three.com", "https://four.com"]
        );
        assert_eq!(requests.lock().unwrap()[1].len(), 3);
    }

    #[tokio::test]
    async fn test_next_settlement_without_pending_returns_none() {
        let mut engine = FormEngine::new(FakeCollaborator::returning(&[]));
        assert_eq!(engine.next_settlement().await, None);
    }

    #[tokio::test]
    async fn test_dropping_engine_mid_flight_is_safe() {
        let gate = Arc::new(Notify::new());
        let (finished_tx, finished_rx) = oneshot::channel();
        let fake = FakeCollaborator::returning(&["a", "b", "c"])
            .gated(Arc::clone(&gate))
            .signalling(finished_tx);
        let calls = Arc::clone(&fake.calls);
        let alive = Arc::downgrade(&fake.alive);
        let mut engine = FormEngine::with_state(fake, filled());

        engine.dispatch(Msg::Submit);
        tokio::task::yield_now().await;
        drop(engine);
        gate.notify_one();

        // 服務在表單關閉後仍正常回應
        assert!(finished_rx.await.is_ok());
        // 背景工作結束後才會釋放最後一個 collaborator 參考
        let released = tokio::time::timeout(Duration::from_secs(1), async {
            while alive.upgrade().is_some() {
                tokio::task::yield_now().await;
            }
        })
        .await;

        assert!(released.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
