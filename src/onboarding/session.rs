//! Session runner: spawns the sequencing task and the intent task for one
//! onboarding session and hands back a handle to drive and tear it down.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::config::OnboardingConfig;
use crate::education::EducationSource;

use super::machine::PhaseMachine;
use super::model::{Intent, IntentOutcome};
use super::state::SessionState;
use super::store::SessionStore;

/// Intents queued beyond this are back-pressured onto the sender.
const INTENT_CAPACITY: usize = 32;

/// A running onboarding session. Dropping the handle tears the session down.
pub struct SessionHandle {
    id: Uuid,
    store: Arc<SessionStore>,
    intents: mpsc::Sender<Intent>,
    sequence_task: JoinHandle<()>,
    intent_task: JoinHandle<()>,
}

impl SessionHandle {
    /// Start a session: one task fetches and sequences, another applies
    /// intents as they arrive.
    pub fn spawn(source: Arc<dyn EducationSource>, config: &OnboardingConfig) -> Self {
        let id = Uuid::new_v4();
        let store = SessionStore::with_capacity(config.event_capacity);
        let machine = Arc::new(PhaseMachine::new(Arc::clone(&store)));
        let span = info_span!("onboarding_session", session_id = %id);

        let sequence_task = {
            let machine = Arc::clone(&machine);
            tokio::spawn(
                async move {
                    machine.run(source.as_ref()).await;
                    debug!("Sequencing task finished");
                }
                .instrument(span.clone()),
            )
        };

        let (tx, rx) = mpsc::channel(INTENT_CAPACITY);
        let intent_task = tokio::spawn(
            intent_loop(machine, rx, sequence_task.abort_handle()).instrument(span),
        );

        info!(session_id = %id, "Onboarding session started");

        Self {
            id,
            store,
            intents: tx,
            sequence_task,
            intent_task,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn snapshot(&self) -> SessionState {
        self.store.snapshot()
    }

    /// Sender for hosts that want to feed intents from elsewhere.
    pub fn intent_sender(&self) -> mpsc::Sender<Intent> {
        self.intents.clone()
    }

    /// Queue an intent. Returns `false` once the session has ended.
    pub async fn send(&self, intent: Intent) -> bool {
        self.intents.send(intent).await.is_ok()
    }

    /// Whether the session ended, either by an exit request or teardown.
    pub fn is_finished(&self) -> bool {
        self.intent_task.is_finished()
    }

    /// Wait until a back intent ends the session. Returns once the
    /// sequencing task has stopped too, so no event follows.
    pub async fn wait_for_exit(&mut self) {
        join_task(&mut self.intent_task, "intent").await;
        join_task(&mut self.sequence_task, "sequence").await;
    }

    /// Stop both tasks and wait for them to unwind. Nothing is emitted
    /// after this returns; observers keep the last published snapshot.
    pub async fn shutdown(mut self) {
        self.sequence_task.abort();
        self.intent_task.abort();
        join_task(&mut self.sequence_task, "sequence").await;
        join_task(&mut self.intent_task, "intent").await;
        info!(session_id = %self.id, "Onboarding session shut down");
    }
}

/// Dropping only aborts. A task mid-poll on another worker may still publish
/// until that poll returns; use `shutdown` to wait for it.
impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.sequence_task.abort();
        self.intent_task.abort();
    }
}

/// Await a session task that is still running. A finished handle is never
/// polled again. Cancellation is the expected way these tasks end.
async fn join_task(task: &mut JoinHandle<()>, name: &'static str) {
    if task.is_finished() {
        return;
    }
    if let Err(e) = task.await {
        if e.is_panic() {
            warn!(task = name, error = %e, "Session task panicked");
        }
    }
}

async fn intent_loop(
    machine: Arc<PhaseMachine>,
    mut rx: mpsc::Receiver<Intent>,
    sequence: AbortHandle,
) {
    while let Some(intent) = rx.recv().await {
        if machine.handle_intent(intent) == IntentOutcome::ExitRequested {
            sequence.abort();
            break;
        }
    }
    debug!("Intent task finished");
}
