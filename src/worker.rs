use crate::error::{PlaygroundError, PlaygroundResult};
use crate::session::{SessionManager, Tokenized};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};

/// Messages from tokenize threads back to the UI.
#[derive(Debug)]
pub enum WorkerUpdate {
    /// The model was not cached, so the hub is being hit.
    Loading { model_id: String },
    Done {
        model_id: String,
        result: PlaygroundResult<Tokenized>,
    },
}

#[derive(Debug, Clone)]
pub struct TokenizeRequest {
    pub prompt: String,
    pub model_id: String,
    pub auth_token: Option<String>,
}

pub struct Worker {
    pub update_rx: mpsc::Receiver<WorkerUpdate>,
    pub update_tx: mpsc::Sender<WorkerUpdate>,
    pub in_flight: usize,
}

impl Default for Worker {
    fn default() -> Self {
        let (update_tx, update_rx) = mpsc::channel();
        Self {
            update_rx,
            update_tx,
            in_flight: 0,
        }
    }
}

impl Worker {
    /// Run one tokenize request on its own thread. Earlier requests are not
    /// cancelled; whichever finishes last is what the UI ends up showing.
    pub fn spawn_tokenize(&mut self, sessions: Arc<SessionManager>, request: TokenizeRequest) {
        self.in_flight += 1;
        let tx = self.update_tx.clone();
        std::thread::spawn(move || {
            let TokenizeRequest {
                prompt,
                model_id,
                auth_token,
            } = request;
            if !sessions.is_cached(&model_id) {
                let _ = tx.send(WorkerUpdate::Loading {
                    model_id: model_id.clone(),
                });
            }
            // Always answer with Done, even if the tokenizer panics, so the
            // UI's in-flight count drains.
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                sessions.tokenize(&prompt, &model_id, auth_token.as_deref())
            }))
            .unwrap_or_else(|payload| Err(PlaygroundError::WorkerPanic(panic_message(&*payload))));
            if let Err(err) = &result {
                tracing::warn!(%model_id, error = %err, "tokenize failed");
            }
            let _ = tx.send(WorkerUpdate::Done { model_id, result });
        });
    }

    /// Drain whatever has arrived since the last frame.
    pub fn poll(&mut self) -> Vec<WorkerUpdate> {
        let updates: Vec<WorkerUpdate> = self.update_rx.try_iter().collect();
        let finished = updates
            .iter()
            .filter(|u| matches!(u, WorkerUpdate::Done { .. }))
            .count();
        self.in_flight = self.in_flight.saturating_sub(finished);
        updates
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
