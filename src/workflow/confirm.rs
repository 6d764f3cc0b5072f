use super::errors::{WorkflowError, WorkflowResult};
use crate::service::ServiceResult;
use parking_lot::Mutex;
use std::future::Future;

/// Text rendered by the confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub description: String,
    pub confirm_label: String,
}

impl ConfirmPrompt {
    /// Standard deletion prompt for a named item.
    pub fn exclusao(item_name: &str) -> Self {
        Self {
            title: format!("Excluir {item_name}"),
            description: format!(
                "Tem certeza que deseja excluir \"{item_name}\"? Essa ação não poderá ser desfeita."
            ),
            confirm_label: "Excluir".to_string(),
        }
    }
}

/// Result of a confirm attempt.
#[derive(Debug)]
pub enum ConfirmOutcome<A> {
    /// The action ran successfully and the gate closed
    Completed(A),
    /// The action failed; the gate stays open with the message for retry
    Failed { message: String },
    /// No prompt was open, or one confirm was already running (busy-guard)
    Ignored,
}

impl<A> ConfirmOutcome<A> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

struct GateCore<A> {
    pending: Option<A>,
    prompt: Option<ConfirmPrompt>,
    busy: bool,
    error: Option<String>,
}

/// Secondary acknowledgment before a committing action executes.
///
/// Exactly one of confirm or cancel resolves each open prompt. While the
/// confirmed action is running, further confirm and cancel triggers are
/// ignored. A failing action leaves the gate open so the user can retry or
/// cancel; a successful one closes it automatically.
pub struct ConfirmationGate<A> {
    core: Mutex<GateCore<A>>,
}

impl<A> Default for ConfirmationGate<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ConfirmationGate<A> {
    pub fn new() -> Self {
        Self {
            core: Mutex::new(GateCore {
                pending: None,
                prompt: None,
                busy: false,
                error: None,
            }),
        }
    }

    /// Capture the intent and open the prompt. Fails if a prompt is already
    /// open; the pending action has no lifecycle beyond this window.
    pub fn request(&self, action: A, prompt: ConfirmPrompt) -> WorkflowResult<()> {
        let mut core = self.core.lock();
        if core.pending.is_some() {
            return Err(WorkflowError::PromptAlreadyOpen);
        }
        core.pending = Some(action);
        core.prompt = Some(prompt);
        core.error = None;
        Ok(())
    }

    /// Run the pending action. The gate is marked busy for the call's
    /// duration; the lock is not held across the await.
    pub async fn confirm<F, Fut>(&self, run: F) -> ConfirmOutcome<A>
    where
        A: Clone,
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = ServiceResult<()>>,
    {
        let action = {
            let mut core = self.core.lock();
            if core.busy {
                return ConfirmOutcome::Ignored;
            }
            let action = match core.pending.clone() {
                Some(action) => action,
                None => return ConfirmOutcome::Ignored,
            };
            core.busy = true;
            action
        };

        let result = run(action.clone()).await;

        let mut core = self.core.lock();
        core.busy = false;
        match result {
            Ok(()) => {
                core.pending = None;
                core.prompt = None;
                core.error = None;
                ConfirmOutcome::Completed(action)
            }
            Err(error) => {
                let message = error.to_string();
                core.error = Some(message.clone());
                ConfirmOutcome::Failed { message }
            }
        }
    }

    /// Close the prompt without running the action. Ignored while the
    /// confirmed action is running; returns the discarded action otherwise.
    pub fn cancel(&self) -> Option<A> {
        let mut core = self.core.lock();
        if core.busy {
            return None;
        }
        core.prompt = None;
        core.error = None;
        core.pending.take()
    }

    pub fn is_open(&self) -> bool {
        self.core.lock().pending.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.core.lock().busy
    }

    pub fn prompt(&self) -> Option<ConfirmPrompt> {
        self.core.lock().prompt.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.core.lock().error.clone()
    }
}
