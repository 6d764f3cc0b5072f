use super::errors::{WorkflowError, WorkflowResult};
use super::events::DialogEvent;
use super::states::{DialogState, WorkflowMode};
use crate::service::{ServiceError, ServiceResult};
use futures::future::BoxFuture;
use parking_lot::Mutex;

/// Pure validator: returns a human-readable error message, or `None` when
/// the draft is acceptable. Re-run from scratch on every submit attempt.
pub type ValidateFn<D> = Box<dyn Fn(WorkflowMode, &D) -> Option<String> + Send + Sync>;

/// Persistence handler invoked with the validated draft; selects the
/// create-or-update service operation from the mode.
pub type SaveFn<D, R> =
    Box<dyn Fn(WorkflowMode, D) -> BoxFuture<'static, ServiceResult<R>> + Send + Sync>;

/// Result of a submit or confirm attempt, reported back to the list view.
#[derive(Debug)]
pub enum SubmitOutcome<R> {
    /// The record was persisted and the dialog closed
    Saved(R),
    /// Validation rejected the draft; the dialog stays open with the message
    Rejected { message: String },
    /// The draft passed validation and now waits behind the confirmation prompt
    ConfirmationRequired,
    /// The service call failed; the dialog stays open with the message
    Failed { message: String },
    /// The dialog was superseded while the call was in flight; nothing changed
    Stale,
    /// The call was not legal in the current state (busy-guard, closed dialog)
    Ignored,
}

impl<R> SubmitOutcome<R> {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    pub fn record(&self) -> Option<&R> {
        match self {
            Self::Saved(record) => Some(record),
            _ => None,
        }
    }
}

/// Determine the target state for an event, or reject the pair.
///
/// `Open` and `Dismiss` are accepted from every state: opening resets the
/// dialog to a fresh draft, dismissal closes it unconditionally. Everything
/// else follows the edit → confirm → save lifecycle.
fn determine_target_state(
    current: DialogState,
    event: &DialogEvent,
) -> WorkflowResult<DialogState> {
    let target = match (current, event) {
        (_, DialogEvent::Open) => DialogState::Editing,
        (_, DialogEvent::Dismiss) => DialogState::Closed,

        (DialogState::Editing, DialogEvent::Submit) => DialogState::Saving,
        (DialogState::Editing, DialogEvent::ConfirmRequested) => DialogState::Confirming,
        (DialogState::Editing, DialogEvent::Cancel) => DialogState::Closed,

        (DialogState::Confirming, DialogEvent::Confirm) => DialogState::Saving,
        (DialogState::Confirming, DialogEvent::CancelConfirmation) => DialogState::Editing,
        (DialogState::Confirming, DialogEvent::Cancel) => DialogState::Closed,

        (DialogState::Saving, DialogEvent::SaveSucceeded) => DialogState::Closed,
        (DialogState::Saving, DialogEvent::SaveFailed) => DialogState::Editing,
        (DialogState::Saving, DialogEvent::ConfirmFailed) => DialogState::Confirming,

        (from, event) => return Err(WorkflowError::invalid_transition(from, event)),
    };

    Ok(target)
}

struct DialogCore<D> {
    state: DialogState,
    mode: WorkflowMode,
    draft: Option<D>,
    error: Option<String>,
    /// Draft snapshot held only while the confirmation prompt is open
    pending: Option<D>,
    /// Staleness token: bumped whenever this dialog instance is superseded
    /// (open, cancel, dismiss). An in-flight save captures the epoch before
    /// awaiting and discards its result when the epoch moved.
    epoch: u64,
}

/// Generic edit/create dialog workflow.
///
/// Owns the single draft of an in-flight entity mutation and orchestrates
/// validate → (confirm) → save. The validator and save handler are supplied
/// at construction, so the same state machine serves every entity.
pub struct EditWorkflow<D, R> {
    validate: ValidateFn<D>,
    on_save: SaveFn<D, R>,
    require_confirmation: bool,
    core: Mutex<DialogCore<D>>,
}

impl<D, R> EditWorkflow<D, R>
where
    D: Clone + Send + 'static,
    R: Send + 'static,
{
    pub fn new(validate: ValidateFn<D>, on_save: SaveFn<D, R>, require_confirmation: bool) -> Self {
        Self {
            validate,
            on_save,
            require_confirmation,
            core: Mutex::new(DialogCore {
                state: DialogState::Closed,
                mode: WorkflowMode::Create,
                draft: None,
                error: None,
                pending: None,
                epoch: 0,
            }),
        }
    }

    /// Open the dialog with a fresh draft, discarding any prior edits and
    /// clearing any prior error. Reopening with the same data is idempotent.
    pub fn open(&self, initial: D, mode: WorkflowMode) {
        let mut core = self.core.lock();
        if let Ok(next) = determine_target_state(core.state, &DialogEvent::Open) {
            core.state = next;
        }
        core.mode = mode;
        core.draft = Some(initial);
        core.error = None;
        core.pending = None;
        core.epoch += 1;
    }

    /// Merge edits into the draft. No validation runs at this point.
    pub fn update_draft(&self, apply: impl FnOnce(&mut D)) -> WorkflowResult<()> {
        let mut core = self.core.lock();
        if !core.state.accepts_edits() {
            return Err(WorkflowError::invalid_transition(core.state, "update_draft"));
        }
        if let Some(draft) = core.draft.as_mut() {
            apply(draft);
        }
        Ok(())
    }

    /// Validate the draft and, depending on configuration, either run the
    /// save directly or park the draft behind the confirmation prompt.
    pub async fn submit(&self) -> SubmitOutcome<R> {
        let (mode, draft, epoch) = {
            let mut core = self.core.lock();
            if core.state != DialogState::Editing {
                return SubmitOutcome::Ignored;
            }
            let draft = match core.draft.clone() {
                Some(draft) => draft,
                None => return SubmitOutcome::Ignored,
            };

            if let Some(message) = (self.validate)(core.mode, &draft) {
                core.error = Some(message.clone());
                return SubmitOutcome::Rejected { message };
            }
            core.error = None;

            let event = if self.require_confirmation {
                DialogEvent::ConfirmRequested
            } else {
                DialogEvent::Submit
            };
            match determine_target_state(core.state, &event) {
                Ok(next) => core.state = next,
                Err(_) => return SubmitOutcome::Ignored,
            }

            if self.require_confirmation {
                core.pending = Some(draft);
                return SubmitOutcome::ConfirmationRequired;
            }

            (core.mode, draft, core.epoch)
        };

        self.run_save(mode, draft, epoch, false).await
    }

    /// Acknowledge the confirmation prompt and run the pending save.
    /// Busy-guarded: a second confirm while one is running is ignored.
    pub async fn confirm(&self) -> SubmitOutcome<R> {
        let (mode, draft, epoch) = {
            let mut core = self.core.lock();
            if core.state != DialogState::Confirming {
                return SubmitOutcome::Ignored;
            }
            let draft = match core.pending.clone() {
                Some(draft) => draft,
                None => return SubmitOutcome::Ignored,
            };
            match determine_target_state(core.state, &DialogEvent::Confirm) {
                Ok(next) => core.state = next,
                Err(_) => return SubmitOutcome::Ignored,
            }
            (core.mode, draft, core.epoch)
        };

        self.run_save(mode, draft, epoch, true).await
    }

    /// Dismiss the confirmation prompt, returning to the edit form with the
    /// draft unchanged and no error.
    pub fn cancel_confirmation(&self) -> WorkflowResult<()> {
        let mut core = self.core.lock();
        core.state = determine_target_state(core.state, &DialogEvent::CancelConfirmation)?;
        core.pending = None;
        core.error = None;
        Ok(())
    }

    /// Discard the draft and close without any service call. Rejected while
    /// a save is in flight; the busy-guard disables the affordance.
    pub fn cancel(&self) -> WorkflowResult<()> {
        let mut core = self.core.lock();
        if core.state.is_busy() {
            return Err(WorkflowError::Busy);
        }
        core.state = determine_target_state(core.state, &DialogEvent::Cancel)?;
        core.draft = None;
        core.pending = None;
        core.error = None;
        core.epoch += 1;
        Ok(())
    }

    /// Backdrop dismissal: closes from any state. An in-flight save resolves
    /// stale and its result is ignored.
    pub fn dismiss(&self) {
        let mut core = self.core.lock();
        if let Ok(next) = determine_target_state(core.state, &DialogEvent::Dismiss) {
            core.state = next;
        }
        core.draft = None;
        core.pending = None;
        core.error = None;
        core.epoch += 1;
    }

    pub fn state(&self) -> DialogState {
        self.core.lock().state
    }

    pub fn mode(&self) -> WorkflowMode {
        self.core.lock().mode
    }

    pub fn is_open(&self) -> bool {
        self.core.lock().state.is_open()
    }

    pub fn is_busy(&self) -> bool {
        self.core.lock().state.is_busy()
    }

    pub fn error(&self) -> Option<String> {
        self.core.lock().error.clone()
    }

    /// Current draft snapshot, for rendering field inputs.
    pub fn draft(&self) -> Option<D> {
        self.core.lock().draft.clone()
    }

    async fn run_save(
        &self,
        mode: WorkflowMode,
        draft: D,
        epoch: u64,
        via_confirmation: bool,
    ) -> SubmitOutcome<R> {
        let result = (self.on_save)(mode, draft).await;

        let mut core = self.core.lock();
        if core.epoch != epoch {
            // This instance was superseded while the call was in flight.
            return SubmitOutcome::Stale;
        }

        match result {
            Ok(record) => {
                if let Ok(next) = determine_target_state(core.state, &DialogEvent::SaveSucceeded) {
                    core.state = next;
                }
                core.draft = None;
                core.pending = None;
                core.error = None;
                core.epoch += 1;
                SubmitOutcome::Saved(record)
            }
            Err(error) => {
                let message = display_message(&error);
                let event = if via_confirmation {
                    DialogEvent::ConfirmFailed
                } else {
                    DialogEvent::SaveFailed
                };
                if let Ok(next) = determine_target_state(core.state, &event) {
                    core.state = next;
                }
                core.error = Some(message.clone());
                SubmitOutcome::Failed { message }
            }
        }
    }
}

/// Service errors become a single display string at the workflow boundary
/// and are never rethrown to the caller.
fn display_message(error: &ServiceError) -> String {
    error.to_string()
}
