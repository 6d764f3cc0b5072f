//! List screen controller.
//!
//! The parent component of a panel: owns the displayed collection, the
//! single open edit/create dialog, and the delete confirmation prompt. Row
//! actions call back up into it instead of holding dialog state of their
//! own, so there is exactly one place where outcomes merge into the list.

use super::store::{Identified, ListStore};
use crate::events::OutcomePublisher;
use crate::logging;
use crate::service::ServiceResult;
use crate::workflow::{
    ConfirmOutcome, ConfirmPrompt, ConfirmationGate, EditWorkflow, SaveFn, SubmitOutcome,
    ValidateFn, WorkflowMode, WorkflowResult,
};
use futures::future::BoxFuture;
use parking_lot::Mutex;

pub type FetchFn<T> = Box<dyn Fn() -> BoxFuture<'static, ServiceResult<Vec<T>>> + Send + Sync>;
pub type DeleteFn = Box<dyn Fn(i64) -> BoxFuture<'static, ServiceResult<()>> + Send + Sync>;

/// Success/failure strings a panel surfaces through the outcome publisher.
#[derive(Debug, Clone, Copy)]
pub struct PanelMessages {
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
    pub load_failed: &'static str,
}

/// Captured intent to delete one row, held while the prompt is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: i64,
    pub label: String,
}

/// Everything entity-specific a panel needs: draft factories, the
/// validator, persistence handlers, and the filter predicate.
pub struct PanelDefinition<D, T> {
    pub entity: &'static str,
    pub require_confirmation: bool,
    pub messages: PanelMessages,
    pub blank_draft: Box<dyn Fn() -> D + Send + Sync>,
    pub draft_for: Box<dyn Fn(&T) -> D + Send + Sync>,
    pub row_label: Box<dyn Fn(&T) -> String + Send + Sync>,
    pub validate: ValidateFn<D>,
    pub save: SaveFn<D, T>,
    pub fetch: FetchFn<T>,
    pub delete: DeleteFn,
    pub matches: Box<dyn Fn(&T, &str) -> bool + Send + Sync>,
}

pub struct ListController<D, T: Identified> {
    entity: &'static str,
    messages: PanelMessages,
    store: Mutex<ListStore<T>>,
    dialog: EditWorkflow<D, T>,
    delete_gate: ConfirmationGate<DeleteRequest>,
    blank_draft: Box<dyn Fn() -> D + Send + Sync>,
    draft_for: Box<dyn Fn(&T) -> D + Send + Sync>,
    row_label: Box<dyn Fn(&T) -> String + Send + Sync>,
    fetch: FetchFn<T>,
    delete: DeleteFn,
    publisher: OutcomePublisher,
}

impl<D, T> ListController<D, T>
where
    D: Clone + Send + 'static,
    T: Identified + Clone + Send + 'static,
{
    pub fn new(definition: PanelDefinition<D, T>, publisher: OutcomePublisher) -> Self {
        Self {
            entity: definition.entity,
            messages: definition.messages,
            store: Mutex::new(ListStore::new(definition.matches)),
            dialog: EditWorkflow::new(
                definition.validate,
                definition.save,
                definition.require_confirmation,
            ),
            delete_gate: ConfirmationGate::new(),
            blank_draft: definition.blank_draft,
            draft_for: definition.draft_for,
            row_label: definition.row_label,
            fetch: definition.fetch,
            delete: definition.delete,
            publisher,
        }
    }

    /// Reload the collection from the service.
    pub async fn refresh(&self) -> ServiceResult<usize> {
        match (self.fetch)().await {
            Ok(rows) => {
                let count = rows.len();
                self.store.lock().replace_all(rows);
                Ok(count)
            }
            Err(error) => {
                self.publisher
                    .error(self.entity, "list", self.messages.load_failed);
                Err(error)
            }
        }
    }

    /// Open the dialog with a blank draft.
    pub fn open_create(&self) {
        self.dialog.open((self.blank_draft)(), WorkflowMode::Create);
    }

    /// Open the dialog with a draft projected from an existing row.
    pub fn open_edit(&self, row: &T) {
        self.dialog.open((self.draft_for)(row), WorkflowMode::Edit);
    }

    pub fn update_draft(&self, apply: impl FnOnce(&mut D)) -> WorkflowResult<()> {
        self.dialog.update_draft(apply)
    }

    /// Submit the open dialog and merge the outcome into the collection.
    pub async fn submit(&self) -> SubmitOutcome<T> {
        let mode = self.dialog.mode();
        let outcome = self.dialog.submit().await;
        self.apply_outcome(mode, outcome)
    }

    /// Acknowledge the dialog's confirmation prompt.
    pub async fn confirm_pending(&self) -> SubmitOutcome<T> {
        let mode = self.dialog.mode();
        let outcome = self.dialog.confirm().await;
        self.apply_outcome(mode, outcome)
    }

    pub fn cancel_confirmation(&self) -> WorkflowResult<()> {
        self.dialog.cancel_confirmation()
    }

    pub fn cancel(&self) -> WorkflowResult<()> {
        self.dialog.cancel()
    }

    pub fn dismiss(&self) {
        self.dialog.dismiss();
    }

    /// Open the delete prompt for a row.
    pub fn request_delete(&self, row: &T) -> WorkflowResult<()> {
        let label = (self.row_label)(row);
        self.delete_gate.request(
            DeleteRequest {
                id: row.id(),
                label: label.clone(),
            },
            ConfirmPrompt::exclusao(&label),
        )
    }

    /// Run the pending delete; removes the row from the collection on
    /// success, leaves the prompt open with the message on failure.
    pub async fn confirm_delete(&self) -> ConfirmOutcome<DeleteRequest> {
        let outcome = self
            .delete_gate
            .confirm(|request| (self.delete)(request.id))
            .await;

        match &outcome {
            ConfirmOutcome::Completed(request) => {
                self.store.lock().remove(request.id);
                self.publisher
                    .success(self.entity, "delete", self.messages.deleted);
                logging::log_workflow_operation(
                    "delete",
                    self.entity,
                    None,
                    "success",
                    Some(&request.label),
                );
            }
            ConfirmOutcome::Failed { message } => {
                self.publisher.error(self.entity, "delete", message.clone());
            }
            ConfirmOutcome::Ignored => {}
        }
        outcome
    }

    pub fn cancel_delete(&self) -> Option<DeleteRequest> {
        self.delete_gate.cancel()
    }

    pub fn delete_prompt(&self) -> Option<ConfirmPrompt> {
        self.delete_gate.prompt()
    }

    /// The dialog, for render-layer access to draft, state, and error.
    pub fn dialog(&self) -> &EditWorkflow<D, T> {
        &self.dialog
    }

    pub fn set_filter(&self, filter: impl Into<String>) {
        self.store.lock().set_filter(filter);
    }

    pub fn rows(&self) -> Vec<T> {
        self.store.lock().rows().to_vec()
    }

    pub fn visible(&self) -> Vec<T> {
        self.store.lock().visible()
    }

    fn apply_outcome(&self, mode: WorkflowMode, outcome: SubmitOutcome<T>) -> SubmitOutcome<T> {
        let operation = match mode {
            WorkflowMode::Create => "create",
            WorkflowMode::Edit => "update",
        };

        match &outcome {
            SubmitOutcome::Saved(record) => {
                self.store.lock().upsert(record.clone());
                let message = match mode {
                    WorkflowMode::Create => self.messages.created,
                    WorkflowMode::Edit => self.messages.updated,
                };
                self.publisher.success(self.entity, operation, message);
                logging::log_workflow_operation(
                    operation,
                    self.entity,
                    Some(&mode.to_string()),
                    "success",
                    None,
                );
            }
            SubmitOutcome::Failed { message } => {
                self.publisher.error(self.entity, operation, message.clone());
            }
            // Validation errors stay inline; stale and ignored resolutions
            // change nothing.
            SubmitOutcome::Rejected { .. }
            | SubmitOutcome::ConfirmationRequired
            | SubmitOutcome::Stale
            | SubmitOutcome::Ignored => {}
        }
        outcome
    }
}
