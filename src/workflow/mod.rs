// Mutation workflow module
//
// The edit/create dialog state machine, the confirmation gate it routes
// committing actions through, and the shared state/event vocabulary.

pub mod confirm;
pub mod edit_dialog;
pub mod errors;
pub mod events;
pub mod states;

// Re-export main types for convenient access
pub use confirm::{ConfirmOutcome, ConfirmPrompt, ConfirmationGate};
pub use edit_dialog::{EditWorkflow, SaveFn, SubmitOutcome, ValidateFn};
pub use errors::{WorkflowError, WorkflowResult};
pub use events::DialogEvent;
pub use states::{DialogState, WorkflowMode};
