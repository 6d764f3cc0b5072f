/// Events driving the dialog state machine.
///
/// `Submit` and `ConfirmRequested` both originate from the user pressing
/// save; which one fires depends on whether the workflow was configured to
/// require a confirmation step. `SaveFailed` and `ConfirmFailed` distinguish
/// where a service failure returns the dialog to: the edit form or the still
/// open confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// A dialog opens with a fresh draft
    Open,
    /// Validated submit with no confirmation required; save starts
    Submit,
    /// Validated submit that must pass through the confirmation prompt
    ConfirmRequested,
    /// The user acknowledged the confirmation prompt; save starts
    Confirm,
    /// The user dismissed the confirmation prompt; back to editing
    CancelConfirmation,
    /// The save call resolved successfully
    SaveSucceeded,
    /// The save call failed on the direct submit path
    SaveFailed,
    /// The save call failed on the confirmation path
    ConfirmFailed,
    /// The user cancelled the dialog
    Cancel,
    /// Backdrop dismissal; closes from any state
    Dismiss,
}
