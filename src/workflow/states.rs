use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states of an edit/create dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    /// No dialog is open; the default resting state
    #[default]
    Closed,
    /// Dialog is open and the draft accepts edits
    Editing,
    /// A confirmation prompt is open over the dialog; the draft is frozen
    Confirming,
    /// The save call is in flight; submit and cancel affordances are disabled
    Saving,
}

impl DialogState {
    /// Check if a dialog is visible in this state
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Check if a save call is outstanding (busy-guard applies)
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Saving)
    }

    /// Check if the draft can be edited in this state
    pub fn accepts_edits(&self) -> bool {
        matches!(self, Self::Editing)
    }
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Editing => write!(f, "editing"),
            Self::Confirming => write!(f, "confirming"),
            Self::Saving => write!(f, "saving"),
        }
    }
}

impl std::str::FromStr for DialogState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed" => Ok(Self::Closed),
            "editing" => Ok(Self::Editing),
            "confirming" => Ok(Self::Confirming),
            "saving" => Ok(Self::Saving),
            _ => Err(format!("Invalid dialog state: {s}")),
        }
    }
}

/// Which persistence operation a dialog drives and whether identity fields
/// are editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowMode {
    /// New record; all fields editable, service `create` is invoked
    Create,
    /// Existing record; identity fields frozen, service `update` is invoked
    Edit,
}

impl WorkflowMode {
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit)
    }
}

impl fmt::Display for WorkflowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Edit => write!(f, "edit"),
        }
    }
}

impl std::str::FromStr for WorkflowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            _ => Err(format!("Invalid workflow mode: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_state_predicates() {
        assert!(!DialogState::Closed.is_open());
        assert!(DialogState::Editing.is_open());
        assert!(DialogState::Confirming.is_open());
        assert!(DialogState::Saving.is_open());

        assert!(DialogState::Saving.is_busy());
        assert!(!DialogState::Editing.is_busy());

        assert!(DialogState::Editing.accepts_edits());
        assert!(!DialogState::Confirming.accepts_edits());
    }

    #[test]
    fn test_state_string_conversion() {
        assert_eq!(DialogState::Confirming.to_string(), "confirming");
        assert_eq!("saving".parse::<DialogState>().unwrap(), DialogState::Saving);
        assert!("open".parse::<DialogState>().is_err());

        assert_eq!(WorkflowMode::Edit.to_string(), "edit");
        assert_eq!("create".parse::<WorkflowMode>().unwrap(), WorkflowMode::Create);
    }

    #[test]
    fn test_state_serde() {
        let state = DialogState::Editing;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "\"editing\"");

        let parsed: DialogState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
