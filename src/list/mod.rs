// List layer module
//
// Displayed row collections and the controller that owns a panel's list,
// dialog, and delete prompt.

pub mod controller;
pub mod store;

// Re-export main types for convenient access
pub use controller::{
    DeleteFn, DeleteRequest, FetchFn, ListController, PanelDefinition, PanelMessages,
};
pub use store::{Identified, ListStore};
