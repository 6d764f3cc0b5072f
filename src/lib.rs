#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Condo Core
//!
//! Headless Rust core for a condominium-management admin panel.
//!
//! ## Overview
//!
//! Every data operation is a single round-trip CRUD call delegated to a
//! hosted backing service; what this crate owns is the safe-mutation
//! machinery around those calls: the generic edit/create dialog workflow,
//! the confirmation gate, per-entity validators, classified service errors,
//! and the list collections the outcomes merge into. Rendering, routing,
//! and session handling stay outside; they drive this core through its
//! accessors.
//!
//! ## Module Organization
//!
//! - [`models`] - Entity records, payloads, and dialog drafts
//! - [`validation`] - Pure per-entity draft validators
//! - [`service`] - Entity services over the backing-service client seams
//! - [`workflow`] - Dialog state machine and confirmation gate
//! - [`list`] - Row collections and the panel controller
//! - [`panels`] - Per-entity wiring of the two admin screens
//! - [`events`] - Outcome notifications (the toast analog)
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use condo_core::config::ConfigManager;
//! use condo_core::panels::AdminPanels;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! condo_core::logging::init_structured_logging();
//!
//! let manager = ConfigManager::load()?;
//! let panels = AdminPanels::from_config(manager.config())?;
//!
//! panels.condominios.refresh().await?;
//! panels.condominios.open_create();
//! panels.condominios.update_draft(|draft| {
//!     draft.nome_condominio = "Edificio A".to_string();
//!     draft.cidade_condominio = "Curitiba".to_string();
//!     draft.uf_condominio = "PR".to_string();
//! })?;
//! let outcome = panels.condominios.submit().await;
//! println!("saved: {}", outcome.is_saved());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod list;
pub mod logging;
pub mod models;
pub mod panels;
pub mod service;
pub mod validation;
pub mod workflow;

pub use config::{CondoConfig, ConfigManager};
pub use error::{CondoError, Result};
pub use events::{OutcomeEvent, OutcomeLevel, OutcomePublisher};
pub use list::{Identified, ListController, ListStore};
pub use models::{Condominio, CondominioDraft, TipoAcesso, Usuario, UsuarioDraft};
pub use panels::AdminPanels;
pub use service::{CondominioService, ServiceError, UsuarioService};
pub use workflow::{
    ConfirmOutcome, ConfirmPrompt, ConfirmationGate, DialogState, EditWorkflow, SubmitOutcome,
    WorkflowMode,
};
