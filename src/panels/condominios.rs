//! Condominium panel wiring.

use super::entity_handlers;
use crate::events::OutcomePublisher;
use crate::list::{ListController, PanelDefinition, PanelMessages};
use crate::models::{Condominio, CondominioDraft};
use crate::service::{CondominioService, ServiceError};
use crate::validation::validar_condominio;
use crate::workflow::{SaveFn, WorkflowMode};
use std::sync::Arc;

const MESSAGES: PanelMessages = PanelMessages {
    created: "Condomínio criado com sucesso!",
    updated: "Condomínio atualizado com sucesso!",
    deleted: "Condomínio excluído com sucesso.",
    load_failed: "Erro ao carregar condomínios",
};

/// Wire the condominium list screen against its service.
pub fn painel_condominios(
    service: Arc<CondominioService>,
    publisher: OutcomePublisher,
    require_confirmation: bool,
) -> ListController<CondominioDraft, Condominio> {
    let (fetch, delete) = entity_handlers(&service);

    let save: SaveFn<CondominioDraft, Condominio> = Box::new(move |mode, draft| {
        let service = Arc::clone(&service);
        Box::pin(async move {
            match mode {
                WorkflowMode::Create => service.create(draft.to_create()).await,
                WorkflowMode::Edit => {
                    let id = draft
                        .id
                        .ok_or_else(|| ServiceError::Validation("ID é obrigatório".to_string()))?;
                    service.update(id, draft.to_update()).await
                }
            }
        })
    });

    let definition = PanelDefinition {
        entity: "condominios",
        require_confirmation,
        messages: MESSAGES,
        blank_draft: Box::new(CondominioDraft::default),
        draft_for: Box::new(CondominioDraft::from_record),
        row_label: Box::new(|row: &Condominio| row.nome_condominio.clone()),
        validate: Box::new(validar_condominio),
        save,
        fetch,
        delete,
        matches: Box::new(|row: &Condominio, filter: &str| {
            let texto = filter.to_lowercase();
            row.nome_condominio.to_lowercase().contains(&texto)
                || row.cidade_condominio.to_lowercase().contains(&texto)
                || row.uf_condominio.to_lowercase().contains(&texto)
                || row
                    .tipo_condominio
                    .as_deref()
                    .is_some_and(|tipo| tipo.to_lowercase().contains(&texto))
        }),
    };

    ListController::new(definition, publisher)
}
