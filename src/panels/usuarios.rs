//! User panel wiring.
//!
//! Edit drafts never carry an email change: the field is frozen in edit
//! mode, so the update payload leaves it out and the auth provider is never
//! asked to move the account.

use super::entity_handlers;
use crate::events::OutcomePublisher;
use crate::list::{ListController, PanelDefinition, PanelMessages};
use crate::models::{NewUsuario, Usuario, UsuarioDraft, UsuarioUpdate};
use crate::service::{ServiceError, UsuarioService};
use crate::validation::{formatar_telefone, limpar_telefone, validar_usuario};
use crate::workflow::{SaveFn, WorkflowMode};
use std::sync::Arc;

const MESSAGES: PanelMessages = PanelMessages {
    created: "Usuário criado com sucesso!",
    updated: "Usuário atualizado com sucesso!",
    deleted: "Usuário excluído com sucesso!",
    load_failed: "Erro ao carregar usuários",
};

/// Wire the user list screen against its service.
pub fn painel_usuarios(
    service: Arc<UsuarioService>,
    publisher: OutcomePublisher,
    require_confirmation: bool,
) -> ListController<UsuarioDraft, Usuario> {
    let (fetch, delete) = entity_handlers(&service);

    let save: SaveFn<UsuarioDraft, Usuario> = Box::new(move |mode, draft| {
        let service = Arc::clone(&service);
        Box::pin(async move {
            match mode {
                WorkflowMode::Create => {
                    let dados = NewUsuario {
                        nome: draft.nome.clone(),
                        email: draft.email.clone(),
                        telefone: limpar_telefone(&draft.telefone),
                        id_administradora: draft.id_administradora,
                        tipo_acesso: draft.tipo_acesso,
                        senha: draft.senha.clone(),
                    };
                    service.create(dados).await
                }
                WorkflowMode::Edit => {
                    let id = draft
                        .id
                        .ok_or_else(|| ServiceError::Validation("ID é obrigatório".to_string()))?;

                    let mut dados = UsuarioUpdate {
                        nome: Some(draft.nome.clone()),
                        email: None,
                        telefone: Some(limpar_telefone(&draft.telefone)),
                        id_administradora: Some(draft.id_administradora),
                        tipo_acesso: Some(draft.tipo_acesso),
                        senha: None,
                        senha_atual: None,
                    };
                    if !draft.senha.trim().is_empty() {
                        dados.senha = Some(draft.senha.clone());
                        dados.senha_atual = Some(draft.senha_atual.clone());
                    }
                    service.update(id, dados).await
                }
            }
        })
    });

    let definition = PanelDefinition {
        entity: "usuarios",
        require_confirmation,
        messages: MESSAGES,
        blank_draft: Box::new(UsuarioDraft::blank),
        draft_for: Box::new(UsuarioDraft::from_record),
        row_label: Box::new(|row: &Usuario| row.nome.clone()),
        validate: Box::new(validar_usuario),
        save,
        fetch,
        delete,
        matches: Box::new(|row: &Usuario, filter: &str| {
            let texto = filter.to_lowercase();
            let telefone_formatado = row
                .telefone
                .as_deref()
                .map(formatar_telefone)
                .unwrap_or_default()
                .to_lowercase();
            let telefone_limpo = row.telefone.clone().unwrap_or_default().to_lowercase();

            row.nome.to_lowercase().contains(&texto)
                || row.email.to_lowercase().contains(&texto)
                || row.tipo_acesso.as_str().contains(&texto)
                || telefone_formatado.contains(&texto)
                || telefone_limpo.contains(&texto)
        }),
    };

    ListController::new(definition, publisher)
}
