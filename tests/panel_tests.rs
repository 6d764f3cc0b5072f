//! End-to-end panel flows: the controller owning the list, the dialog, and
//! the delete prompt, merging outcomes into the displayed collection.

mod common;

use common::{condominio_row, seed_admin_session, InMemoryAuth, InMemoryTable};
use condo_core::events::{OutcomeLevel, OutcomePublisher};
use condo_core::list::{PanelDefinition, PanelMessages};
use condo_core::models::{Condominio, CondominioDraft, Usuario, UsuarioDraft};
use condo_core::panels::{painel_condominios, painel_usuarios};
use condo_core::service::{AuthClient, CondominioService, TableClient, UsuarioService};
use condo_core::validation::validar_condominio;
use condo_core::workflow::{ConfirmOutcome, SubmitOutcome, WorkflowMode};
use condo_core::ListController;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

fn condominio_panel() -> (
    ListController<CondominioDraft, Condominio>,
    Arc<InMemoryTable>,
    OutcomePublisher,
) {
    let table = Arc::new(InMemoryTable::new());
    let client: Arc<dyn TableClient> = Arc::clone(&table);
    let service = Arc::new(CondominioService::new(client));
    let publisher = OutcomePublisher::default();
    let panel = painel_condominios(service, publisher.clone(), false);
    (panel, table, publisher)
}

fn usuario_panel() -> (
    ListController<UsuarioDraft, Usuario>,
    Arc<InMemoryTable>,
    Arc<InMemoryAuth>,
) {
    let table = Arc::new(InMemoryTable::new());
    let auth = Arc::new(InMemoryAuth::new());
    let table_client: Arc<dyn TableClient> = Arc::clone(&table);
    let auth_client: Arc<dyn AuthClient> = Arc::clone(&auth);
    let service = Arc::new(UsuarioService::new(table_client, auth_client));
    let panel = painel_usuarios(service, OutcomePublisher::default(), true);
    (panel, table, auth)
}

#[tokio::test]
async fn create_flow_appends_exactly_one_row() {
    let (panel, table, publisher) = condominio_panel();
    table.seed(
        "condominio",
        vec![condominio_row(1, "Bloco A", "Curitiba", "PR")],
    );
    let mut outcomes = publisher.subscribe();

    assert_eq!(panel.refresh().await.unwrap(), 1);

    panel.open_create();
    panel
        .update_draft(|draft| {
            draft.nome_condominio = "Edificio A".to_string();
            draft.cidade_condominio = "Curitiba".to_string();
            draft.uf_condominio = "pr".to_string();
        })
        .unwrap();

    let outcome = panel.submit().await;
    let record = outcome.record().expect("expected a saved record").clone();

    // Stored with the UF normalized, displayed exactly once
    assert_eq!(record.uf_condominio, "PR");
    let rows = panel.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.iter().filter(|r| r.id == record.id).count(), 1);
    assert!(!panel.dialog().is_open());

    let event = outcomes.recv().await.unwrap();
    assert_eq!(event.level, OutcomeLevel::Success);
    assert_eq!(event.message, "Condomínio criado com sucesso!");
}

#[tokio::test]
async fn edit_flow_replaces_the_row_without_duplicating() {
    let (panel, table, _publisher) = condominio_panel();
    table.seed(
        "condominio",
        vec![
            condominio_row(1, "Bloco A", "Curitiba", "PR"),
            condominio_row(2, "Bloco B", "Curitiba", "PR"),
        ],
    );
    panel.refresh().await.unwrap();

    let alvo = panel.rows()[0].clone();
    panel.open_edit(&alvo);
    panel
        .update_draft(|draft| draft.nome_condominio = "Bloco A Renovado".to_string())
        .unwrap();

    let outcome = panel.submit().await;
    assert!(outcome.is_saved());

    let rows = panel.rows();
    assert_eq!(rows.len(), 2);
    let renovado = rows.iter().find(|r| r.id == alvo.id).unwrap();
    assert_eq!(renovado.nome_condominio, "Bloco A Renovado");
}

#[tokio::test]
async fn validation_failure_keeps_the_collection_untouched() {
    let (panel, table, _publisher) = condominio_panel();
    panel.refresh().await.unwrap();

    panel.open_create();
    panel
        .update_draft(|draft| {
            draft.cidade_condominio = "SP".to_string();
            draft.uf_condominio = "SP".to_string();
        })
        .unwrap();

    let outcome = panel.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Rejected { .. }));
    assert!(panel.rows().is_empty());
    assert!(table.rows("condominio").is_empty());
    assert!(panel.dialog().is_open());
}

#[tokio::test]
async fn duplicate_save_surfaces_the_error_and_keeps_the_dialog_open() {
    let table = Arc::new(InMemoryTable::new().with_unique("condominio", "nome_condominio"));
    let client: Arc<dyn TableClient> = Arc::clone(&table);
    let service = Arc::new(CondominioService::new(client));
    let publisher = OutcomePublisher::default();
    let panel = painel_condominios(service, publisher.clone(), false);
    let mut outcomes = publisher.subscribe();

    table.seed(
        "condominio",
        vec![condominio_row(1, "Edificio A", "Curitiba", "PR")],
    );
    panel.refresh().await.unwrap();

    panel.open_create();
    panel
        .update_draft(|draft| {
            draft.nome_condominio = "Edificio A".to_string();
            draft.cidade_condominio = "Londrina".to_string();
            draft.uf_condominio = "PR".to_string();
        })
        .unwrap();

    let outcome = panel.submit().await;
    match outcome {
        SubmitOutcome::Failed { message } => {
            assert_eq!(message, "Já existe um condomínio com esses dados");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(panel.rows().len(), 1);
    assert!(panel.dialog().is_open());
    assert_eq!(
        panel.dialog().error().as_deref(),
        Some("Já existe um condomínio com esses dados")
    );

    // A successful refresh publishes nothing; the first received event is
    // the failure notification
    let event = outcomes.recv().await.unwrap();
    assert_eq!(event.level, OutcomeLevel::Error);
}

#[tokio::test]
async fn delete_flow_confirms_then_removes() {
    let (panel, table, publisher) = condominio_panel();
    table.seed(
        "condominio",
        vec![
            condominio_row(1, "Bloco A", "Curitiba", "PR"),
            condominio_row(2, "Bloco B", "Curitiba", "PR"),
        ],
    );
    panel.refresh().await.unwrap();
    let mut outcomes = publisher.subscribe();

    let alvo = panel.rows()[1].clone();
    panel.request_delete(&alvo).unwrap();

    let prompt = panel.delete_prompt().unwrap();
    assert_eq!(prompt.title, "Excluir Bloco B");
    assert!(prompt.description.contains("não poderá ser desfeita"));

    let outcome = panel.confirm_delete().await;
    assert!(matches!(outcome, ConfirmOutcome::Completed(_)));
    assert_eq!(panel.rows().len(), 1);
    assert_eq!(table.rows("condominio").len(), 1);

    let event = outcomes.recv().await.unwrap();
    assert_eq!(event.message, "Condomínio excluído com sucesso.");
}

#[tokio::test]
async fn cancelled_delete_changes_nothing() {
    let (panel, table, _publisher) = condominio_panel();
    table.seed(
        "condominio",
        vec![condominio_row(1, "Bloco A", "Curitiba", "PR")],
    );
    panel.refresh().await.unwrap();

    let alvo = panel.rows()[0].clone();
    panel.request_delete(&alvo).unwrap();
    let cancelled = panel.cancel_delete().unwrap();
    assert_eq!(cancelled.id, 1);

    assert_eq!(panel.rows().len(), 1);
    assert!(panel.delete_prompt().is_none());
    assert!(matches!(
        panel.confirm_delete().await,
        ConfirmOutcome::Ignored
    ));
}

#[tokio::test]
async fn protected_delete_fails_and_keeps_the_prompt_open() {
    let (panel, table, _publisher) = condominio_panel();
    table.seed(
        "condominio",
        vec![condominio_row(1, "Bloco A", "Curitiba", "PR")],
    );
    table.protect("condominio", 1);
    panel.refresh().await.unwrap();

    let alvo = panel.rows()[0].clone();
    panel.request_delete(&alvo).unwrap();

    let outcome = panel.confirm_delete().await;
    match outcome {
        ConfirmOutcome::Failed { message } => {
            assert_eq!(
                message,
                "Não é possível excluir: existem registros relacionados"
            );
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(panel.rows().len(), 1);
    assert!(panel.delete_prompt().is_some());
}

#[tokio::test]
async fn usuario_panel_requires_confirmation_before_the_service_runs() {
    let (panel, table, auth) = usuario_panel();
    seed_admin_session(&table, &auth);
    panel.refresh().await.unwrap();
    let antes = table.rows("usuarios").len();

    panel.open_create();
    panel
        .update_draft(|draft| {
            draft.nome = "Ana".to_string();
            draft.email = "ana@exemplo.com".to_string();
            draft.senha = "senha123".to_string();
            draft.telefone = "(41) 99999-0000".to_string();
        })
        .unwrap();

    let outcome = panel.submit().await;
    assert!(matches!(outcome, SubmitOutcome::ConfirmationRequired));
    // Nothing persisted before the acknowledgment
    assert_eq!(table.rows("usuarios").len(), antes);

    let outcome = panel.confirm_pending().await;
    let record = outcome.record().expect("expected a saved record");
    assert_eq!(record.nome, "Ana");
    // The mask is stripped before the payload leaves the panel
    assert_eq!(record.telefone.as_deref(), Some("41999990000"));
    assert_eq!(table.rows("usuarios").len(), antes + 1);
    assert_eq!(panel.rows().len(), antes + 1);
}

#[tokio::test]
async fn usuario_edit_keeps_the_email_frozen() {
    let (panel, table, auth) = usuario_panel();
    seed_admin_session(&table, &auth);
    panel.refresh().await.unwrap();

    let alvo = panel.rows()[0].clone();
    panel.open_edit(&alvo);
    panel
        .update_draft(|draft| draft.nome = "Administrador Geral".to_string())
        .unwrap();

    panel.submit().await;
    let outcome = panel.confirm_pending().await;
    let record = outcome.record().expect("expected a saved record");

    assert_eq!(record.nome, "Administrador Geral");
    assert_eq!(record.email, alvo.email);
    // No auth propagation happened for a profile-only edit
    assert_eq!(
        auth.update_email_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[tokio::test]
async fn dialog_dismissed_mid_flight_leaves_the_collection_unchanged() {
    // A panel whose save handler parks until released, so the dialog can be
    // dismissed while the call is in flight
    let calls = Arc::new(AtomicUsize::new(0));
    let release = Arc::new(Notify::new());
    let save_calls = Arc::clone(&calls);
    let save_release = Arc::clone(&release);

    let definition: PanelDefinition<CondominioDraft, Condominio> = PanelDefinition {
        entity: "condominios",
        require_confirmation: false,
        messages: PanelMessages {
            created: "Condomínio criado com sucesso!",
            updated: "Condomínio atualizado com sucesso!",
            deleted: "Condomínio excluído com sucesso.",
            load_failed: "Erro ao carregar condomínios",
        },
        blank_draft: Box::new(CondominioDraft::default),
        draft_for: Box::new(CondominioDraft::from_record),
        row_label: Box::new(|row: &Condominio| row.nome_condominio.clone()),
        validate: Box::new(validar_condominio),
        save: Box::new(move |_mode: WorkflowMode, draft: CondominioDraft| {
            let calls = Arc::clone(&save_calls);
            let release = Arc::clone(&save_release);
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                release.notified().await;
                Ok(Condominio {
                    id: 99,
                    nome_condominio: draft.nome_condominio,
                    endereco_condominio: None,
                    cidade_condominio: draft.cidade_condominio,
                    uf_condominio: draft.uf_condominio.to_uppercase(),
                    tipo_condominio: None,
                    created_at: None,
                    updated_at: None,
                })
            })
        }),
        fetch: Box::new(|| Box::pin(async { Ok(Vec::new()) })),
        delete: Box::new(|_| Box::pin(async { Ok(()) })),
        matches: Box::new(|_, _| true),
    };

    let publisher = OutcomePublisher::default();
    let panel = Arc::new(ListController::new(definition, publisher.clone()));
    let mut outcomes = publisher.subscribe();
    panel.refresh().await.unwrap();

    panel.open_create();
    panel
        .update_draft(|draft| {
            draft.nome_condominio = "Edificio A".to_string();
            draft.cidade_condominio = "Curitiba".to_string();
            draft.uf_condominio = "PR".to_string();
        })
        .unwrap();

    let background = {
        let panel = Arc::clone(&panel);
        tokio::spawn(async move { panel.submit().await })
    };
    while calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    panel.dismiss();
    release.notify_one();

    let outcome = background.await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Stale));

    // The collection is unchanged and no error is shown anywhere
    assert!(panel.rows().is_empty());
    assert_eq!(panel.dialog().error(), None);
    assert!(outcomes.try_recv().is_err());
}

#[tokio::test]
async fn filter_narrows_the_visible_rows() {
    let (panel, table, _publisher) = condominio_panel();
    table.seed(
        "condominio",
        vec![
            condominio_row(1, "Residencial Sol", "Curitiba", "PR"),
            condominio_row(2, "Comercial Centro", "Santos", "SP"),
        ],
    );
    panel.refresh().await.unwrap();

    panel.set_filter("santos");
    let visible = panel.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, 2);

    panel.set_filter("");
    assert_eq!(panel.visible().len(), 2);
}
