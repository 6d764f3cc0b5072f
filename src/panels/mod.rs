// Panel wiring module
//
// Per-entity assembly of the list controller: draft factories, validators,
// persistence handlers, and display strings for the two admin screens.

pub mod condominios;
pub mod usuarios;

pub use condominios::painel_condominios;
pub use usuarios::painel_usuarios;

use crate::config::CondoConfig;
use crate::error::CondoError;
use crate::events::OutcomePublisher;
use crate::list::{DeleteFn, FetchFn, ListController};
use crate::models::{Condominio, CondominioDraft, Usuario, UsuarioDraft};
use crate::service::{
    AuthClient, CondominioService, EntityService, GoTrueClient, PostgrestClient, ServiceError,
    TableClient, UsuarioService,
};
use std::sync::Arc;

/// Fetch and delete handlers over the uniform entity service contract.
pub(crate) fn entity_handlers<S>(service: &Arc<S>) -> (FetchFn<S::Record>, DeleteFn)
where
    S: EntityService + 'static,
    S::Record: Send + 'static,
{
    let fetch_service = Arc::clone(service);
    let fetch: FetchFn<S::Record> = Box::new(move || {
        let service = Arc::clone(&fetch_service);
        Box::pin(async move { service.list().await })
    });

    let delete_service = Arc::clone(service);
    let delete: DeleteFn = Box::new(move |id| {
        let service = Arc::clone(&delete_service);
        Box::pin(async move { service.delete(id).await })
    });

    (fetch, delete)
}

/// The two admin screens wired against the configured backing service.
pub struct AdminPanels {
    pub publisher: OutcomePublisher,
    pub condominios: ListController<CondominioDraft, Condominio>,
    pub usuarios: ListController<UsuarioDraft, Usuario>,
}

impl AdminPanels {
    pub fn from_config(config: &CondoConfig) -> crate::error::Result<Self> {
        let table: Arc<dyn TableClient> = Arc::new(
            PostgrestClient::new(&config.backend)
                .map_err(|e| CondoError::Service(ServiceError::Unknown(e.message)))?,
        );
        let auth: Arc<dyn AuthClient> = Arc::new(
            GoTrueClient::new(&config.backend)
                .map_err(|e| CondoError::Service(ServiceError::Unknown(e.message)))?,
        );

        let publisher = OutcomePublisher::new(config.events.channel_capacity);
        let condominio_service = Arc::new(CondominioService::new(Arc::clone(&table)));
        let usuario_service = Arc::new(
            UsuarioService::new(table, auth).with_enforce_admin(config.auth.enforce_admin),
        );

        Ok(Self {
            condominios: painel_condominios(
                condominio_service,
                publisher.clone(),
                config.workflow.confirm_condominios,
            ),
            usuarios: painel_usuarios(
                usuario_service,
                publisher.clone(),
                config.workflow.confirm_usuarios,
            ),
            publisher,
        })
    }
}
