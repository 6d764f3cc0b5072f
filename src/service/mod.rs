// Entity service module
//
// Per-entity services delegating CRUD to the backing store through the
// table client seam, plus the auth provider seam and the shared error
// taxonomy.

pub mod auth;
pub mod condominio;
pub mod errors;
pub mod postgrest;
pub mod table;
pub mod usuario;

// Re-export main types for convenient access
pub use auth::{AuthClient, AuthUser, GoTrueClient};
pub use condominio::CondominioService;
pub use errors::{
    classify_backend_error, ClientError, EntityErrorLabels, ServiceError, ServiceResult,
};
pub use postgrest::PostgrestClient;
pub use table::{ClientResult, TableClient};
pub use usuario::UsuarioService;

use crate::models::{
    Condominio, CondominioUpdate, NewCondominio, NewUsuario, Usuario, UsuarioUpdate,
};
use async_trait::async_trait;

/// Uniform CRUD contract the list layer consumes; both entity services
/// implement it on top of their inherent operations.
#[async_trait]
pub trait EntityService: Send + Sync {
    type Record;
    type Create;
    type Update;

    async fn list(&self) -> ServiceResult<Vec<Self::Record>>;
    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Self::Record>>;
    async fn create(&self, data: Self::Create) -> ServiceResult<Self::Record>;
    async fn update(&self, id: i64, data: Self::Update) -> ServiceResult<Self::Record>;
    async fn delete(&self, id: i64) -> ServiceResult<()>;
}

#[async_trait]
impl EntityService for CondominioService {
    type Record = Condominio;
    type Create = NewCondominio;
    type Update = CondominioUpdate;

    async fn list(&self) -> ServiceResult<Vec<Condominio>> {
        CondominioService::list(self).await
    }

    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Condominio>> {
        CondominioService::find_by_id(self, id).await
    }

    async fn create(&self, data: NewCondominio) -> ServiceResult<Condominio> {
        CondominioService::create(self, data).await
    }

    async fn update(&self, id: i64, data: CondominioUpdate) -> ServiceResult<Condominio> {
        CondominioService::update(self, id, data).await
    }

    async fn delete(&self, id: i64) -> ServiceResult<()> {
        CondominioService::delete(self, id).await
    }
}

#[async_trait]
impl EntityService for UsuarioService {
    type Record = Usuario;
    type Create = NewUsuario;
    type Update = UsuarioUpdate;

    async fn list(&self) -> ServiceResult<Vec<Usuario>> {
        UsuarioService::list(self).await
    }

    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Usuario>> {
        UsuarioService::find_by_id(self, id).await
    }

    async fn create(&self, data: NewUsuario) -> ServiceResult<Usuario> {
        UsuarioService::create(self, data).await
    }

    async fn update(&self, id: i64, data: UsuarioUpdate) -> ServiceResult<Usuario> {
        UsuarioService::update(self, id, data).await
    }

    async fn delete(&self, id: i64) -> ServiceResult<()> {
        UsuarioService::delete(self, id).await
    }
}
