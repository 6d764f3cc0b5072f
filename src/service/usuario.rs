//! User entity service.
//!
//! Users live half in the table and half in the auth provider: the password
//! only ever touches the provider, and the table row points back at the
//! provider identity through `id_authentication`. Every mutating operation
//! runs behind the admin permission gate resolved from the active session.

use super::auth::AuthClient;
use super::errors::{classify_backend_error, EntityErrorLabels, ServiceError, ServiceResult};
use super::table::TableClient;
use crate::logging;
use crate::models::{NewUsuario, TipoAcesso, Usuario, UsuarioUpdate, USUARIOS_TABLE};
use serde_json::{json, Map, Value};
use std::sync::Arc;

const LABELS: EntityErrorLabels = EntityErrorLabels {
    not_found: "Usuário não encontrado",
    duplicate: "Já existe um usuário com esses dados",
    foreign_key: "Não é possível excluir: existem registros relacionados",
};

pub struct UsuarioService {
    table: Arc<dyn TableClient>,
    auth: Arc<dyn AuthClient>,
    enforce_admin: bool,
}

impl UsuarioService {
    pub fn new(table: Arc<dyn TableClient>, auth: Arc<dyn AuthClient>) -> Self {
        Self {
            table,
            auth,
            enforce_admin: true,
        }
    }

    /// Disable the admin gate (single-operator deployments).
    pub fn with_enforce_admin(mut self, enforce_admin: bool) -> Self {
        self.enforce_admin = enforce_admin;
        self
    }

    /// Resolve the executing user from the active session.
    async fn usuario_executante(&self) -> ServiceResult<Usuario> {
        let auth_user = self
            .auth
            .current_user()
            .await
            .map_err(|e| ServiceError::Unauthorized(e.message))?;
        let Some(auth_user) = auth_user else {
            return Err(ServiceError::Unauthorized(
                "Usuário não autenticado.".to_string(),
            ));
        };

        let row = self
            .table
            .select_one(USUARIOS_TABLE, "id_authentication", &json!(auth_user.id))
            .await
            .map_err(|e| classify_backend_error(e, "buscar usuário executante", &LABELS))?;

        match row {
            Some(value) => decodificar(value, "buscar usuário executante"),
            None => Err(ServiceError::Unauthorized(
                "Registro de usuário não encontrado para esta conta.".to_string(),
            )),
        }
    }

    async fn verificar_permissao_admin(&self) -> ServiceResult<()> {
        if !self.enforce_admin {
            return Ok(());
        }
        let executante = self.usuario_executante().await?;
        if executante.tipo_acesso != TipoAcesso::Admin {
            return Err(ServiceError::Unauthorized(
                "Ação não autorizada. Apenas administradores.".to_string(),
            ));
        }
        Ok(())
    }

    /// All users, ordered by name.
    pub async fn list(&self) -> ServiceResult<Vec<Usuario>> {
        let rows = self
            .table
            .select_all(USUARIOS_TABLE, "nome", true)
            .await
            .map_err(|e| classify_backend_error(e, "buscar usuários", &LABELS))?;
        decodificar_linhas(rows, "buscar usuários")
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Usuario>> {
        let row = self
            .table
            .select_one(USUARIOS_TABLE, "id", &json!(id))
            .await
            .map_err(|e| classify_backend_error(e, "buscar usuário por ID", &LABELS))?;
        match row {
            Some(value) => Ok(Some(decodificar(value, "buscar usuário por ID")?)),
            None => Ok(None),
        }
    }

    /// Case-insensitive substring match on the name.
    pub async fn find_by_nome(&self, nome: &str) -> ServiceResult<Vec<Usuario>> {
        let rows = self
            .table
            .select_ilike(USUARIOS_TABLE, "nome", nome, "nome")
            .await
            .map_err(|e| classify_backend_error(e, "buscar usuário por nome", &LABELS))?;
        decodificar_linhas(rows, "buscar usuário por nome")
    }

    /// Create the auth account first, then the table row pointing at it.
    /// The password never reaches the table.
    pub async fn create(&self, dados: NewUsuario) -> ServiceResult<Usuario> {
        self.verificar_permissao_admin().await?;

        if dados.email.trim().is_empty() {
            return Err(ServiceError::Validation("Email é obrigatório".to_string()));
        }
        if dados.senha.chars().count() < 6 {
            return Err(ServiceError::Validation("Senha curta".to_string()));
        }
        if dados.nome.trim().is_empty() {
            return Err(ServiceError::Validation("Nome é obrigatório".to_string()));
        }

        let auth_user = self
            .auth
            .sign_up(&dados.email, &dados.senha)
            .await
            .map_err(|e| {
                if e.message == "User already registered" {
                    ServiceError::Duplicate("Email já cadastrado".to_string())
                } else {
                    ServiceError::Unknown(e.message)
                }
            })?;

        let row = json!({
            "nome": dados.nome,
            "email": dados.email,
            "telefone": dados.telefone,
            "id_administradora": dados.id_administradora,
            "tipo_acesso": dados.tipo_acesso,
            "id_authentication": auth_user.id,
        });
        let created = self
            .table
            .insert(USUARIOS_TABLE, row)
            .await
            .map_err(|e| classify_backend_error(e, "criar usuário", &LABELS))?;
        let record = decodificar(created, "criar usuário")?;

        logging::log_service_operation("create", USUARIOS_TABLE, Some(record.id), "success", None);
        Ok(record)
    }

    /// Partial update. A password change must carry the current password,
    /// which is verified against the provider before anything changes; an
    /// email change propagates to the provider before the table patch.
    pub async fn update(&self, id: i64, dados: UsuarioUpdate) -> ServiceResult<Usuario> {
        self.verificar_permissao_admin().await?;

        let alvo = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(LABELS.not_found.to_string()))?;

        if let Some(senha) = dados.senha.as_deref().filter(|s| !s.is_empty()) {
            let senha_atual = dados
                .senha_atual
                .as_deref()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    ServiceError::Validation("Senha atual obrigatória".to_string())
                })?;

            self.auth
                .sign_in_with_password(&alvo.email, senha_atual)
                .await
                .map_err(|_| ServiceError::Unauthorized("Senha atual incorreta".to_string()))?;

            self.auth
                .update_password(senha)
                .await
                .map_err(|_| ServiceError::Unknown("Erro update senha auth".to_string()))?;
        }

        if let Some(email) = dados.email.as_deref() {
            if email != alvo.email {
                self.auth
                    .update_email(email)
                    .await
                    .map_err(|_| ServiceError::Unknown("Erro update email auth".to_string()))?;
            }
        }

        let patch = montar_patch(&dados);
        if patch.is_empty() {
            return Ok(alvo);
        }

        let updated = self
            .table
            .update_by_id(USUARIOS_TABLE, id, Value::Object(patch))
            .await
            .map_err(|e| classify_backend_error(e, "atualizar usuário", &LABELS))?;
        let record = decodificar(updated, "atualizar usuário")?;

        logging::log_service_operation("update", USUARIOS_TABLE, Some(id), "success", None);
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.verificar_permissao_admin().await?;

        self.table
            .delete_by_id(USUARIOS_TABLE, id)
            .await
            .map_err(|e| classify_backend_error(e, "excluir usuário", &LABELS))?;

        logging::log_service_operation("delete", USUARIOS_TABLE, Some(id), "success", None);
        Ok(())
    }
}

/// Table patch for a partial update; the password pair never lands here.
fn montar_patch(dados: &UsuarioUpdate) -> Map<String, Value> {
    let mut patch = Map::new();
    if let Some(nome) = &dados.nome {
        patch.insert("nome".to_string(), json!(nome));
    }
    if let Some(email) = &dados.email {
        patch.insert("email".to_string(), json!(email));
    }
    if let Some(telefone) = &dados.telefone {
        patch.insert("telefone".to_string(), json!(telefone));
    }
    if let Some(id_administradora) = dados.id_administradora {
        patch.insert("id_administradora".to_string(), json!(id_administradora));
    }
    if let Some(tipo_acesso) = dados.tipo_acesso {
        patch.insert("tipo_acesso".to_string(), json!(tipo_acesso));
    }
    patch
}

fn decodificar(value: Value, operation: &str) -> ServiceResult<Usuario> {
    serde_json::from_value(value)
        .map_err(|_| ServiceError::Unknown(format!("Erro inesperado ao {operation}")))
}

fn decodificar_linhas(rows: Vec<Value>, operation: &str) -> ServiceResult<Vec<Usuario>> {
    rows.into_iter()
        .map(|row| decodificar(row, operation))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_montar_patch_strips_password_pair() {
        let update = UsuarioUpdate {
            nome: Some("Ana".to_string()),
            telefone: Some(None),
            senha: Some("novasenha".to_string()),
            senha_atual: Some("antiga".to_string()),
            ..UsuarioUpdate::default()
        };
        let patch = montar_patch(&update);
        assert_eq!(patch.get("nome"), Some(&json!("Ana")));
        assert_eq!(patch.get("telefone"), Some(&Value::Null));
        assert!(!patch.contains_key("senha"));
        assert!(!patch.contains_key("senha_atual"));
    }

    #[test]
    fn test_montar_patch_empty_when_only_password_changes() {
        let update = UsuarioUpdate {
            senha: Some("novasenha".to_string()),
            senha_atual: Some("antiga".to_string()),
            ..UsuarioUpdate::default()
        };
        assert!(montar_patch(&update).is_empty());
    }
}
