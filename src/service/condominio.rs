//! Condominium entity service.
//!
//! Sanitizes and validates payloads locally, then delegates single
//! round-trip CRUD calls to the backing table. Backend failures are
//! classified into the condominium display strings.

use super::errors::{classify_backend_error, EntityErrorLabels, ServiceError, ServiceResult};
use super::table::TableClient;
use crate::logging;
use crate::models::{Condominio, CondominioUpdate, NewCondominio, CONDOMINIO_TABLE};
use serde_json::{json, Map, Value};
use std::sync::Arc;

const LABELS: EntityErrorLabels = EntityErrorLabels {
    not_found: "Condomínio não encontrado",
    duplicate: "Já existe um condomínio com esses dados",
    foreign_key: "Não é possível excluir: existem registros relacionados",
};

pub struct CondominioService {
    table: Arc<dyn TableClient>,
}

impl CondominioService {
    pub fn new(table: Arc<dyn TableClient>) -> Self {
        Self { table }
    }

    /// Trim every field, drop blank optionals, uppercase the UF.
    pub fn sanitizar_dados(dados: &NewCondominio) -> NewCondominio {
        NewCondominio {
            nome_condominio: dados.nome_condominio.trim().to_string(),
            endereco_condominio: sanitizar_opcional(dados.endereco_condominio.as_deref()),
            cidade_condominio: dados.cidade_condominio.trim().to_string(),
            uf_condominio: dados.uf_condominio.trim().to_uppercase(),
            tipo_condominio: sanitizar_opcional(dados.tipo_condominio.as_deref()),
        }
    }

    /// Full-payload validation for create. Runs on the sanitized payload.
    pub fn validar_payload(dados: &NewCondominio) -> ServiceResult<()> {
        if dados.nome_condominio.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Nome do condomínio é obrigatório".to_string(),
            ));
        }
        if dados.cidade_condominio.trim().is_empty() {
            return Err(ServiceError::Validation("Cidade é obrigatória".to_string()));
        }
        validar_uf(&dados.uf_condominio)?;
        Ok(())
    }

    /// Trim the fields present in a partial update; blank optional columns
    /// become explicit clears.
    pub fn sanitizar_atualizacao(dados: &CondominioUpdate) -> CondominioUpdate {
        CondominioUpdate {
            nome_condominio: dados.nome_condominio.as_deref().map(|v| v.trim().to_string()),
            endereco_condominio: dados.endereco_condominio.clone(),
            cidade_condominio: dados
                .cidade_condominio
                .as_deref()
                .map(|v| v.trim().to_string()),
            uf_condominio: dados
                .uf_condominio
                .as_deref()
                .map(|v| v.trim().to_uppercase()),
            tipo_condominio: dados.tipo_condominio.clone(),
        }
    }

    /// Partial-update validation: each rule applies only to the fields the
    /// patch actually carries.
    pub fn validar_atualizacao(dados: &CondominioUpdate) -> ServiceResult<()> {
        if let Some(nome) = &dados.nome_condominio {
            if nome.trim().is_empty() {
                return Err(ServiceError::Validation(
                    "Nome do condomínio é obrigatório".to_string(),
                ));
            }
        }
        if let Some(cidade) = &dados.cidade_condominio {
            if cidade.trim().is_empty() {
                return Err(ServiceError::Validation("Cidade é obrigatória".to_string()));
            }
        }
        if let Some(uf) = &dados.uf_condominio {
            validar_uf(uf)?;
        }
        Ok(())
    }

    /// All condominiums, ordered by id.
    pub async fn list(&self) -> ServiceResult<Vec<Condominio>> {
        let rows = self
            .table
            .select_all(CONDOMINIO_TABLE, "id", true)
            .await
            .map_err(|e| classify_backend_error(e, "buscar condomínios", &LABELS))?;
        decodificar_linhas(rows, "buscar condomínios")
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Condominio>> {
        let row = self
            .table
            .select_one(CONDOMINIO_TABLE, "id", &json!(id))
            .await
            .map_err(|e| classify_backend_error(e, "buscar condomínio", &LABELS))?;
        match row {
            Some(value) => Ok(Some(decodificar(value, "buscar condomínio")?)),
            None => Ok(None),
        }
    }

    pub async fn create(&self, dados: NewCondominio) -> ServiceResult<Condominio> {
        let dados = Self::sanitizar_dados(&dados);
        Self::validar_payload(&dados)?;

        let row = serde_json::to_value(&dados)
            .map_err(|_| ServiceError::Unknown("Erro ao criar condomínio".to_string()))?;
        let created = self
            .table
            .insert(CONDOMINIO_TABLE, row)
            .await
            .map_err(|e| classify_backend_error(e, "criar condomínio", &LABELS))?;
        let record = decodificar(created, "criar condomínio")?;

        logging::log_service_operation(
            "create",
            CONDOMINIO_TABLE,
            Some(record.id),
            "success",
            None,
        );
        Ok(record)
    }

    /// Partial update; fields absent from the patch stay untouched.
    pub async fn update(&self, id: i64, dados: CondominioUpdate) -> ServiceResult<Condominio> {
        if id <= 0 {
            return Err(ServiceError::Validation("ID é obrigatório".to_string()));
        }

        let dados = Self::sanitizar_atualizacao(&dados);
        Self::validar_atualizacao(&dados)?;

        if self.find_by_id(id).await?.is_none() {
            return Err(ServiceError::NotFound(LABELS.not_found.to_string()));
        }

        let patch = montar_patch(&dados);
        if patch.is_empty() {
            // Nothing to change; hand back the current row
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(LABELS.not_found.to_string()));
        }

        let updated = self
            .table
            .update_by_id(CONDOMINIO_TABLE, id, Value::Object(patch))
            .await
            .map_err(|e| classify_backend_error(e, "atualizar condomínio", &LABELS))?;
        let record = decodificar(updated, "atualizar condomínio")?;

        logging::log_service_operation("update", CONDOMINIO_TABLE, Some(id), "success", None);
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if id <= 0 {
            return Err(ServiceError::Validation("ID é obrigatório".to_string()));
        }
        if self.find_by_id(id).await?.is_none() {
            return Err(ServiceError::NotFound(LABELS.not_found.to_string()));
        }

        self.table
            .delete_by_id(CONDOMINIO_TABLE, id)
            .await
            .map_err(|e| classify_backend_error(e, "excluir condomínio", &LABELS))?;

        logging::log_service_operation("delete", CONDOMINIO_TABLE, Some(id), "success", None);
        Ok(())
    }

    /// Case-insensitive substring match on the city, ordered by name.
    pub async fn find_by_cidade(&self, cidade: &str) -> ServiceResult<Vec<Condominio>> {
        let rows = self
            .table
            .select_ilike(
                CONDOMINIO_TABLE,
                "cidade_condominio",
                cidade,
                "nome_condominio",
            )
            .await
            .map_err(|e| classify_backend_error(e, "buscar condomínios por cidade", &LABELS))?;
        decodificar_linhas(rows, "buscar condomínios por cidade")
    }

    /// Exact match on the uppercased state code, ordered by name.
    pub async fn find_by_uf(&self, uf: &str) -> ServiceResult<Vec<Condominio>> {
        let rows = self
            .table
            .select_eq(
                CONDOMINIO_TABLE,
                "uf_condominio",
                &json!(uf.to_uppercase()),
                "nome_condominio",
            )
            .await
            .map_err(|e| classify_backend_error(e, "buscar condomínios por UF", &LABELS))?;
        decodificar_linhas(rows, "buscar condomínios por UF")
    }
}

fn validar_uf(uf: &str) -> ServiceResult<()> {
    if uf.trim().chars().count() != 2 {
        return Err(ServiceError::Validation(
            "UF deve ter exatamente 2 caracteres".to_string(),
        ));
    }
    Ok(())
}

fn sanitizar_opcional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Build the column patch for a partial update. Present-but-blank optional
/// columns are cleared with an explicit null.
fn montar_patch(dados: &CondominioUpdate) -> Map<String, Value> {
    let mut patch = Map::new();
    if let Some(nome) = &dados.nome_condominio {
        patch.insert("nome_condominio".to_string(), json!(nome));
    }
    if let Some(endereco) = &dados.endereco_condominio {
        patch.insert(
            "endereco_condominio".to_string(),
            opcional_ou_nulo(endereco),
        );
    }
    if let Some(cidade) = &dados.cidade_condominio {
        patch.insert("cidade_condominio".to_string(), json!(cidade));
    }
    if let Some(uf) = &dados.uf_condominio {
        patch.insert("uf_condominio".to_string(), json!(uf));
    }
    if let Some(tipo) = &dados.tipo_condominio {
        patch.insert("tipo_condominio".to_string(), opcional_ou_nulo(tipo));
    }
    patch
}

fn opcional_ou_nulo(value: &str) -> Value {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        json!(trimmed)
    }
}

fn decodificar(value: Value, operation: &str) -> ServiceResult<Condominio> {
    serde_json::from_value(value)
        .map_err(|_| ServiceError::Unknown(format!("Erro inesperado ao {operation}")))
}

fn decodificar_linhas(rows: Vec<Value>, operation: &str) -> ServiceResult<Vec<Condominio>> {
    rows.into_iter()
        .map(|row| decodificar(row, operation))
        .collect()
}
