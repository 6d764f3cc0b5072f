use crate::list::Identified;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Table name in the backing store.
pub const CONDOMINIO_TABLE: &str = "condominio";

/// Condominium record as stored in the `condominio` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condominio {
    pub id: i64,
    pub nome_condominio: String,
    #[serde(default)]
    pub endereco_condominio: Option<String>,
    pub cidade_condominio: String,
    /// Two-letter state code, stored uppercase
    pub uf_condominio: String,
    #[serde(default)]
    pub tipo_condominio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for Condominio {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Payload for inserting a new condominium (no generated fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCondominio {
    pub nome_condominio: String,
    pub endereco_condominio: Option<String>,
    pub cidade_condominio: String,
    pub uf_condominio: String,
    pub tipo_condominio: Option<String>,
}

/// Partial update; `None` leaves the column unchanged. A present-but-blank
/// optional column (endereço, tipo) clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CondominioUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome_condominio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco_condominio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidade_condominio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uf_condominio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_condominio: Option<String>,
}

/// Working copy bound to an open dialog; one shape serves both modes.
/// Empty strings mean "not filled"; sanitization happens in the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CondominioDraft {
    pub id: Option<i64>,
    pub nome_condominio: String,
    pub endereco_condominio: String,
    pub cidade_condominio: String,
    pub uf_condominio: String,
    pub tipo_condominio: String,
}

impl CondominioDraft {
    /// Draft for editing an existing record.
    pub fn from_record(record: &Condominio) -> Self {
        Self {
            id: Some(record.id),
            nome_condominio: record.nome_condominio.clone(),
            endereco_condominio: record.endereco_condominio.clone().unwrap_or_default(),
            cidade_condominio: record.cidade_condominio.clone(),
            uf_condominio: record.uf_condominio.clone(),
            tipo_condominio: record.tipo_condominio.clone().unwrap_or_default(),
        }
    }

    /// Raw create payload; blank optionals become `None`.
    pub fn to_create(&self) -> NewCondominio {
        NewCondominio {
            nome_condominio: self.nome_condominio.clone(),
            endereco_condominio: blank_to_none(&self.endereco_condominio),
            cidade_condominio: self.cidade_condominio.clone(),
            uf_condominio: self.uf_condominio.clone(),
            tipo_condominio: blank_to_none(&self.tipo_condominio),
        }
    }

    /// Update payload carrying every editable field.
    pub fn to_update(&self) -> CondominioUpdate {
        CondominioUpdate {
            nome_condominio: Some(self.nome_condominio.clone()),
            endereco_condominio: Some(self.endereco_condominio.clone()),
            cidade_condominio: Some(self.cidade_condominio.clone()),
            uf_condominio: Some(self.uf_condominio.clone()),
            tipo_condominio: Some(self.tipo_condominio.clone()),
        }
    }
}

fn blank_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
