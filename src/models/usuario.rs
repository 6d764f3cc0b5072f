use crate::list::Identified;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Table name in the backing store.
pub const USUARIOS_TABLE: &str = "usuarios";

/// Access level of a user account.
///
/// Stored rows occasionally carry stray casing, so deserialization is
/// lenient: anything that is not `admin` normalizes to `Usuario`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TipoAcesso {
    Admin,
    #[default]
    Usuario,
}

impl TipoAcesso {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Lenient reading of a stored value.
    pub fn normalize(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "admin" => Self::Admin,
            _ => Self::Usuario,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Usuario => "usuario",
        }
    }
}

impl fmt::Display for TipoAcesso {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TipoAcesso {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "usuario" => Ok(Self::Usuario),
            _ => Err(format!("Invalid access level: {s}")),
        }
    }
}

impl Serialize for TipoAcesso {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TipoAcesso {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::normalize(&value))
    }
}

/// User record as stored in the `usuarios` table. The password lives only
/// in the auth provider and never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub nome: String,
    pub email: String,
    /// Digits only; display formatting is a view concern
    #[serde(default)]
    pub telefone: Option<String>,
    pub id_administradora: i64,
    /// Identity in the auth provider
    pub id_authentication: String,
    pub tipo_acesso: TipoAcesso,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for Usuario {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Payload for creating a user. The password is routed to the auth provider
/// and stripped before the table insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUsuario {
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub id_administradora: i64,
    pub tipo_acesso: TipoAcesso,
    pub senha: String,
}

/// Partial user update.
///
/// Profile fields follow patch semantics (`None` = unchanged). `telefone`
/// is double-wrapped: the outer `Option` says whether the patch includes the
/// column, the inner one allows clearing it. A password change carries the
/// new `senha` and must be accompanied by `senha_atual`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsuarioUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_administradora: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_acesso: Option<TipoAcesso>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senha_atual: Option<String>,
}

/// Working copy bound to an open user dialog. Password fields are always
/// blank when the dialog opens.
#[derive(Debug, Clone, PartialEq)]
pub struct UsuarioDraft {
    pub id: Option<i64>,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub tipo_acesso: TipoAcesso,
    pub id_administradora: i64,
    pub senha: String,
    pub senha_atual: String,
}

impl UsuarioDraft {
    /// Blank draft for the create dialog.
    pub fn blank() -> Self {
        Self {
            id: None,
            nome: String::new(),
            email: String::new(),
            telefone: String::new(),
            tipo_acesso: TipoAcesso::Usuario,
            id_administradora: 1,
            senha: String::new(),
            senha_atual: String::new(),
        }
    }

    /// Draft for editing an existing record.
    pub fn from_record(record: &Usuario) -> Self {
        Self {
            id: Some(record.id),
            nome: record.nome.clone(),
            email: record.email.clone(),
            telefone: record.telefone.clone().unwrap_or_default(),
            tipo_acesso: record.tipo_acesso,
            id_administradora: record.id_administradora,
            senha: String::new(),
            senha_atual: String::new(),
        }
    }
}

impl Default for UsuarioDraft {
    fn default() -> Self {
        Self::blank()
    }
}
