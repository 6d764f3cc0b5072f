//! Shared test doubles and builders.
//!
//! The in-memory table simulates just enough of the backing service to
//! exercise the services: ordered selects, eq/ilike filters, id assignment,
//! unique-constraint and foreign-key failures with the real backend codes.
#![allow(dead_code)]

use async_trait::async_trait;
use condo_core::service::{AuthClient, AuthUser, ClientError, ClientResult, TableClient};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const NO_ROWS: &str = "PGRST116";

#[derive(Default)]
pub struct InMemoryTable {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    next_ids: Mutex<HashMap<String, i64>>,
    unique_columns: Mutex<HashMap<String, Vec<String>>>,
    protected_rows: Mutex<HashSet<(String, i64)>>,
    fail_next: Mutex<Option<ClientError>>,
}

impl InMemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a unique constraint; inserts and updates violating it fail
    /// with the backend's duplicate code.
    pub fn with_unique(self, table: &str, column: &str) -> Self {
        self.unique_columns
            .lock()
            .entry(table.to_string())
            .or_default()
            .push(column.to_string());
        self
    }

    /// Mark a row as referenced elsewhere; deleting it fails with the
    /// backend's foreign-key code.
    pub fn protect(&self, table: &str, id: i64) {
        self.protected_rows.lock().insert((table.to_string(), id));
    }

    /// Seed rows verbatim; ids must already be present.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let max_id = rows
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0);
        let mut next_ids = self.next_ids.lock();
        let next = next_ids.entry(table.to_string()).or_insert(0);
        *next = (*next).max(max_id);
        self.tables.lock().insert(table.to_string(), rows);
    }

    /// Inject a one-shot failure for the next operation.
    pub fn fail_next(&self, error: ClientError) {
        *self.fail_next.lock() = Some(error);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.lock().get(table).cloned().unwrap_or_default()
    }

    fn take_injected_failure(&self) -> ClientResult<()> {
        match self.fail_next.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn check_unique(
        &self,
        table: &str,
        candidate: &Value,
        skip_id: Option<i64>,
    ) -> ClientResult<()> {
        let unique_columns = self.unique_columns.lock();
        let Some(columns) = unique_columns.get(table) else {
            return Ok(());
        };
        let tables = self.tables.lock();
        let rows = tables.get(table).map(Vec::as_slice).unwrap_or_default();

        for column in columns {
            let Some(value) = candidate.get(column) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let clash = rows.iter().any(|row| {
                row.get(column) == Some(value)
                    && skip_id != row.get("id").and_then(Value::as_i64)
            });
            if clash {
                return Err(ClientError::new(
                    UNIQUE_VIOLATION,
                    format!("duplicate key value violates unique constraint on {column}"),
                ));
            }
        }
        Ok(())
    }
}

fn cmp_column(a: &Value, b: &Value, column: &str) -> Ordering {
    match (a.get(column), b.get(column)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or(0.0)
            .partial_cmp(&y.as_f64().unwrap_or(0.0))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl TableClient for InMemoryTable {
    async fn select_all(
        &self,
        table: &str,
        order_by: &str,
        ascending: bool,
    ) -> ClientResult<Vec<Value>> {
        self.take_injected_failure()?;
        let mut rows = self.rows(table);
        rows.sort_by(|a, b| cmp_column(a, b, order_by));
        if !ascending {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn select_one(
        &self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> ClientResult<Option<Value>> {
        self.take_injected_failure()?;
        Ok(self
            .rows(table)
            .into_iter()
            .find(|row| row.get(column) == Some(value)))
    }

    async fn select_eq(
        &self,
        table: &str,
        column: &str,
        value: &Value,
        order_by: &str,
    ) -> ClientResult<Vec<Value>> {
        self.take_injected_failure()?;
        let mut rows: Vec<Value> = self
            .rows(table)
            .into_iter()
            .filter(|row| row.get(column) == Some(value))
            .collect();
        rows.sort_by(|a, b| cmp_column(a, b, order_by));
        Ok(rows)
    }

    async fn select_ilike(
        &self,
        table: &str,
        column: &str,
        needle: &str,
        order_by: &str,
    ) -> ClientResult<Vec<Value>> {
        self.take_injected_failure()?;
        let needle = needle.to_lowercase();
        let mut rows: Vec<Value> = self
            .rows(table)
            .into_iter()
            .filter(|row| {
                row.get(column)
                    .and_then(Value::as_str)
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            })
            .collect();
        rows.sort_by(|a, b| cmp_column(a, b, order_by));
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value> {
        self.take_injected_failure()?;
        self.check_unique(table, &row, None)?;

        let mut stored = row;
        if stored.get("id").and_then(Value::as_i64).is_none() {
            let mut next_ids = self.next_ids.lock();
            let next = next_ids.entry(table.to_string()).or_insert(0);
            *next += 1;
            stored["id"] = json!(*next);
        }

        self.tables
            .lock()
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update_by_id(&self, table: &str, id: i64, patch: Value) -> ClientResult<Value> {
        self.take_injected_failure()?;
        self.check_unique(table, &patch, Some(id))?;

        let mut tables = self.tables.lock();
        let rows = tables.entry(table.to_string()).or_default();
        let row = rows
            .iter_mut()
            .find(|row| row.get("id").and_then(Value::as_i64) == Some(id))
            .ok_or_else(|| ClientError::new(NO_ROWS, "Results contain 0 rows"))?;

        if let (Some(target), Some(changes)) = (row.as_object_mut(), patch.as_object()) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(row.clone())
    }

    async fn delete_by_id(&self, table: &str, id: i64) -> ClientResult<()> {
        self.take_injected_failure()?;
        if self
            .protected_rows
            .lock()
            .contains(&(table.to_string(), id))
        {
            return Err(ClientError::new(
                FOREIGN_KEY_VIOLATION,
                "update or delete violates foreign key constraint",
            ));
        }

        let mut tables = self.tables.lock();
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| row.get("id").and_then(Value::as_i64) != Some(id));
        }
        Ok(())
    }
}

struct AuthAccount {
    id: String,
    email: String,
    password: String,
}

/// In-memory auth provider double with call counters for the flows that
/// must never touch it.
#[derive(Default)]
pub struct InMemoryAuth {
    accounts: Mutex<Vec<AuthAccount>>,
    session: Mutex<Option<AuthUser>>,
    pub sign_in_calls: AtomicUsize,
    pub update_password_calls: AtomicUsize,
    pub update_email_calls: AtomicUsize,
}

impl InMemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a provider account.
    pub fn register(&self, id: &str, email: &str, password: &str) {
        self.accounts.lock().push(AuthAccount {
            id: id.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
    }

    pub fn set_session(&self, auth_id: Option<&str>) {
        *self.session.lock() = auth_id.map(|id| AuthUser { id: id.to_string() });
    }

    pub fn password_of(&self, email: &str) -> Option<String> {
        self.accounts
            .lock()
            .iter()
            .find(|account| account.email == email)
            .map(|account| account.password.clone())
    }
}

#[async_trait]
impl AuthClient for InMemoryAuth {
    async fn current_user(&self) -> ClientResult<Option<AuthUser>> {
        Ok(self.session.lock().clone())
    }

    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<AuthUser> {
        let mut accounts = self.accounts.lock();
        if accounts.iter().any(|account| account.email == email) {
            return Err(ClientError::message("User already registered"));
        }
        let id = Uuid::new_v4().to_string();
        accounts.push(AuthAccount {
            id: id.clone(),
            email: email.to_string(),
            password: password.to_string(),
        });
        Ok(AuthUser { id })
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ClientResult<()> {
        self.sign_in_calls.fetch_add(1, AtomicOrdering::SeqCst);
        let accounts = self.accounts.lock();
        let valid = accounts
            .iter()
            .any(|account| account.email == email && account.password == password);
        if valid {
            Ok(())
        } else {
            Err(ClientError::message("Invalid login credentials"))
        }
    }

    async fn update_password(&self, new_password: &str) -> ClientResult<()> {
        self.update_password_calls
            .fetch_add(1, AtomicOrdering::SeqCst);
        let session = self.session.lock().clone();
        let Some(session) = session else {
            return Err(ClientError::message("missing session"));
        };
        let mut accounts = self.accounts.lock();
        match accounts.iter_mut().find(|account| account.id == session.id) {
            Some(account) => {
                account.password = new_password.to_string();
                Ok(())
            }
            None => Err(ClientError::message("account not found")),
        }
    }

    async fn update_email(&self, new_email: &str) -> ClientResult<()> {
        self.update_email_calls.fetch_add(1, AtomicOrdering::SeqCst);
        let session = self.session.lock().clone();
        let Some(session) = session else {
            return Err(ClientError::message("missing session"));
        };
        let mut accounts = self.accounts.lock();
        match accounts.iter_mut().find(|account| account.id == session.id) {
            Some(account) => {
                account.email = new_email.to_string();
                Ok(())
            }
            None => Err(ClientError::message("account not found")),
        }
    }
}

pub fn condominio_row(id: i64, nome: &str, cidade: &str, uf: &str) -> Value {
    json!({
        "id": id,
        "nome_condominio": nome,
        "endereco_condominio": null,
        "cidade_condominio": cidade,
        "uf_condominio": uf,
        "tipo_condominio": null,
    })
}

pub fn usuario_row(id: i64, nome: &str, email: &str, tipo_acesso: &str, auth_id: &str) -> Value {
    json!({
        "id": id,
        "nome": nome,
        "email": email,
        "telefone": null,
        "id_administradora": 1,
        "id_authentication": auth_id,
        "tipo_acesso": tipo_acesso,
    })
}

/// Seed an admin row plus the matching provider account and session, so the
/// permission gate passes.
pub fn seed_admin_session(table: &InMemoryTable, auth: &InMemoryAuth) {
    table.seed(
        "usuarios",
        vec![usuario_row(
            1,
            "Administrador",
            "admin@exemplo.com",
            "admin",
            "auth-admin",
        )],
    );
    auth.register("auth-admin", "admin@exemplo.com", "senha-admin");
    auth.set_session(Some("auth-admin"));
}
