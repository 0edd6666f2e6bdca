//! An in-process field definition store.
//!
//! Used by tests, by the CLI when no remote store is configured, and as a
//! reference for the behaviour every store must share.

use async_trait::async_trait;
use backoffice_fields::FieldDefinition;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{DefinitionQuery, FieldDefinitionPatch, FieldDefinitionStore};

#[derive(Debug)]
pub struct InMemoryStore {
    organization_id: String,
    rows: RwLock<Vec<FieldDefinition>>,
}

impl InMemoryStore {
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Creates a store pre-filled with rows.
    ///
    /// Rows are taken as-is apart from tenant and id: each row is assigned to
    /// this store's tenant, and rows without an id get a fresh one.
    pub fn with_definitions(
        organization_id: impl Into<String>,
        definitions: impl IntoIterator<Item = FieldDefinition>,
    ) -> Self {
        let organization_id = organization_id.into();
        let rows = definitions
            .into_iter()
            .map(|mut def| {
                if def.id.is_empty() {
                    def.id = uuid::Uuid::new_v4().to_string();
                }
                def.organization_id = Some(organization_id.clone());
                def
            })
            .collect();
        Self {
            organization_id,
            rows: RwLock::new(rows),
        }
    }

    /// Number of rows held, across all tenants.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn owns(&self, def: &FieldDefinition) -> bool {
        def.organization_id.as_deref() == Some(self.organization_id.as_str())
    }
}

#[async_trait]
impl FieldDefinitionStore for InMemoryStore {
    fn organization_id(&self) -> &str {
        &self.organization_id
    }

    async fn list(&self, query: &DefinitionQuery) -> Result<Vec<FieldDefinition>, StoreError> {
        let rows = self.rows.read().await;
        let mut found: Vec<FieldDefinition> = rows
            .iter()
            .filter(|def| self.owns(def) && query.matches(def))
            .cloned()
            .collect();
        found.sort_by_key(|def| def.sort_order);
        Ok(found)
    }

    async fn insert(&self, mut def: FieldDefinition) -> Result<FieldDefinition, StoreError> {
        def.check()?;
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|row| self.owns(row) && row.field_name == def.field_name)
        {
            return Err(StoreError::Conflict(format!(
                "field '{}' already exists",
                def.field_name
            )));
        }

        let now = Utc::now();
        def.id = uuid::Uuid::new_v4().to_string();
        def.organization_id = Some(self.organization_id.clone());
        def.created_at = Some(now);
        def.updated_at = Some(now);
        rows.push(def.clone());
        Ok(def)
    }

    async fn update(
        &self,
        id: &str,
        patch: &FieldDefinitionPatch,
    ) -> Result<FieldDefinition, StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id && self.owns(row))
            .ok_or_else(|| StoreError::NotFound(format!("field definition {id}")))?;
        patch.apply(row);
        row.updated_at = Some(Utc::now());
        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| !(row.id == id && self.owns(row)));
        if rows.len() == before {
            return Err(StoreError::NotFound(format!("field definition {id}")));
        }
        Ok(())
    }
}
