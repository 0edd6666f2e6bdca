//! The field definition store abstraction.
//!
//! Every store is scoped to one tenant: its rows are the definitions of a
//! single `organization_id`, and rows of other tenants are never visible
//! through it.

use std::sync::Arc;

use async_trait::async_trait;
use backoffice_fields::{FieldCategory, FieldDefinition, FieldFlag};
use serde::Serialize;

use crate::error::StoreError;

/// Filters for [`FieldDefinitionStore::list`].
///
/// Results are always ordered by `sort_order` ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionQuery {
    pub visible_only: bool,
    pub category: Option<FieldCategory>,
    pub field_name: Option<String>,
    pub id: Option<String>,
}

impl DefinitionQuery {
    /// Every definition of the tenant.
    pub fn all() -> Self {
        Self::default()
    }

    /// Only definitions with `is_visible` set.
    pub fn visible() -> Self {
        Self {
            visible_only: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn category(mut self, category: FieldCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns `true` if the definition passes every filter.
    pub fn matches(&self, def: &FieldDefinition) -> bool {
        (!self.visible_only || def.is_visible)
            && self.category.map_or(true, |c| def.field_category == c)
            && self.field_name.as_ref().map_or(true, |n| def.field_name == *n)
            && self.id.as_ref().map_or(true, |id| def.id == *id)
    }
}

/// A partial update of one definition.
///
/// Serialises to the columns being changed only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldDefinitionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_category: Option<FieldCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_searchable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl FieldDefinitionPatch {
    /// A patch setting one flag.
    pub fn flag(flag: FieldFlag, on: bool) -> Self {
        let mut patch = Self::default();
        match flag {
            FieldFlag::Required => patch.is_required = Some(on),
            FieldFlag::Searchable => patch.is_searchable = Some(on),
            FieldFlag::Visible => patch.is_visible = Some(on),
        }
        patch
    }

    pub fn sort_order(sort_order: i32) -> Self {
        Self {
            sort_order: Some(sort_order),
            ..Self::default()
        }
    }

    pub fn options(options: Vec<String>) -> Self {
        Self {
            options: Some(options),
            ..Self::default()
        }
    }

    pub fn display_name(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            ..Self::default()
        }
    }

    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch to a definition in place.
    pub fn apply(&self, def: &mut FieldDefinition) {
        if let Some(display_name) = &self.display_name {
            def.display_name.clone_from(display_name);
        }
        if let Some(category) = self.field_category {
            def.field_category = category;
        }
        if let Some(on) = self.is_required {
            def.is_required = on;
        }
        if let Some(on) = self.is_searchable {
            def.is_searchable = on;
        }
        if let Some(on) = self.is_visible {
            def.is_visible = on;
        }
        if let Some(options) = &self.options {
            def.options.clone_from(options);
        }
        if let Some(sort_order) = self.sort_order {
            def.sort_order = sort_order;
        }
    }
}

/// Persistence for one tenant's field definitions.
///
/// Implementations are shared across tasks and must be `Send + Sync`.
/// There is no optimistic concurrency: the last write wins.
#[async_trait]
pub trait FieldDefinitionStore: Send + Sync {
    /// The tenant this store is scoped to.
    fn organization_id(&self) -> &str;

    /// Lists matching definitions ordered by `sort_order`.
    async fn list(&self, query: &DefinitionQuery) -> Result<Vec<FieldDefinition>, StoreError>;

    /// Fetches one definition by id.
    async fn get(&self, id: &str) -> Result<FieldDefinition, StoreError> {
        self.list(&DefinitionQuery::all().id(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("field definition {id}")))
    }

    /// Inserts a new definition and returns the stored row, with its id.
    ///
    /// Fails with [`StoreError::Conflict`] if the tenant already has a
    /// definition with the same `field_name`.
    async fn insert(&self, def: FieldDefinition) -> Result<FieldDefinition, StoreError>;

    /// Applies a patch and returns the updated row.
    async fn update(
        &self,
        id: &str,
        patch: &FieldDefinitionPatch,
    ) -> Result<FieldDefinition, StoreError>;

    /// Hard-deletes a definition.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: FieldDefinitionStore + ?Sized> FieldDefinitionStore for Arc<S> {
    fn organization_id(&self) -> &str {
        (**self).organization_id()
    }

    async fn list(&self, query: &DefinitionQuery) -> Result<Vec<FieldDefinition>, StoreError> {
        (**self).list(query).await
    }

    async fn get(&self, id: &str) -> Result<FieldDefinition, StoreError> {
        (**self).get(id).await
    }

    async fn insert(&self, def: FieldDefinition) -> Result<FieldDefinition, StoreError> {
        (**self).insert(def).await
    }

    async fn update(
        &self,
        id: &str,
        patch: &FieldDefinitionPatch,
    ) -> Result<FieldDefinition, StoreError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        (**self).delete(id).await
    }
}
