//! Managing a tenant's field definitions.
//!
//! [`DefinitionManager`] is what the field administration screen and the
//! CLI drive: it creates definitions from user input, toggles flags,
//! edits options and captions, reorders and deletes.

use backoffice_core::{BackofficeError, BackofficeResult, ValidationError};
use backoffice_fields::{FieldDefinition, FieldFlag, FieldValues, NewFieldDefinition};
use tracing::info;

use crate::store::{DefinitionQuery, FieldDefinitionPatch, FieldDefinitionStore};

#[derive(Debug)]
pub struct DefinitionManager<S> {
    store: S,
}

impl<S: FieldDefinitionStore> DefinitionManager<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Every definition of the tenant, visible or not, in `sort_order`.
    pub async fn list(&self) -> BackofficeResult<Vec<FieldDefinition>> {
        Ok(self.store.list(&DefinitionQuery::all()).await?)
    }

    /// Creates a definition from creation-form input.
    ///
    /// The name is normalised, the definition checked, and a duplicate name
    /// rejected with [`BackofficeError::Conflict`]. Without an explicit
    /// `sort_order` the field goes after every existing one.
    pub async fn create(&self, input: NewFieldDefinition) -> BackofficeResult<FieldDefinition> {
        let explicit_order = input.sort_order;
        let mut def = input.into_definition();
        def.check()?;

        let existing = self.list().await?;
        if existing.iter().any(|d| d.field_name == def.field_name) {
            return Err(BackofficeError::Conflict(format!(
                "field '{}' already exists",
                def.field_name
            )));
        }
        if explicit_order.is_none() {
            def.sort_order = existing
                .iter()
                .map(|d| d.sort_order)
                .max()
                .map_or(0, |max| max.saturating_add(1));
        }

        let created = self.store.insert(def).await?;
        info!(
            tenant = %self.store.organization_id(),
            field = %created.field_name,
            field_type = %created.field_type,
            "created custom field"
        );
        Ok(created)
    }

    /// Sets one of the required/searchable/visible flags.
    pub async fn set_flag(
        &self,
        id: &str,
        flag: FieldFlag,
        on: bool,
    ) -> BackofficeResult<FieldDefinition> {
        let updated = self
            .store
            .update(id, &FieldDefinitionPatch::flag(flag, on))
            .await?;
        info!(field = %updated.field_name, %flag, on, "toggled custom field flag");
        Ok(updated)
    }

    /// Replaces the options of a choice field.
    ///
    /// The updated definition must still pass its own checks, so a choice
    /// field cannot lose all its options.
    pub async fn update_options(
        &self,
        id: &str,
        options: Vec<String>,
    ) -> BackofficeResult<FieldDefinition> {
        let options: Vec<String> = options.into_iter().map(|o| o.trim().to_string()).collect();
        let mut candidate = self.store.get(id).await?;
        candidate.options.clone_from(&options);
        candidate.check()?;
        Ok(self
            .store
            .update(id, &FieldDefinitionPatch::options(options))
            .await?)
    }

    /// Changes the caption. The machine name never changes.
    pub async fn update_display_name(
        &self,
        id: &str,
        display_name: &str,
    ) -> BackofficeResult<FieldDefinition> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(ValidationError::new("Display name cannot be blank.", "display_name").into());
        }
        Ok(self
            .store
            .update(id, &FieldDefinitionPatch::display_name(display_name))
            .await?)
    }

    /// Moves a field to `new_index` in the tenant's ordered list.
    ///
    /// The existing `sort_order` values are kept as slots and handed out
    /// again in the new order, so only the rows between the old and the new
    /// position change, even when the orders have gaps (10, 20, 30). When
    /// two rows share an order the slots cannot express the move and every
    /// row is renumbered `0..n` instead.
    ///
    /// Changed rows are updated one request at a time. The rewrite is not
    /// atomic: if a write fails, the rows already written keep their new
    /// order and the error is returned.
    pub async fn reorder(
        &self,
        id: &str,
        new_index: usize,
    ) -> BackofficeResult<Vec<FieldDefinition>> {
        let mut ordered = self.list().await?;
        let from = ordered
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| BackofficeError::NotFound(format!("field definition {id}")))?;

        let mut slots: Vec<i32> = ordered.iter().map(|d| d.sort_order).collect();
        slots.sort_unstable();
        if slots.windows(2).any(|w| w[0] >= w[1]) {
            slots = (0..ordered.len())
                .map(|i| i32::try_from(i).unwrap_or(i32::MAX))
                .collect();
        }

        let moved = ordered.remove(from);
        let to = new_index.min(ordered.len());
        ordered.insert(to, moved);

        let mut rewritten = 0usize;
        for (def, target) in ordered.iter_mut().zip(slots) {
            if def.sort_order != target {
                *def = self
                    .store
                    .update(&def.id, &FieldDefinitionPatch::sort_order(target))
                    .await?;
                rewritten += 1;
            }
        }
        info!(
            tenant = %self.store.organization_id(),
            from,
            to,
            rewritten,
            "reordered custom fields"
        );
        Ok(ordered)
    }

    /// Hard-deletes a definition. Values stored under its name stay behind
    /// as orphans.
    pub async fn delete(&self, id: &str) -> BackofficeResult<()> {
        self.store.delete(id).await?;
        info!(tenant = %self.store.organization_id(), id, "deleted custom field");
        Ok(())
    }

    /// Keys of an entity's value map that no current definition claims.
    pub async fn orphaned_keys(&self, values: &FieldValues) -> BackofficeResult<Vec<String>> {
        let definitions = self.list().await?;
        Ok(backoffice_fields::orphaned_keys(values, &definitions)
            .into_iter()
            .map(String::from)
            .collect())
    }
}
