//! Loading the field definitions an entity page shows.
//!
//! Definitions are fetched fresh on every load; nothing is cached.

use backoffice_fields::{merge_defaults, FieldCategory, FieldDefinition, FieldValues};
use tracing::warn;

use crate::error::StoreError;
use crate::store::{DefinitionQuery, FieldDefinitionStore};

/// Fetches the visible definitions, optionally limited to one category.
///
/// The result is ordered by `sort_order`, ties broken by category name.
pub async fn load<S>(
    store: &S,
    category: Option<FieldCategory>,
) -> Result<Vec<FieldDefinition>, StoreError>
where
    S: FieldDefinitionStore + ?Sized,
{
    let mut query = DefinitionQuery::visible();
    query.category = category;
    let mut definitions = store.list(&query).await?;
    definitions.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.field_category.as_str().cmp(b.field_category.as_str()))
    });
    Ok(definitions)
}

/// Loads definitions and hands the caller its value map with defaults filled.
///
/// `on_change` is called exactly once, with `values` plus the
/// `default_value` of every definition whose key was absent. It is not
/// called when the load fails.
pub async fn load_into<S, F>(
    store: &S,
    category: Option<FieldCategory>,
    values: &FieldValues,
    on_change: F,
) -> Result<Vec<FieldDefinition>, StoreError>
where
    S: FieldDefinitionStore + ?Sized,
    F: FnOnce(FieldValues),
{
    let definitions = load(store, category).await?;
    on_change(merge_defaults(values, &definitions));
    Ok(definitions)
}

/// Like [`load`], but a failure yields an empty list.
///
/// The failure is logged at `warn` level so a misconfigured store does not
/// pass silently as "no custom fields".
pub async fn load_or_empty<S>(store: &S, category: Option<FieldCategory>) -> Vec<FieldDefinition>
where
    S: FieldDefinitionStore + ?Sized,
{
    match load(store, category).await {
        Ok(definitions) => definitions,
        Err(e) => {
            warn!(
                tenant = %store.organization_id(),
                error = %e,
                "failed to load custom field definitions; showing none"
            );
            Vec::new()
        }
    }
}
