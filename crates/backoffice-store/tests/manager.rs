//! Integration tests for the definition manager over the in-memory store.

use backoffice_core::BackofficeError;
use backoffice_fields::{FieldCategory, FieldFlag, FieldType, FieldValue, FieldValues, NewFieldDefinition};
use backoffice_store::{load, DefinitionManager, FieldDefinitionStore, InMemoryStore};

// ============================================================================
// Shared helpers
// ============================================================================

fn manager() -> DefinitionManager<InMemoryStore> {
    DefinitionManager::new(InMemoryStore::new("org-1"))
}

async fn seed(manager: &DefinitionManager<InMemoryStore>, names: &[&str]) -> Vec<String> {
    let mut ids = Vec::new();
    for name in names {
        let created = manager
            .create(NewFieldDefinition::new(*name, FieldType::Text))
            .await
            .unwrap();
        ids.push(created.id);
    }
    ids
}

fn names(defs: &[backoffice_fields::FieldDefinition]) -> Vec<&str> {
    defs.iter().map(|d| d.field_name.as_str()).collect()
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_normalises_and_appends() {
    let manager = manager();
    let first = manager
        .create(NewFieldDefinition::new("VAT Number", FieldType::Text))
        .await
        .unwrap();
    assert_eq!(first.field_name, "vat_number");
    assert_eq!(first.display_name, "VAT Number");
    assert_eq!(first.sort_order, 0);

    let second = manager
        .create(NewFieldDefinition::new("Contract Type", FieldType::Text))
        .await
        .unwrap();
    assert_eq!(second.sort_order, 1);
}

#[tokio::test]
async fn test_create_keeps_explicit_sort_order() {
    let manager = manager();
    let mut input = NewFieldDefinition::new("budget", FieldType::Currency);
    input.sort_order = Some(10);
    input.field_category = FieldCategory::Financial;
    let created = manager.create(input).await.unwrap();
    assert_eq!(created.sort_order, 10);
    assert_eq!(created.field_category, FieldCategory::Financial);
}

#[tokio::test]
async fn test_create_duplicate_is_conflict() {
    let manager = manager();
    seed(&manager, &["vat_number"]).await;
    let err = manager
        .create(NewFieldDefinition::new("VAT number", FieldType::Text))
        .await
        .unwrap_err();
    assert!(matches!(err, BackofficeError::Conflict(_)));
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn test_create_select_without_options_is_rejected() {
    let manager = manager();
    let err = manager
        .create(NewFieldDefinition::new("tier", FieldType::Select))
        .await
        .unwrap_err();
    let BackofficeError::ValidationError(v) = err else {
        panic!("expected a validation error");
    };
    assert_eq!(v.code, "options");
    assert!(manager.list().await.unwrap().is_empty());
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_set_flag_hides_from_loader() {
    let manager = manager();
    let ids = seed(&manager, &["a", "b"]).await;
    manager.set_flag(&ids[0], FieldFlag::Visible, false).await.unwrap();
    let updated = manager.set_flag(&ids[1], FieldFlag::Required, true).await.unwrap();
    assert!(updated.is_required);

    let visible = load(manager.store(), None).await.unwrap();
    assert_eq!(names(&visible), vec!["b"]);
}

#[tokio::test]
async fn test_update_options_checks_definition() {
    let manager = manager();
    let mut input = NewFieldDefinition::new("tier", FieldType::Select);
    input.options = vec!["gold".into()];
    let tier = manager.create(input).await.unwrap();

    let updated = manager
        .update_options(&tier.id, vec![" gold ".into(), "silver".into()])
        .await
        .unwrap();
    assert_eq!(updated.options, vec!["gold", "silver"]);

    let err = manager.update_options(&tier.id, vec![]).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_update_display_name() {
    let manager = manager();
    let ids = seed(&manager, &["notes"]).await;
    let updated = manager.update_display_name(&ids[0], "  Notes  ").await.unwrap();
    assert_eq!(updated.display_name, "Notes");
    assert_eq!(updated.field_name, "notes");
    assert!(manager.update_display_name(&ids[0], " ").await.is_err());
}

#[tokio::test]
async fn test_missing_id_is_not_found() {
    let manager = manager();
    let err = manager.set_flag("missing", FieldFlag::Required, true).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert!(matches!(manager.reorder("missing", 0).await, Err(BackofficeError::NotFound(_))));
    assert!(matches!(manager.delete("missing").await, Err(BackofficeError::NotFound(_))));
}

// ============================================================================
// Reorder / delete
// ============================================================================

#[tokio::test]
async fn test_reorder_moves_and_rewrites_positions() {
    let manager = manager();
    let ids = seed(&manager, &["a", "b", "c", "d"]).await;

    let ordered = manager.reorder(&ids[3], 1).await.unwrap();
    assert_eq!(names(&ordered), vec!["a", "d", "b", "c"]);
    let orders: Vec<i32> = ordered.iter().map(|d| d.sort_order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);

    let stored = manager.list().await.unwrap();
    assert_eq!(names(&stored), vec!["a", "d", "b", "c"]);
}

#[tokio::test]
async fn test_reorder_keeps_gapped_orders_outside_the_moved_range() {
    let manager = manager();
    let mut ids = Vec::new();
    for (name, order) in [("a", 10), ("b", 20), ("c", 30), ("d", 40)] {
        let mut input = NewFieldDefinition::new(name, FieldType::Text);
        input.sort_order = Some(order);
        ids.push(manager.create(input).await.unwrap().id);
    }

    let ordered = manager.reorder(&ids[2], 1).await.unwrap();
    assert_eq!(names(&ordered), vec!["a", "c", "b", "d"]);
    let orders: Vec<i32> = ordered.iter().map(|d| d.sort_order).collect();
    assert_eq!(orders, vec![10, 20, 30, 40]);

    let a = manager.store().get(&ids[0]).await.unwrap();
    let d = manager.store().get(&ids[3]).await.unwrap();
    assert_eq!(a.updated_at, a.created_at);
    assert_eq!(d.updated_at, d.created_at);
}

#[tokio::test]
async fn test_reorder_renumbers_shared_orders() {
    let manager = manager();
    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let mut input = NewFieldDefinition::new(name, FieldType::Text);
        input.sort_order = Some(0);
        ids.push(manager.create(input).await.unwrap().id);
    }

    let ordered = manager.reorder(&ids[2], 0).await.unwrap();
    assert_eq!(names(&ordered)[0], "c");
    let orders: Vec<i32> = ordered.iter().map(|d| d.sort_order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(names(&manager.list().await.unwrap())[0], "c");
}

#[tokio::test]
async fn test_reorder_past_end_moves_last() {
    let manager = manager();
    let ids = seed(&manager, &["a", "b", "c"]).await;
    let ordered = manager.reorder(&ids[0], 99).await.unwrap();
    assert_eq!(names(&ordered), vec!["b", "c", "a"]);
}

#[tokio::test]
async fn test_delete_leaves_orphans() {
    let manager = manager();
    let ids = seed(&manager, &["vat_number", "region"]).await;
    let values: FieldValues = [
        ("vat_number", FieldValue::from("PT1")),
        ("region", FieldValue::from("EU")),
    ]
    .into_iter()
    .collect();
    assert!(manager.orphaned_keys(&values).await.unwrap().is_empty());

    manager.delete(&ids[0]).await.unwrap();
    assert_eq!(manager.orphaned_keys(&values).await.unwrap(), vec!["vat_number"]);
    assert_eq!(manager.store().organization_id(), "org-1");
}
