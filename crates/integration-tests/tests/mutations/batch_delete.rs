use integration_tests::{payload, Harness};
use model_definition::Key;
use mutation_engine::{encode_global_id, FieldHandlers, MutationError, RequestContext};
use pretty_assertions::assert_eq;
use serde_json::json;

fn create_task(harness: &Harness, attributes: serde_json::Value) {
    harness
        .engine()
        .create(
            harness.entity("Task"),
            "CreateTaskInput",
            &payload(attributes),
            &RequestContext::new(),
        )
        .unwrap();
}

#[test]
fn reference_filters_match_by_storage_column() {
    let harness = Harness::new();
    let context = RequestContext::new();
    let task = harness.entity("Task");

    for name in ["Ada", "Grace"] {
        harness
            .engine()
            .create(
                harness.entity("User"),
                "CreateUserInput",
                &payload(json!({ "name": name })),
                &context,
            )
            .unwrap();
    }

    create_task(&harness, json!({ "title": "a", "owner": 1 }));
    create_task(&harness, json!({ "title": "b", "owner": 2 }));
    create_task(&harness, json!({ "title": "c", "owner": 1 }));

    let outcome = harness
        .engine()
        .batch_delete(task, &payload(json!({ "owner": 1 })), &context)
        .unwrap();

    assert_eq!(outcome.deletion_count, 2);
    assert_eq!(
        outcome.deleted_ids,
        vec![
            encode_global_id("Task", &Key::Int(1)),
            encode_global_id("Task", &Key::Int(3)),
        ],
    );

    let rows = harness.store.rows(task);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, Key::Int(2));

    // Opaque references filter the same way raw keys do.
    let outcome = harness
        .engine()
        .batch_delete(
            task,
            &payload(json!({ "owner": encode_global_id("User", &Key::Int(2)) })),
            &context,
        )
        .unwrap();

    assert_eq!(outcome.deletion_count, 1);
    assert!(harness.store.rows(task).is_empty());
}

#[test]
fn scalar_filters_match_by_database_column() {
    let harness = Harness::new();

    create_task(&harness, json!({ "title": "a", "createdAt": "2024-01-01T00:00:00Z" }));
    create_task(&harness, json!({ "title": "b", "createdAt": "2024-02-01T00:00:00Z" }));

    let outcome = harness
        .engine()
        .batch_delete(
            harness.entity("Task"),
            &payload(json!({ "createdAt": "2024-01-01T00:00:00Z" })),
            &RequestContext::new(),
        )
        .unwrap();

    assert_eq!(outcome.deletion_count, 1);
    assert_eq!(outcome.deleted_ids, vec![encode_global_id("Task", &Key::Int(1))]);
}

#[test]
fn null_filters_match_rows_missing_the_attribute() {
    let harness = Harness::new();
    let task = harness.entity("Task");

    create_task(&harness, json!({ "title": "a", "description": "keep me" }));
    create_task(&harness, json!({ "title": "b" }));
    create_task(&harness, json!({ "title": "c", "description": null }));

    let outcome = harness
        .engine()
        .batch_delete(task, &payload(json!({ "description": null })), &RequestContext::new())
        .unwrap();

    assert_eq!(outcome.deletion_count, 2);
    assert_eq!(
        outcome.deleted_ids,
        vec![
            encode_global_id("Task", &Key::Int(2)),
            encode_global_id("Task", &Key::Int(3)),
        ],
    );

    let rows = harness.store.rows(task);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].attributes["description"], json!("keep me"));
}

#[test]
fn collection_filters_match_rows_containing_every_member() {
    let harness = Harness::new();
    let context = RequestContext::new();
    let task = harness.entity("Task");

    for label in ["bug", "urgent"] {
        harness
            .engine()
            .create(
                harness.entity("Tag"),
                "CreateTagInput",
                &payload(json!({ "label": label })),
                &context,
            )
            .unwrap();
    }

    create_task(&harness, json!({ "title": "a", "tags": [1, 2] }));
    create_task(&harness, json!({ "title": "b", "tags": [1] }));
    create_task(&harness, json!({ "title": "c" }));

    let outcome = harness
        .engine()
        .batch_delete(task, &payload(json!({ "tags": [1, 2] })), &context)
        .unwrap();

    assert_eq!(outcome.deletion_count, 1);
    assert_eq!(outcome.deleted_ids, vec![encode_global_id("Task", &Key::Int(1))]);

    let outcome = harness
        .engine()
        .batch_delete(task, &payload(json!({ "tags": [1] })), &context)
        .unwrap();

    assert_eq!(outcome.deletion_count, 1);
    assert_eq!(outcome.deleted_ids, vec![encode_global_id("Task", &Key::Int(2))]);

    let rows = harness.store.rows(task);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].attributes["title"], json!("c"));
}

#[test]
fn unknown_filter_fields_pass_through_and_match_nothing() {
    let harness = Harness::new();
    let task = harness.entity("Task");

    create_task(&harness, json!({ "title": "a" }));
    create_task(&harness, json!({ "title": "b" }));

    let outcome = harness
        .engine()
        .batch_delete(task, &payload(json!({ "archived": true })), &RequestContext::new())
        .unwrap();

    assert_eq!(outcome.deletion_count, 0);
    assert!(outcome.deleted_ids.is_empty());
    assert_eq!(harness.store.rows(task).len(), 2);
}

#[test]
fn filters_run_field_handlers() {
    let harness = Harness::new();
    let task = harness.entity("Task");

    create_task(&harness, json!({ "title": "ALPHA" }));
    create_task(&harness, json!({ "title": "BETA" }));

    let engine = harness.engine().with_handlers(FieldHandlers::new().with(
        "title",
        |value, _, _| Ok(json!(value.as_str().unwrap_or_default().to_uppercase())),
    ));

    let outcome = engine
        .batch_delete(task, &payload(json!({ "title": "alpha" })), &RequestContext::new())
        .unwrap();

    assert_eq!(outcome.deletion_count, 1);

    let rows = harness.store.rows(task);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].attributes["title"], json!("BETA"));
}

#[test]
fn unusable_reference_filters_fail_the_mutation() {
    let harness = Harness::new();
    let task = harness.entity("Task");

    create_task(&harness, json!({ "title": "a", "owner": 1 }));

    let error = harness
        .engine()
        .batch_delete(task, &payload(json!({ "owner": true })), &RequestContext::new())
        .unwrap_err();

    assert!(matches!(error, MutationError::MalformedReference { .. }));
    assert_eq!(harness.store.rows(task).len(), 1);
}
