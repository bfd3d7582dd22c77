use expect_test::expect;
use indoc::indoc;
use integration_tests::{meta, payload, Harness};
use model_definition::{EntityRecord, EntityStore, Key, StoreError};
use mutation_engine::{encode_global_id, MutationError, RequestContext};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn create_task(harness: &Harness, attributes: Value) -> EntityRecord {
    harness
        .engine()
        .create(
            harness.entity("Task"),
            "CreateTaskInput",
            &payload(attributes),
            &RequestContext::new(),
        )
        .unwrap()
}

fn create_tags(harness: &Harness, labels: &[&str]) {
    for label in labels {
        harness
            .engine()
            .create(
                harness.entity("Tag"),
                "CreateTagInput",
                &payload(json!({ "label": label })),
                &RequestContext::new(),
            )
            .unwrap();
    }
}

#[test]
fn scalar_changes_persist_through_save() {
    let harness = Harness::new();
    let context = RequestContext::new();
    let task = harness.entity("Task");

    create_task(&harness, json!({ "title": "Old", "description": "keep me" }));

    let updated = harness
        .engine()
        .update_by_id(task, "UpdateTaskInput", &json!(1), &payload(json!({ "title": "New" })), &context)
        .unwrap();

    assert_eq!(updated.attributes["title"], json!("New"));

    let rows = harness.store.rows(task);

    assert_eq!(rows[0].attributes["title"], json!("New"));
    assert_eq!(rows[0].attributes["description"], json!("keep me"));

    harness
        .engine()
        .update_by_id(
            task,
            "UpdateTaskInput",
            &json!(encode_global_id("Task", &Key::Int(1))),
            &payload(json!({ "title": "Newer" })),
            &context,
        )
        .unwrap();

    assert_eq!(harness.store.rows(task)[0].attributes["title"], json!("Newer"));
    assert_eq!(
        harness.store.operations().last().map(String::as_str),
        Some("save Task#1"),
    );
}

#[test]
fn patch_inputs_flow_through_the_same_path() {
    let harness = Harness::new();
    let task = harness.entity("Task");

    create_task(&harness, json!({ "title": "a", "description": "keep me" }));

    harness
        .engine()
        .update_by_id(
            task,
            "PatchTaskInput",
            &json!(1),
            &payload(json!({ "description": "rewritten" })),
            &RequestContext::new(),
        )
        .unwrap();

    let rows = harness.store.rows(task);

    assert_eq!(rows[0].attributes["title"], json!("a"));
    assert_eq!(rows[0].attributes["description"], json!("rewritten"));
}

#[test]
fn reference_updates_write_the_storage_column() {
    let harness = Harness::new();
    let context = RequestContext::new();
    let task = harness.entity("Task");

    harness
        .engine()
        .create(
            harness.entity("User"),
            "CreateUserInput",
            &payload(json!({ "name": "Ada" })),
            &context,
        )
        .unwrap();

    create_task(&harness, json!({ "title": "a" }));

    harness
        .engine()
        .update_by_id(task, "UpdateTaskInput", &json!(1), &payload(json!({ "owner": 1 })), &context)
        .unwrap();

    assert_eq!(harness.store.rows(task)[0].attributes["assignee_id"], json!(1));

    harness
        .engine()
        .update_by_id(task, "UpdateTaskInput", &json!(1), &payload(json!({ "owner": null })), &context)
        .unwrap();

    assert_eq!(harness.store.rows(task)[0].attributes["assignee_id"], json!(null));
}

#[test]
fn collection_updates_replace_the_association_set() {
    let harness = Harness::new();

    create_tags(&harness, &["bug", "urgent", "regression"]);
    let record = create_task(&harness, json!({ "title": "a", "tags": [1, 2] }));

    harness
        .engine()
        .update_by_id(
            harness.entity("Task"),
            "UpdateTaskInput",
            &json!(1),
            &payload(json!({ "tags": [2, 3] })),
            &RequestContext::new(),
        )
        .unwrap();

    let tags = harness.relation("Task", "tags");

    assert_eq!(harness.store.association(tags, &record.key), vec![Key::Int(2), Key::Int(3)]);
}

#[test]
fn exact_extras_replace_the_set_on_update() {
    let mut harness = Harness::new();

    harness.register(
        "UpdateTaskTagsInput",
        "Task",
        meta(indoc! {r#"
            { "many_to_many_extras": { "tags": { "exact": true } } }
        "#}),
    );

    create_tags(&harness, &["bug", "urgent", "regression"]);
    create_task(&harness, json!({ "title": "a", "tags": [1, 2] }));

    harness
        .engine()
        .update_by_id(
            harness.entity("Task"),
            "UpdateTaskTagsInput",
            &json!(1),
            &payload(json!({ "tags": [3] })),
            &RequestContext::new(),
        )
        .unwrap();

    let tags = harness.relation("Task", "tags");

    assert_eq!(harness.store.association(tags, &Key::Int(1)), vec![Key::Int(3)]);

    expect![[r#"
        insert Tag#1
        insert Tag#2
        insert Tag#3
        insert Task#1
        set tags of Task#1 [1, 2]
        set tags of Task#1 [3]
        save Task#1"#]]
    .assert_eq(&harness.store.operations().join("\n"));
}

#[test]
fn association_extras_adjust_membership_on_update() {
    let mut harness = Harness::new();

    harness.register(
        "UpdateTaskTagsInput",
        "Task",
        meta(indoc! {r#"
            { "many_to_many_extras": { "tags": { "add": true, "remove": true } } }
        "#}),
    );

    create_tags(&harness, &["bug", "urgent", "regression"]);
    let record = create_task(&harness, json!({ "title": "a", "tags": [1, 2] }));

    harness
        .engine()
        .update_by_id(
            harness.entity("Task"),
            "UpdateTaskTagsInput",
            &json!(1),
            &payload(json!({ "tagsAdd": [3], "tagsRemove": [1] })),
            &RequestContext::new(),
        )
        .unwrap();

    let tags = harness.relation("Task", "tags");

    assert_eq!(harness.store.association(tags, &record.key), vec![Key::Int(2), Key::Int(3)]);

    expect![[r#"
        insert Tag#1
        insert Tag#2
        insert Tag#3
        insert Task#1
        set tags of Task#1 [1, 2]
        add tags of Task#1 [3]
        remove tags of Task#1 [1]
        save Task#1"#]]
    .assert_eq(&harness.store.operations().join("\n"));
}

#[test]
fn explicit_operation_descriptors_control_membership() {
    let mut harness = Harness::new();

    harness.register(
        "UpdateTaskWatchersInput",
        "Task",
        meta(indoc! {r#"
            { "many_to_many_extras": { "watchers": { "prune": { "operation": "remove" } } } }
        "#}),
    );

    let context = RequestContext::new();

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

    create_task(&harness, json!({ "title": "a", "watchers": [1, 2] }));

    harness
        .engine()
        .update_by_id(
            harness.entity("Task"),
            "UpdateTaskWatchersInput",
            &json!(1),
            &payload(json!({ "watchersPrune": [1] })),
            &context,
        )
        .unwrap();

    let watchers = harness.relation("Task", "watchers");

    assert_eq!(harness.store.association(watchers, &Key::Int(1)), vec![Key::Int(2)]);
}

#[test]
fn auto_context_fields_seed_on_update() {
    let mut harness = Harness::new();

    harness.register(
        "UpdateAuditedTaskInput",
        "Task",
        meta(indoc! {r#"
            { "auto_context_fields": { "created_by": "user_id" } }
        "#}),
    );

    let task = harness.entity("Task");

    create_task(&harness, json!({ "title": "a" }));

    harness
        .engine()
        .update_by_id(
            task,
            "UpdateAuditedTaskInput",
            &json!(1),
            &payload(json!({ "title": "b" })),
            &RequestContext::new().with_attribute("user_id", 7),
        )
        .unwrap();

    assert_eq!(harness.store.rows(task)[0].attributes["created_by_id"], json!(7));
}

#[test]
fn client_supplied_references_override_the_update_seed() {
    let mut harness = Harness::new();

    harness.register(
        "UpdateAuditedTaskInput",
        "Task",
        meta(indoc! {r#"
            { "auto_context_fields": { "created_by": "user_id" } }
        "#}),
    );

    let task = harness.entity("Task");

    harness
        .engine()
        .create(
            harness.entity("User"),
            "CreateUserInput",
            &payload(json!({ "name": "Ada" })),
            &RequestContext::new(),
        )
        .unwrap();

    create_task(&harness, json!({ "title": "a" }));

    harness
        .engine()
        .update_by_id(
            task,
            "UpdateAuditedTaskInput",
            &json!(1),
            &payload(json!({ "createdBy": 1 })),
            &RequestContext::new().with_attribute("user_id", 7),
        )
        .unwrap();

    let rows = harness.store.rows(task);

    assert_eq!(rows[0].attributes["created_by_id"], json!(1));
    assert!(rows[0].attributes.get("created_by").is_none());
}

#[test]
fn reference_extras_keep_the_raw_payload_value() {
    let mut harness = Harness::new();

    harness.register(
        "UpdateTaskOwnerInput",
        "Task",
        meta(indoc! {r#"
            { "foreign_key_extras": { "owner": { "type": "ID" } } }
        "#}),
    );

    let task = harness.entity("Task");

    harness
        .engine()
        .create(
            harness.entity("User"),
            "CreateUserInput",
            &payload(json!({ "name": "Ada" })),
            &RequestContext::new(),
        )
        .unwrap();

    create_task(&harness, json!({ "title": "a" }));

    let reference = encode_global_id("User", &Key::Int(1));

    harness
        .engine()
        .update_by_id(
            task,
            "UpdateTaskOwnerInput",
            &json!(1),
            &payload(json!({ "owner": reference })),
            &RequestContext::new(),
        )
        .unwrap();

    // The update path assigns the value as sent; it reaches the
    // reference column through save without disambiguation.
    assert_eq!(harness.store.rows(task)[0].attributes["assignee_id"], json!(reference));
}

#[test]
fn nested_reference_extras_create_but_do_not_link() {
    let mut harness = Harness::new();

    harness.register(
        "UpdateTaskOwnerInput",
        "Task",
        meta(indoc! {r#"
            { "foreign_key_extras": { "owner": { "type": "CreateUserInput" } } }
        "#}),
    );

    let task = harness.entity("Task");

    create_task(&harness, json!({ "title": "a" }));

    harness
        .engine()
        .update_by_id(
            task,
            "UpdateTaskOwnerInput",
            &json!(1),
            &payload(json!({ "owner": { "name": "Ada" } })),
            &RequestContext::new(),
        )
        .unwrap();

    let users = harness.store.rows(harness.entity("User"));

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].attributes["name"], json!("Ada"));

    // The related row exists, but the reference column keeps the raw
    // nested payload instead of the created key.
    assert_eq!(
        harness.store.rows(task)[0].attributes["assignee_id"],
        json!({ "name": "Ada" }),
    );
}

#[test]
fn updating_a_missing_row_is_an_error() {
    let harness = Harness::new();

    let error = harness
        .engine()
        .update_by_id(
            harness.entity("Task"),
            "UpdateTaskInput",
            &json!(99),
            &payload(json!({ "title": "x" })),
            &RequestContext::new(),
        )
        .unwrap_err();

    assert_eq!(
        error,
        MutationError::Store(StoreError::NotFound {
            entity: "Task".to_string(),
            key: Key::Int(99),
        }),
    );
}

#[test]
fn in_place_updates_leave_persistence_to_the_caller() {
    let harness = Harness::new();
    let task = harness.entity("Task");

    let mut record = create_task(&harness, json!({ "title": "Old" }));

    harness
        .engine()
        .update(
            &mut record,
            "UpdateTaskInput",
            &payload(json!({ "title": "New" })),
            &RequestContext::new(),
        )
        .unwrap();

    assert_eq!(record.attributes["title"], json!("New"));
    assert_eq!(harness.store.rows(task)[0].attributes["title"], json!("Old"));

    harness.store.save(&record).unwrap();

    assert_eq!(harness.store.rows(task)[0].attributes["title"], json!("New"));
}
