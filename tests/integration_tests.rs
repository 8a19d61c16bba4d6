//! Integration tests for the complete playground pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Relation editing → wire encoding → backend run → ingestion
//! - Session → persistence transform → JSON file store → reload
//!
//! Run with: cargo test --test integration_tests

use tempfile::tempdir;

use scallop_backend::{build_run_request, EditorSession, MockBackend, RunResponse};
use scallop_relations::{Argument, ArgumentType, Direction, Fact};
use scallop_store::{JsonFileStore, Project, ProjectStore, StoreError};

fn family_session() -> EditorSession {
    let mut session = EditorSession::new();
    session.set_program("rel grandparent(a, c) = parent(a, b), parent(b, c)");
    session
        .create_relation(
            Direction::Input,
            "parent",
            vec![
                Argument::named("a", ArgumentType::String).expect("valid name"),
                Argument::named("b", ArgumentType::String).expect("valid name"),
            ],
            false,
        )
        .expect("should create input");
    session
        .create_relation(
            Direction::Output,
            "grandparent",
            vec![
                Argument::new(ArgumentType::String),
                Argument::new(ArgumentType::String),
            ],
            false,
        )
        .expect("should create output");
    for (row, (a, b)) in [("Alice", "Bob"), ("Bob", "Emily")].into_iter().enumerate() {
        session.add_fact_row("parent").expect("should add row");
        session.set_cell("parent", row, 0, a).expect("valid cell");
        session.set_cell("parent", row, 1, b).expect("valid cell");
    }
    session
}

// ============================================================================
// Editing → wire encoding
// ============================================================================

#[test]
fn test_run_request_wire_shape() {
    let session = family_session();
    let request =
        build_run_request(session.program(), session.relations()).expect("should encode");
    let json = serde_json::to_value(&request).expect("should serialize");

    assert_eq!(
        json["program"],
        serde_json::json!("rel grandparent(a, c) = parent(a, b), parent(b, c)")
    );
    assert_eq!(json["inputs"][0]["name"], serde_json::json!("parent"));
    assert_eq!(
        json["inputs"][0]["facts"],
        serde_json::json!([[1.0, ["Alice", "Bob"]], [1.0, ["Bob", "Emily"]]])
    );
    assert_eq!(json["outputs"][0]["name"], serde_json::json!("grandparent"));
    assert_eq!(json["outputs"][0]["args"][0]["type"], serde_json::json!("String"));
}

#[test]
fn test_probabilistic_weights_survive_encoding() {
    let mut session = EditorSession::new();
    session
        .create_relation(
            Direction::Input,
            "risk",
            vec![Argument::new(ArgumentType::String)],
            true,
        )
        .expect("should create");
    session.add_fact_row("risk").expect("should add row");
    session.set_cell("risk", 0, 0, "fire").expect("valid cell");
    session.set_weight("risk", 0, 0.3).expect("probability enabled");

    let request = build_run_request("", session.relations()).expect("should encode");
    let json = serde_json::to_value(&request).expect("should serialize");
    assert_eq!(json["inputs"][0]["facts"], serde_json::json!([[0.3, ["fire"]]]));
}

// ============================================================================
// Run → ingestion
// ============================================================================

#[tokio::test]
async fn test_run_fills_outputs_from_backend() {
    let mut session = family_session();
    let response: RunResponse = serde_json::from_value(serde_json::json!({
        "grandparent": [[1.0, ["Alice", "Emily"]]]
    }))
    .expect("valid response");
    let backend = MockBackend::always(response);

    session.run(&backend).await.expect("run should succeed");
    assert_eq!(backend.calls(), 1);

    let grandparent = session.relations().get("grandparent").expect("exists");
    assert_eq!(
        grandparent.facts,
        vec![Fact::new(1.0, vec!["Alice".into(), "Emily".into()])]
    );
}

#[tokio::test]
async fn test_float_outputs_accept_integer_tuples() {
    let mut session = EditorSession::new();
    session
        .create_relation(
            Direction::Output,
            "score",
            vec![Argument::new(ArgumentType::Float)],
            false,
        )
        .expect("should create");
    let response: RunResponse = serde_json::from_value(serde_json::json!({
        "score": [[1.0, [2]], [1.0, [7.9]]]
    }))
    .expect("valid response");

    session
        .run(&MockBackend::always(response))
        .await
        .expect("run should succeed");
    let cells: Vec<&str> = session
        .relations()
        .get("score")
        .expect("exists")
        .facts
        .iter()
        .map(|f| f.values[0].as_str())
        .collect();
    assert_eq!(cells, vec!["2", "7.9"]);
}

#[tokio::test]
async fn test_stale_cells_block_the_run_before_the_network() {
    let mut session = family_session();
    session
        .change_argument_type("parent", 0, ArgumentType::Integer)
        .expect("should retype");
    let before = session.relations().clone();
    let backend = MockBackend::always(RunResponse::new());

    session.run(&backend).await.expect_err("encoding should fail");
    assert_eq!(backend.calls(), 0);
    assert_eq!(session.relations(), &before);
}

#[tokio::test]
async fn test_undeclared_response_relation_is_rejected() {
    let mut session = family_session();
    let before = session.relations().clone();
    let response: RunResponse = serde_json::from_value(serde_json::json!({
        "surprise": [[1.0, ["x"]]]
    }))
    .expect("valid response");

    session
        .run(&MockBackend::always(response))
        .await
        .expect_err("ingestion should fail");
    assert_eq!(session.relations(), &before);
}

// ============================================================================
// Session → store → reload
// ============================================================================

#[tokio::test]
async fn test_session_round_trips_through_the_file_store() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("projects.json");

    let mut session = family_session();
    session.title = "Family tree".to_string();
    session.published = true;

    let response: RunResponse = serde_json::from_value(serde_json::json!({
        "grandparent": [[1.0, ["Alice", "Emily"]]]
    }))
    .expect("valid response");
    session
        .run(&MockBackend::always(response))
        .await
        .expect("run should succeed");

    let id = {
        let store = JsonFileStore::open(&path).expect("should open");
        let project = store.create(Project::new(None)).await.expect("should create");
        session
            .save_into(&store, project.id)
            .await
            .expect("should save");
        project.id
    };

    // Reopen from disk: schemas, facts, and run outputs all come back.
    let store = JsonFileStore::open(&path).expect("should reopen");
    let loaded = EditorSession::load(&store, id).await.expect("should load");
    assert_eq!(loaded.title, "Family tree");
    assert!(loaded.published);
    assert_eq!(loaded.program(), session.program());
    assert_eq!(loaded.relations(), session.relations());

    let listed = store.list_published().await.expect("should list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
}

#[tokio::test]
async fn test_legacy_empty_relation_columns_load_as_empty() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path().join("projects.json")).expect("should open");

    let mut project = Project::new(None);
    project.inputs = String::new();
    project.outputs = String::new();
    let project = store.create(project).await.expect("should create");

    let session = EditorSession::load(&store, project.id)
        .await
        .expect("empty columns are legal");
    assert!(session.relations().is_empty());
}

#[tokio::test]
async fn test_missing_projects_are_not_found() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path().join("projects.json")).expect("should open");

    let id = uuid::Uuid::new_v4();
    match EditorSession::load(&store, id).await {
        Err(StoreError::NotFound { id: missing }) => assert_eq!(missing, id),
        other => panic!("expected NotFound, got {other:?}"),
    }
}
