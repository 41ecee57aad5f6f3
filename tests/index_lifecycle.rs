//! Document lifecycle against the index and the derived graph

mod common;

use common::{engine_with, no_prior, TestVault};
use proptest::prelude::*;
use relgraph::index::{ChangeCoalescer, IndexCommand, RelationshipIndex};
use relgraph::{Direction, GraphEngine, Relationship};
use std::time::{Duration, Instant};

#[test]
fn mutual_declarations_stay_distinct() {
    let engine = engine_with(&[("A", "<<-+>>[[B]]"), ("B", "<<-+>>[[A]]")]);
    let index = engine.index();

    assert_eq!(index.len(), 2);
    assert_eq!(index.relationships_for("A")[0].target_file, "B");
    assert_eq!(index.relationships_for("B")[0].target_file, "A");
    assert_ne!(
        index.relationships_for("A")[0].id,
        index.relationships_for("B")[0].id
    );

    let model = engine.model(no_prior());
    let offsets: Vec<f64> = model.edges.iter().map(|e| e.curve_offset).collect();
    assert_eq!(offsets.len(), 2);
    assert_ne!(offsets[0], offsets[1]);
}

#[test]
fn line_numbers_are_exact() {
    let engine = engine_with(&[("Doc", "title\n<<owns+>>[[X]]\n\nend")]);
    let rel = &engine.index().relationships_for("Doc")[0];
    assert_eq!(rel.line, 2);
    assert_eq!(rel.direction, Direction::Outgoing);
    assert_eq!(rel.label.as_deref(), Some("owns"));
}

#[test]
fn rename_rewrites_owned_and_incoming_relationships() {
    let mut engine = engine_with(&[
        ("Old", "<<-+>>[[A]]\n<<-+>>[[Old]]"),
        ("A", "<<+->>[[Old]]"),
        ("B", "<<uses>>[[Old]]\n<<-+>>[[A]]"),
    ]);
    let before = engine.index().len();

    engine.apply(IndexCommand::rename("Old", "New"));
    let index = engine.index();

    assert_eq!(index.len(), before);
    assert!(!index.contains_source("Old"));
    for rel in index.relationships_for("New") {
        assert_eq!(rel.source_file, "New");
        assert!(rel.id.starts_with("New:"));
    }
    assert!(index.all_relationships().all(|r| r.target_file != "Old"));
    assert_eq!(index.relationships_targeting("New").count(), 3);
    assert!(engine.exists("New"));

    let model = engine.model(no_prior());
    assert!(model.node("Old").is_none());
    assert!(!model.node("New").unwrap().is_ghost);
}

#[test]
fn removal_leaves_incoming_relationships_as_ghost_edges() {
    let mut engine = engine_with(&[("A", "<<-+>>[[B]]"), ("B", "<<-+>>[[C]]"), ("C", "")]);

    engine.apply(IndexCommand::delete("B"));
    let index = engine.index();
    assert!(index.relationships_for("B").is_empty());
    assert_eq!(index.relationships_targeting("B").count(), 1);

    let model = engine.model(no_prior());
    assert!(model.node("B").unwrap().is_ghost);
    assert!(model.node("C").is_none());
}

#[test]
fn creating_the_missing_document_resolves_the_ghost() {
    let mut engine = engine_with(&[("A", "<<-+>>[[Later]]")]);
    assert_eq!(engine.model(no_prior()).ghosts().count(), 1);

    engine.apply(IndexCommand::modify("Later", "# Later"));
    assert_eq!(engine.model(no_prior()).ghosts().count(), 0);
}

#[test]
fn prior_nodes_survive_in_model() {
    let mut engine = engine_with(&[("A", "<<-+>>[[B]]")]);
    engine.apply(IndexCommand::modify("A", "no links now"));
    let model = engine.model(["A", "B"]);
    assert_eq!(model.node_count(), 2);
    assert_eq!(model.edge_count(), 0);
}

#[test]
fn vault_documents_feed_full_scan() {
    let vault = TestVault::new();
    vault
        .write("Team.md", "<<manages+>>[[Project]]\n<<member of>>[[Org]]")
        .write("work/Project.md", "<<+owned by>>[[Team|the team]]");

    let mut engine = GraphEngine::new();
    engine.full_scan(vault.open().contents());

    assert_eq!(engine.index().source_count(), 2);
    let model = engine.model(no_prior());
    assert!(!model.node("Project").unwrap().is_ghost);
    assert!(model.node("Org").unwrap().is_ghost);
    assert_eq!(
        engine.index().relationships_for("Project")[0].target_file,
        "Team"
    );

    vault.remove("work/Project.md");
    engine.full_scan(vault.open().contents());
    assert!(engine.model(no_prior()).node("Project").unwrap().is_ghost);
}

#[test]
fn coalescer_reindexes_once_per_burst() {
    let mut coalescer = ChangeCoalescer::new(Duration::from_millis(300));
    let mut index = RelationshipIndex::new();
    let start = Instant::now();
    let mut text = String::new();

    for i in 0..10 {
        text.push_str("<<-+>>[[B]]\n");
        coalescer.note_modified("A", start + Duration::from_millis(i * 50));
        assert!(coalescer
            .drain_quiescent(start + Duration::from_millis(i * 50))
            .is_empty());
    }

    let due = coalescer.drain_quiescent(start + Duration::from_millis(450 + 300));
    assert_eq!(due, vec!["A".to_string()]);
    for id in due {
        index.reindex(&id, &text);
    }
    assert_eq!(index.len(), 10);
    assert_eq!(coalescer.pending_count(), 0);
}

fn command() -> impl Strategy<Value = IndexCommand> {
    let id = prop_oneof![Just("A"), Just("B"), Just("C"), Just("D")];
    let text = proptest::collection::vec(
        prop_oneof![
            Just("<<-+>>[[A]]"),
            Just("<<+->>[[B]]"),
            Just("<<rel>>[[C]]"),
            Just("<<++>>[[D]]"),
            Just("<<-->>[[A]]"),
            Just("plain\n"),
        ],
        0..5,
    )
    .prop_map(|parts| parts.join("\n"));

    prop_oneof![
        (id.clone(), text).prop_map(|(id, text)| IndexCommand::modify(id, text)),
        id.clone().prop_map(IndexCommand::delete),
        (id.clone(), id).prop_map(|(old, new)| IndexCommand::rename(old, new)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn all_relationships_is_union_of_entries(commands in proptest::collection::vec(command(), 0..20)) {
        let mut index = RelationshipIndex::new();
        for c in commands {
            index.apply(c);
        }

        let all: Vec<&Relationship> = index.all_relationships().collect();
        let union: Vec<&Relationship> = index
            .sources()
            .flat_map(|s| index.relationships_for(s))
            .collect();
        prop_assert_eq!(all, union);

        for source in index.sources() {
            for rel in index.relationships_for(source) {
                prop_assert_eq!(&rel.source_file, source);
            }
        }
    }
}
