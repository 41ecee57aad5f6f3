//! Layout continuity across graph rebuilds

mod common;

use common::engine_with;
use relgraph::index::IndexCommand;
use relgraph::layout::{LayoutParams, Simulation, Vec2};
use std::collections::HashMap;

fn positions(sim: &Simulation) -> HashMap<String, Vec2> {
    sim.positions()
        .into_iter()
        .map(|p| (p.id, Vec2::new(p.x, p.y)))
        .collect()
}

#[test]
fn adding_a_node_does_not_reset_existing_positions() {
    let mut engine = engine_with(&[
        ("A", "<<-+>>[[B]]\n<<-+>>[[C]]"),
        ("B", "<<-+>>[[C]]"),
        ("C", ""),
    ]);
    let mut sim = Simulation::with_seed(LayoutParams::default(), 42);
    let model = engine.model(Vec::<String>::new());
    sim.sync(&model);
    sim.settle(10_000);
    assert!(sim.is_settled());
    let settled = positions(&sim);

    engine.apply(IndexCommand::modify("C", "<<-+>>[[D]]"));
    let prior: Vec<String> = settled.keys().cloned().collect();
    let rebuilt = engine.model(prior);
    let outcome = sim.sync(&rebuilt);
    assert_eq!(outcome.added, 1);
    assert_eq!(outcome.removed, 0);

    // sync alone moves nothing
    for (id, before) in &settled {
        assert_eq!(sim.position(id), Some(*before));
    }

    // one tick: velocity cap plus a small centering shift
    let bound = sim.params().max_speed + 1.0;
    sim.tick();
    for (id, before) in &settled {
        let after = sim.position(id).unwrap();
        assert!(
            after.distance(*before) <= bound,
            "{} jumped from {:?} to {:?}",
            id,
            before,
            after
        );
    }
}

#[test]
fn new_node_is_seeded_near_center_not_near_origin() {
    let engine = engine_with(&[("A", "<<-+>>[[B]]")]);
    let params = LayoutParams::default();
    let mut sim = Simulation::with_seed(params.clone(), 9);
    sim.sync(&engine.model(Vec::<String>::new()));

    let center = params.center();
    for p in sim.positions() {
        let offset = Vec2::new(p.x, p.y) - center;
        assert!(offset.x.abs() <= params.seed_jitter);
        assert!(offset.y.abs() <= params.seed_jitter);
    }
}

#[test]
fn settings_change_keeps_layout() {
    let engine = engine_with(&[("A", "<<-+>>[[B]]\n<<-+>>[[C]]")]);
    let mut sim = Simulation::with_seed(LayoutParams::default(), 5);
    sim.sync(&engine.model(Vec::<String>::new()));
    sim.settle(10_000);
    let settled = positions(&sim);
    let rest = settled["A"].distance(settled["B"]);

    let mut params = LayoutParams::default();
    params.link_distance = 150.0;
    sim.set_params(params);
    assert!(!sim.is_settled());
    for (id, before) in &settled {
        assert_eq!(sim.position(id), Some(*before));
    }

    sim.settle(10_000);
    let a = sim.position("A").unwrap();
    let b = sim.position("B").unwrap();
    assert!(a.distance(b) > rest);
}

#[test]
fn drag_pins_node_and_release_lets_it_move() {
    let engine = engine_with(&[("A", "<<-+>>[[B]]")]);
    let mut sim = Simulation::with_seed(LayoutParams::default(), 3);
    sim.sync(&engine.model(Vec::<String>::new()));
    sim.settle(10_000);

    let grab = Vec2::new(50.0, 50.0);
    assert!(sim.pin("A", grab));
    for _ in 0..100 {
        sim.tick();
    }
    assert_eq!(sim.position("A"), Some(grab));
    assert!(!sim.is_settled());

    assert!(sim.release("A"));
    sim.settle(10_000);
    assert!(sim.is_settled());
    assert_ne!(sim.position("A"), Some(grab));
}
