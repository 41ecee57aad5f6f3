//! Force-directed layout simulation
//!
//! A velocity-Verlet style simulation driven by an alpha ("temperature")
//! that decays towards a target. Each tick applies, scaled by alpha:
//!
//! - link springs pulling connected nodes towards `link_distance`
//! - pairwise repulsion falling off with squared distance
//! - a centering shift towards the viewport center
//! - collision separation below `2 * collision_radius`
//!
//! Body state is keyed by node identifier and survives every `sync`, so a
//! rebuilt graph continues from where the previous one left off.

use super::vector::Vec2;
use crate::model::GraphModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;
use tracing::debug;

/// Lower bound on squared distance in the repulsion term
const MIN_DISTANCE_SQ: f64 = 1.0;

/// Strength of the collision separation (0..=1)
const COLLISION_STRENGTH: f64 = 0.7;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Viewport width
    pub width: f64,
    /// Viewport height
    pub height: f64,
    /// Rest length of link springs
    pub link_distance: f64,
    /// Spring stiffness multiplier
    pub link_strength: f64,
    /// Pairwise repulsion
    pub repulsion_strength: f64,
    /// Fraction of the centroid offset corrected per tick
    pub center_strength: f64,
    /// Node radius used for overlap separation
    pub collision_radius: f64,
    /// Fraction of velocity lost per tick
    pub velocity_decay: f64,
    /// Rate at which alpha approaches its target
    pub alpha_decay: f64,
    /// Below this alpha the layout counts as settled
    pub alpha_min: f64,
    /// Alpha restored when the graph changes or a node is dragged
    pub reheat_alpha: f64,
    /// Per-tick speed cap
    pub max_speed: f64,
    /// Half-width of the square new nodes are seeded in
    pub seed_jitter: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            link_distance: 100.0,
            link_strength: 0.7,
            repulsion_strength: 300.0,
            center_strength: 0.05,
            collision_radius: 14.0,
            velocity_decay: 0.4,
            // reaches alpha_min from 1.0 in ~300 ticks
            alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
            alpha_min: 0.001,
            reheat_alpha: 0.3,
            max_speed: 40.0,
            seed_jitter: 30.0,
        }
    }
}

impl LayoutParams {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Physical state of one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Fixed position while the node is dragged
    pub pinned: Option<Vec2>,
}

impl Body {
    fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            pinned: None,
        }
    }
}

/// Position of a node as emitted per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub pinned: bool,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickStatus {
    /// Nodes moved; alpha after the tick
    Running { alpha: f64 },
    /// Alpha is below the minimum; nothing moved
    Settled,
}

/// What a `sync` changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncOutcome {
    pub added: usize,
    pub removed: usize,
    pub reheated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Link {
    source: usize,
    target: usize,
    strength: f64,
    /// Share of the correction applied to the target
    bias: f64,
}

/// The layout simulation.
#[derive(Debug, Clone)]
pub struct Simulation {
    params: LayoutParams,
    bodies: HashMap<String, Body>,
    order: Vec<String>,
    links: Vec<Link>,
    alpha: f64,
    alpha_target: f64,
    ticks: u64,
    rng: StdRng,
}

impl Simulation {
    /// Create an empty simulation seeded from OS entropy
    pub fn new(params: LayoutParams) -> Self {
        Self::with_rng(params, StdRng::from_entropy())
    }

    /// Create an empty simulation with reproducible seeding of new nodes
    pub fn with_seed(params: LayoutParams, seed: u64) -> Self {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: LayoutParams, rng: StdRng) -> Self {
        Self {
            params,
            bodies: HashMap::new(),
            order: Vec::new(),
            links: Vec::new(),
            alpha: 1.0,
            alpha_target: 0.0,
            ticks: 0,
            rng,
        }
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Swap parameters; existing bodies keep their state.
    pub fn set_params(&mut self, params: LayoutParams) {
        self.params = params;
        self.reheat();
    }

    /// Align the simulation with a freshly built graph model.
    ///
    /// Surviving nodes keep position and velocity untouched. New nodes are
    /// seeded near the viewport center. Alpha is reheated when the node set
    /// or the link structure changed.
    pub fn sync(&mut self, model: &GraphModel) -> SyncOutcome {
        let order: Vec<String> = model.node_ids().map(str::to_string).collect();
        let wanted: HashSet<&str> = order.iter().map(String::as_str).collect();

        let before = self.bodies.len();
        self.bodies.retain(|id, _| wanted.contains(id.as_str()));
        let removed = before - self.bodies.len();

        let mut added = 0;
        for id in &order {
            if !self.bodies.contains_key(id) {
                let position = self.seed_position();
                self.bodies.insert(id.clone(), Body::at(position));
                added += 1;
            }
        }

        let index: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        let pairs: Vec<(usize, usize)> = model
            .edges
            .iter()
            .filter(|e| !e.is_self_loop())
            .filter_map(|e| Some((*index.get(e.source.as_str())?, *index.get(e.target.as_str())?)))
            .collect();

        let links_changed = {
            let old: Vec<(&str, &str)> = self
                .links
                .iter()
                .map(|l| (self.order[l.source].as_str(), self.order[l.target].as_str()))
                .collect();
            let new: Vec<(&str, &str)> = pairs
                .iter()
                .map(|&(s, t)| (order[s].as_str(), order[t].as_str()))
                .collect();
            old != new
        };

        self.links = build_links(&pairs, order.len(), self.params.link_strength);
        self.order = order;

        let reheated = added > 0 || removed > 0 || links_changed;
        if reheated {
            self.reheat();
        }
        debug!(
            nodes = self.order.len(),
            links = self.links.len(),
            added,
            removed,
            reheated,
            "layout synced with graph model"
        );
        SyncOutcome {
            added,
            removed,
            reheated,
        }
    }

    fn seed_position(&mut self) -> Vec2 {
        let jitter = self.params.seed_jitter.abs();
        if jitter == 0.0 {
            return self.params.center();
        }
        let offset = Vec2::new(
            self.rng.gen_range(-jitter..=jitter),
            self.rng.gen_range(-jitter..=jitter),
        );
        self.params.center() + offset
    }

    /// Advance one step.
    pub fn tick(&mut self) -> TickStatus {
        if self.is_settled() {
            return TickStatus::Settled;
        }
        self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

        let mut bodies: Vec<Body> = self.order.iter().map(|id| self.bodies[id]).collect();
        self.apply_links(&mut bodies);
        self.apply_repulsion(&mut bodies);
        self.apply_centering(&mut bodies);
        self.apply_collision(&mut bodies);

        let max_speed = self.params.max_speed;
        let keep = 1.0 - self.params.velocity_decay;
        for (id, mut body) in self.order.iter().zip(bodies) {
            match body.pinned {
                Some(fixed) => {
                    body.position = fixed;
                    body.velocity = Vec2::ZERO;
                }
                None => {
                    body.velocity = (body.velocity * keep).clamp_length(max_speed);
                    body.position += body.velocity;
                }
            }
            self.bodies.insert(id.clone(), body);
        }

        self.ticks += 1;
        TickStatus::Running { alpha: self.alpha }
    }

    fn apply_links(&self, bodies: &mut [Body]) {
        let alpha = self.alpha;
        for link in &self.links {
            let (s, t) = (bodies[link.source], bodies[link.target]);
            let mut delta =
                (t.position + t.velocity) - (s.position + s.velocity);
            if delta.length_sq() == 0.0 {
                delta = jiggle(link.source, link.target);
            }
            let distance = delta.length();
            let stretch =
                (distance - self.params.link_distance) / distance * alpha * link.strength;
            let correction = delta * stretch;
            bodies[link.target].velocity -= correction * link.bias;
            bodies[link.source].velocity += correction * (1.0 - link.bias);
        }
    }

    fn apply_repulsion(&self, bodies: &mut [Body]) {
        let strength = self.params.repulsion_strength * self.alpha;
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let mut delta = bodies[j].position - bodies[i].position;
                if delta.length_sq() == 0.0 {
                    delta = jiggle(i, j);
                }
                let weight = strength / delta.length_sq().max(MIN_DISTANCE_SQ);
                bodies[i].velocity -= delta * weight;
                bodies[j].velocity += delta * weight;
            }
        }
    }

    fn apply_centering(&self, bodies: &mut [Body]) {
        let free: Vec<usize> = (0..bodies.len())
            .filter(|&i| bodies[i].pinned.is_none())
            .collect();
        if free.is_empty() {
            return;
        }
        let sum = free
            .iter()
            .fold(Vec2::ZERO, |acc, &i| acc + bodies[i].position);
        let centroid = sum / free.len() as f64;
        let shift = (self.params.center() - centroid) * self.params.center_strength;
        for &i in &free {
            bodies[i].position += shift;
        }
    }

    fn apply_collision(&self, bodies: &mut [Body]) {
        let reach = self.params.collision_radius * 2.0;
        if reach <= 0.0 {
            return;
        }
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let a = bodies[i].position + bodies[i].velocity;
                let b = bodies[j].position + bodies[j].velocity;
                let mut delta = b - a;
                if delta.length_sq() >= reach * reach {
                    continue;
                }
                if delta.length_sq() == 0.0 {
                    delta = jiggle(i, j);
                }
                let distance = delta.length();
                let push = (reach - distance) / distance * COLLISION_STRENGTH * 0.5;
                bodies[i].velocity -= delta * push;
                bodies[j].velocity += delta * push;
            }
        }
    }

    /// Tick until settled or `max_ticks` reached. Returns ticks performed.
    pub fn settle(&mut self, max_ticks: usize) -> usize {
        let mut performed = 0;
        while performed < max_ticks {
            match self.tick() {
                TickStatus::Running { .. } => performed += 1,
                TickStatus::Settled => break,
            }
        }
        performed
    }

    /// Pin a node at `position` for a drag. Other nodes keep moving.
    pub fn pin(&mut self, id: &str, position: Vec2) -> bool {
        let Some(body) = self.bodies.get_mut(id) else {
            return false;
        };
        body.pinned = Some(position);
        body.position = position;
        body.velocity = Vec2::ZERO;
        self.alpha_target = self.params.reheat_alpha;
        true
    }

    /// Release a dragged node back to the simulation.
    pub fn release(&mut self, id: &str) -> bool {
        let Some(body) = self.bodies.get_mut(id) else {
            return false;
        };
        body.pinned = None;
        if self.bodies.values().all(|b| b.pinned.is_none()) {
            self.alpha_target = 0.0;
        }
        true
    }

    /// Restart from full temperature.
    pub fn restart(&mut self) {
        self.alpha = 1.0;
    }

    /// Raise alpha to at least the reheat level.
    pub fn reheat(&mut self) {
        self.alpha = self.alpha.max(self.params.reheat_alpha);
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.params.alpha_min && self.alpha_target < self.params.alpha_min
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Ticks performed since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn body(&self, id: &str) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn position(&self, id: &str) -> Option<Vec2> {
        self.bodies.get(id).map(|b| b.position)
    }

    /// Current positions in model node order
    pub fn positions(&self) -> Vec<NodePosition> {
        self.order
            .iter()
            .filter_map(|id| {
                let body = self.bodies.get(id)?;
                Some(NodePosition {
                    id: id.clone(),
                    x: body.position.x,
                    y: body.position.y,
                    pinned: body.pinned.is_some(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// d3-style link weights: stiffness shared by degree, bias towards the
/// better-connected end.
fn build_links(pairs: &[(usize, usize)], node_count: usize, stiffness: f64) -> Vec<Link> {
    let mut degree = vec![0usize; node_count];
    for &(s, t) in pairs {
        degree[s] += 1;
        degree[t] += 1;
    }
    pairs
        .iter()
        .map(|&(source, target)| {
            let (ds, dt) = (degree[source] as f64, degree[target] as f64);
            Link {
                source,
                target,
                strength: stiffness / ds.min(dt),
                bias: ds / (ds + dt),
            }
        })
        .collect()
}

/// Tiny deterministic offset for coincident points
fn jiggle(i: usize, j: usize) -> Vec2 {
    let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214 + 0.11) * TAU;
    Vec2::from_angle(angle) * 1e-3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse;
    use crate::model::{build, LabelFilter};
    use std::collections::HashSet;

    fn model(docs: &[(&str, &str)]) -> GraphModel {
        let rels: Vec<_> = docs.iter().flat_map(|(id, t)| parse(t, id)).collect();
        build(Vec::<String>::new(), &rels, &HashSet::<String>::new(), &LabelFilter::none())
    }

    fn chain() -> GraphModel {
        model(&[("A", "<<-+>>[[B]]"), ("B", "<<-+>>[[C]]")])
    }

    #[test]
    fn new_nodes_seed_near_center() {
        let params = LayoutParams::default();
        let mut sim = Simulation::with_seed(params.clone(), 7);
        let outcome = sim.sync(&chain());
        assert_eq!(outcome.added, 3);
        for p in sim.positions() {
            assert!((p.x - params.width / 2.0).abs() <= params.seed_jitter);
            assert!((p.y - params.height / 2.0).abs() <= params.seed_jitter);
        }
    }

    #[test]
    fn simulation_settles() {
        let mut sim = Simulation::with_seed(LayoutParams::default(), 1);
        sim.sync(&chain());
        let ticks = sim.settle(10_000);
        assert!(ticks > 0 && ticks < 10_000);
        assert!(sim.is_settled());
        assert_eq!(sim.tick(), TickStatus::Settled);
    }

    #[test]
    fn settled_layout_separates_nodes() {
        let mut sim = Simulation::with_seed(LayoutParams::default(), 3);
        sim.sync(&model(&[("A", "<<-+>>[[B]]\n<<-+>>[[C]]\n<<-+>>[[D]]")]));
        sim.settle(10_000);
        let positions: Vec<Vec2> = ["A", "B", "C", "D"]
            .iter()
            .map(|id| sim.position(id).unwrap())
            .collect();
        for (i, a) in positions.iter().enumerate() {
            assert!(a.is_finite());
            for b in &positions[i + 1..] {
                assert!(a.distance(*b) > 10.0, "nodes overlap: {:?} {:?}", a, b);
            }
        }
    }

    #[test]
    fn sync_preserves_existing_bodies() {
        let mut sim = Simulation::with_seed(LayoutParams::default(), 11);
        sim.sync(&chain());
        sim.settle(10_000);
        let before: HashMap<String, Body> = ["A", "B", "C"]
            .iter()
            .map(|id| (id.to_string(), *sim.body(id).unwrap()))
            .collect();

        let outcome = sim.sync(&model(&[
            ("A", "<<-+>>[[B]]"),
            ("B", "<<-+>>[[C]]\n<<-+>>[[D]]"),
        ]));
        assert_eq!(outcome.added, 1);
        assert!(outcome.reheated);
        for (id, body) in &before {
            assert_eq!(sim.body(id), Some(body));
        }
    }

    #[test]
    fn unchanged_model_does_not_reheat() {
        let mut sim = Simulation::with_seed(LayoutParams::default(), 5);
        sim.sync(&chain());
        sim.settle(10_000);
        let outcome = sim.sync(&chain());
        assert_eq!(outcome, SyncOutcome::default());
        assert!(sim.is_settled());
    }

    #[test]
    fn removed_nodes_are_dropped() {
        let mut sim = Simulation::with_seed(LayoutParams::default(), 5);
        sim.sync(&chain());
        let outcome = sim.sync(&model(&[("A", "<<-+>>[[B]]")]));
        assert_eq!(outcome.removed, 1);
        assert!(sim.body("C").is_none());
        assert_eq!(sim.len(), 2);
    }

    #[test]
    fn pinned_node_stays_while_others_move() {
        let mut sim = Simulation::with_seed(LayoutParams::default(), 9);
        sim.sync(&chain());
        sim.settle(10_000);

        let grab = Vec2::new(50.0, 50.0);
        assert!(sim.pin("B", grab));
        assert!(!sim.is_settled());
        let a_before = sim.position("A").unwrap();
        for _ in 0..50 {
            sim.tick();
        }
        assert_eq!(sim.position("B"), Some(grab));
        assert!(sim.body("B").unwrap().pinned.is_some());
        assert_ne!(sim.position("A"), Some(a_before));

        assert!(sim.release("B"));
        sim.settle(10_000);
        assert!(sim.is_settled());
        assert!(sim.body("B").unwrap().pinned.is_none());
    }

    #[test]
    fn pin_unknown_node_is_rejected() {
        let mut sim = Simulation::with_seed(LayoutParams::default(), 9);
        assert!(!sim.pin("nobody", Vec2::ZERO));
        assert!(!sim.release("nobody"));
    }

    #[test]
    fn self_loop_does_not_explode() {
        let mut sim = Simulation::with_seed(LayoutParams::default(), 2);
        sim.sync(&model(&[("A", "<<-+>>[[A]]")]));
        sim.settle(1_000);
        assert!(sim.position("A").unwrap().is_finite());
    }

    #[test]
    fn coincident_nodes_are_pushed_apart() {
        let params = LayoutParams {
            seed_jitter: 0.0,
            ..LayoutParams::default()
        };
        let mut sim = Simulation::with_seed(params, 4);
        sim.sync(&chain());
        for _ in 0..20 {
            sim.tick();
        }
        let a = sim.position("A").unwrap();
        let b = sim.position("B").unwrap();
        assert!(a.is_finite() && b.is_finite());
        assert!(a.distance(b) > 0.0);
    }

    #[test]
    fn restart_reheats_settled_layout() {
        let mut sim = Simulation::with_seed(LayoutParams::default(), 6);
        sim.sync(&chain());
        sim.settle(10_000);
        sim.restart();
        assert_eq!(sim.alpha(), 1.0);
        assert!(matches!(sim.tick(), TickStatus::Running { .. }));
    }
}
