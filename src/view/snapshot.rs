//! Render-ready snapshot of the graph

use crate::config::Settings;
use crate::grammar::Direction;
use crate::layout::Simulation;
use crate::model::GraphModel;
use serde::Serialize;

/// A node placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub is_ghost: bool,
    pub pinned: bool,
}

/// An edge ready to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub direction: Direction,
    pub color: String,
    /// Arrowhead at the source end
    pub arrow_start: bool,
    /// Arrowhead at the target end
    pub arrow_end: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub curve_offset: f64,
    pub line: usize,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
    pub settled: bool,
}

/// Arrowhead placement `(start, end)` for a direction
pub fn arrow_ends(direction: Direction) -> (bool, bool) {
    match direction {
        Direction::Outgoing => (false, true),
        Direction::Incoming => (true, false),
        Direction::Bidirectional => (true, true),
        Direction::Undirected => (false, false),
    }
}

impl GraphView {
    /// Combine a model with the current layout positions and display settings.
    ///
    /// Nodes the simulation has not seen yet are placed at the viewport
    /// center.
    pub fn compose(model: &GraphModel, simulation: &Simulation, settings: &Settings) -> Self {
        let center = simulation.params().center();

        let nodes = model
            .nodes
            .iter()
            .map(|node| {
                let body = simulation.body(&node.id);
                let position = body.map(|b| b.position).unwrap_or(center);
                ViewNode {
                    id: node.id.clone(),
                    x: position.x,
                    y: position.y,
                    is_ghost: node.is_ghost,
                    pinned: body.is_some_and(|b| b.pinned.is_some()),
                }
            })
            .collect();

        let edges = model
            .edges
            .iter()
            .map(|edge| {
                let (arrow_start, arrow_end) = if settings.show_arrows {
                    arrow_ends(edge.direction)
                } else {
                    (false, false)
                };
                ViewEdge {
                    id: edge.id.clone(),
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    direction: edge.direction,
                    color: settings.colors.for_direction(edge.direction).to_string(),
                    arrow_start,
                    arrow_end,
                    label: edge.label.clone().filter(|_| settings.show_labels),
                    curve_offset: edge.curve_offset,
                    line: edge.line,
                }
            })
            .collect();

        Self {
            nodes,
            edges,
            settled: simulation.is_settled(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&ViewEdge> {
        self.edges.iter().find(|e| e.id == id)
    }
}
