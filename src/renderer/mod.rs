pub mod canvas;
pub mod svg;

use std::collections::HashMap;
use std::path::Path;

use log::{error, info, warn};

use crate::artifact::GraphArtifact;
use crate::interaction::{Interaction, NodeState, PointerEvent};
use crate::layout::{Simulation, SimulationParameters};
use crate::shared::ASN;

pub use canvas::{pointer_event, Viewport};
pub use svg::{render_page, render_svg, Svg};

/// Where the page fetches the artifact from, relative to the page
pub const DEFAULT_DATA_URL: &str = "data/as_graph.json";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub params: SimulationParameters,
    pub node_radius: f64,
    /// Pointer hit radius around node centres, in layout units
    pub hit_radius: f64,
    /// Upper bound for `run_to_steady_state`
    pub max_ticks: u64,
    pub data_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            params: SimulationParameters::default(),
            node_radius: 4.0,
            hit_radius: 8.0,
            max_ticks: 1_000,
            data_url: DEFAULT_DATA_URL.to_string(),
        }
    }
}

impl RenderConfig {
    pub fn with_params(mut self, params: SimulationParameters) -> Self {
        self.params = params;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn with_data_url(mut self, data_url: &str) -> Self {
        self.data_url = data_url.to_string();
        self
    }
}

/// Either a live scene or the reason there isn't one.
pub enum RenderState {
    Failed(String),
    Ready(Box<Scene>),
}

impl RenderState {
    pub fn load_path(path: &Path, config: RenderConfig) -> Self {
        match GraphArtifact::load(path) {
            Ok(artifact) => Self::from_artifact(&artifact, config),
            Err(e) => Self::fail(format!("Error loading graph data from {:?}: {}", path, e)),
        }
    }

    pub fn from_bytes(bytes: &[u8], config: RenderConfig) -> Self {
        match GraphArtifact::from_slice(bytes) {
            Ok(artifact) => Self::from_artifact(&artifact, config),
            Err(e) => Self::fail(format!("Error loading graph data: {}", e)),
        }
    }

    /// The only place a scene is created; an empty node set never gets one.
    pub fn from_artifact(artifact: &GraphArtifact, config: RenderConfig) -> Self {
        if artifact.is_empty() {
            return Self::fail("No graph data to display: the node set is empty.".to_string());
        }
        RenderState::Ready(Box::new(Scene::new(artifact, config)))
    }

    /// The artifact could not be fetched at all.
    pub fn fetch_failed(url: &str, reason: &str) -> Self {
        Self::fail(format!("Error loading graph data from {}: {}", url, reason))
    }

    fn fail(message: String) -> Self {
        error!("{}", message);
        RenderState::Failed(message)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RenderState::Failed(message) => Some(message),
            RenderState::Ready(_) => None,
        }
    }

    pub fn scene(&self) -> Option<&Scene> {
        match self {
            RenderState::Ready(scene) => Some(scene.as_ref()),
            RenderState::Failed(_) => None,
        }
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        match self {
            RenderState::Ready(scene) => Some(scene.as_mut()),
            RenderState::Failed(_) => None,
        }
    }
}

/// Simulation plus interaction for one loaded graph
pub struct Scene {
    ids: Vec<ASN>,
    links: Vec<(usize, usize)>,
    simulation: Simulation,
    interaction: Interaction,
    config: RenderConfig,
}

impl Scene {
    fn new(artifact: &GraphArtifact, config: RenderConfig) -> Self {
        let mut ids = Vec::with_capacity(artifact.nodes.len());
        let mut index_of: HashMap<ASN, usize> = HashMap::new();
        for node in &artifact.nodes {
            if !index_of.contains_key(&node.id) {
                index_of.insert(node.id, ids.len());
                ids.push(node.id);
            }
        }

        let mut links = Vec::with_capacity(artifact.links.len());
        let mut dropped = 0usize;
        for link in &artifact.links {
            match (index_of.get(&link.source), index_of.get(&link.target)) {
                (Some(&s), Some(&t)) if s != t => links.push((s, t)),
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            warn!("Dropped {} links with unknown or identical endpoints", dropped);
        }

        let simulation = Simulation::with_parameters(&ids, links.clone(), &config.params);
        let interaction = Interaction::new(ids.len(), config.hit_radius)
            .with_drag_alpha_target(config.params.drag_alpha_target);
        info!("Scene ready with {} nodes and {} links", ids.len(), links.len());

        Scene {
            ids,
            links,
            simulation,
            interaction,
            config,
        }
    }

    /// Advance the layout one tick if it is still moving.
    pub fn tick(&mut self) -> bool {
        self.simulation.step()
    }

    pub fn run_to_steady_state(&mut self) -> u64 {
        self.simulation.run(self.config.max_ticks)
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        self.interaction.handle(&mut self.simulation, event);
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn ids(&self) -> &[ASN] {
        &self.ids
    }

    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    /// Drawing primitives for the current simulation state.
    pub fn frame(&self) -> Frame {
        let nodes = self.simulation.nodes();
        let lines = self
            .links
            .iter()
            .map(|&(s, t)| Line {
                x1: nodes[s].x(),
                y1: nodes[s].y(),
                x2: nodes[t].x(),
                y2: nodes[t].y(),
            })
            .collect();
        let circles = nodes
            .iter()
            .map(|node| Circle {
                id: node.id,
                cx: node.x(),
                cy: node.y(),
                r: self.config.node_radius,
                state: self.interaction.state(node.index),
            })
            .collect();
        let label = self.interaction.label().map(|label| Label {
            text: label.text.clone(),
            x: label.x,
            y: label.y,
        });

        Frame {
            width: self.config.params.width,
            height: self.config.params.height,
            lines,
            circles,
            label,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub id: ASN,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub state: NodeState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Everything needed to redraw one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub lines: Vec<Line>,
    pub circles: Vec<Circle>,
    pub label: Option<Label>,
}
