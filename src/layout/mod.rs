pub mod forces;
pub mod quadtree;

use std::f64::consts::PI;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::shared::ASN;

pub use forces::{CenterForce, CollideForce, Force, LinkForce, ManyBodyForce};

const INITIAL_RADIUS: f64 = 10.0;

/// A node as the layout sees it: identity plus transient physics state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimNode {
    pub index: usize,
    pub id: ASN,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) vx: f64,
    pub(crate) vy: f64,
    pub(crate) pinned: Option<(f64, f64)>,
}

impl SimNode {
    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.vx, self.vy)
    }

    pub fn pinned(&self) -> Option<(f64, f64)> {
        self.pinned
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }
}

/// Tunables for the layout, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub width: f64,
    pub height: f64,
    pub alpha_min: f64,
    /// Per tick decay; `None` means "settle in roughly 300 ticks"
    pub alpha_decay: Option<f64>,
    pub velocity_decay: f64,
    pub link_distance: f64,
    /// `None` derives strength from endpoint degrees
    pub link_strength: Option<f64>,
    pub charge_strength: f64,
    pub charge_theta: f64,
    pub charge_distance_max: Option<f64>,
    pub collide_radius: f64,
    /// Alpha target while a node is being dragged
    pub drag_alpha_target: f64,
    pub seed: u64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            width: 960.0,
            height: 600.0,
            alpha_min: 0.001,
            alpha_decay: None,
            velocity_decay: 0.4,
            link_distance: 30.0,
            link_strength: None,
            charge_strength: -30.0,
            charge_theta: 0.9,
            charge_distance_max: None,
            collide_radius: 6.0,
            drag_alpha_target: 0.3,
            seed: 0x5eed,
        }
    }
}

impl SimulationParameters {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn effective_alpha_decay(&self) -> f64 {
        self.alpha_decay
            .unwrap_or_else(|| 1.0 - self.alpha_min.powf(1.0 / 300.0))
    }
}

/// Force-directed layout state.
///
/// Everything outside the force pipeline changes node state through four
/// calls only: `pin`, `unpin`, `reheat` and `cool`.
pub struct Simulation {
    nodes: Vec<SimNode>,
    forces: Vec<Box<dyn Force>>,
    alpha: f64,
    alpha_min: f64,
    alpha_decay: f64,
    alpha_target: f64,
    velocity_decay: f64,
    ticks: u64,
    rng: StdRng,
}

impl Simulation {
    /// Nodes start on a phyllotaxis spiral around `center`, no forces yet.
    pub fn new(ids: &[ASN], center: (f64, f64), seed: u64) -> Self {
        let alpha_min = 0.001;
        let angle_step = PI * (3.0 - 5f64.sqrt());
        let nodes = ids
            .iter()
            .enumerate()
            .map(|(index, &id)| {
                let radius = INITIAL_RADIUS * (0.5 + index as f64).sqrt();
                let angle = index as f64 * angle_step;
                SimNode {
                    index,
                    id,
                    x: center.0 + radius * angle.cos(),
                    y: center.1 + radius * angle.sin(),
                    vx: 0.0,
                    vy: 0.0,
                    pinned: None,
                }
            })
            .collect();

        Simulation {
            nodes,
            forces: Vec::new(),
            alpha: 1.0,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: 0.4,
            ticks: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Standard setup: link, charge, center and collide forces.
    pub fn with_parameters(
        ids: &[ASN],
        links: Vec<(usize, usize)>,
        params: &SimulationParameters,
    ) -> Self {
        let center = params.center();
        let mut sim = Self::new(ids, center, params.seed);
        sim.alpha_min = params.alpha_min;
        sim.alpha_decay = params.effective_alpha_decay();
        sim.velocity_decay = params.velocity_decay;

        let mut charge = ManyBodyForce::new()
            .with_strength(params.charge_strength)
            .with_theta(params.charge_theta);
        if let Some(max) = params.charge_distance_max {
            charge = charge.with_distance_max(max);
        }

        sim.add_force(Box::new(
            LinkForce::new(links)
                .with_distance(params.link_distance)
                .with_strength(params.link_strength),
        ));
        sim.add_force(Box::new(charge));
        sim.add_force(Box::new(CenterForce::new(center.0, center.1)));
        sim.add_force(Box::new(CollideForce::new(params.collide_radius)));
        sim
    }

    /// Register a force, replacing any force with the same name.
    pub fn add_force(&mut self, mut force: Box<dyn Force>) -> &mut Self {
        force.initialize(&self.nodes);
        let name = force.name().to_string();
        match self.forces.iter().position(|f| f.name() == name) {
            Some(i) => self.forces[i] = force,
            None => self.forces.push(force),
        }
        self
    }

    pub fn remove_force(&mut self, name: &str) -> Option<Box<dyn Force>> {
        let i = self.forces.iter().position(|f| f.name() == name)?;
        Some(self.forces.remove(i))
    }

    pub fn force_names(&self) -> Vec<&str> {
        self.forces.iter().map(|f| f.name()).collect()
    }

    /// One step: decay alpha, run every force, integrate velocities.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        for force in self.forces.iter_mut() {
            force.apply(&mut self.nodes, self.alpha, &mut self.rng);
        }

        let keep = 1.0 - self.velocity_decay;
        for node in self.nodes.iter_mut() {
            match node.pinned {
                Some((fx, fy)) => {
                    node.x = fx;
                    node.y = fy;
                    node.vx = 0.0;
                    node.vy = 0.0;
                }
                None => {
                    node.vx *= keep;
                    node.vy *= keep;
                    node.x += node.vx;
                    node.y += node.vy;
                }
            }
        }

        self.ticks += 1;
    }

    /// Tick unless the simulation is at rest. Returns whether it ticked.
    pub fn step(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }
        self.tick();
        true
    }

    /// Step until settled or `max_ticks` more ticks ran. Returns ticks run.
    pub fn run(&mut self, max_ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && self.step() {
            ran += 1;
        }
        debug!("layout ran {} ticks, alpha {:.5}", ran, self.alpha);
        ran
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.alpha_min && self.alpha_target < self.alpha_min
    }

    /// Hold a node at `(x, y)`; forces no longer move it.
    pub fn pin(&mut self, index: usize, x: f64, y: f64) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pinned = Some((x, y));
            node.x = x;
            node.y = y;
        }
    }

    /// Hand a pinned node back to the forces.
    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pinned = None;
        }
    }

    /// Raise the energy target so the layout keeps moving.
    pub fn reheat(&mut self, target: f64) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    /// Drop the energy target so the layout decays to rest.
    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn alpha_min(&self) -> f64 {
        self.alpha_min
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&SimNode> {
        self.nodes.get(index)
    }

    pub fn node_index(&self, id: ASN) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    /// Closest node within `radius` of `(x, y)`.
    pub fn find(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
        let mut best = None;
        let mut best_d2 = radius * radius;
        for node in &self.nodes {
            let (dx, dy) = (node.x - x, node.y - y);
            let d2 = dx * dx + dy * dy;
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(node.index);
            }
        }
        best
    }
}
