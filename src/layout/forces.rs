use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::Rng;

use super::quadtree::{Body, QuadTree};
use super::SimNode;

/// One term of the layout's force model.
///
/// Forces push velocities (or, for centering, positions) around; the
/// simulation integrates velocities into positions after all forces ran.
pub trait Force {
    fn name(&self) -> &str;

    /// Called when the force is registered, with the full node set
    fn initialize(&mut self, _nodes: &[SimNode]) {}

    fn apply(&mut self, nodes: &mut [SimNode], alpha: f64, rng: &mut StdRng);
}

/// Tiny random offset used to separate coincident nodes
pub(crate) fn jiggle(rng: &mut StdRng) -> f64 {
    (rng.gen::<f64>() - 0.5) * 1e-6
}

/// Spring along every link, pulling endpoints toward `distance`.
///
/// Without an explicit strength each link gets `1 / min(degree)`, which
/// keeps hubs from being yanked around by their many neighbours. The
/// correction is split by degree too: the lower degree end moves more.
pub struct LinkForce {
    links: Vec<(usize, usize)>,
    distance: f64,
    strength: Option<f64>,
    iterations: usize,
    strengths: Vec<f64>,
    bias: Vec<f64>,
}

impl LinkForce {
    pub fn new(links: Vec<(usize, usize)>) -> Self {
        LinkForce {
            links,
            distance: 30.0,
            strength: None,
            iterations: 1,
            strengths: Vec::new(),
            bias: Vec::new(),
        }
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_strength(mut self, strength: Option<f64>) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl Force for LinkForce {
    fn name(&self) -> &str {
        "link"
    }

    fn initialize(&mut self, nodes: &[SimNode]) {
        let n = nodes.len();
        self.links.retain(|&(s, t)| s < n && t < n && s != t);

        let mut degree = vec![0usize; n];
        for &(s, t) in &self.links {
            degree[s] += 1;
            degree[t] += 1;
        }

        self.bias = self
            .links
            .iter()
            .map(|&(s, t)| degree[s] as f64 / (degree[s] + degree[t]) as f64)
            .collect();
        self.strengths = self
            .links
            .iter()
            .map(|&(s, t)| {
                self.strength
                    .unwrap_or_else(|| 1.0 / degree[s].min(degree[t]) as f64)
            })
            .collect();
    }

    fn apply(&mut self, nodes: &mut [SimNode], alpha: f64, rng: &mut StdRng) {
        for _ in 0..self.iterations {
            for (i, &(s, t)) in self.links.iter().enumerate() {
                let (source, target) = (&nodes[s], &nodes[t]);
                let mut x = target.x + target.vx - source.x - source.vx;
                let mut y = target.y + target.vy - source.y - source.vy;
                if x == 0.0 {
                    x = jiggle(rng);
                }
                if y == 0.0 {
                    y = jiggle(rng);
                }

                let length = (x * x + y * y).sqrt();
                let l = (length - self.distance) / length * alpha * self.strengths[i];
                x *= l;
                y *= l;

                let b = self.bias[i];
                nodes[t].vx -= x * b;
                nodes[t].vy -= y * b;
                nodes[s].vx += x * (1.0 - b);
                nodes[s].vy += y * (1.0 - b);
            }
        }
    }
}

/// Charge between every pair of nodes, approximated with Barnes-Hut.
/// Negative strength repels.
pub struct ManyBodyForce {
    strength: f64,
    theta: f64,
    distance_min: f64,
    distance_max: f64,
}

impl ManyBodyForce {
    pub fn new() -> Self {
        ManyBodyForce {
            strength: -30.0,
            theta: 0.9,
            distance_min: 1.0,
            distance_max: f64::INFINITY,
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_distance_min(mut self, distance: f64) -> Self {
        self.distance_min = distance;
        self
    }

    pub fn with_distance_max(mut self, distance: f64) -> Self {
        self.distance_max = distance;
        self
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }
}

impl Default for ManyBodyForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for ManyBodyForce {
    fn name(&self) -> &str {
        "charge"
    }

    fn apply(&mut self, nodes: &mut [SimNode], alpha: f64, rng: &mut StdRng) {
        let positions: Vec<(f64, f64)> = nodes.iter().map(|node| (node.x, node.y)).collect();
        let charges = vec![self.strength; nodes.len()];
        let tree = QuadTree::build(&positions, &charges);

        let min2 = self.distance_min * self.distance_min;
        let max2 = self.distance_max * self.distance_max;

        for (i, &(x, y)) in positions.iter().enumerate() {
            let (mut fx, mut fy) = (0.0, 0.0);

            for body in tree.bodies(x, y, self.theta) {
                let (mut dx, mut dy, charge) = match body {
                    Body::Point { index } if index == i => continue,
                    Body::Point { index } => {
                        let (px, py) = positions[index];
                        let mut dx = px - x;
                        let mut dy = py - y;
                        if dx == 0.0 {
                            dx = jiggle(rng);
                        }
                        if dy == 0.0 {
                            dy = jiggle(rng);
                        }
                        (dx, dy, charges[index])
                    }
                    Body::Aggregate { x: bx, y: by, charge } => (bx - x, by - y, charge),
                };

                let mut l = dx * dx + dy * dy;
                if l >= max2 || l == 0.0 {
                    continue;
                }
                if l < min2 {
                    l = (min2 * l).sqrt();
                }
                let w = charge * alpha / l;
                dx *= w;
                dy *= w;
                fx += dx;
                fy += dy;
            }

            nodes[i].vx += fx;
            nodes[i].vy += fy;
        }
    }
}

/// Shifts every node so the centroid lands on `(x, y)`.
pub struct CenterForce {
    x: f64,
    y: f64,
    strength: f64,
}

impl CenterForce {
    pub fn new(x: f64, y: f64) -> Self {
        CenterForce { x, y, strength: 1.0 }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Force for CenterForce {
    fn name(&self) -> &str {
        "center"
    }

    fn apply(&mut self, nodes: &mut [SimNode], _alpha: f64, _rng: &mut StdRng) {
        if nodes.is_empty() {
            return;
        }
        let n = nodes.len() as f64;
        let (sx, sy) = nodes
            .iter()
            .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
        let dx = (sx / n - self.x) * self.strength;
        let dy = (sy / n - self.y) * self.strength;

        for node in nodes.iter_mut() {
            node.x -= dx;
            node.y -= dy;
        }
    }
}

/// Keeps nodes at least `2 * radius` apart, using positions one step ahead.
/// Candidate pairs come from a uniform grid with cells of `2 * radius`.
pub struct CollideForce {
    radius: f64,
    strength: f64,
    iterations: usize,
}

impl CollideForce {
    pub fn new(radius: f64) -> Self {
        CollideForce {
            radius,
            strength: 1.0,
            iterations: 1,
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Force for CollideForce {
    fn name(&self) -> &str {
        "collide"
    }

    fn apply(&mut self, nodes: &mut [SimNode], _alpha: f64, rng: &mut StdRng) {
        if self.radius <= 0.0 {
            return;
        }
        let r = self.radius * 2.0;
        let r2 = r * r;
        let cell_of = |x: f64, y: f64| ((x / r).floor() as i64, (y / r).floor() as i64);

        for _ in 0..self.iterations {
            let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
            for (i, node) in nodes.iter().enumerate() {
                grid.entry(cell_of(node.x + node.vx, node.y + node.vy))
                    .or_default()
                    .push(i);
            }

            for i in 0..nodes.len() {
                let xi = nodes[i].x + nodes[i].vx;
                let yi = nodes[i].y + nodes[i].vy;
                let (cx, cy) = cell_of(xi, yi);

                for gx in cx - 1..=cx + 1 {
                    for gy in cy - 1..=cy + 1 {
                        let Some(candidates) = grid.get(&(gx, gy)) else {
                            continue;
                        };
                        for &j in candidates {
                            if j <= i {
                                continue;
                            }
                            let mut x = xi - nodes[j].x - nodes[j].vx;
                            let mut y = yi - nodes[j].y - nodes[j].vy;
                            let mut l = x * x + y * y;
                            if l >= r2 {
                                continue;
                            }
                            if x == 0.0 {
                                x = jiggle(rng);
                                l += x * x;
                            }
                            if y == 0.0 {
                                y = jiggle(rng);
                                l += y * y;
                            }
                            let length = l.sqrt();
                            let k = (r - length) / length * self.strength;
                            x *= k;
                            y *= k;

                            // Equal radii: each side takes half the correction
                            nodes[i].vx += x * 0.5;
                            nodes[i].vy += y * 0.5;
                            nodes[j].vx -= x * 0.5;
                            nodes[j].vy -= y * 0.5;
                        }
                    }
                }
            }
        }
    }
}
