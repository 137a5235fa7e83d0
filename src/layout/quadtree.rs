/// Barnes-Hut quadtree over node positions.
///
/// Cells live in one arena. Each cell aggregates the summed charge of the
/// points below it and their centre, weighted by absolute charge.
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone)]
struct Cell {
    x0: f64,
    y0: f64,
    size: f64,
    children: Option<[usize; 4]>,
    points: Vec<usize>,
    charge: f64,
    cx: f64,
    cy: f64,
}

impl Cell {
    fn new(x0: f64, y0: f64, size: f64) -> Self {
        Cell {
            x0,
            y0,
            size,
            children: None,
            points: Vec::new(),
            charge: 0.0,
            cx: 0.0,
            cy: 0.0,
        }
    }

    fn quadrant(&self, x: f64, y: f64) -> usize {
        let half = self.size / 2.0;
        let right = x >= self.x0 + half;
        let bottom = y >= self.y0 + half;
        (bottom as usize) << 1 | right as usize
    }
}

/// A far cell collapsed to one pseudo-body, or a single real point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Body {
    Aggregate { x: f64, y: f64, charge: f64 },
    Point { index: usize },
}

pub struct QuadTree {
    cells: Vec<Cell>,
    positions: Vec<(f64, f64)>,
}

impl QuadTree {
    /// Build over `positions`, with `charges[i]` the charge of point `i`.
    pub fn build(positions: &[(f64, f64)], charges: &[f64]) -> Self {
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in positions {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if positions.is_empty() {
            (min_x, min_y, max_x, max_y) = (0.0, 0.0, 1.0, 1.0);
        }
        // Square root cell, padded so points on the max edge stay inside
        let size = (max_x - min_x).max(max_y - min_y).max(1.0) * (1.0 + 1e-9) + 1e-9;

        let mut tree = QuadTree {
            cells: vec![Cell::new(min_x, min_y, size)],
            positions: positions.to_vec(),
        };
        for index in 0..positions.len() {
            tree.insert(index);
        }
        tree.accumulate(0, charges);
        tree
    }

    fn insert(&mut self, index: usize) {
        let (x, y) = self.positions[index];
        let mut cell = 0;
        let mut depth = 0;

        loop {
            if let Some(children) = self.cells[cell].children {
                cell = children[self.cells[cell].quadrant(x, y)];
                depth += 1;
                continue;
            }

            let coincident = self.cells[cell]
                .points
                .first()
                .map_or(true, |&other| self.positions[other] == (x, y));
            if coincident || depth >= MAX_DEPTH {
                self.cells[cell].points.push(index);
                return;
            }

            self.subdivide(cell);
        }
    }

    fn subdivide(&mut self, cell: usize) {
        let Cell { x0, y0, size, .. } = self.cells[cell];
        let half = size / 2.0;
        let first = self.cells.len();
        self.cells.push(Cell::new(x0, y0, half));
        self.cells.push(Cell::new(x0 + half, y0, half));
        self.cells.push(Cell::new(x0, y0 + half, half));
        self.cells.push(Cell::new(x0 + half, y0 + half, half));
        let children = [first, first + 1, first + 2, first + 3];

        let points = std::mem::take(&mut self.cells[cell].points);
        self.cells[cell].children = Some(children);
        for point in points {
            let (px, py) = self.positions[point];
            let quadrant = self.cells[cell].quadrant(px, py);
            self.cells[children[quadrant]].points.push(point);
        }
    }

    fn accumulate(&mut self, cell: usize, charges: &[f64]) {
        let (mut charge, mut weight, mut cx, mut cy) = (0.0, 0.0, 0.0, 0.0);

        if let Some(children) = self.cells[cell].children {
            for child in children {
                self.accumulate(child, charges);
                let c = &self.cells[child];
                let w = c.charge.abs();
                charge += c.charge;
                weight += w;
                cx += c.cx * w;
                cy += c.cy * w;
            }
        } else {
            for &point in &self.cells[cell].points {
                let (px, py) = self.positions[point];
                let w = charges[point].abs();
                charge += charges[point];
                weight += w;
                cx += px * w;
                cy += py * w;
            }
        }

        let c = &mut self.cells[cell];
        c.charge = charge;
        if weight > 0.0 {
            c.cx = cx / weight;
            c.cy = cy / weight;
        } else {
            c.cx = c.x0 + c.size / 2.0;
            c.cy = c.y0 + c.size / 2.0;
        }
    }

    /// Bodies acting on a point at `(x, y)`. A cell is collapsed when
    /// `size / distance < theta`; leaves always yield their points.
    pub fn bodies(&self, x: f64, y: f64, theta: f64) -> Vec<Body> {
        let theta2 = theta * theta;
        let mut result = Vec::new();
        let mut stack = vec![0];

        while let Some(cell) = stack.pop() {
            let c = &self.cells[cell];
            if c.children.is_none() && c.points.is_empty() {
                continue;
            }

            match c.children {
                Some(children) => {
                    let (dx, dy) = (c.cx - x, c.cy - y);
                    let l = dx * dx + dy * dy;
                    if c.size * c.size / theta2 < l {
                        result.push(Body::Aggregate {
                            x: c.cx,
                            y: c.cy,
                            charge: c.charge,
                        });
                    } else {
                        stack.extend(children);
                    }
                }
                None => {
                    result.extend(c.points.iter().map(|&index| Body::Point { index }));
                }
            }
        }

        result
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
