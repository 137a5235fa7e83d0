use crate::layout::Simulation;

/// Pointer input in layout coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { x: f64, y: f64 },
    Down { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    #[default]
    Free,
    Hovered,
    Dragging,
}

/// Tooltip shown next to the pointer while a node is hovered or dragged
#[derive(Debug, Clone, PartialEq)]
pub struct HoverLabel {
    pub node: usize,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

const LABEL_OFFSET: (f64, f64) = (10.0, -10.0);

/// Per-node `Free -> Hovered -> Dragging` state machine.
///
/// At most one node is out of `Free` at a time. The only effects on the
/// simulation are pin/unpin and reheat/cool.
#[derive(Debug, Clone)]
pub struct Interaction {
    states: Vec<NodeState>,
    active: Option<usize>,
    label: Option<HoverLabel>,
    hit_radius: f64,
    drag_alpha_target: f64,
}

impl Interaction {
    pub fn new(node_count: usize, hit_radius: f64) -> Self {
        Interaction {
            states: vec![NodeState::Free; node_count],
            active: None,
            label: None,
            hit_radius,
            drag_alpha_target: 0.3,
        }
    }

    pub fn with_drag_alpha_target(mut self, target: f64) -> Self {
        self.drag_alpha_target = target;
        self
    }

    pub fn handle(&mut self, sim: &mut Simulation, event: PointerEvent) {
        match (event, self.dragging()) {
            (PointerEvent::Move { x, y }, Some(node)) => {
                sim.pin(node, x, y);
                self.show_label(sim, node, x, y);
            }
            (PointerEvent::Move { x, y }, None) => {
                let hit = sim.find(x, y, self.hit_radius);
                match hit {
                    Some(node) if self.active == Some(node) => self.show_label(sim, node, x, y),
                    Some(node) => {
                        self.release_hover();
                        self.set_state(node, NodeState::Hovered);
                        self.show_label(sim, node, x, y);
                    }
                    None => self.release_hover(),
                }
            }
            (PointerEvent::Down { x, y }, None) => {
                if let Some(node) = sim.find(x, y, self.hit_radius) {
                    self.release_hover();
                    self.set_state(node, NodeState::Dragging);
                    sim.pin(node, x, y);
                    sim.reheat(self.drag_alpha_target);
                    self.show_label(sim, node, x, y);
                }
            }
            (PointerEvent::Down { .. }, Some(_)) => {}
            (PointerEvent::Up { x, y }, Some(node)) => {
                self.end_drag(sim, node);
                if sim.find(x, y, self.hit_radius) == Some(node) {
                    self.set_state(node, NodeState::Hovered);
                    self.show_label(sim, node, x, y);
                } else {
                    self.release_hover();
                }
            }
            (PointerEvent::Up { .. }, None) => {}
            (PointerEvent::Leave, Some(node)) => {
                self.end_drag(sim, node);
                self.release_hover();
            }
            (PointerEvent::Leave, None) => self.release_hover(),
        }
    }

    fn end_drag(&mut self, sim: &mut Simulation, node: usize) {
        sim.unpin(node);
        sim.cool();
        self.set_state(node, NodeState::Free);
    }

    fn set_state(&mut self, node: usize, state: NodeState) {
        if let Some(slot) = self.states.get_mut(node) {
            *slot = state;
            self.active = if state == NodeState::Free { None } else { Some(node) };
        }
    }

    fn release_hover(&mut self) {
        if let Some(node) = self.active.take() {
            if let Some(slot) = self.states.get_mut(node) {
                *slot = NodeState::Free;
            }
        }
        self.label = None;
    }

    fn show_label(&mut self, sim: &Simulation, node: usize, x: f64, y: f64) {
        let Some(sim_node) = sim.node(node) else {
            return;
        };
        self.label = Some(HoverLabel {
            node,
            text: format!("AS{}", sim_node.id),
            x: x + LABEL_OFFSET.0,
            y: y + LABEL_OFFSET.1,
        });
    }

    pub fn state(&self, node: usize) -> NodeState {
        self.states.get(node).copied().unwrap_or_default()
    }

    pub fn label(&self) -> Option<&HoverLabel> {
        self.label.as_ref()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn dragging(&self) -> Option<usize> {
        self.active
            .filter(|&node| self.state(node) == NodeState::Dragging)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.active
            .filter(|&node| self.state(node) == NodeState::Hovered)
    }
}
