use pretty_assertions::assert_eq;

use asgraph::interaction::{Interaction, NodeState, PointerEvent};
use asgraph::layout::Simulation;

fn setup() -> (Simulation, Interaction) {
    let sim = Simulation::new(&[64496, 3356, 15169], (0.0, 0.0), 1);
    let interaction = Interaction::new(3, 3.0);
    (sim, interaction)
}

fn at(sim: &Simulation, index: usize) -> (f64, f64) {
    sim.node(index).unwrap().position()
}

#[test]
fn test_hover_shows_label() {
    let (mut sim, mut ui) = setup();
    let (x, y) = at(&sim, 1);

    ui.handle(&mut sim, PointerEvent::Move { x, y });

    assert_eq!(ui.state(1), NodeState::Hovered);
    assert_eq!(ui.hovered(), Some(1));
    assert_eq!(ui.dragging(), None);
    let label = ui.label().unwrap();
    assert_eq!(label.text, "AS3356");
    assert_eq!(label.node, 1);
    assert_eq!((label.x, label.y), (x + 10.0, y - 10.0));

    // Hover has no effect on the layout
    assert!(!sim.node(1).unwrap().is_pinned());
    assert_eq!(sim.alpha_target(), 0.0);
}

#[test]
fn test_hover_moves_between_nodes() {
    let (mut sim, mut ui) = setup();
    let (x0, y0) = at(&sim, 0);
    let (x2, y2) = at(&sim, 2);

    ui.handle(&mut sim, PointerEvent::Move { x: x0, y: y0 });
    ui.handle(&mut sim, PointerEvent::Move { x: x2, y: y2 });

    assert_eq!(ui.state(0), NodeState::Free);
    assert_eq!(ui.state(2), NodeState::Hovered);
    assert_eq!(ui.label().unwrap().text, "AS15169");

    ui.handle(&mut sim, PointerEvent::Move { x: 500.0, y: 500.0 });

    assert_eq!(ui.state(2), NodeState::Free);
    assert_eq!(ui.active(), None);
    assert!(ui.label().is_none());
}

#[test]
fn test_label_follows_pointer_within_node() {
    let (mut sim, mut ui) = setup();
    let (x, y) = at(&sim, 0);

    ui.handle(&mut sim, PointerEvent::Move { x, y });
    ui.handle(&mut sim, PointerEvent::Move { x: x + 1.0, y: y + 1.0 });

    let label = ui.label().unwrap();
    assert_eq!((label.x, label.y), (x + 11.0, y - 9.0));
    assert_eq!(ui.state(0), NodeState::Hovered);
}

#[test]
fn test_drag_pins_and_reheats() {
    let (mut sim, mut ui) = setup();
    let (x, y) = at(&sim, 0);

    ui.handle(&mut sim, PointerEvent::Down { x, y });

    assert_eq!(ui.state(0), NodeState::Dragging);
    assert_eq!(ui.dragging(), Some(0));
    assert!(sim.node(0).unwrap().is_pinned());
    assert_eq!(sim.alpha_target(), 0.3);
    assert_eq!(ui.label().unwrap().text, "AS64496");

    ui.handle(&mut sim, PointerEvent::Move { x: 200.0, y: 150.0 });

    assert_eq!(sim.node(0).unwrap().pinned(), Some((200.0, 150.0)));
    assert_eq!(at(&sim, 0), (200.0, 150.0));
    assert_eq!(ui.label().unwrap().x, 210.0);

    sim.tick();
    assert_eq!(at(&sim, 0), (200.0, 150.0));

    ui.handle(&mut sim, PointerEvent::Up { x: 200.0, y: 150.0 });

    assert!(!sim.node(0).unwrap().is_pinned());
    assert_eq!(sim.alpha_target(), 0.0);
    assert_eq!(ui.state(0), NodeState::Hovered);
    assert!(ui.label().is_some());
}

#[test]
fn test_release_away_from_node() {
    let (mut sim, mut ui) = setup();
    let (x, y) = at(&sim, 2);

    ui.handle(&mut sim, PointerEvent::Down { x, y });
    ui.handle(&mut sim, PointerEvent::Up { x: 400.0, y: 400.0 });

    assert_eq!(ui.state(2), NodeState::Free);
    assert_eq!(ui.active(), None);
    assert!(ui.label().is_none());
    assert!(!sim.node(2).unwrap().is_pinned());
    assert_eq!(sim.alpha_target(), 0.0);
}

#[test]
fn test_press_on_empty_space() {
    let (mut sim, mut ui) = setup();

    ui.handle(&mut sim, PointerEvent::Down { x: 400.0, y: 400.0 });
    ui.handle(&mut sim, PointerEvent::Up { x: 400.0, y: 400.0 });

    assert_eq!(ui.active(), None);
    assert_eq!(sim.alpha_target(), 0.0);
    assert!(sim.nodes().iter().all(|node| !node.is_pinned()));
}

#[test]
fn test_leave_ends_drag() {
    let (mut sim, mut ui) = setup();
    let (x, y) = at(&sim, 1);

    ui.handle(&mut sim, PointerEvent::Down { x, y });
    ui.handle(&mut sim, PointerEvent::Leave);

    assert_eq!(ui.state(1), NodeState::Free);
    assert!(ui.label().is_none());
    assert!(!sim.node(1).unwrap().is_pinned());
    assert_eq!(sim.alpha_target(), 0.0);
}

#[test]
fn test_drag_ignores_other_nodes() {
    let (mut sim, mut ui) = setup();
    let (x0, y0) = at(&sim, 0);
    let (x1, y1) = at(&sim, 1);

    ui.handle(&mut sim, PointerEvent::Down { x: x0, y: y0 });
    ui.handle(&mut sim, PointerEvent::Move { x: x1, y: y1 });
    ui.handle(&mut sim, PointerEvent::Down { x: x1, y: y1 });

    assert_eq!(ui.dragging(), Some(0));
    assert_eq!(ui.state(1), NodeState::Free);
    assert!(!sim.node(1).unwrap().is_pinned());
    assert_eq!(ui.label().unwrap().text, "AS64496");
}

#[test]
fn test_custom_drag_target() {
    let (mut sim, _) = setup();
    let mut ui = Interaction::new(3, 3.0).with_drag_alpha_target(0.8);
    let (x, y) = at(&sim, 0);

    ui.handle(&mut sim, PointerEvent::Down { x, y });

    assert_eq!(sim.alpha_target(), 0.8);
}
