use std::path::Path;

use pretty_assertions::assert_eq;

use asgraph::artifact::{ArtifactLink, ArtifactNode, GraphArtifact};
use asgraph::interaction::{NodeState, PointerEvent};
use asgraph::layout::SimulationParameters;
use asgraph::renderer::{
    pointer_event, render_page, render_svg, RenderConfig, RenderState, Svg, Viewport,
    DEFAULT_DATA_URL,
};

const GRAPH: &[u8] = br#"{
    "nodes": [{"id": 3356}, {"id": 15169}, {"id": 13335}],
    "links": [
        {"source": 3356, "target": 15169, "value": 4},
        {"source": 13335, "target": 3356, "value": 1}
    ]
}"#;

#[test]
fn test_invalid_json_fails() {
    let state = RenderState::from_bytes(b"{\"nodes\": [", RenderConfig::default());

    let message = state.error().unwrap();
    assert!(message.starts_with("Error loading graph data"));
    assert!(state.scene().is_none());
}

#[test]
fn test_empty_node_set_fails() {
    let state = RenderState::from_bytes(br#"{"nodes":[],"links":[]}"#, RenderConfig::default());

    assert_eq!(
        state.error(),
        Some("No graph data to display: the node set is empty.")
    );
}

#[test]
fn test_missing_artifact_fails() {
    let state = RenderState::load_path(
        Path::new("/definitely/not/here/as_graph.json"),
        RenderConfig::default(),
    );

    assert!(state.error().unwrap().contains("as_graph.json"));
}

#[test]
fn test_failed_page_has_no_graph() {
    let state = RenderState::from_bytes(b"<oops>", RenderConfig::default());

    let page = render_page(&state);

    assert!(page.contains("<title>AS Adjacency Graph</title>"));
    assert!(page.contains("id=\"error-message\""));
    assert!(page.contains("Error loading graph data"));
    assert!(!page.contains("<svg"));
    assert!(!page.contains("<circle"));
}

#[test]
fn test_ready_scene() {
    let mut state = RenderState::from_bytes(GRAPH, RenderConfig::default());
    assert!(state.error().is_none());

    let scene = state.scene_mut().unwrap();
    assert_eq!(scene.ids(), &[3356, 15169, 13335]);
    assert_eq!(scene.links(), &[(0, 1), (2, 0)]);

    let ticks = scene.run_to_steady_state();
    assert!(ticks > 0 && ticks <= 1_000);
    assert!(scene.simulation().is_settled());
    assert!(!scene.tick());

    let frame = scene.frame();
    assert_eq!(frame.circles.len(), 3);
    assert_eq!(frame.lines.len(), 2);
    assert!(frame.label.is_none());
    assert_eq!((frame.width, frame.height), (960.0, 600.0));

    let first = &frame.circles[0];
    let line = &frame.lines[0];
    assert_eq!((line.x1, line.y1), (first.cx, first.cy));
    assert_eq!(first.id, 3356);
    assert_eq!(first.state, NodeState::Free);
}

#[test]
fn test_ready_page() {
    let mut state = RenderState::from_bytes(GRAPH, RenderConfig::default().with_max_ticks(50));
    let ticks = state.scene_mut().unwrap().run_to_steady_state();
    assert_eq!(ticks, 50);

    let page = render_page(&state);

    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<div id=\"graph-container\">"));
    assert!(page.contains(
        "<canvas id=\"graph-canvas\" width=\"960\" height=\"600\" data-src=\"data/as_graph.json\">"
    ));
    assert!(page.contains("import init from \"./pkg/asgraph.js\";"));
    // Error slot exists for the browser but starts out hidden and empty
    assert!(page.contains("<div id=\"error-message\" class=\"error\" hidden></div>"));

    // Settled layout as the no-script fallback
    let fallback = &page[page.find("<noscript>").unwrap()..page.find("</noscript>").unwrap()];
    assert_eq!(fallback.matches("<circle").count(), 3);
    assert_eq!(fallback.matches("<line ").count(), 2);
    assert!(fallback.contains("<title>AS15169</title>"));
    assert!(fallback.contains("<title>AS13335</title>"));
}

#[test]
fn test_page_uses_configured_data_url() {
    let config = RenderConfig::default().with_data_url("graphs/rrc00 & co.json");
    let state = RenderState::from_bytes(GRAPH, config);

    let page = render_page(&state);

    assert!(page.contains("data-src=\"graphs/rrc00 &amp; co.json\""));
    assert_eq!(RenderConfig::default().data_url, DEFAULT_DATA_URL);
}

#[test]
fn test_fetch_failure_hides_graph() {
    let state = RenderState::fetch_failed("data/as_graph.json", "HTTP status 404");

    assert_eq!(
        state.error(),
        Some("Error loading graph data from data/as_graph.json: HTTP status 404")
    );
    let page = render_page(&state);
    assert!(!page.contains("<canvas"));
    assert!(!page.contains("<script"));
    assert!(page.contains("HTTP status 404"));
}

#[test]
fn test_svg_display_matches_render_svg() {
    let state = RenderState::from_bytes(GRAPH, RenderConfig::default());
    let frame = state.scene().unwrap().frame();

    let svg = Svg(&frame).to_string();

    assert_eq!(svg, render_svg(&frame));
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"960\" height=\"600\""));
    assert!(svg.ends_with("</svg>\n"));
}

#[test]
fn test_viewport_maps_scaled_canvas() {
    // 960x600 buffer shown at half size, 10px from the left, 50px down
    let viewport = Viewport::new((960.0, 600.0), (10.0, 50.0, 480.0, 300.0));

    assert_eq!(viewport.to_layout(10.0, 50.0), (0.0, 0.0));
    assert_eq!(viewport.to_layout(250.0, 200.0), (480.0, 300.0));

    let hidden = Viewport::new((960.0, 600.0), (0.0, 0.0, 0.0, 0.0));
    assert_eq!(hidden.to_layout(5.0, 7.0), (5.0, 7.0));
}

#[test]
fn test_mouse_events_map_to_pointer_events() {
    assert_eq!(
        pointer_event("mousemove", 1.0, 2.0),
        Some(PointerEvent::Move { x: 1.0, y: 2.0 })
    );
    assert_eq!(
        pointer_event("mousedown", 3.0, 4.0),
        Some(PointerEvent::Down { x: 3.0, y: 4.0 })
    );
    assert_eq!(
        pointer_event("mouseup", 5.0, 6.0),
        Some(PointerEvent::Up { x: 5.0, y: 6.0 })
    );
    assert_eq!(pointer_event("mouseleave", 0.0, 0.0), Some(PointerEvent::Leave));
    assert_eq!(pointer_event("wheel", 0.0, 0.0), None);
}

#[test]
fn test_browser_session_drag() {
    // What the canvas listeners and animation loop do, minus the DOM
    let mut state = RenderState::from_bytes(GRAPH, RenderConfig::default());
    let scene = state.scene_mut().unwrap();
    for _ in 0..400 {
        scene.tick();
    }
    assert!(scene.simulation().is_settled());

    let viewport = Viewport::new((960.0, 600.0), (0.0, 0.0, 960.0, 600.0));
    let (nx, ny) = scene.simulation().node(2).unwrap().position();
    for (kind, cx, cy) in [("mousemove", nx, ny), ("mousedown", nx, ny), ("mousemove", 100.0, 80.0)] {
        let (x, y) = viewport.to_layout(cx, cy);
        scene.pointer(pointer_event(kind, x, y).unwrap());
    }

    assert!(scene.tick());
    assert_eq!(scene.simulation().node(2).unwrap().position(), (100.0, 80.0));
    assert_eq!(scene.frame().label.unwrap().text, "AS13335");

    scene.pointer(pointer_event("mouseup", 100.0, 80.0).unwrap());
    assert!(!scene.simulation().node(2).unwrap().is_pinned());
}

#[test]
fn test_unknown_and_duplicate_entries_dropped() {
    let artifact = GraphArtifact {
        nodes: vec![
            ArtifactNode { id: 1 },
            ArtifactNode { id: 2 },
            ArtifactNode { id: 1 },
        ],
        links: vec![
            ArtifactLink { source: 1, target: 2, value: 1 },
            ArtifactLink { source: 2, target: 99, value: 1 },
            ArtifactLink { source: 2, target: 2, value: 1 },
        ],
    };

    let state = RenderState::from_artifact(&artifact, RenderConfig::default());
    let scene = state.scene().unwrap();

    assert_eq!(scene.ids(), &[1, 2]);
    assert_eq!(scene.links(), &[(0, 1)]);
    assert_eq!(scene.simulation().nodes().len(), 2);
}

#[test]
fn test_pointer_label_in_frame() {
    let mut state = RenderState::from_bytes(GRAPH, RenderConfig::default());
    let scene = state.scene_mut().unwrap();
    scene.run_to_steady_state();
    let (x, y) = scene.simulation().node(1).unwrap().position();

    scene.pointer(PointerEvent::Down { x, y });
    let frame = scene.frame();

    assert_eq!(frame.circles[1].state, NodeState::Dragging);
    let label = frame.label.as_ref().unwrap();
    assert_eq!(label.text, "AS15169");
    assert_eq!((label.x, label.y), (x + 10.0, y - 10.0));
    assert!(!scene.simulation().is_settled());

    let svg = render_svg(&frame);
    assert!(svg.contains("class=\"node dragging\""));
    assert!(svg.contains("<text class=\"label\""));
    assert!(svg.contains(">AS15169</text>"));

    scene.pointer(PointerEvent::Leave);
    assert!(scene.frame().label.is_none());
    assert_eq!(scene.interaction().active(), None);
}

#[test]
fn test_custom_parameters() {
    let params = SimulationParameters {
        width: 400.0,
        height: 300.0,
        ..SimulationParameters::default()
    };
    let state = RenderState::from_bytes(GRAPH, RenderConfig::default().with_params(params));

    let frame = state.scene().unwrap().frame();
    assert_eq!((frame.width, frame.height), (400.0, 300.0));
}
