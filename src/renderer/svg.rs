use std::fmt;

use crate::interaction::NodeState;

use super::canvas::{node_color, LABEL_COLOR, LINK_COLOR, LINK_OPACITY, NODE_STROKE};
use super::{Frame, RenderState};

const PAGE_TITLE: &str = "AS Adjacency Graph";
const WASM_MODULE: &str = "./pkg/asgraph.js";
const PADDING: f64 = 20.0;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn state_class(state: NodeState) -> &'static str {
    match state {
        NodeState::Free => "node",
        NodeState::Hovered => "node hovered",
        NodeState::Dragging => "node dragging",
    }
}

/// View box covering the canvas and every node, padded.
fn view_box(frame: &Frame) -> (f64, f64, f64, f64) {
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (0.0f64, 0.0f64, frame.width, frame.height);
    for c in &frame.circles {
        min_x = min_x.min(c.cx - c.r);
        min_y = min_y.min(c.cy - c.r);
        max_x = max_x.max(c.cx + c.r);
        max_y = max_y.max(c.cy + c.r);
    }
    (
        min_x - PADDING,
        min_y - PADDING,
        max_x - min_x + 2.0 * PADDING,
        max_y - min_y + 2.0 * PADDING,
    )
}

/// One frame as SVG. Every node carries a `<title>`, so browsers show its
/// AS label on hover even without the script.
pub struct Svg<'a>(pub &'a Frame);

impl fmt::Display for Svg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0;
        let (x, y, w, h) = view_box(frame);

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="{:.2} {:.2} {:.2} {:.2}">"#,
            frame.width, frame.height, x, y, w, h
        )?;

        writeln!(
            f,
            r#"<g class="links" stroke="{}" stroke-opacity="{}">"#,
            LINK_COLOR, LINK_OPACITY
        )?;
        for line in &frame.lines {
            writeln!(
                f,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"/>"#,
                line.x1, line.y1, line.x2, line.y2
            )?;
        }
        writeln!(f, "</g>")?;

        writeln!(f, r#"<g class="nodes" stroke="{}" stroke-width="1">"#, NODE_STROKE)?;
        for c in &frame.circles {
            writeln!(
                f,
                r#"<circle class="{}" cx="{:.2}" cy="{:.2}" r="{:.2}"><title>AS{}</title></circle>"#,
                state_class(c.state),
                c.cx,
                c.cy,
                c.r,
                c.id
            )?;
        }
        writeln!(f, "</g>")?;

        if let Some(label) = &frame.label {
            writeln!(
                f,
                r#"<text class="label" x="{:.2}" y="{:.2}">{}</text>"#,
                label.x,
                label.y,
                escape(&label.text)
            )?;
        }

        writeln!(f, "</svg>")
    }
}

pub fn render_svg(frame: &Frame) -> String {
    Svg(frame).to_string()
}

/// Full page. A ready scene gets the canvas the browser module animates,
/// with the settled layout as a `<noscript>` fallback. A failed one gets
/// only the error message.
pub fn render_page(state: &RenderState) -> String {
    let body = match state {
        RenderState::Ready(scene) => {
            let frame = scene.frame();
            format!(
                concat!(
                    "<div id=\"graph-container\">\n",
                    "<canvas id=\"graph-canvas\" width=\"{width:.0}\" height=\"{height:.0}\" data-src=\"{src}\"></canvas>\n",
                    "<noscript>\n{svg}</noscript>\n",
                    "</div>\n",
                    "<div id=\"error-message\" class=\"error\" hidden></div>\n",
                    "<script type=\"module\">\nimport init from \"{module}\";\ninit();\n</script>\n",
                ),
                width = frame.width,
                height = frame.height,
                src = escape(&scene.config().data_url),
                svg = Svg(&frame),
                module = WASM_MODULE,
            )
        }
        RenderState::Failed(message) => format!(
            "<div id=\"error-message\" class=\"error\">{}</div>\n",
            escape(message)
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
body {{ margin: 0; font-family: sans-serif; background: #fff; }}
h1 {{ font-size: 1.2em; margin: 0.5em; }}
#graph-canvas {{ display: block; max-width: 100%; cursor: grab; }}
.node {{ fill: {free}; }}
.node:hover, .node.hovered {{ fill: {hovered}; }}
.node.dragging {{ fill: {dragging}; }}
.label {{ font-size: 12px; fill: {label}; pointer-events: none; }}
.error {{ color: #b00020; margin: 1em; }}
</style>
</head>
<body>
<h1>{title}</h1>
{body}</body>
</html>
"#,
        title = PAGE_TITLE,
        free = node_color(NodeState::Free),
        hovered = node_color(NodeState::Hovered),
        dragging = node_color(NodeState::Dragging),
        label = LABEL_COLOR,
        body = body
    )
}
