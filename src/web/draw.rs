use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::renderer::canvas::{
    node_color, LABEL_COLOR, LABEL_FONT, LINK_COLOR, LINK_OPACITY, NODE_STROKE,
};
use crate::renderer::Frame;

pub fn draw(frame: &Frame, ctx: &CanvasRenderingContext2d) {
    ctx.clear_rect(0.0, 0.0, frame.width, frame.height);
    draw_links(frame, ctx);
    draw_nodes(frame, ctx);
    draw_label(frame, ctx);
}

fn draw_links(frame: &Frame, ctx: &CanvasRenderingContext2d) {
    ctx.set_global_alpha(LINK_OPACITY);
    ctx.set_stroke_style_str(LINK_COLOR);
    ctx.set_line_width(1.0);
    ctx.begin_path();
    for line in &frame.lines {
        ctx.move_to(line.x1, line.y1);
        ctx.line_to(line.x2, line.y2);
    }
    ctx.stroke();
    ctx.set_global_alpha(1.0);
}

fn draw_nodes(frame: &Frame, ctx: &CanvasRenderingContext2d) {
    ctx.set_stroke_style_str(NODE_STROKE);
    for circle in &frame.circles {
        ctx.begin_path();
        let _ = ctx.arc(circle.cx, circle.cy, circle.r, 0.0, 2.0 * PI);
        ctx.set_fill_style_str(node_color(circle.state));
        ctx.fill();
        ctx.stroke();
    }
}

fn draw_label(frame: &Frame, ctx: &CanvasRenderingContext2d) {
    if let Some(label) = &frame.label {
        ctx.set_fill_style_str(LABEL_COLOR);
        ctx.set_font(LABEL_FONT);
        let _ = ctx.fill_text(&label.text, label.x, label.y);
    }
}
