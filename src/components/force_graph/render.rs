//! Canvas rendering for the force graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Links, arrow heads and flow particles (world space)
//! 3. Nodes, the hover ring and the hovered node's name
//! 4. Overlay chrome: participant bounding box and event label

use std::cell::Cell;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::particles::LinkParticles;
use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ForceGraphState, NodeInfo};
use super::theme::{Color, Theme};

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
	particles: &LinkParticles,
	event_label: &str,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme, particles);
	draw_nodes(state, ctx, &scale, theme);
	draw_hover_label(state, ctx, &scale, theme);
	draw_chrome(state, ctx, &scale, theme, event_label);

	ctx.restore();
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	particles: &LinkParticles,
) {
	// visit_edges order is stable, so the counter gives each link a fixed phase
	let link_idx = Cell::new(0usize);
	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		link_idx.set(link_idx.get() + 1);
		if dist < 0.001 {
			return;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let tip_offset = scale.node_radius * n2.data.user_data.size;
		let (tip_x, tip_y) = (x2 - ux * tip_offset, y2 - uy * tip_offset);

		ctx.set_stroke_style_str(&theme.edge.to_css());
		ctx.set_line_width(scale.edge_line_width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
		ctx.stroke();

		let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
		let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);
		ctx.set_fill_style_str(&theme.arrow.to_css());
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		ctx.set_fill_style_str(&theme.particle.to_css());
		for t in particles.offsets(link_idx.get(), state.flow_time) {
			ctx.begin_path();
			let _ = ctx.arc(x1 + dx * t, y1 + dy * t, scale.particle_radius, 0.0, 2.0 * PI);
			ctx.fill();
		}
	});
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	state.graph.visit_nodes(|node| {
		let (x, y) = (node.x() as f64, node.y() as f64);
		let info = &node.data.user_data;
		let radius = scale.node_radius * info.size;
		draw_node(ctx, x, y, radius, info, theme);

		let ring_t = smooth_step(state.hover.intensity(node.index()));
		if ring_t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.ring.with_alpha(0.8 * ring_t).to_css());
			ctx.set_line_width(scale.ring_width);
			ctx.stroke();
		}
	});
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	info: &NodeInfo,
	theme: &Theme,
) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);

	let gradient = theme
		.node_gradient
		.then(|| ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius))
		.and_then(Result::ok);
	match gradient {
		Some(gradient) => {
			let base = info.color;
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&info.color.to_css()),
	}
	ctx.fill();
}

/// Name of the hovered node, centered just below it.
fn draw_hover_label(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let Some(hovered) = state.hover.hovered() else {
		return;
	};
	state.graph.visit_nodes(|node| {
		if node.index() != hovered {
			return;
		}
		let radius = scale.node_radius * node.data.user_data.size;
		ctx.set_font(&scale.label_font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("top");
		ctx.set_fill_style_str(&theme.label.to_css());
		let _ = ctx.fill_text(
			node.data.user_data.label(),
			node.x() as f64,
			node.y() as f64 + radius + 6.0 / scale.k,
		);
	});
}

/// Box around every role-bearing node with the event name above it.
fn draw_chrome(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	event_label: &str,
) {
	let Some((x0, y0, x1, y1)) = state.participant_bounds() else {
		return;
	};
	let chrome = theme.chrome.to_css();
	ctx.set_stroke_style_str(&chrome);
	ctx.set_line_width(scale.chrome_line_width);
	ctx.stroke_rect(x0, y0, x1 - x0, y1 - y0);

	ctx.set_font(&scale.chrome_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	ctx.set_fill_style_str(&chrome);
	let _ = ctx.fill_text(event_label, (x0 + x1) / 2.0, y0 - 15.0);
}
