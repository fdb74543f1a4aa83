//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, zooming, hovering and clicking. An
//! animation loop runs via `requestAnimationFrame`, calling the physics
//! simulation and renderer each frame. Graph and hover changes arrive through
//! signals and are applied to the running simulation.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::particles::LinkParticles;
use super::render;
use super::scale::ScaleConfig;
use super::state::ForceGraphState;
use super::theme::Theme;
use crate::config::SimulationConfig;
use crate::feed::{GraphState, Participant};

/// Pointer travel (pixels) that turns a press on a node into a drag.
const CLICK_SLOP: f64 = 3.0;

/// Longest simulation step (seconds) taken for a single frame.
const MAX_FRAME_STEP: f64 = 0.05;

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: ForceGraphState,
	scale: ScaleConfig,
	theme: Theme,
	particles: LinkParticles,
	event_label: String,
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders the participant graph on a canvas element.
///
/// The component sizes itself to its parent container unless `width`/`height`
/// are given. Hovering and clicking nodes are reported through `on_node_hover`
/// and `on_node_click`; which node is drawn as hovered comes back in through
/// `hovered`.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] graph: Signal<GraphState>,
	#[prop(into)] hovered: Signal<Option<String>>,
	#[prop(into)] event_label: Signal<String>,
	#[prop(into)] on_node_click: Callback<Participant>,
	#[prop(into)] on_node_hover: Callback<Option<Participant>>,
	#[prop(optional)] simulation: SimulationConfig,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init) = (context.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let parent = canvas.parent_element();
		let w = width.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_width() as f64)
				.filter(|w| *w > 0.0)
				.unwrap_or(800.0)
		});
		let h = height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.filter(|h| *h > 0.0)
				.unwrap_or(600.0)
		});
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("force_graph: 2d context has unexpected type");
					return;
				}
			},
			_ => {
				warn!("force_graph: canvas has no 2d context");
				return;
			}
		};

		let label = event_label.get_untracked();
		let mut state = ForceGraphState::new(w, h, simulation.clone(), &label);
		graph.with_untracked(|g| state.sync(g));
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale: ScaleConfig::default(),
			theme: Theme::default(),
			particles: LinkParticles::default(),
			event_label: label,
		});

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		let mut last_frame = js_sys::Date::now();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			// Background tabs stall RAF; cap the step so the layout doesn't jump.
			let dt = ((now - last_frame) / 1000.0).clamp(0.0, MAX_FRAME_STEP);
			last_frame = now;
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(dt as f32);
				render::render(
					&c.state,
					&ctx,
					&c.scale,
					&c.theme,
					&c.particles,
					&c.event_label,
				);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_sync = context.clone();
	Effect::new(move |_| {
		graph.with(|g| {
			if let Some(ref mut c) = *context_sync.borrow_mut() {
				c.state.sync(g);
			}
		});
	});

	let context_hover = context.clone();
	Effect::new(move |_| {
		let id = hovered.get();
		if let Some(ref mut c) = *context_hover.borrow_mut() {
			c.state.set_hovered_id(id.as_deref());
		}
	});

	let context_label = context.clone();
	Effect::new(move |_| {
		let label = event_label.get();
		if let Some(ref mut c) = *context_label.borrow_mut() {
			c.event_label = label;
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(idx) = c.state.node_at_position(x, y, &c.scale) {
				c.state.drag.active = true;
				c.state.drag.moved = false;
				c.state.drag.node_idx = Some(idx);
				c.state.drag.start_x = x;
				c.state.drag.start_y = y;
				c.state.graph.visit_nodes(|node| {
					if node.index() == idx {
						c.state.drag.node_start_x = node.x();
						c.state.drag.node_start_y = node.y();
					}
				});
			} else {
				c.state.pan.active = true;
				c.state.pan.start_x = x;
				c.state.pan.start_y = y;
				c.state.pan.transform_start_x = c.state.transform.x;
				c.state.pan.transform_start_y = c.state.transform.y;
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		// Callbacks run after the borrow is released; they may feed back into effects.
		let mut hover_change = None;
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if !c.state.drag.active {
				let hit = c.state.node_at_position(x, y, &c.scale);
				if hit != c.state.hover.hovered() {
					c.state.hover.set(hit);
					hover_change = Some(
						hit.and_then(|idx| c.state.node_info(idx))
							.map(|info| info.participant),
					);
				}
			}

			if c.state.drag.active {
				let (dx_px, dy_px) = (x - c.state.drag.start_x, y - c.state.drag.start_y);
				if dx_px.hypot(dy_px) > CLICK_SLOP {
					c.state.drag.moved = true;
				}
				if let (Some(idx), true) = (c.state.drag.node_idx, c.state.drag.moved) {
					let (nx, ny) = (
						c.state.drag.node_start_x + (dx_px / c.state.transform.k) as f32,
						c.state.drag.node_start_y + (dy_px / c.state.transform.k) as f32,
					);
					c.state.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if c.state.pan.active {
				c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
				c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
			}
		}
		if let Some(participant) = hover_change {
			on_node_hover.run(participant);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut clicked = None;
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.state.drag.active && !c.state.drag.moved {
				clicked = c
					.state
					.drag
					.node_idx
					.and_then(|idx| c.state.node_info(idx))
					.map(|info| info.participant);
			}
			c.state.drag = Default::default();
			c.state.pan.active = false;
		}
		if let Some(participant) = clicked {
			on_node_click.run(participant);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut was_hovering = false;
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag = Default::default();
			c.state.pan.active = false;
			was_hovering = c.state.hover.hovered().is_some();
			c.state.hover.set(None);
		}
		if was_hovering {
			on_node_hover.run(None);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (c.state.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / c.state.transform.k;
			c.state.transform.x = x - (x - c.state.transform.x) * ratio;
			c.state.transform.y = y - (y - c.state.transform.y) * ratio;
			c.state.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
