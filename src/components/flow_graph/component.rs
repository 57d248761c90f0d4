//! Leptos component wrapping the flow graph canvas.
//!
//! The component creates an HTML canvas element and wires up pointer, wheel
//! and keyboard handlers. Presses that do not move turn into selection
//! clicks; presses that move drag a node or pan the view. An animation loop
//! runs via `requestAnimationFrame`, stepping the physics and opacity fades
//! and redrawing each frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::render;
use super::state::{CLICK_SLOP, FlowGraphState, MAX_ZOOM, MIN_ZOOM};
use super::theme::Theme;
use crate::highlight::{GraphData, HighlightConfig};

/// Bundles graph simulation state with its theme.
struct GraphContext {
	state: FlowGraphState,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders an interactive, selectable flow graph on a canvas element.
///
/// - click a node to highlight it and its neighbours, click it again to clear
/// - ctrl/cmd-click to add or remove nodes from a multi-selection
/// - shift-click to trace a directed path from the selected node
/// - click the background or press Escape to reset
///
/// The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and follow window resizes.
/// Explicit `width`/`height` override automatic sizing.
#[component]
pub fn FlowGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = HighlightConfig::default())] config: HighlightConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (status, set_status) = signal(String::new());
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| {
					parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("flow-highlight: canvas has no 2d context");
			return;
		};

		let theme = Theme::default();
		*context_init.borrow_mut() = Some(GraphContext {
			state: FlowGraphState::new(&data.get(), w, h, &theme, config.clone()),
			theme,
		});
		set_status.set(String::new());

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(0.016);
				render::render(&c.state, &ctx, &c.theme);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(idx) = c.state.node_at_position(x, y, &c.theme) {
				let drag = &mut c.state.drag;
				drag.active = true;
				drag.node_idx = Some(idx);
				drag.start_x = x;
				drag.start_y = y;
				drag.travel = 0.0;
				c.state.graph.visit_nodes(|node| {
					if node.index() == idx {
						c.state.drag.node_start_x = node.x();
						c.state.drag.node_start_y = node.y();
					}
				});
			} else {
				let pan = &mut c.state.pan;
				pan.active = true;
				pan.start_x = x;
				pan.start_y = y;
				pan.travel = 0.0;
				pan.transform_start_x = c.state.transform.x;
				pan.transform_start_y = c.state.transform.y;
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let state = &mut c.state;
			if state.drag.active {
				let Some(idx) = state.drag.node_idx else {
					return;
				};
				let (sx, sy) = (x - state.drag.start_x, y - state.drag.start_y);
				state.drag.travel = state.drag.travel.max((sx * sx + sy * sy).sqrt());
				if state.drag.travel < CLICK_SLOP {
					return;
				}
				let (nx, ny) = (
					state.drag.node_start_x + (sx / state.transform.k) as f32,
					state.drag.node_start_y + (sy / state.transform.k) as f32,
				);
				state.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			} else if state.pan.active {
				let (sx, sy) = (x - state.pan.start_x, y - state.pan.start_y);
				state.pan.travel = state.pan.travel.max((sx * sx + sy * sy).sqrt());
				state.transform.x = state.pan.transform_start_x + sx;
				state.transform.y = state.pan.transform_start_y + sy;
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			let state = &mut c.state;
			if state.drag.active && state.drag.travel < CLICK_SLOP {
				let node_id = state
					.drag
					.node_idx
					.and_then(|idx| state.node_id(idx))
					.map(str::to_string);
				if let Some(node_id) = node_id {
					if ev.shift_key() {
						state.trace_to(&node_id);
					} else if ev.ctrl_key() || ev.meta_key() {
						state.toggle(&node_id);
					} else {
						state.select(&node_id);
					}
				}
			} else if state.pan.active && state.pan.travel < CLICK_SLOP {
				state.clear_selection();
			}
			state.drag.active = false;
			state.drag.node_idx = None;
			state.pan.active = false;
			set_status.set(state.selection.describe());
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let transform = &mut c.state.transform;
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
			let ratio = new_k / transform.k;
			transform.x = x - (x - transform.x) * ratio;
			transform.y = y - (y - transform.y) * ratio;
			transform.k = new_k;
		}
	};

	let context_kd = context.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if let Some(ref mut c) = *context_kd.borrow_mut() {
			match ev.key().as_str() {
				"Escape" => {
					c.state.clear_selection();
					set_status.set(String::new());
				}
				" " => {
					ev.prevent_default();
					c.state.animation_running = !c.state.animation_running;
					debug!("flow-highlight: physics running = {}", c.state.animation_running);
				}
				_ => {}
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="flow-graph-canvas"
			tabindex="0"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:keydown=on_keydown
			style="display: block; cursor: grab; outline: none;"
		/>
		<div class="graph-status">{move || status.get()}</div>
	}
}
