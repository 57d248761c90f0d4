//! Canvas rendering for the flow graph.
//!
//! Draws whatever the highlight engine decided: stroke colors and widths,
//! border accents, selection rings and (eased) opacities. Passes, in z-order:
//! 1. Background (screen space)
//! 2. Dimmed edges, then highlighted edges (world space)
//! 3. Dimmed nodes, then highlighted nodes with rings and labels on top

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{EdgeRoute, FlowGraphState, NodeInfo};
use super::theme::{Color, Theme};
use crate::highlight::{Edge, Node, class};

/// Renders the complete graph to the canvas.
pub fn render(state: &FlowGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, theme);
	draw_nodes(state, ctx, theme);

	ctx.restore();
}

fn draw_background(state: &FlowGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = theme
		.background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				state.width.max(state.height) * 0.8,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn is_highlighted_edge(edge: &Edge) -> bool {
	class::has(edge.class_name.as_deref(), class::HIGHLIGHTED_EDGE)
}

fn is_highlighted_node(node: &Node) -> bool {
	class::has(node.class_name.as_deref(), class::HIGHLIGHTED_NODE)
}

fn draw_edges(state: &FlowGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let mut positions = std::collections::HashMap::new();
	state.graph.visit_nodes(|node| {
		let radius = state.node_radius(&node.data.user_data, theme);
		positions.insert(node.index(), (node.x() as f64, node.y() as f64, radius));
	});

	let styled = &state.styled().edges;
	for on_top in [false, true] {
		for (i, (edge, route)) in styled.iter().zip(state.routes()).enumerate() {
			let Some(route) = route else {
				continue;
			};
			if is_highlighted_edge(edge) != on_top {
				continue;
			}
			let (Some(&from), Some(&to)) = (positions.get(&route.source), positions.get(&route.target))
			else {
				continue;
			};
			draw_edge(state, ctx, theme, edge, route, from, to, state.fade.edge(i));
		}
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

#[allow(clippy::too_many_arguments)]
fn draw_edge(
	state: &FlowGraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	edge: &Edge,
	route: &EdgeRoute,
	(x1, y1, r1): (f64, f64, f64),
	(x2, y2, r2): (f64, f64, f64),
	alpha: f64,
) {
	let k = state.transform.k;
	let color = edge
		.style
		.stroke
		.as_deref()
		.and_then(Color::parse)
		.unwrap_or(theme.edge.color);
	let width = (edge.style.stroke_width.unwrap_or(1.0) * theme.edge.width_unit)
		.max(theme.edge.min_screen_width / k);
	let stroke = color.with_alpha(color.a * alpha).to_css();

	ctx.set_stroke_style_str(&stroke);
	ctx.set_fill_style_str(&stroke);
	ctx.set_line_width(width);
	let dash = match theme.edge.dimmed_dash {
		Some((on, off)) if class::has(edge.class_name.as_deref(), class::DIMMED_EDGE) => {
			js_sys::Array::of2(&JsValue::from_f64(on / k), &JsValue::from_f64(off / k))
		}
		_ => js_sys::Array::new(),
	};
	let _ = ctx.set_line_dash(&dash);

	if route.source == route.target {
		// Self-loop: a small circle sitting on top of the node.
		let loop_r = r1 * 0.8 + 4.0 * route.lane as f64;
		ctx.begin_path();
		let _ = ctx.arc(x1, y1 - r1 - loop_r * 0.6, loop_r, 0.0, 2.0 * PI);
		ctx.stroke();
		return;
	}

	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < r1 + r2 + 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let arrow = theme.edge.arrow_size.max(width * 2.5);

	let (start_x, start_y) = (x1 + ux * r1, y1 + uy * r1);
	let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);

	// Parallel edges bow out to alternating sides.
	let tension = match route.lane {
		0 => 0.0,
		lane => {
			let side = if lane % 2 == 1 { 1.0 } else { -1.0 };
			side * theme.edge.parallel_tension * lane.div_ceil(2) as f64
		}
	};
	let (px, py) = (-uy * dist * tension * 0.3, ux * dist * tension * 0.3);
	let (mid_x, mid_y) = ((x1 + x2) / 2.0 + px, (y1 + y2) / 2.0 + py);

	// Arrow direction follows the curve's tangent at the tip.
	let (tx, ty) = (tip_x - mid_x, tip_y - mid_y);
	let tangent = (tx * tx + ty * ty).sqrt().max(0.001);
	let (ax, ay) = (tx / tangent, ty / tangent);
	let (back_x, back_y) = (tip_x - ax * arrow, tip_y - ay * arrow);

	ctx.begin_path();
	ctx.move_to(start_x, start_y);
	if tension == 0.0 {
		ctx.line_to(back_x, back_y);
	} else {
		let _ = ctx.quadratic_curve_to(mid_x, mid_y, back_x, back_y);
	}
	ctx.stroke();

	let _ = ctx.set_line_dash(&js_sys::Array::new());
	let (nx, ny) = (-ay * arrow * 0.5, ax * arrow * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + nx, back_y + ny);
	ctx.line_to(back_x - nx, back_y - ny);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(state: &FlowGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let styled = &state.styled().nodes;
	for on_top in [false, true] {
		state.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			let Some(style) = styled.get(info.index) else {
				return;
			};
			if is_highlighted_node(style) != on_top {
				return;
			}
			let alpha = state.fade.node(info.index);
			let (x, y) = (node.x() as f64, node.y() as f64);
			draw_node(state, ctx, theme, info, style, x, y, alpha);
		});
	}
}

#[allow(clippy::too_many_arguments)]
fn draw_node(
	state: &FlowGraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	info: &NodeInfo,
	node: &Node,
	x: f64,
	y: f64,
	alpha: f64,
) {
	let k = state.transform.k;
	let radius = state.node_radius(info, theme);
	let fill = Color::parse(&info.color).unwrap_or(theme.palette.get(info.index));

	ctx.set_global_alpha(alpha);

	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.ok()
		})
		.flatten();
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &fill.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &fill.to_css());
			let _ = gradient.add_color_stop(1.0, &fill.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&fill.to_css()),
	}
	ctx.fill();

	let border = node
		.style
		.border_color
		.as_deref()
		.and_then(Color::parse)
		.unwrap_or(theme.node.border_color);
	let border_width = node.style.border_width.unwrap_or(1.0);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&border.to_css());
	ctx.set_line_width(border_width / k);
	ctx.stroke();

	// The engine only sets a box shadow on the focused node; draw it as a
	// translucent ring in the accent color.
	if node.style.box_shadow.is_some() {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + theme.node.ring_offset / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&border.with_alpha(0.25).to_css());
		ctx.set_line_width(theme.node.ring_width / k);
		ctx.stroke();
	}

	let selected = class::has(node.class_name.as_deref(), class::SELECTED_NODE);
	if let Some(label) = &info.label {
		if selected || alpha > 0.5 {
			ctx.set_fill_style_str(&theme.node.label_color.to_css());
			ctx.set_font(if selected {
				&theme.node.selected_label_font
			} else {
				&theme.node.label_font
			});
			let _ = ctx.fill_text(label, x + radius + 4.0 / k, y + 3.0 / k);
		}
	}

	ctx.set_global_alpha(1.0);
}
