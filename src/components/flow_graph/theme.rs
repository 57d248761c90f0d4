//! Visual theming for the flow graph canvas.
//!
//! The highlight engine decides opacity, accent colors and widths; the theme
//! only supplies what the engine leaves unset (fills, default strokes,
//! background).

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha, 0.0 (transparent) to 1.0 (opaque).
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with alpha replaced.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let up = |c: u8| (c as f64 + (255.0 - c as f64) * f) as u8;
		Self {
			r: up(self.r),
			g: up(self.g),
			b: up(self.b),
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		let down = |c: u8| (c as f64 * f) as u8;
		Self {
			r: down(self.r),
			g: down(self.g),
			b: down(self.b),
			a: self.a,
		}
	}

	/// `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` and `rgb()`/`rgba()` notation.
	///
	/// Returns `None` for anything else (named colors, `hsl()`, garbage), so
	/// callers can fall back to a theme color.
	pub fn parse(css: &str) -> Option<Self> {
		let css = css.trim();
		if let Some(hex) = css.strip_prefix('#') {
			let channel = |s: &str| u8::from_str_radix(s, 16).ok();
			return match hex.len() {
				3 => {
					let mut it = hex.chars().map(|c| channel(&format!("{c}{c}")));
					Some(Self::rgb(it.next()??, it.next()??, it.next()??))
				}
				6 => Some(Self::rgb(
					channel(hex.get(0..2)?)?,
					channel(hex.get(2..4)?)?,
					channel(hex.get(4..6)?)?,
				)),
				8 => Some(Self::rgba(
					channel(hex.get(0..2)?)?,
					channel(hex.get(2..4)?)?,
					channel(hex.get(4..6)?)?,
					channel(hex.get(6..8)?)? as f64 / 255.0,
				)),
				_ => None,
			};
		}

		let args = css
			.strip_prefix("rgba(")
			.or_else(|| css.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let parts: Vec<&str> = args.split(',').map(str::trim).collect();
		let (r, g, b) = match parts.as_slice() {
			[r, g, b] | [r, g, b, _] => (r.parse().ok()?, g.parse().ok()?, b.parse().ok()?),
			_ => return None,
		};
		let a = match parts.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Self::rgba(r, g, b, a))
	}
}

/// Fill colors handed out to node groups in order of first appearance.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Palette entries, reused cyclically.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted slate blues and teals.
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),
				Color::rgb(100, 148, 160),
				Color::rgb(143, 120, 170),
				Color::rgb(180, 136, 100),
				Color::rgb(119, 158, 125),
				Color::rgb(170, 110, 120),
				Color::rgb(136, 160, 175),
				Color::rgb(165, 150, 100),
			],
		}
	}

	/// Entry `index`, wrapping around. An empty palette yields neutral gray.
	pub fn get(&self, index: usize) -> Color {
		match self.colors.len() {
			0 => Color::rgb(128, 128, 128),
			len => self.colors[index % len],
		}
	}
}

/// Canvas background.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Edge color of the gradient, or the flat fill.
	pub color: Color,
	/// Center color of the radial gradient.
	pub color_secondary: Color,
	/// Radial gradient instead of a flat fill.
	pub use_gradient: bool,
}

/// Node defaults.
#[derive(Clone, Debug)]
pub struct NodeTheme {
	/// Base radius in world units, before degree-based sizing.
	pub radius: f64,
	/// Outline used when the node style carries no border color.
	pub border_color: Color,
	/// Shaded radial fill instead of a flat one.
	pub use_gradient: bool,
	/// Label text color.
	pub label_color: Color,
	/// CSS font for labels.
	pub label_font: String,
	/// CSS font for labels of selected nodes.
	pub selected_label_font: String,
	/// Extra radius of the selection ring drawn for nodes with a box shadow.
	pub ring_offset: f64,
	/// Selection ring width in screen pixels.
	pub ring_width: f64,
}

/// Edge defaults.
#[derive(Clone, Debug)]
pub struct EdgeTheme {
	/// Stroke used when the edge style carries no stroke color.
	pub color: Color,
	/// World units per unit of `strokeWidth`.
	pub width_unit: f64,
	/// Thinnest line drawn, in screen pixels.
	pub min_screen_width: f64,
	/// Arrowhead length in world units.
	pub arrow_size: f64,
	/// Extra bend per parallel edge between the same two nodes.
	pub parallel_tension: f64,
	/// Dash pattern (dash, gap) in screen pixels for dimmed edges.
	pub dimmed_dash: Option<(f64, f64)>,
}

/// Complete visual configuration for the canvas.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Node defaults.
	pub node: NodeTheme,
	/// Edge defaults.
	pub edge: EdgeTheme,
	/// Fills for nodes without an explicit color.
	pub palette: NodePalette,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(15, 17, 23),
				color_secondary: Color::rgb(28, 32, 44),
				use_gradient: true,
			},
			node: NodeTheme {
				radius: 8.0,
				border_color: Color::rgba(255, 255, 255, 0.35),
				use_gradient: true,
				label_color: Color::rgba(255, 255, 255, 0.85),
				label_font: "11px system-ui, sans-serif".to_string(),
				selected_label_font: "bold 12px system-ui, sans-serif".to_string(),
				ring_offset: 3.0,
				ring_width: 4.0,
			},
			edge: EdgeTheme {
				color: Color::rgba(148, 163, 184, 0.8),
				width_unit: 1.2,
				min_screen_width: 0.5,
				arrow_size: 6.0,
				parallel_tension: 0.35,
				dimmed_dash: Some((4.0, 3.0)),
			},
			palette: NodePalette::slate(),
		}
	}
}
