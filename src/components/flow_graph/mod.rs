//! Selectable flow graph canvas.
//!
//! Renders a force-directed graph on an HTML canvas and drives all of its
//! highlighting through [`crate::highlight`]:
//! - Click selection with neighbour highlighting
//! - Multi-selection and directed path tracing
//! - Pan, zoom, and node dragging
//! - Eased opacity transitions between selections
//!
//! # Example
//!
//! ```ignore
//! use flow_highlight::{FlowGraphCanvas, GraphData, HighlightConfig};
//!
//! let data: GraphData = serde_json::from_str(json)?;
//! let config = HighlightConfig { dimmed_opacity: 0.15, ..Default::default() };
//!
//! view! { <FlowGraphCanvas data=data.into() config=config fullscreen=true /> }
//! ```

mod component;
mod render;
mod state;
pub mod theme;

pub use component::FlowGraphCanvas;
pub use state::Selection;
pub use theme::Theme;
