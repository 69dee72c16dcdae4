//! Text preview of a laid-out molecule
//!
//! Projects nodes onto a [`PlotCanvas`]: bonds first, then labels, then node
//! glyphs on top so a long label never hides a node.

mod glyphs;

use std::collections::HashMap;
use tracing::{debug, span, Level};

pub use glyphs::{kind_for_glyph, legend, node_glyph};

use crate::core::{truncate_label, IngredientType, LayoutOptions, MoleculeNode, PlotCanvas};
use crate::layout::MoleculeLayout;

/// Preview settings
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewConfig {
    /// Layout units per terminal column
    pub x_scale: f64,
    /// Restrict output to ASCII
    pub ascii: bool,
    /// Labels longer than this many columns are cut
    pub max_label_width: usize,
    pub show_labels: bool,
    pub show_legend: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            x_scale: 5.0,
            ascii: false,
            max_label_width: 14,
            show_labels: true,
            show_legend: true,
        }
    }
}

/// Renders node lists as character art
pub struct PreviewRenderer {
    config: PreviewConfig,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self {
            config: PreviewConfig::default(),
        }
    }

    pub fn with_config(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// ASCII-only renderer with default settings
    pub fn ascii() -> Self {
        Self::with_config(PreviewConfig {
            ascii: true,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Render a full layout result
    pub fn render_layout(&self, layout: &MoleculeLayout, options: &LayoutOptions) -> String {
        self.render(&layout.nodes, options)
    }

    /// Render a node list on a canvas of the given options' size
    pub fn render(&self, nodes: &[MoleculeNode], options: &LayoutOptions) -> String {
        let render_span = span!(Level::DEBUG, "render_preview", node_count = nodes.len());
        let _enter = render_span.enter();

        if nodes.is_empty() {
            return String::new();
        }

        let mut canvas = PlotCanvas::for_area(options.width, options.height, self.config.x_scale);
        let cells: HashMap<&str, (usize, usize)> = nodes
            .iter()
            .map(|n| (n.id.as_str(), canvas.cell(n.position())))
            .collect();

        for node in nodes {
            let Some(parent) = node.parent_id.as_deref() else {
                continue;
            };
            if let (Some(&from), Some(&to)) = (cells.get(parent), cells.get(node.id.as_str())) {
                canvas.draw_bond(from, to, self.config.ascii);
            }
        }

        for (from, to) in ring_edges(nodes) {
            canvas.draw_bond(cells[from], cells[to], self.config.ascii);
        }

        if self.config.show_labels {
            for node in nodes.iter().filter(|n| !n.is_junction() && !n.label.is_empty()) {
                let (col, row) = cells[node.id.as_str()];
                let mut label = truncate_label(&node.label, self.config.max_label_width);
                if self.config.ascii {
                    label = label.replace('…', "~");
                    label.retain(|c| c.is_ascii());
                }
                canvas.draw_text(col + 2, row, &label);
            }
        }

        for node in nodes {
            let (col, row) = cells[node.id.as_str()];
            canvas.set_char(col, row, node_glyph(node.kind, self.config.ascii));
        }

        let mut out = canvas.to_string();
        if self.config.show_legend {
            let mut kinds: Vec<IngredientType> = nodes.iter().map(|n| n.kind).collect();
            kinds.sort_unstable();
            kinds.dedup();
            out.push_str("\n\n");
            out.push_str(&legend(&kinds, self.config.ascii));
        }
        debug!(cols = canvas.cols, rows = canvas.rows, "Rendered preview");
        out
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pairs of adjacent ring vertices, by node id, closing each ring
///
/// Dropped vertices are skipped over, so a ring missing one vertex is drawn
/// as a smaller polygon.
pub fn ring_edges(nodes: &[MoleculeNode]) -> Vec<(&str, &str)> {
    let mut rings: Vec<(&str, Vec<(usize, &str)>)> = Vec::new();
    for node in nodes {
        let (Some(ring), Some(index)) = (node.ring_id.as_deref(), node.ring_index) else {
            continue;
        };
        match rings.iter_mut().find(|(id, _)| *id == ring) {
            Some((_, members)) => members.push((index, node.id.as_str())),
            None => rings.push((ring, vec![(index, node.id.as_str())])),
        }
    }

    let mut edges = Vec::new();
    for (_, mut members) in rings {
        members.sort_unstable();
        if members.len() < 2 {
            continue;
        }
        for pair in members.windows(2) {
            edges.push((pair[0].1, pair[1].1));
        }
        if members.len() > 2 {
            if let (Some(last), Some(first)) = (members.last(), members.first()) {
                edges.push((last.1, first.1));
            }
        }
    }
    edges
}
