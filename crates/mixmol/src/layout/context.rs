//! Per-call mutable layout state
//!
//! Everything a single layout call mutates lives here and is dropped when the
//! call returns, so concurrent calls never share state.

use std::collections::BTreeMap;
use tracing::warn;

use super::collision::CollisionGuard;
use super::factory::NodeFactory;
use super::family::DiagramRotation;
use super::spirits::SpiritTemplate;
use super::LayoutConfig;
use crate::core::{ClassifiedIngredient, IngredientType, LayoutOptions, MoleculeNode, Point};

/// A placed spirit (or the ingredient standing in for one)
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpiritSlot {
    /// Index into the node list; None for the bare center of a spirit-less ring recipe
    pub node: Option<usize>,
    pub position: Point,
}

/// One chain hanging off a corner or junction
#[derive(Debug, Clone, Copy)]
pub(crate) struct BranchState {
    /// +1 or -1: the side the branch leaves its junction on
    pub sign: f64,
    /// Node index of the last link
    pub tail: usize,
    /// Links in the chain so far
    pub length: usize,
}

/// A claimed spirit corner
#[derive(Debug, Clone, Default)]
pub(crate) struct CornerState {
    /// Node index of the junction, when the corner forks
    pub junction: Option<usize>,
    /// Branches promised to a later phase
    pub reserved_branches: usize,
    pub branches: Vec<BranchState>,
}

pub(crate) struct LayoutContext<'a> {
    pub config: &'a LayoutConfig,
    pub options: &'a LayoutOptions,
    pub ingredients: &'a [ClassifiedIngredient],
    pub factory: NodeFactory<'a>,
    pub nodes: Vec<MoleculeNode>,
    pub guard: CollisionGuard,
    pub rotation: DiagramRotation,
    pub template: SpiritTemplate,
    pub spirits: Vec<SpiritSlot>,
    /// Claimed corners keyed by (spirit index, corner)
    pub corners: BTreeMap<(usize, usize), CornerState>,
    /// Corner and branch each (spirit, type) is currently chaining on
    pub active_chains: BTreeMap<(usize, IngredientType), (usize, usize)>,
    /// Which ingredients already have a node (or were consumed by a ring)
    pub placed: Vec<bool>,
    pub ring_count: usize,
    pub skipped_ring_vertices: usize,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        config: &'a LayoutConfig,
        options: &'a LayoutOptions,
        ingredients: &'a [ClassifiedIngredient],
        factory: NodeFactory<'a>,
        rotation: DiagramRotation,
        template: SpiritTemplate,
    ) -> Self {
        Self {
            config,
            options,
            ingredients,
            factory,
            nodes: Vec::with_capacity(ingredients.len() + 2),
            guard: CollisionGuard::new(config.min_node_distance),
            rotation,
            template,
            spirits: Vec::new(),
            corners: BTreeMap::new(),
            active_chains: BTreeMap::new(),
            placed: vec![false; ingredients.len()],
            ring_count: 0,
            skipped_ring_vertices: 0,
        }
    }

    /// Append a node and return its index
    pub fn push_node(&mut self, node: MoleculeNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn node_id(&self, index: usize) -> String {
        self.nodes[index].id.clone()
    }

    /// Node id of a spirit slot, used as a parent link
    pub fn spirit_id(&self, spirit: usize) -> Option<String> {
        self.spirits
            .get(spirit)
            .and_then(|slot| slot.node)
            .map(|index| self.node_id(index))
    }

    pub fn spirit_position(&self, spirit: usize) -> Point {
        self.spirits
            .get(spirit)
            .map(|slot| slot.position)
            .unwrap_or_else(|| self.options.center())
    }

    /// Register a visible position, accepting overlap when nothing better was found
    pub fn commit_position(&mut self, point: Point, id_hint: &str) {
        if !self.guard.try_register(point) {
            warn!(node = id_hint, x = point.x, y = point.y, "Placing node despite collision");
            self.guard.register(point);
        }
    }

    pub fn is_corner_used(&self, spirit: usize, corner: usize) -> bool {
        self.corners.contains_key(&(spirit, corner))
    }

    /// Corners of a spirit that the current template leaves open
    pub fn available_corners(&self, spirit: usize) -> &'static [usize] {
        self.template.available_corners(spirit, self.spirits.len())
    }

    /// Unclaimed, available corners of a spirit in rotation-compensated preference order
    pub fn free_corners(&self, spirit: usize, preferred: &[usize]) -> Vec<usize> {
        let available = self.available_corners(spirit);
        self.rotation
            .shift(preferred)
            .into_iter()
            .filter(|c| available.contains(c) && !self.is_corner_used(spirit, *c))
            .collect()
    }
}
