//! Ring detection and ring layout
//!
//! Three to six ingredients of one type with identical, known amounts are
//! drawn as a regular polygon hanging off the primary spirit instead of a
//! chain. Vertex 0 sits where a chain would have bonded to the corner.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, warn};

use super::context::LayoutContext;
use super::corners::Phase;
use crate::core::{
    corner_angle, extend_from_vertex, regular_polygon_radius, ClassifiedIngredient,
    IngredientType, CORNER_COUNT,
};

/// Smallest group that forms a ring
pub const MIN_RING_SIZE: usize = 3;
/// Largest group that forms a ring
pub const MAX_RING_SIZE: usize = 6;

/// Same-type ingredients laid out as one polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingGroup {
    pub kind: IngredientType,
    /// Input indices in recipe order; member 0 becomes the attachment vertex
    pub members: Vec<usize>,
    pub ring_size: usize,
}

/// Find every type group that qualifies as a ring
///
/// Groups are returned in order of their first member.
pub fn detect_ring_groups(ingredients: &[ClassifiedIngredient]) -> Vec<RingGroup> {
    let mut by_kind: Vec<(IngredientType, Vec<usize>)> = Vec::new();
    for (index, ingredient) in ingredients.iter().enumerate() {
        if matches!(ingredient.kind, IngredientType::Spirit | IngredientType::Junction) {
            continue;
        }
        match by_kind.iter_mut().find(|(kind, _)| *kind == ingredient.kind) {
            Some((_, members)) => members.push(index),
            None => by_kind.push((ingredient.kind, vec![index])),
        }
    }

    by_kind
        .into_iter()
        .filter(|(_, members)| qualifies(ingredients, members))
        .map(|(kind, members)| RingGroup {
            kind,
            ring_size: members.len(),
            members,
        })
        .collect()
}

fn qualifies(ingredients: &[ClassifiedIngredient], members: &[usize]) -> bool {
    if !(MIN_RING_SIZE..=MAX_RING_SIZE).contains(&members.len()) {
        return false;
    }
    let Some(first) = ingredients[members[0]].amount else {
        return false;
    };
    members
        .iter()
        .all(|&m| ingredients[m].amount.is_some_and(|a| a == first))
}

impl LayoutContext<'_> {
    /// Lay out one ring on the primary spirit
    pub(crate) fn place_ring(&mut self, group: &RingGroup) {
        let spirit = 0;
        let prefs = Phase::for_kind(group.kind).preferred_corners();
        let corner = match self.claim_corner(spirit, prefs) {
            Some(corner) => corner,
            None => {
                let fallback = (0..CORNER_COUNT)
                    .find(|c| !self.is_corner_used(spirit, *c))
                    .or_else(|| self.rotation.shift(prefs).first().copied())
                    .unwrap_or(0);
                warn!(kind = %group.kind, corner = fallback, "No preferred corner left for ring");
                self.corners.entry((spirit, fallback)).or_default();
                fallback
            }
        };

        let theta = corner_angle(corner);
        let attach = extend_from_vertex(
            self.spirit_position(spirit),
            self.config.hex_radius,
            corner,
            self.config.bond_length,
        );
        let size = group.members.len();
        let radius = regular_polygon_radius(self.config.ring_bond_length, size);
        let center = attach.offset(theta, radius);
        let start = center.angle_to(attach);
        let ring_id = format!("ring-{}", self.ring_count);
        self.ring_count += 1;

        debug!(
            ring = %ring_id,
            kind = %group.kind,
            size,
            corner,
            radius,
            "Placing ring"
        );

        for (i, &member) in group.members.iter().enumerate() {
            let angle = start + i as f64 * TAU / size as f64;
            let position = if i == 0 {
                attach
            } else {
                center.offset(angle, radius)
            };
            self.placed[member] = true;

            if !self.guard.try_register(position) {
                self.skipped_ring_vertices += 1;
                warn!(
                    ring = %ring_id,
                    vertex = i,
                    name = %self.ingredients[member].name,
                    "Dropping colliding ring vertex"
                );
                continue;
            }

            let parent = if i == 0 { self.spirit_id(spirit) } else { None };
            let mut node = self.factory.ingredient_node(
                member,
                &self.ingredients[member],
                position,
                parent,
                angle,
            );
            node.ring_id = Some(ring_id.clone());
            node.ring_index = Some(i);
            node.ring_size = Some(size);
            self.push_node(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{centroid, LayoutOptions, MoleculeNode, Point};
    use crate::layout::factory::{DefaultDecorator, NodeFactory};
    use crate::layout::family::DiagramRotation;
    use crate::layout::spirits::SpiritTemplate;
    use crate::layout::LayoutConfig;

    fn garnish(name: &str, amount: Option<f64>) -> ClassifiedIngredient {
        let g = ClassifiedIngredient::new(name, IngredientType::Garnish);
        match amount {
            Some(a) => g.with_amount(a, None),
            None => g,
        }
    }

    #[test]
    fn test_equal_amounts_form_ring() {
        let recipe = vec![
            ClassifiedIngredient::new("gin", IngredientType::Spirit).with_amount(2.0, Some("oz")),
            garnish("mint", Some(1.0)),
            garnish("basil", Some(1.0)),
            garnish("sage", Some(1.0)),
            garnish("thyme", Some(1.0)),
        ];
        let groups = detect_ring_groups(&recipe);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, IngredientType::Garnish);
        assert_eq!(groups[0].members, vec![1, 2, 3, 4]);
        assert_eq!(groups[0].ring_size, 4);
    }

    #[test]
    fn test_differing_amounts_do_not_ring() {
        let recipe = vec![
            garnish("mint", Some(1.0)),
            garnish("basil", Some(2.0)),
            garnish("sage", Some(1.0)),
        ];
        assert!(detect_ring_groups(&recipe).is_empty());
    }

    #[test]
    fn test_missing_amount_blocks_ring() {
        let recipe = vec![
            garnish("mint", Some(1.0)),
            garnish("basil", None),
            garnish("sage", Some(1.0)),
        ];
        assert!(detect_ring_groups(&recipe).is_empty());
    }

    #[test]
    fn test_size_limits() {
        let two: Vec<_> = (0..2).map(|i| garnish(&format!("g{}", i), Some(1.0))).collect();
        assert!(detect_ring_groups(&two).is_empty());
        let six: Vec<_> = (0..6).map(|i| garnish(&format!("g{}", i), Some(1.0))).collect();
        assert_eq!(detect_ring_groups(&six).len(), 1);
        let seven: Vec<_> = (0..7).map(|i| garnish(&format!("g{}", i), Some(1.0))).collect();
        assert!(detect_ring_groups(&seven).is_empty());
    }

    #[test]
    fn test_spirits_never_ring() {
        let recipe: Vec<_> = ["gin", "rum", "vodka"]
            .iter()
            .map(|n| ClassifiedIngredient::new(*n, IngredientType::Spirit).with_amount(1.0, Some("oz")))
            .collect();
        assert!(detect_ring_groups(&recipe).is_empty());
    }

    #[test]
    fn test_groups_in_first_member_order() {
        let mut recipe = vec![ClassifiedIngredient::new("lime", IngredientType::Acid).with_amount(0.5, Some("oz"))];
        recipe.extend((0..3).map(|i| garnish(&format!("g{}", i), Some(1.0))));
        recipe.push(ClassifiedIngredient::new("lemon", IngredientType::Acid).with_amount(0.5, Some("oz")));
        recipe.push(ClassifiedIngredient::new("yuzu", IngredientType::Acid).with_amount(0.5, Some("oz")));
        let groups = detect_ring_groups(&recipe);
        let kinds: Vec<_> = groups.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![IngredientType::Acid, IngredientType::Garnish]);
        assert_eq!(groups[0].members, vec![0, 4, 5]);
    }

    fn ring_recipe(size: usize) -> Vec<ClassifiedIngredient> {
        let mut recipe = vec![ClassifiedIngredient::new("gin", IngredientType::Spirit)];
        recipe.extend((0..size).map(|i| garnish(&format!("leaf {}", i), Some(1.0))));
        recipe
    }

    /// Where vertex `i` of a garnish ring on a lone centered spirit lands
    fn expected_vertex(config: &LayoutConfig, options: &LayoutOptions, size: usize, i: usize) -> Point {
        let corner = Phase::Garnish.preferred_corners()[0];
        let attach = extend_from_vertex(options.center(), config.hex_radius, corner, config.bond_length);
        let radius = regular_polygon_radius(config.ring_bond_length, size);
        let center = attach.offset(corner_angle(corner), radius);
        center.offset(center.angle_to(attach) + i as f64 * TAU / size as f64, radius)
    }

    /// Place the spirit, run `prepare`, then place the ring
    fn run_ring<F>(recipe: &[ClassifiedIngredient], prepare: F) -> (Vec<MoleculeNode>, usize, usize)
    where
        F: FnOnce(&mut LayoutContext<'_>),
    {
        let config = LayoutConfig::default();
        let options = LayoutOptions::default();
        let decorator = DefaultDecorator;
        let factory = NodeFactory::new(&options, &config, &decorator);
        let mut ctx = LayoutContext::new(
            &config,
            &options,
            recipe,
            factory,
            DiagramRotation::default(),
            SpiritTemplate::Single,
        );
        ctx.place_spirits(&[0]);
        prepare(&mut ctx);
        let group = detect_ring_groups(recipe).remove(0);
        ctx.place_ring(&group);
        assert!(ctx.placed.iter().all(|&p| p));
        (ctx.nodes, ctx.factory.junction_count(), ctx.skipped_ring_vertices)
    }

    #[test]
    fn test_ring_polygon_geometry() {
        let config = LayoutConfig::default();
        let options = LayoutOptions::default();
        let recipe = ring_recipe(5);
        let (nodes, _, skipped) = run_ring(&recipe, |_| {});
        assert_eq!(skipped, 0);

        let ring: Vec<&MoleculeNode> = nodes.iter().filter(|n| n.is_ring_member()).collect();
        assert_eq!(ring.len(), 5);
        let points: Vec<Point> = ring.iter().map(|n| n.position()).collect();

        let corner = Phase::Garnish.preferred_corners()[0];
        let attach = extend_from_vertex(options.center(), config.hex_radius, corner, config.bond_length);
        let radius = regular_polygon_radius(config.ring_bond_length, 5);
        let center = centroid(&points).unwrap();
        assert!(center.distance(attach.offset(corner_angle(corner), radius)) < 1e-6);
        assert!(points[0].distance(attach) < 1e-6);

        for i in 0..points.len() {
            let edge = points[i].distance(points[(i + 1) % points.len()]);
            assert!((edge - config.ring_bond_length).abs() < 1e-6, "edge {} is {}", i, edge);
        }
    }

    #[test]
    fn test_only_attachment_vertex_has_parent() {
        let recipe = ring_recipe(4);
        let (nodes, _, _) = run_ring(&recipe, |_| {});
        for node in nodes.iter().filter(|n| n.is_ring_member()) {
            match node.ring_index {
                Some(0) => assert_eq!(node.parent_id.as_deref(), Some("spirit-0")),
                _ => assert_eq!(node.parent_id, None, "{}", node.id),
            }
        }
    }

    #[test]
    fn test_colliding_vertex_is_dropped() {
        let config = LayoutConfig::default();
        let options = LayoutOptions::default();
        let recipe = ring_recipe(4);
        let blocked = expected_vertex(&config, &options, 4, 2);
        let (nodes, junctions, skipped) = run_ring(&recipe, |ctx| ctx.guard.register(blocked));

        assert_eq!(skipped, 1);
        assert_eq!(nodes.len(), recipe.len() + junctions - skipped);
        let mut indices: Vec<usize> = nodes.iter().filter_map(|n| n.ring_index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 3]);
        assert!(nodes.iter().all(|n| n.position().distance(blocked) > 1.0));
    }
}
