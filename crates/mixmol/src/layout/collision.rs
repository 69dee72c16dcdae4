//! Collision guard and bounds clamp

use tracing::trace;

use crate::core::{LayoutOptions, MoleculeNode, Point};

/// Registry of committed visible positions
///
/// Junctions are never registered since nothing is drawn at them.
#[derive(Debug, Clone)]
pub struct CollisionGuard {
    min_distance: f64,
    points: Vec<Point>,
}

impl CollisionGuard {
    pub fn new(min_distance: f64) -> Self {
        Self {
            min_distance,
            points: Vec::new(),
        }
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Returns true if `point` keeps the minimum distance to every registered point
    pub fn is_clear(&self, point: Point) -> bool {
        self.points
            .iter()
            .all(|p| p.distance(point) >= self.min_distance)
    }

    /// Register `point` if it is clear; returns whether it was accepted
    pub fn try_register(&mut self, point: Point) -> bool {
        if self.is_clear(point) {
            self.points.push(point);
            true
        } else {
            trace!(x = point.x, y = point.y, "Rejected colliding position");
            false
        }
    }

    /// Register `point` unconditionally
    pub fn register(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// Clamp every node into the padded canvas rectangle
pub fn clamp_to_bounds(nodes: &mut [MoleculeNode], options: &LayoutOptions) {
    for node in nodes.iter_mut() {
        let clamped = options.clamp(node.position());
        if clamped != node.position() {
            trace!(id = %node.id, x = node.x, y = node.y, "Clamped node into canvas");
        }
        node.x = clamped.x;
        node.y = clamped.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IngredientType;

    fn node_at(x: f64, y: f64) -> MoleculeNode {
        MoleculeNode {
            id: "n".to_string(),
            kind: IngredientType::Other,
            x,
            y,
            radius: 10.0,
            label: String::new(),
            sublabel: None,
            color: String::new(),
            parent_id: None,
            is_inline: false,
            outgoing_angle: 0.0,
            ring_id: None,
            ring_index: None,
            ring_size: None,
        }
    }

    #[test]
    fn test_rejects_close_points() {
        let mut guard = CollisionGuard::new(10.0);
        assert!(guard.try_register(Point::new(0.0, 0.0)));
        assert!(!guard.try_register(Point::new(5.0, 5.0)));
        assert!(guard.try_register(Point::new(10.0, 0.0)));
        assert_eq!(guard.len(), 2);
    }

    #[test]
    fn test_forced_registration() {
        let mut guard = CollisionGuard::new(10.0);
        guard.register(Point::new(0.0, 0.0));
        guard.register(Point::new(1.0, 0.0));
        assert_eq!(guard.len(), 2);
        assert!(!guard.is_clear(Point::new(2.0, 0.0)));
    }

    #[test]
    fn test_empty_guard_accepts_anything() {
        let guard = CollisionGuard::new(1000.0);
        assert!(guard.is_empty());
        assert!(guard.is_clear(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let options = LayoutOptions::default();
        let mut nodes = vec![node_at(-5.0, 150.0), node_at(200.0, 999.0), node_at(100.0, 100.0)];
        clamp_to_bounds(&mut nodes, &options);
        assert_eq!((nodes[0].x, nodes[0].y), (20.0, 150.0));
        assert_eq!((nodes[1].x, nodes[1].y), (200.0, 280.0));
        assert_eq!((nodes[2].x, nodes[2].y), (100.0, 100.0));
        assert_eq!(nodes.len(), 3);
    }
}
