//! Chain and junction placement
//!
//! A corner carrying one branch bonds its first node straight to the spirit.
//! A corner carrying several gets an invisible junction first; branch `b`
//! leaves it at `radial ± offset`, positive for even `b`, and the offset
//! widens for every further pair. Chains then zig-zag outward around the
//! axis their head points along. A branch that left on the negative side
//! flips the zig-zag parity so every chain turns the same way.

use tracing::{debug, warn};

use super::context::{BranchState, CornerState, LayoutContext};
use super::corners::{CornerPlan, Phase, SlotTarget};
use crate::core::{corner_angle, extend_from_vertex, IngredientType, Point};

impl LayoutContext<'_> {
    /// Anchor point of a corner: where a junction or a direct first node goes
    pub(crate) fn corner_anchor(&self, spirit: usize, corner: usize) -> Point {
        extend_from_vertex(
            self.spirit_position(spirit),
            self.config.hex_radius,
            corner,
            self.config.bond_length,
        )
    }

    /// Branch offset angle in radians
    ///
    /// Acids and sweets take the narrow hexagonal angle since chains run
    /// through them; everything else takes the wide tetrahedral one.
    pub(crate) fn branch_angle(&self, kind: IngredientType) -> f64 {
        match kind {
            IngredientType::Acid | IngredientType::Sweet => {
                self.config.inline_branch_angle_deg.to_radians()
            }
            _ => self.config.terminal_branch_angle_deg.to_radians(),
        }
    }

    pub(crate) fn place_plan(
        &mut self,
        spirit: usize,
        kind: IngredientType,
        phase: Phase,
        plan: CornerPlan,
    ) {
        match plan.target {
            SlotTarget::Join { corner } => {
                if let Some(state) = self.corners.get_mut(&(spirit, corner)) {
                    state.reserved_branches = state.reserved_branches.saturating_sub(1);
                }
                debug!(spirit, corner, "Joining reserved junction");
                for branch in &plan.branches {
                    self.start_branch(spirit, corner, kind, branch);
                }
            }
            SlotTarget::Fresh => match self.claim_corner(spirit, phase.preferred_corners()) {
                Some(corner) => {
                    self.open_corner(spirit, corner, plan.fan_out() > 1, plan.reserve);
                    for branch in &plan.branches {
                        self.start_branch(spirit, corner, kind, branch);
                    }
                }
                None => {
                    warn!(spirit, %kind, "No free corner left, chaining at a used one");
                    for &item in plan.branches.iter().flatten() {
                        self.place_exhausted(spirit, kind, phase, item);
                    }
                }
            },
        }
    }

    /// Prepare a claimed corner, creating its junction when it forks
    pub(crate) fn open_corner(&mut self, spirit: usize, corner: usize, fork: bool, reserve: usize) {
        let has_junction = self
            .corners
            .get(&(spirit, corner))
            .is_some_and(|state| state.junction.is_some());

        let junction = if fork && !has_junction {
            let position = self.corner_anchor(spirit, corner);
            let parent = self.spirit_id(spirit);
            let node = self
                .factory
                .junction_node(position, parent, corner_angle(corner));
            debug!(spirit, corner, id = %node.id, "Created junction");
            Some(self.push_node(node))
        } else {
            None
        };

        let state = self.corners.entry((spirit, corner)).or_default();
        if junction.is_some() {
            state.junction = junction;
        }
        state.reserved_branches += reserve;
    }

    /// Start a new branch at a corner and chain the rest of `items` onto it
    pub(crate) fn start_branch(
        &mut self,
        spirit: usize,
        corner: usize,
        kind: IngredientType,
        items: &[usize],
    ) {
        let Some((&head, rest)) = items.split_first() else {
            return;
        };
        let state = self.corners.get(&(spirit, corner)).cloned().unwrap_or_default();
        let branch = state.branches.len();

        if state.junction.is_none() && branch > 0 {
            for &item in items {
                self.extend_branch(spirit, corner, branch - 1, kind, item);
            }
            return;
        }

        let sign = if branch % 2 == 0 { 1.0 } else { -1.0 };
        let theta = corner_angle(corner);
        let alpha = self.branch_angle(kind);
        let bond = self.config.bond_length;

        let (position, parent, outgoing) = match state.junction {
            Some(junction) => {
                let origin = self.nodes[junction].position();
                let magnitude = alpha * (branch / 2 + 1) as f64;
                let angle = theta + sign * magnitude;
                let candidates = [
                    origin.offset(angle, bond),
                    origin.offset(theta - sign * magnitude, bond),
                    origin.offset(theta, bond),
                    origin.offset(theta + 2.0 * alpha, bond),
                    origin.offset(theta - 2.0 * alpha, bond),
                    origin.offset(angle, bond * 1.5),
                ];
                let position = self.choose_position(&candidates, head);
                (position, Some(self.node_id(junction)), origin.angle_to(position))
            }
            None => {
                let center = self.spirit_position(spirit);
                let reach = self.config.hex_radius + bond;
                let nudge = 15f64.to_radians();
                let candidates = [
                    self.corner_anchor(spirit, corner),
                    center.offset(theta, self.config.hex_radius + bond * 1.5),
                    center.offset(theta, self.config.hex_radius + bond * 2.0),
                    center.offset(theta + nudge, reach),
                    center.offset(theta - nudge, reach),
                ];
                let position = self.choose_position(&candidates, head);
                (position, self.spirit_id(spirit), center.angle_to(position))
            }
        };

        let node = self
            .factory
            .ingredient_node(head, &self.ingredients[head], position, parent, outgoing);
        let tail = self.push_node(node);
        self.placed[head] = true;

        self.corners
            .entry((spirit, corner))
            .or_default()
            .branches
            .push(BranchState {
                sign,
                tail,
                length: 1,
            });
        self.active_chains.insert((spirit, kind), (corner, branch));

        for &item in rest {
            self.extend_branch(spirit, corner, branch, kind, item);
        }
    }

    /// Add one link to the end of a branch
    pub(crate) fn extend_branch(
        &mut self,
        spirit: usize,
        corner: usize,
        branch: usize,
        kind: IngredientType,
        item: usize,
    ) {
        let Some(state) = self
            .corners
            .get(&(spirit, corner))
            .and_then(|c| c.branches.get(branch))
            .copied()
        else {
            self.start_branch(spirit, corner, kind, &[item]);
            return;
        };

        if state.length >= self.config.max_chain_length {
            debug!(spirit, corner, branch, length = state.length, "Chaining past maximum length");
        }

        let previous = &self.nodes[state.tail];
        let origin = previous.position();
        let axis = previous.outgoing_angle;
        let parent = previous.id.clone();

        let step = if state.length % 2 == 1 { 1.0 } else { -1.0 };
        let turn = state.sign * step * self.branch_angle(kind);
        let bond = self.config.chain_bond_length;
        let candidates = [
            origin.offset(axis + turn, bond),
            origin.offset(axis - turn, bond),
            origin.offset(axis, bond),
            origin.offset(axis + 2.0 * turn, bond),
            origin.offset(axis - 2.0 * turn, bond),
            origin.offset(axis + turn, bond * 1.5),
        ];
        let position = self.choose_position(&candidates, item);

        let node = self
            .factory
            .ingredient_node(item, &self.ingredients[item], position, Some(parent), axis);
        let tail = self.push_node(node);
        self.placed[item] = true;

        if let Some(b) = self
            .corners
            .get_mut(&(spirit, corner))
            .and_then(|c| c.branches.get_mut(branch))
        {
            b.tail = tail;
            b.length += 1;
        }
        self.active_chains.insert((spirit, kind), (corner, branch));
    }

    /// Place an item after every preferred corner is taken
    ///
    /// Keeps growing the group's current chain; without one, falls back to
    /// the first preferred corner whether or not it is in use.
    fn place_exhausted(&mut self, spirit: usize, kind: IngredientType, phase: Phase, item: usize) {
        if let Some(&(corner, branch)) = self.active_chains.get(&(spirit, kind)) {
            self.extend_branch(spirit, corner, branch, kind, item);
            return;
        }

        let corner = self
            .rotation
            .shift(phase.preferred_corners())
            .first()
            .copied()
            .unwrap_or(0);
        let last_branch = self
            .corners
            .get(&(spirit, corner))
            .and_then(|state: &CornerState| state.branches.len().checked_sub(1));
        match last_branch {
            Some(branch) => self.extend_branch(spirit, corner, branch, kind, item),
            None => {
                self.open_corner(spirit, corner, false, 0);
                self.start_branch(spirit, corner, kind, &[item]);
            }
        }
    }

    /// First clear candidate, registered with the guard; the first one when none is clear
    fn choose_position(&mut self, candidates: &[Point], item: usize) -> Point {
        if let Some(&position) = candidates.iter().find(|&&p| self.guard.is_clear(p)) {
            self.guard.register(position);
            return position;
        }
        let position = candidates
            .first()
            .copied()
            .unwrap_or_else(|| self.options.center());
        let hint = self.ingredients[item].name.clone();
        self.commit_position(position, &hint);
        position
    }
}
