//! Corner and slot assignment
//!
//! Ingredients are placed in a fixed phase order. Within a phase they are
//! grouped by the spirit they attach to and their type, and each group is
//! planned into corner claims right before it is placed, so later groups see
//! the corners earlier ones took.

use std::fmt;
use tracing::{debug, span, trace, Level};

use super::context::LayoutContext;
use super::spirits::SpiritTemplate;
use crate::core::IngredientType;

/// Placement phase, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Acid,
    Sweet,
    Bitter,
    Garnish,
    /// Dilution, dairy, salt, egg and anything unclassified
    Remainder,
}

impl Phase {
    /// Phases in the order they run, after spirits and rings
    pub const ORDER: [Phase; 5] = [
        Phase::Acid,
        Phase::Sweet,
        Phase::Bitter,
        Phase::Garnish,
        Phase::Remainder,
    ];

    /// Phase that places ingredients of `kind`
    pub fn for_kind(kind: IngredientType) -> Self {
        match kind {
            IngredientType::Acid => Phase::Acid,
            IngredientType::Sweet => Phase::Sweet,
            IngredientType::Bitter => Phase::Bitter,
            IngredientType::Garnish => Phase::Garnish,
            _ => Phase::Remainder,
        }
    }

    /// Corner preference before rotation compensation
    ///
    /// Acids face east, sweets north-east, bitters west, garnishes
    /// north-west and everything else south.
    pub fn preferred_corners(&self) -> &'static [usize] {
        match self {
            Phase::Acid => &[0, 1, 5, 2, 4, 3],
            Phase::Sweet => &[5, 0, 4, 1, 3, 2],
            Phase::Bitter => &[3, 2, 4, 1, 5, 0],
            Phase::Garnish => &[4, 5, 2, 3, 1, 0],
            Phase::Remainder => &[1, 2, 0, 3, 5, 4],
        }
    }

    /// Column in the anchor-spirit table; None for the round-robined remainder
    fn anchor_column(&self) -> Option<usize> {
        match self {
            Phase::Acid => Some(0),
            Phase::Sweet => Some(1),
            Phase::Bitter => Some(2),
            Phase::Garnish => Some(3),
            Phase::Remainder => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Acid => "acid",
            Phase::Sweet => "sweet",
            Phase::Bitter => "bitter",
            Phase::Garnish => "garnish",
            Phase::Remainder => "remainder",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spirit each phase attaches to, per template: [acid, sweet, bitter, garnish]
///
/// Pairs bias acids and sweets to the top spirit and bitters and garnishes to
/// the bottom one. Triangles and vees send acids and sweets to the upper right
/// spirit. Rhombi send each phase to the spirit whose open corners face its
/// way. Stacks pin one phase per spirit.
const ANCHOR_TABLE: &[(SpiritTemplate, [usize; 4])] = &[
    (SpiritTemplate::Single, [0, 0, 0, 0]),
    (SpiritTemplate::Pair, [0, 0, 1, 1]),
    (SpiritTemplate::Triangle, [2, 2, 0, 0]),
    (SpiritTemplate::Vee, [2, 2, 1, 1]),
    (SpiritTemplate::Rhombus, [3, 1, 0, 2]),
    (SpiritTemplate::Stack, [0, 1, 2, 3]),
];

/// Spirit index a phase attaches to
///
/// `ordinal` is the item's position among the phase's items and only matters
/// for the remainder, which is round-robined across spirits.
pub fn anchor_spirit(
    template: SpiritTemplate,
    phase: Phase,
    spirit_count: usize,
    ordinal: usize,
) -> usize {
    let count = spirit_count.max(1);
    let Some(column) = phase.anchor_column() else {
        return ordinal % count;
    };
    ANCHOR_TABLE
        .iter()
        .find(|(t, _)| *t == template)
        .map(|(_, row)| row[column])
        .unwrap_or(0)
        % count
}

/// Where a plan's branches attach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotTarget {
    /// Claim a new corner at placement time
    Fresh,
    /// Fork off a junction an earlier phase reserved a branch on
    Join { corner: usize },
}

/// One corner's worth of placements
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CornerPlan {
    pub target: SlotTarget,
    /// Each branch lists input indices in chain order
    pub branches: Vec<Vec<usize>>,
    /// Extra branches a later phase will add at the same corner
    pub reserve: usize,
}

impl CornerPlan {
    fn fresh(branches: Vec<Vec<usize>>) -> Self {
        Self {
            target: SlotTarget::Fresh,
            branches,
            reserve: 0,
        }
    }

    /// Total outgoing branches the corner will carry
    pub fn fan_out(&self) -> usize {
        self.branches.len() + self.reserve
    }
}

/// Branches a terminal group may fan out into at one corner
const MAX_TERMINAL_BRANCHES: usize = 2;

impl LayoutContext<'_> {
    /// Place every unplaced ingredient belonging to `phase`
    pub(crate) fn run_phase(&mut self, phase: Phase) {
        let items: Vec<usize> = (0..self.ingredients.len())
            .filter(|&i| !self.placed[i])
            .filter(|&i| self.ingredients[i].kind != IngredientType::Spirit)
            .filter(|&i| Phase::for_kind(self.ingredients[i].kind) == phase)
            .collect();
        if items.is_empty() {
            return;
        }

        let phase_span = span!(Level::DEBUG, "layout_phase", %phase, item_count = items.len());
        let _enter = phase_span.enter();

        let mut groups: Vec<((usize, IngredientType), Vec<usize>)> = Vec::new();
        for (ordinal, &index) in items.iter().enumerate() {
            let spirit = anchor_spirit(self.template, phase, self.spirits.len(), ordinal);
            let key = (spirit, self.ingredients[index].kind);
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(index),
                None => groups.push((key, vec![index])),
            }
        }
        debug!(group_count = groups.len(), "Grouped phase items");

        for ((spirit, kind), members) in groups {
            let reserve_sweet = phase == Phase::Acid && self.sweet_pending_on(spirit);
            let plans = self.plan_group(spirit, kind, phase, &members, reserve_sweet);
            trace!(spirit, %kind, plan_count = plans.len(), "Planned group");
            for plan in plans {
                self.place_plan(spirit, kind, phase, plan);
            }
        }
    }

    /// True if unplaced sweets will attach to `spirit`
    fn sweet_pending_on(&self, spirit: usize) -> bool {
        let sweets_left = self
            .ingredients
            .iter()
            .enumerate()
            .any(|(i, ing)| ing.kind == IngredientType::Sweet && !self.placed[i]);
        sweets_left && anchor_spirit(self.template, Phase::Sweet, self.spirits.len(), 0) == spirit
    }

    /// Split one (spirit, type) group into corner plans
    pub(crate) fn plan_group(
        &self,
        spirit: usize,
        kind: IngredientType,
        phase: Phase,
        members: &[usize],
        reserve_sweet: bool,
    ) -> Vec<CornerPlan> {
        let max_chain = self.config.max_chain_length.max(1);
        let mut plans = Vec::new();
        let mut rest = members;

        if phase == Phase::Sweet {
            let reserved = self
                .corners
                .iter()
                .find(|((s, _), state)| *s == spirit && state.reserved_branches > 0 && state.junction.is_some())
                .map(|((_, corner), _)| *corner);
            if let Some(corner) = reserved {
                let take = max_chain.min(rest.len());
                plans.push(CornerPlan {
                    target: SlotTarget::Join { corner },
                    branches: vec![rest[..take].to_vec()],
                    reserve: 0,
                });
                rest = &rest[take..];
            }
        }

        if kind.is_inline() {
            plans.extend(rest.chunks(max_chain).map(|chunk| CornerPlan::fresh(vec![chunk.to_vec()])));
        } else {
            // A corner takes its full share before the next one is claimed
            for chunk in rest.chunks(MAX_TERMINAL_BRANCHES * max_chain) {
                let mut branches: Vec<Vec<usize>> = Vec::new();
                for (j, &item) in chunk.iter().enumerate() {
                    match branches.get_mut(j % MAX_TERMINAL_BRANCHES) {
                        Some(branch) => branch.push(item),
                        None => branches.push(vec![item]),
                    }
                }
                plans.push(CornerPlan::fresh(branches));
            }
        }

        if reserve_sweet {
            if let Some(first) = plans.iter_mut().find(|p| p.target == SlotTarget::Fresh) {
                first.reserve = 1;
            }
        }
        plans
    }

    /// Claim the best free corner of `spirit` for a preference list
    ///
    /// Corners whose anchor point is already crowded are passed over while a
    /// clear one exists.
    pub(crate) fn claim_corner(&mut self, spirit: usize, preferred: &[usize]) -> Option<usize> {
        let free = self.free_corners(spirit, preferred);
        let corner = free
            .iter()
            .copied()
            .find(|&c| self.guard.is_clear(self.corner_anchor(spirit, c)))
            .or_else(|| free.first().copied())?;
        self.corners.entry((spirit, corner)).or_default();
        debug!(spirit, corner, "Claimed corner");
        Some(corner)
    }
}
