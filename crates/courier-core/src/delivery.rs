//! The delivery decision engine.
//!
//! [`DeliveryStrategy`] is invoked once per turn while the agent carries
//! parcels. Each call returns exactly one [`Action`]; inaction is the
//! explicit [`Action::Wait`]. The strategy owns three pieces of state
//! between turns: the carried-parcel set, the committed route, and the
//! blocking counter.
//!
//! Decision order per turn:
//!
//! 1. nothing carried, or own position unknown -> wait;
//! 2. standing on a delivery tile -> put down (highest priority);
//! 3. a detour parcel selected -> pick it up if co-located, else route
//!    toward it;
//! 4. otherwise route toward the nearest delivery tile.
//!
//! Routes are consumed from the front one cell per turn and recomputed
//! lazily: only when the committed route is empty or no longer ends at the
//! current target. When the next cell is occupied by another agent, the
//! strategy waits; after `blocked_timeout` consecutive turns stuck on the
//! same cell it abandons the route so the next turn replans from scratch.
//!
//! Nothing here returns an error: every anomaly (no delivery tile, an
//! unreachable target, an unresolvable step) degrades to a wait plus local
//! state cleanup, so the agent never crashes on missing data.

use std::collections::VecDeque;

use courier_types::{Action, AgentId, Cell, ParcelRecord};
use tracing::debug;

use crate::config::StrategyConfig;
use crate::contract::{Router, WorldView};
use crate::detour::evaluate_detour_parcels;

/// Consecutive-turn blocking tracker.
///
/// Lives beside the committed route and is reset whenever the route is
/// empty, cleared, or the next cell is free again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockState {
    /// The route cell another agent was last seen standing on.
    pub blocked_tile: Option<Cell>,
    /// Consecutive turns that same cell has been occupied.
    pub blocked_turns: u32,
}

impl BlockState {
    /// Forget any tracked blockage.
    pub const fn reset(&mut self) {
        self.blocked_tile = None;
        self.blocked_turns = 0;
    }
}

/// Whether a committed route ends at the given target cell.
///
/// An empty route leads nowhere.
pub fn is_path_leading_to(path: &VecDeque<Cell>, target: Cell) -> bool {
    path.back().is_some_and(|&last| last == target)
}

/// The per-turn decision engine for delivering carried parcels.
#[derive(Debug, Clone)]
pub struct DeliveryStrategy {
    /// Tuning constants, fixed for the lifetime of the strategy.
    config: StrategyConfig,
    /// Parcels currently carried by this agent, recomputed every turn.
    carried: Vec<ParcelRecord>,
    /// The committed route, consumed from the front.
    path: VecDeque<Cell>,
    /// Blocking tracker for the front of the route.
    block: BlockState,
}

impl DeliveryStrategy {
    /// Create a strategy with the given tuning constants.
    pub const fn new(config: StrategyConfig) -> Self {
        Self {
            config,
            carried: Vec::new(),
            path: VecDeque::new(),
            block: BlockState {
                blocked_tile: None,
                blocked_turns: 0,
            },
        }
    }

    /// Parcels currently believed to be carried by this agent.
    pub fn carried(&self) -> &[ParcelRecord] {
        &self.carried
    }

    /// Whether the agent has anything to deliver.
    pub fn should_deliver(&self) -> bool {
        !self.carried.is_empty()
    }

    /// Recompute the carried set from the latest global parcel list.
    ///
    /// Called by the runtime at the start of every turn, before
    /// [`delivery_action`]. When the carried set just became empty while a
    /// route was committed (the last parcel was delivered), the route and
    /// blocking state are cleared -- the old target is no longer relevant.
    ///
    /// [`delivery_action`]: DeliveryStrategy::delivery_action
    pub fn update_carried_parcels(
        &mut self,
        my_id: Option<AgentId>,
        all_parcels: &[ParcelRecord],
    ) {
        let was_carrying = !self.carried.is_empty();
        self.carried = my_id.map_or_else(Vec::new, |id| {
            all_parcels
                .iter()
                .filter(|p| p.carried_by == Some(id))
                .cloned()
                .collect()
        });

        if was_carrying && self.carried.is_empty() && !self.path.is_empty() {
            debug!(
                stage = "path_cleared",
                reason = "all_delivered",
                "carried set emptied, dropping committed route"
            );
            self.clear_path();
        }
    }

    /// Decide this turn's action. Called at most once per turn.
    pub fn delivery_action<W: WorldView, R: Router>(&mut self, world: &W, router: &R) -> Action {
        if !self.should_deliver() {
            return Action::Wait;
        }
        let Some(position) = world.my_position() else {
            return Action::Wait;
        };
        let origin = position.cell();

        // Standing on a delivery tile beats any pending detour or route.
        if world.is_delivery_tile(origin) {
            debug!(
                stage = "putdown",
                cell = %origin,
                carried = self.carried.len(),
                "depositing carried parcels"
            );
            self.clear_path();
            return Action::Putdown;
        }

        if let Some(candidate) = evaluate_detour_parcels(world, router, &self.config) {
            let target = candidate.parcel.position.cell();
            if origin == target {
                debug!(
                    stage = "pickup",
                    parcel = %candidate.parcel.id,
                    "standing on detour parcel"
                );
                return Action::Pickup {
                    parcel: candidate.parcel.id,
                };
            }
            self.ensure_path_to(router, origin, target);
            return self.follow_delivery_path(world, router, origin);
        }

        let Some(delivery) = world.closest_delivery_tile(origin) else {
            debug!(
                stage = "path_cleared",
                reason = "no_delivery_tile",
                "nowhere to deliver"
            );
            self.clear_path();
            return Action::Wait;
        };
        self.ensure_path_to(router, origin, delivery);
        self.follow_delivery_path(world, router, origin)
    }

    /// Recompute the committed route only when it does not already lead
    /// to `target` (an empty route never does).
    fn ensure_path_to<R: Router>(&mut self, router: &R, origin: Cell, target: Cell) {
        if is_path_leading_to(&self.path, target) {
            return;
        }
        self.path = router.find_path(origin, target).into();
        debug!(
            stage = "path_recalculated",
            target = %target,
            steps = self.path.len(),
            "committed a new route"
        );
    }

    /// Advance along the committed route by one cell, or wait.
    ///
    /// State machine over the blocking tracker, re-evaluated every call
    /// with the current front of the route as the target cell.
    fn follow_delivery_path<W: WorldView, R: Router>(
        &mut self,
        world: &W,
        router: &R,
        origin: Cell,
    ) -> Action {
        let Some(&target) = self.path.front() else {
            self.block.reset();
            return Action::Wait;
        };

        let my_id = world.my_id();
        let occupied = world
            .agents()
            .iter()
            .any(|agent| my_id != Some(agent.id) && agent.position.cell() == target);

        if occupied {
            if self.block.blocked_tile == Some(target) {
                self.block.blocked_turns = self.block.blocked_turns.saturating_add(1);
                if self.block.blocked_turns >= self.config.blocked_timeout {
                    debug!(
                        stage = "path_cleared",
                        reason = "blocked_timeout",
                        tile = %target,
                        blocked_turns = self.block.blocked_turns,
                        "abandoning blocked route"
                    );
                    self.clear_path();
                    return Action::Wait;
                }
                debug!(
                    stage = "blocked",
                    tile = %target,
                    blocked_turns = self.block.blocked_turns,
                    "next cell still occupied"
                );
                return Action::Wait;
            }
            self.block.blocked_tile = Some(target);
            self.block.blocked_turns = 1;
            debug!(stage = "blocked", tile = %target, blocked_turns = 1u32, "next cell occupied");
            return Action::Wait;
        }

        self.block.reset();
        match router.step_action(origin, target) {
            Some(direction) => {
                self.path.pop_front();
                Action::Move { direction }
            }
            None => {
                debug!(
                    stage = "path_cleared",
                    reason = "step_unresolvable",
                    from = %origin,
                    to = %target,
                    "cannot resolve a move onto the next cell"
                );
                self.clear_path();
                Action::Wait
            }
        }
    }

    /// Drop the committed route and forget any tracked blockage.
    fn clear_path(&mut self) {
        self.path.clear();
        self.block.reset();
    }
}
