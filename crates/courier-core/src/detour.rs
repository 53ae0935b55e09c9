//! Greedy single-parcel detour evaluation.
//!
//! While carrying, the agent may grab one more parcel on the way to the
//! delivery tile if the extra travel is worth it. The evaluation is a
//! greedy heuristic over single parcels -- no combinatorial search over
//! detour chains.
//!
//! A candidate survives three gates before scoring:
//!
//! 1. cheap pre-filter: uncarried, reward strictly above
//!    `delivery_threshold`, heuristic distance from the agent within
//!    `max_detour_distance`;
//! 2. reachability: both route legs (agent -> parcel, parcel -> delivery)
//!    must exist;
//! 3. allowance: `added_steps` (two-leg total minus the direct route)
//!    must not exceed `max_detour_distance`.
//!
//! Survivors are scored `reward / (added_steps + 1)`; the maximum wins and
//! ties keep the first candidate encountered. The whole evaluation is pure
//! with respect to strategy state.

use courier_types::{Cell, ParcelRecord};
use tracing::debug;

use crate::config::StrategyConfig;
use crate::contract::{Router, WorldView};

/// A detour parcel that survived evaluation, with its cost and score.
#[derive(Debug, Clone)]
pub struct DetourCandidate {
    /// The parcel to pick up.
    pub parcel: ParcelRecord,
    /// Extra route steps the detour adds over direct delivery.
    pub added_steps: u32,
    /// `reward / (added_steps + 1)`.
    pub score: f64,
}

/// Route length in moves, or `None` when the goal is unreachable.
///
/// An empty route only signals unreachability when the endpoints differ;
/// `from == to` is a valid zero-move route.
fn route_len<R: Router>(router: &R, from: Cell, to: Cell) -> Option<u32> {
    let steps = router.find_path(from, to).len();
    if steps == 0 && from != to {
        return None;
    }
    u32::try_from(steps).ok()
}

/// Evaluate all known parcels as detour candidates and return the best one.
///
/// Returns `None` when the agent's position is unknown, when no delivery
/// tile exists or is reachable (no detour should be attempted if delivery
/// itself is impossible), or when no candidate survives the gates.
pub fn evaluate_detour_parcels<W: WorldView, R: Router>(
    world: &W,
    router: &R,
    config: &StrategyConfig,
) -> Option<DetourCandidate> {
    let origin = world.my_position()?.cell();
    let delivery = world.closest_delivery_tile(origin)?;
    let base_steps = route_len(router, origin, delivery)?;

    let mut best: Option<DetourCandidate> = None;

    for parcel in world.available_parcels() {
        if parcel.reward <= config.delivery_threshold {
            continue;
        }
        let parcel_cell = parcel.position.cell();
        if world.heuristic_distance(origin, parcel_cell) > config.max_detour_distance {
            continue;
        }

        let Some(to_parcel) = route_len(router, origin, parcel_cell) else {
            continue;
        };
        let Some(to_delivery) = route_len(router, parcel_cell, delivery) else {
            continue;
        };

        let added_steps = to_parcel
            .saturating_add(to_delivery)
            .saturating_sub(base_steps);
        if added_steps > config.max_detour_distance {
            continue;
        }

        let score = f64::from(parcel.reward) / f64::from(added_steps.saturating_add(1));
        debug!(
            stage = "detour_considered",
            parcel = %parcel.id,
            reward = parcel.reward,
            added_steps,
            score,
            "detour candidate scored"
        );

        // Strict comparison keeps the first candidate on ties.
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(DetourCandidate {
                parcel,
                added_steps,
                score,
            });
        }
    }

    best
}
