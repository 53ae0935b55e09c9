//! The simulated turn loop.
//!
//! Drives one courier episode: each turn the ground truth is mirrored into
//! the belief store, the decision engine (or the acquisition glue, while
//! nothing is carried) produces exactly one action, the action is applied
//! to the simulated world, and the wanderers take their scripted steps.
//!
//! The acquisition glue is runtime behavior, not part of the delivery
//! strategy: the strategy only ever decides while the agent carries
//! parcels, so something outside it has to collect the first one.

use chrono::Utc;
use courier_core::{DeliveryStrategy, Router, WorldView};
use courier_types::{Action, AgentId, AgentRecord, Direction, ParcelRecord, Position, TurnRecord};
use courier_world::{BeliefState, GridMap, GridRouter};
use tracing::{info, warn};

use crate::scenario::{Scenario, TurnRng};

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Every parcel was delivered.
    AllDelivered,
    /// The configured turn limit was reached.
    MaxTurnsReached,
}

/// Result of one episode.
#[derive(Debug)]
pub struct EpisodeResult {
    /// Why the episode ended.
    pub end_reason: EndReason,
    /// Number of turns executed.
    pub turns_executed: u64,
    /// Number of parcels delivered.
    pub parcels_delivered: usize,
    /// Total reward banked by deliveries.
    pub total_reward: u64,
    /// Per-turn decision records, in turn order.
    pub records: Vec<TurnRecord>,
}

/// Ground-truth world state for the simulated episode.
#[derive(Debug, Clone)]
pub struct SimState {
    /// The static grid.
    pub map: GridMap,
    /// The courier's id.
    pub courier_id: AgentId,
    /// The courier's true position.
    pub courier_pos: Position,
    /// Scripted agents and their true positions.
    pub wanderers: Vec<AgentRecord>,
    /// Undelivered parcels (free or carried).
    pub parcels: Vec<ParcelRecord>,
    /// Reward banked so far.
    pub total_reward: u64,
    /// Parcels delivered so far.
    pub parcels_delivered: usize,
    /// Generator driving wanderer movement.
    rng: TurnRng,
}

impl SimState {
    /// Build ground truth from a generated scenario and a movement seed.
    pub fn from_scenario(scenario: Scenario, seed: u64) -> Self {
        Self {
            map: scenario.map,
            courier_id: scenario.courier.id,
            courier_pos: scenario.courier.position,
            wanderers: scenario.wanderers,
            parcels: scenario.parcels,
            total_reward: 0,
            parcels_delivered: 0,
            rng: TurnRng::new(seed),
        }
    }
}

/// Run one episode to completion.
///
/// Stops when every parcel has been delivered or after `max_turns` turns.
/// A positive `turn_interval_ms` paces the loop in real time; zero runs it
/// flat out (used by tests).
pub async fn run_episode(
    state: &mut SimState,
    beliefs: &mut BeliefState,
    strategy: &mut DeliveryStrategy,
    max_turns: u64,
    turn_interval_ms: u64,
) -> EpisodeResult {
    let mut records = Vec::new();
    let mut turns_executed: u64 = 0;

    for turn in 1..=max_turns {
        turns_executed = turn;

        // Mirror ground truth into the belief store.
        beliefs.observe_self(state.courier_id, state.courier_pos);
        beliefs.observe_agents(state.wanderers.clone());
        beliefs.observe_parcels(state.parcels.clone());

        strategy.update_carried_parcels(Some(state.courier_id), &state.parcels);

        let action = {
            let router = GridRouter::new(&state.map);
            if strategy.should_deliver() {
                strategy.delivery_action(&*beliefs, &router)
            } else {
                acquisition_action(&*beliefs, &router)
            }
        };

        apply_action(state, action);
        step_wanderers(state);

        info!(turn, action = ?action, courier = %state.courier_pos.cell(), "turn resolved");
        records.push(TurnRecord {
            turn,
            agent: state.courier_id,
            action,
            decided_at: Utc::now(),
        });

        if state.parcels.is_empty() {
            return EpisodeResult {
                end_reason: EndReason::AllDelivered,
                turns_executed,
                parcels_delivered: state.parcels_delivered,
                total_reward: state.total_reward,
                records,
            };
        }

        if turn_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(turn_interval_ms)).await;
        }
    }

    EpisodeResult {
        end_reason: EndReason::MaxTurnsReached,
        turns_executed,
        parcels_delivered: state.parcels_delivered,
        total_reward: state.total_reward,
        records,
    }
}

/// Runtime glue used while nothing is carried: walk to the nearest free
/// parcel and pick it up.
fn acquisition_action<W: WorldView, R: Router>(world: &W, router: &R) -> Action {
    let Some(position) = world.my_position() else {
        return Action::Wait;
    };
    let origin = position.cell();

    let target = world
        .available_parcels()
        .into_iter()
        .min_by_key(|p| (world.heuristic_distance(origin, p.position.cell()), p.id));
    let Some(parcel) = target else {
        return Action::Wait;
    };

    let parcel_cell = parcel.position.cell();
    if origin == parcel_cell {
        return Action::Pickup { parcel: parcel.id };
    }

    let path = router.find_path(origin, parcel_cell);
    let Some(&next) = path.first() else {
        return Action::Wait;
    };
    router
        .step_action(origin, next)
        .map_or(Action::Wait, |direction| Action::Move { direction })
}

/// Apply the courier's action to ground truth.
fn apply_action(state: &mut SimState, action: Action) {
    let origin = state.courier_pos.cell();
    match action {
        Action::Wait => {}
        Action::Move { direction } => {
            let Some(next) = direction.apply(origin) else {
                return;
            };
            let occupied = state
                .wanderers
                .iter()
                .any(|w| w.position.cell() == next);
            if state.map.is_walkable(next) && !occupied {
                state.courier_pos = Position::from(next);
            } else {
                warn!(from = %origin, to = %next, "move rejected by ground truth");
            }
        }
        Action::Pickup { parcel } => {
            let courier = state.courier_id;
            let matched = state.parcels.iter_mut().find(|p| {
                p.id == parcel && p.is_available() && p.position.cell() == origin
            });
            if let Some(p) = matched {
                p.carried_by = Some(courier);
            } else {
                warn!(parcel = %parcel, "pickup rejected by ground truth");
            }
        }
        Action::Putdown => {
            if !state.map.is_delivery_tile(origin) {
                warn!(cell = %origin, "putdown outside a delivery tile");
                return;
            }
            let courier = state.courier_id;
            let mut delivered_reward: u64 = 0;
            let mut delivered_count: usize = 0;
            state.parcels.retain(|p| {
                if p.carried_by == Some(courier) {
                    delivered_reward = delivered_reward.saturating_add(u64::from(p.reward));
                    delivered_count = delivered_count.saturating_add(1);
                    false
                } else {
                    true
                }
            });
            state.total_reward = state.total_reward.saturating_add(delivered_reward);
            state.parcels_delivered = state.parcels_delivered.saturating_add(delivered_count);
            info!(
                cell = %origin,
                parcels = delivered_count,
                reward = delivered_reward,
                "parcels delivered"
            );
        }
    }
}

/// Move every wanderer one random step; they never enter the courier's
/// cell or leave the walkable grid.
fn step_wanderers(state: &mut SimState) {
    let courier_cell = state.courier_pos.cell();
    let map = &state.map;
    for wanderer in &mut state.wanderers {
        let index = state.rng.next_below(4);
        let direction = match index {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        };
        let origin = wanderer.position.cell();
        let Some(next) = direction.apply(origin) else {
            continue;
        };
        if map.is_walkable(next) && next != courier_cell {
            wanderer.position = Position::from(next);
        }
    }
}

/// Log the episode end summary.
pub fn log_episode_end(result: &EpisodeResult) {
    info!(
        end_reason = ?result.end_reason,
        turns_executed = result.turns_executed,
        parcels_delivered = result.parcels_delivered,
        total_reward = result.total_reward,
        "episode ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courier_core::CourierConfig;
    use courier_types::Cell;

    use crate::scenario::build_scenario;

    use super::*;

    fn small_config() -> CourierConfig {
        let mut config = CourierConfig::parse("{}").unwrap();
        config.world.width = 5;
        config.world.height = 5;
        config.world.delivery_tiles = vec![[4, 4]];
        config.world.blocked_tiles = Vec::new();
        config.scenario.parcel_count = 2;
        config.scenario.wanderer_count = 0;
        config
    }

    #[tokio::test]
    async fn episode_delivers_all_parcels() {
        let config = small_config();
        let scenario = build_scenario(&config).unwrap();
        let mut state = SimState::from_scenario(scenario, config.world.seed);
        let mut beliefs = BeliefState::new(state.map.clone());
        let mut strategy = DeliveryStrategy::new(config.strategy.clone());

        let result = run_episode(&mut state, &mut beliefs, &mut strategy, 200, 0).await;

        assert_eq!(result.end_reason, EndReason::AllDelivered);
        assert_eq!(result.parcels_delivered, 2);
        assert!(result.total_reward > 0);
        assert_eq!(result.records.len(), usize::try_from(result.turns_executed).unwrap());
    }

    #[tokio::test]
    async fn episode_stops_at_turn_limit() {
        let config = small_config();
        let scenario = build_scenario(&config).unwrap();
        let mut state = SimState::from_scenario(scenario, config.world.seed);
        let mut beliefs = BeliefState::new(state.map.clone());
        let mut strategy = DeliveryStrategy::new(config.strategy.clone());

        let result = run_episode(&mut state, &mut beliefs, &mut strategy, 3, 0).await;

        assert_eq!(result.end_reason, EndReason::MaxTurnsReached);
        assert_eq!(result.turns_executed, 3);
    }

    #[test]
    fn acquisition_walks_to_nearest_parcel() {
        let config = small_config();
        let scenario = build_scenario(&config).unwrap();
        let mut beliefs = BeliefState::new(scenario.map.clone());
        beliefs.observe_self(scenario.courier.id, scenario.courier.position);
        beliefs.observe_parcels(vec![ParcelRecord {
            id: courier_types::ParcelId::new(),
            position: Position::from(Cell::new(2, 0)),
            reward: 10,
            carried_by: None,
        }]);
        let router = GridRouter::new(&scenario.map);

        // Courier starts at (0, 0); the parcel is straight to the right.
        let action = acquisition_action(&beliefs, &router);
        assert_eq!(
            action,
            Action::Move {
                direction: Direction::Right
            }
        );
    }

    #[test]
    fn acquisition_picks_up_when_standing_on_parcel() {
        let config = small_config();
        let scenario = build_scenario(&config).unwrap();
        let mut beliefs = BeliefState::new(scenario.map.clone());
        beliefs.observe_self(scenario.courier.id, scenario.courier.position);
        let parcel_id = courier_types::ParcelId::new();
        beliefs.observe_parcels(vec![ParcelRecord {
            id: parcel_id,
            position: scenario.courier.position,
            reward: 10,
            carried_by: None,
        }]);
        let router = GridRouter::new(&scenario.map);

        assert_eq!(
            acquisition_action(&beliefs, &router),
            Action::Pickup { parcel: parcel_id }
        );
    }

    #[test]
    fn putdown_outside_delivery_tile_is_rejected() {
        let config = small_config();
        let scenario = build_scenario(&config).unwrap();
        let courier = scenario.courier.id;
        let mut state = SimState::from_scenario(scenario, 1);
        // Carry one parcel, then put down away from any delivery tile.
        if let Some(p) = state.parcels.first_mut() {
            p.carried_by = Some(courier);
        }
        apply_action(&mut state, Action::Putdown);

        assert_eq!(state.parcels_delivered, 0);
        assert_eq!(state.total_reward, 0);
    }
}
