//! Deterministic scenario generation.
//!
//! Builds the starting grid, scatters parcels, and places wanderer agents,
//! all derived from the configured seed so the same configuration always
//! produces the same run. Randomness comes from a sequential `xorshift64`
//! generator rather than an OS-seeded source for exactly that reason.

use courier_core::CourierConfig;
use courier_types::{AgentId, AgentRecord, Cell, ParcelId, ParcelRecord, Position};
use courier_world::GridMap;
use tracing::info;

use crate::error::EngineError;

/// Sequential `xorshift64` pseudo-random generator.
///
/// The same seed always yields the same sequence, which keeps scenario
/// generation and wanderer movement reproducible across runs.
#[derive(Debug, Clone)]
pub struct TurnRng {
    /// Current generator state, never zero.
    state: u64,
}

impl TurnRng {
    /// Create a generator from a seed.
    pub const fn new(seed: u64) -> Self {
        // Mix with a well-known constant to avoid trivial low-seed patterns;
        // xorshift requires non-zero state.
        let mut state = seed.wrapping_mul(0x517c_c1b7_2722_0a95);
        if state == 0 {
            state = 0xdead_beef_cafe_babe;
        }
        Self { state }
    }

    /// Next raw value in the sequence.
    pub const fn next_value(&mut self) -> u64 {
        let mut state = self.state;
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        self.state = state;
        state
    }

    /// Next value reduced into `[0, bound)`; returns 0 when `bound` is 0.
    pub const fn next_below(&mut self, bound: u64) -> u64 {
        let value = self.next_value();
        match value.checked_rem(bound) {
            Some(reduced) => reduced,
            None => 0,
        }
    }
}

/// A generated starting world: map, courier, wanderers, and parcels.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// The static grid.
    pub map: GridMap,
    /// The courier agent under control.
    pub courier: AgentRecord,
    /// Scripted agents sharing the grid.
    pub wanderers: Vec<AgentRecord>,
    /// Parcels waiting to be collected.
    pub parcels: Vec<ParcelRecord>,
}

/// Build a scenario from configuration.
///
/// The grid is constructed from the configured dimensions and tile lists;
/// the courier starts on the first free cell, and parcels and wanderers
/// are scattered over the remaining free cells using the configured seed.
///
/// # Errors
///
/// Returns [`EngineError::World`] when the tile lists are inconsistent
/// with the grid dimensions, or [`EngineError::Scenario`] when the grid
/// has no free cells left for the courier or the parcels.
pub fn build_scenario(config: &CourierConfig) -> Result<Scenario, EngineError> {
    let mut map = GridMap::new(config.world.width, config.world.height)?;
    for &[x, y] in &config.world.blocked_tiles {
        map.set_blocked(Cell::new(x, y))?;
    }
    for &[x, y] in &config.world.delivery_tiles {
        map.add_delivery_tile(Cell::new(x, y))?;
    }

    // Free cells: walkable and not a delivery tile, in grid order.
    let mut free: Vec<Cell> = Vec::new();
    for y in 0..config.world.height {
        for x in 0..config.world.width {
            let Ok(x) = i32::try_from(x) else { continue };
            let Ok(y) = i32::try_from(y) else { continue };
            let cell = Cell::new(x, y);
            if map.is_walkable(cell) && !map.is_delivery_tile(cell) {
                free.push(cell);
            }
        }
    }

    let mut rng = TurnRng::new(config.world.seed);

    // The courier takes the first free cell; everything else draws from
    // the remainder.
    let Some((&start, rest)) = free.split_first() else {
        return Err(EngineError::Scenario {
            message: String::from("no free cell for the courier"),
        });
    };
    let courier = AgentRecord {
        id: AgentId::new(),
        position: Position::from(start),
    };

    if rest.is_empty() && config.scenario.parcel_count > 0 {
        return Err(EngineError::Scenario {
            message: String::from("no free cells for parcels"),
        });
    }

    let mut parcels = Vec::new();
    for _ in 0..config.scenario.parcel_count {
        let Some(&cell) = pick(rest, &mut rng) else {
            continue;
        };
        let reward = draw_reward(
            &mut rng,
            config.scenario.min_reward,
            config.scenario.max_reward,
        );
        parcels.push(ParcelRecord {
            id: ParcelId::new(),
            position: Position::from(cell),
            reward,
            carried_by: None,
        });
    }

    let mut wanderers = Vec::new();
    for _ in 0..config.scenario.wanderer_count {
        let Some(&cell) = pick(rest, &mut rng) else {
            continue;
        };
        wanderers.push(AgentRecord {
            id: AgentId::new(),
            position: Position::from(cell),
        });
    }

    info!(
        width = config.world.width,
        height = config.world.height,
        delivery_tiles = map.delivery_tile_count(),
        parcels = parcels.len(),
        wanderers = wanderers.len(),
        courier_start = %start,
        "scenario built"
    );

    Ok(Scenario {
        map,
        courier,
        wanderers,
        parcels,
    })
}

/// Pick a uniformly random element of a slice, or `None` if it is empty.
fn pick<'a>(cells: &'a [Cell], rng: &mut TurnRng) -> Option<&'a Cell> {
    let len = u64::try_from(cells.len()).ok()?;
    let index = usize::try_from(rng.next_below(len)).ok()?;
    cells.get(index)
}

/// Draw a reward in `[min, max]`, tolerating a reversed or empty range.
fn draw_reward(rng: &mut TurnRng, min: u32, max: u32) -> u32 {
    if max <= min {
        return min;
    }
    let span = u64::from(max.checked_sub(min).unwrap_or(0)).saturating_add(1);
    let offset = rng.next_below(span);
    u32::try_from(u64::from(min).saturating_add(offset)).unwrap_or(min)
}
