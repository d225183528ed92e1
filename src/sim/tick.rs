//! Frame step for the live game
//!
//! Advances every shooter along the rail and fires at each cell center it
//! passed since the previous frame. Centers are visited in rail order, so a
//! long frame can never skip a target.

use serde::{Deserialize, Serialize};

use super::rail::{cell_center, map_position};
use super::scan::find_exposed;
use super::state::{GameState, PixelColor, SessionPhase, ShooterState};
use crate::wrap_rail;

/// Player intents applied at the start of a frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Deploy the head of this lane
    pub spawn_lane: Option<usize>,
    /// Idle/demo mode - deploys the manifest in order, adding the next
    /// shooter only once the rail is empty or every shooter on it is stalled
    pub idle_mode: bool,
}

/// A pixel cleared this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub shooter_id: u32,
    pub row: usize,
    pub col: usize,
    pub color: PixelColor,
}

/// What changed during one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Shooters deployed this frame
    pub spawned: Vec<u32>,
    /// Hits in processing order
    pub hits: Vec<Hit>,
    /// Shooters that ran dry this frame
    pub retired: Vec<u32>,
    /// Session phase once the frame is done
    pub phase: SessionPhase,
}

impl TickReport {
    fn new(phase: SessionPhase) -> Self {
        Self {
            spawned: Vec::new(),
            hits: Vec::new(),
            retired: Vec::new(),
            phase,
        }
    }

    /// Whether presentation needs a fresh grid
    pub fn grid_changed(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// Advance the session by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickReport {
    let mut report = TickReport::new(state.phase);

    // Editing pauses the loop; won/lost are terminal
    if state.phase != SessionPhase::Playing {
        return report;
    }

    state.time_ticks += 1;

    if let Some(lane) = input.spawn_lane {
        if state.spawn(lane) {
            report.spawned.extend(state.shooters.last().map(|s| s.id));
        }
    }

    // A lone shooter can be left waiting on a pixel only a later shooter
    // uncovers, so idle mode adds one once nothing on the rail can fire
    let size = state.grid.size();
    if input.idle_mode && state.shooters.iter().all(|s| s.is_stalled(size)) {
        if let Some(lane) = state.inventory.earliest_lane() {
            if state.spawn(lane) {
                report.spawned.extend(state.shooters.last().map(|s| s.id));
            }
        }
    }

    if dt.is_finite() && dt > 0.0 {
        advance_shooters(state, dt, &mut report);
    }

    // Retire empty shooters (they do not go back to the inventory)
    let retired = &mut report.retired;
    state.shooters.retain_mut(|shooter| {
        if shooter.ammo > 0 {
            return true;
        }
        shooter.state = ShooterState::Retired;
        retired.push(shooter.id);
        log::debug!("Shooter {} retired", shooter.id);
        false
    });

    if !state.grid.has_active() {
        state.phase = SessionPhase::Won;
        log::info!("Level cleared! Score {}", state.score);
    } else if state.shooters.is_empty() && state.inventory.is_empty() {
        state.phase = SessionPhase::Lost;
        log::info!(
            "Out of shooters with {} pixels left",
            state.grid.active_count()
        );
    }

    report.phase = state.phase;
    report
}

/// Move every active shooter and resolve the centers it crossed
fn advance_shooters(state: &mut GameState, dt: f32, report: &mut TickReport) {
    let perimeter = state.perimeter();
    let size = state.grid.size();
    let travel = state.settings.rail_speed * dt;
    let score_per_hit = state.settings.score_per_hit;
    // With only this shooter firing, a full lap without a hit means the
    // rest of the step cannot hit either
    let lap = 4 * size as u64;

    let GameState {
        grid,
        shooters,
        score,
        ..
    } = state;

    for shooter in shooters.iter_mut() {
        let old_pos = shooter.rail_position;
        let new_pos = old_pos + travel;

        // Centers sit at k + 0.5; take those in (old_pos, new_pos]
        let first = (old_pos - 0.5).floor() as i64 + 1;
        let last = (new_pos - 0.5).floor() as i64;

        let mut misses = 0u64;
        for k in first..=last {
            if shooter.ammo == 0 || misses >= lap {
                break;
            }

            let point = map_position(cell_center(k), perimeter, size, size);
            let target = find_exposed(grid, point.side, point.index)
                .filter(|cell| cell.color == shooter.color)
                .map(|cell| (cell.row, cell.col));

            let Some((row, col)) = target else {
                misses += 1;
                shooter.misses = shooter.misses.saturating_add(1);
                continue;
            };

            grid.deactivate(row, col);
            shooter.ammo -= 1;
            *score += score_per_hit;
            misses = 0;
            shooter.misses = 0;
            report.hits.push(Hit {
                shooter_id: shooter.id,
                row,
                col,
                color: shooter.color,
            });
            log::debug!(
                "Shooter {} hit ({}, {}) from {} {}, {} ammo left",
                shooter.id,
                row,
                col,
                point.side.as_str(),
                point.index,
                shooter.ammo
            );
        }

        shooter.rail_position = wrap_rail(new_pos, perimeter);
    }
}
