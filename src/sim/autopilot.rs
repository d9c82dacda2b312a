//! Attract-mode autopilot
//!
//! Steers the ship away from the lowest obstacle falling into its lane. Used by
//! the menu backdrop and the native headless run; never by a human session.

use super::state::SimState;
use super::tick::TickInput;

/// How far above the ship we look for threats
const LOOKAHEAD: f32 = 220.0;
/// Extra lane width on each side of the ship
const LANE_PAD: f32 = 10.0;

/// Pick steering for the next tick
pub fn autopilot(state: &SimState) -> TickInput {
    let ship = state.player.rect();
    let lane_min = ship.min().x - LANE_PAD;
    let lane_max = ship.max().x + LANE_PAD;
    let horizon = ship.min().y - LOOKAHEAD;

    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.pos.y + o.size > horizon && o.pos.y < ship.max().y)
        .filter(|o| o.pos.x < lane_max && o.pos.x + o.size > lane_min)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    let Some(obstacle) = threat else {
        return TickInput::default();
    };

    let needed = ship.size.x + 2.0 * LANE_PAD;
    let room_left = obstacle.pos.x;
    let room_right = state.width - (obstacle.pos.x + obstacle.size);
    let prefer_left = ship.center().x < obstacle.pos.x + obstacle.size / 2.0;

    let go_left = match (room_left >= needed, room_right >= needed) {
        (true, true) => prefer_left,
        (true, false) => true,
        (false, true) => false,
        (false, false) => room_left > room_right,
    };

    TickInput {
        left: go_left,
        right: !go_left,
    }
}
