//! Per-frame simulation tick
//!
//! Advances falling objects, resolves catches and drops, and spawns new
//! objects. No rendering, storage or network access happens here.

use super::collision::{CatchResult, check_catch};
use super::state::{GameEvent, GamePhase, GameState};

/// Advance the game state by one frame at timestamp `now_ms`
///
/// Returns the events of this frame in order. Does nothing unless the
/// session is `Playing`.
pub fn tick(state: &mut GameState, now_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }

    state.time_ticks += 1;

    let config = state.config;
    let paddle = state.paddle.bounds(&config);
    let mut caught = 0u32;
    let mut dropped = false;

    // Move, catch and drop in a single pass
    state.objects.retain_mut(|obj| {
        obj.y += config.fall_speed;

        let bounds = obj.bounds(config.object_size);
        if check_catch(&bounds, &paddle, config.fall_speed) == CatchResult::Caught {
            caught += 1;
            events.push(GameEvent::Caught { id: obj.id });
            return false;
        }

        if obj.y > config.height {
            dropped = true;
            events.push(GameEvent::Dropped { id: obj.id });
            return false;
        }

        true
    });

    state.score += caught;

    // One transition no matter how many objects fell out this frame
    if dropped {
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver { score: state.score });
        return events;
    }

    if now_ms - state.last_spawn_ms > config.spawn_interval_ms {
        state.last_spawn_ms = now_ms;
        let obj = state.spawn_object();
        events.push(GameEvent::Spawned {
            id: obj.id,
            x: obj.x,
        });
    }

    events
}
