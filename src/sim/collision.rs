//! Catch detection between a falling object and the paddle
//!
//! Objects move a fixed distance per tick, so a catch is decided from the
//! current position alone: the object's bottom edge must have crossed the
//! paddle's top edge during this tick's move.

use super::rect::Rect;

/// Result of a catch check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchResult {
    /// Object landed on the paddle this tick
    Caught,
    /// Object is below the paddle's top edge but never touched it
    Missed,
    /// Object has not reached the paddle yet
    Above,
}

/// Check whether `object` (already moved this tick) is caught by `paddle`
///
/// The bottom edge must lie in `[paddle.top, paddle.top + fall_speed)`, i.e.
/// it crossed the paddle's top this tick, and the horizontal extents must
/// overlap.
pub fn check_catch(object: &Rect, paddle: &Rect, fall_speed: f32) -> CatchResult {
    let bottom = object.bottom();
    let top = paddle.top();

    if bottom < top {
        return CatchResult::Above;
    }

    if bottom < top + fall_speed && object.overlaps_x(paddle) {
        CatchResult::Caught
    } else {
        CatchResult::Missed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddle() -> Rect {
        // Spans x in [250, 350], top edge at 380
        Rect::new(250.0, 380.0, 100.0, 20.0)
    }

    #[test]
    fn test_landing_on_paddle_is_caught() {
        let object = Rect::new(280.0, 350.0, 30.0, 30.0);
        assert_eq!(check_catch(&object, &paddle(), 4.0), CatchResult::Caught);
    }

    #[test]
    fn test_window_is_one_fall_step() {
        let p = paddle();
        // bottom = 383.9 still inside the window
        let late = Rect::new(280.0, 353.9, 30.0, 30.0);
        assert_eq!(check_catch(&late, &p, 4.0), CatchResult::Caught);
        // bottom = 384 has already passed the window
        let past = Rect::new(280.0, 354.0, 30.0, 30.0);
        assert_eq!(check_catch(&past, &p, 4.0), CatchResult::Missed);
    }

    #[test]
    fn test_above_paddle() {
        let object = Rect::new(280.0, 349.0, 30.0, 30.0);
        assert_eq!(check_catch(&object, &paddle(), 4.0), CatchResult::Above);
    }

    #[test]
    fn test_no_horizontal_overlap() {
        // Right edge exactly on paddle left edge
        let object = Rect::new(220.0, 350.0, 30.0, 30.0);
        assert_eq!(check_catch(&object, &paddle(), 4.0), CatchResult::Missed);
        let object = Rect::new(350.0, 350.0, 30.0, 30.0);
        assert_eq!(check_catch(&object, &paddle(), 4.0), CatchResult::Missed);
    }
}
