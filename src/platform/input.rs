//! Input mapping
//!
//! Browser event handlers translate raw keys and touch positions through
//! these functions, so the mapping is testable without a DOM.

use crate::sim::Steering;

/// What a key press asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Steer(Steering),
    /// Start a run from the title or game-over screen
    Start,
    ToggleMute,
}

/// Map a `KeyboardEvent.key` value to an action
pub fn action_for_key(key: &str) -> Option<InputAction> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(InputAction::Steer(Steering::Left)),
        "ArrowRight" | "d" | "D" => Some(InputAction::Steer(Steering::Right)),
        " " | "Enter" => Some(InputAction::Start),
        "m" | "M" => Some(InputAction::ToggleMute),
        _ => None,
    }
}

/// Touches on the left half steer left, the right half steer right
pub fn steering_for_touch(touch_x: f32, canvas_width: f32) -> Steering {
    if touch_x < canvas_width / 2.0 {
        Steering::Left
    } else {
        Steering::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_steer() {
        assert_eq!(
            action_for_key("ArrowLeft"),
            Some(InputAction::Steer(Steering::Left))
        );
        assert_eq!(
            action_for_key("D"),
            Some(InputAction::Steer(Steering::Right))
        );
    }

    #[test]
    fn test_start_and_mute_keys() {
        assert_eq!(action_for_key(" "), Some(InputAction::Start));
        assert_eq!(action_for_key("Enter"), Some(InputAction::Start));
        assert_eq!(action_for_key("m"), Some(InputAction::ToggleMute));
        assert_eq!(action_for_key("M"), Some(InputAction::ToggleMute));
    }

    #[test]
    fn test_unmapped_key() {
        assert_eq!(action_for_key("q"), None);
        assert_eq!(action_for_key("Shift"), None);
    }

    #[test]
    fn test_touch_halves() {
        assert_eq!(steering_for_touch(10.0, 800.0), Steering::Left);
        assert_eq!(steering_for_touch(399.0, 800.0), Steering::Left);
        assert_eq!(steering_for_touch(400.0, 800.0), Steering::Right);
    }
}
