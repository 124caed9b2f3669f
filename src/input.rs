//! Edge-triggered movement input
//!
//! Hosts translate key events into `InputEvent`s; the session folds them into
//! a single direction that the next tick reads.

use crate::sim::TickInput;

/// Begin/end of a steering action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    LeftBegin,
    LeftEnd,
    RightBegin,
    RightEnd,
}

impl InputEvent {
    /// Map a DOM `KeyboardEvent.key` value (`down` = keydown)
    pub fn from_key(key: &str, down: bool) -> Option<Self> {
        let left = matches!(key, "ArrowLeft" | "a" | "A");
        let right = matches!(key, "ArrowRight" | "d" | "D");
        match (left, right, down) {
            (true, _, true) => Some(InputEvent::LeftBegin),
            (true, _, false) => Some(InputEvent::LeftEnd),
            (_, true, true) => Some(InputEvent::RightBegin),
            (_, true, false) => Some(InputEvent::RightEnd),
            _ => None,
        }
    }
}

/// Current steering direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    dir: i8,
}

impl InputState {
    /// Last begin wins; an end only clears the direction it started
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::LeftBegin => self.dir = -1,
            InputEvent::RightBegin => self.dir = 1,
            InputEvent::LeftEnd if self.dir < 0 => self.dir = 0,
            InputEvent::RightEnd if self.dir > 0 => self.dir = 0,
            InputEvent::LeftEnd | InputEvent::RightEnd => {}
        }
    }

    pub fn dir(&self) -> i8 {
        self.dir
    }

    pub fn reset(&mut self) {
        self.dir = 0;
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput { dir: self.dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_press_wins() {
        let mut input = InputState::default();
        input.apply(InputEvent::LeftBegin);
        input.apply(InputEvent::RightBegin);
        assert_eq!(input.dir(), 1);
        input.apply(InputEvent::LeftBegin);
        assert_eq!(input.dir(), -1);
    }

    #[test]
    fn test_release_of_other_key_is_ignored() {
        let mut input = InputState::default();
        input.apply(InputEvent::LeftBegin);
        input.apply(InputEvent::RightBegin);
        input.apply(InputEvent::LeftEnd);
        assert_eq!(input.dir(), 1);
        input.apply(InputEvent::RightEnd);
        assert_eq!(input.dir(), 0);
        assert_eq!(input.tick_input(), TickInput { dir: 0 });
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(InputEvent::from_key("ArrowLeft", true), Some(InputEvent::LeftBegin));
        assert_eq!(InputEvent::from_key("d", false), Some(InputEvent::RightEnd));
        assert_eq!(InputEvent::from_key("Enter", true), None);
    }
}
