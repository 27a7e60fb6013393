//! Device-independent input: which logical actions are held this frame, plus
//! the pointer delta while the pointer is captured.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Run,
    Crouch,
    /// Grab a vine wall (Space).
    Climb,
    /// Leave or enter a locker (E).
    Interact,
}

impl Action {
    #[inline]
    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// A small bit set of held actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet(u16);

impl ActionSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    #[inline]
    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}

/// Relative pointer motion in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerDelta {
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub held: ActionSet,
    /// Only present while the host has the pointer captured.
    pub pointer: Option<PointerDelta>,
}

impl InputSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn holding(actions: impl IntoIterator<Item = Action>) -> Self {
        Self { held: actions.into_iter().collect(), pointer: None }
    }

    pub fn with_pointer(mut self, dx: f64, dy: f64) -> Self {
        self.pointer = Some(PointerDelta { dx, dy });
        self
    }

    #[inline]
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_set_tracks_membership() {
        let set: ActionSet = [Action::Forward, Action::Run].into_iter().collect();
        assert!(set.contains(Action::Forward));
        assert!(set.contains(Action::Run));
        assert!(!set.contains(Action::Crouch));
        assert_eq!(ActionSet::empty(), ActionSet::default());
        assert!(!ActionSet::empty().contains(Action::Forward));
    }
}
