use raylib::prelude::*;

use crate::core::input::{Action, ActionSet, InputSnapshot, PointerDelta};

const BINDINGS: &[(KeyboardKey, Action)] = &[
    (KeyboardKey::KEY_W, Action::Forward),
    (KeyboardKey::KEY_UP, Action::Forward),
    (KeyboardKey::KEY_S, Action::Backward),
    (KeyboardKey::KEY_DOWN, Action::Backward),
    (KeyboardKey::KEY_A, Action::StrafeLeft),
    (KeyboardKey::KEY_D, Action::StrafeRight),
    (KeyboardKey::KEY_LEFT, Action::TurnLeft),
    (KeyboardKey::KEY_RIGHT, Action::TurnRight),
    (KeyboardKey::KEY_LEFT_SHIFT, Action::Run),
    (KeyboardKey::KEY_LEFT_CONTROL, Action::Crouch),
    (KeyboardKey::KEY_C, Action::Crouch),
    (KeyboardKey::KEY_SPACE, Action::Climb),
    (KeyboardKey::KEY_E, Action::Interact),
];

/// Samples held keys and, while the cursor is captured, the mouse delta.
/// Click captures the pointer, Tab releases it.
pub fn process_events(window: &mut RaylibHandle) -> InputSnapshot {
    if !window.is_cursor_hidden() && window.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
        window.disable_cursor();
    } else if window.is_cursor_hidden() && window.is_key_pressed(KeyboardKey::KEY_TAB) {
        window.enable_cursor();
    }

    let mut held = ActionSet::empty();
    for &(key, action) in BINDINGS {
        if window.is_key_down(key) {
            held.insert(action);
        }
    }

    let pointer = window.is_cursor_hidden().then(|| {
        let delta = window.get_mouse_delta();
        PointerDelta { dx: delta.x as f64, dy: delta.y as f64 }
    });
    InputSnapshot { held, pointer }
}
