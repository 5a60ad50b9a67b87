//! Input normalization across keyboard, pointer, touch, and on-screen
//! control buttons.
//!
//! Hosts feed raw [`DeviceEvent`]s into the engine. The [`InputNormalizer`]
//! folds each one into the shared [`InputState`] and turns it into at most
//! one [`GameInput`] for the active game:
//!
//! | Event                    | State change                  | Forwarded            |
//! |--------------------------|-------------------------------|----------------------|
//! | `KeyDown` / `KeyUp`      | key pressed flag              | `Key { key, pressed }` |
//! | `ControlButton`          | mapped key pressed flag       | `Key { key, pressed }` |
//! | `PointerDown`            | pointer position + active     | `Click { x, y }`     |
//! | `TouchStart`             | touch position + active       | `Click { x, y }`     |
//! | `PointerUp` / `TouchEnd` | active flag cleared           | nothing              |
//!
//! Pointer and touch coordinates arrive in device space and are converted to
//! surface-local coordinates with the current [`SurfaceGeometry`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A logical key, named after DOM `KeyboardEvent.code` values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Escape,
    Enter,
    /// Any code the engine has no name for, preserved verbatim.
    Other(String),
}

impl Key {
    /// Parse a DOM-style key code. Unknown codes become [`Key::Other`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Space" => Key::Space,
            "Escape" => Key::Escape,
            "Enter" => Key::Enter,
            other => Key::Other(other.to_owned()),
        }
    }

    /// The DOM-style code for this key.
    pub fn as_code(&self) -> &str {
        match self {
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::Space => "Space",
            Key::Escape => "Escape",
            Key::Enter => "Enter",
            Key::Other(code) => code,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// On-screen buttons for touch devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlButton {
    Left,
    Right,
    Jump,
}

impl ControlButton {
    /// The keyboard key this button stands in for.
    pub fn key(self) -> Key {
        match self {
            ControlButton::Left => Key::ArrowLeft,
            ControlButton::Right => Key::ArrowRight,
            ControlButton::Jump => Key::Space,
        }
    }
}

// ---------------------------------------------------------------------------
// DeviceEvent
// ---------------------------------------------------------------------------

/// A raw event from the host, in device coordinates.
///
/// Serializable so replays can store the exact event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { x: f64, y: f64 },
    PointerUp,
    TouchStart { x: f64, y: f64 },
    TouchEnd,
    ControlButton { button: ControlButton, pressed: bool },
}

/// Where the surface sits on the device and how it is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    pub origin_x: f64,
    pub origin_y: f64,
    /// Device pixels per surface pixel.
    pub scale: f64,
}

impl Default for SurfaceGeometry {
    /// Surface at the device origin, unscaled.
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            scale: 1.0,
        }
    }
}

impl SurfaceGeometry {
    pub fn new(origin_x: f64, origin_y: f64, scale: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            scale,
        }
    }

    /// Convert a device coordinate into surface-local space:
    /// `(device - origin) / scale`.
    ///
    /// A non-positive or non-finite scale is treated as 1.
    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        let scale = if self.scale > 0.0 && self.scale.is_finite() {
            self.scale
        } else {
            1.0
        };
        ((x - self.origin_x) / scale, (y - self.origin_y) / scale)
    }
}

// ---------------------------------------------------------------------------
// InputState
// ---------------------------------------------------------------------------

/// Everything the engine knows about currently held input.
///
/// Games get read-only access through the engine context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// Keyed by DOM code so the state serializes as a plain JSON object.
    keys: BTreeMap<String, bool>,
    pointer: (f64, f64),
    pointer_active: bool,
    touch: (f64, f64),
    touch_active: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is currently held. Keys never seen read as released.
    pub fn is_pressed(&self, key: &Key) -> bool {
        self.keys.get(key.as_code()).copied().unwrap_or(false)
    }

    /// Last pointer-down position in surface coordinates.
    pub fn pointer(&self) -> (f64, f64) {
        self.pointer
    }

    pub fn pointer_active(&self) -> bool {
        self.pointer_active
    }

    /// Last touch-start position in surface coordinates.
    pub fn touch(&self) -> (f64, f64) {
        self.touch
    }

    pub fn touch_active(&self) -> bool {
        self.touch_active
    }

    /// Keys currently held, in code order.
    pub fn held_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys
            .iter()
            .filter(|(_, pressed)| **pressed)
            .map(|(code, _)| Key::from_code(code))
    }
}

// ---------------------------------------------------------------------------
// InputNormalizer
// ---------------------------------------------------------------------------

/// What a device event means to a game.
#[derive(Debug, Clone, PartialEq)]
pub enum GameInput {
    Key { key: Key, pressed: bool },
    Click { x: f64, y: f64 },
}

/// Folds device events into [`InputState`].
#[derive(Debug, Clone, Default)]
pub struct InputNormalizer {
    geometry: SurfaceGeometry,
}

impl InputNormalizer {
    pub fn new(geometry: SurfaceGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    /// Replace the geometry, e.g. after the host window is resized.
    pub fn set_geometry(&mut self, geometry: SurfaceGeometry) {
        self.geometry = geometry;
    }

    /// Apply `event` to `state` and return what, if anything, the game
    /// should be told.
    pub fn normalize(&self, state: &mut InputState, event: &DeviceEvent) -> Option<GameInput> {
        match event {
            DeviceEvent::KeyDown(key) => Some(Self::set_key(state, key.clone(), true)),
            DeviceEvent::KeyUp(key) => Some(Self::set_key(state, key.clone(), false)),
            DeviceEvent::ControlButton { button, pressed } => {
                Some(Self::set_key(state, button.key(), *pressed))
            }
            DeviceEvent::PointerDown { x, y } => {
                let (x, y) = self.geometry.to_local(*x, *y);
                state.pointer = (x, y);
                state.pointer_active = true;
                Some(GameInput::Click { x, y })
            }
            DeviceEvent::TouchStart { x, y } => {
                let (x, y) = self.geometry.to_local(*x, *y);
                state.touch = (x, y);
                state.touch_active = true;
                Some(GameInput::Click { x, y })
            }
            DeviceEvent::PointerUp => {
                state.pointer_active = false;
                None
            }
            DeviceEvent::TouchEnd => {
                state.touch_active = false;
                None
            }
        }
    }

    fn set_key(state: &mut InputState, key: Key, pressed: bool) -> GameInput {
        state.keys.insert(key.as_code().to_owned(), pressed);
        GameInput::Key { key, pressed }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
