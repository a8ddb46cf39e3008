//! Keyboard input as seen by the navigation reducer.

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta key is held (Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Whether a shortcut modifier (Control or Meta) is held.
    pub fn is_shortcut(&self) -> bool {
        self.control || self.meta
    }
}

/// Keys the grid reacts to.
///
/// Anything else maps to [`Key::Other`], which every reducer ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
    Enter,
    Escape,
    Backspace,
    Delete,
    /// A printable character.
    Character(char),
    Other,
}

impl Key {
    /// Maps a platform key name (`KeyboardEvent.key` style) to a key.
    ///
    /// Single-character names are printable characters; unknown names map
    /// to [`Key::Other`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Tab" => Key::Tab,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Key::Character(c),
                    _ => Key::Other,
                }
            }
        }
    }

    /// Check if this is an arrow key.
    pub fn is_arrow(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight
        )
    }

    /// Row and column delta of an arrow key.
    pub fn arrow_delta(&self) -> Option<(isize, isize)> {
        match self {
            Key::ArrowUp => Some((-1, 0)),
            Key::ArrowDown => Some((1, 0)),
            Key::ArrowLeft => Some((0, -1)),
            Key::ArrowRight => Some((0, 1)),
            _ => None,
        }
    }
}

/// A key press delivered to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: KeyboardModifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::NONE)
    }

    /// A key press with Shift held.
    pub fn shifted(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::SHIFT)
    }

    /// Builds an event from a platform key name and a Shift flag.
    pub fn from_name(name: &str, shift: bool) -> Self {
        Self::new(
            Key::from_name(name),
            KeyboardModifiers {
                shift,
                ..KeyboardModifiers::NONE
            },
        )
    }
}
