use serde::{Deserialize, Serialize};
use std::fmt;

/// Pan/tilt direction for camera motion primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Unit pan/tilt offsets: pan is positive-right, tilt is positive-up.
    pub fn offsets(&self) -> (f32, f32) {
        match self {
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::Up => (0.0, 1.0),
            Direction::Down => (0.0, -1.0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::On => "on",
            PowerState::Off => "off",
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, PowerState::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Switchable device category a bare power primitive can resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Lamp,
    Plug,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Lamp => "lamp",
            DeviceClass::Plug => "plug",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One primitive of a compound command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    /// Capture a still image from the camera.
    Snapshot,
    /// Move the camera one fixed step in a direction.
    Motion(Direction),
    /// Recall a stored camera preset by numeric id.
    Preset(u32),
    /// Toggle power on the ambient device class.
    Power(PowerState),
    /// Name a device class for following power primitives.
    DeviceClass(DeviceClass),
    /// Token the grammar does not know; reported, never executed.
    Unrecognized(String),
}

/// Ordered sequence of primitives parsed from one compound command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundAction(Vec<Token>);

impl CompoundAction {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_snapshot(&self) -> bool {
        self.0.iter().any(|t| matches!(t, Token::Snapshot))
    }

    /// True when at least one token can actually drive a device.
    pub fn has_actionable(&self) -> bool {
        self.0
            .iter()
            .any(|t| !matches!(t, Token::Unrecognized(_) | Token::DeviceClass(_)))
    }
}

impl<'a> IntoIterator for &'a CompoundAction {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
