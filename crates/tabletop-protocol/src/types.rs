//! Core value types shared by every Tabletop layer.
//!
//! These are the things that cross the boundary between a chat transport
//! and the engine: who clicked (`PlayerId`), which game they clicked in
//! (`SessionId`), and where they clicked (`Coord`, carried as a raw
//! payload string inside a [`ClickEvent`]).

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The identity of a chat user, as reported by the transport.
///
/// Newtype over the platform's numeric user id so it can't be mixed up
/// with a [`SessionId`]. Serializes as a plain number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A unique identifier for one game session.
///
/// Rendered as 16 lowercase hex digits so it fits compactly into button
/// callback data and parses back with [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16).map(SessionId)
    }
}

/// The registration key of a game (e.g. `"othello"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameKind(pub String);

impl GameKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameKind {
    fn from(kind: &str) -> Self {
        Self(kind.to_string())
    }
}

/// One seat in a session: the identity allowed to act there, plus the
/// name shown in status text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: PlayerId,
    pub name: String,
}

impl Participant {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// A cell position on a rectangular board, zero-based.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Coord {
    pub row: u32,
    pub col: u32,
}

/// The eight compass offsets around a cell, row-major.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Coord {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Returns `true` if the coordinate lies on a `rows` × `cols` board.
    pub fn within(self, rows: u32, cols: u32) -> bool {
        self.row < rows && self.col < cols
    }

    /// Moves one step by `(dr, dc)`, or `None` if that leaves the board.
    pub fn step(self, dr: i32, dc: i32, rows: u32, cols: u32) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let next = Self { row, col };
        next.within(rows, cols).then_some(next)
    }

    /// Iterates the in-bounds 8-neighbourhood of this cell.
    pub fn neighbours(self, rows: u32, cols: u32) -> impl Iterator<Item = Coord> {
        DIRECTIONS
            .iter()
            .filter_map(move |&(dr, dc)| self.step(dr, dc, rows, cols))
    }

    /// Row-major index into a flat board with `cols` columns.
    pub fn index(self, cols: u32) -> usize {
        (self.row * cols + self.col) as usize
    }
}

/// Formats as `"row col"`, the payload format carried by buttons.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.row, self.col)
    }
}

/// Why a payload failed to parse as a [`Coord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCoordError {
    #[error("not enough components for a coordinate")]
    NotEnoughComponents,

    #[error("too many components for a coordinate")]
    TooManyComponents,

    #[error("cannot parse coordinate component: {0}")]
    ParseInt(#[from] ParseIntError),
}

impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let row = parts
            .next()
            .ok_or(ParseCoordError::NotEnoughComponents)?
            .parse()?;
        let col = parts
            .next()
            .ok_or(ParseCoordError::NotEnoughComponents)?
            .parse()?;
        if parts.next().is_some() {
            return Err(ParseCoordError::TooManyComponents);
        }
        Ok(Self { row, col })
    }
}

// ---------------------------------------------------------------------------
// ClickEvent
// ---------------------------------------------------------------------------

/// A button press delivered by the transport. Transient; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// The session the pressed button belongs to.
    pub session: SessionId,

    /// Who pressed it.
    pub identity: PlayerId,

    /// The board version the button was rendered at, when the transport
    /// knows it. `None` skips the stale-view check.
    #[serde(default)]
    pub version: Option<u64>,

    /// The game-specific part of the button (usually `"row col"`).
    pub payload: String,

    /// The clicker's display name, when the transport has one. Used to
    /// credit moves in co-operative games where anyone may click.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ClickEvent {
    pub fn new(session: SessionId, identity: PlayerId, payload: impl Into<String>) -> Self {
        Self {
            session,
            identity,
            version: None,
            payload: payload.into(),
            display_name: None,
        }
    }

    pub fn at_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

// =========================================================================
// Tests
// =========================================================================
