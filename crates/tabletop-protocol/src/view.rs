//! Render views: what a transport turns into an inline keyboard.
//!
//! A [`RenderView`] is always recomputed from committed session state and
//! never mutated afterwards. It derives `Eq` so callers can check that a
//! rejected click left the view byte-for-byte unchanged.

use serde::{Deserialize, Serialize};

use crate::SessionId;

/// How a cell should be presented.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum CellStyle {
    #[default]
    Plain,
    /// Occupied by a piece or mark.
    Marked,
    /// A suggested target (e.g. a legal othello move).
    Highlighted,
    /// Clicking it can't do anything useful.
    Disabled,
}

/// What a rule adapter reports about a single cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub label: String,
    #[serde(default)]
    pub style: CellStyle,
}

impl CellView {
    pub fn new(label: impl Into<String>, style: CellStyle) -> Self {
        Self {
            label: label.into(),
            style,
        }
    }

    pub fn plain(label: impl Into<String>) -> Self {
        Self::new(label, CellStyle::Plain)
    }
}

/// One inline button, ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub style: CellStyle,
    /// Encoded [`CallbackData`](crate::CallbackData) routed back on click.
    pub callback: String,
}

/// The full projection of a session: keyboard rows plus a status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderView {
    pub session: SessionId,
    /// Committed board version this view was rendered from.
    pub version: u64,
    pub rows: Vec<Vec<Button>>,
    pub status: String,
    /// `true` once the session has reached a terminal state.
    pub finished: bool,
}

impl RenderView {
    /// Looks up a button by grid position.
    pub fn button(&self, row: usize, col: usize) -> Option<&Button> {
        self.rows.get(row)?.get(col)
    }

    /// Just the labels, row by row. Handy for text transports and tests.
    pub fn labels(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|b| b.label.as_str()).collect())
            .collect()
    }
}
