//! Co-operative minesweeper.
//!
//! Everyone in the chat plays the same field. There is no flagging: a
//! click on a covered cell uncovers it, and a click on a number "chords",
//! uncovering all of its neighbours once the answer around it is certain.
//! Mines uncovered by a chord show as flags instead of exploding.
//!
//! The field is laid out on the first click so that click is never a
//! mine. Placement is driven by a seed stored in the board, so the same
//! seed and the same first click always produce the same field.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tabletop_engine::{DecodeError, GateKind, Outcome, RuleAdapter, SeatRange};
use tabletop_protocol::{CellStyle, CellView, Coord, Participant};

const MAX_ROWS: u32 = 10;
const MAX_COLS: u32 = 8;
const MIN_SIDE: u32 = 2;

/// Field dimensions. Out-of-range values are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinesweeperConfig {
    pub rows: u32,
    pub cols: u32,
    /// `None` means one mine per ten cells.
    pub mines: Option<u32>,
}

impl Default for MinesweeperConfig {
    fn default() -> Self {
        Self {
            rows: MAX_ROWS,
            cols: MAX_COLS,
            mines: None,
        }
    }
}

impl MinesweeperConfig {
    pub fn new(rows: u32, cols: u32, mines: u32) -> Self {
        Self {
            rows,
            cols,
            mines: Some(mines),
        }
    }

    /// `(rows, cols, mines)` after clamping.
    pub fn clamped(&self) -> (u32, u32, u32) {
        let rows = self.rows.clamp(MIN_SIDE, MAX_ROWS);
        let cols = self.cols.clamp(MIN_SIDE, MAX_COLS);
        let cells = rows * cols;
        let mines = self.mines.unwrap_or(cells / 10).clamp(1, cells - 1);
        (rows, cols, mines)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Covered,
    Uncovered,
    Exploded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    mine: bool,
    adjacent: u8,
    state: CellState,
}

impl Cell {
    const FRESH: Self = Self {
        mine: false,
        adjacent: 0,
        state: CellState::Covered,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minefield {
    rows: u32,
    cols: u32,
    mines: u32,
    seed: u64,
    laid: bool,
    cells: Vec<Cell>,
}

impl Minefield {
    fn new(rows: u32, cols: u32, mines: u32, seed: u64) -> Self {
        Self {
            rows,
            cols,
            mines,
            seed,
            laid: false,
            cells: vec![Cell::FRESH; (rows * cols) as usize],
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn mines(&self) -> u32 {
        self.mines
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether the mines have been placed yet.
    pub fn is_laid(&self) -> bool {
        self.laid
    }

    pub fn state(&self, coord: Coord) -> CellState {
        self.cell(coord).state
    }

    pub fn is_mine(&self, coord: Coord) -> bool {
        self.cell(coord).mine
    }

    /// Number of mines around `coord`.
    pub fn adjacent(&self, coord: Coord) -> u8 {
        self.cell(coord).adjacent
    }

    fn cell(&self, coord: Coord) -> &Cell {
        &self.cells[coord.index(self.cols)]
    }

    fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        &mut self.cells[coord.index(self.cols)]
    }

    fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| Coord::new(r, c)))
    }

    fn neighbours(&self, coord: Coord) -> impl Iterator<Item = Coord> + use<> {
        coord.neighbours(self.rows, self.cols)
    }

    /// Places the mines anywhere except `avoid`, then fills in counts.
    fn lay(&mut self, avoid: Coord) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let skip = avoid.index(self.cols);
        let free = self.cells.len() - 1;
        for mut i in rand::seq::index::sample(&mut rng, free, self.mines as usize) {
            if i >= skip {
                i += 1;
            }
            self.cells[i].mine = true;
        }
        for coord in self.coords() {
            let adjacent = self
                .neighbours(coord)
                .filter(|&n| self.cell(n).mine)
                .count() as u8;
            self.cell_mut(coord).adjacent = adjacent;
        }
        self.laid = true;
        tracing::trace!(seed = self.seed, %avoid, mines = self.mines, "minefield laid");
    }

    /// Uncovers cells, flood-filling across zeros. Mines uncovered this
    /// way are shown as flags, not exploded.
    fn reveal(&mut self, from: impl IntoIterator<Item = Coord>) {
        let mut queue: VecDeque<Coord> = from.into_iter().collect();
        while let Some(coord) = queue.pop_front() {
            let cell = self.cell_mut(coord);
            if cell.state != CellState::Covered {
                continue;
            }
            cell.state = CellState::Uncovered;
            if !cell.mine && cell.adjacent == 0 {
                queue.extend(self.neighbours(coord));
            }
        }
    }

    /// `true` if clicking the uncovered number at `coord` would uncover
    /// its neighbours.
    fn can_chord(&self, coord: Coord) -> bool {
        let cell = self.cell(coord);
        if cell.mine || cell.state != CellState::Uncovered {
            return false;
        }
        let mut covered = 0;
        let mut flagged = 0;
        for n in self.neighbours(coord) {
            let neighbour = self.cell(n);
            match neighbour.state {
                CellState::Uncovered if neighbour.mine => flagged += 1,
                CellState::Uncovered => {}
                CellState::Covered | CellState::Exploded => covered += 1,
            }
        }
        let value = u32::from(cell.adjacent);
        covered > 0 && (flagged == value || covered + flagged == value)
    }

    pub fn exploded(&self) -> bool {
        self.cells.iter().any(|c| c.state == CellState::Exploded)
    }

    pub fn solved(&self) -> bool {
        let safe_uncovered = self
            .cells
            .iter()
            .filter(|c| !c.mine && c.state == CellState::Uncovered)
            .count();
        self.laid && safe_uncovered + self.mines as usize == self.cells.len()
    }
}

/// What a click on the field does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    /// Click on a covered cell.
    Uncover(Coord),
    /// Click on an uncovered number.
    Chord(Coord),
}

/// Co-op minesweeper. Any clicker may act; the turn never moves.
#[derive(Debug, Clone, Default)]
pub struct Minesweeper {
    config: MinesweeperConfig,
    seed: Option<u64>,
}

impl Minesweeper {
    pub fn new(config: MinesweeperConfig) -> Self {
        Self { config, seed: None }
    }

    /// Every session uses `seed` instead of a random one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &MinesweeperConfig {
        &self.config
    }
}

impl RuleAdapter for Minesweeper {
    type Board = Minefield;
    type Move = Sweep;

    fn name(&self) -> &str {
        "Minesweeper"
    }

    fn seats(&self) -> SeatRange {
        SeatRange::at_least(1)
    }

    fn gate(&self) -> GateKind {
        GateKind::Cooperative
    }

    fn initial_state(&self, _participants: &[Participant]) -> Minefield {
        let (rows, cols, mines) = self.config.clamped();
        let seed = self.seed.unwrap_or_else(rand::random);
        Minefield::new(rows, cols, mines, seed)
    }

    fn decode_move(&self, board: &Minefield, payload: &str) -> Result<Sweep, DecodeError> {
        let coord: Coord = payload.parse()?;
        if !coord.within(board.rows, board.cols) {
            return Err(DecodeError::OutOfBounds(coord));
        }
        Ok(match board.state(coord) {
            CellState::Covered => Sweep::Uncover(coord),
            CellState::Uncovered | CellState::Exploded => Sweep::Chord(coord),
        })
    }

    fn is_legal(&self, board: &Minefield, _actor: usize, mv: &Sweep) -> bool {
        match *mv {
            Sweep::Uncover(coord) => board.state(coord) == CellState::Covered,
            Sweep::Chord(coord) => board.can_chord(coord),
        }
    }

    fn apply(&self, board: &Minefield, mv: &Sweep) -> Minefield {
        let mut next = board.clone();
        match *mv {
            Sweep::Uncover(coord) => {
                if !next.laid {
                    next.lay(coord);
                }
                if next.is_mine(coord) {
                    next.cell_mut(coord).state = CellState::Exploded;
                } else {
                    next.reveal([coord]);
                }
            }
            Sweep::Chord(coord) => {
                let around: Vec<Coord> = next.neighbours(coord).collect();
                next.reveal(around);
            }
        }
        next
    }

    fn next_turn(
        &self,
        _board: &Minefield,
        prior: usize,
        _participants: usize,
        _mv: &Sweep,
    ) -> usize {
        prior
    }

    fn outcome(&self, board: &Minefield) -> Outcome {
        if board.exploded() {
            Outcome::Defeat
        } else if board.solved() {
            Outcome::Win(0)
        } else {
            Outcome::Ongoing
        }
    }

    fn grid(&self, board: &Minefield) -> Vec<Vec<CellView>> {
        (0..board.rows)
            .map(|r| {
                (0..board.cols)
                    .map(|c| {
                        let cell = board.cell(Coord::new(r, c));
                        match cell.state {
                            CellState::Exploded => CellView::new("💣", CellStyle::Marked),
                            CellState::Covered => CellView::plain("■"),
                            CellState::Uncovered if cell.mine => {
                                CellView::new("🚩", CellStyle::Marked)
                            }
                            CellState::Uncovered if cell.adjacent == 0 => {
                                CellView::new(" ", CellStyle::Disabled)
                            }
                            CellState::Uncovered => {
                                CellView::new(cell.adjacent.to_string(), CellStyle::Marked)
                            }
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn headline(&self, board: &Minefield, _participants: &[Participant]) -> Option<String> {
        Some(format!("{}x{} {} mines", board.rows, board.cols, board.mines))
    }
}
