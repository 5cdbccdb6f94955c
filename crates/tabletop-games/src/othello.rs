//! Othello (reversi) on an 8×8 board.
//!
//! A move must flank at least one straight line of opposing discs; every
//! flanked line flips. When the opponent has no legal move the same player
//! goes again, and when neither side can move the game ends and the disc
//! count decides.

use tabletop_engine::{DecodeError, Outcome, RuleAdapter};
use tabletop_protocol::{CellStyle, CellView, Coord, DIRECTIONS, Participant};

const SIZE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disc {
    Black,
    White,
}

impl Disc {
    /// Seat 0 plays black.
    pub fn for_seat(seat: usize) -> Self {
        if seat == 0 { Self::Black } else { Self::White }
    }

    pub fn seat(self) -> usize {
        match self {
            Self::Black => 0,
            Self::White => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Black => "⚫",
            Self::White => "⚪",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OthelloBoard {
    cells: [[Option<Disc>; 8]; 8],
    to_move: Disc,
    over: bool,
}

impl OthelloBoard {
    pub fn get(&self, coord: Coord) -> Option<Disc> {
        self.cells[coord.row as usize][coord.col as usize]
    }

    fn set(&mut self, coord: Coord, disc: Disc) {
        self.cells[coord.row as usize][coord.col as usize] = Some(disc);
    }

    pub fn to_move(&self) -> Disc {
        self.to_move
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Disc counts as `(black, white)`.
    pub fn score(&self) -> (u32, u32) {
        self.cells
            .iter()
            .flatten()
            .fold((0, 0), |(b, w), cell| match cell {
                Some(Disc::Black) => (b + 1, w),
                Some(Disc::White) => (b, w + 1),
                None => (b, w),
            })
    }

    /// The far end of a flankable line from `from` in direction
    /// `(dr, dc)`: the first `disc` after at least one opposing disc.
    fn anchor(&self, from: Coord, (dr, dc): (i32, i32), disc: Disc) -> Option<Coord> {
        let mut flanked = false;
        let mut at = from;
        loop {
            at = at.step(dr, dc, SIZE, SIZE)?;
            match self.get(at) {
                None => return None,
                Some(d) if d == disc => return flanked.then_some(at),
                Some(_) => flanked = true,
            }
        }
    }

    pub fn is_legal_for(&self, coord: Coord, disc: Disc) -> bool {
        self.get(coord).is_none()
            && DIRECTIONS
                .iter()
                .any(|&dir| self.anchor(coord, dir, disc).is_some())
    }

    pub fn has_move(&self, disc: Disc) -> bool {
        all_coords().any(|c| self.is_legal_for(c, disc))
    }

    /// Places `disc` at `coord` and flips every flanked line.
    fn place(&mut self, coord: Coord, disc: Disc) {
        for &(dr, dc) in &DIRECTIONS {
            let Some(anchor) = self.anchor(coord, (dr, dc), disc) else {
                continue;
            };
            let mut at = coord;
            while let Some(next) = at.step(dr, dc, SIZE, SIZE) {
                if next == anchor {
                    break;
                }
                self.set(next, disc);
                at = next;
            }
        }
        self.set(coord, disc);
    }
}

fn all_coords() -> impl Iterator<Item = Coord> {
    (0..SIZE).flat_map(|r| (0..SIZE).map(move |c| Coord::new(r, c)))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Othello;

impl RuleAdapter for Othello {
    type Board = OthelloBoard;
    type Move = Coord;

    fn name(&self) -> &str {
        "Othello"
    }

    fn initial_state(&self, _participants: &[Participant]) -> OthelloBoard {
        let mut cells = [[None; 8]; 8];
        cells[3][3] = Some(Disc::White);
        cells[3][4] = Some(Disc::Black);
        cells[4][3] = Some(Disc::Black);
        cells[4][4] = Some(Disc::White);
        OthelloBoard {
            cells,
            to_move: Disc::Black,
            over: false,
        }
    }

    fn decode_move(&self, _board: &OthelloBoard, payload: &str) -> Result<Coord, DecodeError> {
        let coord: Coord = payload.parse()?;
        if !coord.within(SIZE, SIZE) {
            return Err(DecodeError::OutOfBounds(coord));
        }
        Ok(coord)
    }

    fn is_legal(&self, board: &OthelloBoard, actor: usize, mv: &Coord) -> bool {
        !board.over && actor == board.to_move.seat() && board.is_legal_for(*mv, board.to_move)
    }

    fn apply(&self, board: &OthelloBoard, mv: &Coord) -> OthelloBoard {
        let mut next = board.clone();
        let mover = board.to_move;
        next.place(*mv, mover);

        if next.has_move(mover.opponent()) {
            next.to_move = mover.opponent();
        } else if !next.has_move(mover) {
            next.over = true;
        }
        next
    }

    fn next_turn(
        &self,
        board: &OthelloBoard,
        _prior: usize,
        _participants: usize,
        _mv: &Coord,
    ) -> usize {
        board.to_move.seat()
    }

    fn outcome(&self, board: &OthelloBoard) -> Outcome {
        if !board.over {
            return Outcome::Ongoing;
        }
        let (black, white) = board.score();
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Outcome::Win(Disc::Black.seat()),
            std::cmp::Ordering::Less => Outcome::Win(Disc::White.seat()),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    fn grid(&self, board: &OthelloBoard) -> Vec<Vec<CellView>> {
        (0..SIZE)
            .map(|r| {
                (0..SIZE)
                    .map(|c| {
                        let coord = Coord::new(r, c);
                        match board.get(coord) {
                            Some(disc) => CellView::new(disc.label(), CellStyle::Marked),
                            None if !board.over && board.is_legal_for(coord, board.to_move) => {
                                CellView::new("·", CellStyle::Highlighted)
                            }
                            None => CellView::plain(" "),
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// `"⚫ ann 2 vs 2 bob"`, with the marker on the side to move.
    fn headline(&self, board: &OthelloBoard, participants: &[Participant]) -> Option<String> {
        let name = |seat: usize| participants.get(seat).map_or("?", |p| p.name.as_str());
        let (black, white) = board.score();
        let line = format!("{} {black} vs {white} {}", name(0), name(1));
        Some(match (board.over, board.to_move) {
            (true, _) => line,
            (false, Disc::Black) => format!("⚫ {line}"),
            (false, Disc::White) => format!("{line} ⚪"),
        })
    }
}
