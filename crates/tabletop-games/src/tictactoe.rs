//! Tic-tac-toe on a 3×3 grid.

use tabletop_engine::{DecodeError, Outcome, RuleAdapter};
use tabletop_protocol::{CellStyle, CellView, Coord, Participant};

const SIZE: u32 = 3;

const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    fn seat(self) -> usize {
        match self {
            Self::X => 0,
            Self::O => 1,
        }
    }

    fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToeBoard {
    cells: [[Option<Mark>; 3]; 3],
    to_move: Mark,
}

impl TicTacToeBoard {
    pub fn get(&self, coord: Coord) -> Option<Mark> {
        self.cells[coord.row as usize][coord.col as usize]
    }

    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|line| {
            let [a, b, c] = line.map(|(r, c)| self.cells[r][c]);
            match (a, b, c) {
                (Some(a), Some(b), Some(c)) if a == b && b == c => Some(a),
                _ => None,
            }
        })
    }

    fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }
}

/// Classic noughts and crosses. Seat 0 plays X and moves first.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl RuleAdapter for TicTacToe {
    type Board = TicTacToeBoard;
    type Move = Coord;

    fn name(&self) -> &str {
        "Tic-tac-toe"
    }

    fn initial_state(&self, _participants: &[Participant]) -> TicTacToeBoard {
        TicTacToeBoard {
            cells: [[None; 3]; 3],
            to_move: Mark::X,
        }
    }

    fn decode_move(&self, _board: &TicTacToeBoard, payload: &str) -> Result<Coord, DecodeError> {
        let coord: Coord = payload.parse()?;
        if !coord.within(SIZE, SIZE) {
            return Err(DecodeError::OutOfBounds(coord));
        }
        Ok(coord)
    }

    fn is_legal(&self, board: &TicTacToeBoard, actor: usize, mv: &Coord) -> bool {
        actor == board.to_move.seat() && board.get(*mv).is_none()
    }

    fn apply(&self, board: &TicTacToeBoard, mv: &Coord) -> TicTacToeBoard {
        let mut next = board.clone();
        next.cells[mv.row as usize][mv.col as usize] = Some(board.to_move);
        next.to_move = board.to_move.other();
        next
    }

    fn outcome(&self, board: &TicTacToeBoard) -> Outcome {
        match board.winner() {
            Some(mark) => Outcome::Win(mark.seat()),
            None if board.is_full() => Outcome::Draw,
            None => Outcome::Ongoing,
        }
    }

    fn grid(&self, board: &TicTacToeBoard) -> Vec<Vec<CellView>> {
        board
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Some(mark) => CellView::new(mark.label(), CellStyle::Marked),
                        None => CellView::plain(" "),
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[(u32, u32)]) -> TicTacToeBoard {
        let game = TicTacToe;
        let mut board = game.initial_state(&[]);
        for &(r, c) in moves {
            board = game.apply(&board, &Coord::new(r, c));
        }
        board
    }

    #[test]
    fn test_apply_alternates_marks() {
        let board = play(&[(0, 0), (1, 1)]);
        assert_eq!(board.get(Coord::new(0, 0)), Some(Mark::X));
        assert_eq!(board.get(Coord::new(1, 1)), Some(Mark::O));
        assert_eq!(board.to_move(), Mark::X);
    }

    #[test]
    fn test_is_legal_occupied_cell_rejected() {
        let board = play(&[(0, 0)]);
        assert!(!TicTacToe.is_legal(&board, 1, &Coord::new(0, 0)));
        assert!(TicTacToe.is_legal(&board, 1, &Coord::new(0, 1)));
    }

    #[test]
    fn test_decode_move_off_board_rejected() {
        let board = play(&[]);
        assert!(matches!(
            TicTacToe.decode_move(&board, "3 0"),
            Err(DecodeError::OutOfBounds(_))
        ));
        assert!(matches!(
            TicTacToe.decode_move(&board, "a b"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_outcome_diagonal_win() {
        let board = play(&[(0, 0), (0, 1), (1, 1), (0, 2), (2, 2)]);
        assert_eq!(TicTacToe.outcome(&board), Outcome::Win(0));
    }

    #[test]
    fn test_outcome_column_win_for_o() {
        let board = play(&[(0, 0), (0, 1), (2, 2), (1, 1), (0, 2), (2, 1)]);
        assert_eq!(TicTacToe.outcome(&board), Outcome::Win(1));
    }

    #[test]
    fn test_outcome_full_board_draw() {
        let board = play(&[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ]);
        assert_eq!(TicTacToe.outcome(&board), Outcome::Draw);
    }

    #[test]
    fn test_grid_labels() {
        let board = play(&[(1, 1)]);
        let grid = TicTacToe.grid(&board);
        assert_eq!(grid[1][1].label, "X");
        assert_eq!(grid[1][1].style, CellStyle::Marked);
        assert_eq!(grid[0][0].label, " ");
    }
}
