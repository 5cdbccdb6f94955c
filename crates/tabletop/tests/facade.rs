//! End-to-end tests through the `Tabletop` front door, using button
//! callbacks exactly as a chat transport would.

use tabletop::prelude::*;
use tabletop::{MINES, OTHELLO, TICTACTOE};

const ANN: PlayerId = PlayerId(100);
const BOB: PlayerId = PlayerId(200);
const EVE: PlayerId = PlayerId(300);

fn pair() -> Vec<Participant> {
    vec![Participant::new(ANN, "ann"), Participant::new(BOB, "bob")]
}

fn callback(view: &RenderView, row: usize, col: usize) -> String {
    view.button(row, col).unwrap().callback.clone()
}

#[test]
fn test_default_games_registered() {
    let table = Tabletop::with_default_games().unwrap();
    let games: Vec<String> = table.games().iter().map(|g| g.to_string()).collect();
    assert_eq!(games, vec![MINES, OTHELLO, TICTACTOE]);
}

#[test]
fn test_builder_duplicate_game_rejected() {
    let result = Tabletop::builder()
        .default_games()
        .game(TICTACTOE, TicTacToe)
        .build();
    assert!(matches!(result, Err(TabletopError::Registry(_))));
}

#[tokio::test]
async fn test_start_unknown_game() {
    let table = Tabletop::with_default_games().unwrap();
    let err = table.start("chess", pair()).await.unwrap_err();
    assert!(matches!(err.as_engine(), Some(EngineError::UnknownGame(_))));
}

#[tokio::test]
async fn test_tictactoe_played_through_callbacks() {
    let table = Tabletop::with_default_games().unwrap();
    let (id, mut view) = table.start(TICTACTOE, pair()).await.unwrap();
    assert_eq!(view.status, "Tic-tac-toe: ann's turn");
    assert_eq!(view.rows.len(), 3);
    for row in &view.rows {
        for button in row {
            assert!(button.callback.len() <= tabletop::protocol::MAX_CALLBACK_LEN);
        }
    }

    // ann (0,0)
    view = table.press(ANN, &callback(&view, 0, 0)).await.unwrap();
    assert_eq!(view.labels()[0][0], "X");

    // ann again out of turn; the view on the table stays put.
    let err = table.press(ANN, &callback(&view, 1, 1)).await.unwrap_err();
    assert!(matches!(err, EngineError::NotYourTurn(_)));
    assert_eq!(table.view(id).await.unwrap(), view);

    // eve isn't playing.
    let err = table.press(EVE, &callback(&view, 1, 1)).await.unwrap_err();
    assert!(matches!(err, EngineError::NotAParticipant(_)));

    // bob (1,1), ann (0,1), bob (2,2), ann (0,2): top row.
    for (who, r, c) in [(BOB, 1, 1), (ANN, 0, 1), (BOB, 2, 2), (ANN, 0, 2)] {
        view = table.press(who, &callback(&view, r, c)).await.unwrap();
    }
    assert!(view.finished);
    assert_eq!(view.status, "Winner: ann");

    let err = table.press(BOB, &callback(&view, 2, 0)).await.unwrap_err();
    assert!(matches!(err, EngineError::SessionTerminal(s) if s == id));

    let stats = table.stats().await;
    assert_eq!(stats.finished, 1);
    assert_eq!(stats.active, 0);
}

#[tokio::test]
async fn test_old_keyboard_is_stale() {
    let table = Tabletop::with_default_games().unwrap();
    let (_, first) = table.start(TICTACTOE, pair()).await.unwrap();
    let view = table.press(ANN, &callback(&first, 0, 0)).await.unwrap();

    // bob answers from the keyboard he saw before ann moved.
    let err = table.press(BOB, &callback(&first, 1, 1)).await.unwrap_err();
    assert!(matches!(err, EngineError::StaleView { expected: 1, got: 0 }));

    assert!(table.press(BOB, &callback(&view, 1, 1)).await.is_ok());
}

#[tokio::test]
async fn test_mines_open_to_everyone() {
    let table = Tabletop::with_default_games().unwrap();
    let (_, view) = table
        .start(MINES, vec![Participant::new(ANN, "ann")])
        .await
        .unwrap();
    assert_eq!(view.rows.len(), 10);
    assert!(view.status.starts_with("10x8 8 mines"));

    let view = table.press(EVE, &callback(&view, 0, 0)).await.unwrap();
    assert_eq!(view.version, 1);
}

#[tokio::test]
async fn test_discard_finished_config() {
    let table = Tabletop::builder()
        .config(RegistryConfig {
            discard_finished: true,
            ..RegistryConfig::default()
        })
        .game("ttt", TicTacToe)
        .build()
        .unwrap();
    let (id, mut view) = table.start("ttt", pair()).await.unwrap();
    for (who, r, c) in [(ANN, 0, 0), (BOB, 1, 0), (ANN, 0, 1), (BOB, 1, 1), (ANN, 0, 2)] {
        view = table.press(who, &callback(&view, r, c)).await.unwrap();
    }
    assert!(view.finished);

    let err = table.press(BOB, &callback(&view, 2, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::SessionNotFound(s) if s == id));
}

#[tokio::test]
async fn test_end_session_then_not_found() {
    let table = Tabletop::with_default_games().unwrap();
    let (id, view) = table.start(OTHELLO, pair()).await.unwrap();
    assert_eq!(view.rows.len(), 8);

    table.end(id).await.unwrap();
    let err = table.press(ANN, &callback(&view, 2, 3)).await.unwrap_err();
    assert!(matches!(err, EngineError::SessionNotFound(_)));
    assert!(matches!(table.info(id).await, Err(EngineError::SessionNotFound(_))));
}

#[test]
fn test_render_view_json_shape() {
    let view = RenderView {
        session: SessionId(1),
        version: 2,
        rows: vec![vec![Button {
            label: "X".into(),
            style: CellStyle::Marked,
            callback: "0000000000000001:2:0 0".into(),
        }]],
        status: "hi".into(),
        finished: false,
    };
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["rows"][0][0]["style"], "marked");
    assert_eq!(json["session"], 1);
}
