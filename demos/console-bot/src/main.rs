//! A line-driven stand-in for a chat transport.
//!
//! Each stdin line is a command; "buttons" are pressed by naming the cell
//! on the last keyboard shown for a session, so stale-keyboard behaviour
//! is the same as in a real chat.

use std::collections::HashMap;
use std::str::FromStr;

use tabletop::prelude::*;
use tabletop::protocol::{Codec, JsonCodec};
use tabletop::{MINES, OTHELLO, TICTACTOE};
use tokio::io::{AsyncBufReadExt, BufReader};

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum Command {
    Games,
    New { game: String, players: Vec<Participant> },
    Tap { player: PlayerId, session: SessionId, row: usize, col: usize },
    Press { player: PlayerId, callback: String },
    Show(SessionId),
    Json(SessionId),
    End(SessionId),
    Stats,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  games                                list games
  new <game> <id>=<name> ...           start a game
  tap <player> <session> <row> <col>   press a cell on the last keyboard
  press <player> <callback>            press a raw callback string
  show <session>                       print the current keyboard
  json <session>                       print the current view as JSON
  end <session>                        discard a session
  stats                                session counts
  quit";

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or("empty line")?;
        let rest: Vec<&str> = words.collect();

        let player = |s: &str| -> Result<PlayerId, String> {
            s.parse().map(PlayerId).map_err(|_| format!("bad player id {s:?}"))
        };
        let session = |s: &str| -> Result<SessionId, String> {
            s.parse().map_err(|_| format!("bad session id {s:?}"))
        };
        let index = |s: &str| -> Result<usize, String> {
            s.parse().map_err(|_| format!("bad cell index {s:?}"))
        };

        match (verb, rest.as_slice()) {
            ("games", []) => Ok(Self::Games),
            ("new", &[game, ref seats @ ..]) if !seats.is_empty() => {
                let players = seats
                    .iter()
                    .map(|seat| {
                        let (id, name) = seat
                            .split_once('=')
                            .ok_or_else(|| format!("expected <id>=<name>, got {seat:?}"))?;
                        Ok(Participant::new(player(id)?, name))
                    })
                    .collect::<Result<_, String>>()?;
                Ok(Self::New {
                    game: game.to_string(),
                    players,
                })
            }
            ("tap", &[p, s, r, c]) => Ok(Self::Tap {
                player: player(p)?,
                session: session(s)?,
                row: index(r)?,
                col: index(c)?,
            }),
            ("press", &[p, callback]) => Ok(Self::Press {
                player: player(p)?,
                callback: callback.to_string(),
            }),
            ("show", &[s]) => Ok(Self::Show(session(s)?)),
            ("json", &[s]) => Ok(Self::Json(session(s)?)),
            ("end", &[s]) => Ok(Self::End(session(s)?)),
            ("stats", []) => Ok(Self::Stats),
            ("help", []) => Ok(Self::Help),
            ("quit" | "exit", []) => Ok(Self::Quit),
            _ => Err(format!("don't understand {line:?}; try `help`")),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq)]
struct Settings {
    registry: RegistryConfig,
    mines: MinesweeperConfig,
}

impl Settings {
    fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `TABLETOP_*` variables; unparsable values keep the default.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        fn read<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str, into: &mut T) {
            if let Some(raw) = get(key) {
                match raw.parse() {
                    Ok(value) => *into = value,
                    Err(_) => tracing::warn!(key, value = %raw, "ignoring unparsable setting"),
                }
            }
        }

        let mut s = Self::default();
        read(&get, "TABLETOP_MAX_SESSIONS", &mut s.registry.max_sessions);
        read(&get, "TABLETOP_CHANNEL_SIZE", &mut s.registry.channel_size);
        read(&get, "TABLETOP_DISCARD_FINISHED", &mut s.registry.discard_finished);
        read(&get, "TABLETOP_MINES_ROWS", &mut s.mines.rows);
        read(&get, "TABLETOP_MINES_COLS", &mut s.mines.cols);
        if let Some(raw) = get("TABLETOP_MINES_COUNT") {
            match raw.parse() {
                Ok(count) => s.mines.mines = Some(count),
                Err(_) => tracing::warn!(
                    key = "TABLETOP_MINES_COUNT",
                    value = %raw,
                    "ignoring unparsable setting"
                ),
            }
        }
        s
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(view: &RenderView) -> String {
    let mut out = format!("[{}] v{}\n", view.session, view.version);
    for row in &view.rows {
        for button in row {
            out.push('[');
            out.push_str(&button.label);
            out.push(']');
        }
        out.push('\n');
    }
    out.push_str(&view.status);
    if view.finished {
        out.push_str("\n(finished)");
    }
    out
}

// ---------------------------------------------------------------------------
// Bot loop
// ---------------------------------------------------------------------------

/// What the console remembers between lines: the last keyboard shown for
/// each session, like the messages sitting in a chat.
struct Console {
    table: Tabletop,
    shown: HashMap<SessionId, RenderView>,
}

impl Console {
    fn new(table: Tabletop) -> Self {
        Self {
            table,
            shown: HashMap::new(),
        }
    }

    /// Runs one command and returns the text to print, or `None` to quit.
    async fn execute(&mut self, command: Command) -> Option<String> {
        let reply = match command {
            Command::Quit => return None,
            Command::Help => HELP.to_string(),
            Command::Games => self
                .table
                .games()
                .iter()
                .map(|g| g.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            Command::New { game, players } => match self.table.start(&game, players).await {
                Ok((id, view)) => self.show(id, view),
                Err(e) => format!("! {e}"),
            },
            Command::Tap {
                player,
                session,
                row,
                col,
            } => {
                let Some(button) = self.shown.get(&session).and_then(|v| v.button(row, col)) else {
                    return Some(format!("! no button at {row} {col} for {session}"));
                };
                let callback = button.callback.clone();
                self.press(player, &callback).await
            }
            Command::Press { player, callback } => self.press(player, &callback).await,
            Command::Show(id) => match self.table.view(id).await {
                Ok(view) => self.show(id, view),
                Err(e) => format!("! {e}"),
            },
            Command::Json(id) => match self.table.view(id).await {
                Ok(view) => match JsonCodec.encode(&view) {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                    Err(e) => format!("! {e}"),
                },
                Err(e) => format!("! {e}"),
            },
            Command::End(id) => match self.table.end(id).await {
                Ok(()) => {
                    self.shown.remove(&id);
                    format!("ended {id}")
                }
                Err(e) => format!("! {e}"),
            },
            Command::Stats => {
                let stats = self.table.stats().await;
                format!(
                    "{} sessions: {} active, {} finished",
                    stats.total(),
                    stats.active,
                    stats.finished
                )
            }
        };
        Some(reply)
    }

    async fn press(&mut self, player: PlayerId, callback: &str) -> String {
        match self.table.press(player, callback).await {
            Ok(view) => self.show(view.session, view),
            Err(EngineError::SessionNotFound(id)) => {
                self.shown.remove(&id);
                format!("! game {id} is gone")
            }
            Err(e) => format!("! {e}"),
        }
    }

    fn show(&mut self, id: SessionId, view: RenderView) -> String {
        let text = render(&view);
        self.shown.insert(id, view);
        text
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tabletop::init_tracing_with("warn");

    let settings = Settings::from_env();
    let table = Tabletop::builder()
        .config(settings.registry)
        .game(TICTACTOE, TicTacToe)
        .game(OTHELLO, Othello)
        .game(MINES, Minesweeper::new(settings.mines))
        .build()?;

    let mut console = Console::new(table.clone());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match line.parse::<Command>() {
            Ok(command) => console.execute(command).await,
            Err(e) => Some(format!("! {e}")),
        };
        match reply {
            Some(text) => println!("{text}"),
            None => break,
        }
    }

    table.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new_with_players() {
        let cmd: Command = "new tictactoe 1=ann 2=bob".parse().unwrap();
        assert_eq!(
            cmd,
            Command::New {
                game: "tictactoe".into(),
                players: vec![
                    Participant::new(PlayerId(1), "ann"),
                    Participant::new(PlayerId(2), "bob"),
                ],
            }
        );
    }

    #[test]
    fn test_parse_tap() {
        let cmd: Command = "tap 7 00000000000000ff 2 1".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Tap {
                player: PlayerId(7),
                session: SessionId(0xff),
                row: 2,
                col: 1,
            }
        );
    }

    #[test]
    fn test_parse_json() {
        let cmd: Command = "json 0000000000000010".parse().unwrap();
        assert_eq!(cmd, Command::Json(SessionId(0x10)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("new tictactoe".parse::<Command>().is_err());
        assert!("new tictactoe ann".parse::<Command>().is_err());
        assert!("tap x 1 2 3".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }

    #[test]
    fn test_settings_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("TABLETOP_MAX_SESSIONS", "5"),
            ("TABLETOP_DISCARD_FINISHED", "true"),
            ("TABLETOP_MINES_ROWS", "4"),
            ("TABLETOP_MINES_COUNT", "3"),
            ("TABLETOP_CHANNEL_SIZE", "lots"),
        ]
        .into_iter()
        .collect();
        let s = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(s.registry.max_sessions, 5);
        assert!(s.registry.discard_finished);
        assert_eq!(s.registry.channel_size, 64);
        assert_eq!(s.mines.clamped(), (4, 8, 3));
    }

    #[test]
    fn test_render_marks_finished() {
        let view = RenderView {
            session: SessionId(1),
            version: 3,
            rows: vec![vec![
                Button {
                    label: "X".into(),
                    style: CellStyle::Marked,
                    callback: String::new(),
                },
                Button {
                    label: " ".into(),
                    style: CellStyle::Plain,
                    callback: String::new(),
                },
            ]],
            status: "Winner: ann".into(),
            finished: true,
        };
        assert_eq!(
            render(&view),
            "[0000000000000001] v3\n[X][ ]\nWinner: ann\n(finished)"
        );
    }

    #[tokio::test]
    async fn test_console_plays_through_taps() {
        let table = Tabletop::with_default_games().unwrap();
        let mut console = Console::new(table);

        let out = console
            .execute("new tictactoe 1=ann 2=bob".parse().unwrap())
            .await
            .unwrap();
        assert!(out.ends_with("Tic-tac-toe: ann's turn"));
        let id = *console.shown.keys().next().unwrap();

        let tap = |p: u64, r: usize, c: usize| Command::Tap {
            player: PlayerId(p),
            session: id,
            row: r,
            col: c,
        };
        let out = console.execute(tap(1, 0, 0)).await.unwrap();
        assert!(out.contains("[X][ ][ ]"));

        let out = console.execute(tap(1, 1, 1)).await.unwrap();
        assert!(out.starts_with("! "), "{out}");

        let out = console.execute(Command::Stats).await.unwrap();
        assert_eq!(out, "1 sessions: 1 active, 0 finished");

        let out = console.execute(Command::Json(id)).await.unwrap();
        assert!(out.starts_with('{'), "{out}");
        assert!(out.contains(r#""status":"Tic-tac-toe: bob's turn""#), "{out}");
        assert!(out.contains(r#""version":1"#), "{out}");

        assert!(console.execute(Command::Quit).await.is_none());
    }
}
