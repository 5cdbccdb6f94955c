//! The render projector: committed session state → [`RenderView`].
//!
//! Projection is a pure function of the session. It never mutates, and
//! two calls on the same committed state give equal views.

use tabletop_protocol::{Button, CallbackData, Coord, RenderView};

use crate::{GateKind, Outcome, RuleAdapter, Session, SessionStatus};

/// Builds the keyboard and status line for `session`.
pub fn project<R: RuleAdapter>(session: &Session<R>) -> RenderView {
    let id = session.id();
    let version = session.version();

    let rows = session
        .adapter()
        .grid(session.board())
        .into_iter()
        .enumerate()
        .map(|(r, row)| {
            row.into_iter()
                .enumerate()
                .map(|(c, cell)| {
                    let coord = Coord::new(r as u32, c as u32);
                    // 16 hex digits + a u64 version + "row col" stays well
                    // inside the callback limit for any sane board size.
                    let callback = CallbackData::new(id, version, coord.to_string()).to_string();
                    Button {
                        label: cell.label,
                        style: cell.style,
                        callback,
                    }
                })
                .collect()
        })
        .collect();

    RenderView {
        session: id,
        version,
        rows,
        status: status_line(session),
        finished: !session.status().is_active(),
    }
}

fn status_line<R: RuleAdapter>(session: &Session<R>) -> String {
    let adapter = session.adapter();
    let mut lines = Vec::new();

    if let Some(headline) = adapter.headline(session.board(), session.participants()) {
        lines.push(headline);
    }

    match (session.status(), session.gate_kind()) {
        (SessionStatus::Active, GateKind::Strict) => {
            lines.push(format!(
                "{}: {}'s turn",
                adapter.name(),
                seat_name(session, session.current_turn())
            ));
        }
        (SessionStatus::Active, GateKind::Cooperative) => {
            lines.push(format!(
                "{}: {} moves so far",
                adapter.name(),
                session.version()
            ));
        }
        (SessionStatus::Finished(outcome), GateKind::Cooperative) => {
            lines.extend(cooperative_summary(session, outcome));
        }
        (SessionStatus::Finished(Outcome::Win(seat)), GateKind::Strict) => {
            lines.push(format!("Winner: {}", seat_name(session, seat)));
        }
        (SessionStatus::Finished(Outcome::Draw), GateKind::Strict) => {
            lines.push("Draw game.".into());
        }
        (SessionStatus::Finished(_), GateKind::Strict) => {
            lines.push("Game over.".into());
        }
    }

    lines.join("\n")
}

fn seat_name<R: RuleAdapter>(session: &Session<R>, seat: usize) -> &str {
    session
        .participants()
        .get(seat)
        .map_or("?", |p| p.name.as_str())
}

/// Who clicked how often, then a verdict on the final click.
///
/// The verdict depends on whether the final clicker was also the top
/// contributor: the top contributor winning or blowing up is their own
/// doing, anyone else finishing the game snatched or ruined it.
fn cooperative_summary<R: RuleAdapter>(session: &Session<R>, outcome: Outcome) -> Vec<String> {
    let tally = session.tally();
    let mut lines: Vec<String> = tally
        .values()
        .map(|c| format!("{} - {} moves", c.name, c.moves))
        .collect();

    let top = tally
        .values()
        .fold(None, |best: Option<&crate::Contribution>, c| match best {
            Some(b) if b.moves >= c.moves => Some(b),
            _ => Some(c),
        });
    let last = session.last_actor().and_then(|id| tally.get(&id));

    let won = matches!(outcome, Outcome::Win(_));
    let verdict = match (last, top) {
        (Some(last), Some(top)) if last.moves == top.moves => {
            if won {
                format!("{} has won the game!", last.name)
            } else {
                format!("Boom, {} is dead!", last.name)
            }
        }
        (Some(last), Some(top)) => {
            if won {
                format!("{} has snatched it from {}!", last.name, top.name)
            } else {
                format!("{} has ruined it for {}!", last.name, top.name)
            }
        }
        _ => "Game over.".to_string(),
    };
    lines.push(verdict);
    lines
}
