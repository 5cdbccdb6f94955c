//! Shared value types for Tabletop.
//!
//! This crate defines what flows across the boundary between a chat
//! transport and the game engine:
//!
//! - **Identity** ([`PlayerId`], [`SessionId`], [`GameKind`],
//!   [`Participant`]): who is playing what.
//! - **Input** ([`ClickEvent`], [`Coord`], [`CallbackData`]): a button
//!   press and the string packed into the button.
//! - **Output** ([`RenderView`], [`Button`], [`CellView`]): the
//!   keyboard and status line to show after each transition.
//! - **Codec** ([`Codec`], [`JsonCodec`]): bytes for transports that
//!   need them.
//!
//! ```text
//! Transport (callback string) → Protocol (ClickEvent) → Registry → Engine
//! ```

mod callback;
mod codec;
mod error;
mod types;
mod view;

pub use callback::{CallbackData, MAX_CALLBACK_LEN};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClickEvent, Coord, DIRECTIONS, GameKind, ParseCoordError, Participant, PlayerId,
    SessionId,
};
pub use view::{Button, CellStyle, CellView, RenderView};
