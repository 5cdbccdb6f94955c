//! Session registry and routing for Tabletop.
//!
//! Each session runs as an isolated Tokio task (actor model) that owns its
//! game state. The registry maps session ids to actor handles and routes
//! every click to the right one.
//!
//! # Key types
//!
//! - [`GameCatalog`]: the set of games new sessions can be started from
//! - [`SessionRegistry`]: creates/discards sessions, routes clicks
//! - [`SessionHandle`]: send commands to a running session actor
//! - [`RegistryConfig`]: channel size, capacity, cleanup policy

mod actor;
mod catalog;
mod config;
mod error;
mod ids;
mod registry;

pub use actor::{SessionHandle, SessionInfo};
pub use catalog::{GameCatalog, GameFactory};
pub use config::RegistryConfig;
pub use error::RegistryError;
pub use ids::SessionIdGenerator;
pub use registry::{RegistryStats, SessionRegistry};
