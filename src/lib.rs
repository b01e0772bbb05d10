//! Interaction core for a chat-platform wagering bot.
//!
//! The crate turns raw platform events (slash commands, button clicks, modal
//! submissions) into replies while keeping player balances and game sessions
//! consistent under concurrent use. The outer platform adapter stays thin:
//! it forwards events to [`dispatcher::Dispatcher::dispatch`] and renders the
//! returned [`platform::Reply`].
//!
//! Layering, bottom up:
//! - [`errors`]: the error type and its user-surfacing policy
//! - [`token`]: the self-describing component token carried in every prompt
//! - [`ledger`] and [`session`]: shared concurrent state
//! - [`games`]: pure engines (slot machine, blackjack, generic)
//! - [`dispatcher`]: event routing and the session lifecycle

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod games;
pub mod ledger;
pub mod platform;
pub mod session;
pub mod token;

pub use config::{BotConfig, ConfigLoader};
pub use dispatcher::Dispatcher;
pub use errors::{BotError, BotResult};
pub use platform::{InteractionEvent, Reply};
