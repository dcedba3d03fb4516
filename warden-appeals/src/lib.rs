//! HTTP intake for ban appeals.
//!
//! The public appeal form posts each submission here with a shared bearer
//! token; accepted appeals are handed to an [`AppealSink`], which the bot
//! implements by posting into the appeals channel.

mod auth;
pub mod record;
pub mod routes;

pub use record::{AppealRecord, AppealRejection};
pub use routes::{AppealSink, AppealState, router, serve};
