//! An object layer over IMAP: mailboxes, lazy queries, and messages as
//! values.
//!
//! This crate sits on top of an authenticated IMAP connection (any type
//! implementing [`MailConnection`]) and turns raw protocol verbs into a
//! small object model:
//!
//! - [`Session`] owns the shared connection and is where everything starts.
//! - [`Mailbox`] names one remote folder and hands out queries and drafts.
//! - [`QueryBuilder`] accumulates search predicates and resolves them
//!   lazily: one `UID SEARCH`, one batched Message-ID fetch, memoized.
//! - [`Message`] is one remote message, correlated by its RFC 5322
//!   Message-ID and resolved to a server UID on demand.
//!
//! ```no_run
//! use satchel::{Draft, Flag, MailConnection, Session, WellKnown};
//!
//! fn demo<C: MailConnection>(connection: C) -> satchel::Result<()> {
//!     let session = Session::new(connection);
//!
//!     // find a message
//!     let inbox = session.mailboxes().by_alias(WellKnown::Inbox);
//!     if let Some(mut message) = inbox.filter("subject", "hello").first()? {
//!         println!("{:?}", message.subject()?);
//!     }
//!
//!     // construct one locally and store it
//!     let mut reply = inbox.draft(
//!         Draft::new()
//!             .header("Subject", "hello back")
//!             .header("To", "someone@example.com")
//!             .body("hi!")
//!             .flag(Flag::Seen),
//!     )?;
//!     reply.save()?;
//!     Ok(())
//! }
//! ```
//!
//! Connecting, TLS and authentication belong to the transport; building
//! MIME bodies belongs to a mail-construction crate. This layer owns
//! message identity, search, and the message lifecycle, nothing else.

mod connection;
mod document;
mod mailbox;
mod mailboxes;
mod message;
mod query;
mod session;
mod types;
mod utils;

pub mod error;

#[cfg(any(test, feature = "test_helpers"))]
pub mod testing;

pub use crate::connection::{FetchItems, MailConnection, StoreAction};
pub use crate::document::Document;
pub use crate::error::{Error, Result};
pub use crate::mailbox::Mailbox;
pub use crate::mailboxes::{Mailboxes, WellKnown};
pub use crate::message::{Draft, Message};
pub use crate::query::QueryBuilder;
pub use crate::session::Session;
pub use crate::types::*;
