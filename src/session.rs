use std::cell::RefCell;
use std::rc::Rc;

use crate::connection::MailConnection;
use crate::error::Result;
use crate::mailbox::Mailbox;
use crate::mailboxes::Mailboxes;
use crate::message::{Draft, Message};

/// The entry point: owns the shared connection and hands out mailboxes and
/// messages bound to it.
///
/// Connecting and authenticating are the transport's business; a `Session`
/// takes any already-usable [`MailConnection`]. Everything created from one
/// session shares one connection, and IMAP connections are stateful, so
/// interleaving operations on different mailboxes re-selects as needed but
/// must stay on a single thread.
pub struct Session<C> {
    conn: Rc<RefCell<C>>,
}

impl<C: MailConnection> Session<C> {
    /// Wraps an authenticated connection.
    pub fn new(connection: C) -> Session<C> {
        Session {
            conn: Rc::new(RefCell::new(connection)),
        }
    }

    /// The shared handle to the underlying connection.
    ///
    /// An escape hatch for issuing transport commands this layer does not
    /// model. Anything borrowed from it must be released before the object
    /// layer is used again, or the `RefCell` will panic.
    pub fn connection(&self) -> Rc<RefCell<C>> {
        Rc::clone(&self.conn)
    }

    /// The mailboxes visible on this connection.
    pub fn mailboxes(&self) -> Mailboxes<C> {
        Mailboxes::new(Rc::clone(&self.conn))
    }

    /// A mailbox by its exact remote name.
    pub fn mailbox(&self, name: impl Into<String>) -> Mailbox<C> {
        Mailbox::new(Rc::clone(&self.conn), name)
    }

    /// Builds a local message bound to the named mailbox. See [`Draft`].
    pub fn draft(&self, mailbox: impl Into<String>, draft: Draft) -> Result<Message<C>> {
        self.mailbox(mailbox).draft(draft)
    }
}
