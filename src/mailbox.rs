use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::connection::MailConnection;
use crate::error::Result;
use crate::message::{Draft, Message};
use crate::query::QueryBuilder;

/// A named mailbox on the remote server.
///
/// The name is fixed at construction. Whether the mailbox actually exists on
/// the server is checked lazily and cached per instance; two `Mailbox`
/// values naming the same folder do not see each other's cache.
pub struct Mailbox<C> {
    conn: Rc<RefCell<C>>,
    name: String,
    exists: Option<bool>,
}

impl<C> fmt::Debug for Mailbox<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox")
            .field("name", &self.name)
            .field("exists", &self.exists)
            .finish_non_exhaustive()
    }
}

impl<C> Clone for Mailbox<C> {
    fn clone(&self) -> Self {
        Mailbox {
            conn: Rc::clone(&self.conn),
            name: self.name.clone(),
            exists: self.exists,
        }
    }
}

impl<C> Mailbox<C> {
    /// The remote folder name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<C: MailConnection> Mailbox<C> {
    pub(crate) fn new(conn: Rc<RefCell<C>>, name: impl Into<String>) -> Mailbox<C> {
        Mailbox {
            conn,
            name: name.into(),
            exists: None,
        }
    }

    pub(crate) fn connection(&self) -> &Rc<RefCell<C>> {
        &self.conn
    }

    /// Whether this mailbox exists on the server.
    ///
    /// Issues a `LIST` scoped to this exact name on first call and caches
    /// the answer; only [`Mailbox::delete`] and [`Mailbox::create`] touch
    /// the cache afterwards.
    pub fn exists(&mut self) -> Result<bool> {
        if let Some(exists) = self.exists {
            return Ok(exists);
        }
        let found = !self.conn.borrow_mut().list("", &self.name)?.is_empty();
        self.exists = Some(found);
        Ok(found)
    }

    /// Creates the mailbox on the server if it does not exist already.
    pub fn create(&mut self) -> Result<()> {
        if !self.exists()? {
            debug!("creating mailbox {}", self.name);
            self.conn.borrow_mut().create(&self.name)?;
            self.exists = Some(true);
        }
        Ok(())
    }

    /// Deletes the mailbox on the server.
    pub fn delete(&mut self) -> Result<()> {
        debug!("deleting mailbox {}", self.name);
        self.conn.borrow_mut().delete(&self.name)?;
        self.exists = Some(false);
        Ok(())
    }

    /// Selects this mailbox, making it the target of subsequent UID-scoped
    /// commands on the shared connection.
    pub fn select(&self) -> Result<()> {
        self.conn.borrow_mut().select(&self.name)
    }

    /// Permanently removes messages flagged `\Deleted`.
    ///
    /// [`Message::delete`] only sets the flag and leaves the message on the
    /// server; this is the other half.
    pub fn expunge(&self) -> Result<()> {
        self.select()?;
        self.conn.borrow_mut().expunge()
    }

    /// A query over this mailbox with no predicates; it matches every
    /// message until narrowed with [`QueryBuilder::filter`].
    pub fn query(&self) -> QueryBuilder<C> {
        QueryBuilder::new(self.clone())
    }

    /// Shorthand for `query().filter(field, value)`.
    pub fn filter(&self, field: &str, value: &str) -> QueryBuilder<C> {
        self.query().filter(field, value)
    }

    /// The first message in the mailbox, in server order, if any.
    pub fn first(&self) -> Result<Option<Message<C>>> {
        self.query().first()
    }

    /// All messages currently in the mailbox.
    ///
    /// Each call runs a fresh query; reuse a [`QueryBuilder`] from
    /// [`Mailbox::query`] to iterate the same memoized result set twice.
    pub fn messages(&self) -> Result<Vec<Message<C>>> {
        self.query().messages()
    }

    /// A handle for the message with the given Message-ID, assumed to live
    /// in this mailbox. Nothing is fetched until the handle is used.
    pub fn message(&self, message_id: impl Into<String>) -> Message<C> {
        Message::reference(Rc::clone(&self.conn), self.clone(), message_id)
    }

    /// Builds a local message bound to this mailbox. See [`Draft`].
    pub fn draft(&self, draft: Draft) -> Result<Message<C>> {
        Message::draft(Rc::clone(&self.conn), self.clone(), draft)
    }
}
