use std::cell::RefCell;
use std::rc::Rc;

use crate::connection::MailConnection;
use crate::error::Result;
use crate::mailbox::Mailbox;

/// Logical names for the folders most servers agree on, plus the Gmail
/// virtual folders that live under the vendor's hierarchy prefix.
///
/// This is name-resolution sugar, nothing more: each alias resolves to a
/// fixed remote folder name via [`WellKnown::folder`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum WellKnown {
    /// `INBOX`
    Inbox,
    /// `SENT`
    Sent,
    /// `TRASH`
    Trash,
    /// `SPAM`
    Spam,
    /// Gmail's `[Gmail]/All Mail` virtual folder.
    GmailAll,
    /// Gmail's `[Gmail]/Sent` folder.
    GmailSent,
    /// Gmail's `[Gmail]/Trash` folder.
    GmailTrash,
}

impl WellKnown {
    /// The remote folder name this alias resolves to.
    pub fn folder(self) -> &'static str {
        match self {
            WellKnown::Inbox => "INBOX",
            WellKnown::Sent => "SENT",
            WellKnown::Trash => "TRASH",
            WellKnown::Spam => "SPAM",
            WellKnown::GmailAll => "[Gmail]/All Mail",
            WellKnown::GmailSent => "[Gmail]/Sent",
            WellKnown::GmailTrash => "[Gmail]/Trash",
        }
    }
}

/// The mailboxes visible on a connection.
pub struct Mailboxes<C> {
    conn: Rc<RefCell<C>>,
}

impl<C: MailConnection> Mailboxes<C> {
    pub(crate) fn new(conn: Rc<RefCell<C>>) -> Mailboxes<C> {
        Mailboxes { conn }
    }

    /// Enumerates every mailbox the server lists.
    pub fn all(&self) -> Result<Vec<Mailbox<C>>> {
        let names = self.conn.borrow_mut().list("", "*")?;
        Ok(names
            .into_iter()
            .map(|name| Mailbox::new(Rc::clone(&self.conn), name.name()))
            .collect())
    }

    /// A mailbox by its exact remote name. Purely local; existence is not
    /// checked until the mailbox is used.
    pub fn by_name(&self, name: impl Into<String>) -> Mailbox<C> {
        Mailbox::new(Rc::clone(&self.conn), name)
    }

    /// A mailbox by conventional alias. See [`WellKnown`].
    pub fn by_alias(&self, alias: WellKnown) -> Mailbox<C> {
        self.by_name(alias.folder())
    }
}
