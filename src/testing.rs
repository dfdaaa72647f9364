//! A scripted [`MailConnection`] double for exercising the object layer
//! without a server.
//!
//! Enable the `test_helpers` feature to use it from your own tests:
//!
//! ```toml
//! [dependencies]
//! satchel = { version = "0.2" }
//!
//! [dev-dependencies]
//! # mirror your configuration and add test_helpers
//! satchel = { version = "0.2", features = ["test_helpers"] }
//! ```
//!
//! [`MockConnection`] records every command it receives as a line of text in
//! [`MockConnection::transcript`] and answers queries from queues of scripted
//! results, so a test reads as: script the server, run the code under test,
//! assert on the transcript.

use std::collections::VecDeque;

use chrono::{DateTime, FixedOffset};

use crate::connection::{FetchItems, MailConnection, StoreAction};
use crate::error::{Error, Result};
use crate::types::{FetchedMessage, Flag, Name, Seq, Uid};
use crate::utils::iter_join;

/// A [`MailConnection`] that answers from scripted queues and records what
/// was asked of it.
///
/// Queues are consumed front to back, one entry per call; a call with no
/// scripted entry left answers with an empty result. Commands that return
/// nothing (`create`, `append`, ...) always succeed, except `select` after
/// [`MockConnection::with_select_refused`].
#[derive(Default)]
pub struct MockConnection {
    /// Every command issued so far, in order, in protocol-ish text form.
    pub transcript: Vec<String>,
    lists: VecDeque<Vec<Name>>,
    searches: VecDeque<Vec<Seq>>,
    uid_searches: VecDeque<Vec<Uid>>,
    fetches: VecDeque<Vec<FetchedMessage>>,
    refuse_select: bool,
}

impl MockConnection {
    /// A mock with nothing scripted: every query answers empty.
    pub fn new() -> MockConnection {
        MockConnection::default()
    }

    /// Scripts the result of the next unanswered `LIST`.
    pub fn with_list(mut self, names: Vec<Name>) -> MockConnection {
        self.lists.push_back(names);
        self
    }

    /// Scripts the result of the next unanswered `SEARCH`.
    pub fn with_search(mut self, seqs: Vec<Seq>) -> MockConnection {
        self.searches.push_back(seqs);
        self
    }

    /// Scripts the result of the next unanswered `UID SEARCH`.
    pub fn with_uid_search(mut self, uids: Vec<Uid>) -> MockConnection {
        self.uid_searches.push_back(uids);
        self
    }

    /// Scripts the result of the next unanswered `UID FETCH`.
    pub fn with_fetch(mut self, items: Vec<FetchedMessage>) -> MockConnection {
        self.fetches.push_back(items);
        self
    }

    /// Makes every `SELECT` fail with a `NO` response.
    pub fn with_select_refused(mut self) -> MockConnection {
        self.refuse_select = true;
        self
    }
}

impl MailConnection for MockConnection {
    fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<Name>> {
        self.transcript
            .push(format!("LIST \"{}\" \"{}\"", reference, pattern));
        Ok(self.lists.pop_front().unwrap_or_default())
    }

    fn select(&mut self, mailbox: &str) -> Result<()> {
        if self.refuse_select {
            return Err(Error::No(format!("SELECT {} refused", mailbox)));
        }
        self.transcript.push(format!("SELECT {}", mailbox));
        Ok(())
    }

    fn create(&mut self, mailbox: &str) -> Result<()> {
        self.transcript.push(format!("CREATE {}", mailbox));
        Ok(())
    }

    fn delete(&mut self, mailbox: &str) -> Result<()> {
        self.transcript.push(format!("DELETE {}", mailbox));
        Ok(())
    }

    fn expunge(&mut self) -> Result<()> {
        self.transcript.push("EXPUNGE".to_string());
        Ok(())
    }

    fn search(&mut self, criteria: &[String]) -> Result<Vec<Seq>> {
        self.transcript
            .push(format!("SEARCH {}", criteria.join(" ")));
        Ok(self.searches.pop_front().unwrap_or_default())
    }

    fn uid_search(&mut self, criteria: &[String]) -> Result<Vec<Uid>> {
        self.transcript
            .push(format!("UID SEARCH {}", criteria.join(" ")));
        Ok(self.uid_searches.pop_front().unwrap_or_default())
    }

    fn uid_fetch(&mut self, uids: &[Uid], items: FetchItems) -> Result<Vec<FetchedMessage>> {
        self.transcript
            .push(format!("UID FETCH {} {}", iter_join(uids, ","), items));
        Ok(self.fetches.pop_front().unwrap_or_default())
    }

    fn uid_store(&mut self, uids: &[Uid], action: StoreAction, flags: &[Flag<'_>]) -> Result<()> {
        self.transcript.push(format!(
            "UID STORE {} {} ({})",
            iter_join(uids, ","),
            action,
            iter_join(flags, " ")
        ));
        Ok(())
    }

    fn uid_copy(&mut self, uids: &[Uid], mailbox: &str) -> Result<()> {
        self.transcript
            .push(format!("UID COPY {} {}", iter_join(uids, ","), mailbox));
        Ok(())
    }

    fn append(
        &mut self,
        mailbox: &str,
        content: &[u8],
        flags: &[Flag<'_>],
        date: DateTime<FixedOffset>,
    ) -> Result<()> {
        self.transcript.push(format!(
            "APPEND {} ({}) {} {}",
            mailbox,
            iter_join(flags, " "),
            date.format("%d-%b-%Y %H:%M:%S %z"),
            String::from_utf8_lossy(content)
        ));
        Ok(())
    }
}

/// Parses an IMAP `INTERNALDATE` string, e.g. `"17-Jul-1996 02:44:25 -0700"`.
///
/// Panics on malformed input; it exists to keep test fixtures terse.
pub fn internal_date(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_str(s, "%d-%b-%Y %H:%M:%S %z").expect("valid INTERNALDATE")
}
