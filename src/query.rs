use std::ops::Range;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::connection::{FetchItems, MailConnection};
use crate::error::Result;
use crate::mailbox::Mailbox;
use crate::message::Message;

lazy_static! {
    static ref MESSAGE_ID: Regex = Regex::new(r"<\S*@\S*>").unwrap();
}

/// Search keys whose lowercase spelling is accepted and normalized to the
/// protocol form. Anything else is passed through verbatim, which leaves the
/// full search syntax reachable.
const SEARCHABLE_HEADERS: [&str; 5] = ["body", "subject", "to", "cc", "from"];

/// A lazily-executed search over one mailbox.
///
/// Predicates accumulate through [`QueryBuilder::filter`]; nothing touches
/// the server until the result set is first needed, at which point the
/// builder runs one `UID SEARCH`, resolves the matching UIDs to Message-IDs
/// in one batched header fetch, and memoizes the resulting [`Message`]
/// handles. Adding another predicate discards the memoized set, so the next
/// access re-runs the search.
///
/// ```no_run
/// # fn demo<C: satchel::MailConnection>(inbox: &satchel::Mailbox<C>) -> satchel::Result<()> {
/// let mut unread = inbox.query().filter("subject", "weekly report").filter_token("UNSEEN");
/// for message in unread.messages()? {
///     println!("{}", message.message_id());
/// }
/// # Ok(())
/// # }
/// ```
pub struct QueryBuilder<C> {
    mailbox: Mailbox<C>,
    criteria: Vec<String>,
    messages: Option<Vec<Message<C>>>,
}

impl<C> std::fmt::Debug for QueryBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("mailbox", &self.mailbox)
            .field("criteria", &self.criteria)
            .finish_non_exhaustive()
    }
}

impl<C: MailConnection> QueryBuilder<C> {
    pub(crate) fn new(mailbox: Mailbox<C>) -> QueryBuilder<C> {
        QueryBuilder {
            mailbox,
            criteria: Vec::new(),
            messages: None,
        }
    }

    /// The mailbox this query runs against.
    pub fn mailbox(&self) -> &Mailbox<C> {
        &self.mailbox
    }

    /// The accumulated search tokens, in the order they will be issued.
    pub fn criteria(&self) -> &[String] {
        &self.criteria
    }

    /// Appends a `field value` predicate.
    ///
    /// The well-known header fields `body`, `subject`, `to`, `cc` and `from`
    /// are case-normalized to their uppercase search-key form; any other
    /// field name is appended untouched, so raw search keys like `SINCE` or
    /// `LARGER` work as well. Invalidates any memoized result set.
    pub fn filter(mut self, field: &str, value: &str) -> Self {
        self.messages = None;
        let field = field.to_string();
        if SEARCHABLE_HEADERS
            .iter()
            .any(|known| field.eq_ignore_ascii_case(known))
        {
            self.criteria.push(field.to_ascii_uppercase());
        } else {
            self.criteria.push(field);
        }
        self.criteria.push(value.to_string());
        self
    }

    /// Appends a single bare search token, e.g. the valueless flag
    /// predicates `ANSWERED` or `UNSEEN`. Invalidates any memoized result
    /// set.
    pub fn filter_token(mut self, token: &str) -> Self {
        self.messages = None;
        self.criteria.push(token.to_string());
        self
    }

    /// Runs the query if it has not run since the last predicate was added,
    /// and returns the memoized result set in server order.
    pub fn execute(&mut self) -> Result<&[Message<C>]> {
        if self.messages.is_none() {
            self.messages = Some(self.resolve()?);
        }
        Ok(self.messages.as_deref().unwrap_or_default())
    }

    /// The first matching message, if any.
    pub fn first(&mut self) -> Result<Option<Message<C>>> {
        Ok(self.execute()?.first().cloned())
    }

    /// The matching message at `index`, or `None` when out of range.
    pub fn at(&mut self, index: usize) -> Result<Option<Message<C>>> {
        Ok(self.execute()?.get(index).cloned())
    }

    /// The matching messages within `range`, clamped to the result set.
    /// An out-of-bounds range yields a short or empty vector, never a panic.
    pub fn slice(&mut self, range: Range<usize>) -> Result<Vec<Message<C>>> {
        let messages = self.execute()?;
        let start = range.start.min(messages.len());
        let end = range.end.min(messages.len()).max(start);
        Ok(messages[start..end].to_vec())
    }

    /// All matching messages, cloned out of the memoized set.
    pub fn messages(&mut self) -> Result<Vec<Message<C>>> {
        Ok(self.execute()?.to_vec())
    }

    fn resolve(&mut self) -> Result<Vec<Message<C>>> {
        self.mailbox.select()?;

        let criteria = if self.criteria.is_empty() {
            vec!["ALL".to_string()]
        } else {
            self.criteria.clone()
        };
        debug!(
            "searching {} for {}",
            self.mailbox.name(),
            criteria.join(" ")
        );
        let uids = self
            .mailbox
            .connection()
            .borrow_mut()
            .uid_search(&criteria)?;

        // nothing matched: skip the fetch round-trip entirely
        if uids.is_empty() {
            return Ok(Vec::new());
        }

        let fetched = self
            .mailbox
            .connection()
            .borrow_mut()
            .uid_fetch(&uids, FetchItems::MessageIdHeader)?;

        let mut handles = Vec::with_capacity(fetched.len());
        for item in fetched {
            let header = match item.header {
                Some(ref header) => String::from_utf8_lossy(header).into_owned(),
                None => {
                    debug!("uid {} returned no header section, skipping", item.uid);
                    continue;
                }
            };
            match MESSAGE_ID.find(&header) {
                Some(found) => handles.push(self.mailbox.message(found.as_str())),
                // a message we cannot correlate later is useless; drop it
                // rather than failing the whole batch
                None => debug!("uid {} has no parsable Message-ID, skipping", item.uid),
            }
        }
        Ok(handles)
    }
}
