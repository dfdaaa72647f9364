use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IoError;
use std::result;

/// A `Result` whose error side is always [`enum@Error`].
pub type Result<T> = result::Result<T, Error>;

/// A set of errors that can occur while working with remote mailboxes and
/// messages.
///
/// The `Io`, `No`, `Bad` and `ConnectionLost` variants are produced by
/// [`MailConnection`](crate::MailConnection) implementations and pass through
/// this layer untranslated; no retry is ever attempted here. The remaining
/// variants are raised by the object layer itself.
#[derive(Debug)]
pub enum Error {
    /// An `io::Error` raised by the underlying transport.
    Io(IoError),
    /// The server rejected a command with a `NO` response.
    No(String),
    /// The server rejected a command with a `BAD` response.
    Bad(String),
    /// The connection was terminated unexpectedly.
    ConnectionLost,
    /// Resolving a Message-ID against its mailbox returned no matches.
    ///
    /// The message was never saved, has been expunged, or lives in a
    /// different mailbox than the handle believes.
    NotFound(String),
    /// Resolving a Message-ID returned more than one match.
    ///
    /// Message-IDs are expected to be unique per mailbox; this is a broken
    /// invariant and is never silently resolved by picking one match.
    Duplicate {
        /// The colliding Message-ID.
        message_id: String,
        /// How many messages matched it.
        matches: usize,
    },
    /// Fetched or supplied message data could not be parsed.
    Parse(ParseError),
    /// Input data failed validation before any command was issued.
    Validate(ValidateError),
}

impl From<IoError> for Error {
    fn from(err: IoError) -> Error {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => fmt::Display::fmt(e, f),
            Error::No(s) => write!(f, "server responded NO: {}", s),
            Error::Bad(s) => write!(f, "server responded BAD: {}", s),
            Error::ConnectionLost => f.write_str("connection lost"),
            Error::NotFound(id) => write!(f, "no message with Message-ID {}", id),
            Error::Duplicate {
                message_id,
                matches,
            } => write!(f, "{} messages share Message-ID {}", matches, message_id),
            Error::Parse(e) => fmt::Display::fmt(e, f),
            Error::Validate(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Parse(e) => Some(e),
            Error::Validate(e) => Some(e),
            _ => None,
        }
    }
}

/// An error parsing message data.
#[derive(Debug)]
pub enum ParseError {
    /// A message body could not be parsed as an RFC 5322 message.
    Document,
    /// A date value was not in the expected format.
    Date(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Document => f.write_str("unable to parse data as an RFC 5322 message"),
            ParseError::Date(s) => write!(f, "unable to parse date {:?}", s),
        }
    }
}

impl StdError for ParseError {}

/// Invalid character found in input that is about to become part of a
/// command or a message header.
#[derive(Debug)]
pub struct ValidateError(pub char);

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // print the character in debug form because the invalid ones are
        // usually line breaks
        write!(f, "invalid character in input: {:?}", self.0)
    }
}

impl StdError for ValidateError {}
