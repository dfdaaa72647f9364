//! Types shared between the object layer and transport implementations.

mod fetch;
mod flag;
mod name;

pub use self::fetch::FetchedMessage;
pub use self::flag::Flag;
pub use self::name::Name;

/// A mailbox-scoped stable numeric identifier for a message, per [RFC 3501
/// section 2.3.1.1](https://tools.ietf.org/html/rfc3501#section-2.3.1.1).
/// Unlike a sequence number it does not shift when other messages are
/// expunged, which is why every mutating operation in this crate addresses
/// messages by UID.
pub type Uid = u32;

/// A transient message sequence number: the message's relative position in
/// its mailbox, from 1, reassigned whenever the mailbox contents change.
pub type Seq = u32;
