//! Schemas for the issue tracker's JSPB responses.
//!
//! Each record type declares where its fields sit in the positional payload.
//! Records whose properties can't be expressed positionally, such as "an
//! issue has exactly one title message", check them in their constructor.

mod events;
mod issue;
mod page;
mod search;

pub use events::{
    IssueComment, IssueReplyMessage, IssueStatusEvent, IssueTitleEvent, IssueTitleMessage,
};
pub use issue::Issue;
pub use page::IssuePage;
pub use search::{IssueLink, SearchPage};
