use std::sync::LazyLock;

use jspb_decode::{
    Decodable, DecodeErrorKind, Extracted, Fields, Pattern, alternation, ignore, literal, record,
    repeated, shape,
};
use serde::Serialize;

use crate::events::{IssueReplyMessage, IssueTitleMessage};

/// Full event stream of one issue.
///
/// Events come in no particular order. Exactly one of them opens the issue;
/// every other event that carries comments is a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuePage {
    pub title: IssueTitleMessage,
    pub replies: Vec<IssueReplyMessage>,
}

impl Decodable for IssuePage {
    const NAME: &'static str = "IssuePage";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> = LazyLock::new(|| {
            shape![shape![
                literal("b.ListIssueEventsResponse"),
                repeated(alternation([
                    record::<IssueTitleMessage>(),
                    record::<IssueReplyMessage>(),
                    ignore(),
                ])),
            ]]
        });
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        let mut title = None;
        let mut replies = Vec::new();
        for item in fields.drain() {
            let record = match item {
                Extracted::Record(record) => record,
                other => return Err(fields.invariant(format!("unexpected {}", other.describe()))),
            };
            match record.downcast::<IssueTitleMessage>() {
                Ok(_) if title.is_some() => return Err(fields.invariant("duplicate titles found")),
                Ok(message) => title = Some(message),
                Err(record) => match record.downcast::<IssueReplyMessage>() {
                    Ok(reply) => replies.push(reply),
                    Err(record) => {
                        return Err(
                            fields.invariant(format!("unexpected record {}", record.name()))
                        );
                    }
                },
            }
        }
        let title = title.ok_or_else(|| fields.invariant("title not found"))?;
        Ok(IssuePage { title, replies })
    }
}
