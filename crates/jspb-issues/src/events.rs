//! Messages of an issue's event stream.

use std::sync::LazyLock;

use jspb_decode::{
    Decodable, DecodeErrorKind, Extracted, Fields, Pattern, alternation, ignore, literal, null,
    record, repeated, rest, shape, skip, string,
};
use serde::Serialize;

/// Pattern of a field diff inside an event: the field's key and display name,
/// three unused slots, then the new value nested two levels deep.
fn event_diff(key: &'static str, display_name: &'static str) -> Pattern {
    shape![
        literal("b.EventDiff"),
        literal(key),
        literal(display_name),
        skip(3),
        shape![null(), shape![null(), string()]],
    ]
}

/// The title an issue was filed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueTitleEvent {
    pub title: String,
}

impl Decodable for IssueTitleEvent {
    const NAME: &'static str = "IssueTitleEvent";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> = LazyLock::new(|| event_diff("title", "Title"));
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        Ok(IssueTitleEvent {
            title: fields.string()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueStatusEvent {
    pub status: String,
}

impl Decodable for IssueStatusEvent {
    const NAME: &'static str = "IssueStatusEvent";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> = LazyLock::new(|| event_diff("status", "Status"));
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        Ok(IssueStatusEvent {
            status: fields.string()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueComment {
    pub body: String,
}

impl Decodable for IssueComment {
    const NAME: &'static str = "IssueComment";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> =
            LazyLock::new(|| shape![literal("b.IssueComment"), skip(6), string(), rest()]);
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        Ok(IssueComment {
            body: fields.string()?,
        })
    }
}

/// The event that opened an issue: its title, its initial status and the
/// description body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueTitleMessage {
    pub title: IssueTitleEvent,
    pub status: IssueStatusEvent,
    pub body: IssueComment,
}

impl Decodable for IssueTitleMessage {
    const NAME: &'static str = "IssueTitleMessage";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> = LazyLock::new(|| {
            shape![
                literal("b.IssueEvent"),
                skip(2),
                repeated(alternation([
                    record::<IssueTitleEvent>(),
                    record::<IssueStatusEvent>(),
                    ignore(),
                ])),
                skip(2),
                record::<IssueComment>(),
                rest(),
            ]
        });
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        let mut title = None;
        let mut status = None;
        let mut body = None;
        for item in fields.drain() {
            let record = match item {
                Extracted::Record(record) => record,
                other => return Err(fields.invariant(format!("unexpected {}", other.describe()))),
            };
            let record = match record.downcast::<IssueTitleEvent>() {
                Ok(event) if title.is_none() => {
                    title = Some(event);
                    continue;
                }
                Ok(_) => return Err(fields.invariant("duplicate title events")),
                Err(record) => record,
            };
            let record = match record.downcast::<IssueStatusEvent>() {
                Ok(event) if status.is_none() => {
                    status = Some(event);
                    continue;
                }
                Ok(_) => return Err(fields.invariant("duplicate status events")),
                Err(record) => record,
            };
            match record.downcast::<IssueComment>() {
                Ok(comment) => body = Some(comment),
                Err(record) => {
                    return Err(fields.invariant(format!("unexpected record {}", record.name())));
                }
            }
        }
        Ok(IssueTitleMessage {
            title: title.ok_or_else(|| fields.invariant("title event not found"))?,
            status: status.ok_or_else(|| fields.invariant("status event not found"))?,
            body: body.ok_or_else(|| fields.invariant("description comment not found"))?,
        })
    }
}

/// Any later event carrying comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueReplyMessage {
    pub comments: Vec<IssueComment>,
}

impl Decodable for IssueReplyMessage {
    const NAME: &'static str = "IssueReplyMessage";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> =
            LazyLock::new(|| repeated(alternation([record::<IssueComment>(), ignore()])));
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        let comments = fields.records::<IssueComment>()?;
        if comments.is_empty() {
            return Err(fields.invariant("replies must have at least one comment"));
        }
        Ok(IssueReplyMessage { comments })
    }
}

impl IssueReplyMessage {
    /// All comment bodies of this reply, one per line.
    pub fn text(&self) -> String {
        self.comments
            .iter()
            .map(|comment| comment.body.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
