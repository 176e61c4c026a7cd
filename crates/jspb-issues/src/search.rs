use std::sync::LazyLock;

use jspb_decode::{
    Decodable, DecodeErrorKind, Fields, Pattern, integer, literal, record, repeated, rest, shape,
};
use serde::Serialize;

/// One hit of an issue search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueLink {
    pub issue_id: i64,
}

impl Decodable for IssueLink {
    const NAME: &'static str = "IssueLink";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> = LazyLock::new(|| shape![integer(), rest()]);
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        Ok(IssueLink {
            issue_id: fields.integer()?,
        })
    }
}

/// A page of issue search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPage {
    pub links: Vec<IssueLink>,
}

impl Decodable for SearchPage {
    const NAME: &'static str = "SearchPage";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> = LazyLock::new(|| {
            shape![shape![
                literal("b.IssueSearchResponse"),
                repeated(record::<IssueLink>()),
                rest(),
            ]]
        });
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        Ok(SearchPage {
            links: fields.records()?,
        })
    }
}
