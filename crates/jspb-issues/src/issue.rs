use serde::Serialize;

use crate::page::IssuePage;

/// An issue flattened into plain text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub body: String,
    /// One entry per reply event, its comments joined by newlines.
    pub replies: Vec<String>,
}

impl Issue {
    pub fn from_page(id: i64, page: IssuePage) -> Self {
        let IssuePage { title, replies } = page;
        Issue {
            id,
            title: title.title.title,
            status: title.status.status,
            body: title.body.body,
            replies: replies.iter().map(|reply| reply.text()).collect(),
        }
    }
}
