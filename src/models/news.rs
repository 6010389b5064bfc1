use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsPost {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Highlighted posts are pinned prominently on the public site.
    pub highlight: bool,
    pub created_at: NaiveDateTime,
}
