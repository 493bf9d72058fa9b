//! Listing Query Types

use serde::{Deserialize, Serialize};

use kernel::id::UserId;

/// Listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostSort {
    /// Most recent first (`created_at` descending)
    #[default]
    Newest,
    /// Highest score first (`upvotes` descending)
    Popular,
}

/// Post listing filter
///
/// The default lists every post, newest first. Ordering tie-breaks are
/// whatever the store returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    /// Case-insensitive title substring
    pub search: Option<String>,
    /// Listing order
    pub sort: PostSort,
    /// Restrict to one author
    pub author: Option<UserId>,
}

impl PostFilter {
    pub fn newest() -> Self {
        Self::default()
    }

    pub fn popular() -> Self {
        Self {
            sort: PostSort::Popular,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn by_author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }
}
