//! Post Write Payloads
//!
//! Typed creation and update payloads for posts. Dynamic field merging
//! is deliberately avoided; every write goes through one of these.

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, ContentResult};

/// Fields for a new post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    /// Post title, required
    pub title: String,
    /// Body text
    pub content: Option<String>,
    /// Attached media, as a URL into the store's object storage
    pub image_url: Option<String>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
            image_url: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Validate the draft before insert
    ///
    /// The title is trimmed; a blank title is rejected.
    pub fn validated(mut self) -> ContentResult<Self> {
        self.title = self.title.trim().to_string();

        if self.title.is_empty() {
            return Err(ContentError::Validation(
                "Title cannot be blank".to_string(),
            ));
        }

        Ok(self)
    }
}

/// Partial post update
///
/// Fields set to `None` are not modified by the write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    /// New title
    pub title: Option<String>,
    /// New body text
    pub content: Option<String>,
    /// New media URL
    pub image_url: Option<String>,
}

impl PostPatch {
    /// Whether the patch modifies anything
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.image_url.is_none()
    }

    /// Validate the patch before merge
    ///
    /// Empty patches and blank titles are rejected.
    pub fn validated(mut self) -> ContentResult<Self> {
        if self.is_empty() {
            return Err(ContentError::Validation(
                "Patch does not modify any field".to_string(),
            ));
        }

        if let Some(title) = self.title.take() {
            let title = title.trim().to_string();

            if title.is_empty() {
                return Err(ContentError::Validation(
                    "Title cannot be blank".to_string(),
                ));
            }

            self.title = Some(title);
        }

        Ok(self)
    }
}
