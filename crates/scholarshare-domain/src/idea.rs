//! Idea (post) domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{FileId, IdeaId, UserId};
use crate::user::{User, UserType};

/// Maximum idea title length, in characters.
pub const TITLE_MAX_CHARS: usize = 30;

/// Maximum idea description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 300;

/// Valid rating range (inclusive).
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

/// Domain validation errors for idea drafts and ratings.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("title is required")]
    TitleRequired,
    #[error("title exceeds {TITLE_MAX_CHARS} characters")]
    TitleTooLong,
    #[error("description is required")]
    DescriptionRequired,
    #[error("description exceeds {DESCRIPTION_MAX_CHARS} characters")]
    DescriptionTooLong,
    #[error("rating must be between {RATING_MIN} and {RATING_MAX}")]
    RatingOutOfRange,
}

/// Author or liker summary embedded in idea payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub full_name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            user_type: user.user_type,
        }
    }
}

/// One lecturer rating. At most one entry per user; a re-rate overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEntry {
    pub user_id: UserId,
    pub rating: u8,
}

/// File attached to an idea; contents are fetched separately by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaFile {
    #[serde(rename = "_id")]
    pub id: FileId,
    pub file_name: String,
}

/// A posted idea as returned by the ideas endpoints.
///
/// `likes` is a set keyed by user id; `ratings` carries at most one entry
/// per user. Between an optimistic update and its reconciliation these may
/// diverge from server truth, after which the server payload replaces the
/// whole entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    #[serde(rename = "_id")]
    pub id: IdeaId,
    pub title: String,
    pub description: String,
    pub user: UserSummary,
    #[serde(default)]
    pub files: Vec<IdeaFile>,
    #[serde(default)]
    pub likes: Vec<UserSummary>,
    #[serde(default)]
    pub ratings: Vec<RatingEntry>,
    pub created_at: DateTime<Utc>,
}

impl Idea {
    /// Derived like count; always `likes.len()`.
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user_id: &UserId) -> bool {
        self.likes.iter().any(|l| &l.id == user_id)
    }

    /// Flip `user`'s membership in the like set. Uniqueness is by user id.
    pub fn toggle_like(&mut self, user: &UserSummary) {
        if self.is_liked_by(&user.id) {
            self.likes.retain(|l| l.id != user.id);
        } else {
            self.likes.push(user.clone());
        }
    }

    /// Insert or overwrite `user_id`'s rating.
    pub fn upsert_rating(&mut self, user_id: &UserId, rating: u8) -> Result<(), DomainError> {
        if !(RATING_MIN..=RATING_MAX).contains(&rating) {
            return Err(DomainError::RatingOutOfRange);
        }
        match self.ratings.iter_mut().find(|r| &r.user_id == user_id) {
            Some(entry) => entry.rating = rating,
            None => self.ratings.push(RatingEntry {
                user_id: user_id.clone(),
                rating,
            }),
        }
        Ok(())
    }

    /// Mean of all ratings, or `None` when unrated.
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: u32 = self.ratings.iter().map(|r| u32::from(r.rating)).sum();
        Some(f64::from(sum) / self.ratings.len() as f64)
    }
}

/// Draft for a new idea; validated before submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIdea {
    pub title: String,
    pub description: String,
}

impl NewIdea {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::TitleRequired);
        }
        if self.title.chars().count() > TITLE_MAX_CHARS {
            return Err(DomainError::TitleTooLong);
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::DescriptionRequired);
        }
        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(DomainError::DescriptionTooLong);
        }
        Ok(())
    }
}

/// File selected for upload alongside a new idea.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
