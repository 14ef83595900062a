//! Leaderboard and achievements DTOs.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Aggregate report shown on the home and account screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub total_student_ideas: u64,
    pub total_teacher_ideas: u64,
    #[serde(default)]
    pub top_contributors: Vec<TopContributor>,
}

/// A user ranked by contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopContributor {
    pub user_id: UserId,
    pub full_name: String,
    pub ideas_posted: u64,
    pub likes_received: u64,
    #[serde(default)]
    pub average_rating: f64,
}

impl TopContributor {
    /// Composite contribution score used for display ordering.
    ///
    /// Weights: one point per post, half a point per like received, and the
    /// average rating added directly. The server ranking is authoritative;
    /// this only orders rows client-side when the payload is unsorted.
    pub fn score(&self) -> f64 {
        self.ideas_posted as f64 + self.likes_received as f64 * 0.5 + self.average_rating
    }
}

/// Sort contributors by descending composite score, in place.
pub fn rank_contributors(contributors: &mut [TopContributor]) {
    contributors.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Per-user achievements shown on the account screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievements {
    pub total_ideas: u64,
    pub total_likes: u64,
    #[serde(default)]
    pub top_contributor: bool,
}
