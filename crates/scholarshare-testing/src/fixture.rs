//! Fixture builders for domain values used across client tests.

use chrono::{TimeZone, Utc};

use scholarshare_domain::id::{IdeaId, UserId};
use scholarshare_domain::idea::{Idea, UserSummary};
use scholarshare_domain::user::{User, UserType};

/// A verified student account.
pub fn test_user(id: &str, name: &str) -> User {
    User {
        id: UserId::from(id),
        email: format!("{}@uni.edu", id),
        full_name: name.to_owned(),
        user_type: UserType::Student,
        is_verified: true,
    }
}

/// A lecturer account, for rating paths.
pub fn test_lecturer(id: &str, name: &str) -> User {
    User {
        user_type: UserType::Lecturer,
        ..test_user(id, name)
    }
}

pub fn summary_of(user: &User) -> UserSummary {
    UserSummary {
        id: user.id.clone(),
        full_name: user.full_name.clone(),
        user_type: user.user_type,
    }
}

/// An idea by `author` with the given likers, posted at a fixed instant
/// offset by `minutes_ago` so list-ordering tests are deterministic.
pub fn test_idea(id: &str, author: &User, likers: &[&User], minutes_ago: i64) -> Idea {
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    Idea {
        id: IdeaId::from(id),
        title: format!("Idea {id}"),
        description: "A shared idea for testing".to_owned(),
        user: summary_of(author),
        files: vec![],
        likes: likers.iter().map(|u| summary_of(u)).collect(),
        ratings: vec![],
        created_at: base - chrono::Duration::minutes(minutes_ago),
    }
}
