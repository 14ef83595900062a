//! User domain types and form-input normalization.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Account type, in ascending order of privilege.
///
/// Wire format: the PascalCase variant name (`"Student"`, `"Lecturer"`,
/// `"Admin"`), matching the REST payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Student,
    Lecturer,
    Admin,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Lecturer => "Lecturer",
            Self::Admin => "Admin",
        }
    }

    /// Parse a wire value. Returns `None` for unknown strings.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "Student" => Some(Self::Student),
            "Lecturer" => Some(Self::Lecturer),
            "Admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Only lecturers may rate ideas.
    pub fn can_rate(self) -> bool {
        matches!(self, Self::Lecturer)
    }

    /// Only admins may change another user's type.
    pub fn can_manage_users(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// A registered account as returned by the users endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(default)]
    pub is_verified: bool,
}

/// Minimum password length accepted by the registration form.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Accepts `local@domain.tld` shapes; rejects whitespace and missing parts.
pub fn validate_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, rest)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || rest.contains('@') {
        return false;
    }
    match rest.rsplit_once('.') {
        Some((domain, tld)) => !domain.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// A full name needs at least two non-empty space-separated parts.
pub fn validate_full_name(name: &str) -> bool {
    let parts: Vec<&str> = name.trim().split(' ').collect();
    parts.len() >= 2 && parts.iter().all(|p| !p.is_empty())
}

/// Title-case each name part: `"jOHN doe"` → `"John Doe"`.
pub fn format_full_name(name: &str) -> String {
    name.trim()
        .split(' ')
        .filter(|p| !p.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Emails are compared and stored lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
