use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use scholarshare_domain::id::{IdeaId, UserId};
use scholarshare_domain::user::UserType;

/// What a verification session gates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationContext {
    Registration(RegistrationPayload),
    AdminTypeChange(TypeChangePayload),
}

/// Form data held until the registration code is verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPayload {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Pending privilege change held until the admin's code is verified.
/// The code email goes to the affected user; `admin_name` records who
/// requested the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeChangePayload {
    pub user_id: UserId,
    pub email: String,
    pub full_name: String,
    pub new_type: UserType,
    pub admin_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Verified,
    Expired,
    Cancelled,
}

/// One-time-code session held client-side.
///
/// Exactly one session is active per flow; `start`/`resend` replace it
/// wholesale, which is what invalidates the previous code.
#[derive(Debug, Clone)]
pub struct VerificationSession {
    /// Session id, for log correlation only.
    pub id: Uuid,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub context: VerificationContext,
    pub status: SessionStatus,
}

impl VerificationSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(0) as u64
    }
}

/// Observable state of the background code delivery.
///
/// Delivery failures never invalidate the session: the user may still
/// enter a code that arrived out of band, or resend once the countdown
/// allows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    Idle,
    Sending,
    Sent,
    Failed,
}

/// Verification-code email handed to the delivery collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEmail {
    pub to_name: String,
    pub to_email: String,
    pub code: String,
    /// Set for admin type changes: the admin requesting the change.
    pub requested_by: Option<String>,
}

/// Kind of optimistic mutation issued against an idea; labels log lines
/// and reconciliation outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Like,
    Rate,
}

/// Registration body sent after successful code verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub is_verified: bool,
}

/// Login form body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Events published by the realtime collaborator. Used only to trigger a
/// re-fetch or a notification, never as state of record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealtimeEvent {
    NewIdea { id: IdeaId, title: String },
    LikeIdea { id: IdeaId },
}
