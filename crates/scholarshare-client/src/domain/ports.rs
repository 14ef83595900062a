#![allow(async_fn_in_trait)]

use std::future::Future;

use tokio::sync::broadcast;

use scholarshare_domain::id::{IdeaId, UserId};
use scholarshare_domain::idea::{FileUpload, Idea, NewIdea, UserSummary};
use scholarshare_domain::report::{Achievements, Report};
use scholarshare_domain::user::{User, UserType};

use crate::domain::types::{CodeEmail, Credentials, RealtimeEvent, RegisterUser};
use crate::error::ClientError;

/// Port for the ideas endpoints.
///
/// `like_idea`/`rate_idea` return the authoritative updated entity; the
/// mutation controller overwrites its local copy with it wholesale.
pub trait IdeaApi: Send + Sync {
    async fn fetch_ideas(&self) -> Result<Vec<Idea>, ClientError>;

    /// Multipart create: draft fields plus attached files.
    async fn create_idea(
        &self,
        author: &UserSummary,
        draft: &NewIdea,
        files: &[FileUpload],
    ) -> Result<Idea, ClientError>;

    async fn like_idea(&self, idea_id: &IdeaId, user_id: &UserId) -> Result<Idea, ClientError>;

    async fn rate_idea(
        &self,
        idea_id: &IdeaId,
        user_id: &UserId,
        rating: u8,
    ) -> Result<Idea, ClientError>;

    async fn fetch_user_ideas(&self, user_id: &UserId) -> Result<Vec<Idea>, ClientError>;

    async fn fetch_report(&self) -> Result<Report, ClientError>;

    async fn fetch_achievements(&self, user_id: &UserId) -> Result<Achievements, ClientError>;
}

/// Port for the users endpoints.
pub trait UserApi: Send + Sync {
    async fn register(&self, new_user: &RegisterUser) -> Result<User, ClientError>;

    /// Uniqueness pre-check. `true` means the email is already registered.
    async fn check_existence(&self, email: &str) -> Result<bool, ClientError>;

    async fn change_user_type(
        &self,
        user_id: &UserId,
        new_type: UserType,
    ) -> Result<User, ClientError>;

    async fn login(&self, credentials: &Credentials) -> Result<User, ClientError>;

    async fn fetch_users(&self) -> Result<Vec<User>, ClientError>;
}

/// Port for the email-delivery collaborator.
///
/// Declared with an explicit `Send` future: deliveries run as background
/// tasks owned by the verification flow, which aborts them when superseded
/// by a resend or when the screen is torn down.
pub trait CodeDelivery: Send + Sync {
    fn deliver(&self, email: CodeEmail) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Injected current-session provider (the localStorage analogue).
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<User>;
    fn set(&self, user: &User);
    fn clear(&self);
}

/// Port for the realtime event collaborator.
pub trait EventBus: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent>;
}
