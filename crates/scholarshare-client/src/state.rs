//! Application wiring: config, adapters, and the current session.

use std::sync::Arc;

use scholarshare_core::clock::SystemClock;

use scholarshare_domain::idea::UserSummary;
use scholarshare_domain::user::User;

use crate::config::ClientConfig;
use crate::domain::ports::{SessionStore, UserApi};
use crate::domain::types::Credentials;
use crate::error::ClientError;
use crate::infra::emailjs::EmailJsDelivery;
use crate::infra::realtime::InProcessBus;
use crate::infra::rest::RestApi;
use crate::infra::session::MemorySessionStore;
use crate::usecase::board::{IdeaBoard, ensure_can_rate};
use crate::usecase::directory::UserDirectory;
use crate::usecase::verification::VerificationFlow;

pub struct AppState {
    config: ClientConfig,
    api: RestApi,
    delivery: Arc<EmailJsDelivery>,
    session: MemorySessionStore,
    bus: InProcessBus,
}

impl AppState {
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    pub fn new(config: ClientConfig) -> Self {
        let api = RestApi::new(config.api_base_url.clone());
        let delivery = Arc::new(EmailJsDelivery::new(config.emailjs.clone()));
        Self {
            config,
            api,
            delivery,
            session: MemorySessionStore::new(),
            bus: InProcessBus::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn bus(&self) -> &InProcessBus {
        &self.bus
    }

    /// Fresh board over the shared REST client.
    pub fn idea_board(&self) -> IdeaBoard<RestApi> {
        IdeaBoard::new(self.api.clone(), self.config.retry)
    }

    /// Fresh user directory over the shared REST client.
    pub fn user_directory(&self) -> UserDirectory<RestApi> {
        UserDirectory::new(self.api.clone(), self.config.retry)
    }

    /// Fresh verification flow; one per gated action.
    pub fn verification(&self) -> VerificationFlow<RestApi, EmailJsDelivery, SystemClock> {
        VerificationFlow::new(
            self.api.clone(),
            Arc::clone(&self.delivery),
            SystemClock,
            self.config.code_ttl_secs,
        )
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        let user = self.api.login(credentials).await?;
        self.session.set(&user);
        tracing::info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    pub fn logout(&self) {
        self.session.clear();
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.get()
    }

    /// Rate on behalf of the signed-in user. Rating is Lecturer-only, so
    /// this is the one board operation routed through the session.
    pub async fn rate_idea(
        &self,
        board: &IdeaBoard<RestApi>,
        idea_id: &scholarshare_domain::id::IdeaId,
        rating: u8,
    ) -> Result<(), ClientError> {
        let user = self.current_user().ok_or(ClientError::Forbidden)?;
        ensure_can_rate(&user)?;
        let summary = UserSummary::from(&user);
        board.rate(idea_id, &summary, rating).await
    }
}
