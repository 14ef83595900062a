//! One-time-code verification flow.
//!
//! Drives the session lifecycle `Pending → {Verified | Expired |
//! Cancelled}` for both contexts (registration and admin type change).
//! Expiry is a pure function of the wall clock, so letting the countdown
//! hit zero rejects even the correct code without any server round-trip.
//! Code delivery runs as a background task owned by the flow; a new
//! `start`/`resend` supersedes it by aborting, never by queueing.

use std::sync::Arc;

use rand::RngExt;
use tokio::sync::watch;
use uuid::Uuid;

use scholarshare_core::clock::Clock;
use scholarshare_core::countdown::Countdown;
use scholarshare_core::task::Task;

use scholarshare_domain::user::{User, UserType, format_full_name, normalize_email};

use crate::domain::ports::{CodeDelivery, UserApi};
use crate::domain::types::{
    CodeEmail, DeliveryState, RegisterUser, SessionStatus, VerificationContext,
    VerificationSession,
};
use crate::error::ClientError;

/// Uniformly random 6-digit code.
fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..=999_999).to_string()
}

/// Result of a successful verification: the completed gated action.
#[derive(Debug)]
pub enum Verified {
    Registered(User),
    TypeChanged(User),
}

pub struct VerificationFlow<U, D, C>
where
    U: UserApi,
    D: CodeDelivery + Send + Sync + 'static,
    C: Clock,
{
    users: U,
    delivery: Arc<D>,
    clock: C,
    ttl_secs: u64,
    session: Option<VerificationSession>,
    delivery_task: Option<Task<()>>,
    delivery_state: watch::Sender<DeliveryState>,
}

impl<U, D, C> VerificationFlow<U, D, C>
where
    U: UserApi,
    D: CodeDelivery + Send + Sync + 'static,
    C: Clock,
{
    pub fn new(users: U, delivery: Arc<D>, clock: C, ttl_secs: u64) -> Self {
        let (delivery_state, _) = watch::channel(DeliveryState::Idle);
        Self {
            users,
            delivery,
            clock,
            ttl_secs,
            session: None,
            delivery_task: None,
            delivery_state,
        }
    }

    /// Open a session: run the uniqueness pre-check (registration only),
    /// generate a code, start the TTL window, and dispatch delivery in the
    /// background. Replaces any previous session, superseding its code and
    /// aborting its in-flight delivery.
    pub async fn start(&mut self, context: VerificationContext) -> Result<(), ClientError> {
        if let VerificationContext::Registration(payload) = &context {
            if self.users.check_existence(&normalize_email(&payload.email)).await? {
                return Err(ClientError::EmailTaken);
            }
        }
        self.open_session(context);
        Ok(())
    }

    /// Check `input` against the live code and run the gated action.
    ///
    /// A missing, cancelled, verified or timed-out session answers
    /// `ExpiredCode` without consulting the stored code. On a match the
    /// session transitions to Verified before the completion call, so a
    /// completion failure can never be recovered by re-entering the code;
    /// the upstream flow must be restarted.
    pub async fn submit_code(&mut self, input: &str) -> Result<Verified, ClientError> {
        let now = self.clock.now();
        let context = {
            let Some(session) = self.session.as_mut() else {
                return Err(ClientError::ExpiredCode);
            };
            if session.status == SessionStatus::Pending && session.is_expired(now) {
                session.status = SessionStatus::Expired;
            }
            if session.status != SessionStatus::Pending {
                return Err(ClientError::ExpiredCode);
            }
            if input != session.code {
                return Err(ClientError::InvalidCode);
            }
            session.status = SessionStatus::Verified;
            tracing::info!(session_id = %session.id, "verification code accepted");
            session.context.clone()
        };
        self.abort_delivery();

        let completed = match &context {
            VerificationContext::Registration(payload) => {
                let new_user = RegisterUser {
                    email: normalize_email(&payload.email),
                    password: payload.password.clone(),
                    full_name: format_full_name(&payload.full_name),
                    user_type: UserType::Student,
                    is_verified: true,
                };
                self.users.register(&new_user).await.map(Verified::Registered)
            }
            VerificationContext::AdminTypeChange(payload) => self
                .users
                .change_user_type(&payload.user_id, payload.new_type)
                .await
                .map(Verified::TypeChanged),
        };
        completed.map_err(ClientError::mutation_failed)
    }

    /// Re-issue the code. Gated on the countdown having reached zero; a
    /// live code cannot be resent. Resets the TTL window and invalidates
    /// the previous code.
    pub fn resend(&mut self) -> Result<(), ClientError> {
        if !self.can_resend() {
            return Err(ClientError::ResendUnavailable);
        }
        let context = match self.session.take() {
            Some(session) => session.context,
            None => return Err(ClientError::ResendUnavailable),
        };
        self.open_session(context);
        Ok(())
    }

    /// Cancel the session unconditionally and abort any in-flight
    /// delivery. The session transitions to Cancelled, which makes both
    /// code entry and resend dead ends; control returns to the
    /// originating form.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.status = SessionStatus::Cancelled;
            tracing::info!(session_id = %session.id, "verification cancelled");
        }
        self.abort_delivery();
        self.delivery_state.send_replace(DeliveryState::Idle);
    }

    /// Current status, with expiry derived from the wall clock.
    pub fn status(&self) -> Option<SessionStatus> {
        let session = self.session.as_ref()?;
        if session.status == SessionStatus::Pending && session.is_expired(self.clock.now()) {
            return Some(SessionStatus::Expired);
        }
        Some(session.status)
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.session
            .as_ref()
            .map(|s| s.remaining_seconds(self.clock.now()))
            .unwrap_or(0)
    }

    /// Resend unlocks only once the countdown has reached zero.
    pub fn can_resend(&self) -> bool {
        self.status() == Some(SessionStatus::Expired)
    }

    /// UI ticker for the live session, counting down once per second.
    /// Returns `None` when there is nothing to count.
    pub fn countdown(&self) -> Option<Countdown> {
        match self.remaining_seconds() {
            0 => None,
            left => Some(Countdown::start(left)),
        }
    }

    /// Latest observed delivery state.
    pub fn delivery_state(&self) -> DeliveryState {
        *self.delivery_state.borrow()
    }

    /// Subscribe to delivery-state changes (Sending → Sent/Failed).
    pub fn watch_delivery(&self) -> watch::Receiver<DeliveryState> {
        self.delivery_state.subscribe()
    }

    fn open_session(&mut self, context: VerificationContext) {
        let now = self.clock.now();
        let session = VerificationSession {
            id: Uuid::new_v4(),
            code: generate_code(),
            issued_at: now,
            expires_at: now + chrono::Duration::seconds(self.ttl_secs as i64),
            context,
            status: SessionStatus::Pending,
        };
        tracing::info!(
            session_id = %session.id,
            ttl_secs = self.ttl_secs,
            "verification session opened"
        );
        self.dispatch_delivery(&session);
        self.session = Some(session);
    }

    /// Spawn the code email as a background task, aborting any previous
    /// in-flight send first (supersede, never queue). The task reports
    /// through the delivery-state channel; an aborted task reports nothing.
    fn dispatch_delivery(&mut self, session: &VerificationSession) {
        self.abort_delivery();

        let email = match &session.context {
            VerificationContext::Registration(payload) => CodeEmail {
                to_name: format_full_name(&payload.full_name),
                to_email: normalize_email(&payload.email),
                code: session.code.clone(),
                requested_by: None,
            },
            VerificationContext::AdminTypeChange(payload) => CodeEmail {
                to_name: format_full_name(&payload.full_name),
                to_email: normalize_email(&payload.email),
                code: session.code.clone(),
                requested_by: Some(payload.admin_name.clone()),
            },
        };

        // send_replace stores the value even while nobody subscribes, so
        // delivery_state() stays truthful without a live receiver.
        self.delivery_state.send_replace(DeliveryState::Sending);
        let delivery = Arc::clone(&self.delivery);
        let state = self.delivery_state.clone();
        let session_id = session.id;
        self.delivery_task = Some(Task::spawn(async move {
            match delivery.deliver(email).await {
                Ok(()) => {
                    tracing::info!(session_id = %session_id, "verification code sent");
                    state.send_replace(DeliveryState::Sent);
                }
                Err(err) => {
                    // The session stays usable: the code may still arrive out
                    // of band, and resend unlocks once the countdown ends.
                    tracing::warn!(session_id = %session_id, error = %err, "code delivery failed");
                    state.send_replace(DeliveryState::Failed);
                }
            }
        }));
    }

    fn abort_delivery(&mut self) {
        if let Some(task) = self.delivery_task.take() {
            task.abort();
        }
    }
}
