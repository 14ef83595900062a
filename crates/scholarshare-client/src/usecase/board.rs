//! Idea-list cache with optimistic like/rate mutations.
//!
//! Contract: apply the local change synchronously, issue the mutation,
//! then either overwrite the entity with the server's authoritative
//! payload or restore the exact pre-mutation snapshot. Never a merge,
//! never a partial rollback. Rollback restores the whole entity, so the
//! in-flight guard is keyed by entity alone: no two mutations on the same
//! idea run concurrently, whatever their kind. Mutations on different
//! entities proceed independently.

use std::collections::HashSet;
use std::sync::Mutex;

use scholarshare_core::retry::{RetryPolicy, retry};
use scholarshare_core::task::Task;

use scholarshare_domain::id::{IdeaId, UserId};
use scholarshare_domain::idea::{FileUpload, Idea, NewIdea, UserSummary};
use scholarshare_domain::report::{Achievements, Report, rank_contributors};
use scholarshare_domain::user::User;

use crate::domain::ports::{EventBus, IdeaApi};
use crate::domain::types::{MutationKind, RealtimeEvent};
use crate::error::ClientError;

pub struct IdeaBoard<A: IdeaApi> {
    api: A,
    retry: RetryPolicy,
    // Single event-loop model: locks are held only for synchronous list
    // edits, never across an await.
    ideas: Mutex<Vec<Idea>>,
    in_flight: Mutex<HashSet<IdeaId>>,
}

impl<A: IdeaApi> IdeaBoard<A> {
    pub fn new(api: A, retry: RetryPolicy) -> Self {
        Self {
            api,
            retry,
            ideas: Mutex::new(Vec::new()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Snapshot of the cached list, most recent first.
    pub fn ideas(&self) -> Vec<Idea> {
        self.ideas.lock().unwrap().clone()
    }

    pub fn idea(&self, idea_id: &IdeaId) -> Option<Idea> {
        self.ideas
            .lock()
            .unwrap()
            .iter()
            .find(|i| &i.id == idea_id)
            .cloned()
    }

    /// True while any mutation is in flight for the entity; the UI
    /// disables the like and rate controls instead of queueing a request.
    pub fn is_in_flight(&self, idea_id: &IdeaId) -> bool {
        self.in_flight.lock().unwrap().contains(idea_id)
    }

    /// Fetch the full list through the retry wrapper and replace the cache
    /// wholesale, ordered most recent first.
    pub async fn load(&self) -> Result<(), ClientError> {
        let api = &self.api;
        let mut list = retry(self.retry, || api.fetch_ideas(), ClientError::is_transient).await?;
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        *self.ideas.lock().unwrap() = list;
        Ok(())
    }

    /// Alias for `load`; re-fetching is always a whole-list replacement.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        self.load().await
    }

    /// Fetch the aggregate report through the retry wrapper, with
    /// contributors ranked by composite score for unsorted payloads.
    pub async fn report(&self) -> Result<Report, ClientError> {
        let api = &self.api;
        let mut report =
            retry(self.retry, || api.fetch_report(), ClientError::is_transient).await?;
        rank_contributors(&mut report.top_contributors);
        Ok(report)
    }

    /// Fetch a user's achievements through the retry wrapper.
    pub async fn achievements(&self, user_id: &UserId) -> Result<Achievements, ClientError> {
        let api = &self.api;
        retry(
            self.retry,
            || api.fetch_achievements(user_id),
            ClientError::is_transient,
        )
        .await
    }

    /// Fetch the ideas posted by one user, most recent first, through the
    /// retry wrapper. Does not touch the cached board list.
    pub async fn user_ideas(&self, user_id: &UserId) -> Result<Vec<Idea>, ClientError> {
        let api = &self.api;
        let mut list = retry(
            self.retry,
            || api.fetch_user_ideas(user_id),
            ClientError::is_transient,
        )
        .await?;
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    /// Optimistically flip `acting_user`'s like on the idea, then reconcile
    /// with the server's returned entity, rolling back on failure.
    pub async fn toggle_like(
        &self,
        idea_id: &IdeaId,
        acting_user: &UserSummary,
    ) -> Result<(), ClientError> {
        self.acquire(idea_id)?;

        let snapshot = {
            let mut ideas = self.ideas.lock().unwrap();
            let Some(idea) = ideas.iter_mut().find(|i| &i.id == idea_id) else {
                self.release(idea_id);
                return Err(ClientError::NotFound);
            };
            let snapshot = idea.clone();
            idea.toggle_like(acting_user);
            snapshot
        };

        let result = self.api.like_idea(idea_id, &acting_user.id).await;
        self.release(idea_id);
        self.reconcile(MutationKind::Like, snapshot, result)
    }

    /// Optimistically upsert `acting_user`'s rating, then reconcile. The
    /// Lecturer capability check happens before this is invoked (see
    /// [`ensure_can_rate`]).
    pub async fn rate(
        &self,
        idea_id: &IdeaId,
        acting_user: &UserSummary,
        rating: u8,
    ) -> Result<(), ClientError> {
        self.acquire(idea_id)?;

        let snapshot = {
            let mut ideas = self.ideas.lock().unwrap();
            let Some(idea) = ideas.iter_mut().find(|i| &i.id == idea_id) else {
                self.release(idea_id);
                return Err(ClientError::NotFound);
            };
            let snapshot = idea.clone();
            if let Err(invalid) = idea.upsert_rating(&acting_user.id, rating) {
                // upsert validates before mutating, so the entity is untouched.
                self.release(idea_id);
                return Err(invalid.into());
            }
            snapshot
        };

        let result = self.api.rate_idea(idea_id, &acting_user.id, rating).await;
        self.release(idea_id);
        self.reconcile(MutationKind::Rate, snapshot, result)
    }

    /// Validate and submit a new idea, then refresh the list through the
    /// retry wrapper. Dropping the returned future mid-flight (modal
    /// dismissed) aborts the underlying request.
    pub async fn submit_idea(
        &self,
        author: &UserSummary,
        draft: &NewIdea,
        files: &[FileUpload],
    ) -> Result<Idea, ClientError> {
        draft.validate()?;
        let created = self
            .api
            .create_idea(author, draft, files)
            .await
            .map_err(ClientError::mutation_failed)?;
        self.load().await?;
        Ok(created)
    }

    fn acquire(&self, idea_id: &IdeaId) -> Result<(), ClientError> {
        let mut in_flight = self.in_flight.lock().unwrap();
        if !in_flight.insert(idea_id.clone()) {
            return Err(ClientError::MutationInFlight);
        }
        Ok(())
    }

    fn release(&self, idea_id: &IdeaId) {
        self.in_flight.lock().unwrap().remove(idea_id);
    }

    /// Full replace-by-server-truth on success, full snapshot restore on
    /// failure. Replacement is keyed by id because list order may have
    /// changed since the optimistic step.
    fn reconcile(
        &self,
        kind: MutationKind,
        snapshot: Idea,
        result: Result<Idea, ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok(authoritative) => {
                self.replace(authoritative);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(idea_id = %snapshot.id, ?kind, error = %err, "mutation failed, rolling back");
                self.replace(snapshot);
                Err(ClientError::mutation_failed(err))
            }
        }
    }

    fn replace(&self, entity: Idea) {
        let mut ideas = self.ideas.lock().unwrap();
        if let Some(slot) = ideas.iter_mut().find(|i| i.id == entity.id) {
            *slot = entity;
        }
    }
}

/// Rating is a Lecturer-only capability, enforced before the controller is
/// invoked.
pub fn ensure_can_rate(user: &User) -> Result<(), ClientError> {
    if user.user_type.can_rate() {
        Ok(())
    } else {
        Err(ClientError::Forbidden)
    }
}

/// Forward realtime events to `on_event` (refresh trigger, toast) until the
/// returned task is dropped.
pub fn watch_events<B, F>(bus: &B, mut on_event: F) -> Task<()>
where
    B: EventBus,
    F: FnMut(RealtimeEvent) + Send + 'static,
{
    let mut events = bus.subscribe();
    Task::spawn(async move {
        while let Ok(event) = events.recv().await {
            on_event(event);
        }
    })
}
