//! Abort-on-drop wrapper around spawned tasks.
//!
//! Background work tied to a UI screen (code delivery, idea submission)
//! must stop when the screen goes away; a plain `JoinHandle` would keep
//! running after its owner is dropped.

use std::future::Future;

use tokio::task::JoinHandle;

/// A spawned task that is aborted when the wrapper is dropped.
#[derive(Debug)]
pub struct Task<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Task<T> {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }
}

impl<T> Task<T> {
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task. Returns `None` when it was aborted or panicked.
    pub async fn join(mut self) -> Option<T> {
        (&mut self.handle).await.ok()
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
