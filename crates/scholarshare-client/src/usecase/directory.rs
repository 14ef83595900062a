//! User directory for the admin screen.

use scholarshare_core::retry::{RetryPolicy, retry};

use scholarshare_domain::user::User;

use crate::domain::ports::UserApi;
use crate::error::ClientError;

/// Read-only listing of registered accounts, fetched through the retry
/// wrapper. Type changes picked from this list go through the
/// verification flow, not through here.
pub struct UserDirectory<U: UserApi> {
    api: U,
    retry: RetryPolicy,
}

impl<U: UserApi> UserDirectory<U> {
    pub fn new(api: U, retry: RetryPolicy) -> Self {
        Self { api, retry }
    }

    pub async fn list(&self) -> Result<Vec<User>, ClientError> {
        let api = &self.api;
        retry(self.retry, || api.fetch_users(), ClientError::is_transient).await
    }
}
