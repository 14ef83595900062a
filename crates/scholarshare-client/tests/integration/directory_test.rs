//! User directory tests: retried account listing for the admin screen.

use std::time::Duration;

use scholarshare_client::error::ClientError;
use scholarshare_client::usecase::directory::UserDirectory;

use scholarshare_core::retry::RetryPolicy;

use scholarshare_testing::fixture::{test_lecturer, test_user};

use crate::helpers::MockUserApi;

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        delay: Duration::from_millis(100),
    }
}

#[tokio::test(start_paused = true)]
async fn should_list_users_through_retry() {
    let api = MockUserApi::with_users(vec![
        test_user("u1", "Jane Doe"),
        test_lecturer("l1", "Lena Lecturer"),
    ]);
    api.fail_next_fetches(2);
    let directory = UserDirectory::new(api.clone(), policy());

    let users = directory.list().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].full_name, "Jane Doe");
}

#[tokio::test(start_paused = true)]
async fn should_surface_transport_error_after_listing_budget() {
    let api = MockUserApi::with_users(vec![test_user("u1", "Jane Doe")]);
    api.fail_next_fetches(5);
    let directory = UserDirectory::new(
        api.clone(),
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(100),
        },
    );

    let err = directory.list().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
