//! Verification flow tests: session lifecycle, countdown expiry, resend,
//! and the gated completion actions.

use std::sync::Arc;
use std::time::Duration;

use scholarshare_client::domain::types::{
    DeliveryState, RegistrationPayload, SessionStatus, TypeChangePayload, VerificationContext,
};
use scholarshare_client::error::ClientError;
use scholarshare_client::usecase::verification::{VerificationFlow, Verified};

use scholarshare_domain::id::UserId;
use scholarshare_domain::user::UserType;

use scholarshare_testing::clock::FakeClock;
use scholarshare_testing::fixture::test_user;

use crate::helpers::{MockDelivery, MockUserApi};

const TTL: u64 = 180;

fn flow(
    users: &MockUserApi,
    delivery: &MockDelivery,
    clock: &FakeClock,
) -> VerificationFlow<MockUserApi, MockDelivery, FakeClock> {
    VerificationFlow::new(
        users.clone(),
        Arc::new(delivery.clone()),
        clock.clone(),
        TTL,
    )
}

fn registration() -> VerificationContext {
    VerificationContext::Registration(RegistrationPayload {
        email: "Jane.Doe@Uni.EDU".to_owned(),
        full_name: "jane dOE".to_owned(),
        password: "hunter22".to_owned(),
    })
}

/// Let the spawned delivery task run, then read the latest recorded code.
async fn sent_code(delivery: &MockDelivery) -> String {
    tokio::time::sleep(Duration::from_millis(5)).await;
    let sent = delivery.sent_handle();
    let sent = sent.lock().unwrap();
    sent.last().expect("no code delivered").code.clone()
}

#[tokio::test(start_paused = true)]
async fn should_deliver_normalized_code_email_on_start() {
    let users = MockUserApi::new();
    let delivery = MockDelivery::new();
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    flow.start(registration()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let sent = delivery.sent_handle();
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_email, "jane.doe@uni.edu");
    assert_eq!(sent[0].to_name, "Jane Doe");
    assert_eq!(sent[0].code.len(), 6);
    assert_eq!(sent[0].requested_by, None);
    assert_eq!(flow.delivery_state(), DeliveryState::Sent);
    assert_eq!(flow.status(), Some(SessionStatus::Pending));
    assert_eq!(flow.remaining_seconds(), TTL);
}

#[tokio::test(start_paused = true)]
async fn should_reject_taken_email_before_opening_session() {
    let users = MockUserApi::with_users(vec![test_user("u1", "Jane Doe")]);
    let delivery = MockDelivery::new();
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    let taken = VerificationContext::Registration(RegistrationPayload {
        email: "U1@Uni.Edu".to_owned(),
        full_name: "Jane Doe".to_owned(),
        password: "hunter22".to_owned(),
    });
    let err = flow.start(taken).await.unwrap_err();
    assert!(matches!(err, ClientError::EmailTaken));

    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(flow.status(), None);
    assert!(delivery.sent_handle().lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn should_register_with_normalized_payload_on_code_match() {
    let users = MockUserApi::new();
    let delivery = MockDelivery::new();
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    flow.start(registration()).await.unwrap();
    let code = sent_code(&delivery).await;

    let verified = flow.submit_code(&code).await.unwrap();
    let Verified::Registered(user) = verified else {
        panic!("expected a registration");
    };
    assert_eq!(user.email, "jane.doe@uni.edu");

    let registered = users.registered_handle();
    let registered = registered.lock().unwrap();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].email, "jane.doe@uni.edu");
    assert_eq!(registered[0].full_name, "Jane Doe");
    assert_eq!(registered[0].user_type, UserType::Student);
    assert!(registered[0].is_verified);
    assert_eq!(flow.status(), Some(SessionStatus::Verified));
}

#[tokio::test(start_paused = true)]
async fn should_keep_session_pending_on_wrong_code() {
    let users = MockUserApi::new();
    let delivery = MockDelivery::new();
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    flow.start(registration()).await.unwrap();
    let code = sent_code(&delivery).await;
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let err = flow.submit_code(wrong).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidCode));
    assert_eq!(flow.status(), Some(SessionStatus::Pending));
    assert!(users.registered_handle().lock().unwrap().is_empty());

    // The session survives the miss, so the right code still works.
    assert!(flow.submit_code(&code).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn should_expire_correct_code_without_server_call() {
    let users = MockUserApi::new();
    let delivery = MockDelivery::new();
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    flow.start(registration()).await.unwrap();
    let code = sent_code(&delivery).await;

    clock.advance_secs(TTL as i64);
    assert_eq!(flow.status(), Some(SessionStatus::Expired));
    assert_eq!(flow.remaining_seconds(), 0);

    let err = flow.submit_code(&code).await.unwrap_err();
    assert!(matches!(err, ClientError::ExpiredCode));
    assert!(users.registered_handle().lock().unwrap().is_empty());
    assert!(flow.can_resend());
}

#[tokio::test(start_paused = true)]
async fn should_block_resend_while_code_is_live() {
    let users = MockUserApi::new();
    let delivery = MockDelivery::new();
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    flow.start(registration()).await.unwrap();
    clock.advance_secs(TTL as i64 - 1);
    assert!(!flow.can_resend());
    let err = flow.resend().unwrap_err();
    assert!(matches!(err, ClientError::ResendUnavailable));
}

#[tokio::test(start_paused = true)]
async fn should_invalidate_old_code_on_resend() {
    let users = MockUserApi::new();
    let delivery = MockDelivery::new();
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    flow.start(registration()).await.unwrap();
    let old_code = sent_code(&delivery).await;

    clock.advance_secs(TTL as i64);
    flow.resend().unwrap();
    let new_code = sent_code(&delivery).await;

    // Fresh session: full TTL again, and the superseded code is dead.
    assert_eq!(flow.status(), Some(SessionStatus::Pending));
    assert_eq!(flow.remaining_seconds(), TTL);
    if old_code != new_code {
        let err = flow.submit_code(&old_code).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidCode));
    }
    assert!(flow.submit_code(&new_code).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn should_abort_superseded_delivery() {
    let users = MockUserApi::new();
    let delivery = MockDelivery::new();
    delivery.set_latency(Duration::from_millis(50));
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    flow.start(registration()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(delivery.sent_handle().lock().unwrap().is_empty());

    clock.advance_secs(TTL as i64);
    flow.resend().unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // The first send was aborted mid-flight; only the resend landed.
    let sent = delivery.sent_handle();
    assert_eq!(sent.lock().unwrap().len(), 1);
    let code = sent.lock().unwrap()[0].code.clone();
    assert!(flow.submit_code(&code).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn should_keep_session_usable_when_delivery_fails() {
    let users = MockUserApi::new();
    let delivery = MockDelivery::new();
    delivery.fail(true);
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    flow.start(registration()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(flow.delivery_state(), DeliveryState::Failed);
    assert_eq!(flow.status(), Some(SessionStatus::Pending));
    assert_eq!(flow.remaining_seconds(), TTL);
    // The session is still live: a miss answers InvalidCode, not Expired.
    let err = flow.submit_code("000000").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidCode));
}

#[tokio::test(start_paused = true)]
async fn should_change_user_type_once_on_admin_verification() {
    let target = test_user("u7", "Sam Scholar");
    let users = MockUserApi::with_users(vec![target.clone()]);
    let delivery = MockDelivery::new();
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    let context = VerificationContext::AdminTypeChange(TypeChangePayload {
        user_id: target.id.clone(),
        email: target.email.clone(),
        full_name: target.full_name.clone(),
        new_type: UserType::Lecturer,
        admin_name: "Ada Admin".to_owned(),
    });
    flow.start(context).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let code = {
        let sent = delivery.sent_handle();
        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].to_email, "u7@uni.edu");
        assert_eq!(sent[0].requested_by.as_deref(), Some("Ada Admin"));
        sent[0].code.clone()
    };

    let verified = flow.submit_code(&code).await.unwrap();
    let Verified::TypeChanged(user) = verified else {
        panic!("expected a type change");
    };
    assert_eq!(user.user_type, UserType::Lecturer);

    let changes = users.type_changes_handle();
    let changes = changes.lock().unwrap();
    assert_eq!(changes.as_slice(), &[(UserId::from("u7"), UserType::Lecturer)]);
}

#[tokio::test(start_paused = true)]
async fn should_not_accept_code_again_after_completion_failure() {
    let users = MockUserApi::new();
    users.fail_register(true);
    let delivery = MockDelivery::new();
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    flow.start(registration()).await.unwrap();
    let code = sent_code(&delivery).await;

    let err = flow.submit_code(&code).await.unwrap_err();
    assert!(matches!(err, ClientError::MutationFailed { .. }));
    assert_eq!(flow.status(), Some(SessionStatus::Verified));

    // The code was consumed by the accepted verification; the flow must be
    // restarted, not re-submitted.
    users.fail_register(false);
    let err = flow.submit_code(&code).await.unwrap_err();
    assert!(matches!(err, ClientError::ExpiredCode));
    assert!(users.registered_handle().lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn should_mark_session_cancelled_on_cancel() {
    let users = MockUserApi::new();
    let delivery = MockDelivery::new();
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    flow.start(registration()).await.unwrap();
    let code = sent_code(&delivery).await;
    flow.cancel();

    assert_eq!(flow.status(), Some(SessionStatus::Cancelled));
    assert_eq!(flow.delivery_state(), DeliveryState::Idle);
    let err = flow.submit_code(&code).await.unwrap_err();
    assert!(matches!(err, ClientError::ExpiredCode));
    assert!(matches!(
        flow.resend().unwrap_err(),
        ClientError::ResendUnavailable
    ));
}

#[tokio::test(start_paused = true)]
async fn should_count_down_remaining_seconds_from_the_clock() {
    let users = MockUserApi::new();
    let delivery = MockDelivery::new();
    let clock = FakeClock::new();
    let mut flow = flow(&users, &delivery, &clock);

    flow.start(registration()).await.unwrap();
    clock.advance_secs(60);
    assert_eq!(flow.remaining_seconds(), TTL - 60);
    assert!(!flow.can_resend());

    clock.advance_secs(TTL as i64);
    assert_eq!(flow.remaining_seconds(), 0);
    assert!(flow.can_resend());
}
