//! Session store tests across both providers, driven through the port.

use scholarshare_client::domain::ports::SessionStore;
use scholarshare_client::infra::session::{FileSessionStore, MemorySessionStore};

use scholarshare_testing::fixture::{test_lecturer, test_user};

fn exercise_store<S: SessionStore>(store: &S) {
    assert_eq!(store.get(), None);

    let student = test_user("u1", "Jane Doe");
    store.set(&student);
    assert_eq!(store.get(), Some(student));

    // A new login overwrites the previous session.
    let lecturer = test_lecturer("l1", "Lena Lecturer");
    store.set(&lecturer);
    assert_eq!(store.get(), Some(lecturer));

    store.clear();
    assert_eq!(store.get(), None);
}

#[test]
fn should_round_trip_session_through_memory_store() {
    exercise_store(&MemorySessionStore::new());
}

#[test]
fn should_round_trip_session_through_file_store() {
    let path = std::env::temp_dir().join(format!(
        "scholarshare-session-test-{}.json",
        uuid::Uuid::new_v4()
    ));
    let store = FileSessionStore::new(&path);
    exercise_store(&store);
}
