use super::*;

#[tokio::test]
async fn unknown_user_has_empty_history() {
    let store = InMemorySessionStore::new();
    let history = store.recent("nobody").await.expect("Lookup failed");
    assert!(history.is_empty());
}

#[tokio::test]
async fn exchanges_are_appended_in_order() {
    let store = InMemorySessionStore::new();
    store
        .remember("u1", "User: hi".to_string(), "AI: hello".to_string())
        .await
        .expect("Remember failed");
    store
        .remember("u1", "User: pto?".to_string(), "AI: 20 days".to_string())
        .await
        .expect("Remember failed");

    let history = store.recent("u1").await.expect("Lookup failed");
    assert_eq!(
        history,
        vec!["User: hi", "AI: hello", "User: pto?", "AI: 20 days"]
    );
}

#[tokio::test]
async fn history_is_capped_with_oldest_evicted_first() {
    let store = InMemorySessionStore::new();
    for turn in 0..8 {
        store
            .remember(
                "u1",
                format!("User: q{}", turn),
                format!("AI: a{}", turn),
            )
            .await
            .expect("Remember failed");
    }

    let history = store.recent("u1").await.expect("Lookup failed");
    assert_eq!(history.len(), HISTORY_CAP);
    // Turns 0-2 evicted; the five most recent exchanges remain in order
    assert_eq!(history[0], "User: q3");
    assert_eq!(history[9], "AI: a7");
}

#[tokio::test]
async fn users_do_not_share_history() {
    let store = InMemorySessionStore::new();
    store
        .remember("u1", "User: hi".to_string(), "AI: hello".to_string())
        .await
        .expect("Remember failed");

    let other = store.recent("u2").await.expect("Lookup failed");
    assert!(other.is_empty());
}
