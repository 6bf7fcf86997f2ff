use super::{ConversationStore, Role, GENERAL_TOPIC};

#[test]
fn test_history_is_ordered_per_topic() {
    let mut store = ConversationStore::new();
    store.push("2. Pricing", Role::User, "tighten the indexation clause");
    store.push("2. Pricing", Role::Assistant, "done, see revision");
    store.push(GENERAL_TOPIC, Role::User, "summarise the contract");

    let history = store.history("2. Pricing");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(store.history(GENERAL_TOPIC).len(), 1);
}

#[test]
fn test_unknown_topic_has_empty_history() {
    let store = ConversationStore::new();
    assert!(store.history("9. Boilerplate").is_empty());
    assert!(store.is_empty());
}

#[test]
fn test_duplicate_titles_share_one_transcript() {
    // Two sections with the same title collapse into one topic; titles are
    // assumed locally unique and this is the accepted behavior when not.
    let mut store = ConversationStore::new();
    store.push("Warranty", Role::User, "from section three");
    store.push("Warranty", Role::User, "from section seven");

    assert_eq!(store.history("Warranty").len(), 2);
}

#[test]
fn test_transcripts_serialise() {
    let mut store = ConversationStore::new();
    store.push(GENERAL_TOPIC, Role::User, "hello");

    let json = serde_json::to_string(&store).unwrap();
    let back: ConversationStore = serde_json::from_str(&json).unwrap();
    assert_eq!(back.history(GENERAL_TOPIC), store.history(GENERAL_TOPIC));
}
