use super::*;

// =============================================================
// ChatState defaults
// =============================================================

#[test]
fn chat_state_default_is_idle_and_unscoped() {
    let state = ChatState::default();
    assert!(state.messages.is_empty());
    assert!(state.selected_table.is_empty());
    assert!(!state.pending);
    assert!(state.notice.is_none());
}

// =============================================================
// ChatTurn
// =============================================================

#[test]
fn turns_get_distinct_ids() {
    let a = ChatTurn::user("hi");
    let b = ChatTurn::user("hi");
    assert_ne!(a.id, b.id);
    assert!(a.timestamp > 0);
}

#[test]
fn role_serializes_lowercase() {
    let json = serde_json::to_string(&Role::Assistant).unwrap();
    assert_eq!(json, "\"assistant\"");
    let back: Role = serde_json::from_str("\"user\"").unwrap();
    assert_eq!(back, Role::User);
}

// =============================================================
// Notice expiry
// =============================================================

#[test]
fn notice_expires_after_duration() {
    let notice = Notice::error("boom", Duration::from_secs(5));
    assert_eq!(notice.title, "Error");
    assert!(!notice.is_expired(notice.raised_at));
    assert!(!notice.is_expired(notice.raised_at + Duration::from_secs(4)));
    assert!(notice.is_expired(notice.raised_at + Duration::from_secs(5)));
}

#[test]
fn notice_not_expired_for_earlier_instant() {
    let notice = Notice::error("boom", DEFAULT_NOTICE_DURATION);
    let earlier = notice.raised_at.checked_sub(Duration::from_millis(1));
    if let Some(earlier) = earlier {
        assert!(!notice.is_expired(earlier));
    }
}
