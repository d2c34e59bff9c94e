use super::*;
use crate::state::session::SESSION_KEY;

#[test]
fn accepts_http_and_https_endpoints() {
    let cfg = ChatConfig::new("https://example.test/chat", None, 5, true).unwrap();
    assert_eq!(cfg.endpoint, "https://example.test/chat");
    assert_eq!(cfg.notice_duration, Duration::from_secs(5));
    assert!(cfg.greeting);

    let cfg = ChatConfig::new(" http://127.0.0.1:8000/chat ", None, 1, false).unwrap();
    assert_eq!(cfg.endpoint, "http://127.0.0.1:8000/chat");
}

#[test]
fn rejects_non_http_endpoints() {
    for bad in ["ftp://example.test", "example.test/chat", "", "https://"] {
        let err = ChatConfig::new(bad, None, 5, true).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint(_)), "{bad} should be rejected");
    }
}

#[test]
fn defaults_point_at_hosted_endpoint() {
    let cfg = ChatConfig::new(DEFAULT_ENDPOINT, default_state_dir(), DEFAULT_NOTICE_SECS, true).unwrap();
    assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(cfg.notice_duration, Duration::from_secs(DEFAULT_NOTICE_SECS));
    assert!(cfg.greeting);
}

#[test]
fn missing_state_dir_uses_memory_store() {
    let cfg = ChatConfig::new(DEFAULT_ENDPOINT, None, 5, true).unwrap();
    let store = cfg.session_store();
    store.set(SESSION_KEY, "session-x").unwrap();
    assert_eq!(store.get(SESSION_KEY).unwrap().as_deref(), Some("session-x"));
}

#[test]
fn state_dir_uses_file_store() {
    let dir = std::env::temp_dir().join(format!("ledger-chat-config-{}", uuid::Uuid::new_v4()));
    let cfg = ChatConfig::new(DEFAULT_ENDPOINT, Some(dir.clone()), 5, true).unwrap();
    cfg.session_store().set(SESSION_KEY, "session-y").unwrap();
    assert!(dir.join("session.json").exists());
    let _ = std::fs::remove_dir_all(dir);
}
