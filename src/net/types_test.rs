use super::*;

#[test]
fn request_uses_snake_case_field_names() {
    let req = ChatRequest {
        session_id: "s1".into(),
        table: "invoice".into(),
        message: "hi".into(),
    };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "session_id": "s1", "table": "invoice", "message": "hi" })
    );
}

#[test]
fn unscoped_request_sends_empty_table() {
    let req = ChatRequest {
        session_id: "s1".into(),
        table: String::new(),
        message: "hi".into(),
    };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["table"], "");
}

#[test]
fn response_ignores_extra_fields() {
    let resp: ChatResponse =
        serde_json::from_str(r#"{"response":"ok","sql":"select 1"}"#).unwrap();
    assert_eq!(resp.response, "ok");
}

#[test]
fn response_without_field_is_rejected() {
    assert!(serde_json::from_str::<ChatResponse>(r#"{"answer":"ok"}"#).is_err());
    assert!(serde_json::from_str::<ChatResponse>(r#"{"response":42}"#).is_err());
}
