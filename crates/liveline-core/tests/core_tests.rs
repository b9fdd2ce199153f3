//! Tests for liveline-core: ids, wire protocol shapes, config defaults

use chrono::DateTime;
use liveline_core::*;

// ===========================================================================
// Ids and types
// ===========================================================================

#[test]
fn id_newtypes_basics() {
    let session = SessionId::new("s-1");
    assert_eq!(session.as_str(), "s-1");
    assert_eq!(format!("{}", session), "s-1");
    assert_eq!(SessionId::from("s-1"), session);
}

#[test]
fn agent_status_is_derived_from_load() {
    let mut agent = Agent {
        id: AgentId::new("a1"),
        name: "Agent One".into(),
        languages: vec!["en".into()],
        max_sessions: 2,
        active: 0,
    };
    assert_eq!(agent.status(), AgentStatus::Available);

    agent.active = 1;
    assert_eq!(agent.status(), AgentStatus::Available);

    agent.active = 2;
    assert_eq!(agent.status(), AgentStatus::Busy);
    assert!(!agent.has_capacity());
}

#[test]
fn session_append_refreshes_last_activity() {
    let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let t1 = t0 + chrono::Duration::seconds(90);

    let mut session = Session::new(
        SessionId::new("s-1"),
        UserId::new("u-1"),
        AgentId::new("a-1"),
        "en",
        t0,
    );
    assert_eq!(session.last_activity, t0);

    session.append(ChatMessage::user("hello", t1));
    assert_eq!(session.last_activity, t1);
    assert_eq!(session.messages.len(), 1);
}

// ===========================================================================
// Errors
// ===========================================================================

#[test]
fn error_taxonomy() {
    let not_found = Error::session_not_found("s-9");
    assert_eq!(not_found.to_string(), "session not found: s-9");
    assert!(not_found.is_recoverable());

    let capacity = Error::capacity_exceeded("a-1");
    assert_eq!(capacity.to_string(), "agent a-1 is at capacity");
    assert!(!capacity.is_recoverable());
}

// ===========================================================================
// Wire protocol
// ===========================================================================

#[test]
fn connect_response_shapes() {
    let connected = ConnectResponse::connected("s-1", "Kim Ted", "Hello!");
    let json = serde_json::to_value(&connected).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["sessionId"], "s-1");
    assert_eq!(json["agentName"], "Kim Ted");

    let queued = ConnectResponse::queued(3);
    let json = serde_json::to_value(&queued).unwrap();
    assert_eq!(json["queued"], true);
    assert_eq!(json["position"], 3);
    assert!(json.get("sessionId").is_none());
}

#[test]
fn connect_request_defaults() {
    let req: ConnectRequest = serde_json::from_str("{}").unwrap();
    assert!(req.user_id.is_none());
    assert_eq!(req.language, "en");

    let req: ConnectRequest =
        serde_json::from_str(r#"{"userId":"u-1","language":"sw"}"#).unwrap();
    assert_eq!(req.user_id.as_deref(), Some("u-1"));
    assert_eq!(req.language, "sw");
}

#[test]
fn assist_response_is_camel_case() {
    let resp = AssistResponse {
        response: "hi".into(),
        suggest_live_agent: true,
    };
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["suggestLiveAgent"], true);
}

// ===========================================================================
// Config
// ===========================================================================

#[test]
fn desk_config_defaults() {
    let config = DeskConfig::default();
    assert_eq!(config.max_session_age_secs, 30 * 60);
    assert_eq!(config.idle_timeout_secs, 10 * 60);
    assert!(config.max_session_age() > config.idle_timeout());
}

#[test]
fn default_roster_is_trilingual() {
    let roster = default_roster();
    assert_eq!(roster.len(), 8);
    for spec in &roster {
        assert_eq!(spec.max_sessions, 1);
        for lang in ["en", "sw", "sh"] {
            assert!(spec.languages.iter().any(|l| l == lang));
        }
    }
}

#[test]
fn agent_spec_round_trips_with_default_max() {
    let raw = r#"{"id":"a1","name":"Agent One","languages":["en"]}"#;
    let spec: AgentSpec = serde_json::from_str(raw).unwrap();
    assert_eq!(spec.max_sessions, 1);
}

#[test]
fn roster_parses_from_json() {
    let raw = r#"[{"id":"a1","name":"Agent One","languages":["en"],"max_sessions":2}]"#;
    let roster = roster_from_json(raw).unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].max_sessions, 2);
}

#[test]
fn empty_roster_is_a_config_error() {
    let err = roster_from_json("[]").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("no agents"));
}

#[test]
fn malformed_roster_is_a_json_error() {
    let err = roster_from_json("{not json").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn missing_roster_file_is_an_io_error() {
    let err = load_roster(std::path::Path::new("/no/such/roster.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
