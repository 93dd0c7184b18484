use trg_http::headers::HEADER_SESSION_ID;
use trg_http::{extract_session_id, SessionStore, SESSION_ID_MARKER};

#[test]
fn session_marker_matches_request_header_name() {
    assert_eq!(SESSION_ID_MARKER, format!("{HEADER_SESSION_ID}: "));
}

#[test]
fn session_id_is_truncated_at_first_carriage_return() {
    assert_eq!(
        extract_session_id("X-Transmission-Session-Id: abc123\r\n"),
        Some("abc123")
    );
    assert_eq!(
        extract_session_id("X-Transmission-Session-Id: abc\r123\r\n"),
        Some("abc")
    );
    assert_eq!(
        extract_session_id("X-Transmission-Session-Id: no-terminator"),
        Some("no-terminator")
    );
}

#[test]
fn non_marker_lines_are_ignored() {
    assert_eq!(extract_session_id("Content-Type: application/json\r\n"), None);
    assert_eq!(extract_session_id("x-transmission-session-id: abc\r\n"), None);
    assert_eq!(extract_session_id("X-Transmission-Session-Id:abc\r\n"), None);
    assert_eq!(extract_session_id(" X-Transmission-Session-Id: abc\r\n"), None);
}

#[test]
fn inspection_replaces_the_current_token_wholesale() {
    let store = SessionStore::new();
    assert_eq!(store.current(), None);

    assert!(store.inspect_header_line("X-Transmission-Session-Id: first\r\n"));
    assert_eq!(store.current().as_deref(), Some("first"));

    assert!(!store.inspect_header_line("Server: Transmission\r\n"));
    assert_eq!(store.current().as_deref(), Some("first"));

    assert!(store.inspect_header_line("X-Transmission-Session-Id: second\r\n"));
    assert_eq!(store.current().as_deref(), Some("second"));

    store.clear();
    assert_eq!(store.current(), None);
}

#[test]
fn concurrent_writers_leave_one_complete_token() {
    let store = std::sync::Arc::new(SessionStore::new());
    let handles: Vec<_> = (0..8)
        .map(|index| {
            let store = std::sync::Arc::clone(&store);
            std::thread::spawn(move || {
                for round in 0..100 {
                    store.inspect_header_line(&format!(
                        "X-Transmission-Session-Id: token-{index}-{round}\r\n"
                    ));
                    let _ = store.current();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread should finish");
    }

    let token = store.current().expect("a token should be stored");
    assert!(token.starts_with("token-"));
    assert!(token.ends_with("-99"));
}
