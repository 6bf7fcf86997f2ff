use super::{SseDecoder, StreamEvent};

fn decode(chunks: &[&str]) -> Vec<String> {
    let mut deltas = Vec::new();
    let mut decoder = SseDecoder::new();
    let mut sink = |delta: String| deltas.push(delta);
    for chunk in chunks {
        decoder.push(chunk, &mut sink);
    }
    decoder.finish(&mut sink);
    deltas
}

#[test]
fn test_frame_split_across_chunk_boundaries() {
    let deltas = decode(&["data: {\"del", "ta\":\"Hel", "lo\"}\n"]);
    assert_eq!(deltas, vec!["Hello".to_string()]);
}

#[test]
fn test_ordering_and_filtering() {
    let deltas = decode(&[
        "event: ping\n",
        "data: {\"delta\":\"A\"}\n",
        "data: {\"foo\":1}\n",
        "data: {\"delta\":\"B\"}\n",
    ]);
    assert_eq!(deltas, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_multiple_frames_in_one_chunk() {
    let deltas = decode(&["data: {\"delta\":\"a\"}\ndata: {\"delta\":\"b\"}\n"]);
    assert_eq!(deltas, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_final_line_flushed_without_trailing_newline() {
    let deltas = decode(&["data: {\"delta\":\"end\"}"]);
    assert_eq!(deltas, vec!["end".to_string()]);
}

#[test]
fn test_malformed_json_is_skipped() {
    let deltas = decode(&["data: {not json at all\n", "data: {\"delta\":\"ok\"}\n"]);
    assert_eq!(deltas, vec!["ok".to_string()]);
}

#[test]
fn test_comment_and_blank_lines_ignored() {
    let deltas = decode(&["id: 3\n", "\n", "event: done\n", ": keepalive\n"]);
    assert!(deltas.is_empty());
}

#[test]
fn test_crlf_line_endings_tolerated() {
    let deltas = decode(&["data: {\"delta\":\"x\"}\r\n"]);
    assert_eq!(deltas, vec!["x".to_string()]);
}

#[test]
fn test_leading_whitespace_before_prefix_tolerated() {
    let deltas = decode(&["  data: {\"delta\":\"y\"}\n"]);
    assert_eq!(deltas, vec!["y".to_string()]);
}

#[test]
fn test_non_string_delta_is_skipped() {
    let deltas = decode(&["data: {\"delta\":42}\n"]);
    assert!(deltas.is_empty());
}

#[test]
fn test_event_accessors() {
    assert_eq!(
        StreamEvent::Delta("x".to_string()).as_delta(),
        Some("x")
    );
    assert_eq!(StreamEvent::Done.as_delta(), None);
    assert!(StreamEvent::Done.is_terminal());
    assert!(StreamEvent::Error("boom".to_string()).is_terminal());
    assert!(!StreamEvent::Delta(String::new()).is_terminal());
}
