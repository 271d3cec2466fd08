//! Integration tests for the stream frame decoder.

use microgpt_viz::{FrameDecoder, StreamEvent};

const PROBS_FRAME: &str =
    "data: {\"type\":\"probs\",\"probs\":[{\"char\":\"a\",\"prob\":80.0},{\"char\":\"b\",\"prob\":20.0}]}\n";
const CHAR_FRAME: &str = "data: {\"type\":\"char\",\"char\":\"a\",\"word\":\"creda\"}\n";
const DONE_FRAME: &str = "data: {\"type\":\"done\",\"result\":\"creda\"}\n";

#[test]
fn test_split_frame_matches_whole_frame() {
    let whole = FrameDecoder::new().push(PROBS_FRAME.as_bytes());
    assert_eq!(whole.len(), 1);

    let bytes = PROBS_FRAME.as_bytes();
    for split in 1..bytes.len() {
        let mut decoder = FrameDecoder::new();
        let mut events = decoder.push(&bytes[..split]);
        events.extend(decoder.push(&bytes[split..]));
        assert_eq!(events, whole, "split at {split}");
    }
}

#[test]
fn test_full_conversation_in_dribbled_chunks() {
    let body = format!("{PROBS_FRAME}\n{CHAR_FRAME}\n{DONE_FRAME}\n");
    let mut decoder = FrameDecoder::new();
    let mut events = Vec::new();
    // One byte at a time, the worst transport can do.
    for b in body.as_bytes() {
        events.extend(decoder.push(std::slice::from_ref(b)));
    }
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], StreamEvent::Probs { .. }));
    assert_eq!(
        events[1],
        StreamEvent::Char {
            ch: 'a',
            word: "creda".to_string()
        }
    );
    assert_eq!(
        events[2],
        StreamEvent::Done {
            result: Some("creda".to_string())
        }
    );
}

#[test]
fn test_garbage_lines_yield_nothing_and_do_not_corrupt() {
    let mut decoder = FrameDecoder::new();
    assert!(decoder.push(b"retry: 3000\n").is_empty());
    assert!(decoder.push(b"data: not json at all\n").is_empty());
    assert!(decoder.push(b"data: {\"type\":\"unknown\",\"x\":1}\n").is_empty());
    assert!(decoder.push(&[0xff, 0xfe, b'\n']).is_empty());

    let events = decoder.push(DONE_FRAME.as_bytes());
    assert_eq!(events.len(), 1);
}

#[test]
fn test_events_keep_arrival_order() {
    let mut decoder = FrameDecoder::new();
    let body = format!("{CHAR_FRAME}{PROBS_FRAME}");
    let events = decoder.push(body.as_bytes());
    assert!(matches!(events[0], StreamEvent::Char { .. }));
    assert!(matches!(events[1], StreamEvent::Probs { .. }));
}
