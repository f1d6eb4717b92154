//! Word counter tests: whole-word matching and per-item fetch errors (no external network).

use std::sync::Arc;
use std::time::Duration;

use urlcount::engine::word_pattern;
use urlcount::{Counter, ScanResult, WordCounter, stream};

fn counter(word: &str) -> WordCounter {
    WordCounter::new(word, Duration::from_secs(2)).unwrap()
}

// --- word_pattern / count_in ---

#[test]
fn test_pattern_is_word_bounded() {
    let c = counter("go");
    assert_eq!(c.pattern(), r"(?-u:\b)go(?-u:\b)");
    assert_eq!(c.count_in(b"go go go"), 3);
    assert_eq!(c.count_in(b"golang gopher ago cargo"), 0);
    assert_eq!(c.count_in(b"go-lang, (go). go!"), 3);
}

#[test]
fn test_pattern_is_case_sensitive() {
    let c = counter("go");
    assert_eq!(c.count_in(b"Go GO gO go"), 1);
}

#[test]
fn test_pattern_escapes_metacharacters() {
    let c = counter("a.b");
    assert_eq!(c.count_in(b"a.b axb a.b"), 2);
}

#[test]
fn test_pattern_trims_word() {
    let c = counter("  rust ");
    assert_eq!(c.count_in(b"rust trust rusty rust"), 2);
}

#[test]
fn test_empty_word_rejected() {
    assert!(word_pattern("").is_err());
    assert!(word_pattern("   ").is_err());
    assert!(WordCounter::new("", Duration::from_secs(1)).is_err());
}

#[test]
fn test_count_in_non_utf8_body() {
    let c = counter("go");
    let body = [b'g', b'o', b' ', 0xff, 0xfe, b' ', b'g', b'o'];
    assert_eq!(c.count_in(&body), 2);
}

// --- fetch errors ---

#[test]
fn test_invalid_url_is_an_error() {
    let c = counter("go");
    assert!(c.count("not a url").is_err());
}

#[test]
fn test_unreachable_host_is_an_error() {
    // Port 1 on loopback: nothing listens there, so the connection is refused.
    let c = counter("go");
    assert!(c.count("http://127.0.0.1:1/").is_err());
}

#[test]
fn test_fetch_errors_flow_through_stream() {
    let c = Arc::new(counter("go"));
    let input = std::io::Cursor::new("not a url\nhttp://127.0.0.1:1/\n");
    let mut results = stream(input, c, 2);
    let got: Vec<ScanResult> = results.by_ref().collect();
    assert_eq!(got.len(), 2);
    assert!(got.iter().all(|r| !r.is_ok() && r.count == 0));
    assert_eq!(results.finish().unwrap(), 2);
}
