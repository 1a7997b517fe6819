// Unit tests for extraction and tokenization.
//
// Tests the selector contract (order, mismatch, leniency) and the token
// filter invariants: every surviving token is purely alphabetic, lower-case,
// and not a stop word.

use headline_topics::error::PipelineError;
use headline_topics::scrape::extract::Extractor;
use headline_topics::text::stop_words::{StopWords, BUILTIN_STOP_WORDS};
use headline_topics::text::tokenize::{tokenize, tokenize_all};

// ============================================================
// Extractor
// ============================================================

const PROMO_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>World</title></head><body>
  <div class="gs-c-promo-body"><a><h3>Storm batters coast</h3></a><p>Thousands evacuated overnight</p></div>
  <section><div class="gs-c-promo-body">Markets rally after vote</div></section>
  <span class="gs-c-promo-body">Wrong element type</span>
</body></html>"#;

#[test]
fn extractor_respects_element_and_class() {
    let extractor = Extractor::new("div.gs-c-promo-body").unwrap();
    let docs = extractor.extract(PROMO_PAGE);
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0], "Storm batters coastThousands evacuated overnight");
    assert_eq!(docs[1], "Markets rally after vote");
}

#[test]
fn extractor_class_only_selector_matches_any_element() {
    let extractor = Extractor::new(".gs-c-promo-body").unwrap();
    assert_eq!(extractor.extract(PROMO_PAGE).len(), 3);
}

#[test]
fn extractor_empty_body() {
    let extractor = Extractor::new("div.gs-c-promo-body").unwrap();
    assert!(extractor.extract("").is_empty());
}

#[test]
fn extractor_keeps_selector_text() {
    let extractor = Extractor::new("div.gs-c-promo-body").unwrap();
    assert_eq!(extractor.selector(), "div.gs-c-promo-body");
}

#[test]
fn extractor_rejects_garbage_selector() {
    assert!(matches!(
        Extractor::new("div["),
        Err(PipelineError::Parse(_))
    ));
}

// ============================================================
// Tokenizer invariants
// ============================================================

#[test]
fn scenario_two_documents() {
    let stop = StopWords::builtin();
    let docs = vec![
        "The Cat Sat on the Mat".to_string(),
        "Cats and Dogs are Friends".to_string(),
    ];
    let sequences = tokenize_all(&docs, &stop);
    assert_eq!(sequences[0], vec!["cat", "sat", "mat"]);
    assert_eq!(sequences[1], vec!["cats", "dogs", "friends"]);
}

#[test]
fn surviving_tokens_are_alphabetic_lowercase_and_not_stop_words() {
    let stop = StopWords::builtin();
    let samples = [
        "BREAKING: 3 killed in Gaza strike, officials say",
        "Why the U.S. election matters (again) — analysis",
        "Watch: Moment 100-year-old skydiver lands",
        "Ukraine's grain deal in doubt as talks stall",
        "Über-popular café reopens in São Paulo",
        "\tTabs\nand\r\nnewlines   everywhere ",
    ];
    for text in samples {
        for token in tokenize(text, &stop) {
            assert!(!token.is_empty());
            assert!(
                token.chars().all(char::is_alphabetic),
                "non-alphabetic token survived: {token:?} from {text:?}"
            );
            assert_eq!(token, token.to_lowercase());
            assert!(!stop.contains(&token), "stop word survived: {token}");
            assert!(!token.chars().any(char::is_whitespace));
        }
    }
}

#[test]
fn punctuated_tokens_are_dropped_not_cleaned() {
    let stop = StopWords::builtin();
    let tokens = tokenize("Gaza, Israel; ceasefire! talks", &stop);
    assert_eq!(tokens, vec!["talks"]);
}

#[test]
fn every_builtin_stop_word_is_removed() {
    let stop = StopWords::builtin();
    let text = BUILTIN_STOP_WORDS.join(" ").to_uppercase();
    assert!(tokenize(&text, &stop).is_empty());
}

#[test]
fn extended_list_removes_more() {
    let text = "people said would could also news";
    let builtin = tokenize(text, &StopWords::builtin());
    let extended = tokenize(text, &StopWords::extended());
    assert!(extended.len() < builtin.len());
}

#[test]
fn order_is_preserved() {
    let stop = StopWords::builtin();
    assert_eq!(
        tokenize("zebra apple mango apple", &stop),
        vec!["zebra", "apple", "mango", "apple"]
    );
}
