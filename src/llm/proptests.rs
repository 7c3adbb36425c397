//! Property-based tests for the Gemini translation layer
//!
//! These tests verify that translation between conversation turns and the
//! wire format preserves key invariants:
//! - Every turn is carried, in order, with its text untouched
//! - Only `user` and `model` roles ever appear on the wire
//! - A system prompt adds exactly one leading `user` entry
//! - Extraction never yields empty or untrimmed text

use super::gemini::{build_contents, extract_text, WireRole};
use super::LlmErrorKind;
use crate::conversation::{Role, Turn};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Strategies
// ============================================================================

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant)]
}

fn arb_turn() -> impl Strategy<Value = Turn> {
    (arb_role(), "[a-zA-Z0-9 _.!?,\n]{0,80}").prop_map(|(role, text)| Turn::new(role, text))
}

fn arb_history() -> impl Strategy<Value = Vec<Turn>> {
    proptest::collection::vec(arb_turn(), 1..12)
}

/// Part texts, some of which may be missing or whitespace
fn arb_parts() -> impl Strategy<Value = Vec<Option<String>>> {
    proptest::collection::vec(
        prop_oneof![
            3 => "[a-zA-Z0-9 .!?]{0,30}".prop_map(Some),
            1 => "[ \n\t]{0,5}".prop_map(Some),
            1 => Just(None),
        ],
        0..6,
    )
}

fn payload_from_parts(parts: &[Option<String>]) -> serde_json::Value {
    let parts: Vec<_> = parts
        .iter()
        .map(|p| match p {
            Some(text) => json!({ "text": text }),
            None => json!({ "functionCall": { "name": "noop", "args": {} } }),
        })
        .collect();
    json!({ "candidates": [{ "content": { "parts": parts } }] })
}

// ============================================================================
// build_contents
// ============================================================================

proptest! {
    /// Without a system prompt, output mirrors input one-to-one
    #[test]
    fn prop_contents_mirror_history(turns in arb_history()) {
        let contents = build_contents(&turns, None);
        prop_assert_eq!(contents.len(), turns.len());

        for (content, turn) in contents.iter().zip(&turns) {
            let expected = match turn.role() {
                Role::User => WireRole::User,
                Role::Assistant => WireRole::Model,
            };
            prop_assert_eq!(content.role, expected);
            prop_assert_eq!(content.parts.len(), 1);
            prop_assert_eq!(content.parts[0].text.as_str(), turn.content());
        }
    }

    /// A system prompt adds exactly one leading user entry
    #[test]
    fn prop_system_prompt_prepends_one_user_entry(
        turns in arb_history(),
        prompt in "[a-zA-Z0-9 .\n]{1,200}",
    ) {
        let contents = build_contents(&turns, Some(&prompt));
        prop_assert_eq!(contents.len(), turns.len() + 1);
        prop_assert_eq!(contents[0].role, WireRole::User);
        prop_assert_eq!(contents[0].parts[0].text.as_str(), prompt.as_str());
        let plain = build_contents(&turns, None);
        prop_assert_eq!(plain.as_slice(), &contents[1..]);
    }

    /// Serialized roles are only ever "user" or "model"
    #[test]
    fn prop_wire_roles_are_closed(turns in arb_history(), with_prompt in any::<bool>()) {
        let prompt = with_prompt.then_some("instructions");
        let value = serde_json::to_value(build_contents(&turns, prompt)).unwrap();
        for entry in value.as_array().unwrap() {
            let role = entry["role"].as_str().unwrap();
            prop_assert!(role == "user" || role == "model", "unexpected role {}", role);
        }
    }

    /// Same input, same output
    #[test]
    fn prop_build_contents_is_deterministic(turns in arb_history()) {
        prop_assert_eq!(build_contents(&turns, Some("p")), build_contents(&turns, Some("p")));
    }
}

// ============================================================================
// extract_text
// ============================================================================

proptest! {
    /// Extraction equals the trimmed newline join, or fails when that is empty
    #[test]
    fn prop_extract_matches_trimmed_join(parts in arb_parts()) {
        let payload = payload_from_parts(&parts);
        let expected = parts
            .iter()
            .map(|p| p.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n");
        let expected = expected.trim();

        match extract_text(&payload) {
            Ok(text) => {
                prop_assert!(!expected.is_empty());
                prop_assert_eq!(text.as_str(), expected);
            }
            Err(e) => {
                prop_assert!(expected.is_empty());
                prop_assert_eq!(e.kind(), LlmErrorKind::MalformedResponse);
            }
        }
    }

    /// Successful extraction is never empty and never padded
    #[test]
    fn prop_extracted_text_is_trimmed(parts in arb_parts()) {
        if let Ok(text) = extract_text(&payload_from_parts(&parts)) {
            prop_assert!(!text.is_empty());
            prop_assert_eq!(text.trim(), text.as_str());
        }
    }
}
