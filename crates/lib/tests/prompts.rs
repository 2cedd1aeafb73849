//! # Policy Prompt Tests
//!
//! Validates how the policy Q&A prompt is assembled and, above all, that the document
//! context never exceeds the character budget.

use onboard::constants::CONTEXT_CHAR_BUDGET;
use onboard::prompts::policy::{build_policy_prompt, DEFLECTION_SENTENCE};

/// A 9000-character document contributes exactly its first 8000 characters.
#[test]
fn test_prompt_truncates_document_to_budget() {
    let head: String = "a".repeat(CONTEXT_CHAR_BUDGET);
    let tail: String = "b".repeat(1000);
    let document = format!("{head}{tail}");
    assert_eq!(document.chars().count(), 9000);

    let prompt = build_policy_prompt(&document, "How many vacation days?");

    assert!(prompt.contains(&head));
    assert!(!prompt.contains('b'), "text beyond the budget leaked into the prompt");
}

/// The budget counts characters, so CJK text is cut at 8000 characters, not bytes.
#[test]
fn test_prompt_truncation_counts_characters() {
    let document: String = "假".repeat(CONTEXT_CHAR_BUDGET + 500);
    let prompt = build_policy_prompt(&document, "q");
    let expected: String = "假".repeat(CONTEXT_CHAR_BUDGET);

    assert!(prompt.contains(&expected));
    assert!(!prompt.contains(&format!("{expected}假")));
}

/// Short documents are embedded whole, alongside the question and the deflection rule.
#[test]
fn test_prompt_contains_context_question_and_deflection() {
    let prompt = build_policy_prompt("Annual leave: 14 days.", "年度健檢有幾天？");

    assert!(prompt.contains("Annual leave: 14 days."));
    assert!(prompt.contains("新人問題：年度健檢有幾天？"));
    assert!(prompt.contains(DEFLECTION_SENTENCE));
    assert!(!prompt.contains("{context}"));
    assert!(!prompt.contains("{question}"));
}

/// Brace placeholders inside the document are left untouched.
#[test]
fn test_prompt_keeps_placeholder_text_in_document() {
    let prompt = build_policy_prompt("Use {question} literally.", "What?");
    assert!(prompt.contains("Use {question} literally."));
    assert!(prompt.contains("新人問題：What?"));
}

/// An empty document still yields a well-formed prompt.
#[test]
fn test_prompt_with_empty_document() {
    let prompt = build_policy_prompt("", "Anything?");
    assert!(prompt.contains("新人問題：Anything?"));
}
