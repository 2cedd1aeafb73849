//! # Policy Q&A Prompt
//!
//! The HR-assistant template used to answer a new employee's question from the
//! policy document, and the helpers that bound the document context.

use crate::constants::CONTEXT_CHAR_BUDGET;

/// The reply the model must give when the document does not cover the question.
pub const DEFLECTION_SENTENCE: &str = "抱歉，這部分政策未涵蓋，請直接聯絡 HR。";

/// The policy Q&A template. `{deflection}`, `{context}` and `{question}` are substituted
/// by [`build_policy_prompt`].
pub const POLICY_QA_PROMPT: &str = r#"
你是專業的 HR 助手，請用繁體中文、親切簡潔的語氣回答。
僅根據以下公司政策內容回答，不要添加外部知識。
如果問題不在內容中，請說「{deflection}」

政策內容（截取前 8000 字，避免 token 超限）：
{context}

新人問題：{question}
"#;

/// Returns the first `limit` characters of `text`.
///
/// Counts Unicode scalar values, so multi-byte text is never split inside a character.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Builds the complete prompt for one question.
///
/// At most [`CONTEXT_CHAR_BUDGET`] characters of `document_text` are included.
pub fn build_policy_prompt(document_text: &str, question: &str) -> String {
    let context = truncate_chars(document_text, CONTEXT_CHAR_BUDGET);
    // The context goes in last so placeholder-like text in the document stays verbatim.
    POLICY_QA_PROMPT
        .replace("{deflection}", DEFLECTION_SENTENCE)
        .replacen("{question}", question, 1)
        .replacen("{context}", context, 1)
}
