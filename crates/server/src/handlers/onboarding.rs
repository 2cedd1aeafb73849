//! # Onboarding Page Handler
//!
//! Builds the onboarding page for one request: loads the document, extracts its tables
//! and text, and answers the question in the query string, if any. Every step after the
//! document load degrades to a message on the page rather than failing the request.

use super::AppState;
use crate::page::{
    render_html, PageView, Section, DOCUMENT_HEADING, QA_HEADING, TABLES_HEADING,
};
use axum::{
    extract::{Query, State},
    response::Html,
};
use onboard::AnswerError;
use onboard_pdf::{extract_tables, extract_text, DocumentError, PolicyDocument};
use serde::Deserialize;
use tracing::{info, warn};

pub const MISSING_DOCUMENT_MESSAGE: &str = "❌ 請確保 policy.pdf 存在於應用程式同一資料夾";
pub const NO_TABLES_MESSAGE: &str = "PDF 中未偵測到表格，可直接閱讀原文或提問。";
pub const QA_UNAVAILABLE_MESSAGE: &str = "無法使用 Q&A：請設定 `GEMINI_API_KEY` 環境變數。";

/// Query parameters accepted by the page.
#[derive(Deserialize, Debug, Default)]
pub struct PageParams {
    /// The question to answer.
    pub q: Option<String>,
}

/// The handler for the root (`/`) endpoint.
pub async fn root(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Html<String> {
    let view = render_page(&app_state, params.q.as_deref()).await;
    Html(render_html(&view))
}

/// Assembles the page for one request, top to bottom.
pub async fn render_page(app_state: &AppState, question: Option<&str>) -> PageView {
    let mut view = PageView::default();

    let document = match PolicyDocument::load(&app_state.document_path) {
        Ok(document) => document,
        Err(e) => {
            warn!(error = %e, "Policy document unavailable");
            let message = match &e {
                DocumentError::Missing(_) => MISSING_DOCUMENT_MESSAGE.to_string(),
                DocumentError::Read { .. } => format!("{MISSING_DOCUMENT_MESSAGE}（{e}）"),
            };
            view.push(Section::Fatal(message));
            return view;
        }
    };

    // Tables.
    view.push(Section::Heading(TABLES_HEADING));
    let tables = extract_tables(document.bytes());
    match tables.warning {
        Some(e) => view.push(Section::Warning(format!("解析 PDF 表格時出現問題：{e}"))),
        None if tables.tables.is_empty() => view.push(Section::Info(NO_TABLES_MESSAGE.to_string())),
        None => view.push(Section::Tables(tables.tables)),
    }

    // Original document.
    view.push(Section::Heading(DOCUMENT_HEADING));
    view.push(Section::Download {
        file_name: app_state.config.download_file_name.clone(),
    });
    let text = extract_text(document.bytes());
    match &text.warning {
        Some(e) => view.push(Section::Warning(format!("提取 PDF 文本時出現問題：{e}"))),
        None => view.push(Section::Caption(format!(
            "PDF 共 {} 頁，已提取文字用於 Q&A。",
            text.page_count
        ))),
    }

    // Q&A.
    view.push(Section::Heading(QA_HEADING));
    let question = question.map(str::trim).filter(|q| !q.is_empty());
    view.push(Section::QuestionForm {
        question: question.map(str::to_string),
    });
    if let Some(question) = question {
        info!(question, "Answering question");
        match app_state.answer_service.answer(question, &text.text).await {
            Ok(answer) => view.push(Section::Answer(answer)),
            Err(e) => view.push(Section::Error(answer_error_message(&e))),
        }
    }

    view.push(Section::Footer);
    view
}

/// The message shown when a question could not be answered.
pub fn answer_error_message(error: &AnswerError) -> String {
    match error {
        AnswerError::ServiceUnavailable(_) => QA_UNAVAILABLE_MESSAGE.to_string(),
        AnswerError::AllCandidatesFailed {
            last_error,
            available_models,
        } => match available_models {
            Some(models) if !models.is_empty() => format!(
                "呼叫 Gemini 時發生錯誤：{last_error}。可用模型包括：{}",
                models.join(", ")
            ),
            _ => format!("呼叫 Gemini 時發生錯誤：{last_error}"),
        },
    }
}
