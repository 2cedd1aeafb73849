//! # Page Rendering
//!
//! The onboarding page is built in two steps: the handler assembles a [`PageView`], an
//! ordered list of [`Section`]s, and [`render_html`] turns it into a complete HTML
//! document. Keeping the view as data lets tests assert on what was rendered without
//! parsing markup.

use onboard::Answer;
use onboard_pdf::ExtractedTable;
use std::fmt::Write;

pub const PAGE_TITLE: &str = "公司新人 Onboarding 工具";
pub const HEADING: &str = "🏢 公司新人 Onboarding 工具";
pub const WELCOME: &str = "歡迎新同事！這裡提供公司政策資訊、PDF 原文與即時 Q&A。";
pub const MOBILE_HINT: &str =
    "💡 手機使用提示：部署後，從 iOS Safari 點「分享 → 加到主畫面」即可像 App 一樣下載使用！";

pub const TABLES_HEADING: &str = "📊 公司政策資訊（表格提取）";
pub const DOCUMENT_HEADING: &str = "📄 PDF 原文";
pub const QA_HEADING: &str = "❓ 簡單 Q&A（問公司政策問題）";
pub const DOWNLOAD_LABEL: &str = "下載公司政策 PDF";
pub const QUESTION_PLACEHOLDER: &str = "例如：公司請假政策是什麼？年度健檢有幾天？";
pub const ANSWER_HEADER: &str = "🤖 Gemini 回答：";

const FOOTER_HEADING: &str = "使用說明";
const FOOTER_NOTES: [&str; 3] = [
    "本工具手機平板皆可順暢使用",
    "iOS 用戶：部署後從 Safari 加到主畫面，即可離線瀏覽（基本快取）",
    "如需更新 PDF，請將新的 `policy.pdf` 放在應用程式資料夾中並重新部署",
];
const FOOTER_CREDIT: &str = "Made with ❤️ by Rust + Axum + Google Gemini";

/// One block of the page, in display order.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// A section heading.
    Heading(&'static str),
    /// Stops the page: nothing follows it.
    Fatal(String),
    /// Tables in page order, each captioned with its source page.
    Tables(Vec<ExtractedTable>),
    Info(String),
    Warning(String),
    Download { file_name: String },
    Caption(String),
    /// The question form, pre-filled with the question just asked.
    QuestionForm { question: Option<String> },
    Answer(Answer),
    Error(String),
    Footer,
}

/// Everything one request renders below the page header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    pub sections: Vec<Section>,
}

impl PageView {
    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Whether the render was stopped by a fatal error.
    pub fn is_fatal(&self) -> bool {
        self.sections
            .iter()
            .any(|section| matches!(section, Section::Fatal(_)))
    }

    pub fn tables(&self) -> impl Iterator<Item = &ExtractedTable> {
        self.sections.iter().flat_map(|section| match section {
            Section::Tables(tables) => tables.as_slice(),
            _ => &[],
        })
    }

    pub fn answer(&self) -> Option<&Answer> {
        self.sections.iter().find_map(|section| match section {
            Section::Answer(answer) => Some(answer),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|section| match section {
                Section::Error(message) | Section::Fatal(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|section| match section {
                Section::Warning(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Escapes text for use in HTML element content and double-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }
    result
}

// Escaped text with line breaks kept visible.
fn escape_multiline(text: &str) -> String {
    escape_html(text).replace('\n', "<br>\n")
}

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0 auto;max-width:960px;padding:1rem;}\
table{border-collapse:collapse;width:100%;margin-bottom:1rem;}\
th,td{border:1px solid #ccc;padding:.4rem;text-align:left;}\
.caption{color:#666;font-size:.9rem;}\
.info{background:#e7f1ff;padding:.6rem;}\
.warning{background:#fff4e5;padding:.6rem;}\
.error{background:#fdecea;padding:.6rem;}\
input[type=text]{width:100%;padding:.5rem;box-sizing:border-box;}";

fn render_table(out: &mut String, table: &ExtractedTable) {
    let _ = writeln!(out, "<h3>第 {} 頁 表格</h3>", table.page_number);
    out.push_str("<table>\n<thead><tr>");
    for header in &table.headers {
        let _ = write!(out, "<th>{}</th>", escape_html(header));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(
                out,
                "<td>{}</td>",
                escape_html(cell.as_deref().unwrap_or_default())
            );
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn render_section(out: &mut String, section: &Section) {
    match section {
        Section::Heading(text) => {
            let _ = writeln!(out, "<h2>{}</h2>", escape_html(text));
        }
        Section::Fatal(message) | Section::Error(message) => {
            let _ = writeln!(out, "<div class=\"error\">{}</div>", escape_html(message));
        }
        Section::Tables(tables) => {
            for table in tables {
                render_table(out, table);
            }
        }
        Section::Info(message) => {
            let _ = writeln!(out, "<div class=\"info\">{}</div>", escape_html(message));
        }
        Section::Warning(message) => {
            let _ = writeln!(out, "<div class=\"warning\">{}</div>", escape_html(message));
        }
        Section::Download { file_name } => {
            let _ = writeln!(
                out,
                "<p><a href=\"/download\" download=\"{}\">{DOWNLOAD_LABEL}</a></p>",
                escape_html(file_name)
            );
        }
        Section::Caption(text) => {
            let _ = writeln!(out, "<p class=\"caption\">{}</p>", escape_html(text));
        }
        Section::QuestionForm { question } => {
            let value = escape_html(question.as_deref().unwrap_or_default());
            let _ = writeln!(
                out,
                "<form method=\"get\" action=\"/\">\
                 <input type=\"text\" name=\"q\" value=\"{value}\" placeholder=\"{QUESTION_PLACEHOLDER}\">\
                 </form>"
            );
        }
        Section::Answer(answer) => {
            let _ = writeln!(
                out,
                "<p><strong>{ANSWER_HEADER}</strong> <span class=\"caption\">({})</span></p>\n<div class=\"answer\">{}</div>",
                escape_html(&answer.model),
                escape_multiline(&answer.text)
            );
        }
        Section::Footer => {
            let _ = writeln!(out, "<hr>\n<h3>{FOOTER_HEADING}</h3>\n<ul>");
            for note in FOOTER_NOTES {
                let _ = writeln!(out, "<li>{}</li>", escape_html(note));
            }
            let _ = writeln!(out, "</ul>\n<p>{}</p>", escape_html(FOOTER_CREDIT));
        }
    }
}

/// Renders the full HTML document: the fixed header followed by every section in order.
pub fn render_html(view: &PageView) -> String {
    let mut out = String::with_capacity(8 * 1024);
    let _ = writeln!(
        out,
        "<!DOCTYPE html>\n<html lang=\"zh-Hant\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{PAGE_TITLE}</title>\n\
         <link rel=\"manifest\" href=\"/manifest.webmanifest\">\n\
         <style>{STYLE}</style>\n</head>\n<body>"
    );
    let _ = writeln!(out, "<p class=\"caption\">{}</p>", escape_html(MOBILE_HINT));
    let _ = writeln!(out, "<h1>{HEADING}</h1>\n<p>{WELCOME}</p>");

    for section in &view.sections {
        render_section(&mut out, section);
    }

    out.push_str("</body>\n</html>\n");
    out
}
