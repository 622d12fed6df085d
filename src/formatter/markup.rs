//! Tags and classes used in the generated markup.

use super::section::ListKind;

pub const HEADER_CLASS: &str = "text-xl font-semibold text-pink-600 mt-6 mb-2";
pub const SUB_HEADER_CLASS: &str = "text-lg font-medium text-pink-500 mt-4 mb-1";
pub const BODY_CLASS: &str = "text-gray-700 mb-4";
pub const UNORDERED_CLASS: &str = "list-disc pl-6 space-y-1 mb-4";
pub const ORDERED_CLASS: &str = "list-decimal pl-6 space-y-2 mb-4";

/// Closing tags that over-closing can duplicate
pub const CLOSING_TAGS: [&str; 3] = ["</li>", "</ul>", "</ol>"];

pub fn header(label: &str) -> String {
    format!(r#"<h3 class="{HEADER_CLASS}">{label}</h3>"#)
}

pub fn sub_header(text: &str) -> String {
    format!(r#"<h4 class="{SUB_HEADER_CLASS}">{text}</h4>"#)
}

pub fn open_body() -> String {
    format!(r#"<p class="{BODY_CLASS}">"#)
}

pub const CLOSE_BODY: &str = "</p>";

pub fn item(text: &str) -> String {
    format!("<li>{text}</li>")
}

impl ListKind {
    pub fn open_tag(self) -> String {
        match self {
            ListKind::Unordered => format!(r#"<ul class="{UNORDERED_CLASS}">"#),
            ListKind::Ordered => format!(r#"<ol class="{ORDERED_CLASS}">"#),
        }
    }

    pub fn close_tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "</ul>",
            ListKind::Ordered => "</ol>",
        }
    }
}
