//! Formatting of messages and file payloads into outbound content
//!
//! These are pure helpers; the manager applies them uniformly wherever a
//! message or file payload becomes a content block.

use crate::types::{ChatMessage, ContentPart, FileData, MessageContent, MessageKind};

use super::estimator::CHARS_PER_TOKEN;

/// In-band notice appended to text that was cut to fit the budget
pub const TRUNCATION_NOTICE: &str = "\n\n[Content truncated due to length limits...]";

/// Characters kept back for the truncation notice when cutting text
const NOTICE_HEADROOM: usize = 100;

/// Convert a message into its outbound content form
///
/// File messages flagged as images with a resolvable URL become a two-part
/// multimodal block; other file messages become `[File: name]` plus any
/// extracted text; everything else (including a file message with no payload)
/// passes through as plain text.
pub fn format_message(message: &ChatMessage) -> MessageContent {
    if let (MessageKind::File, Some(file)) = (message.kind, &message.file) {
        if file.metadata.is_image {
            if let Some(url) = file.url.as_deref().filter(|u| !u.is_empty()) {
                let text = match file.analysis.as_deref() {
                    Some(analysis) => format!("{} - {}", message.content, analysis),
                    None => message.content.clone(),
                };
                return MessageContent::Parts(vec![
                    ContentPart::text(text),
                    ContentPart::image_url(url),
                ]);
            }
        }

        let mut content = format!("[File: {}]", file.name);
        if let Some(extracted) = file.extracted_text.as_deref() {
            content.push('\n');
            content.push_str(extracted);
        }
        return MessageContent::Text(content);
    }

    MessageContent::Text(message.content.clone())
}

/// Format a request-scoped file payload into a document-context block
///
/// Returns the empty string when there is no extracted text.
pub fn format_file_context(file_data: &FileData) -> String {
    let Some(extracted) = file_data.extracted_text.as_deref().filter(|t| !t.is_empty()) else {
        return String::new();
    };

    let size = match file_data.file_size {
        Some(bytes) => {
            let mb = (bytes as f64 / 1024.0 / 1024.0 * 100.0).round() / 100.0;
            format!("{} MB", mb)
        }
        None => "unknown".to_string(),
    };

    format!(
        "[DOCUMENT CONTEXT]\nFile: {}\nType: {}\nSize: {}\n\nContent:\n{}\n\n[END DOCUMENT CONTEXT]",
        file_data.file_name, file_data.file_type, size, extracted
    )
}

/// Cut text to at most `max_tokens` worth of characters
///
/// Text that fits is returned unchanged. Cut text ends with
/// [`TRUNCATION_NOTICE`] so the model is told content was removed. The cut
/// point is snapped down to a `char` boundary.
pub fn truncate_to_tokens(text: &str, max_tokens: usize) -> String {
    let max_chars = max_tokens * CHARS_PER_TOKEN;
    if text.len() <= max_chars {
        return text.to_string();
    }

    let mut cut = max_chars.saturating_sub(NOTICE_HEADROOM);
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }

    let mut truncated = text[..cut].to_string();
    truncated.push_str(TRUNCATION_NOTICE);
    truncated
}
