//! Context window manager
//!
//! The single orchestration point that turns (model, strategy, system prompt,
//! optional file payload, history, current message) into a budget-respecting
//! ordered block list ready for a chat-completion request.

use tracing::{debug, warn};

use crate::catalog::{ModelCatalog, ModelConfig};
use crate::types::{ChatMessage, ContentBlock, FileData, MessageContent};

use super::estimator::TokenEstimator;
use super::format::{format_file_context, format_message, truncate_to_tokens};
use super::strategy::ContextStrategy;

/// Default number of most-recent messages the sliding window always attempts
/// to retain
pub const DEFAULT_PRESERVE_RECENT: usize = 10;

/// Share of the total available budget a document-context block may occupy
/// when it has to be truncated
///
/// Caps a single large document so it cannot starve all conversation history.
const FILE_CONTEXT_SHARE: f64 = 0.4;

/// Snapshot of the bound model's budget parameters, for display layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
    /// Bound model identifier
    pub model_id: String,
    /// Total context window in tokens
    pub context_window: usize,
    /// Tokens reserved for the model response
    pub reserve_tokens: usize,
}

/// Budget-aware message list builder bound to one model configuration
///
/// Holds only immutable configuration; [`prepare`](Self::prepare) is a pure
/// function of its arguments, so one instance may serve concurrent requests
/// without synchronization.
///
/// Oversized input never fails: content is truncated or selectively excluded
/// so that every call produces something sendable.
#[derive(Debug, Clone)]
pub struct ContextWindowManager {
    model: ModelConfig,
    strategy: ContextStrategy,
    preserve_recent: usize,
    estimator: TokenEstimator,
}

impl ContextWindowManager {
    /// Create a manager bound to `model_id`
    ///
    /// Unknown identifiers resolve to the catalog's default entry. Strategy
    /// defaults to sliding-window with [`DEFAULT_PRESERVE_RECENT`] messages.
    pub fn new(catalog: &ModelCatalog, model_id: &str) -> Self {
        Self {
            model: catalog.get(model_id).clone(),
            strategy: ContextStrategy::default(),
            preserve_recent: DEFAULT_PRESERVE_RECENT,
            estimator: TokenEstimator::new(),
        }
    }

    /// Set the history-inclusion strategy
    pub fn with_strategy(mut self, strategy: ContextStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set how many most-recent messages the sliding window always attempts
    /// to retain
    pub fn with_preserve_recent(mut self, count: usize) -> Self {
        self.preserve_recent = count;
        self
    }

    /// The bound model configuration
    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// The configured strategy
    pub fn strategy(&self) -> ContextStrategy {
        self.strategy
    }

    /// The configured preserve-recent count
    pub fn preserve_recent(&self) -> usize {
        self.preserve_recent
    }

    /// Budget parameters of the bound model
    pub fn context_info(&self) -> ContextInfo {
        ContextInfo {
            model_id: self.model.id.clone(),
            context_window: self.model.context_window,
            reserve_tokens: self.model.reserve_tokens,
        }
    }

    /// Build the ordered block list for one chat turn
    ///
    /// Output order: `[system, (file-context)?, history..., (current)?]`.
    ///
    /// The system prompt is always emitted first and is never dropped or
    /// truncated; losing instructions is worse than losing history. A file
    /// payload with extracted text becomes a second system block, truncated to
    /// at most 40% of the available budget when it does not fit whole. History
    /// is then selected by the configured strategy over whatever budget
    /// remains after also accounting for the pending `current_message`, which
    /// is appended last as a user block.
    pub fn prepare(
        &self,
        history: &[ChatMessage],
        system_prompt: &str,
        file_data: Option<&FileData>,
        current_message: Option<&str>,
    ) -> Vec<ContentBlock> {
        let available = self.model.available_tokens();
        let mut total = 0usize;
        let mut blocks = Vec::new();

        blocks.push(ContentBlock::system(system_prompt));
        total += self.estimator.estimate_str(system_prompt);

        if let Some(data) = file_data {
            if data.has_text() {
                let file_context = format_file_context(data);
                let file_tokens = self.estimator.estimate_str(&file_context);

                if total + file_tokens < available {
                    blocks.push(ContentBlock::system(file_context));
                    total += file_tokens;
                } else {
                    let max_file_tokens = (available as f64 * FILE_CONTEXT_SHARE).floor() as usize;
                    let truncated = truncate_to_tokens(&file_context, max_file_tokens);
                    warn!(
                        file = %data.file_name,
                        file_tokens,
                        max_file_tokens,
                        "file context exceeds budget, truncating"
                    );
                    total += self.estimator.estimate_str(&truncated);
                    blocks.push(ContentBlock::system(truncated));
                }
            }
        }

        // The pending message is appended after history regardless of what
        // gets selected, so history must leave room for it.
        if let Some(current) = current_message {
            total += self.estimator.estimate_str(current);
        }

        let history_budget = available.saturating_sub(total);
        let history_blocks = match self.strategy {
            ContextStrategy::Truncate => self.truncate_history(history, history_budget),
            ContextStrategy::SlidingWindow => self.sliding_window_history(history, history_budget),
            ContextStrategy::Summarize => {
                debug!("summarize strategy not implemented, falling back to sliding-window");
                self.sliding_window_history(history, history_budget)
            }
        };
        blocks.extend(history_blocks);

        if let Some(current) = current_message {
            blocks.push(ContentBlock::user(current));
        }

        blocks
    }

    /// Greedy newest-first walk over the full history, chronological output
    fn truncate_history(&self, history: &[ChatMessage], budget: usize) -> Vec<ContentBlock> {
        let mut selected = Vec::new();
        let mut total = 0usize;

        for message in history.iter().rev() {
            let content = format_message(message);
            let tokens = self.estimator.estimate_content(&content);
            if total + tokens <= budget {
                selected.push(ContentBlock::new(message.role, content));
                total += tokens;
            } else {
                break;
            }
        }

        selected.reverse();
        selected
    }

    /// Recent-window-first selection with older-message backfill
    fn sliding_window_history(&self, history: &[ChatMessage], budget: usize) -> Vec<ContentBlock> {
        let split = history.len().saturating_sub(self.preserve_recent);
        let (older, recent) = history.split_at(split);

        let mut recent_selected = Vec::new();
        let mut total = 0usize;

        for message in recent.iter().rev() {
            let content = format_message(message);
            let tokens = self.estimator.estimate_content(&content);

            if total + tokens <= budget {
                recent_selected.push(ContentBlock::new(message.role, content));
                total += tokens;
            } else if recent_selected.is_empty() {
                // Even the single most recent message does not fit. Force it
                // in: text gets cut to whatever budget remains, multimodal
                // content goes in whole since it cannot be text-truncated.
                match content {
                    MessageContent::Parts(_) => {
                        debug!(tokens, budget, "force-including oversized multimodal message");
                        total += tokens;
                        recent_selected.push(ContentBlock::new(message.role, content));
                    }
                    MessageContent::Text(text) => {
                        debug!(tokens, budget, "force-including truncated oversized message");
                        let truncated = truncate_to_tokens(&text, budget);
                        total += self.estimator.estimate_str(&truncated);
                        recent_selected.push(ContentBlock::new(message.role, truncated));
                    }
                }
                break;
            } else {
                break;
            }
        }

        recent_selected.reverse();

        // Backfill leftover budget with older messages, newest-of-the-old
        // first, keeping chronological output order.
        let mut selected = Vec::new();
        for message in older.iter().rev() {
            let content = format_message(message);
            let tokens = self.estimator.estimate_content(&content);
            if total + tokens <= budget {
                selected.push(ContentBlock::new(message.role, content));
                total += tokens;
            } else {
                break;
            }
        }
        selected.reverse();

        selected.extend(recent_selected);
        selected
    }

    /// Whether system prompt, formatted history and the pending message fit
    /// inside `context_window - reserve_tokens`
    ///
    /// Pure diagnostic predicate; `prepare` does not consult it.
    pub fn fits(
        &self,
        history: &[ChatMessage],
        system_prompt: &str,
        current_message: Option<&str>,
    ) -> bool {
        let mut total = self.estimator.estimate_str(system_prompt);

        if let Some(current) = current_message {
            total += self.estimator.estimate_str(current);
        }

        for message in history {
            total += self.estimator.estimate_content(&format_message(message));
        }

        total <= self.model.available_tokens()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::format::TRUNCATION_NOTICE;
    use crate::types::{FileAttachment, MessageRole};

    fn manager(model_id: &str) -> ContextWindowManager {
        ContextWindowManager::new(&ModelCatalog::new(), model_id)
    }

    fn small_history(count: usize) -> Vec<ChatMessage> {
        (0..count)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::user(format!("user turn {}", i))
                } else {
                    ChatMessage::assistant(format!("assistant turn {}", i))
                }
            })
            .collect()
    }

    fn estimated_tokens(blocks: &[ContentBlock]) -> usize {
        let estimator = TokenEstimator::new();
        blocks
            .iter()
            .map(|b| estimator.estimate_content(&b.content))
            .sum()
    }

    #[test]
    fn test_empty_history_and_current_message() {
        // Scenario A: system prompt + current message only
        let manager = manager("gpt-3.5-turbo");
        let system_prompt = "s".repeat(400); // 100 tokens

        let blocks = manager.prepare(&[], &system_prompt, None, Some("Hello"));

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].role, MessageRole::System);
        assert_eq!(blocks[0].content.as_text(), Some(system_prompt.as_str()));
        assert_eq!(blocks[1].role, MessageRole::User);
        assert_eq!(blocks[1].content.as_text(), Some("Hello"));
    }

    #[test]
    fn test_system_prompt_always_first_and_verbatim() {
        let manager = manager("gpt-3.5-turbo");
        let history = small_history(30);
        let huge_doc = FileData::new("doc.txt", "text/plain", &"d".repeat(100_000));

        let blocks = manager.prepare(&history, "be terse", Some(&huge_doc), Some("hi"));

        assert_eq!(blocks[0].role, MessageRole::System);
        assert_eq!(blocks[0].content.as_text(), Some("be terse"));
    }

    #[test]
    fn test_small_file_included_whole() {
        let manager = manager("gpt-4o");
        let data = FileData::new("notes.txt", "text/plain", "a few lines");

        let blocks = manager.prepare(&[], "prompt", Some(&data), None);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].role, MessageRole::System);
        let text = blocks[1].content.as_text().unwrap();
        assert!(text.contains("[DOCUMENT CONTEXT]"));
        assert!(text.contains("a few lines"));
        assert!(!text.contains(TRUNCATION_NOTICE.trim_start()));
    }

    #[test]
    fn test_oversized_file_truncated_to_forty_percent() {
        // ~15k estimated tokens against gpt-3.5-turbo's 14385 available
        let manager = manager("gpt-3.5-turbo");
        let data = FileData::new("big.txt", "text/plain", &"x".repeat(60_000));

        let blocks = manager.prepare(&[], "p", Some(&data), None);

        let available = manager.model().available_tokens(); // 14385
        let cap = (available as f64 * 0.4).floor() as usize; // 5754
        let text = blocks[1].content.as_text().unwrap();

        assert!(text.ends_with(TRUNCATION_NOTICE));
        assert!(TokenEstimator::new().estimate_str(text) <= cap);
    }

    #[test]
    fn test_short_history_fully_included_in_order() {
        // Scenario C: 5 small messages all survive, oldest first
        let manager = manager("gpt-4o").with_strategy(ContextStrategy::SlidingWindow);
        let history = small_history(5);

        let blocks = manager.prepare(&history, "p", None, None);

        assert_eq!(blocks.len(), 6);
        for (block, message) in blocks[1..].iter().zip(&history) {
            assert_eq!(block.role, message.role);
            assert_eq!(block.content.as_text(), Some(message.content.as_str()));
        }
    }

    #[test]
    fn test_truncate_strategy_drops_oldest_first() {
        let mut catalog = ModelCatalog::new();
        catalog
            .apply_overrides([crate::catalog::ModelConfig::new("tiny", 200)
                .with_reserve_tokens(100)])
            .unwrap();
        let manager = ContextWindowManager::new(&catalog, "tiny")
            .with_strategy(ContextStrategy::Truncate);

        // 10 messages of ~25 tokens each against a ~100-token budget
        let history: Vec<ChatMessage> = (0..10)
            .map(|i| ChatMessage::user(format!("{:0>98}#{}", "", i)))
            .collect();

        let blocks = manager.prepare(&history, "", None, None);
        let kept = &blocks[1..];

        assert!(kept.len() < 10);
        // Only the newest survive, chronological among themselves
        let first_kept = kept[0].content.as_text().unwrap();
        assert!(first_kept.ends_with(&format!("#{}", 10 - kept.len())));
        let last_kept = kept.last().unwrap().content.as_text().unwrap();
        assert!(last_kept.ends_with("#9"));
    }

    #[test]
    fn test_sliding_window_backfills_older_messages() {
        let mut catalog = ModelCatalog::new();
        catalog
            .apply_overrides([crate::catalog::ModelConfig::new("mid", 2_000)
                .with_reserve_tokens(1_000)])
            .unwrap();
        let manager = ContextWindowManager::new(&catalog, "mid")
            .with_strategy(ContextStrategy::SlidingWindow)
            .with_preserve_recent(3);

        // 20 tiny messages; window keeps the last 3, then backfills older
        let history: Vec<ChatMessage> = (0..20)
            .map(|i| ChatMessage::user(format!("m{:02}", i)))
            .collect();

        let blocks = manager.prepare(&history, "", None, None);
        let kept: Vec<&str> = blocks[1..]
            .iter()
            .map(|b| b.content.as_text().unwrap())
            .collect();

        // Everything fits here, so backfill reaches the whole history,
        // chronological order restored across the older/recent seam
        assert_eq!(kept.first(), Some(&"m00"));
        assert_eq!(kept.last(), Some(&"m19"));
        assert!(kept.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_forced_inclusion_of_oversized_text_message() {
        let mut catalog = ModelCatalog::new();
        catalog
            .apply_overrides([crate::catalog::ModelConfig::new("tiny", 600)
                .with_reserve_tokens(100)])
            .unwrap();
        let manager = ContextWindowManager::new(&catalog, "tiny");

        let history = vec![
            ChatMessage::user("older context"),
            ChatMessage::user("y".repeat(10_000)), // ~2500 tokens, budget ~500
        ];

        let blocks = manager.prepare(&history, "", None, None);

        // Exactly one history block: the truncated newest message, alone
        assert_eq!(blocks.len(), 2);
        let text = blocks[1].content.as_text().unwrap();
        assert!(text.ends_with(TRUNCATION_NOTICE));
        assert!(TokenEstimator::new().estimate_str(text) <= 500);
    }

    #[test]
    fn test_forced_inclusion_of_multimodal_message() {
        // Scenario D: image block included whole even when it alone overflows
        let mut catalog = ModelCatalog::new();
        catalog
            .apply_overrides([crate::catalog::ModelConfig::new("tiny", 110)
                .with_reserve_tokens(100)])
            .unwrap();
        let manager = ContextWindowManager::new(&catalog, "tiny");

        let attachment = FileAttachment::new("shot.png", "image/png")
            .image("https://cdn.example.com/a-fairly-long-image-url/shot.png")
            .with_analysis("a screenshot of the dashboard");
        let history = vec![
            ChatMessage::user("earlier"),
            ChatMessage::file("what is this?", attachment),
        ];

        let blocks = manager.prepare(&history, "", None, None);

        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].content.is_multimodal());
        // Forced inclusion consumed the budget; the older message was not
        // smuggled in behind it
        assert!(estimated_tokens(&blocks[1..]) > manager.model().available_tokens());
    }

    #[test]
    fn test_budget_respected_without_forced_inclusion() {
        let manager = manager("gpt-3.5-turbo");
        let history: Vec<ChatMessage> = (0..50)
            .map(|i| ChatMessage::user(format!("turn {} {}", i, "w".repeat(2_000))))
            .collect();
        let data = FileData::new("doc.md", "text/markdown", &"m".repeat(30_000));

        let blocks = manager.prepare(&history, "short prompt", Some(&data), Some("next"));

        // Everything except the pending current message stays within budget
        let without_current = &blocks[..blocks.len() - 1];
        assert!(estimated_tokens(without_current) <= manager.model().available_tokens());
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let manager = manager("gpt-3.5-turbo").with_strategy(ContextStrategy::SlidingWindow);
        let history = small_history(25);
        let data = FileData::new("a.txt", "text/plain", &"z".repeat(80_000));

        let first = manager.prepare(&history, "sys", Some(&data), Some("go"));
        let second = manager.prepare(&history, "sys", Some(&data), Some("go"));

        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_model_falls_back() {
        // Scenario E
        let manager = manager("some-future-model");
        assert_eq!(manager.model().id, "gpt-4o");
        assert_eq!(manager.context_info().context_window, 128_000);
    }

    #[test]
    fn test_summarize_behaves_like_sliding_window() {
        let history = small_history(15);
        let sliding = manager("gpt-3.5-turbo")
            .with_strategy(ContextStrategy::SlidingWindow)
            .prepare(&history, "p", None, Some("q"));
        let summarize = manager("gpt-3.5-turbo")
            .with_strategy(ContextStrategy::Summarize)
            .prepare(&history, "p", None, Some("q"));

        assert_eq!(sliding, summarize);
    }

    #[test]
    fn test_current_message_reserved_before_history() {
        let mut catalog = ModelCatalog::new();
        catalog
            .apply_overrides([crate::catalog::ModelConfig::new("tiny", 300)
                .with_reserve_tokens(100)])
            .unwrap();
        let manager = ContextWindowManager::new(&catalog, "tiny");

        // Budget 200; current message eats 150 of it, leaving ~50 for history
        let current = "c".repeat(600);
        let history: Vec<ChatMessage> = (0..5)
            .map(|i| ChatMessage::user(format!("{}{}", "h".repeat(120), i)))
            .collect();

        let blocks = manager.prepare(&history, "", None, Some(&current));
        let history_blocks = &blocks[1..blocks.len() - 1];

        // ~31 tokens per history message against ~50 left: at most one fits
        assert!(history_blocks.len() <= 1);
        assert_eq!(
            blocks.last().unwrap().content.as_text(),
            Some(current.as_str())
        );
    }

    #[test]
    fn test_fits_predicate() {
        let manager = manager("gpt-3.5-turbo");

        assert!(manager.fits(&small_history(5), "short prompt", Some("hello")));
        assert!(!manager.fits(
            &[ChatMessage::user("b".repeat(100_000))],
            "short prompt",
            None
        ));
    }

    #[test]
    fn test_fits_counts_formatted_file_messages() {
        let manager = manager("gpt-4o");
        let attachment =
            FileAttachment::new("data.csv", "text/csv").with_extracted_text("a,b\n1,2");
        let history = vec![ChatMessage::file("", attachment)];

        // Formatting adds the [File: ...] header, still tiny
        assert!(manager.fits(&history, "", None));
    }

    #[test]
    fn test_empty_everything() {
        let manager = manager("gpt-4o");
        let blocks = manager.prepare(&[], "", None, None);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].role, MessageRole::System);
        assert_eq!(blocks[0].content.as_text(), Some(""));
    }
}
