// Chat statistics over a single export
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::export::{ChatExport, Message};
use crate::nlp::{is_question, sentence_tokenize, StopWords, TextPipeline};
use crate::wordcloud::WordCloud;

/// Analyzer for one chat export.
///
/// Everything derived from the export (token stream, id index, word cloud)
/// is computed once in the constructor; the query methods only read.
pub struct ChatAnalyzer {
    export: ChatExport,
    stop_words: StopWords,
    tokens: Vec<String>,
    index: HashMap<i64, usize>,
    word_cloud: WordCloud,
}

/// Headline numbers for an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub total_messages: usize,
    /// Messages with `"type": "service"` (joins, pins, title changes)
    pub service_messages: usize,
    pub users: usize,
    pub total_tokens: usize,
    pub distinct_words: usize,
    pub replies: usize,
    /// Replies whose target is not in the export
    pub dangling_replies: usize,
}

impl ChatAnalyzer {
    /// Decode `input` and analyze it, loading stop words as configured.
    pub fn from_json(input: &str, config: &AnalyzerConfig) -> Result<Self> {
        let export = ChatExport::from_json(input)?;
        Self::with_config(export, config)
    }

    /// Analyze an already decoded export, loading stop words as configured.
    pub fn with_config(export: ChatExport, config: &AnalyzerConfig) -> Result<Self> {
        let pipeline = TextPipeline::new(config.stem)?;
        let stop_words = config.load_stop_words(pipeline.normalizer())?;
        Self::build(export, stop_words, config, &pipeline)
    }

    /// Analyze with an explicit stop-word set.
    pub fn new(export: ChatExport, stop_words: StopWords, config: &AnalyzerConfig) -> Result<Self> {
        let pipeline = TextPipeline::new(config.stem)?;
        Self::build(export, stop_words, config, &pipeline)
    }

    fn build(
        export: ChatExport,
        stop_words: StopWords,
        config: &AnalyzerConfig,
        pipeline: &TextPipeline,
    ) -> Result<Self> {
        config.validate()?;

        let content = export
            .messages
            .iter()
            .map(|msg| msg.text.flatten())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let tokens = pipeline.tokens(&content, &stop_words);

        // First occurrence wins for duplicated ids
        let mut index = HashMap::with_capacity(export.messages.len());
        for (i, msg) in export.messages.iter().enumerate() {
            index.entry(msg.id).or_insert(i);
        }

        debug!(
            "Analyzing {} messages: {} tokens, {} stop words",
            export.messages.len(),
            tokens.len(),
            stop_words.len()
        );

        let word_cloud = WordCloud::generate(&rank_words(&tokens, &stop_words), &config.word_cloud)?;

        Ok(Self {
            export,
            stop_words,
            tokens,
            index,
            word_cloud,
        })
    }

    pub fn export(&self) -> &ChatExport {
        &self.export
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Normalized token stream of the whole chat, stop words included.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn message_count(&self) -> usize {
        self.export.messages.len()
    }

    /// Look up a message by id.
    pub fn message(&self, id: i64) -> Option<&Message> {
        self.index.get(&id).map(|&i| &self.export.messages[i])
    }

    /// Number of messages per sender.
    pub fn user_message_counts(&self) -> BTreeMap<String, usize> {
        let mut users = BTreeMap::new();
        for msg in &self.export.messages {
            *users.entry(msg.sender().to_string()).or_insert(0) += 1;
        }
        users
    }

    /// Ids replied to by each sender, in message order.
    pub fn users_with_reply(&self) -> BTreeMap<String, Vec<i64>> {
        let mut users: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        for msg in &self.export.messages {
            if let Some(reply_to) = msg.reply_to_message_id {
                users
                    .entry(msg.sender().to_string())
                    .or_default()
                    .push(reply_to);
            }
        }
        users
    }

    /// Messages per sender that contain at least one question.
    pub fn users_with_question(&self) -> BTreeMap<String, usize> {
        let mut users = BTreeMap::new();
        for msg in &self.export.messages {
            if contains_question(msg) {
                *users.entry(msg.sender().to_string()).or_insert(0) += 1;
            }
        }
        users
    }

    /// Replies per sender whose target message contains a question.
    /// Replies to ids missing from the export are skipped.
    pub fn users_with_reply_to_question(&self) -> BTreeMap<String, usize> {
        let mut users = BTreeMap::new();
        for (user, reply_ids) in self.users_with_reply() {
            let count = reply_ids
                .iter()
                .filter_map(|id| self.message(*id))
                .filter(|target| contains_question(target))
                .count();
            if count > 0 {
                users.insert(user, count);
            }
        }
        users
    }

    /// The word cloud built at construction time.
    pub fn word_cloud(&self) -> &WordCloud {
        &self.word_cloud
    }

    /// The `n` most frequent non-stop words. Ties keep first-occurrence order.
    pub fn top_words(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked = rank_words(&self.tokens, &self.stop_words);
        ranked.truncate(n);
        ranked
    }

    pub fn summary(&self) -> ChatSummary {
        let replies: Vec<i64> = self
            .export
            .messages
            .iter()
            .filter_map(|msg| msg.reply_to_message_id)
            .collect();

        ChatSummary {
            total_messages: self.message_count(),
            service_messages: self.export.messages.iter().filter(|msg| msg.is_service()).count(),
            users: self.user_message_counts().len(),
            total_tokens: self.tokens.len(),
            distinct_words: rank_words(&self.tokens, &self.stop_words).len(),
            replies: replies.len(),
            dangling_replies: replies.iter().filter(|id| self.message(**id).is_none()).count(),
        }
    }
}

/// All non-stop words ranked by frequency (stable on first occurrence).
fn rank_words(tokens: &[String], stop_words: &StopWords) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for token in tokens {
        if stop_words.contains(token) {
            continue;
        }
        let count = counts.entry(token.as_str()).or_insert(0);
        if *count == 0 {
            order.push(token.as_str());
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| (word.to_string(), counts[word]))
        .collect();
    // sort_by is stable, so equal counts stay in first-occurrence order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// True if any sentence of the message (fragment by fragment) is a question.
fn contains_question(msg: &Message) -> bool {
    msg.text
        .fragments()
        .into_iter()
        .flat_map(sentence_tokenize)
        .any(is_question)
}
