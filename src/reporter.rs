use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analyzer::{ChatAnalyzer, ChatSummary};

/// Everything the CLI shows, in a serializable form.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReport {
    pub chat: Option<String>,
    pub summary: ChatSummary,
    pub users: Vec<UserEntry>,
    pub top_words: Vec<WordEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserEntry {
    pub name: String,
    pub messages: usize,
    pub replies: usize,
    pub questions: usize,
    pub replies_to_questions: usize,
    pub reply_to_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub frequency: usize,
}

pub fn generate_json_report(analyzer: &ChatAnalyzer, top: usize) -> ChatReport {
    let counts = analyzer.user_message_counts();
    let mut replies = analyzer.users_with_reply();
    let questions = analyzer.users_with_question();
    let answered = analyzer.users_with_reply_to_question();

    let mut users: Vec<UserEntry> = counts
        .into_iter()
        .map(|(name, messages)| {
            let reply_to_ids = replies.remove(&name).unwrap_or_default();
            UserEntry {
                messages,
                replies: reply_to_ids.len(),
                questions: lookup(&questions, &name),
                replies_to_questions: lookup(&answered, &name),
                reply_to_ids,
                name,
            }
        })
        .collect();
    // Most active first; BTreeMap order breaks ties by name
    users.sort_by(|a, b| b.messages.cmp(&a.messages));

    let top_words = analyzer
        .top_words(top)
        .into_iter()
        .map(|(word, frequency)| WordEntry { word, frequency })
        .collect();

    ChatReport {
        chat: analyzer.export().name.clone(),
        summary: analyzer.summary(),
        users,
        top_words,
    }
}

fn lookup(map: &BTreeMap<String, usize>, name: &str) -> usize {
    map.get(name).copied().unwrap_or(0)
}

pub fn print_report(report: &ChatReport) {
    let title = match &report.chat {
        Some(name) => format!("💬 Chat statistics: {}", name),
        None => "💬 Chat statistics".to_string(),
    };
    println!("\n{}", title.bold());
    println!("{}", "━".repeat(50));
    println!();

    let summary = &report.summary;
    println!(
        "📨 Messages: {} ({} service)",
        summary.total_messages, summary.service_messages
    );
    println!("👥 Users: {}", summary.users);
    println!(
        "↩️  Replies: {} ({} to missing messages)",
        summary.replies, summary.dangling_replies
    );
    println!(
        "🔤 Tokens: {} ({} distinct words)",
        summary.total_tokens, summary.distinct_words
    );
    println!();

    if !report.users.is_empty() {
        println!("{}", "[Users]".green().bold());
        for user in report.users.iter().take(10) {
            print_user_entry(user);
        }
        if report.users.len() > 10 {
            println!("└─ ... {} more", report.users.len() - 10);
        }
        println!();
    }

    if !report.top_words.is_empty() {
        println!("{}", "[Top words]".yellow().bold());
        print_words(&report.top_words);
        println!();
    }
}

fn print_user_entry(user: &UserEntry) {
    println!(
        "├─ {}: {} messages, {} replies, {} questions, {} answers to questions",
        user.name.bold(),
        user.messages,
        user.replies,
        user.questions,
        user.replies_to_questions
    );
}

pub fn print_words(words: &[WordEntry]) {
    let width = words
        .iter()
        .map(|w| w.word.chars().count())
        .max()
        .unwrap_or(0);
    for (rank, entry) in words.iter().enumerate() {
        println!(
            "{:>3}. {:<width$} {}",
            rank + 1,
            entry.word,
            entry.frequency.to_string().cyan(),
            width = width
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;

    #[test]
    fn test_generate_json_report() {
        let analyzer = ChatAnalyzer::from_json(
            r#"{"name": "Test", "messages": [
                {"id": 1, "from": "A", "text": "hello world?"},
                {"id": 2, "from": "B", "text": "hello", "reply_to_message_id": 1},
                {"id": 3, "from": "B", "text": "again", "reply_to_message_id": 99}
            ]}"#,
            &AnalyzerConfig::default(),
        )
        .unwrap();

        let report = generate_json_report(&analyzer, 2);
        assert_eq!(report.chat.as_deref(), Some("Test"));
        assert_eq!(report.users.len(), 2);

        let b = &report.users[0];
        assert_eq!(b.name, "B");
        assert_eq!(b.messages, 2);
        assert_eq!(b.reply_to_ids, vec![1, 99]);
        assert_eq!(b.replies_to_questions, 1);

        let a = &report.users[1];
        assert_eq!(a.questions, 1);
        assert_eq!(a.replies, 0);

        assert_eq!(report.top_words.len(), 2);
        assert_eq!(report.top_words[0].word, "hello");
        assert_eq!(report.top_words[0].frequency, 2);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"dangling_replies\":1"));
        assert!(json.contains("\"service_messages\":0"));
    }
}
