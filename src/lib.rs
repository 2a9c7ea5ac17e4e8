// chat-statsライブラリのエントリポイント
// CLIと外部ツールから使用するためのモジュールを公開

pub mod analyzer;
pub mod config;
pub mod error;
pub mod export;
pub mod reporter;

// テキスト処理（正規化・ステミング・分割）
pub mod nlp;

// ワードクラウド
pub mod wordcloud;

// 再エクスポート
pub use analyzer::{ChatAnalyzer, ChatSummary};
pub use config::AnalyzerConfig;
pub use error::{Result, StatsError};
pub use export::{ChatExport, Message, MessageText, TextFragment, TextSpan, UNKNOWN_SENDER};
pub use nlp::StopWords;
pub use wordcloud::{PlacedWord, WordCloud, WordCloudConfig};
