use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use chat_stats::reporter::{generate_json_report, print_report, print_words, WordEntry};
use chat_stats::{AnalyzerConfig, ChatAnalyzer, ChatExport};

#[derive(Parser)]
#[command(name = "chat-stats")]
#[command(about = "Statistics and word clouds for Telegram chat exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-user statistics and top words
    Analyze {
        /// Chat export JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of top words to show
        #[arg(short = 'k', long, default_value = "20")]
        top_k: usize,

        /// Write the report to a JSON file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also write the word cloud (.svg, .png or .json; .png needs --font)
        #[arg(long, value_name = "FILE")]
        cloud: Option<PathBuf>,

        #[command(flatten)]
        resources: ResourceArgs,
    },

    /// List the most frequent words
    TopWords {
        /// Chat export JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of words to list
        #[arg(short = 'k', long, default_value = "20")]
        top_k: usize,

        #[command(flatten)]
        resources: ResourceArgs,
    },

    /// Render the word cloud
    Cloud {
        /// Chat export JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (.svg, .png or .json), defaults to <FILE stem>_wordcloud.svg
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        resources: ResourceArgs,
    },
}

#[derive(Args)]
struct ResourceArgs {
    /// Analyzer config (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop-word list, one word per line (replaces the bundled list)
    #[arg(long, value_name = "FILE")]
    stop_words: Option<PathBuf>,

    /// TrueType/OpenType font used to measure and draw the word cloud
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Disable stemming
    #[arg(long)]
    no_stem: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_stats=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            file,
            top_k,
            output,
            cloud,
            resources,
        } => {
            let analyzer = load_analyzer(&file, &resources)?;
            let report = generate_json_report(&analyzer, top_k);
            print_report(&report);

            if let Some(output_path) = output {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(&output_path, json)
                    .with_context(|| format!("Failed to write {}", output_path.display()))?;
                println!("💾 Report saved: {}", output_path.display());
            }

            if let Some(cloud_path) = cloud {
                analyzer.word_cloud().to_file(&cloud_path)?;
                println!("☁️  Word cloud saved: {}", cloud_path.display());
            }
        }

        Commands::TopWords {
            file,
            top_k,
            resources,
        } => {
            let analyzer = load_analyzer(&file, &resources)?;
            let words: Vec<WordEntry> = analyzer
                .top_words(top_k)
                .into_iter()
                .map(|(word, frequency)| WordEntry { word, frequency })
                .collect();

            if words.is_empty() {
                println!("No words found.");
            } else {
                print_words(&words);
            }
        }

        Commands::Cloud {
            file,
            output,
            resources,
        } => {
            let analyzer = load_analyzer(&file, &resources)?;
            let output_path = output.unwrap_or_else(|| default_cloud_path(&file));
            let cloud = analyzer.word_cloud();

            cloud.to_file(&output_path)?;
            println!(
                "☁️  Word cloud saved: {} ({} words, {} dropped)",
                output_path.display(),
                cloud.words.len(),
                cloud.dropped
            );
        }
    }

    Ok(())
}

fn load_analyzer(file: &Path, resources: &ResourceArgs) -> Result<ChatAnalyzer> {
    let mut config = match &resources.config {
        Some(path) => AnalyzerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    if let Some(stop_words) = &resources.stop_words {
        config.stop_words = Some(stop_words.clone());
    }
    if let Some(font) = &resources.font {
        config.word_cloud.font_path = Some(font.clone());
    }
    if resources.no_stem {
        config.stem = false;
    }

    info!("Analyzing {}", file.display());
    let export = ChatExport::from_file(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let analyzer = ChatAnalyzer::with_config(export, &config)
        .with_context(|| format!("Failed to analyze {}", file.display()))?;

    Ok(analyzer)
}

/// `<dir>/<stem>_wordcloud.svg` next to the export.
fn default_cloud_path(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("chat");
    file.with_file_name(format!("{}_wordcloud.svg", stem))
}
