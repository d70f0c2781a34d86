use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use yomu_config::Config;
use yomu_core::LanguageProcessor;
use yomu_lang_japanese::JapaneseProcessor;
use yomu_search::SearchCoordinator;

mod logging;
mod output;
mod repl;

use self::output::{OutputFormat, Printer};

#[derive(Parser, Debug)]
#[command(name = "yomu", about = "Japanese dictionary lookup")]
struct Cli {
    /// JSON config profile. Defaults plus environment overrides when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a word, phrase or English text, merged across dictionaries
    Search { query: String },
    /// Exact lookup without deinflection unless asked
    Lookup {
        word: String,
        #[arg(short, long)]
        deinflect: bool,
    },
    /// Show the dictionary-form candidates for an inflected word
    Deinflect { surface: String },
    /// Entries whose headword or reading starts with a prefix
    Prefix {
        prefix: String,
        /// Search imported dictionaries instead of built-in ones
        #[arg(long)]
        imported: bool,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Search English glosses of built-in dictionaries
    Meaning {
        text: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// List loaded dictionaries
    Sources,
    /// Interactive debounced search
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.log_json);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::new(),
    };

    let processor = {
        let config = config.clone();
        let processor =
            tokio::task::spawn_blocking(move || JapaneseProcessor::from_config(&config)).await?;
        Arc::new(processor)
    };
    tracing::info!("Loaded sources: {:?}", processor.source_ids());

    let printer = Printer::new(cli.format, &config.lookup);
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Search { query } => printer.entries(&mut stdout, &processor.search(&query))?,
        Command::Lookup { word, deinflect } => {
            let word = processor.normalize(&word);
            let entries = if deinflect {
                processor.lookup_with_deinflection(&word)
            } else {
                processor.lookup(&word)
            };
            printer.entries(&mut stdout, &entries)?;
        }
        Command::Deinflect { surface } => {
            let candidates = processor.deinflect(&surface);
            printer.deinflections(&mut stdout, &processor.normalize(&surface), &candidates)?;
        }
        Command::Prefix {
            prefix,
            imported,
            limit,
        } => {
            let prefix = processor.normalize(&prefix);
            let entries = if imported {
                processor.search_imported_dictionaries_by_prefix(&prefix, limit)
            } else {
                processor.search_by_prefix(&prefix, limit)
            };
            printer.entries(&mut stdout, &entries)?;
        }
        Command::Meaning { text, limit } => {
            printer.entries(&mut stdout, &processor.search_by_meaning(text.trim(), limit))?;
        }
        Command::Sources => {
            let store = processor.store();
            for source in store.built_in().iter().chain(store.imported().iter()) {
                let metadata = source.metadata();
                writeln!(
                    stdout,
                    "{}\t{}\t{} entries",
                    source.source(),
                    metadata.name,
                    metadata.entry_count
                )?;
            }
        }
        Command::Repl => {
            drop(stdout);
            let coordinator = SearchCoordinator::new(processor.clone(), &config.search);
            repl::run(processor, coordinator, printer).await?;
        }
    }

    Ok(())
}
