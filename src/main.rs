// src/main.rs
use clap::{Parser, ValueEnum};

use laroussefr::models::{DefinitionPage, TranslationPage};
use laroussefr::utils::error::{AppError, Error, ScrapeError};
use laroussefr::utils::logging;
use laroussefr::{client, definition, translation, Lang};

/// Command Line Interface for the Larousse page extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Word to look up, or a page URL, or a local HTML file path
    input: String,

    /// Which dictionary to extract from
    #[arg(short, long, value_enum, default_value = "definition")]
    mode: Mode,

    /// Source language (translation mode only)
    #[arg(long, value_enum, default_value = "francais")]
    from: LangArg,

    /// Target language (translation mode only)
    #[arg(long, value_enum, default_value = "anglais")]
    to: LangArg,

    /// Write the JSON record to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Definition,
    Translation,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LangArg {
    Francais,
    Anglais,
}

impl From<LangArg> for Lang {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::Francais => Lang::French,
            LangArg::Anglais => Lang::English,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Setup logging (reads RUST_LOG env var)
    logging::setup_logging();

    let args = Args::parse();
    tracing::info!("Starting extraction for args: {:?}", args);

    let json = match args.mode {
        Mode::Definition => {
            let page = definition_page(&args.input).await?;
            to_json(&page, args.pretty)?
        }
        Mode::Translation => {
            let page = translation_page(&args.input, args.from.into(), args.to.into()).await?;
            to_json(&page, args.pretty)?
        }
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            tracing::info!("Wrote record to {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Treats the input as a file or URL when it looks like one, otherwise as
/// a word to look up. A "word not found" page degrades to a record whose
/// `see_also` carries the search suggestions.
async fn definition_page(input: &str) -> Result<DefinitionPage, Error> {
    let res = if client::is_file(input) || input.contains("larousse.fr") {
        definition::from_file_or_url(input).await
    } else {
        definition::lookup(input).await
    };
    match res {
        Err(Error::Scrape(ScrapeError::WordNotFound { suggestions })) => {
            tracing::warn!("Word not found; {} suggestions offered", suggestions.len());
            Ok(DefinitionPage::from_suggestions(suggestions))
        }
        other => other,
    }
}

async fn translation_page(input: &str, from: Lang, to: Lang) -> Result<TranslationPage, Error> {
    let res = if client::is_file(input) || input.contains("larousse.fr") {
        translation::from_file_or_url(input).await
    } else {
        translation::lookup(input, from, to).await
    };
    match res {
        Err(Error::Scrape(ScrapeError::WordNotFound { suggestions })) => {
            tracing::warn!("Word not found; {} suggestions offered", suggestions.len());
            Ok(TranslationPage::from_suggestions(suggestions))
        }
        other => other,
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
