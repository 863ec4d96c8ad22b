// src/client.rs
use std::path::Path;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use scraper::Html;
use url::Url;

use crate::utils::error::FetchError;

const USER_AGENT: &str = concat!("laroussefr/", env!("CARGO_PKG_VERSION"));
// Stay well under the site's tolerance when callers loop over words.
const REQUEST_DELAY_MS: u64 = 150;

const HOST: &str = "larousse.fr";
const DICT_PATH: &str = "larousse.fr/dictionnaires/";
const DEFINITION_PATH: &str = "larousse.fr/dictionnaires/francais/";
const TRANSLATION_PATHS: [&str; 2] = [
    "larousse.fr/dictionnaires/francais-anglais/",
    "larousse.fr/dictionnaires/anglais-francais/",
];

/// Returns true if `input` names an existing local file.
pub fn is_file(input: &str) -> bool {
    Path::new(input).exists()
}

/// Obtains and parses a page from a local file path or a URL.
///
/// Newlines, tabs and carriage returns are stripped from the raw page
/// before parsing: the markup encodes structure in sibling positions,
/// and stray whitespace nodes between elements would shift them.
pub async fn fetch_document(input: &str) -> Result<Html, FetchError> {
    if input.is_empty() {
        return Err(FetchError::BadUrl {
            url: String::new(),
            reason: "empty input".into(),
        });
    }
    let raw = if is_file(input) {
        tracing::debug!("Reading page from file: {}", input);
        tokio::fs::read_to_string(input).await?
    } else {
        fetch_url(input).await?
    };
    Ok(Html::parse_document(&clean_page_data(&raw)))
}

fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}

async fn fetch_url(url: &str) -> Result<String, FetchError> {
    let client = build_client()?;
    tracing::info!("Downloading page from: {}", url);

    tokio::time::sleep(Duration::from_millis(REQUEST_DELAY_MS)).await;

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        return Err(FetchError::Http {
            status,
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
    Ok(body)
}

fn clean_page_data(raw: &str) -> String {
    raw.replace(['\n', '\t', '\r'], "")
}

/// Checks that `input` is a plausible dictionary URL: http(s), a
/// larousse.fr host, a dictionary path, and no doubled slashes after the
/// host.
pub fn validate_url(input: &str) -> Result<(), FetchError> {
    let bad = |reason: String| FetchError::BadUrl {
        url: input.to_string(),
        reason,
    };

    percent_decode_str(input)
        .decode_utf8()
        .map_err(|e| bad(e.to_string()))?;

    let parsed = Url::parse(input).map_err(|e| bad(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(bad("scheme must be http or https".into()));
    }
    if !parsed.host_str().unwrap_or("").contains(HOST) {
        return Err(bad(format!("hostname must contain {}", HOST)));
    }
    if let Some(i) = input.find(HOST) {
        if input[i + HOST.len()..].contains("//") {
            return Err(bad("found \"//\" after the hostname".into()));
        }
    }
    if !input.contains(DICT_PATH) {
        return Err(bad(format!("must contain \"{}\"", DICT_PATH)));
    }
    Ok(())
}

/// Checks that `input` points at a French definition page and names a
/// word.
pub fn validate_definition_url(input: &str) -> Result<(), FetchError> {
    validate_url(input)?;
    if !input.contains(DEFINITION_PATH) || input.ends_with(DEFINITION_PATH) {
        return Err(FetchError::BadUrl {
            url: input.to_string(),
            reason: format!("must contain \"{}\" followed by a word", DEFINITION_PATH),
        });
    }
    Ok(())
}

/// Checks that `input` points at a bilingual translation page and names
/// a word.
pub fn validate_translation_url(input: &str) -> Result<(), FetchError> {
    validate_url(input)?;
    for path in TRANSLATION_PATHS {
        if input.contains(path) && !input.ends_with(path) {
            return Ok(());
        }
    }
    Err(FetchError::BadUrl {
        url: input.to_string(),
        reason: format!(
            "must contain \"{}\" or \"{}\" followed by a word",
            TRANSLATION_PATHS[0], TRANSLATION_PATHS[1]
        ),
    })
}
