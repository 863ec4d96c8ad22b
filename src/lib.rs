// src/lib.rs
//
// Extraction of structured records from Larousse dictionary pages: the
// monolingual French dictionary and the French/English bilingual
// dictionaries. Pages are obtained from the network or from local files,
// parsed, and walked by class-attribute roles into typed records.

pub mod client;
pub mod extractors;
pub mod models;
pub mod utils;

pub use extractors::definition;
pub use extractors::translation;
pub use extractors::translation::Lang;
pub use models::{diff, DefinitionPage, Mismatch, StructuralEq, TranslationPage};
pub use utils::error::{Error, FetchError, ScrapeError};
