// src/extractors/mod.rs
pub mod classify;
pub mod definition;
pub mod dom;
pub mod page;
pub mod translation;
