use std::error::Error;

pub mod bookmarks;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod sanitize;

/// Flattens an error and its sources into one line for logging.
pub fn unpack_error(err: &(dyn Error)) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}
