//! Bookmarks Module
//!
//! CRUD over the `bookmarks` table: a titled URL with a description and a
//! numeric rating.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookmarks::bookmarks;
//!
//! for (name, sql) in bookmarks::migrations() {
//!     conn.execute_batch(sql).await?;
//! }
//!
//! let app = Router::new()
//!     .nest("/api/bookmarks", bookmarks::routes())
//!     .with_state(app_state);
//!
//! let store = bookmarks::BookmarkStore::new(connection);
//! let all = store.list_all().await?;
//! ```

mod handler;
mod model;
mod routes;
mod store;

pub use model::*;
pub use routes::routes;
pub use store::BookmarkStore;

/// Schema for the bookmarks table, run once at startup.
pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[(
        "bookmarks_001_schema.sql",
        include_str!("migrations/001_schema.sql"),
    )]
}
