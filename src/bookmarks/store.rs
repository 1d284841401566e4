use anyhow::Result;
use libsql::{Connection, Value};
use serde_json::Number;

use super::{Bookmark, BookmarkUpdate, NewBookmark};

const COLUMNS: &str = "id, title, url, description, rating";

pub struct BookmarkStore<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Bookmark>> {
        let query = format!("SELECT {COLUMNS} FROM bookmarks ORDER BY id");

        let mut rows = self.conn.query(&query, ()).await?;
        let mut bookmarks = Vec::new();

        while let Some(row) = rows.next().await? {
            bookmarks.push(row_to_bookmark(&row)?);
        }

        Ok(bookmarks)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>> {
        let query = format!("SELECT {COLUMNS} FROM bookmarks WHERE id = ?");

        let mut rows = self.conn.query(&query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn insert(&self, input: NewBookmark) -> Result<Bookmark> {
        let query = format!(
            r#"
            INSERT INTO bookmarks (title, url, description, rating)
            VALUES (?, ?, ?, ?)
            RETURNING {COLUMNS}
        "#
        );

        let params: Vec<Value> = vec![
            input.title.into(),
            input.url.into(),
            input.description.into(),
            rating_to_value(&input.rating),
        ];

        let mut rows = self.conn.query(&query, params).await?;

        if let Some(row) = rows.next().await? {
            row_to_bookmark(&row)
        } else {
            anyhow::bail!("Failed to create bookmark")
        }
    }

    /// Returns the number of rows removed.
    pub async fn delete_by_id(&self, id: i64) -> Result<u64> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?", libsql::params![id])
            .await?;
        Ok(affected)
    }

    /// Applies the supplied fields only. Returns the number of rows changed.
    pub async fn update_by_id(&self, id: i64, input: BookmarkUpdate) -> Result<u64> {
        let mut updates = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(title) = input.title {
            updates.push("title = ?");
            params.push(title.into());
        }
        if let Some(url) = input.url {
            updates.push("url = ?");
            params.push(url.into());
        }
        if let Some(description) = input.description {
            updates.push("description = ?");
            params.push(description.into());
        }
        if let Some(rating) = &input.rating {
            updates.push("rating = ?");
            params.push(rating_to_value(rating));
        }

        if updates.is_empty() {
            return Ok(0);
        }

        params.push(id.into());
        let query = format!("UPDATE bookmarks SET {} WHERE id = ?", updates.join(", "));

        let affected = self.conn.execute(&query, params).await?;
        Ok(affected)
    }
}

fn rating_to_value(rating: &Number) -> Value {
    match rating.as_i64() {
        Some(n) => Value::Integer(n),
        None => Value::Real(rating.as_f64().unwrap_or_default()),
    }
}

fn value_to_rating(value: Value) -> Result<Number> {
    match value {
        Value::Integer(n) => Ok(Number::from(n)),
        Value::Real(f) => Number::from_f64(f).ok_or_else(|| anyhow::anyhow!("non-finite rating: {f}")),
        Value::Text(s) => s
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .ok_or_else(|| anyhow::anyhow!("non-numeric rating: {s}")),
        other => anyhow::bail!("unexpected rating value: {:?}", other),
    }
}

fn row_to_bookmark(row: &libsql::Row) -> Result<Bookmark> {
    Ok(Bookmark {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        description: row.get(3)?,
        rating: value_to_rating(row.get_value(4)?)?,
    })
}
