//! Books repository for database operations

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::{BooksRepository, PgRepository};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookLibraryRow, BookRow, BookWrite},
        Book, Library,
    },
};

const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, a.id AS author_id,
           a.first_name AS author_first_name, a.last_name AS author_last_name
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

/// Escape LIKE wildcards so user text matches literally
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl PgRepository {
    /// Attach library sets to book rows, preserving row order
    async fn books_hydrate(&self, rows: Vec<BookRow>) -> AppResult<Vec<Book>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let memberships = sqlx::query_as::<_, BookLibraryRow>(
            r#"
            SELECT bl.book_id, l.id AS library_id, l.name AS library_name
            FROM book_libraries bl
            JOIN libraries l ON l.id = bl.library_id
            WHERE bl.book_id = ANY($1)
            ORDER BY l.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_book: HashMap<i32, Vec<Library>> = HashMap::new();
        for row in memberships {
            by_book.entry(row.book_id).or_default().push(Library {
                id: row.library_id,
                name: row.library_name,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let libraries = by_book.remove(&row.id).unwrap_or_default();
                row.into_book(libraries)
            })
            .collect())
    }

    async fn books_fetch_one(&self, id: i32) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{} WHERE b.id = $1", BOOK_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.books_hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn books_replace_libraries(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        library_ids: &[i32],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM book_libraries WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;

        if !library_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO book_libraries (book_id, library_id)
                SELECT $1, UNNEST($2::int4[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(book_id)
            .bind(library_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BooksRepository for PgRepository {
    async fn books_list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!("{} ORDER BY b.id", BOOK_SELECT))
            .fetch_all(&self.pool)
            .await?;
        self.books_hydrate(rows).await
    }

    async fn books_find(&self, id: i32) -> AppResult<Option<Book>> {
        self.books_fetch_one(id).await
    }

    async fn books_find_in_library(&self, library_id: i32, book_id: i32) -> AppResult<Option<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            r#"{}
            WHERE b.id = $1
              AND EXISTS (
                  SELECT 1 FROM book_libraries bl
                  WHERE bl.book_id = b.id AND bl.library_id = $2
              )"#,
            BOOK_SELECT
        ))
        .bind(book_id)
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(self.books_hydrate(rows).await?.pop())
    }

    async fn books_search_title(&self, text: &str) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "{} WHERE b.title ILIKE '%' || $1 || '%' ORDER BY b.id",
            BOOK_SELECT
        ))
        .bind(escape_like(text))
        .fetch_all(&self.pool)
        .await?;
        self.books_hydrate(rows).await
    }

    async fn books_create(&self, data: &BookWrite) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO books (title, author_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(&data.title)
        .bind(data.author_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::books_replace_libraries(&mut tx, id, &data.library_ids).await?;
        tx.commit().await?;

        self.books_fetch_one(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Book {} missing after insert", id)))
    }

    async fn books_update(&self, id: i32, data: &BookWrite) -> AppResult<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE books SET title = $1, author_id = $2 WHERE id = $3")
            .bind(&data.title)
            .bind(data.author_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        Self::books_replace_libraries(&mut tx, id, &data.library_ids).await?;
        tx.commit().await?;

        self.books_fetch_one(id).await
    }

    async fn books_delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
