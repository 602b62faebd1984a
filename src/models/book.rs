//! Book model and the admin book form

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::dates;
use crate::error::{AppError, AppResult};

/// Book record as served by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "dates::optional_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// Case-insensitive match on title, author or ISBN
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self.author.to_lowercase().contains(&query)
            || self
                .isbn
                .as_deref()
                .map(|isbn| isbn.to_lowercase().contains(&query))
                .unwrap_or(false)
    }
}

/// Book create/update form filled in by an admin
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct BookForm {
    #[validate(length(min = 1, message = "Judul buku wajib diisi"))]
    pub title: String,
    #[validate(length(min = 1, message = "Penulis wajib diisi"))]
    pub author: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Kategori wajib dipilih"))]
    pub category_id: i64,
    #[validate(range(min = 0, message = "Stok tidak boleh negatif"))]
    pub stock: i32,
    pub published_year: Option<i32>,
    pub isbn: Option<String>,
    pub cover: Option<String>,
}

impl BookForm {
    /// Run every client-side check on the form
    pub fn check(&self) -> AppResult<()> {
        let mut trimmed = self.clone();
        trimmed.title = self.title.trim().to_string();
        trimmed.author = self.author.trim().to_string();
        trimmed.validate()?;

        if let Some(year) = self.published_year {
            let current = Utc::now().year();
            if !(1000..=current).contains(&year) {
                return Err(AppError::Validation(format!(
                    "Tahun terbit harus antara 1000 dan {}",
                    current
                )));
            }
        }

        if let Some(isbn) = self.isbn.as_deref().filter(|s| !s.trim().is_empty()) {
            let digits: String = isbn.chars().filter(|c| *c != '-' && !c.is_whitespace()).collect();
            let valid_chars = digits
                .chars()
                .enumerate()
                .all(|(i, c)| c.is_ascii_digit() || (c == 'X' && i == 9 && digits.len() == 10));
            if !valid_chars || !(digits.len() == 10 || digits.len() == 13) {
                return Err(AppError::Validation(
                    "ISBN harus terdiri dari 10 atau 13 digit".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Prefill the form from an existing book for editing
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            description: book.description.clone(),
            category_id: book.category_id.unwrap_or(0),
            stock: book.stock,
            published_year: book.published_year,
            isbn: book.isbn.clone(),
            cover: book.cover.clone(),
        }
    }
}
