//! Book catalog: cached listing plus admin create/update/delete

use std::sync::{Arc, RwLock};

use crate::{
    api::LibraryApi,
    error::{AppError, AppResult},
    models::{Book, BookForm, Category, Operation},
};

use super::{forms::FormFlow, session::SessionContext};

/// Books and categories shown by the current view.
///
/// The cache is only a view copy: every mutation is followed by a full
/// re-fetch from the server.
#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn LibraryApi>,
    session: SessionContext,
    books: Arc<RwLock<Vec<Book>>>,
    categories: Arc<RwLock<Vec<Category>>>,
    book_form: Arc<FormFlow>,
}

impl CatalogService {
    pub fn new(api: Arc<dyn LibraryApi>, session: SessionContext) -> Self {
        Self {
            api,
            session,
            books: Arc::new(RwLock::new(Vec::new())),
            categories: Arc::new(RwLock::new(Vec::new())),
            book_form: Arc::new(FormFlow::new("book")),
        }
    }

    pub fn book_form(&self) -> &FormFlow {
        &self.book_form
    }

    /// Re-fetch books from the server and replace the cache
    pub async fn refresh(&self) -> AppResult<Vec<Book>> {
        self.session.role().require(Operation::BrowseBooks)?;

        let books = self.api.list_books().await?;
        tracing::debug!("Fetched {} books", books.len());
        *self
            .books
            .write()
            .map_err(|_| AppError::Storage("book cache lock poisoned".to_string()))? = books.clone();
        Ok(books)
    }

    pub async fn refresh_categories(&self) -> AppResult<Vec<Category>> {
        let categories = self.api.list_categories().await?;
        *self
            .categories
            .write()
            .map_err(|_| AppError::Storage("category cache lock poisoned".to_string()))? =
            categories.clone();
        Ok(categories)
    }

    /// Cached books
    pub fn books(&self) -> Vec<Book> {
        self.books.read().map(|b| b.clone()).unwrap_or_default()
    }

    /// Cached categories
    pub fn categories(&self) -> Vec<Category> {
        self.categories.read().map(|c| c.clone()).unwrap_or_default()
    }

    /// Cached books matching `query` and, if given, `category_id`
    pub fn search(&self, query: &str, category_id: Option<i64>) -> Vec<Book> {
        self.books()
            .into_iter()
            .filter(|book| book.matches(query))
            .filter(|book| category_id.is_none() || book.category_id == category_id)
            .collect()
    }

    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.session.role().require(Operation::BrowseBooks)?;
        self.api.get_book(id).await
    }

    pub async fn create(&self, form: &BookForm) -> AppResult<String> {
        let message = self
            .book_form
            .submit(
                || self.gate_and_check(form),
                || self.api.create_book(form),
                |m| confirmation(m, "Buku berhasil ditambahkan"),
            )
            .await?;

        tracing::info!("Created book {:?}", form.title);
        self.refresh_after_mutation().await;
        Ok(confirmation(&message, "Buku berhasil ditambahkan"))
    }

    pub async fn update(&self, id: i64, form: &BookForm) -> AppResult<String> {
        let message = self
            .book_form
            .submit(
                || self.gate_and_check(form),
                || self.api.update_book(id, form),
                |m| confirmation(m, "Buku berhasil diperbarui"),
            )
            .await?;

        tracing::info!("Updated book {}", id);
        self.refresh_after_mutation().await;
        Ok(confirmation(&message, "Buku berhasil diperbarui"))
    }

    pub async fn delete(&self, id: i64) -> AppResult<String> {
        self.session.role().require(Operation::ManageBooks)?;

        let message = self.api.delete_book(id).await?;
        tracing::info!("Deleted book {}", id);
        self.refresh_after_mutation().await;
        Ok(confirmation(&message, "Buku berhasil dihapus"))
    }

    /// The server already accepted the change, so a failed re-fetch only
    /// leaves the cache stale.
    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!("Catalog re-fetch after change failed: {}", e);
        }
    }

    fn gate_and_check(&self, form: &BookForm) -> AppResult<()> {
        self.session.role().require(Operation::ManageBooks)?;
        form.check()
    }
}

pub(crate) fn confirmation(message: &Option<String>, fallback: &str) -> String {
    message.clone().unwrap_or_else(|| fallback.to_string())
}
