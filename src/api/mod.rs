//! Client for the library REST API
//!
//! [`LibraryApi`] is the seam the services talk to; [`HttpApi`] is the
//! reqwest implementation used against a real server.

pub mod http;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        user::{LoginRequest, LoginResponse, RegisterRequest},
        Book, BookForm, Borrowing, Category,
    },
};

pub use http::HttpApi;

/// Remote operations consumed by the client.
///
/// Mutations return the server's confirmation message when it sends one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse>;

    async fn register(&self, request: &RegisterRequest) -> AppResult<Option<String>>;

    async fn list_books(&self) -> AppResult<Vec<Book>>;

    async fn get_book(&self, id: i64) -> AppResult<Book>;

    async fn create_book(&self, form: &BookForm) -> AppResult<Option<String>>;

    async fn update_book(&self, id: i64, form: &BookForm) -> AppResult<Option<String>>;

    async fn delete_book(&self, id: i64) -> AppResult<Option<String>>;

    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    /// All borrowings (admin)
    async fn list_borrowings(&self) -> AppResult<Vec<Borrowing>>;

    /// Borrowings of the signed-in member
    async fn my_borrowings(&self) -> AppResult<Vec<Borrowing>>;

    async fn borrow_book(&self, book_id: i64) -> AppResult<Option<String>>;

    async fn return_borrowing(&self, id: i64) -> AppResult<Option<String>>;
}
