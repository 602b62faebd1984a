//! Borrowing and returning books

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{
    api::LibraryApi,
    error::AppResult,
    models::{Borrowing, BorrowingStatus, Operation, Role},
};

use super::{catalog::confirmation, forms::FormFlow, session::SessionContext};

/// A borrowing with its status resolved for display
#[derive(Debug, Clone, PartialEq)]
pub struct BorrowingRow {
    pub borrowing: Borrowing,
    pub status: BorrowingStatus,
}

#[derive(Clone)]
pub struct LoansService {
    api: Arc<dyn LibraryApi>,
    session: SessionContext,
    borrow_form: Arc<FormFlow>,
}

impl LoansService {
    pub fn new(api: Arc<dyn LibraryApi>, session: SessionContext) -> Self {
        Self {
            api,
            session,
            borrow_form: Arc::new(FormFlow::new("borrow")),
        }
    }

    pub fn borrow_form(&self) -> &FormFlow {
        &self.borrow_form
    }

    /// Borrow a book as the signed-in member
    pub async fn borrow(&self, book_id: i64) -> AppResult<String> {
        let message = self
            .borrow_form
            .submit(
                || self.session.role().require(Operation::BorrowBook),
                || self.api.borrow_book(book_id),
                |m| confirmation(m, "Buku berhasil dipinjam"),
            )
            .await?;

        tracing::info!("Borrowed book {}", book_id);
        Ok(confirmation(&message, "Buku berhasil dipinjam"))
    }

    /// Borrowings visible to the current role: own loans for a member,
    /// every loan for an admin
    pub async fn list(&self) -> AppResult<Vec<BorrowingRow>> {
        self.list_on(Utc::now().date_naive()).await
    }

    pub async fn list_on(&self, today: NaiveDate) -> AppResult<Vec<BorrowingRow>> {
        let borrowings = match self.session.role() {
            Role::Admin => self.api.list_borrowings().await?,
            role => {
                role.require(Operation::ViewOwnBorrowings)?;
                self.api.my_borrowings().await?
            }
        };

        Ok(borrowings
            .into_iter()
            .map(|borrowing| BorrowingRow {
                status: borrowing.status_on(today),
                borrowing,
            })
            .collect())
    }

    /// Mark a borrowing as returned (admin)
    pub async fn return_borrowing(&self, id: i64) -> AppResult<String> {
        self.session.role().require(Operation::ReturnBorrowing)?;

        let message = self.api.return_borrowing(id).await?;
        tracing::info!("Borrowing {} returned", id);
        Ok(confirmation(&message, "Buku telah dikembalikan"))
    }
}
