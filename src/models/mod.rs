//! Data models for Perpus

pub mod book;
pub mod borrowing;
pub mod category;
pub mod dates;
pub mod role;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookForm};
pub use borrowing::{Borrowing, BorrowingStatus};
pub use category::Category;
pub use role::{Operation, Role};
pub use user::{Session, UserProfile};
