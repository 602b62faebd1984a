//! Borrowing (loan) model and derived status

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::dates;

/// Borrower summary embedded in a borrowing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerShort {
    pub id: i64,
    pub name: String,
}

/// Book summary embedded in a borrowing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookShort {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrowing {
    pub id: i64,
    pub user: BorrowerShort,
    pub book: BookShort,
    #[serde(deserialize_with = "dates::date")]
    pub borrow_date: NaiveDate,
    #[serde(deserialize_with = "dates::date")]
    pub due_date: NaiveDate,
    #[serde(default, deserialize_with = "dates::optional_date")]
    pub return_date: Option<NaiveDate>,
}

impl Borrowing {
    /// Status as of `today`
    pub fn status_on(&self, today: NaiveDate) -> BorrowingStatus {
        BorrowingStatus::derive(self.due_date, self.return_date, today)
    }

    /// Status as of the current UTC date
    pub fn status(&self) -> BorrowingStatus {
        self.status_on(Utc::now().date_naive())
    }
}

/// Loan status; never stored, always derived from the dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BorrowingStatus {
    /// Returned
    Dikembalikan,
    /// Overdue
    Terlambat,
    /// Active
    Dipinjam,
}

impl BorrowingStatus {
    pub fn derive(due_date: NaiveDate, return_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        if return_date.is_some() {
            BorrowingStatus::Dikembalikan
        } else if due_date < today {
            BorrowingStatus::Terlambat
        } else {
            BorrowingStatus::Dipinjam
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowingStatus::Dikembalikan => "Dikembalikan",
            BorrowingStatus::Terlambat => "Terlambat",
            BorrowingStatus::Dipinjam => "Dipinjam",
        }
    }
}

impl std::fmt::Display for BorrowingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body for borrowing a book
#[derive(Debug, Clone, Serialize)]
pub struct CreateBorrowing {
    pub book_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_returned_wins() {
        let today = day(2024, 5, 10);
        let status = BorrowingStatus::derive(day(2024, 5, 1), Some(day(2024, 5, 9)), today);
        assert_eq!(status, BorrowingStatus::Dikembalikan);
    }

    #[test]
    fn test_overdue_when_due_yesterday() {
        let today = Utc::now().date_naive();
        let yesterday = today - Duration::days(1);
        assert_eq!(
            BorrowingStatus::derive(yesterday, None, today),
            BorrowingStatus::Terlambat
        );
    }

    #[test]
    fn test_active_on_due_date() {
        let today = day(2024, 5, 10);
        assert_eq!(
            BorrowingStatus::derive(today, None, today),
            BorrowingStatus::Dipinjam
        );
        assert_eq!(
            BorrowingStatus::derive(day(2024, 5, 20), None, today),
            BorrowingStatus::Dipinjam
        );
    }

    #[test]
    fn test_deserialize_mixed_date_formats() {
        let borrowing: Borrowing = serde_json::from_value(serde_json::json!({
            "id": 3,
            "user": { "id": 2, "name": "Budi" },
            "book": { "id": 9, "title": "Negeri 5 Menara" },
            "borrow_date": "2024-05-01T03:00:00Z",
            "due_date": "2024-05-08",
            "return_date": null
        }))
        .unwrap();

        assert_eq!(borrowing.borrow_date, day(2024, 5, 1));
        assert_eq!(borrowing.return_date, None);
        assert_eq!(borrowing.status_on(day(2024, 5, 9)), BorrowingStatus::Terlambat);
    }
}
