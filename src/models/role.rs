//! User roles and role-gated operations

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Role of the signed-in user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
    #[default]
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Guest => "guest",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Member => "Anggota",
            Role::Guest => "Tamu",
        }
    }

    /// Whether this role may perform `op`
    pub fn can(&self, op: Operation) -> bool {
        op.allowed_roles().contains(self)
    }

    /// Fail with an authorization error unless this role may perform `op`
    pub fn require(&self, op: Operation) -> AppResult<()> {
        if self.can(op) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "{} tidak diizinkan untuk {}",
                self.label(),
                op.description()
            )))
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            "guest" => Ok(Role::Guest),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// API operations subject to role gating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    BrowseBooks,
    BorrowBook,
    ViewOwnBorrowings,
    ManageBooks,
    ViewAllBorrowings,
    ReturnBorrowing,
}

impl Operation {
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Operation::BrowseBooks => &[Role::Admin, Role::Member, Role::Guest],
            Operation::BorrowBook | Operation::ViewOwnBorrowings => &[Role::Member],
            Operation::ManageBooks
            | Operation::ViewAllBorrowings
            | Operation::ReturnBorrowing => &[Role::Admin],
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Operation::BrowseBooks => "melihat katalog buku",
            Operation::BorrowBook => "meminjam buku",
            Operation::ViewOwnBorrowings => "melihat riwayat peminjaman",
            Operation::ManageBooks => "mengelola data buku",
            Operation::ViewAllBorrowings => "melihat seluruh data peminjaman",
            Operation::ReturnBorrowing => "memproses pengembalian buku",
        }
    }
}
