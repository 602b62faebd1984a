//! Dashboard composition

use crate::models::{category::category_name, Book, Category, Role, Session};

use super::menu::{book_actions, visible_menu, BookAction, MenuItem};

/// One book as shown on the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct BookCard {
    pub book: Book,
    pub category: Option<String>,
    pub available: bool,
    pub actions: &'static [BookAction],
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub greeting: String,
    pub role: Role,
    pub menu: Vec<&'static MenuItem>,
    pub cards: Vec<BookCard>,
}

impl DashboardView {
    pub fn compose(session: &Session, books: &[Book], categories: &[Category]) -> Self {
        let role = session.role();
        let greeting = match role {
            Role::Guest => "Selamat datang di Perpustakaan Digital".to_string(),
            _ => format!("Halo, {} ({})", session.user.name, role.label()),
        };

        let cards = books
            .iter()
            .map(|book| BookCard {
                category: category_name(categories, book.category_id).map(str::to_string),
                available: book.is_available(),
                actions: book_actions(role),
                book: book.clone(),
            })
            .collect();

        Self {
            greeting,
            role,
            menu: visible_menu(role),
            cards,
        }
    }
}
