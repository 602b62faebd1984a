//! Role-gated view composition and rendering

pub mod dashboard;
pub mod menu;
pub mod render;

pub use dashboard::{BookCard, DashboardView};
pub use menu::{book_actions, visible_menu, visible_menu_for, BookAction, MenuItem, MENU};
