//! Plain-text rendering for the terminal front-end

use std::fmt::Write;

use crate::{
    models::{Book, Category, Session},
    services::{forms::FormState, loans::BorrowingRow},
};

use super::{dashboard::DashboardView, menu::MenuItem};

pub fn menu(items: &[&MenuItem]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "  {:<18} {}", item.label, item.command);
    }
    out
}

pub fn dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.greeting);
    let _ = writeln!(out);
    let _ = writeln!(out, "Menu:");
    out.push_str(&menu(&view.menu));
    let _ = writeln!(out);

    if view.cards.is_empty() {
        let _ = writeln!(out, "Tidak ada buku yang ditemukan.");
        return out;
    }

    let _ = writeln!(out, "Buku ({}):", view.cards.len());
    for card in &view.cards {
        let availability = if card.available {
            format!("stok {}", card.book.stock)
        } else {
            "stok habis".to_string()
        };
        let actions: Vec<&str> = card.actions.iter().map(|a| a.label()).collect();
        let _ = writeln!(
            out,
            "  #{:<4} {} - {} [{}] ({}) {}",
            card.book.id,
            card.book.title,
            card.book.author,
            card.category.as_deref().unwrap_or("Tanpa kategori"),
            availability,
            if actions.is_empty() {
                String::new()
            } else {
                format!("<{}>", actions.join(" | "))
            }
        );
    }
    out
}

pub fn book(book: &Book, categories: &[Category]) -> String {
    let mut out = String::new();
    let category = crate::models::category::category_name(categories, book.category_id)
        .unwrap_or("Tanpa kategori");
    let _ = writeln!(out, "{}", book.title);
    let _ = writeln!(out, "  Penulis     : {}", book.author);
    let _ = writeln!(out, "  Kategori    : {}", category);
    let _ = writeln!(out, "  Stok        : {}", book.stock);
    if let Some(year) = book.published_year {
        let _ = writeln!(out, "  Tahun terbit: {}", year);
    }
    if let Some(isbn) = &book.isbn {
        let _ = writeln!(out, "  ISBN        : {}", isbn);
    }
    if let Some(description) = &book.description {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", description);
    }
    out
}

pub fn borrowings(rows: &[BorrowingRow]) -> String {
    if rows.is_empty() {
        return "Belum ada data peminjaman.\n".to_string();
    }

    let mut out = String::new();
    for row in rows {
        let b = &row.borrowing;
        let _ = write!(
            out,
            "  #{:<4} {:<28} {:<16} pinjam {} jatuh tempo {}",
            b.id, b.book.title, b.user.name, b.borrow_date, b.due_date
        );
        if let Some(returned) = b.return_date {
            let _ = write!(out, " kembali {}", returned);
        }
        let _ = writeln!(out, "  [{}]", row.status);
    }
    out
}

pub fn categories(categories: &[Category]) -> String {
    let mut out = String::new();
    for category in categories {
        let _ = writeln!(out, "  #{:<4} {}", category.id, category.name);
    }
    out
}

pub fn profile(session: &Session) -> String {
    let user = &session.user;
    if !session.is_authenticated() {
        return "Belum login (tamu).\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} <{}>", user.name, user.email);
    let _ = writeln!(out, "  Peran   : {}", user.role.label());
    let _ = writeln!(out, "  NIS     : {}", user.nis);
    let _ = writeln!(out, "  Jurusan : {}", user.major);
    let _ = writeln!(out, "  Kelas   : {}", user.grade);
    let _ = writeln!(out, "  Terdaftar sejak {}", user.created_at.format("%d-%m-%Y"));
    out
}

/// Status line for a form after submission
pub fn form_state(state: &FormState) -> Option<String> {
    match state {
        FormState::Idle => None,
        FormState::Submitting => Some("Memproses...".to_string()),
        FormState::Success(msg) => Some(msg.clone()),
        FormState::Failure(msg) => Some(format!("Gagal: {}", msg)),
    }
}
