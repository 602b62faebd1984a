//! Role-gated menu and book actions

use crate::models::Role;

/// One entry of the dashboard menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub route: &'static str,
    /// Terminal command that opens this entry
    pub command: &'static str,
    pub roles: &'static [Role],
}

const ALL: &[Role] = &[Role::Admin, Role::Member, Role::Guest];
const SIGNED_IN: &[Role] = &[Role::Admin, Role::Member];

/// Menu table in display order
pub const MENU: &[MenuItem] = &[
    MenuItem {
        key: "dashboard",
        label: "Dashboard",
        route: "/dashboard",
        command: "perpus dashboard",
        roles: ALL,
    },
    MenuItem {
        key: "catalog",
        label: "Katalog Buku",
        route: "/dashboard/books",
        command: "perpus dashboard --search <kata>",
        roles: ALL,
    },
    MenuItem {
        key: "categories",
        label: "Kategori",
        route: "/dashboard/categories",
        command: "perpus categories",
        roles: ALL,
    },
    MenuItem {
        key: "my-borrowings",
        label: "Peminjaman Saya",
        route: "/dashboard/my-borrowings",
        command: "perpus borrowings",
        roles: &[Role::Member],
    },
    MenuItem {
        key: "manage-books",
        label: "Kelola Buku",
        route: "/dashboard/manage-books",
        command: "perpus book add",
        roles: &[Role::Admin],
    },
    MenuItem {
        key: "borrowings",
        label: "Data Peminjaman",
        route: "/dashboard/borrowings",
        command: "perpus borrowings",
        roles: &[Role::Admin],
    },
    MenuItem {
        key: "profile",
        label: "Profil",
        route: "/dashboard/profile",
        command: "perpus whoami",
        roles: SIGNED_IN,
    },
    MenuItem {
        key: "logout",
        label: "Keluar",
        route: "/login",
        command: "perpus logout",
        roles: SIGNED_IN,
    },
    MenuItem {
        key: "login",
        label: "Masuk",
        route: "/login",
        command: "perpus login",
        roles: &[Role::Guest],
    },
    MenuItem {
        key: "register",
        label: "Daftar",
        route: "/register",
        command: "perpus register",
        roles: &[Role::Guest],
    },
];

/// Menu entries visible to `role`, in table order
pub fn visible_menu(role: Role) -> Vec<&'static MenuItem> {
    MENU.iter().filter(|item| item.roles.contains(&role)).collect()
}

/// Same as [`visible_menu`] for a raw role string; unknown roles see nothing
pub fn visible_menu_for(role: &str) -> Vec<&'static MenuItem> {
    match role.parse::<Role>() {
        Ok(role) => visible_menu(role),
        Err(_) => {
            tracing::warn!("No menu for unrecognized role {:?}", role);
            Vec::new()
        }
    }
}

/// Buttons shown on a book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookAction {
    Borrow,
    LoginToBorrow,
    Edit,
    Delete,
}

impl BookAction {
    pub fn label(&self) -> &'static str {
        match self {
            BookAction::Borrow => "Pinjam",
            BookAction::LoginToBorrow => "Login untuk meminjam",
            BookAction::Edit => "Edit",
            BookAction::Delete => "Hapus",
        }
    }
}

pub fn book_actions(role: Role) -> &'static [BookAction] {
    match role {
        Role::Admin => &[BookAction::Edit, BookAction::Delete],
        Role::Member => &[BookAction::Borrow],
        Role::Guest => &[BookAction::LoginToBorrow],
    }
}
