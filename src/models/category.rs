//! Book category model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Name of the category with `id`, if known
pub fn category_name(categories: &[Category], id: Option<i64>) -> Option<&str> {
    let id = id?;
    categories
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.as_str())
}
