//! Color Model

use serde::{Deserialize, Serialize};

/// Color entity (product tag, unique by name)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Color {
    pub id: i64,
    pub name: String,
}

/// Create color payload (find-or-create by name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorCreate {
    pub name: Option<String>,
}

/// Update color payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorUpdate {
    pub name: Option<String>,
}
