//! Query-building helpers shared by the repositories: safe LIKE patterns,
//! case-insensitive substring matching, and `field_DIRECTION` sort parsing.

use sea_orm::Order;
use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

/// Sort direction parsed from a `field_ASC` / `field_DESC` spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn into_order(self) -> Order {
        match self {
            Self::Ascending => Order::Asc,
            Self::Descending => Order::Desc,
        }
    }
}

/// Parses an `orderBy` spec of the form `name_ASC` / `createdAt_DESC`.
/// Returns `None` for anything else; callers fall back to their default.
pub fn parse_order_by(raw: &str) -> Option<(&str, SortDirection)> {
    let (field, direction) = raw.rsplit_once('_')?;
    if field.is_empty() {
        return None;
    }
    let direction = match direction {
        "ASC" => SortDirection::Ascending,
        "DESC" => SortDirection::Descending,
        _ => return None,
    };
    Some((field, direction))
}

/// Escapes LIKE metacharacters so user input is matched literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Case-insensitive substring match on a text column. Lowercases both sides
/// so it behaves the same on Postgres and SQLite.
pub fn ci_contains(column: impl IntoColumnRef, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}
