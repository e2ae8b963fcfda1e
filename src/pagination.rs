//! Normalization of caller-supplied pagination and sort parameters.
//!
//! Listing endpoints accept raw page/limit/sort/order query values; these
//! helpers turn them into bounded values safe to splice into a query.

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPage {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Page defaults to 1 when absent, zero or negative. Limit defaults to 20
/// when absent, zero or negative and is clamped down to 100. Offset is
/// `(page - 1) * limit`, saturating: page is caller input and may sit
/// anywhere in the i64 range.
pub fn resolve_pagination(page: Option<i64>, limit: Option<i64>) -> ResolvedPage {
    let page = match page {
        Some(p) if p > 0 => p,
        _ => 1,
    };
    let limit = match limit {
        Some(l) if l > 0 => l.min(MAX_PAGE_LIMIT),
        _ => DEFAULT_PAGE_LIMIT,
    };
    ResolvedPage {
        page,
        limit,
        offset: (page - 1).saturating_mul(limit),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A sort descriptor whose field is guaranteed to come from an allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortClause {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl SortClause {
    pub fn as_sql(&self) -> String {
        format!("{} {}", self.field, self.direction.as_sql())
    }
}

/// Resolves a caller-supplied sort field against an allow-list.
///
/// Returns None when the field is absent or not in `allowed`, in which case
/// the caller applies its own default ordering. The returned field is the
/// allow-list's own static string, so caller input never reaches SQL text.
/// `order` is case-insensitive and only "desc" selects descending.
pub fn resolve_sort(
    field: Option<&str>,
    allowed: &'static [&'static str],
    order: Option<&str>,
) -> Option<SortClause> {
    let field = field?;
    let matched = allowed.iter().find(|candidate| **candidate == field)?;
    let direction = match order {
        Some(o) if o.eq_ignore_ascii_case("desc") => SortDirection::Descending,
        _ => SortDirection::Ascending,
    };
    Some(SortClause {
        field: matched,
        direction,
    })
}
