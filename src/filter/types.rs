use chrono::NaiveDate;
use serde::Deserialize;

/// List view parameters as they arrive on the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// e.g. `due_date desc, title`
    pub order: Option<String>,
}

/// Inclusive date range; open on either side when a bound is absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// Comparable value a record exposes for one sort column
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Date(NaiveDate),
    Number(i64),
    Text(String),
}

/// A record that can appear in a filtered list view
pub trait Listable {
    /// Classification the category filter matches against
    fn category(&self) -> Option<&str> {
        None
    }

    /// Status as displayed on `today`
    fn status(&self, _today: NaiveDate) -> Option<&'static str> {
        None
    }

    /// Text fields the search box matches against
    fn search_fields(&self) -> Vec<&str>;

    /// Date the range filter and default ordering use
    fn list_date(&self) -> Option<NaiveDate>;

    /// Value for an explicit sort column; `None` for unknown columns
    fn sort_value(&self, column: &str) -> Option<SortValue>;

    /// Columns accepted by `sort_value`
    fn sort_columns() -> &'static [&'static str]
    where
        Self: Sized;
}
