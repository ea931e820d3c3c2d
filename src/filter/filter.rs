use chrono::NaiveDate;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::types::{DateRange, FilterOrderInfo, ListQuery, Listable};

/// Derived list view: recomputed from the full collection on every request
#[derive(Debug, Clone)]
pub struct Filter {
    category: Option<String>,
    status: Option<String>,
    search: Option<String>,
    range: DateRange,
    order: Vec<FilterOrderInfo>,
    today: NaiveDate,
}

impl Filter {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            category: None,
            status: None,
            search: None,
            range: DateRange::default(),
            order: vec![],
            today,
        }
    }

    pub fn from_query<T: Listable>(query: &ListQuery, today: NaiveDate) -> Result<Self, FilterError> {
        let mut filter = Self::new(today);
        if let Some(category) = &query.category {
            filter.category(category);
        }
        if let Some(status) = &query.status {
            filter.status(status);
        }
        if let Some(search) = &query.search {
            filter.search(search);
        }
        filter.range(query.from, query.to)?;
        if let Some(order) = &query.order {
            filter.order::<T>(order)?;
        }
        Ok(filter)
    }

    pub fn category(&mut self, category: &str) -> &mut Self {
        self.category = Some(category.trim().to_string()).filter(|c| !c.is_empty() && c != "all");
        self
    }

    pub fn status(&mut self, status: &str) -> &mut Self {
        self.status = Some(status.trim().to_string()).filter(|s| !s.is_empty() && s != "all");
        self
    }

    pub fn search(&mut self, text: &str) -> &mut Self {
        self.search = Some(text.trim().to_lowercase()).filter(|s| !s.is_empty());
        self
    }

    pub fn range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<&mut Self, FilterError> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(FilterError::InvalidDateRange { from: f.to_string(), to: t.to_string() });
            }
        }
        self.range = DateRange::new(from, to);
        Ok(self)
    }

    pub fn order<T: Listable>(&mut self, order: &str) -> Result<&mut Self, FilterError> {
        self.order = FilterOrder::validate_and_parse::<T>(order)?;
        Ok(self)
    }

    pub fn matches<T: Listable>(&self, item: &T) -> bool {
        if let Some(category) = &self.category {
            if item.category() != Some(category.as_str()) {
                return false;
            }
        }

        if let Some(status) = &self.status {
            if item.status(self.today) != Some(status.as_str()) {
                return false;
            }
        }

        if let Some(needle) = &self.search {
            let hit = item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str()));
            if !hit {
                return false;
            }
        }

        if !self.range.is_unbounded() {
            match item.list_date() {
                Some(date) if self.range.contains(date) => {}
                _ => return false,
            }
        }

        true
    }

    pub fn apply<T: Listable + Clone>(&self, items: &[T]) -> Vec<T> {
        let mut out: Vec<T> = items.iter().filter(|item| self.matches(*item)).cloned().collect();
        FilterOrder::sort(&mut out, &self.order);
        out
    }
}
