use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid sort field: {0}")]
    InvalidColumn(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: String, to: String },

    #[error("Invalid filter value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}
