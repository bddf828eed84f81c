pub mod categories;
pub mod reports;
