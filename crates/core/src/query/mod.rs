//! Read-side query building: typed criteria and sort specifications.

pub mod criteria;
pub mod sort;

pub use criteria::{EntryCriteria, LoanCriteria};
pub use sort::{EntrySort, EntrySortField, LoanSort, LoanSortField};
