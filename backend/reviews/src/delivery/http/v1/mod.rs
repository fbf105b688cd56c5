pub mod approvals;
pub mod properties;
pub mod reviews;
