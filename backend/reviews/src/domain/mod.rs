pub mod approval;
pub mod performance;
pub mod query;
pub mod review;
