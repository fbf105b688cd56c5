pub mod aggregate;
pub mod approvals;
pub mod contracts;
pub mod error;
pub mod normalize;
pub mod query;
pub mod reviews;

#[cfg(test)]
pub mod testing;
