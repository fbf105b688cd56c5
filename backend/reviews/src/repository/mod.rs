pub mod approvals;
pub mod errors;
pub mod hostaway;
