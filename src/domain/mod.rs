pub mod errors;
pub mod escalation;
pub mod order;
pub mod policy;
pub mod ports;
