pub mod escalation;
pub mod order_service;
