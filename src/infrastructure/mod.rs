pub mod clock;
pub mod memory_store;
pub mod seed;
