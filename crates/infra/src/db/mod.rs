//! Persistence adapters for the product and inventory ports.

pub mod in_memory;
pub mod postgres;
