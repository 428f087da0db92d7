// Adapters layer: concrete implementations for external systems (storage, input files).

pub mod memory;
pub mod pool;
