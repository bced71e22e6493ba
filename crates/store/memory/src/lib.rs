pub mod store;

pub use store::MemoryRevisionStore;
