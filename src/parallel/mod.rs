pub mod concurrent_map;
pub mod queries;
