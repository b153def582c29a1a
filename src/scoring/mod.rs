pub mod filter;
pub mod scorer;
pub mod ranker;
