pub mod in_memory;
pub mod match_queries;
pub mod match_repository;

pub use in_memory::InMemoryMatchRepository;
pub use match_queries::MatchQueries;
pub use match_repository::MatchRepository;
