pub mod batching;
pub mod corpus;
pub mod persist;
pub mod repair;
pub mod scoring;
