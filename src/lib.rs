pub mod configuration;
pub mod database;
pub mod errors;
pub mod fetching;
pub mod ingestor;
pub mod model;
pub mod observability;
