pub mod agent;
pub mod cli;
pub mod config;
pub mod doctor;
pub mod error;
pub mod ingest;
pub mod intervene;
pub mod provider;
pub mod telemetry;
pub mod theme;
pub mod transcript;
pub mod verdict;
pub mod workflow;
