pub mod alerts;
pub mod client;
pub mod properties;
pub mod repos;

pub use client::GithubClient;
