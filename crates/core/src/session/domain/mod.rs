pub mod backoff;
pub mod provider;
pub mod transcript;
