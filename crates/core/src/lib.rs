pub mod alignment;
pub mod scoring;
pub mod session;
pub mod text;
