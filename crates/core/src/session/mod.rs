pub mod controller;
pub mod domain;
pub mod infrastructure;
