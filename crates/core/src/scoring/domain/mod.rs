pub mod overlap;
pub mod scorer;
pub mod similarity;
