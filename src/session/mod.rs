pub mod quiz;
pub mod summary;
