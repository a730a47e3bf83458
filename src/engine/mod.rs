// Merged depth book + depth-weighted pricing
pub mod book;
pub mod types;
