pub mod errors;
pub mod quoter;
