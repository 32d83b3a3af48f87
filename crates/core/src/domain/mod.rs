pub mod ratio;
pub mod result;
