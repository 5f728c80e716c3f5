pub mod equity;
pub mod rental;
