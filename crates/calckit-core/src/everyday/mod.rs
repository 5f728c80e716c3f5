pub mod budget;
pub mod discount;
pub mod percentage;
