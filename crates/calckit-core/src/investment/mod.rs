pub mod compounding;
pub mod roi;
