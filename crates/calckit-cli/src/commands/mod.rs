pub mod economics;
pub mod everyday;
pub mod investment;
pub mod loans;
pub mod network;
pub mod random;
pub mod real_estate;
pub mod statistics;
pub mod units;
