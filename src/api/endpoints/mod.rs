pub mod analysis;
pub mod health;
pub mod records;
pub mod scan;
