pub mod house_number;
pub mod names;
pub mod spatial;
