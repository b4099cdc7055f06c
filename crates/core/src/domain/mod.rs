pub mod catalog;
pub mod inquiry;
pub mod quote;
