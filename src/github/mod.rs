pub mod client;
pub mod memory;
pub mod records;
pub mod source;
