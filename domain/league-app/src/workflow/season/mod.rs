pub mod active;
pub mod history;
pub mod open;
pub mod rollover;
