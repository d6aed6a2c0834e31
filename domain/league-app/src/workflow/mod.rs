pub mod player;
pub mod result;
pub mod season;
pub mod standings;
pub mod week;
