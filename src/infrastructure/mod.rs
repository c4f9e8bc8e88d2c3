pub mod clock;
pub mod repositories;
pub mod terminal;
pub mod timezone;
