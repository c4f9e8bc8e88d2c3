pub mod scheduler;
pub mod services;
pub mod utils;
