pub mod ticker;

pub use ticker::{TICK_PERIOD, Ticker};
