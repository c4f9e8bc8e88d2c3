pub mod timezone_catalog;
