pub mod config;
pub mod export;
pub mod info;
pub mod preview;

mod params;
