pub mod events;
pub mod loader;
pub mod output;
pub mod rollup;
pub mod types;
