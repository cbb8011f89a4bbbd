pub mod answer_key;
pub mod ci;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod pipeline;
pub mod quiz;
pub mod report;
pub mod restock;
pub mod util;
pub mod validate;
