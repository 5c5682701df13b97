pub mod discovery;
pub mod error;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod predictor;
pub mod settings;
pub mod stats;
