pub mod bot;
pub mod chatbot;
pub mod config;
pub mod error;
pub mod images;
pub mod media;
pub mod model;
pub mod tools;
pub mod types;

pub use bot::run;
