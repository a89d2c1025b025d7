pub mod chatbot;
pub mod clubs;
pub mod definitions;
pub mod intent;
pub mod journal;
pub mod players;
pub mod store;
pub mod types;
