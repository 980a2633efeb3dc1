pub mod attempts;
pub mod players;
pub mod settings;
