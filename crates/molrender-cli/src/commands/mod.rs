pub mod prepare;
pub mod settings;
