pub mod changelog;
pub mod error;
pub mod ini;
pub mod lint;
pub mod manage;
pub mod parse;
pub mod prompt;
pub mod render;
pub mod scaffold;
pub mod summary;
