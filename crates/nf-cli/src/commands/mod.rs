pub mod content;
pub mod play;
