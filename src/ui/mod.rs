pub mod compose;
pub mod messages;
pub mod payload;
pub mod texts;
