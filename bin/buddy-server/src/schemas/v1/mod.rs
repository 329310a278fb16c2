pub mod chat;
pub mod travel;
