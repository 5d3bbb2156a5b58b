pub mod command;
pub mod job;
pub mod record;
pub mod render;
pub mod response;
