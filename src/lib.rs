pub mod interpreter;
pub mod line_reader;
pub mod parser;
pub mod queue;
pub mod types;
pub mod util;
