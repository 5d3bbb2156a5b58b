/// Types implementing Render can be written to the program's output.
pub trait Render {
    /// Converts the value in question to the bytes of one or more complete
    /// output lines.
    fn render(&self) -> Vec<u8>;
}
