pub mod json_writer;
pub mod terminal_renderer;

pub use json_writer::JsonWriter;
pub use terminal_renderer::TerminalRenderer;
