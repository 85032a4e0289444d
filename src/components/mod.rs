pub mod menu;
pub mod message_box;
pub mod text_display;
pub mod text_edit;

pub use menu::{Menu, MenuItem};
pub use message_box::{MessageBox, show_message};
pub use text_display::{TextDisplay, TextRow, split_line, wrap_lines};
pub use text_edit::TextEditBuffer;
