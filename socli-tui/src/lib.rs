//! Front ends for the result browser.
//!
//! Both drive the same [`socli_browse::BrowserSession`]; they differ only in
//! how keys are read and how screens are drawn.

mod interactive;
mod line;
mod styles;
mod transcript;
mod view;

pub use interactive::run_interactive;
pub use line::{run_line, run_lines};
