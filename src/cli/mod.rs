//! # CLI Module
//!
//! Command-line presentation of the counting pipeline. Each command maps to
//! one call into [`crate::service::WordCounter`] or the result cache and
//! renders the outcome with the crate's colored output macros, `indicatif`
//! progress bars and `tabled` tables.
//!
//! ```bash
//! lyricount albums "radiohead"                 # pick an album
//! lyricount count radiohead "ok computer" love # count a word
//! lyricount cached --artist radiohead          # what is already known
//! lyricount forget radiohead "ok computer" love
//! ```
//!
//! Catalog misses and catalog failures are both reported as "no data"; the
//! underlying difference is visible with `-v` in the diagnostic log.

mod albums;
mod cached;
mod count;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use albums::albums;
pub use cached::cached;
pub use cached::forget;
pub use count::count;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
