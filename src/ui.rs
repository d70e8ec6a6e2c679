// UI layer: terminal prompts and progress feedback.
// Everything interactive lives here so `commands` can be driven by a
// scripted `Chooser` in tests.

use std::time::Duration;

use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;
use crate::resolver::Chooser;

/// `Chooser` backed by a keyboard-driven `dialoguer::Select` list.
#[derive(Debug, Default)]
pub struct SelectChooser;

impl Chooser for SelectChooser {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        let selection = Select::new()
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact()?;
        Ok(selection)
    }
}

/// Run `f` while a spinner with `message` is shown on stderr. The spinner is
/// cleared before returning so it never mixes with command output.
pub fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    out
}
