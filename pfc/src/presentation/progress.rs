use indicatif::{ProgressBar, ProgressStyle};
use pfc_core::Event;
use std::io::IsTerminal;

/// Renders job events on stderr: a bar for progress, a line per failed chunk.
pub struct ProgressView {
    bar: Option<ProgressBar>,
}

impl ProgressView {
    pub fn new(enabled: bool) -> Self {
        if !enabled || !std::io::stderr().is_terminal() {
            return Self { bar: None };
        }
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{prefix:.bold} [{bar:40}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_prefix("compressing");
        Self { bar: Some(bar) }
    }

    pub fn on_event(&self, event: &Event) {
        match event {
            Event::Progress(p) => {
                if let Some(bar) = &self.bar {
                    bar.set_position(u64::from(*p));
                }
            }
            Event::ChunkFailed { index, message } => {
                let line = format!("error: chunk {index}: {message}");
                match &self.bar {
                    Some(bar) => bar.println(line),
                    None => eprintln!("{line}"),
                }
            }
            Event::Finished { ok } => {
                if let Some(bar) = &self.bar {
                    if *ok {
                        bar.finish_with_message("done");
                    } else {
                        bar.abandon();
                    }
                }
            }
        }
    }
}
