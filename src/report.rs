use clap::ValueEnum;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Progress of a run, as seen by the console
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    Started {
        output: PathBuf,
        prompt: String,
    },
    AttemptStarted {
        attempt: u32,
        attempts: u32,
    },
    Saved {
        output: PathBuf,
        bytes: usize,
    },
    ModelLoading {
        attempt: u32,
        attempts: u32,
        estimated_time: Option<f64>,
    },
    Rejected {
        status: u16,
        body: String,
    },
    AttemptFailed {
        attempt: u32,
        attempts: u32,
        error: String,
    },
    Failed {
        output: PathBuf,
    },
    Completed,
}

/// Sink for fetcher progress
pub trait Reporter: Send + Sync {
    fn report(&self, event: FetchEvent);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable progress lines
    #[default]
    Text,
    /// JSON array of results at the end
    Json,
    /// Only the written file paths
    Quiet,
}

/// A line of console output and the stream it goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Out(String),
    Err(String),
}

/// Reporter writing to stdout/stderr according to the output format
pub struct ConsoleReporter {
    format: OutputFormat,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            spinner: Mutex::new(None),
        }
    }

    fn start_spinner(&self, attempt: u32, attempts: u32) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.yellow} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!(
            "Requesting image (attempt {}/{})...",
            attempt, attempts
        ));
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(pb);
        }
    }

    fn clear_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }

    /// Lines an event produces in this format.
    ///
    /// Text prints everything to stdout. Json and quiet keep stdout for the
    /// final results, so failures and the completion message go to stderr.
    pub fn render(&self, event: &FetchEvent) -> Vec<Line> {
        match self.format {
            OutputFormat::Text => text_lines(event).into_iter().map(Line::Out).collect(),
            OutputFormat::Json | OutputFormat::Quiet => match event {
                FetchEvent::Rejected { .. }
                | FetchEvent::Failed { .. }
                | FetchEvent::Completed => text_lines(event).into_iter().map(Line::Err).collect(),
                _ => Vec::new(),
            },
        }
    }
}

fn text_lines(event: &FetchEvent) -> Vec<String> {
    match event {
        FetchEvent::Started { output, prompt } => vec![
            format!("{}: {}", "Generating".cyan().bold(), output.display()),
            format!("{}: {}", "Prompt".cyan().bold(), prompt),
        ],
        FetchEvent::AttemptStarted { .. } => Vec::new(),
        FetchEvent::Saved { output, bytes } => vec![format!(
            "{} Saved to {} ({} bytes)",
            "✓".green(),
            output.display(),
            bytes
        )],
        FetchEvent::ModelLoading {
            attempt,
            attempts,
            estimated_time,
        } => vec![match estimated_time {
            Some(eta) => format!(
                "{} Model loading, waiting... (attempt {}/{}, estimated {:.0}s)",
                "…".yellow(),
                attempt,
                attempts,
                eta
            ),
            None => format!(
                "{} Model loading, waiting... (attempt {}/{})",
                "…".yellow(),
                attempt,
                attempts
            ),
        }],
        FetchEvent::Rejected { status, body } => {
            vec![format!("{} {}: {}", "Error".red().bold(), status, body)]
        }
        FetchEvent::AttemptFailed {
            attempt,
            attempts,
            error,
        } => vec![format!(
            "{}: {} (attempt {}/{})",
            "Error".red().bold(),
            error,
            attempt,
            attempts
        )],
        FetchEvent::Failed { output } => {
            vec![format!("{} Failed to generate {}", "✗".red(), output.display())]
        }
        FetchEvent::Completed => vec![
            String::new(),
            format!("{} Image generation complete!", "✓".green()),
        ],
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: FetchEvent) {
        if let FetchEvent::AttemptStarted { attempt, attempts } = event {
            if self.format == OutputFormat::Text {
                self.start_spinner(attempt, attempts);
            }
            return;
        }
        self.clear_spinner();

        for line in self.render(&event) {
            match line {
                Line::Out(text) => println!("{}", text),
                Line::Err(text) => eprintln!("{}", text),
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn failed() -> FetchEvent {
        FetchEvent::Failed {
            output: PathBuf::from("public/images/feature-ai.jpg"),
        }
    }

    fn contains(lines: &[Line], needle: &str) -> bool {
        lines.iter().any(|line| match line {
            Line::Out(text) | Line::Err(text) => text.contains(needle),
        })
    }

    #[test]
    fn text_format_prints_everything_to_stdout() {
        let reporter = ConsoleReporter::new(OutputFormat::Text);

        let lines = reporter.render(&failed());
        assert!(matches!(lines.as_slice(), [Line::Out(_)]));
        assert!(contains(&lines, "Failed to generate public/images/feature-ai.jpg"));

        let lines = reporter.render(&FetchEvent::ModelLoading {
            attempt: 2,
            attempts: 3,
            estimated_time: Some(18.0),
        });
        assert!(contains(&lines, "attempt 2/3, estimated 18s"));

        let lines = reporter.render(&FetchEvent::Completed);
        assert!(lines.iter().all(|l| matches!(l, Line::Out(_))));
        assert!(contains(&lines, "Image generation complete!"));
    }

    #[test]
    fn json_and_quiet_report_failures_and_completion_on_stderr() {
        for format in [OutputFormat::Json, OutputFormat::Quiet] {
            let reporter = ConsoleReporter::new(format);

            let lines = reporter.render(&failed());
            assert!(matches!(lines.as_slice(), [Line::Err(_)]), "{:?}", format);
            assert!(contains(&lines, "Failed to generate public/images/feature-ai.jpg"));

            let lines = reporter.render(&FetchEvent::Rejected {
                status: 400,
                body: "bad input".to_string(),
            });
            assert!(contains(&lines, "400: bad input"));

            let lines = reporter.render(&FetchEvent::Completed);
            assert!(!lines.is_empty());
            assert!(lines.iter().all(|l| matches!(l, Line::Err(_))));
            assert!(contains(&lines, "Image generation complete!"));
        }
    }

    #[test]
    fn json_and_quiet_keep_progress_off_the_console() {
        for format in [OutputFormat::Json, OutputFormat::Quiet] {
            let reporter = ConsoleReporter::new(format);
            let progress = [
                FetchEvent::Started {
                    output: PathBuf::from("a.jpg"),
                    prompt: "a fox".to_string(),
                },
                FetchEvent::Saved {
                    output: PathBuf::from("a.jpg"),
                    bytes: 3,
                },
                FetchEvent::ModelLoading {
                    attempt: 1,
                    attempts: 3,
                    estimated_time: None,
                },
            ];
            for event in &progress {
                assert!(reporter.render(event).is_empty());
            }
        }
    }
}
