mod cli;
mod export;
mod logging;
mod pdf;
mod sections;
mod split;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::Log;
use split::SplitReport;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logger = logging::build();
    // The log macros consult the global ceiling even with an explicit logger
    log::set_max_level(logger.filter());
    let logger: &dyn Log = &logger;

    log::info!(
        logger: logger,
        "Starting PDF splitting process for {}",
        cli.input_pdf.display()
    );

    let status = finish(
        split::run(&cli.input_pdf, &cli.output_prefix, logger),
        logger,
    );
    logger.flush();

    status
}

/// Log the outcome of a run and the completion line, and pick the exit status.
fn finish(result: Result<SplitReport>, logger: &dyn Log) -> ExitCode {
    let status = match result {
        Ok(report) => {
            log::debug!(
                logger: logger,
                "Wrote {} file(s), skipped {} section(s)",
                report.written.len(),
                report.skipped.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!(logger: logger, "Error processing PDF: {:#}", e);
            log::error!(logger: logger, "{:?}", e);
            ExitCode::FAILURE
        }
    };

    log::info!(logger: logger, "PDF splitting process completed");
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::sample_pdf;
    use log::{Level, LevelFilter, Metadata, Record};
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture {
        lines: Mutex<Vec<(Level, String)>>,
    }

    impl Log for Capture {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.lines
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    impl Capture {
        fn has(&self, level: Level, text: &str) -> bool {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .any(|(l, line)| *l == level && line.contains(text))
        }
    }

    fn finish_with(result: Result<SplitReport>) -> (String, Capture) {
        log::set_max_level(LevelFilter::Trace);
        let capture = Capture::default();
        let code = finish(result, &capture);
        (format!("{:?}", code), capture)
    }

    #[test]
    fn test_finish_success() {
        let report = SplitReport {
            written: vec![PathBuf::from("out_01_A.pdf")],
            skipped: Vec::new(),
        };
        let (code, capture) = finish_with(Ok(report));
        assert_eq!(code, format!("{:?}", ExitCode::SUCCESS));
        assert!(capture.has(Level::Info, "PDF splitting process completed"));
    }

    #[test]
    fn test_finish_without_toc_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plain.pdf");
        sample_pdf(2).0.save(&input).unwrap();
        let prefix = dir.path().join("out").display().to_string();

        let (code, capture) = finish_with(split::run(&input, &prefix, log::logger()));
        assert_eq!(code, format!("{:?}", ExitCode::SUCCESS));
        assert!(capture.has(Level::Info, "PDF splitting process completed"));
        assert!(!capture.has(Level::Error, ""));
    }

    #[test]
    fn test_finish_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");
        let prefix = dir.path().join("out").display().to_string();

        let (code, capture) = finish_with(split::run(&missing, &prefix, log::logger()));
        assert_eq!(code, format!("{:?}", ExitCode::FAILURE));
        assert!(capture.has(Level::Error, "Failed to open PDF"));
        assert!(capture.has(Level::Info, "PDF splitting process completed"));
    }
}
