//! Training logger
//!
//! Tracks training progress to a CSV file and the console. The quantity
//! logged is the mean first-layer reconstruction error over the training
//! patterns — the one scalar contrastive divergence is actually pushing
//! down.
//!
//! ## CSV format
//!
//! - `epoch`: epoch number
//! - `elapsed_seconds`: time since the logger was created
//! - `learning_rate`: learning rate used for the epoch
//! - `reconstruction_error`: mean first-layer reconstruction error
//!
//! ## Example
//!
//! ```rust,no_run
//! # use harmonium::TrainingLogger;
//! let mut logger = TrainingLogger::new("training_log.csv")?;
//! logger.log(10, 0.05, 0.73)?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Logs per-epoch training metrics to CSV and console.
pub struct TrainingLogger {
    log_file: File,
    start_time: Instant,
    last_log_time: Instant,
}

impl TrainingLogger {
    /// Create a logger, writing the CSV header immediately.
    pub fn new<P: AsRef<Path>>(log_path: P) -> std::io::Result<Self> {
        let mut log_file = File::create(log_path)?;
        writeln!(
            log_file,
            "epoch,elapsed_seconds,learning_rate,reconstruction_error"
        )?;
        let now = Instant::now();
        Ok(Self {
            log_file,
            start_time: now,
            last_log_time: now,
        })
    }

    /// Log one epoch.
    ///
    /// Flushes after every line so a crashed run still leaves a usable
    /// log behind.
    pub fn log(
        &mut self,
        epoch: usize,
        learning_rate: f64,
        reconstruction_error: f64,
    ) -> std::io::Result<()> {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        writeln!(
            self.log_file,
            "{},{:.2},{:.6},{:.6}",
            epoch, elapsed, learning_rate, reconstruction_error
        )?;
        self.log_file.flush()?;

        let epoch_time = self.last_log_time.elapsed().as_secs_f64();
        println!(
            "Epoch {:4} | Time: {:7.1}s (+{:.1}s) | LR: {:.6} | Reconstruction error: {:.6}",
            epoch, elapsed, epoch_time, learning_rate, reconstruction_error
        );
        self.last_log_time = Instant::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_logger_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");

        let mut logger = TrainingLogger::new(&path).unwrap();
        logger.log(1, 0.05, 1.5).unwrap();
        logger.log(2, 0.05, 1.2).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "epoch,elapsed_seconds,learning_rate,reconstruction_error"
        );
        assert!(lines.next().unwrap().starts_with("1,"));
        assert!(lines.next().unwrap().starts_with("2,"));
    }
}
