// src/utils/report.rs

//! Status and error text reporting for driver layers.
//!
//! The core encode/decode paths communicate failures through
//! [`Error`](crate::Error) values; a [`StatusSink`] only carries
//! human-readable summaries to whatever front end sits on top.

use log::warn;

/// Receives status and error text from the codec driver.
pub trait StatusSink {
    fn report(&mut self, message: &str);
}

/// Forwards every message to the `log` facade at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn report(&mut self, message: &str) {
        warn!("{message}");
    }
}

/// Collects messages in memory; convenient in tests.
impl StatusSink for Vec<String> {
    fn report(&mut self, message: &str) {
        self.push(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<String> = Vec::new();
        sink.report("first");
        sink.report("second");
        assert_eq!(sink, vec!["first".to_owned(), "second".to_owned()]);
    }
}
