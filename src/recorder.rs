use log::debug;

use crate::{BEGIN_MARKER, END_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    #[default]
    Seeking,
    Collecting,
    Done,
}

/// Keeps the lines found between the BEGIN and END markers.
#[derive(Debug, Default)]
pub struct CsvRecorder {
    state: RecorderState,
    lines: Vec<String>,
}

impl CsvRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one received line. Returns the number of collected lines if
    /// this one was kept.
    pub fn push(&mut self, line: &str) -> Option<usize> {
        match self.state {
            RecorderState::Seeking => {
                if line.contains(BEGIN_MARKER) {
                    debug!("found begin marker");
                    self.state = RecorderState::Collecting;
                }
                None
            }
            RecorderState::Collecting => {
                // a repeated begin marker is framing, not payload
                if line.contains(BEGIN_MARKER) {
                    return None;
                }
                if line.contains(END_MARKER) {
                    debug!("found end marker after {} lines", self.lines.len());
                    self.state = RecorderState::Done;
                    return None;
                }
                let line = line.trim();
                if line.is_empty() {
                    return None;
                }
                self.lines.push(line.to_string());
                Some(self.lines.len())
            }
            RecorderState::Done => None,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == RecorderState::Done
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(input: &[&str]) -> CsvRecorder {
        let mut recorder = CsvRecorder::new();
        input.iter().for_each(|line| {
            recorder.push(line);
        });
        recorder
    }

    #[test]
    fn test_collects_between_markers() {
        let recorder = record(&[
            "Type HELP for available commands",
            "--- BEGIN CSV ---",
            "a,b,c",
            "1,2,3",
            "--- END CSV ---",
        ]);

        assert!(recorder.is_done());
        assert_eq!(recorder.into_lines(), ["a,b,c", "1,2,3"]);
    }

    #[test]
    fn test_no_begin_marker_collects_nothing() {
        let recorder = record(&["time,agtron", "0,55", "--- END CSV ---", "1,56"]);

        assert_eq!(recorder.state(), RecorderState::Seeking);
        assert!(recorder.into_lines().is_empty());
    }

    #[test]
    fn test_begin_then_end_is_empty() {
        let recorder = record(&["--- BEGIN CSV ---", "--- END CSV ---"]);

        assert!(recorder.is_done());
        assert!(recorder.into_lines().is_empty());
    }

    #[test]
    fn test_blank_lines_skipped_and_trimmed() {
        let recorder = record(&[
            ">> --- BEGIN CSV --- <<",
            "",
            "   \t",
            "  time,ratio  ",
            "0,0.512\r",
            "--- END CSV ---",
        ]);

        assert_eq!(recorder.into_lines(), ["time,ratio", "0,0.512"]);
    }

    #[test]
    fn test_lines_after_end_ignored() {
        let mut recorder = record(&["--- BEGIN CSV ---", "h", "--- END CSV ---"]);

        assert_eq!(recorder.push("1,2"), None);
        assert_eq!(recorder.push("--- BEGIN CSV ---"), None);
        assert_eq!(recorder.push("3,4"), None);
        assert_eq!(recorder.into_lines(), ["h"]);
    }

    #[test]
    fn test_push_reports_count() {
        let mut recorder = CsvRecorder::new();

        assert_eq!(recorder.push("--- BEGIN CSV ---"), None);
        assert_eq!(recorder.push("h"), Some(1));
        assert_eq!(recorder.push(" "), None);
        assert_eq!(recorder.push("--- BEGIN CSV ---"), None);
        assert_eq!(recorder.push("1"), Some(2));
    }

    #[test]
    fn test_line_with_both_markers_keeps_collecting() {
        let mut recorder = record(&["--- BEGIN CSV ---", "h"]);

        assert_eq!(recorder.push("--- BEGIN CSV --- --- END CSV ---"), None);
        assert_eq!(recorder.state(), RecorderState::Collecting);
        assert_eq!(recorder.push("1"), Some(2));
    }
}
