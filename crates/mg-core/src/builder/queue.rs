//! Sequential crop queue.
//!
//! Files are cropped strictly one at a time in input order. The queue and
//! its cursor only ever change together: `start`, `advance` and `reset` are
//! the sole transitions.

use super::file::IncomingFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueStep {
    /// The cursor moved to the next file.
    Next { index: usize, total: usize },
    /// The last file was consumed; the queue is now empty with cursor 0.
    Drained,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadQueue {
    files: Vec<IncomingFile>,
    cursor: usize,
}

impl UploadQueue {
    pub fn start(files: Vec<IncomingFile>) -> Self {
        Self { files, cursor: 0 }
    }

    pub fn is_active(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// File under the active crop session.
    pub fn current(&self) -> Option<&IncomingFile> {
        self.files.get(self.cursor)
    }

    /// Files not yet cropped, including the current one.
    pub fn remaining(&self) -> usize {
        self.files.len().saturating_sub(self.cursor)
    }

    pub fn advance(&mut self) -> QueueStep {
        if self.cursor + 1 < self.files.len() {
            self.cursor += 1;
            QueueStep::Next {
                index: self.cursor,
                total: self.files.len(),
            }
        } else {
            self.reset();
            QueueStep::Drained
        }
    }

    pub fn reset(&mut self) {
        self.files.clear();
        self.cursor = 0;
    }
}
