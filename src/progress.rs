//! Human-readable progress for the long-running passes.
//!
//! Reporting is observational only. Nothing in the pipeline branches on it.

use colored::Colorize;
use std::cell::{Cell, RefCell};
use std::io::Write;

pub trait ProgressReporter {
    /// Begin a counted phase with a known total
    fn start(&self, label: &str, total: usize);
    /// Move the counter forward
    fn advance(&self, n: usize);
    /// Ad hoc status line (sheet index, translation pair, warning)
    fn message(&self, text: &str);
    /// End the current phase
    fn finish(&self);
}

/// Prints to stdout with an in-place `\r` counter
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    label: RefCell<String>,
    done: Cell<usize>,
    total: Cell<usize>,
    verbose: bool,
}

impl ConsoleProgress {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    fn redraw(&self) {
        let total = self.total.get();
        let done = self.done.get().min(total);
        let pct = if total == 0 { 100 } else { done * 100 / total };
        print!(
            "\r   {} {}/{} ({}%)",
            self.label.borrow().cyan(),
            done,
            total,
            pct
        );
        let _ = std::io::stdout().flush();
    }
}

impl ProgressReporter for ConsoleProgress {
    fn start(&self, label: &str, total: usize) {
        *self.label.borrow_mut() = label.to_string();
        self.done.set(0);
        self.total.set(total);
        self.redraw();
    }

    fn advance(&self, n: usize) {
        self.done.set(self.done.get().saturating_add(n));
        self.redraw();
    }

    fn message(&self, text: &str) {
        // Translation pairs only in verbose mode
        let is_pair = text.contains(" -> ");
        if is_pair && !self.verbose {
            return;
        }
        let line = if text.starts_with("Warning") {
            text.yellow().to_string()
        } else if is_pair {
            text.dimmed().to_string()
        } else {
            text.cyan().to_string()
        };
        // Clear the counter line, print, then redraw it below
        print!("\r\x1b[2K");
        println!("   {}", line);
        if !self.label.borrow().is_empty() {
            self.redraw();
        }
    }

    fn finish(&self) {
        if !self.label.borrow().is_empty() {
            self.done.set(self.total.get());
            self.redraw();
            println!();
        }
        self.label.borrow_mut().clear();
    }
}

/// Reports nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn start(&self, _label: &str, _total: usize) {}
    fn advance(&self, _n: usize) {}
    fn message(&self, _text: &str) {}
    fn finish(&self) {}
}

/// One reported event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Start { label: String, total: usize },
    Advance(usize),
    Message(String),
    Finish,
}

/// Keeps every event, for assertions
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: RefCell<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Message(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    /// Per phase label: (total, final count)
    pub fn phases(&self) -> Vec<(String, usize, usize)> {
        let mut phases: Vec<(String, usize, usize)> = Vec::new();
        for event in self.events.borrow().iter() {
            match event {
                ProgressEvent::Start { label, total } => phases.push((label.clone(), *total, 0)),
                ProgressEvent::Advance(n) => {
                    if let Some(last) = phases.last_mut() {
                        last.2 += n;
                    }
                }
                _ => {}
            }
        }
        phases
    }
}

impl ProgressReporter for RecordingProgress {
    fn start(&self, label: &str, total: usize) {
        self.events.borrow_mut().push(ProgressEvent::Start {
            label: label.to_string(),
            total,
        });
    }

    fn advance(&self, n: usize) {
        self.events.borrow_mut().push(ProgressEvent::Advance(n));
    }

    fn message(&self, text: &str) {
        self.events
            .borrow_mut()
            .push(ProgressEvent::Message(text.to_string()));
    }

    fn finish(&self) {
        self.events.borrow_mut().push(ProgressEvent::Finish);
    }
}
