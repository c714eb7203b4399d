use std::collections::VecDeque;
use std::io::Write;

use log::error;

use crate::event::Event;

/// Where the app writes its console and takes its events from
pub struct Context<W: Write> {
    output: W,
    events: VecDeque<Event>,
    quit_requested: bool,
}

impl<W: Write> Context<W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            events: VecDeque::new(),
            quit_requested: false,
        }
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn pop_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// A line in the console log
    pub fn log(&mut self, msg: &str) {
        self.print(&format!("> {}", msg));
    }

    /// A console line marked as a failure
    pub fn log_error(&mut self, msg: &str) {
        self.print(&format!("> ERROR: {}", msg));
    }

    /// Writes raw text, such as a rendered map
    pub fn print(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{}", text).and_then(|_| self.output.flush()) {
            error!("failed to write output: {}", e);
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
