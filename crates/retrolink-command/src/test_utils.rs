//! Shared test utilities for command core tests.
//!
//! Provides a [`TestFrontend`] that records effects and a
//! [`ScriptedTransport`] that feeds canned lines per poll.

use std::collections::{HashMap, VecDeque};

use retrolink_net::{CommandTransport, ReceivedLine, Sender, TransportKind};
use retrolink_types::error::{LinkError, MemoryError, Result};
use retrolink_types::event::EventCommand;

use crate::frontend::{ContentStatus, Frontend};
use crate::memory::{MemoryMap, MemoryRegion};

/// A frontend that records messages and events for assertion.
pub struct TestFrontend {
    pub params: HashMap<String, String>,
    pub status: ContentStatus,
    pub memory: MemoryMap,
    pub hardcore: bool,
    pub messages: Vec<String>,
    pub events: Vec<(EventCommand, Option<String>)>,
}

impl TestFrontend {
    pub fn new() -> Self {
        let mut params = HashMap::new();
        params.insert("video_fullscreen".to_string(), "false".to_string());
        Self {
            params,
            status: ContentStatus::Contentless,
            memory: MemoryMap::new().with_region(MemoryRegion::new(0x1000, vec![0, 1, 2, 3], true)),
            hardcore: false,
            messages: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl Frontend for TestFrontend {
    fn version(&self) -> String {
        "9.9.9".to_string()
    }

    fn content_status(&self) -> ContentStatus {
        self.status.clone()
    }

    fn config_param(&self, name: &str) -> Option<String> {
        self.params.get(name).cloned()
    }

    fn show_message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn perform(&mut self, event: EventCommand, payload: Option<&str>) -> bool {
        self.events.push((event, payload.map(str::to_string)));
        true
    }

    fn hardcore_mode(&self) -> bool {
        self.hardcore
    }

    fn read_memory(&self, address: u32, len: usize) -> std::result::Result<Vec<u8>, MemoryError> {
        self.memory.read(address, len)
    }

    fn write_memory(&mut self, address: u32, bytes: &[u8]) -> std::result::Result<usize, MemoryError> {
        self.memory.write(address, bytes)
    }
}

/// One scripted poll outcome.
pub enum Poll {
    Lines(Vec<ReceivedLine>),
    Fail,
}

/// A transport that returns scripted lines and records replies.
pub struct ScriptedTransport {
    pub kind: TransportKind,
    pub script: VecDeque<Poll>,
    pub replies: Vec<(Sender, Vec<u8>)>,
    pub fail_replies: bool,
}

impl ScriptedTransport {
    pub fn new(kind: TransportKind) -> Self {
        Self {
            kind,
            script: VecDeque::new(),
            replies: Vec::new(),
            fail_replies: false,
        }
    }

    /// Queue one poll cycle worth of console lines.
    pub fn push_lines(&mut self, lines: &[&str]) {
        self.push_from(Sender::Console, lines);
    }

    pub fn push_from(&mut self, from: Sender, lines: &[&str]) {
        self.script.push_back(Poll::Lines(
            lines.iter().map(|l| ReceivedLine::new(*l, from)).collect(),
        ));
    }

    pub fn push_failure(&mut self) {
        self.script.push_back(Poll::Fail);
    }

    pub fn reply_texts(&self) -> Vec<String> {
        self.replies
            .iter()
            .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }
}

impl CommandTransport for ScriptedTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn poll(&mut self) -> Result<Vec<ReceivedLine>> {
        match self.script.pop_front() {
            Some(Poll::Lines(lines)) => Ok(lines),
            Some(Poll::Fail) => Err(LinkError::Transport("scripted failure".into())),
            None => Ok(Vec::new()),
        }
    }

    fn reply(&mut self, to: &Sender, payload: &[u8]) -> Result<()> {
        if self.fail_replies {
            return Err(LinkError::Transport("reply refused".into()));
        }
        self.replies.push((*to, payload.to_vec()));
        Ok(())
    }
}
