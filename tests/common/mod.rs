//! Recording serial link shared by the integration tests

#![allow(dead_code)]

use ad9833::{Ad9833, SerialLink};

/// Link failure injected by [`RecordingLink::fail_after`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkFault;

/// Records every word written instead of driving pins
#[derive(Debug, Default)]
pub struct RecordingLink {
    pub words: Vec<u16>,
    pub initialized: usize,
    fail_after: Option<usize>,
    fail_init: bool,
}

impl RecordingLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `n` more words, then fails every write.
    pub fn fail_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    /// Fails `pin_initialize`; writes are still accepted.
    pub fn fail_init() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }
}

impl SerialLink for RecordingLink {
    type Error = LinkFault;

    fn pin_initialize(&mut self) -> Result<(), LinkFault> {
        if self.fail_init {
            return Err(LinkFault);
        }
        self.initialized += 1;
        Ok(())
    }

    fn write_word(&mut self, word: u16) -> Result<(), LinkFault> {
        if let Some(n) = self.fail_after {
            if self.words.len() >= n {
                return Err(LinkFault);
            }
        }
        self.words.push(word);
        Ok(())
    }
}

/// Words written so far.
pub fn words(dds: &Ad9833<RecordingLink>) -> Vec<u16> {
    dds.link().map(|link| link.words.clone()).unwrap_or_default()
}

/// Started driver with defaults; returns how many words `start` wrote.
pub fn started() -> (Ad9833<RecordingLink>, usize) {
    let mut dds = Ad9833::with_link(RecordingLink::new());
    dds.start().unwrap();
    let n = words(&dds).len();
    (dds, n)
}

/// Words written after the first `skip`.
pub fn words_since(dds: &Ad9833<RecordingLink>, skip: usize) -> Vec<u16> {
    words(dds).split_off(skip)
}
