//! Mock implementations for testing
//!
//! Provides a scripted datasource and a recording mailer so the engine can
//! be exercised without a real count API or mail transport.

use crate::alerts::{AlertPayload, Mailer};
use crate::datasource::Datasource;
use crate::domain::{ViewCount, ViewId};
use crate::error::{DatasourceError, MailerError};

use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;

/// One scripted datasource reply
#[derive(Debug, Clone)]
pub enum Reply {
    Counts(Vec<ViewCount>),
    Error(String),
}

/// Mock datasource replaying scripted replies
///
/// Replies are returned as scripted, including ids that were not
/// requested. The last reply repeats once the script runs out.
#[derive(Debug)]
pub struct MockDatasource {
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    calls: Mutex<Vec<BTreeSet<ViewId>>>,
}

impl MockDatasource {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with the same counts
    pub fn always(counts: Vec<ViewCount>) -> Self {
        Self::new(vec![Reply::Counts(counts)])
    }

    /// Always fail with `error`
    pub fn failing(error: &str) -> Self {
        Self::new(vec![Reply::Error(error.to_string())])
    }

    /// Id sets requested so far, one entry per fetch
    pub fn calls(&self) -> Vec<BTreeSet<ViewId>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Datasource for MockDatasource {
    fn fetch(&self, ids: &BTreeSet<ViewId>) -> Result<Vec<ViewCount>, DatasourceError> {
        self.calls.lock().unwrap().push(ids.clone());

        let next = self.replies.lock().unwrap().pop_front();
        let reply = match next {
            Some(reply) => {
                *self.last.lock().unwrap() = Some(reply.clone());
                reply
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(Reply::Counts(Vec::new())),
        };

        match reply {
            Reply::Counts(counts) => Ok(counts),
            Reply::Error(error) => Err(DatasourceError::Rejected(error)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Mailer that records every payload
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<AlertPayload>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records payloads but reports every send as failed
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<AlertPayload> {
        self.sent.lock().unwrap().clone()
    }

    /// Subjects of sent payloads, in order
    pub fn subjects(&self) -> Vec<String> {
        self.sent().into_iter().map(|p| p.subject).collect()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, payload: &AlertPayload) -> Result<(), MailerError> {
        self.sent.lock().unwrap().push(payload.clone());
        if self.fail {
            return Err(MailerError::MissingSubject);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
