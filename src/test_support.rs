//! Shared test doubles for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::core::response::ResponseMessage;
use crate::dispatch::channel::NotificationChannel;
use crate::features::registration::{CommandApi, RegistrationError, RegistrationTarget};

/// Everything sent through a [`RecordingChannel`], in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ChannelCall {
    Reply(ResponseMessage),
    Defer { ephemeral: bool },
    FollowUp(ResponseMessage),
    EditReply(ResponseMessage),
}

/// A [`NotificationChannel`] that records every call.
#[derive(Default)]
pub(crate) struct RecordingChannel {
    calls: Mutex<Vec<ChannelCall>>,
    fail_edits: AtomicBool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel whose `edit_reply` always errors.
    pub fn failing_edits() -> Self {
        let channel = Self::default();
        channel.fail_edits.store(true, Ordering::SeqCst);
        channel
    }

    pub fn calls(&self) -> Vec<ChannelCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<ResponseMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChannelCall::Reply(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn follow_ups(&self) -> Vec<ResponseMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChannelCall::FollowUp(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<ResponseMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChannelCall::EditReply(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn reply(&self, message: &ResponseMessage) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(ChannelCall::Reply(message.clone()));
        Ok(())
    }

    async fn defer(&self, ephemeral: bool) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(ChannelCall::Defer { ephemeral });
        Ok(())
    }

    async fn follow_up(&self, message: &ResponseMessage) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(ChannelCall::FollowUp(message.clone()));
        Ok(())
    }

    async fn edit_reply(&self, message: &ResponseMessage) -> Result<()> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(anyhow!("edit failed"));
        }
        self.calls
            .lock()
            .unwrap()
            .push(ChannelCall::EditReply(message.clone()));
        Ok(())
    }
}

/// One recorded REST call against the [`MockApi`].
#[derive(Debug, Clone)]
pub(crate) struct ApiCall {
    pub target: RegistrationTarget,
    pub payload: Value,
    pub at: Instant,
}

/// A [`CommandApi`] with scripted results and call recording.
///
/// Unscripted calls succeed: `bulk_set` reports the payload length,
/// `create` returns `Ok(())`.
#[derive(Default)]
pub(crate) struct MockApi {
    bulk_script: Mutex<VecDeque<Result<usize, RegistrationError>>>,
    create_script: Mutex<VecDeque<Result<(), RegistrationError>>>,
    fetch_result: Mutex<Vec<(u64, String)>>,
    fail_deletes: AtomicBool,
    bulk_calls: Mutex<Vec<ApiCall>>,
    create_calls: Mutex<Vec<ApiCall>>,
    deleted: Mutex<Vec<u64>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next `bulk_set` call.
    pub fn script_bulk(&self, result: Result<usize, RegistrationError>) {
        self.bulk_script.lock().unwrap().push_back(result);
    }

    /// Queue the result of the next `create` call.
    pub fn script_create(&self, result: Result<(), RegistrationError>) {
        self.create_script.lock().unwrap().push_back(result);
    }

    pub fn set_fetch_result(&self, commands: Vec<(u64, String)>) {
        *self.fetch_result.lock().unwrap() = commands;
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn bulk_calls(&self) -> Vec<ApiCall> {
        self.bulk_calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<ApiCall> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<u64> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandApi for MockApi {
    async fn bulk_set(
        &self,
        target: RegistrationTarget,
        payload: &Value,
    ) -> Result<usize, RegistrationError> {
        self.bulk_calls.lock().unwrap().push(ApiCall {
            target,
            payload: payload.clone(),
            at: Instant::now(),
        });
        match self.bulk_script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(payload.as_array().map(Vec::len).unwrap_or(0)),
        }
    }

    async fn create(
        &self,
        target: RegistrationTarget,
        payload: &Value,
    ) -> Result<(), RegistrationError> {
        self.create_calls.lock().unwrap().push(ApiCall {
            target,
            payload: payload.clone(),
            at: Instant::now(),
        });
        self.create_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn fetch(
        &self,
        _target: RegistrationTarget,
    ) -> Result<Vec<(u64, String)>, RegistrationError> {
        Ok(self.fetch_result.lock().unwrap().clone())
    }

    async fn delete(
        &self,
        _target: RegistrationTarget,
        command_id: u64,
    ) -> Result<(), RegistrationError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RegistrationError::Transient("delete failed".to_string()));
        }
        self.deleted.lock().unwrap().push(command_id);
        Ok(())
    }
}
