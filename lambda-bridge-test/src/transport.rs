//! In-memory Lambda transport

use async_trait::async_trait;
use lambda_bridge_core::{
    ClientFactory, Error, InvokeOutput, InvokeRequest, LambdaConfig, LambdaTransport, Result,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Transport that records every request and replays scripted responses
///
/// When the script runs dry it answers like the service does for an accepted
/// `Event` invocation: status 202 with no payload.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<InvokeRequest>>,
    script: Mutex<VecDeque<Result<InvokeOutput>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, output: InvokeOutput) {
        self.script.lock().unwrap().push_back(Ok(output));
    }

    pub fn push_err(&self, error: Error) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<InvokeRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<InvokeRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LambdaTransport for RecordingTransport {
    async fn invoke(&self, request: &InvokeRequest) -> Result<InvokeOutput> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(InvokeOutput::accepted()))
    }
}

/// Factory handing out one shared transport and counting constructions
pub struct CountingFactory {
    transport: Arc<RecordingTransport>,
    builds: AtomicUsize,
    last_config: Mutex<Option<LambdaConfig>>,
}

impl CountingFactory {
    pub fn new(transport: Arc<RecordingTransport>) -> Self {
        Self {
            transport,
            builds: AtomicUsize::new(0),
            last_config: Mutex::new(None),
        }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Configuration passed to the most recent build
    pub fn last_config(&self) -> Option<LambdaConfig> {
        self.last_config.lock().unwrap().clone()
    }
}

impl ClientFactory for CountingFactory {
    fn build(&self, config: &LambdaConfig) -> Arc<dyn LambdaTransport> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        *self.last_config.lock().unwrap() = Some(config.clone());
        self.transport.clone()
    }
}
