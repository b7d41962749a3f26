//! Background thread that serves remote requests with a blocking backend.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use pp_core::{SessionId, Timer};

use crate::remote::{Completion, Operation, RemoteCompute, RemoteError, Request};

/// Blocking implementation of the compute service, run off the UI thread.
pub trait ComputeBackend: Send + 'static {
    fn call(&mut self, session: &SessionId, operation: &Operation) -> Result<String, RemoteError>;
}

/// Runs a [`ComputeBackend`] on a background thread.
///
/// Requests go in over one channel; completions come back over another that the
/// owner drains on its own thread and hands to the session. Requests are served
/// in the order they were sent.
pub struct RemoteWorker {
    request_tx: Sender<Request>,
    _handle: JoinHandle<()>,
}

impl RemoteWorker {
    pub fn start<B: ComputeBackend>(backend: B) -> (Self, Receiver<Completion>) {
        let (request_tx, request_rx) = channel();
        let (completion_tx, completion_rx) = channel();

        let handle = thread::spawn(move || Self::serve(backend, request_rx, completion_tx));

        (
            Self {
                request_tx,
                _handle: handle,
            },
            completion_rx,
        )
    }

    fn serve<B: ComputeBackend>(
        mut backend: B,
        requests: Receiver<Request>,
        completions: Sender<Completion>,
    ) {
        for request in requests {
            tracing::debug!(id = %request.id, route = %request.route(), "serving request");
            let timer = Timer::start(request.operation.name());
            let result = backend.call(&request.session, &request.operation);
            timer.stop_and_log();

            if completions
                .send(Completion {
                    id: request.id,
                    result,
                })
                .is_err()
            {
                // Receiver gone: nobody is listening anymore.
                break;
            }
        }
    }
}

impl RemoteCompute for RemoteWorker {
    fn send(&mut self, request: Request) {
        if let Err(err) = self.request_tx.send(request) {
            tracing::warn!(id = %err.0.id, "remote worker stopped, request dropped");
        }
    }
}
