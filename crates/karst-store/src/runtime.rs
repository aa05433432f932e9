use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};

use crate::store::ChunkStore;

/// How long an idle worker parks between queue polls. Shutdown interrupts
/// the park through the stop channel, so this only bounds idle wake-ups.
const IDLE_PARK: Duration = Duration::from_millis(5);

/// Background worker owning the generate+mesh loop. The worker must be
/// signalled and joined before the store is torn down; dropping the runtime
/// does both.
pub struct Runtime {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Runtime {
    pub fn spawn(store: Arc<ChunkStore>) -> Runtime {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("karst-worker-0".into())
            .spawn(move || worker_loop(store, stop_rx))
            .expect("chunk worker");
        Runtime {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Signal the worker and join it. Idempotent; safe to call before Drop.
    pub fn shutdown(&mut self) {
        let _ = self.stop_tx.try_send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("chunk worker panicked");
            }
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(store: Arc<ChunkStore>, stop_rx: Receiver<()>) {
    log::debug!("chunk worker running");
    loop {
        if store.dispatch_next() {
            match stop_rx.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }
        } else {
            match stop_rx.recv_timeout(IDLE_PARK) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }
    log::debug!("chunk worker stopped");
}
