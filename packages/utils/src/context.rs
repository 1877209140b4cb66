use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::runtime::Runtime;
use tracing::instrument;

/// Shared handle to the async runtime plus a process-wide kill switch
#[derive(Clone)]
pub struct AppContext {
    pub rt: Arc<Runtime>,
    killed: Arc<AtomicBool>,
    kill_sender: tokio::sync::broadcast::Sender<()>,
    // keeps the channel open so `kill` never fails for lack of receivers
    _kill_receiver: Arc<tokio::sync::broadcast::Receiver<()>>,
}

impl AppContext {
    /// Builds a dedicated multi-threaded runtime, used by the binaries
    pub fn new() -> std::io::Result<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let (kill_sender, kill_receiver) = tokio::sync::broadcast::channel(1);

        Ok(Self {
            rt: Arc::new(rt),
            kill_sender,
            _kill_receiver: Arc::new(kill_receiver),
            killed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Lets async code stop gracefully without its parent dropping it
    #[instrument(skip(self), fields(subsys = "AppContext"))]
    pub fn get_kill_receiver(&self) -> tokio::sync::broadcast::Receiver<()> {
        self.kill_sender.subscribe()
    }

    /// Typically only called from main (ctrl-c) or tests
    #[instrument(skip(self), fields(subsys = "AppContext"))]
    pub fn kill(&self) {
        if !self.killed.swap(true, Ordering::SeqCst) {
            // the context itself holds a receiver, so this cannot fail
            let _ = self.kill_sender.send(());
        }
    }

    pub fn killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kill_is_observed_by_receivers() {
        let ctx = AppContext::new().unwrap();
        let mut receiver = ctx.get_kill_receiver();

        assert!(!ctx.killed());
        ctx.kill();
        assert!(ctx.killed());

        ctx.rt.block_on(async move {
            receiver.recv().await.unwrap();
        });
    }

    #[test]
    fn kill_twice_is_harmless() {
        let ctx = AppContext::new().unwrap();
        ctx.kill();
        ctx.kill();
        assert!(ctx.killed());
    }

}
