use futures::future::BoxFuture;

/// Runs background work started by synchronous repository calls
/// (refresh, scroll prefetch).
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, task: BoxFuture<'static, ()>);
}

/// Dispatcher that spawns onto the ambient tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDispatcher;

impl Dispatcher for TokioDispatcher {
    fn dispatch(&self, task: BoxFuture<'static, ()>) {
        tokio::spawn(task);
    }
}
