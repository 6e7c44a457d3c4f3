//! Tokio Runtime Bridge
//!
//! The search debounce timer needs a tokio runtime. Owners already running
//! inside one (the console's event loop, `#[tokio::test]`) get their own
//! runtime; everything else falls back to a lazily created global runtime.
//!
//! ## Pattern
//!
//! ```text
//! DataTable::on_search_input
//!       │
//!       ▼
//! spawn_in_tokio(async { sleep(quiet).await; tx.send(query) })
//!       │
//!       ▼
//! JoinHandle kept in the single debounce slot (aborted on new input)
//! ```

use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

/// Global tokio runtime instance
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create tokio runtime"))
}

/// Handle to the ambient runtime, or the global one outside any runtime
pub fn runtime_handle() -> Handle {
    Handle::try_current().unwrap_or_else(|_| get_runtime().handle().clone())
}

/// Spawn a task and keep its handle so the caller can abort it
pub fn spawn_in_tokio<F>(future: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    runtime_handle().spawn(future)
}

/// Spawn a task with a name (for debugging)
pub fn spawn_named_in_tokio<F>(name: &'static str, future: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::trace!("Spawning tokio task: {}", name);
    spawn_in_tokio(async move {
        future.await;
        tracing::trace!("Tokio task completed: {}", name);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_outside_runtime_uses_global() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let flag = Arc::new(AtomicBool::new(false));
        let flag_clone = flag.clone();

        spawn_in_tokio(async move {
            flag_clone.store(true, Ordering::SeqCst);
        });

        // Give the task time to complete
        std::thread::sleep(std::time::Duration::from_millis(100));
        assert!(flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_spawn_inside_runtime_uses_ambient() {
        let handle = spawn_named_in_tokio("noop", async {});
        handle.await.expect("task completes");
    }
}
