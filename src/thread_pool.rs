//! Where bootstrap replicates execute.
//!
//! With `parallel` enabled, replicates run on a dedicated rayon pool whose
//! workers are named `bootci-worker-N` and get an 8 MB stack. The pool is
//! built on first use and shared by every analysis in the process. If it
//! cannot be built, work falls back to rayon's global pool. Without
//! `parallel`, [`install`] just calls the closure.

#[cfg(feature = "parallel")]
mod workers {
    use std::sync::OnceLock;

    use rayon::{ThreadPool, ThreadPoolBuilder};

    use crate::constants::WORKER_STACK_BYTES;

    static WORKERS: OnceLock<Option<ThreadPool>> = OnceLock::new();

    pub(super) fn pool() -> Option<&'static ThreadPool> {
        WORKERS
            .get_or_init(|| {
                let built = ThreadPoolBuilder::new()
                    .stack_size(WORKER_STACK_BYTES)
                    .thread_name(|i| format!("bootci-worker-{i}"))
                    .build();
                match built {
                    Ok(pool) => Some(pool),
                    Err(err) => {
                        tracing::warn!(%err, "worker pool unavailable, using the global rayon pool");
                        None
                    }
                }
            })
            .as_ref()
    }
}

/// Run `op` on the replicate workers.
#[cfg(feature = "parallel")]
pub(crate) fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R + Send,
    R: Send,
{
    match workers::pool() {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Run `op` on the calling thread.
#[cfg(not(feature = "parallel"))]
pub(crate) fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R,
{
    op()
}
