//! Bounded delegation of blocking engine calls.
//!
//! pdfium, Tesseract, the image decoder and the DOCX parser are synchronous
//! and CPU-bound. Running them on a Tokio worker thread would stall every
//! other request scheduled on it, so each call goes through
//! `tokio::task::spawn_blocking` while holding a semaphore permit. Two
//! separate semaphores keep rasterisation (pdfium is effectively
//! single-threaded) from competing with recognition for permits: a document
//! renderer waiting on a full page channel can never starve the recognisers
//! that would drain it.

use crate::error::ExtractError;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Process-wide worker pool shared by all requests.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    render: Arc<Semaphore>,
    engine: Arc<Semaphore>,
}

impl WorkerPool {
    pub fn new(render_workers: usize, engine_workers: usize) -> Self {
        Self {
            render: Arc::new(Semaphore::new(render_workers.max(1))),
            engine: Arc::new(Semaphore::new(engine_workers.max(1))),
        }
    }

    /// Run a rasterisation job.
    pub async fn render<F, T>(&self, job: F) -> Result<T, ExtractError>
    where
        F: FnOnce() -> Result<T, ExtractError> + Send + 'static,
        T: Send + 'static,
    {
        run_bounded(&self.render, "render", job).await
    }

    /// Run a recognition, decode or DOCX parsing job.
    pub async fn engine<F, T>(&self, job: F) -> Result<T, ExtractError>
    where
        F: FnOnce() -> Result<T, ExtractError> + Send + 'static,
        T: Send + 'static,
    {
        run_bounded(&self.engine, "engine", job).await
    }

    /// Permits currently free in the engine pool.
    pub fn engine_available(&self) -> usize {
        self.engine.available_permits()
    }
}

async fn run_bounded<F, T>(
    semaphore: &Arc<Semaphore>,
    name: &str,
    job: F,
) -> Result<T, ExtractError>
where
    F: FnOnce() -> Result<T, ExtractError> + Send + 'static,
    T: Send + 'static,
{
    let permit = Arc::clone(semaphore)
        .acquire_owned()
        .await
        .map_err(|e| ExtractError::Internal(format!("{name} pool closed: {e}")))?;

    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        job()
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("{name} task panicked: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn job_result_is_returned() {
        let pool = WorkerPool::new(1, 1);
        let v = pool.engine(|| Ok(21 * 2)).await.unwrap();
        assert_eq!(v, 42);
    }

    #[tokio::test]
    async fn job_error_is_propagated() {
        let pool = WorkerPool::new(1, 1);
        let err = pool
            .engine(|| -> Result<(), _> { Err(ExtractError::Internal("nope".into())) })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn panic_becomes_internal_error() {
        let pool = WorkerPool::new(1, 1);
        let err = pool
            .render(|| -> Result<(), ExtractError> { panic!("engine exploded") })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Internal);
        // Permit is returned even though the job panicked.
        assert!(pool.render(|| Ok(())).await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn engine_pool_bounds_concurrency() {
        let pool = WorkerPool::new(1, 2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = pool.clone();
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            handles.push(tokio::spawn(async move {
                pool.engine(move || {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(20));
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                })
                .await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(pool.engine_available(), 2);
    }
}
