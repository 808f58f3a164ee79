//! Calling conventions for the client facade
//!
//! Every endpoint produces a dispatch future; an [`Execution`] decides how
//! that future reaches the caller. [`Async`] hands it back to be awaited,
//! [`Blocking`] drives it to completion on the calling thread.

use std::future::Future;

use futures::future::BoxFuture;
use tokio::runtime::{Builder, Runtime};

use crate::error::Result;

/// Strategy for running a dispatch future
pub trait Execution: Send + Sync {
    /// What a facade method returns for a result of type `T`
    type Output<'a, T: 'a>
    where
        Self: 'a;

    fn execute<'a, T, F>(&'a self, future: F) -> Self::Output<'a, T>
    where
        T: Send + 'a,
        F: Future<Output = Result<T>> + Send + 'a;
}

/// Suspending convention: facade methods return futures
#[derive(Debug, Clone, Copy, Default)]
pub struct Async;

impl Execution for Async {
    type Output<'a, T: 'a> = BoxFuture<'a, Result<T>>
    where
        Self: 'a;

    fn execute<'a, T, F>(&'a self, future: F) -> Self::Output<'a, T>
    where
        T: Send + 'a,
        F: Future<Output = Result<T>> + Send + 'a,
    {
        Box::pin(future)
    }
}

/// Blocking convention: facade methods return results directly.
///
/// Owns a small multi-threaded runtime that hosts connection I/O, so any
/// number of threads may block on requests at once. Must not be used, or
/// dropped, from inside another async runtime.
#[derive(Debug)]
pub struct Blocking {
    runtime: Runtime,
}

impl Blocking {
    pub fn new() -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("solaredge-blocking")
            .enable_all()
            .build()?;
        Ok(Self { runtime })
    }
}

impl Execution for Blocking {
    type Output<'a, T: 'a> = Result<T>
    where
        Self: 'a;

    fn execute<'a, T, F>(&'a self, future: F) -> Self::Output<'a, T>
    where
        T: Send + 'a,
        F: Future<Output = Result<T>> + Send + 'a,
    {
        self.runtime.block_on(future)
    }
}
