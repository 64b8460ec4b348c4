//! Executor seam.
//!
//! The registry never blocks: fetch-and-decode work is handed to whatever
//! executor the host application runs, through the [`Spawn`] trait. No
//! runtime is linked here; the host provides one.

use std::{future::Future, pin::Pin};

/// A boxed future with no output, ready to hand to an executor.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// An executor handle that can run detached futures.
pub trait Spawn {
    /// Run the future to completion in the background.
    fn spawn(&self, future: BoxFuture);
}

impl<F: Fn(BoxFuture)> Spawn for F {
    fn spawn(&self, future: BoxFuture) {
        self(future);
    }
}
