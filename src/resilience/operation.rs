//! The fallible call a gate wraps.

use std::future::Future;

/// An asynchronous operation that can be placed behind a [`Gate`](super::Gate).
///
/// Any `Fn(Args) -> impl Future<Output = Result<T, E>>` is an operation, so
/// plain closures work. Types that own a client (see
/// [`ApiClient`](crate::http::ApiClient)) implement it directly.
pub trait Operation<Args>: Send + Sync {
    /// Value produced on success.
    type Output;
    /// Failure produced by the operation itself.
    type Error;

    /// Invoke the operation once.
    fn call(&self, args: Args) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

impl<F, Fut, Args, T, E> Operation<Args> for F
where
    F: Fn(Args) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
{
    type Output = T;
    type Error = E;

    fn call(&self, args: Args) -> impl Future<Output = Result<T, E>> + Send {
        (self)(args)
    }
}
