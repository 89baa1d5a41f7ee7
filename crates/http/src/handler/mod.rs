//! Request handlers and the decorator that captures bodies in front of them.
//!
//! A [`Handler`] is one step of request processing. [`CaptureBody`] wraps a handler that
//! works on a [`CapturedRequest`](crate::protocol::CapturedRequest) and turns it into a
//! handler for plain `http::Request<B>` values: it captures the body once per request,
//! before the wrapped handler runs, so every step inside can read the body again.

mod capture;

pub use capture::CaptureBody;
pub use capture::CaptureBodyError;

use std::error::Error;
use std::future::Future;

use async_trait::async_trait;

#[async_trait]
pub trait Handler<Req> {
    type Output;
    type Error: Into<Box<dyn Error + Send + Sync>>;

    async fn call(&self, req: Req) -> Result<Self::Output, Self::Error>;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<Req, Out, Err, F, Fut> Handler<Req> for HandlerFn<F>
where
    Req: Send + 'static,
    F: Fn(Req) -> Fut + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
    Fut: Future<Output = Result<Out, Err>> + Send,
{
    type Output = Out;
    type Error = Err;

    async fn call(&self, req: Req) -> Result<Self::Output, Self::Error> {
        (self.f)(req).await
    }
}

pub fn make_handler<F, Req, Out, Err, Ret>(f: F) -> HandlerFn<F>
where
    Err: Into<Box<dyn Error + Send + Sync>>,
    Ret: Future<Output = Result<Out, Err>>,
    F: Fn(Req) -> Ret,
{
    HandlerFn { f }
}
