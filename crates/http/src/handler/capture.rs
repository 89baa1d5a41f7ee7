use std::error::Error;

use async_trait::async_trait;
use http::Request;
use http_body::Body;
use thiserror::Error;

use crate::handler::Handler;
use crate::protocol::{CaptureConfig, CaptureError, CapturedRequest};

/// A handler decorator that captures the request body before dispatching.
///
/// The body is drained exactly once per request, synchronously with the call, and the
/// wrapped handler receives the [`CapturedRequest`]. If the body can not be drained the
/// wrapped handler is not called at all.
#[derive(Debug)]
pub struct CaptureBody<H> {
    handler: H,
    config: CaptureConfig,
}

#[derive(Error, Debug)]
pub enum CaptureBodyError {
    #[error("capture request body error: {source}")]
    Capture {
        #[from]
        source: CaptureError,
    },

    #[error("handler error: {source}")]
    Handler { source: Box<dyn Error + Send + Sync> },
}

impl<H> CaptureBody<H> {
    pub fn new(handler: H) -> Self {
        Self::with_config(handler, CaptureConfig::default())
    }

    pub fn with_config(handler: H, config: CaptureConfig) -> Self {
        Self { handler, config }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn inner(&self) -> &H {
        &self.handler
    }
}

#[async_trait]
impl<B, H> Handler<Request<B>> for CaptureBody<H>
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn Error + Send + Sync>>,
    H: Handler<CapturedRequest> + Send + Sync,
{
    type Output = H::Output;
    type Error = CaptureBodyError;

    async fn call(&self, req: Request<B>) -> Result<Self::Output, Self::Error> {
        let captured = CapturedRequest::capture_with(req, &self.config).await?;
        self.handler.call(captured).await.map_err(|e| CaptureBodyError::Handler { source: e.into() })
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bytes::Bytes;
    use futures::TryStreamExt;
    use http::Request;
    use http_body::Frame;
    use http_body_util::{BodyExt, Full, StreamBody};
    use serde::Deserialize;

    use super::*;
    use crate::handler::make_handler;
    use crate::protocol::HttpRequest;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Transfer {
        from: String,
        amount: u32,
    }

    fn transfer_request() -> Request<Full<Bytes>> {
        Request::post("/transfer")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from_static(b"{\"from\":\"alice\",\"amount\":30}")))
            .unwrap()
    }

    #[tokio::test]
    async fn every_step_reads_the_whole_body() {
        let handler = CaptureBody::new(make_handler(|req: CapturedRequest| async move {
            // a logging step
            let logged = req.body().collect().await?.to_bytes();
            // a signature step
            let signed = req.body_bytes();
            // the business step
            let transfer: Transfer = req.json()?;
            Ok::<_, Box<dyn Error + Send + Sync>>((logged, signed, transfer))
        }));

        let (logged, signed, transfer) = handler.call(transfer_request()).await.unwrap();

        assert_eq!(logged, Bytes::from_static(b"{\"from\":\"alice\",\"amount\":30}"));
        assert_eq!(logged, signed);
        assert_eq!(transfer, Transfer { from: "alice".to_string(), amount: 30 });
    }

    #[tokio::test]
    async fn inner_not_called_when_capture_fails() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler = CaptureBody::new(make_handler(move |req: CapturedRequest| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, io::Error>(req.len())
            }
        }));

        let chunks: Vec<Result<&'static str, io::Error>> =
            vec![Ok("{\"from\""), Err(io::Error::new(io::ErrorKind::ConnectionAborted, "client went away"))];
        let stream = futures::stream::iter(chunks).map_ok(|s| Frame::data(Bytes::from_static(s.as_bytes())));
        let request = Request::post("/transfer").body(StreamBody::new(stream)).unwrap();

        let result = handler.call(request).await;
        assert!(matches!(result, Err(CaptureBodyError::Capture { source: CaptureError::Io { .. } })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(handler.call(transfer_request()).await.unwrap(), 28);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn limit_from_config() {
        let config = CaptureConfig::builder().max_body_size(8).build();
        let handler = CaptureBody::with_config(
            make_handler(|req: CapturedRequest| async move { Ok::<_, io::Error>(req.path().to_string()) }),
            config,
        );

        assert_eq!(handler.config().max_body_size(), Some(8));
        let result = handler.call(transfer_request()).await;
        assert!(matches!(result, Err(CaptureBodyError::Capture { source: CaptureError::TooLarge { limit: 8 } })));
    }

    #[tokio::test]
    async fn inner_error_is_reported() {
        let handler = CaptureBody::new(make_handler(|req: CapturedRequest| async move { req.json::<Vec<u32>>() }));

        let result = handler.call(transfer_request()).await;
        match result {
            Err(CaptureBodyError::Handler { source }) => assert!(source.to_string().starts_with("invalid json body")),
            other => panic!("expect handler error, but got {other:?}"),
        }
    }
}
