//! Completion-signalling response body.
//!
//! The middleware returns as soon as the handler produced a response head,
//! but the body may still be streaming. The observation is recorded when the
//! body reports end-of-stream, or when it is dropped (client went away, or
//! the server never polled an empty body). Whichever comes first wins; the
//! context is consumed so it fires exactly once.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, HeaderMap};
use bytes::Bytes;
use http_body::{Body as HttpBody, Frame, SizeHint};

use super::instrument::RequestContext;

pub(crate) struct ObservedBody {
    inner: Body,
    streamed: u64,
    declared: Option<u64>,
    ctx: Option<RequestContext>,
}

impl ObservedBody {
    pub(crate) fn new(inner: Body, headers: &HeaderMap, ctx: RequestContext) -> Self {
        let declared = declared_length(headers)
            .or_else(|| HttpBody::size_hint(&inner).exact());
        Self {
            inner,
            streamed: 0,
            declared,
            ctx: Some(ctx),
        }
    }

    fn finish(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            let size = self.streamed.max(self.declared.unwrap_or(0));
            ctx.finish(size);
        }
    }
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

impl HttpBody for ObservedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let polled = HttpBody::poll_frame(Pin::new(&mut this.inner), cx);
        match &polled {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    this.streamed += data.len() as u64;
                }
            }
            Poll::Ready(None) => this.finish(),
            _ => {}
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        HttpBody::is_end_stream(&self.inner)
    }

    fn size_hint(&self) -> SizeHint {
        HttpBody::size_hint(&self.inner)
    }
}

impl Drop for ObservedBody {
    fn drop(&mut self) {
        self.finish();
    }
}
