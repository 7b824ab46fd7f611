//! Hickory request handler: puts [`Resolver`] answers on the wire.
//!
//! Declined queries go to the next handler. The default next handler is
//! [`ServFail`], which answers SERVFAIL, so a standalone server fails
//! closed on anything outside its zones.

use async_trait::async_trait;
use hickory_proto::op::{Header, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::Name;
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use tracing::{debug, error};

use crate::resolver::{Resolver, Response};

/// Serves peer zones, deferring everything else to `next`.
pub struct PeerDnsHandler<N = ServFail> {
    resolver: Resolver,
    next: N,
}

impl PeerDnsHandler<ServFail> {
    /// Handler with the SERVFAIL terminal as next.
    pub const fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            next: ServFail,
        }
    }
}

impl<N: RequestHandler> PeerDnsHandler<N> {
    /// Handler that passes declined queries to `next`.
    pub const fn with_next(resolver: Resolver, next: N) -> Self {
        Self { resolver, next }
    }
}

#[async_trait]
impl<N: RequestHandler> RequestHandler for PeerDnsHandler<N> {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        if request.message_type() != MessageType::Query || request.op_code() != OpCode::Query {
            return self.next.handle_request(request, response_handle).await;
        }

        let info = match request.request_info() {
            Ok(info) => info,
            Err(e) => {
                debug!(src = %request.src(), error = %e, "malformed request");
                return self.next.handle_request(request, response_handle).await;
            }
        };

        let name = Name::from(info.query.name().clone());
        let response = self.resolver.resolve(
            &name,
            info.query.query_type(),
            info.query.query_class(),
        );

        let Some(header) = response_header(request.header(), &response) else {
            return self.next.handle_request(request, response_handle).await;
        };

        debug!(
            src = %request.src(),
            name = %name,
            query_type = %info.query.query_type(),
            rcode = %header.response_code(),
            "answering"
        );

        let builder = MessageResponseBuilder::from_message_request(request);
        let message = builder.build(
            header,
            response.answers().iter(),
            std::iter::empty(),
            response.authority().iter(),
            std::iter::empty(),
        );

        match response_handle.send_response(message).await {
            Ok(sent) => sent,
            Err(e) => {
                error!(error = %e, "failed to send response");
                servfail_info(request.header())
            }
        }
    }
}

/// Response header for an engine answer, or `None` when it declined.
///
/// Authoritative, no recursion, NXDOMAIN rcode where it applies.
pub fn response_header(request: &Header, response: &Response) -> Option<Header> {
    let rcode = match response {
        Response::Decline => return None,
        Response::NxDomain { .. } => ResponseCode::NXDomain,
        Response::Answer { .. } | Response::NoData { .. } => ResponseCode::NoError,
    };

    let mut header = Header::response_from_request(request);
    header.set_authoritative(true);
    header.set_recursion_available(false);
    header.set_response_code(rcode);
    Some(header)
}

fn servfail_info(request: &Header) -> ResponseInfo {
    let mut header = Header::response_from_request(request);
    header.set_response_code(ResponseCode::ServFail);
    header.into()
}

/// Terminal handler: answers every request with SERVFAIL.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServFail;

#[async_trait]
impl RequestHandler for ServFail {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let builder = MessageResponseBuilder::from_message_request(request);
        let message = builder.error_msg(request.header(), ResponseCode::ServFail);
        match response_handle.send_response(message).await {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "failed to send SERVFAIL");
                servfail_info(request.header())
            }
        }
    }
}
