//! Mirror request handler.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::{info, warn};

use hubmirror_core::ImageReference;

use crate::http::responses::ApiError;
use crate::sink::{ChannelSink, StreamFrame};
use crate::state::{AppState, STATUS_CHANNEL_CAPACITY};

/// Header set by the CDN in front of the service.
const CLIENT_IP_HEADER: &str = "cf-connecting-ip";

/// Mirror endpoint. The request path, percent-decoded, is the image to
/// mirror.
///
/// Validation and the upstream existence check answer with plain status
/// codes. Once both pass, the response is a chunked `text/plain` body fed
/// line by line by a background session.
pub async fn mirror_image(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    image: Option<Path<String>>,
) -> Result<Response, ApiError> {
    if !is_cli_client(&headers) {
        return Ok((
            StatusCode::FOUND,
            [(header::LOCATION, state.homepage_url.clone())],
        )
            .into_response());
    }

    // `/` carries no path parameter.
    let image = image.map(|Path(image)| image).unwrap_or_default();
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    info!(
        image = %image,
        source_ip = %source_ip(&headers, peer),
        "Received mirror request"
    );

    if image.is_empty() {
        return Err(ApiError::MissingImage);
    }

    let reference = match ImageReference::parse(&image) {
        Ok(reference) => reference,
        Err(e) => {
            warn!(image = %image, error = %e, "Rejected image reference");
            return Err(ApiError::InvalidReference(image));
        }
    };

    match state.probe.check(&reference).await {
        Ok(true) => {}
        Ok(false) => {
            info!(image = %reference, "Image not found upstream");
            return Err(ApiError::NotFound(image));
        }
        Err(e) => {
            warn!(image = %reference, error = %e, "Docker Hub lookup failed");
            return Err(ApiError::RegistryUnavailable(image));
        }
    }

    let (sink, rx) = ChannelSink::new(STATUS_CHANNEL_CAPACITY);
    let session = state.session.clone();
    tokio::spawn(async move {
        session.drive(sink, image, reference).await;
    });

    let body = ReceiverStream::new(rx).map(|frame| match frame {
        StreamFrame::Line(line) => Ok(format!("{}\n", line)),
        StreamFrame::Abort(reason) => Err(io::Error::other(reason)),
    });

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(body),
    )
        .into_response())
}

/// Only command line downloaders get the stream; anything else is a browser.
fn is_cli_client(headers: &HeaderMap) -> bool {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|agent| {
            let agent = agent.to_ascii_lowercase();
            agent.contains("curl") || agent.contains("wget")
        })
        .unwrap_or(false)
}

fn source_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get(CLIENT_IP_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}
