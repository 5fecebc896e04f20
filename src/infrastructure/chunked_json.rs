// Chunked NDJSON streaming utilities
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::Stream;
use serde::Serialize;

/// Encode one item as a newline-terminated JSON chunk
fn serialize_chunk<T: Serialize>(item: &T) -> Result<Bytes, std::io::Error> {
    let mut line = serde_json::to_vec(item)?;
    line.push(b'\n');
    Ok(Bytes::from(line))
}

/// Create a chunked NDJSON streaming response
pub fn ndjson_stream<S, T>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize,
{
    let byte_stream = stream.map(|item| serialize_chunk(&item));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_one_line_per_item() {
        let items = futures::stream::iter(vec![json!({ "n": 1 }), json!({ "n": 2 })]);
        let response = ndjson_stream(items).unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/x-ndjson");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{\"n\":1}\n{\"n\":2}\n");
    }
}
