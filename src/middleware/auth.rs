use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{decode_jwt, Session};

/// Attach the caller's [`Session`] to the request.
///
/// A missing or unusable bearer token yields an anonymous session; the route
/// guards decide what an anonymous caller may see.
pub async fn session_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let session = match extract_jwt_from_headers(request.headers()) {
        Ok(Some(token)) => match decode_jwt(&token, &state.jwt_secret) {
            Ok(claims) => Session::authenticated(claims.sub),
            Err(e) => {
                tracing::warn!("Rejected bearer token: {}", e);
                Session::anonymous()
            }
        },
        Ok(None) => Session::anonymous(),
        Err(msg) => {
            tracing::warn!("{}", msg);
            Session::anonymous()
        }
    };

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, String> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(Some(token.trim().to_string()))
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_jwt_from_headers(&headers), Ok(None));

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_jwt_from_headers(&headers), Ok(Some("abc.def".to_string())));

        headers.insert("authorization", HeaderValue::from_static("Basic Zm9v"));
        assert!(extract_jwt_from_headers(&headers).is_err());
    }
}
