//! Request extractors that report failures as `422` field errors.
//!
//! axum's stock extractors reject with plain-text bodies. These wrappers run
//! the same extraction but convert every rejection into
//! [`AppError::Validation`], so clients always receive a `{"detail": [...]}`
//! list naming the offending location.

use std::collections::HashMap;

use axum::{
    Form,
    body::Bytes,
    extract::{
        FromRequest, FromRequestParts, Path, Query, RawPathParams, Request,
        path::ErrorKind as PathErrorKind,
        rejection::{FormRejection, PathRejection},
    },
    http::{header::CONTENT_TYPE, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use pet_store_core::{ErrorKind, FieldError, FromBody, Loc, ValidationErrors, parse_body};

use crate::error::AppError;

/// JSON body validated through [`FromBody`].
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: FromBody,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            ValidationErrors::from(FieldError::new(
                Loc::body(),
                ErrorKind::ValueError,
                rejection.body_text(),
            ))
        })?;
        Ok(Self(parse_body(&bytes)?))
    }
}

/// Typed path parameters; a parameter that does not parse is an `int_type`
/// error at `["path", <name>]`.
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                // Single-parameter routes report parse failures without a key,
                // so the names come from the matched route instead.
                let names: Vec<String> = RawPathParams::from_request_parts(parts, state)
                    .await
                    .map(|params| params.iter().map(|(name, _)| name.to_owned()).collect())
                    .unwrap_or_default();
                Err(ValidationErrors::from(path_error(&rejection, &names)).into())
            }
        }
    }
}

fn path_error(rejection: &PathRejection, names: &[String]) -> FieldError {
    let PathRejection::FailedToDeserializePathParams(err) = rejection else {
        return FieldError::new(
            Loc::path("*"),
            ErrorKind::ValueError,
            rejection.body_text(),
        );
    };
    let name = match err.kind() {
        PathErrorKind::ParseErrorAtKey { key, .. } => Some(key.as_str()),
        PathErrorKind::ParseErrorAtIndex { index, .. } => names.get(*index).map(String::as_str),
        PathErrorKind::ParseError { .. } => names.first().map(String::as_str),
        _ => {
            return FieldError::new(Loc::path("*"), ErrorKind::ValueError, err.body_text());
        }
    };
    FieldError::new(
        Loc::path(name.unwrap_or("*")),
        ErrorKind::IntType,
        "Input should be a valid integer, unable to parse string as an integer",
    )
}

/// Query parameters validated through [`FromBody`].
///
/// The raw parameters are read as a string map and handed to the type's
/// reader rooted at `["query"]`, so a missing parameter is reported as
/// `["query", <name>]`.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: FromBody,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ValidationErrors::from(FieldError::new(
                    Loc::query_string(),
                    ErrorKind::ValueError,
                    rejection.body_text(),
                ))
            })?;
        let object: Map<String, Value> = params
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        T::from_body(&Value::Object(object), &Loc::query_string())
            .map(Self)
            .map_err(|errors| ValidationErrors::new(errors).into())
    }
}

/// URL-encoded form whose fields are all optional.
///
/// A request without a `Content-Type` carries no form at all and yields
/// `T::default()`.
#[derive(Debug)]
pub struct OptionalForm<T>(pub T);

impl<S, T> FromRequest<S> for OptionalForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !req.headers().contains_key(CONTENT_TYPE) {
            return Ok(Self(T::default()));
        }
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(Self(value)),
            Err(rejection) => Err(ValidationErrors::from(form_error(&rejection)).into()),
        }
    }
}

fn form_error(rejection: &FormRejection) -> FieldError {
    FieldError::new(Loc::body(), ErrorKind::ValueError, rejection.body_text())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request as HttpRequest, StatusCode},
        routing::{get, post},
    };
    use serde::Deserialize;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use pet_store_core::NewPet;
    use pet_store_core::validation::ObjectReader;

    use super::*;

    struct Search {
        term: String,
    }

    impl FromBody for Search {
        fn from_body(value: &Value, loc: &Loc) -> Result<Self, Vec<FieldError>> {
            let mut reader = ObjectReader::new(value, loc);
            match reader.string("term") {
                Some(term) if reader.is_clean() => Ok(Self { term }),
                _ => Err(reader.into_errors()),
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    struct Rename {
        name: Option<String>,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/pets",
                post(|ValidJson(pet): ValidJson<NewPet>| async move { pet.name }),
            )
            .route(
                "/pets/{pet_id}",
                get(|ValidPath(id): ValidPath<i64>| async move { id.to_string() }),
            )
            .route(
                "/owners/{owner_id}/pets/{pet_id}",
                get(|ValidPath((owner, pet)): ValidPath<(i64, i64)>| async move {
                    format!("{owner}/{pet}")
                }),
            )
            .route(
                "/search",
                get(|ValidQuery(search): ValidQuery<Search>| async move { search.term }),
            )
            .route(
                "/rename",
                post(|OptionalForm(form): OptionalForm<Rename>| async move {
                    form.name.unwrap_or_default()
                }),
            )
    }

    async fn send(request: HttpRequest<Body>) -> (StatusCode, Vec<u8>) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn detail(bytes: &[u8]) -> Value {
        serde_json::from_slice::<Value>(bytes).unwrap()["detail"].clone()
    }

    #[tokio::test]
    async fn test_valid_json_accepts_body() {
        let body = json!({"name": "Max", "category": {"id": 1}, "status": "available"});
        let (status, bytes) = send(
            HttpRequest::post("/pets")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"Max");
    }

    #[tokio::test]
    async fn test_valid_json_lists_missing_fields() {
        let (status, bytes) = send(
            HttpRequest::post("/pets")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name": "Max"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let locs: Vec<Value> = detail(&bytes)
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["loc"].clone())
            .collect();
        assert_eq!(locs, [json!(["body", "category"]), json!(["body", "status"])]);
    }

    #[tokio::test]
    async fn test_valid_path_rejects_non_integer() {
        let (status, bytes) = send(HttpRequest::get("/pets/abc").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let detail = detail(&bytes);
        assert_eq!(detail[0]["loc"], json!(["path", "pet_id"]));
        assert_eq!(detail[0]["type"], "int_type");
    }

    #[tokio::test]
    async fn test_valid_path_rejects_out_of_range_integer() {
        let (status, bytes) = send(
            HttpRequest::get("/pets/99999999999999999999")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let detail = detail(&bytes);
        assert_eq!(detail[0]["loc"], json!(["path", "pet_id"]));
        assert_eq!(detail[0]["type"], "int_type");
    }

    #[tokio::test]
    async fn test_valid_path_names_failing_parameter_by_position() {
        let (status, bytes) =
            send(HttpRequest::get("/owners/7/pets/rex").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let detail = detail(&bytes);
        assert_eq!(detail[0]["loc"], json!(["path", "pet_id"]));
        assert_eq!(detail[0]["type"], "int_type");

        let (status, bytes) =
            send(HttpRequest::get("/owners/7/pets/3").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"7/3");
    }

    #[tokio::test]
    async fn test_valid_query_reports_missing_parameter() {
        let (status, bytes) = send(HttpRequest::get("/search").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(detail(&bytes)[0]["loc"], json!(["query", "term"]));

        let (status, bytes) =
            send(HttpRequest::get("/search?term=dogs").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"dogs");
    }

    #[tokio::test]
    async fn test_optional_form_without_content_type() {
        let (status, bytes) = send(HttpRequest::post("/rename").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(bytes.is_empty());

        let (status, bytes) = send(
            HttpRequest::post("/rename")
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("name=Rex"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"Rex");
    }
}
