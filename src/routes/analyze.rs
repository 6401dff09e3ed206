use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, warn};

use crate::ingest::UploadedFile;
use crate::models::AppState;
use crate::pipeline::SentimentTally;
use crate::types::{AppError, AppResult};

/// Multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/analyze", post(analyze_reviews))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn analyze_reviews(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<SentimentTally>> {
    let multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection, "Request is not a multipart upload");
        AppError::NoFilePart
    })?;

    let limit = state.config.server.max_upload_bytes;
    let file = read_upload(multipart, limit)
        .await?
        .ok_or(AppError::NoFilePart)?;
    info!(filename = %file.filename, bytes = file.content.len(), "Upload received");

    let loader = state.loader.clone();
    let reviews = tokio::task::spawn_blocking(move || loader.load_file(&file))
        .await
        .map_err(|e| AppError::Internal(format!("upload parser failed: {}", e)))??;

    let tally = state.pipeline.run(&reviews).await;

    Ok(Json(tally))
}

/// Return the first `file` part that carries a filename.
async fn read_upload(mut multipart: Multipart, limit: usize) -> AppResult<Option<UploadedFile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(|name| name.to_string()) else {
            continue;
        };

        let content = field
            .bytes()
            .await
            .map_err(|e| upload_error(e, limit))?;

        return Ok(Some(UploadedFile::new(filename, content)));
    }

    Ok(None)
}

fn upload_error(error: MultipartError, limit: usize) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!(limit, "Upload rejected: body limit exceeded");
        AppError::UploadTooLarge(limit)
    } else {
        AppError::Io(error.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::spreadsheet::fixtures::xlsx_bytes;
    use crate::routes::test_support::{concurrent_test_state, test_state, TEST_UPLOAD_LIMIT};
    use crate::sentiment::testing::StubModel;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "X-REVIEW-BOUNDARY";

    struct Part<'a> {
        name: &'a str,
        filename: Option<&'a str>,
        content: &'a [u8],
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part.filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                        part.name, filename
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                        .as_bytes(),
                ),
            }
            body.extend_from_slice(part.content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    async fn post(stub: StubModel, body: Vec<u8>, content_type: &str) -> (StatusCode, Value) {
        post_to(test_state(stub), body, content_type).await
    }

    async fn post_to(state: AppState, body: Vec<u8>, content_type: &str) -> (StatusCode, Value) {
        let app = router(state);
        let response = app
            .oneshot(
                Request::post("/analyze")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn upload(stub: StubModel, filename: &str, content: &[u8]) -> (StatusCode, Value) {
        let body = multipart_body(&[Part {
            name: "file",
            filename: Some(filename),
            content,
        }]);
        post(stub, body, &format!("multipart/form-data; boundary={}", BOUNDARY)).await
    }

    #[tokio::test]
    async fn test_successful_tally() {
        let stub = StubModel::replying(&[
            ("great product", "positive"),
            ("terrible", "negative"),
            ("it arrived", "neutral-ish"),
        ]);
        let csv = b"review\ngreat product\nterrible\nit arrived\n";

        let (status, body) = upload(stub, "reviews.csv", csv).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"positive": 1, "negative": 1, "neutral": 1}));
    }

    #[tokio::test]
    async fn test_concurrent_pipeline_tally() {
        let mut csv = String::from("review\n");
        for i in 0..30 {
            match i % 3 {
                0 => csv.push_str(&format!("positive {}\n", i)),
                1 => csv.push_str(&format!("negative {}\n", i)),
                _ => csv.push_str(&format!("so-so {}\n", i)),
            }
        }
        let body = multipart_body(&[Part {
            name: "file",
            filename: Some("reviews.csv"),
            content: csv.as_bytes(),
        }]);

        let (status, json_body) = post_to(
            concurrent_test_state(StubModel::echoing(), 4),
            body,
            &format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body, json!({"positive": 10, "negative": 10, "neutral": 10}));
    }

    #[tokio::test]
    async fn test_xlsx_upload() {
        let workbook = xlsx_bytes(|sheet| {
            sheet.get_cell_mut("A1").set_value("review");
            sheet.get_cell_mut("A2").set_value("positive vibes");
            sheet.get_cell_mut("A3").set_value("NA");
            sheet.get_cell_mut("A4").set_value("negative experience");
            // A5 left blank
            sheet.get_cell_mut("A6").set_value_number(7);
            sheet.get_cell_mut("A7").set_value("Positive again");
        });

        let (status, body) = upload(StubModel::echoing(), "reviews.xlsx", &workbook).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"positive": 2, "negative": 1, "neutral": 1}));
        let counted: u64 = ["positive", "negative", "neutral"]
            .iter()
            .filter_map(|label| body[*label].as_u64())
            .sum();
        assert_eq!(counted, 4);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let mut csv = b"review\n".to_vec();
        while csv.len() <= TEST_UPLOAD_LIMIT {
            csv.extend_from_slice(b"this review pads the upload past the limit\n");
        }

        let (status, body) = upload(StubModel::echoing(), "reviews.csv", &csv).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body,
            json!({"error": format!("File exceeds the maximum upload size of {} bytes", TEST_UPLOAD_LIMIT)})
        );
    }

    #[tokio::test]
    async fn test_empty_reviews_are_not_counted() {
        let csv = b"id,review\n1,positive\n2,\n3,negative\n4,\n";
        let (status, body) = upload(StubModel::echoing(), "reviews.csv", csv).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"positive": 1, "negative": 1, "neutral": 0}));
    }

    #[tokio::test]
    async fn test_failing_model_counts_everything_neutral() {
        let csv = b"review\ngreat\nbad\nfine\n";
        let (status, body) = upload(StubModel::failing(), "reviews.csv", csv).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"positive": 0, "negative": 0, "neutral": 3}));
    }

    #[tokio::test]
    async fn test_invalid_extension() {
        let (status, body) = upload(StubModel::echoing(), "reviews.txt", b"review\nok\n").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Invalid file format. Please upload CSV or XLSX file."})
        );
    }

    #[tokio::test]
    async fn test_missing_review_column() {
        let (status, body) = upload(StubModel::echoing(), "reviews.csv", b"text\nok\n").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing 'review' column in the file"}));
    }

    #[tokio::test]
    async fn test_malformed_file_is_server_error() {
        let (status, body) = upload(StubModel::echoing(), "reviews.xlsx", b"not a workbook").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
    }

    #[tokio::test]
    async fn test_missing_file_part() {
        let body = multipart_body(&[Part {
            name: "other",
            filename: Some("reviews.csv"),
            content: b"review\nok\n",
        }]);
        let (status, json_body) = post(
            StubModel::echoing(),
            body,
            &format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body, json!({"error": "No file part in request"}));
    }

    #[tokio::test]
    async fn test_file_field_without_filename_is_not_a_file() {
        let body = multipart_body(&[Part {
            name: "file",
            filename: None,
            content: b"review\nok\n",
        }]);
        let (status, json_body) = post(
            StubModel::echoing(),
            body,
            &format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body, json!({"error": "No file part in request"}));
    }

    #[tokio::test]
    async fn test_non_multipart_request() {
        let (status, body) =
            post(StubModel::echoing(), b"{}".to_vec(), "application/json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No file part in request"}));
    }
}
