//! End-to-end tests against a live server.

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{start_server, test_config};

fn png_part(name: &str, len: usize) -> Part {
    Part::bytes(vec![0x89; len])
        .file_name(name.to_string())
        .mime_str("image/png")
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let server = start_server(test_config()).await;

    let res = server.client.get(server.url("/api/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "development");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["services"]["storage"], "operational");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let server = start_server(test_config()).await;

    for res in [
        server.client.get(server.url("/api/health")).send().await.unwrap(),
        server.client.post(server.url("/api/process")).body("{}").send().await.unwrap(),
    ] {
        let headers = res.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-xss-protection"], "1; mode=block");
        assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
        assert_eq!(
            headers["permissions-policy"],
            "camera=(), microphone=(), geolocation=(), payment=()"
        );
        assert!(headers["content-security-policy"]
            .to_str()
            .unwrap()
            .starts_with("default-src 'self'"));
        assert_eq!(headers["access-control-allow-origin"], "http://localhost:3000");
    }
}

#[tokio::test]
async fn test_cors_preflight() {
    let server = start_server(test_config()).await;

    let res = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/api/process"))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "http://localhost:3000");
    let methods: Vec<String> = res.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .split(',')
        .map(|m| m.trim().to_ascii_uppercase())
        .collect();
    assert_eq!(methods, ["GET", "POST", "PUT", "DELETE", "OPTIONS"]);
    assert_eq!(res.headers()["access-control-max-age"], "86400");
}

#[tokio::test]
async fn test_upload_accepts_png() {
    let server = start_server(test_config()).await;

    let form = Form::new().part("file", png_part("Back Scan.PNG", 2048));
    let res = server
        .client
        .post(server.url("/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-ratelimit-limit"], "100");
    assert_eq!(res.headers()["x-ratelimit-remaining"], "99");

    let body: Value = res.json().await.unwrap();
    let id = body["id"].as_str().unwrap();
    assert!(id.starts_with("file_"));
    assert_eq!(body["url"], format!("/uploads/{id}.png"));
    assert_eq!(body["filename"], "back_scan.png");
    assert_eq!(body["size"], 2048);
    assert_eq!(body["type"], "image/png");
    assert_eq!(body["bucket"], "default");
    assert!(body["uploadedAt"].is_string());
}

#[tokio::test]
async fn test_upload_with_bucket() {
    let server = start_server(test_config()).await;

    let form = Form::new()
        .part("file", png_part("scan.png", 16))
        .text("bucket", "patient-scans");
    let res = server
        .client
        .post(server.url("/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["bucket"], "patient-scans");
}

#[tokio::test]
async fn test_upload_rejects_text_file() {
    let server = start_server(test_config()).await;

    let part = Part::bytes(b"hello".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")
        .unwrap();
    let res = server
        .client
        .post(server.url("/api/upload"))
        .multipart(Form::new().part("file", part))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("JPEG"));
}

#[tokio::test]
async fn test_upload_rejects_suspicious_name() {
    let server = start_server(test_config()).await;

    let res = server
        .client
        .post(server.url("/api/upload"))
        .multipart(Form::new().part("file", png_part("../etc/passwd.png", 16)))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid file name detected");
}

#[tokio::test]
async fn test_upload_without_file() {
    let server = start_server(test_config()).await;

    let res = server
        .client
        .post(server.url("/api/upload"))
        .multipart(Form::new().text("bucket", "scans"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "No file provided");
}

#[tokio::test]
async fn test_process_returns_mock_result() {
    let server = start_server(test_config()).await;

    let res = server
        .client
        .post(server.url("/api/process"))
        .json(&json!({
            "fileId": "file_1700000000000_abc123xyz",
            "edits": [
                { "region": "spine", "effect": "straighten", "intensity": 0.7 },
                { "region": "shoulders", "effect": "level", "intensity": -0.2 }
            ],
            "options": { "generate3D": true }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["before_after"]["before"], "/sample/before.png");
    assert_eq!(body["before_after"]["after"], "/sample/after.png");
    assert_eq!(body["edits"].as_array().unwrap().len(), 2);
    assert_eq!(body["edits"][1]["region"], "shoulders");
    assert!(body["edits"][0]["timestamp"].is_string());
    assert_eq!(body["metadata"]["enhancement_type"], "posture_correction");
    assert!(body["artifact"].as_str().unwrap().ends_with(".glb"));
    assert!(body.get("report").is_none());
}

#[tokio::test]
async fn test_process_requires_file_id() {
    let server = start_server(test_config()).await;

    let res = server
        .client
        .post(server.url("/api/process"))
        .json(&json!({
            "edits": [{ "region": "spine", "effect": "straighten", "intensity": 0.5 }]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "File ID is required");
}

#[tokio::test]
async fn test_process_rejects_malformed_json() {
    let server = start_server(test_config()).await;

    let res = server
        .client
        .post(server.url("/api/process"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid processing request");
}

#[tokio::test]
async fn test_validate_region_endpoint() {
    let server = start_server(test_config()).await;

    let ok = server
        .client
        .post(server.url("/api/validate/region"))
        .json(&json!({ "name": "Lower Back (left)", "type": "posture" }))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(ok.json::<Value>().await.unwrap(), json!({ "success": true }));

    let empty = server
        .client
        .post(server.url("/api/validate/region"))
        .json(&json!({ "name": "   ", "type": "posture" }))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        empty.json::<Value>().await.unwrap(),
        json!({ "success": false, "error": "Region name is required" })
    );
}

#[tokio::test]
async fn test_sanitize_endpoint() {
    let server = start_server(test_config()).await;

    let res = server
        .client
        .post(server.url("/api/sanitize"))
        .json(&json!({
            "fileName": "__My Photo (1).JPG",
            "text": "  <script>javascript:alert(1)</script> onclick=x "
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["fileName"], "my_photo_1_.jpg");
    assert_eq!(body["text"], "scriptalert(1)/script x");
    assert!(body.get("regionName").is_none());
}

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let mut config = test_config();
    config.rate_limit.max_requests = 3;
    let server = start_server(config).await;

    let body = json!({ "name": "Jaw", "type": "cosmetic" });
    for expected_remaining in ["2", "1", "0"] {
        let res = server
            .client
            .post(server.url("/api/validate/region"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["x-ratelimit-remaining"], expected_remaining);
    }

    let res = server
        .client
        .post(server.url("/api/validate/region"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.headers()["retry-after"], "900");
    assert_eq!(res.headers()["x-frame-options"], "DENY");
    let error: Value = res.json().await.unwrap();
    assert_eq!(error["error"], "Too many requests, please try again later");

    // A different client has its own window.
    let other = server
        .client
        .post(server.url("/api/validate/region"))
        .header("x-forwarded-for", "203.0.113.7")
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::OK);

    // Health checks are never limited.
    let health = server.client.get(server.url("/api/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_oversized_json_body_rejected() {
    let mut config = test_config();
    config.security.max_json_body_bytes = 64;
    let server = start_server(config).await;

    let res = server
        .client
        .post(server.url("/api/sanitize"))
        .header("content-type", "application/json")
        .body(format!(r#"{{"text":"{}"}}"#, "a".repeat(200)))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let mut config = test_config();
    config.security.max_upload_body_bytes = 1024;
    let server = start_server(config).await;

    let form = Form::new().part("file", png_part("scan.png", 4096));
    let res = server
        .client
        .post(server.url("/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

    // The JSON routes keep their own limit.
    let ok = server
        .client
        .post(server.url("/api/sanitize"))
        .header("content-type", "application/json")
        .body(r#"{"text":"hello"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
}
