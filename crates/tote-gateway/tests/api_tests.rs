use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, stream};
use reqwest::{Client, StatusCode, multipart};
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;
use tote_gateway::handlers::{ListObjectsResponse, MessageResponse};
use tote_gateway::{AppState, GatewayConfig, routes};
use tote_store::{MemoryObjectStore, ObjectStore, StoreError, StoredObject};

// Helper to spawn a server on a random port
async fn spawn_server(store: Arc<dyn ObjectStore>) -> String {
    let mut config = GatewayConfig::default();
    config.host = "127.0.0.1".to_string();
    config.port = 0;
    config.use_memory_store = true;

    let state = Arc::new(AppState::with_store(config, store));
    let app = routes::create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn spawn_memory_server() -> String {
    spawn_server(Arc::new(MemoryObjectStore::new())).await
}

async fn upload(client: &Client, base_url: &str, filename: &str, data: Vec<u8>) -> reqwest::Response {
    let part = multipart::Part::bytes(data)
        .file_name(filename.to_string())
        .mime_str("application/octet-stream")
        .unwrap();
    let form = multipart::Form::new().part("file", part);
    client
        .post(format!("{}/upload", base_url))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

/// Store whose every operation fails
struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn put_object(&self, _key: &str, _data: Bytes, _content_type: Option<&str>) -> tote_store::Result<()> {
        Err(StoreError::Backend("simulated outage".to_string()))
    }

    async fn get_object(&self, _key: &str) -> tote_store::Result<StoredObject> {
        Err(StoreError::Backend("simulated outage".to_string()))
    }

    async fn list_objects(&self) -> tote_store::Result<Vec<String>> {
        Err(StoreError::Backend("simulated outage".to_string()))
    }

    async fn delete_object(&self, _key: &str) -> tote_store::Result<()> {
        Err(StoreError::Backend("simulated outage".to_string()))
    }
}

/// Memory store that counts calls reaching it
#[derive(Default)]
struct CountingStore {
    inner: MemoryObjectStore,
    calls: AtomicUsize,
}

#[async_trait]
impl ObjectStore for CountingStore {
    async fn put_object(&self, key: &str, data: Bytes, content_type: Option<&str>) -> tote_store::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.put_object(key, data, content_type).await
    }

    async fn get_object(&self, key: &str) -> tote_store::Result<StoredObject> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_object(key).await
    }

    async fn list_objects(&self) -> tote_store::Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_objects().await
    }

    async fn delete_object(&self, key: &str) -> tote_store::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_object(key).await
    }
}

/// Store whose downloads fail after the first chunk
struct BrokenStreamStore;

#[async_trait]
impl ObjectStore for BrokenStreamStore {
    async fn put_object(&self, _key: &str, _data: Bytes, _content_type: Option<&str>) -> tote_store::Result<()> {
        Ok(())
    }

    async fn get_object(&self, _key: &str) -> tote_store::Result<StoredObject> {
        let chunks: Vec<tote_store::Result<Bytes>> = vec![
            Ok(Bytes::from(vec![0xAB; 1024])),
            Err(StoreError::Backend("connection reset by peer".to_string())),
        ];
        Ok(StoredObject {
            content_type: Some("application/octet-stream".to_string()),
            content_length: None,
            body: stream::iter(chunks).boxed(),
        })
    }

    async fn list_objects(&self) -> tote_store::Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn delete_object(&self, _key: &str) -> tote_store::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_object_lifecycle() {
    let base_url = spawn_memory_server().await;
    let client = Client::new();
    let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    // 1. Upload
    let res = upload(&client, &base_url, "report.bin", payload.clone()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: MessageResponse = res.json().await.unwrap();
    assert_eq!(body.message, "File uploaded successfully");

    // 2. Download returns the same bytes
    let res = client
        .get(format!("{}/download/report.bin", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-disposition").unwrap(),
        "attachment; filename=report.bin"
    );
    assert_eq!(res.headers().get("content-type").unwrap(), "application/octet-stream");
    assert_eq!(res.bytes().await.unwrap().as_ref(), payload.as_slice());

    // 3. Delete
    let res = client
        .delete(format!("{}/delete/report.bin", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: MessageResponse = res.json().await.unwrap();
    assert_eq!(body.message, "File report.bin deleted successfully");

    // 4. Download after delete fails
    let res = client
        .get(format!("{}/download/report.bin", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_upload_overwrites_existing_key() {
    let base_url = spawn_memory_server().await;
    let client = Client::new();

    upload(&client, &base_url, "notes.txt", b"first".to_vec()).await;
    upload(&client, &base_url, "notes.txt", b"second".to_vec()).await;

    let res = client
        .get(format!("{}/download/notes.txt", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"second");
}

#[tokio::test]
async fn test_download_without_stored_content_type() {
    let store = Arc::new(MemoryObjectStore::new());
    store
        .put_object("raw", Bytes::from_static(b"raw bytes"), None)
        .await
        .unwrap();
    let base_url = spawn_server(store).await;

    let res = Client::new()
        .get(format!("{}/download/raw", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("content-type").unwrap(), "");
    assert_eq!(res.headers().get("content-length").unwrap(), "9");
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"raw bytes");
}

#[tokio::test]
async fn test_list_objects() {
    let base_url = spawn_memory_server().await;
    let client = Client::new();

    for key in ["a", "b", "c"] {
        let res = upload(&client, &base_url, key, key.as_bytes().to_vec()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client.get(format!("{}/list", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: ListObjectsResponse = res.json().await.unwrap();
    let mut objects = body.objects;
    objects.sort();
    assert_eq!(objects, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_list_empty_bucket() {
    let base_url = spawn_memory_server().await;

    let res = Client::new().get(format!("{}/list", base_url)).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "objects": [] }));
}

#[tokio::test]
async fn test_delete_missing_key_succeeds() {
    let base_url = spawn_memory_server().await;

    let res = Client::new()
        .delete(format!("{}/delete/never-existed", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let store = Arc::new(CountingStore::default());
    let base_url = spawn_server(store.clone()).await;
    let client = Client::new();

    // Multipart form with the wrong field name
    let form = multipart::Form::new().text("document", "not a file");
    let res = client
        .post(format!("{}/upload", base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("file"));

    // Not a multipart request at all
    let res = client
        .post(format!("{}/upload", base_url))
        .body("plain body")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].is_string());

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_field_without_filename_is_rejected() {
    let store = Arc::new(CountingStore::default());
    let base_url = spawn_server(store.clone()).await;

    let form = multipart::Form::new().part("file", multipart::Part::bytes(b"data".to_vec()));
    let res = Client::new()
        .post(format!("{}/upload", base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrent_uploads_last_write_wins() {
    let base_url = spawn_memory_server().await;
    let client = Client::new();
    let payload_a = vec![b'a'; 256 * 1024];
    let payload_b = vec![b'b'; 256 * 1024];

    let (ra, rb) = tokio::join!(
        upload(&client, &base_url, "race.bin", payload_a.clone()),
        upload(&client, &base_url, "race.bin", payload_b.clone()),
    );
    assert_eq!(ra.status(), StatusCode::OK);
    assert_eq!(rb.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/download/race.bin", base_url))
        .send()
        .await
        .unwrap();
    let data = res.bytes().await.unwrap();
    assert!(data.as_ref() == payload_a.as_slice() || data.as_ref() == payload_b.as_slice());
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Upload,
    Download,
    List,
    Delete,
}

#[rstest]
#[case::upload(Operation::Upload)]
#[case::download(Operation::Download)]
#[case::list(Operation::List)]
#[case::delete(Operation::Delete)]
#[tokio::test]
async fn test_store_failure_returns_500(#[case] operation: Operation) {
    let base_url = spawn_server(Arc::new(FailingStore)).await;
    let client = Client::new();

    let res = match operation {
        Operation::Upload => upload(&client, &base_url, "x", b"x".to_vec()).await,
        Operation::Download => client.get(format!("{}/download/x", base_url)).send().await.unwrap(),
        Operation::List => client.get(format!("{}/list", base_url)).send().await.unwrap(),
        Operation::Delete => client.delete(format!("{}/delete/x", base_url)).send().await.unwrap(),
    };
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "simulated outage");

    // The server keeps serving after the failure
    let res = client.get(format!("{}/health", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_broken_download_stream_is_truncated() {
    let base_url = spawn_server(Arc::new(BrokenStreamStore)).await;
    let client = Client::new();

    let res = client
        .get(format!("{}/download/flaky.bin", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Either the transfer aborts or the body is cut short; an error payload
    // is never appended to the binary data.
    if let Ok(body) = res.bytes().await {
        assert!(body.len() <= 1024);
        assert!(body.iter().all(|b| *b == 0xAB));
    }

    let res = client.get(format!("{}/health", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_and_request_id_headers() {
    let base_url = spawn_memory_server().await;

    let res = Client::new()
        .get(format!("{}/list", base_url))
        .header("Origin", "https://example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("access-control-allow-origin").unwrap(), "*");
    let request_id = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_health_check() {
    let base_url = spawn_memory_server().await;
    let client = Client::new();

    let res = client.get(format!("{}/health", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "OK");

    let res = client.head(format!("{}/health", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
