#![cfg(feature = "rest")]

use std::collections::{HashMap, VecDeque};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use bloom_garden::{
    Flower, FlowerId, FlowerStore, GardenMsg, GardenRuntime, GardenSession, ImageDataUrl, Notice,
    Phase, RestStore, StoreConfig, StoreError,
};
use bloom_canvas::{PointerInput, SurfaceBounds};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
struct ScriptedResponse {
    status: u16,
    reason: &'static str,
    body: String,
}

impl ScriptedResponse {
    fn json(status: u16, reason: &'static str, body: &Value) -> Self {
        Self {
            status,
            reason,
            body: body.to_string(),
        }
    }

    fn created() -> Self {
        Self {
            status: 201,
            reason: "Created",
            body: String::new(),
        }
    }

    fn text(status: u16, reason: &'static str, body: &str) -> Self {
        Self {
            status,
            reason,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: String,
}

struct ServerHarness {
    url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    stop: Arc<AtomicBool>,
    join_handle: Option<thread::JoinHandle<()>>,
}

impl ServerHarness {
    fn config(&self) -> StoreConfig {
        StoreConfig {
            url: self.url.clone(),
            anon_key: "anon-test-key".to_string(),
            table: "flowers".to_string(),
        }
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request lock").clone()
    }
}

impl Drop for ServerHarness {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = TcpStream::connect(self.url.strip_prefix("http://").unwrap_or_default());
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|window| window == b"\r\n\r\n")
}

fn parse_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut bytes = Vec::new();
    let mut buf = [0_u8; 4096];
    let mut content_length = 0_usize;
    let mut header_end = None;

    stream.set_read_timeout(Some(Duration::from_secs(2))).ok()?;

    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => {
                bytes.extend_from_slice(&buf[..read]);

                if header_end.is_none() {
                    if let Some(pos) = find_header_end(&bytes) {
                        header_end = Some(pos + 4);
                        let header_text = String::from_utf8_lossy(&bytes[..pos]).to_string();
                        for line in header_text.lines() {
                            if let Some((name, value)) = line.split_once(':') {
                                if name.eq_ignore_ascii_case("content-length") {
                                    content_length = value.trim().parse::<usize>().unwrap_or(0);
                                }
                            }
                        }
                    }
                }

                if let Some(end) = header_end {
                    if bytes.len() >= end + content_length {
                        break;
                    }
                }
            }
            Err(error)
                if error.kind() == std::io::ErrorKind::WouldBlock
                    || error.kind() == std::io::ErrorKind::TimedOut =>
            {
                break;
            }
            Err(_) => return None,
        }
    }

    let end = header_end?;
    if bytes.len() < end + content_length {
        return None;
    }

    let header_text = String::from_utf8_lossy(&bytes[..end]).to_string();
    let mut lines = header_text.lines();
    let request_line = lines.next()?.to_string();
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next().unwrap_or("/").to_string();

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let body = String::from_utf8_lossy(&bytes[end..end + content_length]).to_string();
    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

fn write_response(stream: &mut TcpStream, response: &ScriptedResponse) {
    let payload = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        response.reason,
        response.body.len(),
        response.body
    );
    let _ = stream.write_all(payload.as_bytes());
    let _ = stream.flush();
}

/// Serve `responses` in order; the last one repeats.
fn start_scripted_server(responses: Vec<ScriptedResponse>) -> ServerHarness {
    assert!(!responses.is_empty(), "script at least one response");

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    listener
        .set_nonblocking(true)
        .expect("set nonblocking listener");

    let url = format!("http://{}", listener.local_addr().expect("local addr"));
    let stop = Arc::new(AtomicBool::new(false));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let queue = Arc::new(Mutex::new(VecDeque::from(responses)));

    let stop_clone = Arc::clone(&stop);
    let requests_clone = Arc::clone(&requests);

    let join_handle = thread::spawn(move || {
        loop {
            if stop_clone.load(Ordering::SeqCst) {
                break;
            }

            match listener.accept() {
                Ok((mut stream, _addr)) => {
                    let _ = stream.set_nonblocking(false);
                    if let Some(request) = parse_request(&mut stream) {
                        let response = {
                            let mut guard = queue.lock().expect("queue lock");
                            if guard.len() > 1 {
                                guard.pop_front().expect("queued response")
                            } else {
                                guard.front().expect("fallback response").clone()
                            }
                        };
                        requests_clone.lock().expect("request lock").push(request);
                        write_response(&mut stream, &response);
                    }
                }
                Err(error) if error.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    ServerHarness {
        url,
        requests,
        stop,
        join_handle: Some(join_handle),
    }
}

fn row(id: &str, date: &str) -> Value {
    json!({
        "id": id,
        "data_url": "data:image/png;base64,AAAA",
        "x": 40.0,
        "y": 20.0,
        "size": 0.25,
        "date": date,
    })
}

fn sample_flower() -> Flower {
    Flower {
        id: FlowerId::from("m7abc12345678"),
        image: ImageDataUrl::from("data:image/png;base64,AAAA".to_string()),
        x: 12.5,
        y: 33.0,
        scale: 0.5,
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
    }
}

#[test]
fn load_all_requests_ordered_rows_with_credentials() {
    let server = start_scripted_server(vec![ScriptedResponse::json(
        200,
        "OK",
        &json!([
            row("a", "2025-03-01T09:00:00+00:00"),
            row("b", "2025-03-02T09:00:00+00:00"),
        ]),
    )]);
    let mut store = RestStore::new(&server.config()).expect("client");

    let flowers = store.load_all().expect("load");
    let ids: Vec<&str> = flowers.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/rest/v1/flowers?select=*&order=date.asc");
    assert_eq!(request.headers.get("apikey").map(String::as_str), Some("anon-test-key"));
    assert_eq!(
        request.headers.get("authorization").map(String::as_str),
        Some("Bearer anon-test-key")
    );
}

#[test]
fn insert_posts_a_single_row_array() {
    let server = start_scripted_server(vec![ScriptedResponse::created()]);
    let mut store = RestStore::new(&server.config()).expect("client");

    store.insert(&sample_flower()).expect("insert");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/rest/v1/flowers");
    assert_eq!(
        request.headers.get("prefer").map(String::as_str),
        Some("return=minimal")
    );
    let body: Value = serde_json::from_str(&request.body).expect("json body");
    assert_eq!(
        body,
        json!([{
            "id": "m7abc12345678",
            "data_url": "data:image/png;base64,AAAA",
            "x": 12.5,
            "y": 33.0,
            "size": 0.5,
            "date": "2025-03-01T09:00:00Z",
        }])
    );
}

#[test]
fn postgrest_rejection_carries_message() {
    let server = start_scripted_server(vec![ScriptedResponse::json(
        400,
        "Bad Request",
        &json!({
            "code": "PGRST204",
            "details": null,
            "hint": null,
            "message": "column not found",
        }),
    )]);
    let mut store = RestStore::new(&server.config()).expect("client");

    let err = store.insert(&sample_flower()).unwrap_err();
    assert_eq!(err, StoreError::rejected(400, "column not found"));
}

#[test]
fn malformed_rows_are_decode_errors() {
    let server = start_scripted_server(vec![ScriptedResponse::text(200, "OK", "{\"not\":\"rows\"}")]);
    let mut store = RestStore::new(&server.config()).expect("client");

    assert!(matches!(store.load_all(), Err(StoreError::Decode(_))));
}

#[test]
fn unreachable_store_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let mut store = RestStore::new(&StoreConfig {
        url: format!("http://{addr}"),
        anon_key: "anon".into(),
        table: "flowers".into(),
    })
    .expect("client");
    assert!(matches!(store.load_all(), Err(StoreError::Transport(_))));
}

#[test]
fn runtime_publishes_through_rest_and_reports_rejection() {
    let server = start_scripted_server(vec![
        ScriptedResponse::json(200, "OK", &json!([])),
        ScriptedResponse::json(400, "Bad Request", &json!({ "message": "column not found" })),
    ]);
    let store = RestStore::new(&server.config()).expect("client");
    let mut runtime = GardenRuntime::new(GardenSession::new(SmallRng::seed_from_u64(9)), store);
    let bounds = SurfaceBounds::new(0.0, 0.0, 200.0, 200.0);

    runtime.start();
    runtime.dispatch(GardenMsg::OpenDrawing);
    runtime.dispatch(GardenMsg::PointerDown(PointerInput::mouse(100.0, 100.0), bounds));
    runtime.dispatch(GardenMsg::PointerUp);
    runtime.dispatch(GardenMsg::Publish {
        now: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
    });

    let session = runtime.session();
    assert!(session.flowers().is_empty());
    assert_eq!(session.phase(), Phase::Drawing);
    match session.notice() {
        Some(Notice::PublishFailed(message)) => {
            assert!(message.contains("column not found"), "{message}");
        }
        other => panic!("unexpected notice {other:?}"),
    }
    let methods: Vec<String> = server.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec!["GET".to_string(), "POST".to_string()]);
}
