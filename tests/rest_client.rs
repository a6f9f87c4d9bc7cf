//! Drives the blocking REST client against a small axum server that answers
//! the way the school records backend does: `null` for an empty list, 204 for
//! updates and 500 for unknown ids.

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use reqwest::Url;
use serde_json::{json, Value};

use school_records_admin::api::{
    create_record, delete_record, fetch_all, fetch_one, reference_exists, update_record,
    ApiError, RestClient,
};
use school_records_admin::models::{Collection, Professor, Student};

#[derive(Default)]
struct Store {
    students: Vec<Value>,
    requests: Vec<(String, Option<Value>)>,
    next_id: u64,
}

type Shared = Arc<Mutex<Store>>;

async fn list_students(State(store): State<Shared>) -> Json<Value> {
    let mut store = store.lock().unwrap();
    store.requests.push(("GET /students".into(), None));
    if store.students.is_empty() {
        Json(Value::Null)
    } else {
        Json(Value::Array(store.students.clone()))
    }
}

async fn create_student(
    State(store): State<Shared>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut store = store.lock().unwrap();
    store
        .requests
        .push(("POST /students".into(), Some(body.clone())));
    store.next_id += 1;
    body["id"] = json!(format!("s-{}", store.next_id));
    body["createdAt"] = json!("2024-05-01T09:00:00Z");
    store.students.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn get_student(
    State(store): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = store.lock().unwrap();
    store.requests.push((format!("GET /students/{id}"), None));
    store
        .students
        .iter()
        .find(|row| row["id"] == json!(id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn update_student(
    State(store): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    let mut store = store.lock().unwrap();
    store
        .requests
        .push((format!("PUT /students/{id}"), Some(body.clone())));
    let Some(row) = store.students.iter_mut().find(|row| row["id"] == json!(id)) else {
        return StatusCode::INTERNAL_SERVER_ERROR;
    };
    if let (Some(target), Some(changes)) = (row.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    StatusCode::NO_CONTENT
}

async fn delete_student(State(store): State<Shared>, Path(id): Path<String>) -> StatusCode {
    let mut store = store.lock().unwrap();
    store.requests.push((format!("DELETE /students/{id}"), None));
    store.students.retain(|row| row["id"] != json!(id));
    StatusCode::NO_CONTENT
}

async fn broken_list() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database is down")
}

fn spawn_server(store: Shared) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    let router = Router::new()
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/professors", get(broken_list))
        .with_state(store);

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });

    Url::parse(&format!("http://{addr}")).unwrap()
}

fn client_for(store: &Shared) -> RestClient {
    RestClient::new(spawn_server(Arc::clone(store)), Duration::from_secs(5)).unwrap()
}

fn ana() -> Student {
    Student {
        first_name: Some("Ana".into()),
        last_name: Some("Ionescu".into()),
        birth_date: Some("2001-01-01".into()),
        address: Some("Str. X".into()),
        email: Some("a@b.com".into()),
        phone: Some("0700000000".into()),
        ..Default::default()
    }
}

#[test]
fn create_posts_the_draft_and_list_returns_it() {
    let store = Shared::default();
    let client = client_for(&store);

    assert!(fetch_all::<Student>(&client).unwrap().is_empty());
    create_record(&client, &ana()).unwrap();
    let students = fetch_all::<Student>(&client).unwrap();

    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, "s-1");
    assert_eq!(students[0].last_name.as_deref(), Some("Ionescu"));
    assert!(students[0].created_at.is_some());

    let store = store.lock().unwrap();
    assert_eq!(
        store.requests[1],
        (
            "POST /students".to_string(),
            Some(json!({
                "firstName": "Ana",
                "lastName": "Ionescu",
                "birthDate": "2001-01-01",
                "address": "Str. X",
                "email": "a@b.com",
                "phone": "0700000000"
            }))
        )
    );
}

#[test]
fn update_accepts_an_empty_no_content_reply() {
    let store = Shared::default();
    let client = client_for(&store);
    create_record(&client, &ana()).unwrap();

    let mut student = fetch_one::<Student>(&client, "s-1").unwrap().unwrap();
    student.phone = Some("0711111111".into());
    update_record(&client, &student).unwrap();

    let reloaded = fetch_one::<Student>(&client, "s-1").unwrap().unwrap();
    assert_eq!(reloaded.phone.as_deref(), Some("0711111111"));
    let store = store.lock().unwrap();
    let (line, body) = &store.requests[2];
    assert_eq!(line, "PUT /students/s-1");
    assert!(body.as_ref().unwrap().get("createdAt").is_none());
}

#[test]
fn delete_removes_the_row() {
    let store = Shared::default();
    let client = client_for(&store);
    create_record(&client, &ana()).unwrap();

    delete_record::<Student>(&client, "s-1").unwrap();

    assert!(fetch_all::<Student>(&client).unwrap().is_empty());
}

#[test]
fn unknown_id_is_a_rejection_not_a_crash() {
    let store = Shared::default();
    let client = client_for(&store);

    let err = fetch_one::<Student>(&client, "missing").unwrap_err();
    assert!(err.is_rejection());
    assert!(!reference_exists(&client, Collection::Students, "missing").unwrap());

    create_record(&client, &ana()).unwrap();
    assert!(reference_exists(&client, Collection::Students, "s-1").unwrap());
}

#[test]
fn server_errors_surface_status_and_body() {
    let store = Shared::default();
    let client = client_for(&store);

    match fetch_all::<Professor>(&client) {
        Err(ApiError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "database is down");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let addr = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let client = RestClient::new(base, Duration::from_secs(2)).unwrap();

    let err = fetch_all::<Student>(&client).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!err.is_rejection());
    assert!(reference_exists(&client, Collection::Students, "s-1").is_err());
}
