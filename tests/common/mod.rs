//! In-process fake of the customer REST backend.

use std::net::TcpListener;
use std::sync::Mutex;

use actix_web::{App, HttpResponse, HttpServer, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    first_name: String,
    last_name: String,
    email: String,
    phone_number: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    id: String,
    #[serde(flatten)]
    payload: Payload,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct Store {
    records: Mutex<Vec<Record>>,
    searches: Mutex<Vec<Option<String>>>,
}

#[derive(Deserialize)]
struct ListQuery {
    search: Option<String>,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "message": "Customer not found", "statusCode": 404 }))
}

fn email_taken(store: &Store, email: &str, except: Option<&str>) -> bool {
    store
        .records
        .lock()
        .unwrap()
        .iter()
        .any(|r| r.payload.email == email && Some(r.id.as_str()) != except)
}

async fn list(store: web::Data<Store>, query: web::Query<ListQuery>) -> HttpResponse {
    store.searches.lock().unwrap().push(query.search.clone());
    let needle = query.search.clone().unwrap_or_default().to_lowercase();
    let records: Vec<Record> = store
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|r| {
            let p = &r.payload;
            needle.is_empty()
                || p.first_name.to_lowercase().contains(&needle)
                || p.last_name.to_lowercase().contains(&needle)
                || p.email.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    HttpResponse::Ok().json(records)
}

async fn create(store: web::Data<Store>, payload: web::Json<Payload>) -> HttpResponse {
    if email_taken(&store, &payload.email, None) {
        return HttpResponse::Conflict()
            .json(json!({ "message": "Email already exists", "statusCode": 409 }));
    }
    let record = Record {
        id: uuid::Uuid::new_v4().to_string(),
        payload: payload.into_inner(),
        created_at: Utc::now(),
    };
    store.records.lock().unwrap().push(record.clone());
    HttpResponse::Created().json(record)
}

async fn show(store: web::Data<Store>, id: web::Path<String>) -> HttpResponse {
    let records = store.records.lock().unwrap();
    match records.iter().find(|r| r.id == *id) {
        Some(record) => HttpResponse::Ok().json(record),
        None => not_found(),
    }
}

async fn update(
    store: web::Data<Store>,
    id: web::Path<String>,
    payload: web::Json<Payload>,
) -> HttpResponse {
    if email_taken(&store, &payload.email, Some(id.as_str())) {
        return HttpResponse::Conflict()
            .json(json!({ "message": "Email already exists", "statusCode": 409 }));
    }
    let mut records = store.records.lock().unwrap();
    match records.iter_mut().find(|r| r.id == *id) {
        Some(record) => {
            record.payload = payload.into_inner();
            HttpResponse::Ok().json(record.clone())
        }
        None => not_found(),
    }
}

async fn remove(store: web::Data<Store>, id: web::Path<String>) -> HttpResponse {
    let mut records = store.records.lock().unwrap();
    let before = records.len();
    records.retain(|r| r.id != *id);
    if records.len() == before {
        return not_found();
    }
    HttpResponse::Ok().finish()
}

pub struct FakeBackend {
    pub base_url: String,
    store: web::Data<Store>,
}

impl FakeBackend {
    /// Starts the backend on an ephemeral port of the current actix system.
    pub fn start() -> Self {
        let store = web::Data::new(Store::default());
        let data = store.clone();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/customer", web::get().to(list))
                .route("/customer", web::post().to(create))
                .route("/customer/{id}", web::get().to(show))
                .route("/customer/{id}", web::put().to(update))
                .route("/customer/{id}", web::delete().to(remove))
        })
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            store,
        }
    }

    /// `search` parameter of every list request, `None` when it was omitted.
    pub fn searches(&self) -> Vec<Option<String>> {
        self.store.searches.lock().unwrap().clone()
    }
}
