//! In-process stand-in for the REST backend.
//!
//! Collections are held as JSON so the mock never has to agree with the
//! front ends on anything but the wire format. Every request is logged as
//! `"METHOD /path"`, and any such key can be made to fail.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Password every seeded account accepts.
pub const PASSWORD: &str = "correct horse battery";
/// Seeded administrator.
pub const ADMIN_EMAIL: &str = "admin@example.com";
/// Seeded customer, refused by the admin panel.
pub const CUSTOMER_EMAIL: &str = "shopper@example.com";

const FIRST_GENERATED_ID: u64 = 1000;

#[derive(Default)]
struct Store {
    collections: HashMap<&'static str, Vec<Value>>,
    next_id: u64,
    requests: Vec<String>,
    failures: HashMap<String, (StatusCode, Value)>,
}

/// Handle to a running mock backend.
#[derive(Clone)]
pub struct MockBackend {
    store: Arc<Mutex<Store>>,
    addr: SocketAddr,
}

impl MockBackend {
    /// Bind to a random local port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");

        let backend = Self {
            store: Arc::new(Mutex::new(Store {
                next_id: FIRST_GENERATED_ID,
                ..Store::default()
            })),
            addr,
        };

        let app = routes()
            .layer(middleware::from_fn_with_state(backend.clone(), record))
            .with_state(backend.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend server");
        });

        backend
    }

    /// Root URL the front ends are pointed at.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/api/", self.addr)).expect("mock backend url")
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Replace a collection's contents.
    pub fn seed(&self, collection: &'static str, items: Vec<Value>) {
        self.lock().collections.insert(collection, items);
    }

    /// Current contents of a collection.
    #[must_use]
    pub fn items(&self, collection: &'static str) -> Vec<Value> {
        self.lock()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every request matching `route` (e.g. `"PUT /sliders/reorder"`)
    /// answer with `status` and `{"message": message}`.
    pub fn fail(&self, route: &str, status: StatusCode, message: &str) {
        self.fail_with(route, status, json!({ "message": message }));
    }

    /// Like [`MockBackend::fail`] with a custom body.
    pub fn fail_with(&self, route: &str, status: StatusCode, body: Value) {
        self.lock()
            .failures
            .insert(route.to_string(), (status, body));
    }

    /// Stop failing `route`.
    pub fn recover(&self, route: &str) {
        self.lock().failures.remove(route);
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// How often `route` was requested.
    #[must_use]
    pub fn count(&self, route: &str) -> usize {
        self.lock().requests.iter().filter(|r| *r == route).count()
    }

    /// Forget the request log.
    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    fn list(&self, collection: &'static str) -> Vec<Value> {
        self.items(collection)
    }

    fn find(&self, collection: &'static str, id: u64) -> Option<Value> {
        self.lock()
            .collections
            .get(collection)?
            .iter()
            .find(|item| item_id(item) == Some(id))
            .cloned()
    }

    fn insert(&self, collection: &'static str, mut fields: Map<String, Value>) -> Value {
        let mut store = self.lock();
        store.next_id += 1;
        fields.insert("id".to_string(), json!(store.next_id));
        let item = Value::Object(fields);
        store
            .collections
            .entry(collection)
            .or_default()
            .push(item.clone());
        item
    }

    fn update(&self, collection: &'static str, id: u64, fields: Map<String, Value>) -> Response {
        let mut store = self.lock();
        let item = store
            .collections
            .get_mut(collection)
            .and_then(|items| items.iter_mut().find(|item| item_id(item) == Some(id)));
        match item {
            Some(Value::Object(existing)) => {
                existing.extend(fields);
                Json(Value::Object(existing.clone())).into_response()
            }
            _ => not_found(),
        }
    }

    fn remove(&self, collection: &'static str, id: u64) -> Response {
        let mut store = self.lock();
        let Some(items) = store.collections.get_mut(collection) else {
            return not_found();
        };
        let before = items.len();
        items.retain(|item| item_id(item) != Some(id));
        if items.len() == before {
            return not_found();
        }
        StatusCode::NO_CONTENT.into_response()
    }
}

/// The signed-in customer as `GET /profile` reports it.
fn customer() -> Value {
    json!({
        "id": 2,
        "name": "Sam Shopper",
        "email": CUSTOMER_EMAIL,
        "role": "customer",
    })
}

fn item_id(item: &Value) -> Option<u64> {
    item.get("id").and_then(Value::as_u64)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" }))).into_response()
}

fn invalid(field: &str, message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "message": message, "errors": { field: [message] } })),
    )
        .into_response()
}

/// Status flags arrive as JSON booleans or as "1"/"0"/"true"/"false" text.
fn parse_status(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.as_str(), "1" | "true" | "on"),
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        _ => false,
    }
}

/// Store `status` as a boolean whatever form it arrived in.
fn normalise(mut fields: Map<String, Value>) -> Map<String, Value> {
    let status = parse_status(fields.get("status"));
    fields.insert("status".to_string(), Value::Bool(status));
    fields
}

async fn record(State(backend): State<MockBackend>, request: Request, next: Next) -> Response {
    let path = request
        .uri()
        .path()
        .strip_prefix("/api")
        .unwrap_or(request.uri().path())
        .to_string();
    let key = format!("{} {}", request.method(), path);

    let failure = {
        let mut store = backend.lock();
        store.requests.push(key.clone());
        store.failures.get(&key).cloned()
    };
    if let Some((status, body)) = failure {
        return (status, Json(body)).into_response();
    }
    next.run(request).await
}

fn routes() -> Router<MockBackend> {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/attributes", get(list_attributes).post(create_attribute))
        .route(
            "/attributes/{id}",
            get(get_attribute).put(update_attribute).delete(delete_attribute),
        )
        .route(
            "/attributes/{id}/values",
            get(list_values).post(create_value),
        )
        .route(
            "/attribute-values/{id}",
            put(update_value).delete(delete_value),
        )
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", get(get_category).delete(delete_category))
        .route("/sliders", get(list_sliders))
        .route("/sliders/reorder", put(reorder_sliders))
        .route("/products/search", get(search_products))
        .route("/cart", get(get_cart).post(add_to_cart))
        .route("/wishlist", get(list_wishlist).post(add_to_wishlist))
        .route("/wishlist/{product_id}", delete(remove_from_wishlist))
        .route(
            "/products/{id}/reviews",
            get(list_reviews).post(create_review),
        )
        .route("/reviews/{id}", put(update_review).delete(delete_review))
        .route("/reviews/{id}/helpful", post(toggle_helpful))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/password", put(change_password))
        .route(
            "/profile/picture",
            post(upload_picture).delete(delete_picture),
        )
        .route("/contact-messages", post(create_contact_message));

    Router::new().nest("/api", api)
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(Json(credentials): Json<Credentials>) -> Response {
    let role = match credentials.email.as_str() {
        ADMIN_EMAIL => "admin",
        CUSTOMER_EMAIL => "customer",
        _ => return (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response(),
    };
    if credentials.password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }

    let id = if role == "admin" { 1 } else { 2 };
    Json(json!({
        "token": format!("token-{id}"),
        "user": {
            "id": id,
            "name": if role == "admin" { "Ada Admin" } else { "Sam Shopper" },
            "email": credentials.email,
            "role": role,
        }
    }))
    .into_response()
}

async fn list_attributes(State(backend): State<MockBackend>) -> Json<Vec<Value>> {
    Json(backend.list("attributes"))
}

async fn get_attribute(State(backend): State<MockBackend>, Path(id): Path<u64>) -> Response {
    backend
        .find("attributes", id)
        .map_or_else(not_found, |item| Json(item).into_response())
}

async fn create_attribute(
    State(backend): State<MockBackend>,
    Json(fields): Json<Map<String, Value>>,
) -> Response {
    let fields = normalise(fields);
    let duplicate = backend
        .list("attributes")
        .iter()
        .any(|a| a.get("name") == fields.get("name"));
    if duplicate {
        return invalid("name", "The name has already been taken.");
    }
    (
        StatusCode::CREATED,
        Json(backend.insert("attributes", fields)),
    )
        .into_response()
}

async fn update_attribute(
    State(backend): State<MockBackend>,
    Path(id): Path<u64>,
    Json(fields): Json<Map<String, Value>>,
) -> Response {
    backend.update("attributes", id, normalise(fields))
}

async fn delete_attribute(State(backend): State<MockBackend>, Path(id): Path<u64>) -> Response {
    backend.remove("attributes", id)
}

async fn list_values(State(backend): State<MockBackend>, Path(id): Path<u64>) -> Json<Vec<Value>> {
    Json(
        backend
            .list("attribute-values")
            .into_iter()
            .filter(|v| v.get("attribute_id").and_then(Value::as_u64) == Some(id))
            .collect(),
    )
}

async fn create_value(
    State(backend): State<MockBackend>,
    Path(id): Path<u64>,
    Json(fields): Json<Map<String, Value>>,
) -> Response {
    let mut fields = normalise(fields);
    fields.insert("attribute_id".to_string(), json!(id));
    (
        StatusCode::CREATED,
        Json(backend.insert("attribute-values", fields)),
    )
        .into_response()
}

async fn update_value(
    State(backend): State<MockBackend>,
    Path(id): Path<u64>,
    Json(fields): Json<Map<String, Value>>,
) -> Response {
    backend.update("attribute-values", id, normalise(fields))
}

async fn delete_value(State(backend): State<MockBackend>, Path(id): Path<u64>) -> Response {
    backend.remove("attribute-values", id)
}

async fn list_categories(State(backend): State<MockBackend>) -> Json<Vec<Value>> {
    Json(backend.list("categories"))
}

async fn get_category(State(backend): State<MockBackend>, Path(id): Path<u64>) -> Response {
    backend
        .find("categories", id)
        .map_or_else(not_found, |item| Json(item).into_response())
}

/// Multipart create. Uploaded files are stored by name under `/uploads`.
async fn create_category(State(backend): State<MockBackend>, mut multipart: Multipart) -> Response {
    let mut fields = Map::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name().map(str::to_string) {
            fields.insert(name, json!(format!("uploads/{file_name}")));
            continue;
        }
        let text = field.text().await.unwrap_or_default();
        fields.insert(name, Value::String(text));
    }

    let fields = normalise(fields);
    if fields
        .get("name")
        .and_then(Value::as_str)
        .is_none_or(|n| n.trim().is_empty())
    {
        return invalid("name", "The name field is required.");
    }
    (
        StatusCode::CREATED,
        Json(backend.insert("categories", fields)),
    )
        .into_response()
}

async fn delete_category(State(backend): State<MockBackend>, Path(id): Path<u64>) -> Response {
    backend.remove("categories", id)
}

async fn list_sliders(State(backend): State<MockBackend>) -> Json<Vec<Value>> {
    Json(backend.list("sliders"))
}

#[derive(Deserialize)]
struct Reorder {
    ids: Vec<u64>,
}

/// Accepts only a permutation of the stored IDs; positions follow the order.
async fn reorder_sliders(
    State(backend): State<MockBackend>,
    Json(reorder): Json<Reorder>,
) -> Response {
    let mut store = backend.lock();
    let sliders = store.collections.entry("sliders").or_default();

    let by_id: BTreeMap<u64, Value> = sliders
        .iter()
        .filter_map(|s| Some((item_id(s)?, s.clone())))
        .collect();
    if reorder.ids.len() != by_id.len() || !reorder.ids.iter().all(|id| by_id.contains_key(id)) {
        return invalid("ids", "The ids must list every slider exactly once.");
    }

    *sliders = reorder
        .ids
        .iter()
        .enumerate()
        .filter_map(|(position, id)| {
            let mut slider = by_id.get(id)?.clone();
            slider["position"] = json!(position + 1);
            Some(slider)
        })
        .collect();
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Matches on name only and ignores `sort`; ordering is the caller's job.
async fn search_products(
    State(backend): State<MockBackend>,
    Query(params): Query<SearchParams>,
) -> Json<Value> {
    let needle = params.q.to_lowercase();
    let items: Vec<Value> = backend
        .list("products")
        .into_iter()
        .filter(|p| {
            p.get("name")
                .and_then(Value::as_str)
                .is_some_and(|n| n.to_lowercase().contains(&needle))
        })
        .collect();
    let total = items.len();
    Json(json!({
        "data": items,
        "current_page": 1,
        "last_page": 1,
        "total": total,
    }))
}

async fn get_cart(State(backend): State<MockBackend>) -> Json<Value> {
    Json(json!({ "items": backend.list("cart") }))
}

#[derive(Deserialize)]
struct NewCartItem {
    product_id: u64,
    quantity: u32,
}

async fn add_to_cart(State(backend): State<MockBackend>, Json(item): Json<NewCartItem>) -> Response {
    let Some(product) = backend.find("products", item.product_id) else {
        return not_found();
    };
    let mut fields = Map::new();
    fields.insert("product".to_string(), product);
    fields.insert("quantity".to_string(), json!(item.quantity));
    (StatusCode::CREATED, Json(backend.insert("cart", fields))).into_response()
}

async fn list_wishlist(State(backend): State<MockBackend>) -> Json<Vec<Value>> {
    Json(backend.list("wishlist"))
}

#[derive(Deserialize)]
struct Like {
    product_id: u64,
}

async fn add_to_wishlist(State(backend): State<MockBackend>, Json(like): Json<Like>) -> Response {
    let Some(product) = backend.find("products", like.product_id) else {
        return not_found();
    };
    let mut fields = Map::new();
    fields.insert("product".to_string(), product);
    (StatusCode::CREATED, Json(backend.insert("wishlist", fields))).into_response()
}

async fn remove_from_wishlist(
    State(backend): State<MockBackend>,
    Path(product_id): Path<u64>,
) -> Response {
    let entry = backend
        .list("wishlist")
        .into_iter()
        .find(|item| item.get("product").and_then(item_id) == Some(product_id));
    match entry.as_ref().and_then(item_id) {
        Some(id) => backend.remove("wishlist", id),
        None => not_found(),
    }
}

async fn list_reviews(State(backend): State<MockBackend>, Path(id): Path<u64>) -> Json<Vec<Value>> {
    Json(
        backend
            .list("reviews")
            .into_iter()
            .filter(|r| r.get("product_id").and_then(Value::as_u64) == Some(id))
            .collect(),
    )
}

/// Reviews are always written by the seeded customer.
async fn create_review(
    State(backend): State<MockBackend>,
    Path(id): Path<u64>,
    Json(mut fields): Json<Map<String, Value>>,
) -> Response {
    let rating = fields.get("rating").and_then(Value::as_u64).unwrap_or(0);
    if !(1..=5).contains(&rating) {
        return invalid("rating", "The rating must be between 1 and 5.");
    }
    fields.insert("product_id".to_string(), json!(id));
    fields.insert("user".to_string(), customer());
    fields.insert("helpful_count".to_string(), json!(0));
    fields.insert("is_helpful".to_string(), json!(false));
    (StatusCode::CREATED, Json(backend.insert("reviews", fields))).into_response()
}

async fn update_review(
    State(backend): State<MockBackend>,
    Path(id): Path<u64>,
    Json(fields): Json<Map<String, Value>>,
) -> Response {
    backend.update("reviews", id, fields)
}

async fn delete_review(State(backend): State<MockBackend>, Path(id): Path<u64>) -> Response {
    backend.remove("reviews", id)
}

/// Flips the customer's vote and moves the count with it.
async fn toggle_helpful(State(backend): State<MockBackend>, Path(id): Path<u64>) -> Response {
    let Some(review) = backend.find("reviews", id) else {
        return not_found();
    };
    let voted = review.get("is_helpful").and_then(Value::as_bool).unwrap_or(false);
    let count = review.get("helpful_count").and_then(Value::as_u64).unwrap_or(0);
    let count = if voted { count.saturating_sub(1) } else { count + 1 };

    let mut fields = Map::new();
    fields.insert("is_helpful".to_string(), json!(!voted));
    fields.insert("helpful_count".to_string(), json!(count));
    backend.update("reviews", id, fields)
}

fn profile(backend: &MockBackend) -> Value {
    backend.list("profile").into_iter().next().unwrap_or_else(customer)
}

fn save_profile(backend: &MockBackend, profile: Value) -> Response {
    backend.seed("profile", vec![profile.clone()]);
    Json(profile).into_response()
}

async fn get_profile(State(backend): State<MockBackend>) -> Json<Value> {
    Json(profile(&backend))
}

async fn update_profile(
    State(backend): State<MockBackend>,
    Json(fields): Json<Map<String, Value>>,
) -> Response {
    let mut current = profile(&backend);
    if let Value::Object(existing) = &mut current {
        existing.extend(fields);
    }
    save_profile(&backend, current)
}

#[derive(Deserialize)]
struct PasswordChange {
    current_password: String,
    password: String,
    password_confirmation: String,
}

async fn change_password(Json(change): Json<PasswordChange>) -> Response {
    if change.current_password != PASSWORD {
        return invalid("current_password", "The current password is incorrect.");
    }
    if change.password != change.password_confirmation {
        return invalid("password", "The password confirmation does not match.");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn upload_picture(State(backend): State<MockBackend>, mut multipart: Multipart) -> Response {
    let mut avatar = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("picture") {
            avatar = field.file_name().map(|name| format!("uploads/{name}"));
        }
    }
    let Some(avatar) = avatar else {
        return invalid("picture", "The picture field is required.");
    };

    let mut current = profile(&backend);
    current["avatar"] = json!(avatar);
    save_profile(&backend, current)
}

async fn delete_picture(State(backend): State<MockBackend>) -> Response {
    let mut current = profile(&backend);
    if let Value::Object(existing) = &mut current {
        existing.remove("avatar");
    }
    backend.seed("profile", vec![current]);
    StatusCode::NO_CONTENT.into_response()
}

async fn create_contact_message(
    State(backend): State<MockBackend>,
    Json(fields): Json<Map<String, Value>>,
) -> Response {
    (
        StatusCode::CREATED,
        Json(backend.insert("contact-messages", fields)),
    )
        .into_response()
}
