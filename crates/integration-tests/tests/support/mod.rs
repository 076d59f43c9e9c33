//! In-memory stand-in for the commerce platform's REST API.
//!
//! Implements just enough of the admin and storefront surface for the
//! scenarios to run end to end: tokens, customers, products, carts, guest
//! carts, checkout and orders. [`Knobs`] switch on the partial
//! configurations real installations show.

#![allow(dead_code, clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use storeprobe_client::HarnessConfig;
use storeprobe_integration_tests::TestContext;
use url::Url;

const ADMIN: &str = "/rest/V1";
const STOREFRONT: &str = "/rest/default/V1";
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";
const FLAT_RATE: &str = "flatrate";
const FLAT_RATE_PER_ITEM: f64 = 5.0;

/// Ways the fake platform can be misconfigured or broken.
///
/// The first group mimics gaps real installations show. The second group
/// makes the platform answer wrongly, which scenarios must report as failed.
#[derive(Debug, Clone, Default)]
pub struct Knobs {
    /// Estimate no shipping rates and refuse any carrier.
    pub no_shipping: bool,
    /// Offer no payment methods.
    pub no_payment: bool,
    /// Upsert on a duplicate SKU instead of rejecting it.
    pub accept_duplicate_sku: bool,
    /// Refuse guest carts the way a guest-checkout extension does.
    pub guest_checkout_disabled: bool,
    /// Reject cart item payloads without `quote_id`.
    pub require_quote_id: bool,
    /// Fail every add-to-cart with this message and a 500.
    pub cart_error: Option<String>,
    /// Answer 404 when reading a product by SKU.
    pub catalog_lag: bool,

    /// Register a second customer under an email that is already taken.
    pub accept_duplicate_email: bool,
    /// Reject a taken email with this message instead of the usual one.
    pub duplicate_email_message: Option<String>,
    /// Added to every `qty_ordered` on placed orders.
    pub order_qty_drift: f64,
    /// Answer `true` to product deletes without removing anything.
    pub delete_is_noop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Principal {
    Admin,
    Customer(i64),
}

#[derive(Debug, Clone)]
struct Line {
    item_id: i64,
    sku: String,
    name: String,
    qty: f64,
    price: f64,
    product_type: String,
}

#[derive(Debug, Clone, Default)]
struct FakeCart {
    id: i64,
    customer_id: Option<i64>,
    mask: Option<String>,
    lines: Vec<Line>,
    billing: Option<Value>,
    carrier: Option<String>,
    active: bool,
}

#[derive(Debug, Default)]
struct Store {
    knobs: Knobs,
    next_id: i64,
    products: HashMap<String, Value>,
    customers: HashMap<i64, Value>,
    passwords: HashMap<String, (i64, String)>,
    tokens: HashMap<String, Principal>,
    carts: HashMap<i64, FakeCart>,
    orders: HashMap<i64, Value>,
    cart_payloads: Vec<Value>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn issue_token(&mut self, principal: Principal) -> String {
        let token = format!("token-{}", self.next_id());
        self.tokens.insert(token.clone(), principal);
        token
    }
}

type Shared = Arc<Mutex<Store>>;

fn lock(store: &Shared) -> MutexGuard<'_, Store> {
    store.lock().unwrap()
}

/// A running fake platform.
#[derive(Clone)]
pub struct FakePlatform {
    pub base_url: Url,
    store: Shared,
}

impl FakePlatform {
    pub async fn start() -> Self {
        Self::with_knobs(Knobs::default()).await
    }

    pub async fn with_knobs(knobs: Knobs) -> Self {
        storeprobe_integration_tests::init_tracing();
        let store = Arc::new(Mutex::new(Store {
            knobs,
            next_id: 100,
            ..Store::default()
        }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(store.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            store,
        }
    }

    /// Harness settings pointed at this platform: no indexing delay, cleanup on.
    pub fn config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::for_base_url(self.base_url.clone());
        config.run.indexing_delay = Duration::ZERO;
        config.run.cleanup_test_data = true;
        config
    }

    pub fn context(&self) -> TestContext {
        TestContext::new(self.config()).unwrap()
    }

    pub fn context_with(&self, adjust: impl FnOnce(&mut HarnessConfig)) -> TestContext {
        let mut config = self.config();
        adjust(&mut config);
        TestContext::new(config).unwrap()
    }

    pub fn product_count(&self) -> usize {
        lock(&self.store).products.len()
    }

    pub fn has_product(&self, sku: &str) -> bool {
        lock(&self.store).products.contains_key(sku)
    }

    pub fn customer_count(&self) -> usize {
        lock(&self.store).customers.len()
    }

    pub fn orders(&self) -> Vec<Value> {
        lock(&self.store).orders.values().cloned().collect()
    }

    /// Raw add-to-cart bodies, in arrival order.
    pub fn cart_payloads(&self) -> Vec<Value> {
        lock(&self.store).cart_payloads.clone()
    }
}

// ============================================================================
// Errors
// ============================================================================

struct Fault(StatusCode, Value);

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

type Reply = Result<Json<Value>, Fault>;

fn fault(status: StatusCode, message: &str) -> Fault {
    Fault(status, json!({ "message": message }))
}

fn fault_with(status: StatusCode, message: &str, parameters: Value) -> Fault {
    Fault(status, json!({ "message": message, "parameters": parameters }))
}

fn unauthorized() -> Fault {
    fault_with(
        StatusCode::UNAUTHORIZED,
        "The consumer isn't authorized to access %resources.",
        json!({ "resources": "self" }),
    )
}

fn sign_in_failed() -> Fault {
    fault(
        StatusCode::UNAUTHORIZED,
        "The account sign-in was incorrect or your account is disabled temporarily. \
         Please wait and try again later.",
    )
}

fn required(field: &str) -> Fault {
    fault_with(
        StatusCode::BAD_REQUEST,
        "\"%fieldName\" is required. Enter and try again.",
        json!({ "fieldName": field }),
    )
}

fn no_such_entity(field: &str, value: impl ToString) -> Fault {
    fault_with(
        StatusCode::NOT_FOUND,
        "No such entity with %fieldName = %fieldValue",
        json!({ "fieldName": field, "fieldValue": value.to_string() }),
    )
}

fn product_not_found() -> Fault {
    fault(
        StatusCode::NOT_FOUND,
        "The product that was requested doesn't exist. Verify the product and try again.",
    )
}

// ============================================================================
// Auth
// ============================================================================

fn principal(store: &Store, headers: &HeaderMap) -> Option<Principal> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    store.tokens.get(token).copied()
}

fn require_admin(store: &Store, headers: &HeaderMap) -> Result<(), Fault> {
    match principal(store, headers) {
        Some(Principal::Admin) => Ok(()),
        _ => Err(unauthorized()),
    }
}

fn require_customer(store: &Store, headers: &HeaderMap) -> Result<i64, Fault> {
    match principal(store, headers) {
        Some(Principal::Customer(id)) => Ok(id),
        _ => Err(unauthorized()),
    }
}

async fn admin_token(State(shared): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    if body["username"] == ADMIN_USERNAME && body["password"] == ADMIN_PASSWORD {
        Ok(Json(json!(store.issue_token(Principal::Admin))))
    } else {
        Err(sign_in_failed())
    }
}

async fn customer_token(State(shared): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    let username = body["username"].as_str().unwrap_or_default().to_lowercase();
    let password = body["password"].as_str().unwrap_or_default();
    let id = match store.passwords.get(&username) {
        Some((id, expected)) if expected == password => *id,
        _ => return Err(sign_in_failed()),
    };
    Ok(Json(json!(store.issue_token(Principal::Customer(id)))))
}

// ============================================================================
// Catalog
// ============================================================================

fn merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                merge(target.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

fn non_empty<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value[field].as_str().filter(|s| !s.trim().is_empty())
}

async fn create_product(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    require_admin(store, &headers)?;
    let product = &body["product"];
    let Some(sku) = non_empty(product, "sku").map(str::to_string) else {
        return Err(fault_with(
            StatusCode::BAD_REQUEST,
            "The \"%1\" attribute value is empty. Set the attribute and try again.",
            json!(["sku"]),
        ));
    };
    if non_empty(product, "name").is_none() {
        return Err(fault_with(
            StatusCode::BAD_REQUEST,
            "The \"%1\" attribute value is empty. Set the attribute and try again.",
            json!(["name"]),
        ));
    }

    if let Some(existing) = store.products.get_mut(&sku) {
        if !store.knobs.accept_duplicate_sku {
            return Err(fault(
                StatusCode::BAD_REQUEST,
                "URL key for specified store already exists.",
            ));
        }
        merge(existing, product);
        return Ok(Json(existing.clone()));
    }

    let mut saved = json!({
        "status": 1,
        "visibility": 4,
        "type_id": "simple",
        "attribute_set_id": 4,
        "price": 0,
    });
    merge(&mut saved, product);
    saved["id"] = json!(store.next_id());
    store.products.insert(sku, saved.clone());
    Ok(Json(saved))
}

async fn get_product(
    State(shared): State<Shared>,
    Path(sku): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let guard = lock(&shared);
    let store = &*guard;
    require_admin(store, &headers)?;
    if store.knobs.catalog_lag {
        return Err(product_not_found());
    }
    store
        .products
        .get(&sku)
        .cloned()
        .map(Json)
        .ok_or_else(product_not_found)
}

async fn update_product(
    State(shared): State<Shared>,
    Path(sku): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    require_admin(store, &headers)?;
    let product = store.products.get_mut(&sku).ok_or_else(product_not_found)?;
    merge(product, &body["product"]);
    Ok(Json(product.clone()))
}

async fn delete_product(
    State(shared): State<Shared>,
    Path(sku): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    require_admin(store, &headers)?;
    if store.knobs.delete_is_noop {
        return store
            .products
            .get(&sku)
            .map(|_| Json(json!(true)))
            .ok_or_else(product_not_found);
    }
    store
        .products
        .remove(&sku)
        .map(|_| Json(json!(true)))
        .ok_or_else(product_not_found)
}

async fn search_products(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let guard = lock(&shared);
    let store = &*guard;
    require_admin(store, &headers)?;
    let prefix = "searchCriteria[filter_groups][0][filters][0]";
    let field = params.get(&format!("{prefix}[field]")).cloned();
    let pattern = params
        .get(&format!("{prefix}[value]"))
        .map(|v| v.trim_matches('%').to_lowercase());
    let items: Vec<Value> = store
        .products
        .values()
        .filter(|product| match (&field, &pattern) {
            (Some(field), Some(pattern)) => product[field.as_str()]
                .as_str()
                .is_some_and(|v| v.to_lowercase().contains(pattern.as_str())),
            _ => true,
        })
        .cloned()
        .collect();
    Ok(Json(json!({
        "items": items,
        "search_criteria": {},
        "total_count": items.len(),
    })))
}

// ============================================================================
// Customers
// ============================================================================

fn with_address_ids(store: &mut Store, customer_id: i64, addresses: &Value) -> Value {
    let mut addresses = addresses.as_array().cloned().unwrap_or_default();
    for address in &mut addresses {
        if address.get("id").is_none_or(Value::is_null) {
            address["id"] = json!(store.next_id());
        }
        address["customer_id"] = json!(customer_id);
    }
    Value::Array(addresses)
}

async fn register_customer(State(shared): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    let customer = &body["customer"];
    for field in ["email", "firstname", "lastname"] {
        if non_empty(customer, field).is_none() {
            return Err(fault_with(
                StatusCode::BAD_REQUEST,
                "\"%fieldName\" is a required value.",
                json!({ "fieldName": field }),
            ));
        }
    }
    let Some(password) = non_empty(&body, "password").map(str::to_string) else {
        return Err(required("password"));
    };
    let email = customer["email"].as_str().unwrap_or_default().to_lowercase();
    if store.passwords.contains_key(&email) && !store.knobs.accept_duplicate_email {
        let message = store.knobs.duplicate_email_message.as_deref().unwrap_or(
            "A customer with the same email address already exists in an associated website.",
        );
        return Err(fault(StatusCode::BAD_REQUEST, message));
    }

    let id = store.next_id();
    let addresses = with_address_ids(store, id, &customer["addresses"]);
    let mut saved = customer.clone();
    saved["id"] = json!(id);
    saved["group_id"] = json!(1);
    saved["store_id"] = json!(1);
    saved["website_id"] = json!(1);
    saved["addresses"] = addresses;
    saved["created_at"] = json!("2026-01-01 00:00:00");
    store.passwords.insert(email, (id, password));
    store.customers.insert(id, saved.clone());
    Ok(Json(saved))
}

async fn current_customer(State(shared): State<Shared>, headers: HeaderMap) -> Reply {
    let guard = lock(&shared);
    let store = &*guard;
    let id = require_customer(store, &headers)?;
    store
        .customers
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| no_such_entity("customerId", id))
}

async fn update_customer(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    let id = require_customer(store, &headers)?;
    let patch = &body["customer"];
    let addresses = patch
        .get("addresses")
        .map(|addresses| with_address_ids(store, id, addresses));
    let customer = store
        .customers
        .get_mut(&id)
        .ok_or_else(|| no_such_entity("customerId", id))?;
    for field in ["email", "firstname", "lastname"] {
        if let Some(value) = non_empty(patch, field) {
            customer[field] = json!(value);
        }
    }
    if let Some(addresses) = addresses {
        customer["addresses"] = addresses;
    }
    Ok(Json(customer.clone()))
}

// ============================================================================
// Carts
// ============================================================================

/// Which cart a storefront request addresses, read from its path.
enum CartSel {
    Mine,
    Guest(String),
}

impl<S: Send + Sync> FromRequestParts<S> for CartSel {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut segments = parts.uri.path().split('/');
        let mask = segments
            .by_ref()
            .find(|segment| *segment == "guest-carts")
            .and_then(|_| segments.next())
            .map(str::to_string);
        Ok(mask.map_or(Self::Mine, Self::Guest))
    }
}

fn resolve_cart(store: &Store, sel: &CartSel, headers: &HeaderMap) -> Result<i64, Fault> {
    match sel {
        CartSel::Mine => {
            let customer = require_customer(store, headers)?;
            store
                .carts
                .values()
                .find(|cart| cart.active && cart.customer_id == Some(customer))
                .map(|cart| cart.id)
                .ok_or_else(|| no_such_entity("customerId", customer))
        }
        CartSel::Guest(mask) => store
            .carts
            .values()
            .find(|cart| cart.active && cart.mask.as_deref() == Some(mask.as_str()))
            .map(|cart| cart.id)
            .ok_or_else(|| no_such_entity("cartId", mask)),
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

impl FakeCart {
    fn qty(&self) -> f64 {
        self.lines.iter().map(|line| line.qty).sum()
    }

    fn subtotal(&self) -> f64 {
        round_cents(self.lines.iter().map(|line| line.price * line.qty).sum())
    }

    fn shipping(&self) -> f64 {
        if self.carrier.is_some() {
            round_cents(FLAT_RATE_PER_ITEM * self.qty())
        } else {
            0.0
        }
    }

    fn totals(&self) -> Value {
        json!({
            "grand_total": round_cents(self.subtotal() + self.shipping()),
            "subtotal": self.subtotal(),
            "shipping_amount": self.shipping(),
            "tax_amount": 0,
            "discount_amount": 0,
        })
    }
}

fn line_json(cart: &FakeCart, line: &Line) -> Value {
    let quote_id = cart.mask.clone().unwrap_or_else(|| cart.id.to_string());
    json!({
        "item_id": line.item_id,
        "sku": line.sku,
        "qty": line.qty,
        "name": line.name,
        "price": line.price,
        "product_type": line.product_type,
        "quote_id": quote_id,
    })
}

fn payment_methods_for(knobs: &Knobs) -> Value {
    if knobs.no_payment {
        json!([])
    } else {
        json!([{ "code": "checkmo", "title": "Check / Money order" }])
    }
}

async fn create_cart(State(shared): State<Shared>, headers: HeaderMap) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    let customer = require_customer(store, &headers)?;
    if let Some(cart) = store
        .carts
        .values()
        .find(|cart| cart.active && cart.customer_id == Some(customer))
    {
        return Ok(Json(json!(cart.id)));
    }
    let id = store.next_id();
    store.carts.insert(
        id,
        FakeCart {
            id,
            customer_id: Some(customer),
            active: true,
            ..FakeCart::default()
        },
    );
    Ok(Json(json!(id)))
}

async fn create_guest_cart(State(shared): State<Shared>) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    if store.knobs.guest_checkout_disabled {
        return Err(fault(
            StatusCode::BAD_REQUEST,
            "Guest checkout is disabled for this store.",
        ));
    }
    let id = store.next_id();
    let mask = format!("gq{id:030}");
    store.carts.insert(
        id,
        FakeCart {
            id,
            mask: Some(mask.clone()),
            active: true,
            ..FakeCart::default()
        },
    );
    Ok(Json(json!(mask)))
}

async fn get_cart(State(shared): State<Shared>, headers: HeaderMap) -> Reply {
    let guard = lock(&shared);
    let store = &*guard;
    let id = resolve_cart(store, &CartSel::Mine, &headers)?;
    let cart = &store.carts[&id];
    let customer = cart
        .customer_id
        .and_then(|c| store.customers.get(&c))
        .cloned()
        .unwrap_or(Value::Null);
    Ok(Json(json!({
        "id": cart.id,
        "is_active": cart.active,
        "items": cart.lines.iter().map(|line| line_json(cart, line)).collect::<Vec<_>>(),
        "items_count": cart.lines.len(),
        "items_qty": cart.qty(),
        "customer": {
            "email": customer["email"],
            "firstname": customer["firstname"],
            "lastname": customer["lastname"],
        },
    })))
}

async fn add_item(
    State(shared): State<Shared>,
    sel: CartSel,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    let id = resolve_cart(store, &sel, &headers)?;
    store.cart_payloads.push(body.clone());
    if let Some(message) = &store.knobs.cart_error {
        return Err(fault(StatusCode::INTERNAL_SERVER_ERROR, message));
    }
    let item = &body["cartItem"];
    if store.knobs.require_quote_id && item.get("quote_id").is_none() {
        return Err(required("quoteId"));
    }
    let sku = item["sku"].as_str().unwrap_or_default().to_string();
    let qty = item["qty"].as_f64().unwrap_or(1.0);
    let product = store.products.get(&sku).cloned().ok_or_else(product_not_found)?;
    if product["status"] == 2 {
        return Err(fault(
            StatusCode::BAD_REQUEST,
            "Product that you are trying to add is not available.",
        ));
    }

    let item_id = store.next_id();
    let cart = store.carts.get_mut(&id).ok_or_else(|| no_such_entity("cartId", id))?;
    let index = match cart.lines.iter().position(|line| line.sku == sku) {
        Some(index) => {
            cart.lines[index].qty += qty;
            index
        }
        None => {
            cart.lines.push(Line {
                item_id,
                sku,
                name: product["name"].as_str().unwrap_or_default().to_string(),
                qty,
                price: product["price"].as_f64().unwrap_or_default(),
                product_type: product["type_id"].as_str().unwrap_or("simple").to_string(),
            });
            cart.lines.len() - 1
        }
    };
    Ok(Json(line_json(cart, &cart.lines[index])))
}

async fn list_items(State(shared): State<Shared>, sel: CartSel, headers: HeaderMap) -> Reply {
    let guard = lock(&shared);
    let store = &*guard;
    let id = resolve_cart(store, &sel, &headers)?;
    let cart = &store.carts[&id];
    Ok(Json(json!(
        cart.lines
            .iter()
            .map(|line| line_json(cart, line))
            .collect::<Vec<_>>()
    )))
}

async fn update_item(
    State(shared): State<Shared>,
    sel: CartSel,
    Path(params): Path<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    let id = resolve_cart(store, &sel, &headers)?;
    let item_id: i64 = params["item_id"].parse().unwrap();
    let qty = body["cartItem"]["qty"].as_f64().unwrap_or(1.0);
    let cart = store.carts.get_mut(&id).ok_or_else(|| no_such_entity("cartId", id))?;
    let index = cart
        .lines
        .iter()
        .position(|line| line.item_id == item_id)
        .ok_or_else(|| no_such_entity("itemId", item_id))?;
    cart.lines[index].qty = qty;
    Ok(Json(line_json(cart, &cart.lines[index])))
}

async fn billing_address(
    State(shared): State<Shared>,
    sel: CartSel,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    let id = resolve_cart(store, &sel, &headers)?;
    let address = &body["address"];
    for field in ["firstname", "lastname", "city", "postcode", "telephone"] {
        if non_empty(address, field).is_none() {
            return Err(required(field));
        }
    }
    let address_id = store.next_id();
    let cart = store.carts.get_mut(&id).ok_or_else(|| no_such_entity("cartId", id))?;
    cart.billing = Some(address.clone());
    Ok(Json(json!(address_id)))
}

async fn estimate_shipping(
    State(shared): State<Shared>,
    sel: CartSel,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> Reply {
    let guard = lock(&shared);
    let store = &*guard;
    let id = resolve_cart(store, &sel, &headers)?;
    if store.knobs.no_shipping {
        return Ok(Json(json!([])));
    }
    let amount = round_cents(FLAT_RATE_PER_ITEM * store.carts[&id].qty());
    Ok(Json(json!([{
        "carrier_code": FLAT_RATE,
        "method_code": FLAT_RATE,
        "carrier_title": "Flat Rate",
        "method_title": "Fixed",
        "amount": amount,
        "base_amount": amount,
        "available": true,
        "error_message": "",
    }])))
}

async fn shipping_information(
    State(shared): State<Shared>,
    sel: CartSel,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    let id = resolve_cart(store, &sel, &headers)?;
    let information = &body["addressInformation"];
    let carrier = information["shipping_carrier_code"].as_str().unwrap_or_default();
    let method = information["shipping_method_code"].as_str().unwrap_or_default();
    if store.knobs.no_shipping || carrier != FLAT_RATE {
        return Err(fault_with(
            StatusCode::BAD_REQUEST,
            "Carrier with such method not found: %1, %2",
            json!([carrier, method]),
        ));
    }
    let payment_methods = payment_methods_for(&store.knobs);
    let cart = store.carts.get_mut(&id).ok_or_else(|| no_such_entity("cartId", id))?;
    cart.carrier = Some(carrier.to_string());
    if cart.billing.is_none() {
        cart.billing = Some(information["billing_address"].clone());
    }
    Ok(Json(json!({
        "payment_methods": payment_methods,
        "totals": cart.totals(),
    })))
}

async fn payment_methods(State(shared): State<Shared>, sel: CartSel, headers: HeaderMap) -> Reply {
    let guard = lock(&shared);
    let store = &*guard;
    resolve_cart(store, &sel, &headers)?;
    Ok(Json(payment_methods_for(&store.knobs)))
}

async fn place_order(
    State(shared): State<Shared>,
    sel: CartSel,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut guard = lock(&shared);
    let store = &mut *guard;
    let id = resolve_cart(store, &sel, &headers)?;
    let cart = store.carts[&id].clone();
    if cart.carrier.is_none() {
        return Err(fault(
            StatusCode::BAD_REQUEST,
            "The shipping method is missing. Select the shipping method and try again.",
        ));
    }
    let method = body["paymentMethod"]["method"].as_str().unwrap_or_default();
    if store.knobs.no_payment || method != "checkmo" {
        return Err(fault(
            StatusCode::BAD_REQUEST,
            "The requested Payment Method is not available.",
        ));
    }

    let billing = cart.billing.clone().unwrap_or(Value::Null);
    let (email, firstname, lastname) = match cart.customer_id {
        Some(customer) => {
            let customer = &store.customers[&customer];
            (
                customer["email"].clone(),
                customer["firstname"].clone(),
                customer["lastname"].clone(),
            )
        }
        None => {
            let Some(email) = non_empty(&body, "email") else {
                return Err(required("email"));
            };
            (
                json!(email),
                billing["firstname"].clone(),
                billing["lastname"].clone(),
            )
        }
    };

    let order_id = store.next_id();
    let totals = cart.totals();
    let drift = store.knobs.order_qty_drift;
    let order = json!({
        "entity_id": order_id,
        "increment_id": format!("{order_id:09}"),
        "state": "new",
        "status": "pending",
        "grand_total": totals["grand_total"],
        "subtotal": totals["subtotal"],
        "shipping_amount": totals["shipping_amount"],
        "customer_email": email,
        "customer_firstname": firstname,
        "customer_lastname": lastname,
        "customer_is_guest": cart.customer_id.is_none(),
        "billing_address": billing,
        "items": cart.lines.iter().map(|line| json!({
            "sku": line.sku,
            "name": line.name,
            "qty_ordered": line.qty + drift,
            "price": line.price,
            "row_total": round_cents(line.price * line.qty),
            "product_type": line.product_type,
        })).collect::<Vec<_>>(),
    });
    store.orders.insert(order_id, order);
    if let Some(cart) = store.carts.get_mut(&id) {
        cart.active = false;
    }
    Ok(Json(json!(order_id.to_string())))
}

// ============================================================================
// Orders
// ============================================================================

async fn get_order(
    State(shared): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Reply {
    let guard = lock(&shared);
    let store = &*guard;
    require_admin(store, &headers)?;
    store.orders.get(&id).cloned().map(Json).ok_or_else(|| {
        fault(
            StatusCode::NOT_FOUND,
            "The entity that was requested doesn't exist. Verify the entity and try again.",
        )
    })
}

// ============================================================================
// Routing
// ============================================================================

fn router(store: Shared) -> Router {
    let cart_routes = |prefix: &str, router: Router<Shared>| {
        router
            .route(&format!("{prefix}/items"), post(add_item).get(list_items))
            .route(&format!("{prefix}/items/{{item_id}}"), put(update_item))
            .route(&format!("{prefix}/billing-address"), post(billing_address))
            .route(
                &format!("{prefix}/estimate-shipping-methods"),
                post(estimate_shipping),
            )
            .route(
                &format!("{prefix}/shipping-information"),
                post(shipping_information),
            )
            .route(&format!("{prefix}/payment-methods"), get(payment_methods))
            .route(&format!("{prefix}/payment-information"), put(place_order))
    };

    let router = Router::new()
        .route(&format!("{ADMIN}/integration/admin/token"), post(admin_token))
        .route(
            &format!("{ADMIN}/products"),
            post(create_product).get(search_products),
        )
        .route(
            &format!("{ADMIN}/products/{{sku}}"),
            get(get_product).put(update_product).delete(delete_product),
        )
        .route(&format!("{ADMIN}/orders/{{id}}"), get(get_order))
        .route(
            &format!("{STOREFRONT}/integration/customer/token"),
            post(customer_token),
        )
        .route(&format!("{STOREFRONT}/customers"), post(register_customer))
        .route(
            &format!("{STOREFRONT}/customers/me"),
            get(current_customer).put(update_customer),
        )
        .route(
            &format!("{STOREFRONT}/carts/mine"),
            post(create_cart).get(get_cart),
        )
        .route(&format!("{STOREFRONT}/guest-carts"), post(create_guest_cart));
    let router = cart_routes(&format!("{STOREFRONT}/carts/mine"), router);
    let router = cart_routes(&format!("{STOREFRONT}/guest-carts/{{mask}}"), router);
    router.with_state(store)
}
