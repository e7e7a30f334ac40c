//! Live server harness for product endpoint suites.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. Products live in an in-memory
//! repository and uploads go to a recording stub, so suites can inspect both
//! without a database or network.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpResponse, HttpServer, web};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use inventory_backend::Trace;
use inventory_backend::domain::ports::{HostedImage, ImageHost, ImageHostError, ImageUpload};
use inventory_backend::domain::{MediaPolicy, ProductService, UserId};
use inventory_backend::inbound::http::products;
use inventory_backend::inbound::http::session::USER_ID_KEY;
use inventory_backend::inbound::http::state::HttpState;
use inventory_backend::outbound::memory::InMemoryProductRepository;
use mockable::Clock;
use reqwest::Method;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

const LOGIN_PATH: &str = "/api/v1/test-login";
const CLOCK_START: i64 = 1_767_225_600;

/// Clock that advances one second per reading so creation order is total.
pub(crate) struct SteppingClock {
    next: AtomicI64,
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self {
            next: AtomicI64::new(CLOCK_START),
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let secs = self.next.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
    }
}

/// Image host that records uploads and can be switched to fail.
#[derive(Clone, Default)]
pub(crate) struct RecordingImageHost {
    fail: Arc<AtomicBool>,
    uploads: Arc<Mutex<Vec<String>>>,
}

impl RecordingImageHost {
    pub(crate) fn fail_uploads(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub(crate) fn uploads(&self) -> Vec<String> {
        self.uploads.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ImageHost for RecordingImageHost {
    async fn upload(&self, upload: &ImageUpload) -> Result<HostedImage, ImageHostError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ImageHostError::rejected(503_u16, "host unavailable"));
        }
        let bytes = tokio::fs::read(&upload.path)
            .await
            .map_err(|err| ImageHostError::io(err.to_string()))?;
        if let Ok(mut guard) = self.uploads.lock() {
            guard.push(upload.file_name.clone());
        }
        Ok(HostedImage {
            secure_url: format!(
                "https://images.test/{}/{}-{}",
                upload.folder,
                bytes.len(),
                upload.file_name
            ),
        })
    }
}

/// One multipart part sent by a scenario.
pub(crate) enum Field {
    Text(&'static str, String),
    Image {
        file_name: &'static str,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
}

impl Field {
    pub(crate) fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self::Text(name, value.into())
    }
}

/// Complete create form for a product called `name`.
pub(crate) fn product_form(name: &str, sku: &str) -> Vec<Field> {
    vec![
        Field::text("name", name),
        Field::text("sku", sku),
        Field::text("category", "Tools"),
        Field::text("quantity", "5"),
        Field::text("price", "9.99"),
        Field::text("description", format!("{name} description")),
    ]
}

pub(crate) struct ProductWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) repo: InMemoryProductRepository,
    pub(crate) image_host: RecordingImageHost,
    pub(crate) cookies: HashMap<String, String>,
    pub(crate) users: HashMap<String, UserId>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_product_id: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<ProductWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

async fn test_login(session: Session, body: String) -> HttpResponse {
    match session.insert(USER_ID_KEY, body) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

fn spawn_server(
    repo: InMemoryProductRepository,
    image_host: RecordingImageHost,
) -> Result<(String, ServerHandle), String> {
    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let service = Arc::new(ProductService::new(
        Arc::new(repo),
        Arc::new(image_host),
        Arc::new(SteppingClock::default()),
        MediaPolicy::default(),
    ));
    let state = web::Data::new(HttpState::new(service.clone(), service));

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        let api = web::scope("/api/v1")
            .wrap(session)
            .route("/test-login", web::post().to(test_login))
            .configure(products::configure);
        App::new().app_data(state.clone()).wrap(Trace).service(api)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}

/// Start a server on an ephemeral port.
pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let repo = InMemoryProductRepository::new();
    let image_host = RecordingImageHost::default();

    let (base_url, server) = local
        .block_on(&runtime, async { spawn_server(repo.clone(), image_host.clone()) })
        .expect("server starts");

    WorldFixture {
        world: Rc::new(RefCell::new(ProductWorld {
            runtime,
            local,
            base_url,
            server,
            repo,
            image_host,
            cookies: HashMap::new(),
            users: HashMap::new(),
            last_status: None,
            last_body: None,
            last_product_id: None,
        })),
    }
}

fn block_on<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

/// Log `user` in with a fresh id and keep its session cookie.
pub(crate) fn login_as(world: &SharedWorld, user: &str) -> UserId {
    let user_id = UserId::random();
    let cookie = block_on(world, |base_url| async move {
        let response = reqwest::Client::new()
            .post(format!("{base_url}{LOGIN_PATH}"))
            .body(user_id.to_string())
            .send()
            .await
            .expect("login request");
        assert!(response.status().is_success(), "login failed");
        response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_owned)
            .expect("session cookie")
    });

    let mut ctx = world.borrow_mut();
    ctx.cookies.insert(user.to_owned(), cookie);
    ctx.users.insert(user.to_owned(), user_id);
    user_id
}

fn build_form(fields: Vec<Field>) -> Form {
    fields.into_iter().fold(Form::new(), |form, field| match field {
        Field::Text(name, value) => form.text(name, value),
        Field::Image {
            file_name,
            content_type,
            bytes,
        } => {
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(content_type)
                .expect("valid mime");
            form.part("image", part)
        }
    })
}

/// Send a request as `user` (or anonymously) and record the response.
pub(crate) fn send(
    world: &SharedWorld,
    user: Option<&str>,
    method: Method,
    path: &str,
    fields: Option<Vec<Field>>,
) -> (u16, Value) {
    let cookie = user.and_then(|user| world.borrow().cookies.get(user).cloned());
    let path = path.to_owned();
    let (status, body) = block_on(world, |base_url| async move {
        let mut request = reqwest::Client::new().request(method, format!("{base_url}{path}"));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        if let Some(fields) = fields {
            request = request.multipart(build_form(fields));
        }
        let response = request.send().await.expect("request");
        let status = response.status().as_u16();
        let body = response.bytes().await.expect("body");
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    });

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(status);
    ctx.last_body = Some(body.clone());
    (status, body)
}

/// Number of products stored across every owner.
pub(crate) fn stored_products(world: &SharedWorld) -> usize {
    let ctx = world.borrow();
    let repo = ctx.repo.clone();
    ctx.local.block_on(&ctx.runtime, async move { repo.len().await })
}
