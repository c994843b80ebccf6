use super::{LOAD_FAILED, router, worth_refetching};
use crate::{
    api::login::UNREACHABLE_MESSAGE,
    config::{ApiConfig, RuntimeConfiguration},
    error::{CONNECTIVITY_MESSAGE, KampusError},
    state::KampusState,
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use reqwest::{Client, multipart, redirect::Policy};
use serde_json::{Value, json};
use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

const TOKEN: &str = "tok-123";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

#[derive(Clone, Debug)]
struct Recorded {
    method: Method,
    path: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Bytes,
}

impl Recorded {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Clone, Default)]
struct MockApi {
    requests: Arc<Mutex<Vec<Recorded>>>,
    reject_tokens: Arc<AtomicBool>,
    reject_writes: Arc<AtomicBool>,
    fail_lookups: Arc<AtomicBool>,
}

impl MockApi {
    fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }
}

async fn mock_handler(
    State(mock): State<MockApi>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().trim_start_matches("/api/").to_string();
    let header_text = |name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
    };
    mock.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body: body.clone(),
    });

    if path == "login" {
        let credentials: Value = serde_json::from_slice(&body).unwrap_or_default();
        return if credentials["password"] == "rahasia" {
            Json(json!({"token": TOKEN, "user": {"name": "Bu Sari"}})).into_response()
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Email atau password salah."})),
            )
                .into_response()
        };
    }

    if mock.reject_tokens.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthenticated."})),
        )
            .into_response();
    }

    let student = json!({
        "id": 1, "nim": "2101", "nama": "Ani Lestari",
        "program_studi": {"id": 1, "program_studi": "Informatika"},
        "email": "ani@kampus.test", "nomor_hp": "0812", "jenis_kelamin": 0,
        "tanggal_lahir": "2003-04-05T00:00:00.000000Z", "golongan_darah": "ab"
    });
    let lecturer = json!({
        "id": 4, "nama_lengkap": "Dr. Rahmat Hidayat", "nidn": "0011223344",
        "jabatan_fungsional": "lektor", "status": "aktif", "jenis_kelamin": 1,
        "program_studi_id": 1, "kelompok_keahlian_id": "2",
        "foto": "http://cdn.test/rahmat.jpg"
    });
    let rejects_writes = mock.reject_writes.load(Ordering::SeqCst);

    match (method, path.as_str()) {
        (Method::GET, "mahasiswa") => Json(json!({"data": [student]})).into_response(),
        (Method::GET, "mahasiswa/1") => Json(json!({"data": student})).into_response(),
        (Method::GET, "dosens") => Json(json!({"data": [lecturer]})).into_response(),
        (Method::GET, "dosens/4") => Json(lecturer).into_response(),
        (Method::GET, "program-studis") => {
            Json(json!([{"id": 1, "program_studi": "Informatika"}])).into_response()
        }
        (Method::GET, "kelompok-keahlians") if mock.fail_lookups.load(Ordering::SeqCst) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Server Error"})),
        )
            .into_response(),
        (Method::GET, "kelompok-keahlians") => {
            Json(json!({"data": [{"id": 2, "nama": "Rekayasa Perangkat Lunak"}]})).into_response()
        }
        (Method::POST | Method::PUT, "mahasiswa" | "mahasiswa/1") if rejects_writes => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The given data was invalid.",
                "errors": {"email": ["Email sudah terdaftar"], "nim": ["NIM sudah dipakai"]}
            })),
        )
            .into_response(),
        (Method::POST | Method::PUT, "dosens" | "dosens/4") if rejects_writes => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"errors": {"nidn": ["NIDN sudah terdaftar"]}})),
        )
            .into_response(),
        (Method::POST, "mahasiswa" | "dosens" | "dosens/4") => {
            (StatusCode::CREATED, Json(json!({"message": "ok"}))).into_response()
        }
        (Method::PUT, "mahasiswa/1" | "dosens/4") => Json(json!({"message": "ok"})).into_response(),
        (Method::DELETE, "mahasiswa/7") => Json(json!({"message": "ok"})).into_response(),
        (Method::DELETE, _) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Data masih dipakai"})),
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve_until(
    app: Router,
    stop: impl Future<Output = ()> + Send + 'static,
) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(stop)
            .await
            .unwrap();
    });
    (addr, task)
}

async fn serve(app: Router) -> SocketAddr {
    serve_until(app, std::future::pending()).await.0
}

/// An address nothing listens on.
async fn closed_port() -> SocketAddr {
    TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap()
}

struct Harness {
    mock: MockApi,
    api: Option<(oneshot::Sender<()>, JoinHandle<()>)>,
    console: SocketAddr,
    client: Client,
}

impl Harness {
    async fn start() -> Self {
        let mock = MockApi::default();
        let (stop, stopped) = oneshot::channel::<()>();
        let (api, api_task) = serve_until(
            Router::new()
                .fallback(mock_handler)
                .with_state(mock.clone()),
            async move {
                let _ = stopped.await;
            },
        )
        .await;

        let config = RuntimeConfiguration::from_api_config(ApiConfig::with_base_url(
            format!("http://{api}/api/"),
            Duration::from_secs(5),
        ));
        let console = serve(router(KampusState::new(config).unwrap())).await;

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            mock,
            api: Some((stop, api_task)),
            console,
            client,
        }
    }

    /// Shuts the mock API down; the console keeps pointing at its old port.
    async fn take_api_offline(&mut self) {
        if let Some((stop, task)) = self.api.take() {
            stop.send(()).unwrap();
            task.await.unwrap();
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.console)
    }

    async fn login(&self) {
        let response = self
            .client
            .post(self.url("/login"))
            .form(&[("email", "admin@kampus.test"), ("password", "rahasia")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
        self.mock.clear();
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn htmx(&self, method: Method, path: &str) -> reqwest::Response {
        self.client
            .request(method, self.url(path))
            .header("HX-Request", "true")
            .send()
            .await
            .unwrap()
    }
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn hx_header<'a>(response: &'a reqwest::Response, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn protected_routes_never_reach_the_api_without_a_token() {
    let harness = Harness::start().await;

    for path in [
        "/dashboard",
        "/internal/students",
        "/dashboard/create",
        "/dashboard/edit/1",
        "/dashboard/dosen",
        "/internal/faculty",
        "/dashboard/dosen/create",
        "/dashboard/dosen/edit/4",
    ] {
        let response = harness.get(path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), format!("/login?next={path}"));
    }

    let response = harness.htmx(Method::DELETE, "/dashboard/delete/7").await;
    assert_eq!(hx_header(&response, "HX-Redirect"), "/login");

    let response = harness
        .client
        .post(harness.url("/dashboard/dosen/create"))
        .multipart(multipart::Form::new().text("nama_lengkap", "Dr. Rahmat"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert!(harness.mock.recorded().is_empty());
}

#[tokio::test]
async fn index_and_login_pages_render_without_a_session() {
    let harness = Harness::start().await;

    let index = harness.get("/").await.text().await.unwrap();
    assert!(index.contains("Masuk ke Dashboard"));

    let login = harness.get("/login?next=/dashboard/dosen").await;
    assert_eq!(login.status(), StatusCode::OK);
    let login = login.text().await.unwrap();
    assert!(login.contains(r#"name="next" value="/dashboard/dosen""#));

    let expired = harness.get("/login?expired=true").await.text().await.unwrap();
    assert!(expired.contains("Sesi Anda telah berakhir"));
}

#[tokio::test]
async fn rejected_login_shows_the_reason_and_stores_nothing() {
    let harness = Harness::start().await;

    let response = harness
        .client
        .post(harness.url("/login"))
        .form(&[("email", "admin@kampus.test"), ("password", "salah")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let page = response.text().await.unwrap();
    assert!(page.contains("Email atau password salah."));
    assert!(page.contains(r#"value="admin@kampus.test""#));

    let response = harness.get("/dashboard").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn login_follows_next_and_stores_the_display_name() {
    let harness = Harness::start().await;

    let response = harness
        .client
        .post(harness.url("/login"))
        .form(&[
            ("email", "admin@kampus.test"),
            ("password", "rahasia"),
            ("next", "/dashboard/dosen"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard/dosen");

    let page = harness.get("/dashboard/dosen").await.text().await.unwrap();
    assert!(page.contains("Bu Sari"));

    let response = harness.get("/login").await;
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn student_list_is_fetched_with_the_bearer_token() {
    let harness = Harness::start().await;
    harness.login().await;

    let shell = harness.get("/dashboard").await.text().await.unwrap();
    assert!(shell.contains(r#"hx-get="/internal/students""#));
    assert!(harness.mock.recorded().is_empty());

    let fragment = harness.get("/internal/students").await.text().await.unwrap();
    assert!(fragment.contains("Ani Lestari"));
    assert!(fragment.contains("Informatika"));
    assert!(fragment.contains("mailto:ani@kampus.test"));
    assert!(fragment.contains(r#"id="student-1""#));

    let recorded = harness.mock.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].method, Method::GET);
    assert_eq!(recorded[0].path, "mahasiswa");
    assert_eq!(
        recorded[0].authorization.as_deref(),
        Some(format!("Bearer {TOKEN}").as_str())
    );
}

#[tokio::test]
async fn deleting_a_student_only_sends_the_delete() {
    let harness = Harness::start().await;
    harness.login().await;

    let response = harness.htmx(Method::DELETE, "/dashboard/delete/7").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().is_empty());

    let recorded = harness.mock.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].method, Method::DELETE);
    assert_eq!(recorded[0].path, "mahasiswa/7");
}

#[tokio::test]
async fn deleting_a_row_lowers_the_total_card() {
    let harness = Harness::start().await;
    harness.login().await;

    let fragment = harness.get("/internal/students").await.text().await.unwrap();
    assert!(fragment.contains(r##"hx-include="#student-total""##));
    assert!(fragment.contains(r#"name="total" value="1""#));
    harness.mock.clear();

    let response = harness
        .htmx(Method::DELETE, "/dashboard/delete/7?total=3")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"id="student-total" hx-swap-oob="true""#));
    assert!(body.contains(r#"name="total" value="2""#));
    assert!(body.contains("Total Mahasiswa"));

    let recorded = harness.mock.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].method, Method::DELETE);
}

#[tokio::test]
async fn failed_delete_is_retargeted_to_the_flash_area() {
    let harness = Harness::start().await;
    harness.login().await;

    let response = harness.htmx(Method::DELETE, "/dashboard/dosen/delete/9").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hx_header(&response, "HX-Retarget"), "#flash");
    assert!(response.text().await.unwrap().contains("Data masih dipakai"));
}

#[tokio::test]
async fn rejected_token_ends_the_session() {
    let harness = Harness::start().await;
    harness.login().await;
    harness.mock.reject_tokens.store(true, Ordering::SeqCst);

    let response = harness.htmx(Method::GET, "/internal/students").await;
    assert_eq!(hx_header(&response, "HX-Redirect"), "/login?expired=true");

    harness.mock.reject_tokens.store(false, Ordering::SeqCst);
    harness.mock.clear();

    let response = harness.get("/dashboard/dosen").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=/dashboard/dosen");
    assert!(harness.mock.recorded().is_empty());
}

#[tokio::test]
async fn creating_a_student_flashes_on_the_list() {
    let harness = Harness::start().await;
    harness.login().await;

    let response = harness
        .client
        .post(harness.url("/dashboard/create"))
        .form(&[
            ("nim", " 2102 "),
            ("nama", "Budi"),
            ("program_studi_id", "1"),
            ("email", "budi@kampus.test"),
            ("jenis_kelamin", "1"),
            ("golongan_darah", "o"),
            ("tanggal_lahir", ""),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard");

    let sent = harness.mock.recorded();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].path, "mahasiswa");
    let body = sent[0].json();
    assert_eq!(body["nim"], "2102");
    assert_eq!(body["program_studi_id"], 1);
    assert_eq!(body["jenis_kelamin"], true);
    assert_eq!(body["golongan_darah"], "O");
    assert_eq!(body["tanggal_lahir"], Value::Null);

    let page = harness.get("/dashboard").await.text().await.unwrap();
    assert!(page.contains("Berhasil menambah mahasiswa!"));
    let page = harness.get("/dashboard").await.text().await.unwrap();
    assert!(!page.contains("Berhasil menambah mahasiswa!"));
}

#[tokio::test]
async fn validation_failure_shows_the_first_message_and_keeps_input() {
    let harness = Harness::start().await;
    harness.login().await;
    harness.mock.reject_writes.store(true, Ordering::SeqCst);

    let response = harness
        .client
        .post(harness.url("/dashboard/create"))
        .form(&[
            ("nim", "2101"),
            ("nama", "Ani Kembar"),
            ("email", "ani@kampus.test"),
            ("jenis_kelamin", "0"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let page = response.text().await.unwrap();
    assert!(page.contains("Email sudah terdaftar"));
    assert!(!page.contains("NIM sudah dipakai"));
    assert!(page.contains(r#"value="Ani Kembar""#));
}

#[tokio::test]
async fn edit_form_is_prefilled_from_the_record() {
    let harness = Harness::start().await;
    harness.login().await;

    let page = harness.get("/dashboard/edit/1").await.text().await.unwrap();
    assert!(page.contains(r#"value="2101""#));
    assert!(page.contains(r#"value="2003-04-05""#));
    assert!(page.contains(r#"action="/dashboard/edit/1""#));

    let mut paths: Vec<_> = harness
        .mock
        .recorded()
        .into_iter()
        .map(|recorded| recorded.path)
        .collect();
    paths.sort();
    assert_eq!(paths, ["mahasiswa/1", "program-studis"]);
}

#[tokio::test]
async fn updating_a_student_sends_put() {
    let harness = Harness::start().await;
    harness.login().await;

    let response = harness
        .client
        .post(harness.url("/dashboard/edit/1"))
        .form(&[("nim", "2101"), ("nama", "Ani L."), ("jenis_kelamin", "0")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard");

    let sent = harness.mock.recorded();
    assert_eq!(sent[0].method, Method::PUT);
    assert_eq!(sent[0].path, "mahasiswa/1");
    assert_eq!(sent[0].json()["jenis_kelamin"], false);
}

#[tokio::test]
async fn faculty_create_sends_null_for_empty_identifiers() {
    let harness = Harness::start().await;
    harness.login().await;

    let form = multipart::Form::new()
        .text("nama_lengkap", "Dr. Rahmat Hidayat")
        .text("nidn", "")
        .text("nip", "")
        .text("tmt", "")
        .text("jenis_kelamin", "1")
        .text("jabatan_fungsional", "lektor")
        .text("kelompok_keahlian_id", "2")
        .text("status", "aktif");
    let response = harness
        .client
        .post(harness.url("/dashboard/dosen/create"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard/dosen");

    let sent = harness.mock.recorded();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::POST);
    assert_eq!(sent[0].path, "dosens");
    let body = sent[0].json();
    assert_eq!(body["nidn"], Value::Null);
    assert_eq!(body["nip"], Value::Null);
    assert_eq!(body["tmt"], Value::Null);
    assert_eq!(body["kelompok_keahlian_id"], 2);
    assert_eq!(body["jabatan_fungsional"], "lektor");

    let page = harness.get("/dashboard/dosen").await.text().await.unwrap();
    assert!(page.contains("Berhasil menambah dosen baru!"));
}

#[tokio::test]
async fn faculty_update_with_photo_is_a_spoofed_put() {
    let harness = Harness::start().await;
    harness.login().await;

    let photo = multipart::Part::bytes(PNG_MAGIC.to_vec()).file_name("rahmat.png");
    let form = multipart::Form::new()
        .text("nama_lengkap", "Dr. Rahmat Hidayat")
        .text("jabatan_fungsional", "lektor kepala")
        .text("status", "cuti")
        .part("foto", photo);
    let response = harness
        .client
        .post(harness.url("/dashboard/dosen/edit/4"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard/dosen");

    let sent = harness.mock.recorded();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::POST);
    assert_eq!(sent[0].path, "dosens/4");
    assert!(
        sent[0]
            .content_type
            .as_deref()
            .is_some_and(|ty| ty.starts_with("multipart/form-data"))
    );
    let body = String::from_utf8_lossy(&sent[0].body);
    assert!(body.contains(r#"name="_method""#));
    assert!(body.contains("PUT"));
    assert!(body.contains(r#"filename="rahmat.png""#));
    assert!(body.contains(r#"name="nidn""#));
}

#[tokio::test]
async fn non_image_upload_is_refused_before_the_api() {
    let harness = Harness::start().await;
    harness.login().await;

    let notes = multipart::Part::bytes(b"just some text".to_vec()).file_name("notes.txt");
    let form = multipart::Form::new()
        .text("nama_lengkap", "Dr. Rahmat Hidayat")
        .part("foto", notes);
    let response = harness
        .client
        .post(harness.url("/dashboard/dosen/create"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("Foto harus berupa file gambar.")
    );

    assert!(
        harness
            .mock
            .recorded()
            .iter()
            .all(|recorded| recorded.method == Method::GET)
    );
}

#[tokio::test]
async fn faculty_list_and_edit_form_use_lookups() {
    let harness = Harness::start().await;
    harness.login().await;

    let fragment = harness.get("/internal/faculty").await.text().await.unwrap();
    assert!(fragment.contains("Dr. Rahmat Hidayat"));
    assert!(fragment.contains("0011223344"));
    assert!(fragment.contains("LEKTOR"));

    let page = harness.get("/dashboard/dosen/edit/4").await.text().await.unwrap();
    assert!(page.contains("Rekayasa Perangkat Lunak"));
    assert!(page.contains(r#"<option value="2" selected>"#));
    assert!(page.contains(r#"enctype="multipart/form-data""#));
}

#[tokio::test]
async fn logout_forgets_the_session() {
    let harness = Harness::start().await;
    harness.login().await;

    let response = harness.htmx(Method::POST, "/logout").await;
    assert_eq!(hx_header(&response, "HX-Redirect"), "/login");

    let response = harness.get("/dashboard").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn login_refuses_next_with_control_characters() {
    let harness = Harness::start().await;

    for next in ["/\t/evil.test", "/\nx", "//evil.test", "https://evil.test"] {
        let response = harness
            .client
            .post(harness.url("/login"))
            .form(&[
                ("email", "admin@kampus.test"),
                ("password", "rahasia"),
                ("next", next),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{next:?}");
        assert_eq!(location(&response), "/dashboard", "{next:?}");
    }
}

#[tokio::test]
async fn unreachable_api_is_reported_without_losing_input() {
    let mut harness = Harness::start().await;
    harness.login().await;
    harness.take_api_offline().await;

    let fragment = harness.get("/internal/students").await.text().await.unwrap();
    assert!(fragment.contains(LOAD_FAILED));

    let response = harness
        .client
        .post(harness.url("/dashboard/create"))
        .form(&[
            ("nim", "2102"),
            ("nama", "Budi"),
            ("email", "budi@kampus.test"),
            ("jenis_kelamin", "1"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let page = response.text().await.unwrap();
    assert!(page.contains(CONNECTIVITY_MESSAGE));
    assert!(page.contains(r#"value="Budi""#));

    let response = harness
        .client
        .post(harness.url("/login"))
        .form(&[("email", "admin@kampus.test"), ("password", "rahasia")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let page = response.text().await.unwrap();
    assert!(page.contains(UNREACHABLE_MESSAGE));
    assert!(page.contains(r#"value="admin@kampus.test""#));
}

#[tokio::test]
async fn one_failed_lookup_abandons_the_whole_editor() {
    let harness = Harness::start().await;
    harness.login().await;
    harness.mock.fail_lookups.store(true, Ordering::SeqCst);

    let response = harness.get("/dashboard/dosen/edit/4").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let page = response.text().await.unwrap();
    assert!(page.contains(LOAD_FAILED));
    assert!(!page.contains("<form"));
    assert!(!page.contains("Dr. Rahmat Hidayat"));

    let response = harness.get("/dashboard/dosen/create").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().await.unwrap().contains("<form"));
}

#[tokio::test]
async fn transport_failures_skip_the_lookup_refetch() {
    let closed = closed_port().await;
    let source = Client::new()
        .get(format!("http://{closed}/api/program-studis"))
        .send()
        .await
        .unwrap_err();
    assert!(!worth_refetching(&KampusError::Transport { source }));

    assert!(worth_refetching(&KampusError::Api {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        field: Some("nim".into()),
        message: "NIM sudah dipakai".into(),
    }));
}

#[tokio::test]
async fn rejected_faculty_edit_keeps_the_current_photo() {
    let harness = Harness::start().await;
    harness.login().await;
    harness.mock.reject_writes.store(true, Ordering::SeqCst);

    let form = multipart::Form::new()
        .text("nama_lengkap", "Dr. Rahmat H.")
        .text("nidn", "0011223344")
        .text("jabatan_fungsional", "lektor")
        .text("status", "aktif");
    let response = harness
        .client
        .post(harness.url("/dashboard/dosen/edit/4"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let page = response.text().await.unwrap();
    assert!(page.contains("NIDN sudah terdaftar"));
    assert!(page.contains(r#"value="Dr. Rahmat H.""#));
    assert!(page.contains(r#"src="http://cdn.test/rahmat.jpg""#));
    assert!(page.contains("Rekayasa Perangkat Lunak"));
}
