use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::tempdir;

use railadmin_frontend::api::ApiClient;
use railadmin_frontend::config::AttachmentMode;
use railadmin_frontend::models::{NewsId, NewsPost};
use railadmin_frontend::news::{NewsCommand, NewsManager, PendingFile, UploadBatch};

#[derive(Default)]
struct FixtureState {
    posts: Vec<Value>,
    next_id: i64,
    branding: Option<Value>,
    fail: bool,
    uploads: Vec<(String, Vec<u8>)>,
    saved_bodies: Vec<Value>,
}

type Shared = Arc<Mutex<FixtureState>>;

fn failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "fixture failure").into_response()
}

async fn entreprise(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if state.fail {
        return failure();
    }
    match &state.branding {
        Some(settings) => Json(json!({ "entrepriseSettings": settings })).into_response(),
        None => Json(json!({})).into_response(),
    }
}

async fn list(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if state.fail {
        return failure();
    }
    Json(Value::Array(state.posts.clone())).into_response()
}

async fn create(State(state): State<Shared>, Json(mut body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail {
        return failure();
    }
    state.saved_bodies.push(body.clone());
    state.next_id += 1;
    body["id"] = json!(state.next_id);
    state.posts.insert(0, body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail {
        return failure();
    }
    state.saved_bodies.push(body.clone());
    body["id"] = json!(id);
    match state.posts.iter_mut().find(|post| post["id"] == json!(id)) {
        Some(slot) => {
            *slot = body.clone();
            Json(body).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn remove(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail {
        return failure();
    }
    let before = state.posts.len();
    state.posts.retain(|post| post["id"] != json!(id));
    if state.posts.len() == before {
        StatusCode::NOT_FOUND.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap().to_vec();
        let mut state = state.lock().unwrap();
        if state.fail {
            return failure();
        }
        state.uploads.push((name.clone(), bytes));
        let url = format!("/uploads/{}", state.uploads.len());
        return Json(json!({ "name": name, "url": url })).into_response();
    }
    (StatusCode::BAD_REQUEST, "missing file field").into_response()
}

/// Serves the fixture on an ephemeral port from a runtime of its own; the
/// blocking client must not run inside it.
fn spawn_fixture(state: Shared) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.set_nonblocking(true).expect("nonblocking listener");
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/api/entreprise", get(entreprise))
        .route("/api/actualites", get(list).post(create))
        .route("/api/actualites/:id", put(update).delete(remove))
        .route("/api/uploads", post(upload))
        .with_state(state);

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("fixture runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("fixture server");
        });
    });

    format!("http://{addr}")
}

fn fixture() -> (Shared, ApiClient) {
    let state: Shared = Arc::new(Mutex::new(FixtureState::default()));
    let base = spawn_fixture(state.clone());
    let client = ApiClient::with_timeout(base, Duration::from_secs(5)).expect("client");
    (state, client)
}

fn news_post(title: &str) -> NewsPost {
    NewsPost {
        title: title.into(),
        content: format!("{title} contenu"),
        ..NewsPost::default()
    }
}

#[test]
fn create_update_delete_roundtrip() {
    let (state, api) = fixture();
    assert!(api.list_news().unwrap().is_empty());

    let first = api.save_news(&news_post("Travaux")).unwrap();
    let second = api.save_news(&news_post("Grève")).unwrap();
    assert_eq!(first.id, Some(NewsId::Number(1)));
    assert_eq!(second.id, Some(NewsId::Number(2)));

    let mut edited = first.clone();
    edited.title = "Travaux prolongés".into();
    edited.scheduled = true;
    edited.date = Some("2026-11-02".into());
    let updated = api.save_news(&edited).unwrap();
    assert_eq!(updated.title, "Travaux prolongés");
    assert_eq!(updated.date.as_deref(), Some("2026-11-02"));

    let titles: Vec<_> = api.list_news().unwrap().into_iter().map(|p| p.title).collect();
    assert_eq!(titles, vec!["Grève", "Travaux prolongés"]);

    api.delete_news(&NewsId::Number(2)).unwrap();
    assert_eq!(api.list_news().unwrap().len(), 1);
    assert!(api.delete_news(&NewsId::Number(2)).is_err());

    // A draft without a date goes out with an explicit null.
    let state = state.lock().unwrap();
    let bodies = &state.saved_bodies;
    assert_eq!(bodies[0]["date"], Value::Null);
    assert_eq!(bodies[0]["attachments"], json!([]));
}

#[test]
fn update_of_unknown_post_is_an_error() {
    let (_state, api) = fixture();
    let mut ghost = news_post("Fantôme");
    ghost.id = Some(NewsId::Number(99));
    let err = api.save_news(&ghost).unwrap_err();
    assert!(format!("{err:#}").contains("404"));
}

#[test]
fn server_errors_surface_as_errors() {
    let (state, api) = fixture();
    state.lock().unwrap().fail = true;
    assert!(api.list_news().is_err());
    assert!(api.fetch_branding().is_err());
    assert!(api.save_news(&news_post("x")).is_err());
    assert!(api.delete_news(&NewsId::Number(1)).is_err());
}

#[test]
fn branding_uses_nested_settings_with_defaults() {
    let (state, api) = fixture();
    assert_eq!(api.fetch_branding().unwrap(), None);

    state.lock().unwrap().branding = Some(json!({
        "company_name": "RailCo",
        "primary_color": "#ff0000",
        "secondary_color": "",
        "custom_css": ":root { --accent-color: #123456; }"
    }));
    let branding = api.fetch_branding().unwrap().expect("settings");
    assert_eq!(branding.company_name, "RailCo");
    assert_eq!(branding.primary_color, "#ff0000");
    assert_eq!(branding.secondary_color, "#6c757d");
    assert_eq!(branding.font_family, "Inter");
    assert_eq!(branding.logo_url, "/images/sncf-logo.png");
}

#[test]
fn upload_batch_sends_display_names_in_order() {
    let (state, api) = fixture();
    let dir = tempdir().unwrap();
    let icon_path = dir.path().join("icon.png");
    let plan_path = dir.path().join("plan.pdf");
    std::fs::write(&icon_path, b"icon-bytes").unwrap();
    std::fs::write(&plan_path, b"plan-bytes").unwrap();

    let batch = UploadBatch {
        draft: news_post("Plan"),
        icon: Some(PendingFile::from_path(&icon_path)),
        attachments: vec![PendingFile::from_path(&plan_path).renamed("Plan du réseau.pdf")],
    };
    let files = api.upload_batch(&batch).unwrap();

    let icon = files.icon.expect("icon reference");
    assert_eq!(icon.name, "icon.png");
    assert_eq!(icon.url, format!("{}/uploads/1", api.base_url()));
    assert_eq!(files.attachments.len(), 1);
    assert_eq!(files.attachments[0].name, "Plan du réseau.pdf");
    assert_eq!(files.attachments[0].url, format!("{}/uploads/2", api.base_url()));

    let state = state.lock().unwrap();
    let uploads = &state.uploads;
    assert_eq!(uploads[0], ("icon.png".to_string(), b"icon-bytes".to_vec()));
    assert_eq!(uploads[1], ("Plan du réseau.pdf".to_string(), b"plan-bytes".to_vec()));
}

#[test]
fn upload_of_missing_file_aborts_batch() {
    let (state, api) = fixture();
    let batch = UploadBatch {
        draft: news_post("Plan"),
        icon: None,
        attachments: vec![PendingFile::from_path("/nonexistent/plan.pdf")],
    };
    assert!(api.upload_batch(&batch).is_err());
    assert!(state.lock().unwrap().uploads.is_empty());
}

#[test]
fn manager_two_phase_submission_against_server() {
    let (state, api) = fixture();
    let dir = tempdir().unwrap();
    let path = dir.path().join("horaires.pdf");
    std::fs::write(&path, b"pdf").unwrap();

    let mut manager = NewsManager::new(AttachmentMode::Upload);
    let Some(NewsCommand::List) = manager.begin_list() else {
        panic!("expected a list command");
    };
    manager.apply_listed(api.list_news());

    let form = manager.form_mut();
    form.title = "Horaires d'hiver".into();
    form.content = "Nouveaux horaires".into();
    form.select_attachments(vec![PendingFile::from_path(&path)]);

    let Some(NewsCommand::Upload(batch)) = manager.submit().unwrap() else {
        panic!("expected an upload command");
    };
    let Some(NewsCommand::Save(draft)) = manager.apply_uploaded(api.upload_batch(&batch)) else {
        panic!("expected a save command");
    };
    manager.apply_saved(draft.id.clone(), api.save_news(&draft));

    assert_eq!(manager.posts().len(), 1);
    let saved = &manager.posts()[0];
    assert_eq!(saved.id, Some(NewsId::Number(1)));
    assert_eq!(saved.attachments[0].name, "horaires.pdf");
    assert!(saved.attachments[0].url.starts_with("http://127.0.0.1:"));
    assert!(!manager.is_submitting());
    assert_eq!(state.lock().unwrap().uploads.len(), 1);
}
