//! Preview server implementation.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path as UrlPath, Query, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

use folio_core::{
    color_presets, layout_presets, typography_presets, ColorPreset, Customization,
    EditorSession, EffectiveTemplate, FileStore, LayoutPreset, PortfolioData, PortfolioStore,
    SessionError, TemplateCategory, TemplateConfig, TypographyPreset,
};
use folio_render::LiveRenderer;
use folio_static::templates::{DocumentContext, TemplateEngine};
use folio_static::{ExportOptions, ExportOutcome, SiteExporter};

use crate::autosave::{AutoSaver, SaveRequest, DEFAULT_QUIET_PERIOD};
use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, HmrHub, HmrMessage};

/// The editor session shared by every handler.
pub type SharedSession = Arc<RwLock<EditorSession>>;

/// Configuration for the preview server.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Directory holding the persisted session documents
    pub state_dir: PathBuf,

    /// Directory of extra template JSON files
    pub templates_dir: Option<PathBuf>,

    /// Directory served at `/assets` (images, videos)
    pub assets_dir: Option<PathBuf>,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Options for `/api/export`
    pub export: ExportOptions,

    /// Quiet period before edits are saved
    pub autosave: Duration,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(".folio"),
            templates_dir: None,
            assets_dir: None,
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
            export: ExportOptions::default(),
            autosave: DEFAULT_QUIET_PERIOD,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Failed to prepare state directory {0}: {1}")]
    StateError(PathBuf, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Shared server state.
#[derive(Clone)]
struct AppState {
    session: SharedSession,
    store: PortfolioStore,
    hmr: HmrHub,
    autosave: AutoSaver,
    export: ExportOptions,
    templates: Arc<TemplateEngine>,
}

/// Live preview server.
pub struct PreviewServer {
    config: PreviewConfig,
}

impl PreviewServer {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Start serving. Runs until the server stops.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let state_dir = &self.config.state_dir;
        std::fs::create_dir_all(state_dir)
            .map_err(|e| ServerError::StateError(state_dir.clone(), e.to_string()))?;

        let store = PortfolioStore::new(FileStore::new(state_dir));
        let session = EditorSession::restore(&store, self.config.templates_dir.as_deref());
        tracing::info!(
            "Editing '{}' with {} projects",
            session.config().template_id,
            session.data().projects.len()
        );

        let session = Arc::new(RwLock::new(session));
        let (autosave, _saver) =
            AutoSaver::spawn(Arc::clone(&session), store.clone(), self.config.autosave);

        let state = AppState {
            session,
            store,
            hmr: HmrHub::new(),
            autosave,
            export: self.config.export.clone(),
            templates: Arc::new(TemplateEngine::new()),
        };

        let (watcher, mut rx) =
            FileWatcher::new(state_dir).map_err(|e| ServerError::WatchError(e.to_string()))?;

        let watch_state = state.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&watch_state, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state, self.config.assets_dir.as_deref());

        tracing::info!("Starting preview server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

fn router(state: AppState, assets_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/__hmr", get(ws_handler))
        .route("/__hmr.js", get(hmr_script_handler))
        .route("/api/state", get(state_handler))
        .route("/api/templates", get(templates_handler))
        .route("/api/templates/custom", post(save_custom_handler))
        .route("/api/templates/custom/{id}", delete(remove_custom_handler))
        .route("/api/templates/import", post(import_template_handler))
        .route("/api/templates/{id}/duplicate", post(duplicate_handler))
        .route("/api/template", put(select_template_handler))
        .route("/api/config", get(export_config_handler).put(import_config_handler))
        .route("/api/customization", put(customization_handler))
        .route("/api/portfolio", put(portfolio_handler))
        .route("/api/export", get(export_handler));

    if let Some(dir) = assets_dir {
        app = app.nest_service("/assets", ServeDir::new(dir));
    }

    app.with_state(state)
}

/// Reload session documents edited on disk.
///
/// Content equal to the session, or to what the auto-saver last wrote, is
/// not an external edit: the latter is the echo of our own save and may
/// arrive after newer edits, so it must not replace them.
async fn handle_watch_event(state: &AppState, event: WatchEvent) {
    let mut session = state.session.write().await;

    match event {
        WatchEvent::ConfigChanged(path) => {
            let config = state.store.load_template_config();
            if &config == session.config() || state.autosave.wrote_config(&config) {
                return;
            }
            tracing::info!("Configuration changed: {}", path.display());
            session.replace_config(config);
        }

        WatchEvent::PortfolioChanged(path) => {
            let data = state.store.load_portfolio();
            if &data == session.data() || state.autosave.wrote_portfolio(&data) {
                return;
            }
            tracing::info!("Portfolio changed: {}", path.display());
            session.replace_portfolio(data);
        }

        WatchEvent::TemplatesChanged(path) => {
            let mut registry = session.registry().clone();
            state.store.load_custom_templates(&mut registry);
            let templates = registry.custom();
            if templates == session.registry().custom() || state.autosave.wrote_templates(templates)
            {
                return;
            }
            tracing::info!("Custom templates changed: {}", path.display());
            session.replace_custom_templates(templates.to_vec());
        }
    }

    state.hmr.send(HmrMessage::Reload);
}

/// Error body returned by the JSON API.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        let status = match e {
            SessionError::Stale { .. } => StatusCode::CONFLICT,
            SessionError::UnknownTemplate(_) => StatusCode::NOT_FOUND,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct PreviewQuery {
    project: Option<usize>,
}

/// The full preview document for the current session.
///
/// Uses the exported document shell; the variables live on the root
/// element's inline style, so only the rules go in the named `<style>`.
fn preview_document(
    engine: &TemplateEngine,
    session: &EditorSession,
    selected: Option<usize>,
) -> Result<String, ApiError> {
    let renderer = LiveRenderer::new(session.data(), session.effective());
    let name = session.data().personal.name.trim();
    let title = if name.is_empty() { "folio preview" } else { name };

    engine
        .render_document(&DocumentContext {
            title: title.to_string(),
            lang: "en".to_string(),
            style_id: Some("folio-rules".to_string()),
            css: renderer.theme().rules.clone(),
            body: renderer.to_html(selected),
            scripts: vec!["/__hmr.js".to_string()],
            ..Default::default()
        })
        .map_err(|e| ApiError::internal(e.to_string()))
}

/// Handler for the live preview page.
async fn index_handler(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Html<String>, ApiError> {
    let session = state.session.read().await;
    preview_document(&state.templates, &session, query.project).map(Html)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateResponse {
    revision: u64,
    config: TemplateConfig,
    data: PortfolioData,
    effective: EffectiveTemplate,
    variables: BTreeMap<String, String>,
}

async fn state_handler(State(state): State<AppState>) -> Json<StateResponse> {
    let session = state.session.read().await;
    let theme = folio_core::generate_theme(session.effective());

    Json(StateResponse {
        revision: session.revision(),
        config: session.config().clone(),
        data: session.data().clone(),
        effective: session.effective().clone(),
        variables: theme.variable_map(),
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateSummary {
    id: String,
    name: String,
    category: TemplateCategory,
    description: String,
    is_custom: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplatesResponse {
    selected: String,
    templates: Vec<TemplateSummary>,
    color_presets: Vec<ColorPreset>,
    typography_presets: Vec<TypographyPreset>,
    layout_presets: Vec<LayoutPreset>,
}

async fn templates_handler(State(state): State<AppState>) -> Json<TemplatesResponse> {
    let session = state.session.read().await;

    Json(TemplatesResponse {
        selected: session.config().template_id.clone(),
        templates: session
            .registry()
            .templates()
            .map(|t| TemplateSummary {
                id: t.id.clone(),
                name: t.name.clone(),
                category: t.category,
                description: t.description.clone(),
                is_custom: t.is_custom,
            })
            .collect(),
        color_presets: color_presets(),
        typography_presets: typography_presets(),
        layout_presets: layout_presets(),
    })
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct RevisionResponse {
    revision: u64,
}

#[derive(Debug, Deserialize)]
struct SelectTemplate {
    id: String,
}

async fn select_template_handler(
    State(state): State<AppState>,
    Json(body): Json<SelectTemplate>,
) -> Result<Json<RevisionResponse>, ApiError> {
    let revision = state.session.write().await.select_template(&body.id)?;

    state.autosave.request(SaveRequest::Config);
    state.hmr.send(HmrMessage::Reload);
    Ok(Json(RevisionResponse { revision }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomizationUpdate {
    based_on: u64,
    #[serde(default)]
    customization: Customization,
}

/// Replace the customization. Writes based on an outdated revision get 409.
///
/// When only the look changed, clients swap the theme in place; a change in
/// section placement needs a full reload.
async fn customization_handler(
    State(state): State<AppState>,
    Json(body): Json<CustomizationUpdate>,
) -> Result<Json<RevisionResponse>, ApiError> {
    let mut session = state.session.write().await;
    let before = session.effective().structure.clone();

    let revision = session.update_customization(body.based_on, body.customization)?;

    if session.effective().structure == before {
        let theme = folio_core::generate_theme(session.effective());
        state.hmr.send(HmrMessage::UpdateTheme {
            style: theme.inline_style(),
            rules: theme.rules,
        });
    } else {
        state.hmr.send(HmrMessage::Reload);
    }
    state.autosave.request(SaveRequest::Config);
    Ok(Json(RevisionResponse { revision }))
}

#[derive(Debug, Default, Deserialize)]
struct TemplateName {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct CreatedTemplate {
    id: String,
    revision: u64,
}

/// Save the current look as a custom template and select it.
async fn save_custom_handler(
    State(state): State<AppState>,
    Json(body): Json<TemplateName>,
) -> Json<CreatedTemplate> {
    let mut session = state.session.write().await;
    let id = session.save_as_custom(&body.name);

    state.autosave.request(SaveRequest::Templates);
    state.autosave.request(SaveRequest::Config);
    state.hmr.send(HmrMessage::Reload);
    Json(CreatedTemplate {
        id,
        revision: session.revision(),
    })
}

async fn duplicate_handler(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
    Json(body): Json<TemplateName>,
) -> Result<Json<CreatedTemplate>, ApiError> {
    let mut session = state.session.write().await;
    let id = session.duplicate_template(&id, &body.name)?;

    state.autosave.request(SaveRequest::Templates);
    Ok(Json(CreatedTemplate {
        id,
        revision: session.revision(),
    }))
}

/// Accept a custom template as raw JSON.
async fn import_template_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<StatusCode, ApiError> {
    if !state.session.write().await.import_template(&body) {
        return Err(ApiError::bad_request("Invalid template"));
    }

    state.autosave.request(SaveRequest::Templates);
    Ok(StatusCode::CREATED)
}

async fn remove_custom_handler(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<RevisionResponse>, ApiError> {
    let mut session = state.session.write().await;
    let selected = session.config().template_id == id;
    session.remove_template(&id)?;

    state.autosave.request(SaveRequest::Templates);
    if selected {
        state.autosave.request(SaveRequest::Config);
        state.hmr.send(HmrMessage::Reload);
    }
    Ok(Json(RevisionResponse {
        revision: session.revision(),
    }))
}

/// The current configuration, as a downloadable JSON document.
async fn export_config_handler(State(state): State<AppState>) -> impl IntoResponse {
    let json = state.session.read().await.export_config();
    ([(header::CONTENT_TYPE, "application/json")], json)
}

/// Replace the configuration with an imported one. Invalid documents are
/// rejected and leave the session untouched.
async fn import_config_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<RevisionResponse>, ApiError> {
    let mut session = state.session.write().await;
    if !session.import_config(&body) {
        return Err(ApiError::bad_request("Invalid configuration"));
    }

    state.autosave.request(SaveRequest::Config);
    state.hmr.send(HmrMessage::Reload);
    Ok(Json(RevisionResponse {
        revision: session.revision(),
    }))
}

async fn portfolio_handler(
    State(state): State<AppState>,
    Json(data): Json<PortfolioData>,
) -> Json<RevisionResponse> {
    let mut session = state.session.write().await;
    session.replace_portfolio(data);

    state.autosave.request(SaveRequest::Portfolio);
    state.hmr.send(HmrMessage::Reload);
    Json(RevisionResponse {
        revision: session.revision(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ExportQuery {
    #[serde(default)]
    single: bool,
}

async fn export_handler(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Json<ExportOutcome> {
    let session = state.session.read().await;
    let exporter = SiteExporter::new(ExportOptions {
        single_page: query.single || state.export.single_page,
        ..state.export.clone()
    });

    Json(exporter.try_export(session.data(), session.effective()))
}

/// Handler for the live reload WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state.hmr))
}

async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::warn!("Failed to encode message: {}", e);
            true
        }
    }
}

/// Forward hub messages to one client.
async fn handle_ws(mut socket: WebSocket, hmr: HmrHub) {
    let mut rx = hmr.subscribe();

    if !send_message(&mut socket, &HmrMessage::Connected).await {
        return;
    }

    loop {
        let msg = match rx.recv().await {
            Ok(msg) => msg,
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => HmrMessage::Reload,
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        };
        if !send_message(&mut socket, &msg).await {
            break;
        }
    }
}

async fn hmr_script_handler() -> impl IntoResponse {
    (
        [("content-type", "application/javascript")],
        hmr_client_script("/__hmr"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::template::ColorsPatch;
    use folio_core::{Project, TemplateRegistry};
    use pretty_assertions::assert_eq;
    use tokio_test::assert_ok;

    fn state() -> AppState {
        let mut data = PortfolioData::default();
        data.personal.name = "Ada".to_string();
        data.projects.push(Project {
            title: "Engine".to_string(),
            details: "Built the first program".to_string(),
            ..Default::default()
        });
        let session = EditorSession::new(TemplateRegistry::new(), TemplateConfig::default(), data);
        let session = Arc::new(RwLock::new(session));
        let store = PortfolioStore::in_memory();
        let (autosave, _) =
            AutoSaver::spawn(Arc::clone(&session), store.clone(), DEFAULT_QUIET_PERIOD);

        AppState {
            session,
            store,
            hmr: HmrHub::new(),
            autosave,
            export: ExportOptions::default(),
            templates: Arc::new(TemplateEngine::new()),
        }
    }

    fn config_event() -> WatchEvent {
        WatchEvent::ConfigChanged(PathBuf::from("folio.template-config.json"))
    }

    /// Let the auto-saver's quiet period pass.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1500)).await;
    }

    fn red() -> Customization {
        Customization {
            colors: Some(ColorsPatch {
                primary: Some("#ff0000".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = PreviewServer::new(PreviewConfig::default());
        assert_eq!(server.config.port, 7777);
        assert_eq!(server.config.autosave, Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn preview_opens_selected_project() {
        let state = state();

        let Html(closed) = assert_ok!(
            index_handler(State(state.clone()), Query(PreviewQuery::default())).await
        );
        let Html(open) =
            assert_ok!(index_handler(State(state), Query(PreviewQuery { project: Some(0) })).await);

        assert!(closed.contains("data-action=\"open-project\""));
        assert!(!closed.contains("project-overlay"));
        assert!(open.contains("project-overlay"));
        assert!(open.contains("Built the first program"));
        assert!(open.contains("<script src=\"/__hmr.js\"></script>"));
        assert!(open.contains("<style id=\"folio-rules\">"));
        assert!(open.contains("<title>Ada</title>"));
    }

    #[tokio::test]
    async fn customization_swaps_theme_in_place() {
        let state = state();
        let mut rx = state.hmr.subscribe();

        let Json(response) = assert_ok!(
            customization_handler(
                State(state.clone()),
                Json(CustomizationUpdate {
                    based_on: 0,
                    customization: red(),
                }),
            )
            .await
        );

        assert_eq!(response, RevisionResponse { revision: 1 });
        match rx.try_recv() {
            Ok(HmrMessage::UpdateTheme { style, .. }) => {
                assert!(style.contains("--color-primary: #ff0000"))
            }
            other => panic!("Expected UpdateTheme, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn stale_customization_conflicts() {
        let state = state();

        assert_ok!(
            select_template_handler(
                State(state.clone()),
                Json(SelectTemplate {
                    id: "minimal".to_string(),
                }),
            )
            .await
        );
        let result = customization_handler(
            State(state.clone()),
            Json(CustomizationUpdate {
                based_on: 0,
                customization: red(),
            }),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        let session = state.session.read().await;
        assert_eq!(session.config().template_id, "minimal");
        assert!(session.config().customization.is_empty());
    }

    #[tokio::test]
    async fn unknown_template_is_not_found() {
        let state = state();

        let err = select_template_handler(
            State(state),
            Json(SelectTemplate {
                id: "nope".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn own_saves_do_not_trigger_reload() {
        let state = state();
        let mut rx = state.hmr.subscribe();
        {
            let session = state.session.read().await;
            state.store.save_template_config(session.config()).unwrap();
        }

        handle_watch_event(&state, WatchEvent::ConfigChanged(PathBuf::from("x.json"))).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn external_portfolio_edit_reloads() {
        let state = state();
        let mut rx = state.hmr.subscribe();
        state.store.save_portfolio(&PortfolioData::default()).unwrap();

        handle_watch_event(&state, WatchEvent::PortfolioChanged(PathBuf::from("x.json"))).await;

        assert_eq!(rx.try_recv().ok(), Some(HmrMessage::Reload));
        assert!(state.session.read().await.data().projects.is_empty());
    }

    #[tokio::test]
    async fn exports_current_session() {
        let state = state();

        let Json(outcome) = export_handler(State(state), Query(ExportQuery::default())).await;

        assert!(outcome.success);
        let files = outcome.files.unwrap();
        assert!(files.contains("index.html"));
        assert!(files.contains("proyecto-engine.html"));
    }

    #[tokio::test]
    async fn state_reports_revision_and_variables() {
        let state = state();

        let Json(response) = state_handler(State(state)).await;

        assert_eq!(response.revision, 0);
        assert_eq!(response.config.template_id, "modern");
        assert!(response.variables.contains_key("--header-bg"));
    }

    #[tokio::test(start_paused = true)]
    async fn late_echo_of_own_save_keeps_newer_customization() {
        let state = state();
        state.autosave.request(SaveRequest::Config);
        settle().await;
        let mut rx = state.hmr.subscribe();

        assert_ok!(
            customization_handler(
                State(state.clone()),
                Json(CustomizationUpdate {
                    based_on: 0,
                    customization: red(),
                }),
            )
            .await
        );
        handle_watch_event(&state, config_event()).await;

        assert_eq!(state.session.read().await.effective().colors.primary, "#ff0000");
        assert!(matches!(rx.try_recv(), Ok(HmrMessage::UpdateTheme { .. })));
        assert!(rx.try_recv().is_err());

        settle().await;
        assert!(state.store.load_template_config().customization.colors.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn late_echo_of_own_save_keeps_newer_portfolio() {
        let state = state();
        state.autosave.request(SaveRequest::Portfolio);
        settle().await;

        let mut edited = state.session.read().await.data().clone();
        edited.personal.name = "Grace".to_string();
        portfolio_handler(State(state.clone()), Json(edited)).await;
        let mut rx = state.hmr.subscribe();
        handle_watch_event(&state, WatchEvent::PortfolioChanged(PathBuf::from("x.json"))).await;

        assert_eq!(state.session.read().await.data().personal.name, "Grace");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn external_config_edit_reloads() {
        let state = state();
        let mut rx = state.hmr.subscribe();
        state
            .store
            .save_template_config(&TemplateConfig::new("minimal"))
            .unwrap();

        handle_watch_event(&state, config_event()).await;

        assert_eq!(rx.try_recv().ok(), Some(HmrMessage::Reload));
        assert_eq!(state.session.read().await.effective().id, "minimal");
    }

    #[tokio::test]
    async fn external_custom_templates_reload() {
        let state = state();
        let mut rx = state.hmr.subscribe();
        let mut registry = TemplateRegistry::new();
        let id = registry.duplicate("creative", "Shared").unwrap().id.clone();
        state.store.save_custom_templates(&registry).unwrap();

        handle_watch_event(&state, WatchEvent::TemplatesChanged(PathBuf::from("x.json"))).await;

        assert_eq!(rx.try_recv().ok(), Some(HmrMessage::Reload));
        assert!(state.session.read().await.registry().get(&id).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn late_echo_of_own_save_keeps_new_custom_template() {
        let state = state();
        state.autosave.request(SaveRequest::Templates);
        settle().await;

        let Json(created) = save_custom_handler(
            State(state.clone()),
            Json(TemplateName {
                name: "Mine".to_string(),
            }),
        )
        .await;
        let mut rx = state.hmr.subscribe();
        handle_watch_event(&state, WatchEvent::TemplatesChanged(PathBuf::from("x.json"))).await;

        let session = state.session.read().await;
        assert!(session.registry().get(&created.id).is_some());
        assert_eq!(session.config().template_id, created.id);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn custom_templates_are_saved_and_removed() {
        let state = state();

        let Json(created) = save_custom_handler(
            State(state.clone()),
            Json(TemplateName {
                name: "Mine".to_string(),
            }),
        )
        .await;
        settle().await;

        assert_eq!(created.id, "custom-mine");
        assert_eq!(state.store.load_template_config().template_id, "custom-mine");
        let mut saved = TemplateRegistry::new();
        assert_eq!(state.store.load_custom_templates(&mut saved), 1);

        assert_ok!(remove_custom_handler(State(state.clone()), UrlPath(created.id.clone())).await);
        settle().await;

        assert_eq!(state.store.load_template_config().template_id, "modern");
        assert_eq!(state.store.load_custom_templates(&mut saved), 0);
        let err = remove_custom_handler(State(state), UrlPath(created.id))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicates_without_changing_selection() {
        let state = state();

        let Json(created) = assert_ok!(
            duplicate_handler(
                State(state.clone()),
                UrlPath("minimal".to_string()),
                Json(TemplateName::default()),
            )
            .await
        );

        let session = state.session.read().await;
        assert_eq!(session.config().template_id, "modern");
        assert!(session.registry().get(&created.id).unwrap().is_custom);
    }

    #[tokio::test]
    async fn rejects_invalid_template_import() {
        let state = state();

        let err = import_template_handler(State(state.clone()), "{\"id\": 1}".to_string())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(state.session.read().await.registry().custom().is_empty());
    }

    #[tokio::test]
    async fn config_export_imports_into_another_session() {
        let source = state();
        assert_ok!(
            customization_handler(
                State(source.clone()),
                Json(CustomizationUpdate {
                    based_on: 0,
                    customization: red(),
                }),
            )
            .await
        );
        let exported = source.session.read().await.export_config();

        let target = state();
        assert_ok!(import_config_handler(State(target.clone()), exported).await);
        let err = import_config_handler(State(target.clone()), "not json".to_string())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            target.session.read().await.config(),
            source.session.read().await.config()
        );
    }
}
