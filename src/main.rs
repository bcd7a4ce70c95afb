use axum::{
    Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use bookguide::{
    ChatResponder, ChatTurn, Config, GenerationError, GuideGenerator, GuideRequest, LLMClient,
    LanguageModel, Section,
    models::{GuideType, RunStatus, SectionReply},
    utils::text,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Clone)]
struct AppState {
    generator: Arc<GuideGenerator>,
    responder: Arc<ChatResponder>,
}

impl AppState {
    fn new(model: Arc<dyn LanguageModel>, config: &Config) -> Self {
        Self {
            generator: Arc::new(GuideGenerator::new(model.clone(), config.guide.clone())),
            responder: Arc::new(ChatResponder::new(model, config.chat.clone())),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;
    let llm_client = Arc::new(LLMClient::new(&config.llm)?);
    tracing::info!(model = llm_client.model(), "language model client ready");

    let app = app(AppState::new(llm_client, &config));

    let listener = TcpListener::bind(&config.server.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/guides", post(create_guide))
        .route("/guides/sections/:section", post(regenerate_section))
        .route("/chat", post(chat))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        )
}

async fn index() -> Html<&'static str> {
    Html(
        r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Book Guide Service</title>
        <meta charset="utf-8">
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .endpoint { background-color: #f5f5f5; padding: 10px; margin: 10px 0; border-radius: 4px; font-family: monospace; }
        </style>
    </head>
    <body>
        <h1>Book Guide Service</h1>
        <p>Turns a plain-text book into a study guide and answers questions about it.</p>

        <h2>Available Endpoints:</h2>
        <div class="endpoint">GET /health - Health check</div>
        <div class="endpoint">POST /guides - multipart: text_file, title, author, language, guide_type</div>
        <div class="endpoint">POST /guides/sections/{chapters|synthesis|quiz} - regenerate one section</div>
        <div class="endpoint">POST /chat - JSON: book_content, question, language, history</div>

        <h2>Supported Languages:</h2>
        <p>en, es, zh, hi, ru. Other codes are answered in English.</p>
    </body>
    </html>
    "#,
    )
}

async fn health_check() -> &'static str {
    "OK"
}

enum ApiError {
    BadRequest(String),
    Generation(GenerationError),
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        ApiError::Generation(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Generation(e) => {
                let mut body = json!({
                    "status": RunStatus::Failed,
                    "error": e.to_string(),
                    "failed_sections": e.failed_sections(),
                });
                if let GenerationError::Incomplete { draft, .. } = &e {
                    let completed: BTreeMap<&str, &String> = Section::ALL
                        .into_iter()
                        .filter_map(|section| {
                            draft
                                .section(section)
                                .as_ref()
                                .ok()
                                .map(|content| (section.as_str(), content))
                        })
                        .collect();
                    body["completed_sections"] = json!(completed);
                }
                (StatusCode::BAD_GATEWAY, Json(body)).into_response()
            }
        }
    }
}

struct Upload {
    content: String,
    request: GuideRequest,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let bad = |e: axum::extract::multipart::MultipartError| ApiError::BadRequest(e.to_string());

    let mut content = None;
    let mut title = None;
    let mut author = None;
    let mut language = None;
    let mut guide_type = GuideType::Standard;

    while let Some(field) = multipart.next_field().await.map_err(bad)? {
        let name = field.name().unwrap_or("unknown").to_string();
        match name.as_str() {
            "text_file" => {
                let data = field.bytes().await.map_err(bad)?;
                let decoded = text::decode_upload(data.to_vec())
                    .map_err(|_| ApiError::BadRequest("book file is not valid UTF-8".into()))?;
                content = Some(decoded);
            }
            "title" => title = Some(field.text().await.map_err(bad)?),
            "author" => author = Some(field.text().await.map_err(bad)?),
            "language" => language = Some(field.text().await.map_err(bad)?),
            "guide_type" => {
                guide_type = field
                    .text()
                    .await
                    .map_err(bad)?
                    .parse()
                    .map_err(ApiError::BadRequest)?;
            }
            _ => {}
        }
    }

    let content = content.ok_or_else(|| ApiError::BadRequest("missing text_file".into()))?;
    let title = title
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing title".into()))?;

    Ok(Upload {
        content,
        request: GuideRequest {
            title,
            author: author.filter(|author| !author.trim().is_empty()),
            language: language.unwrap_or_else(|| "en".to_string()),
            guide_type,
        },
    })
}

async fn create_guide(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let upload = read_upload(multipart).await?;
    let guide = state
        .generator
        .generate(&upload.content, &upload.request)
        .await?;

    Ok(Json(json!({
        "status": RunStatus::Processed,
        "guide": guide,
    })))
}

async fn regenerate_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
    multipart: Multipart,
) -> Result<Json<SectionReply>, ApiError> {
    let section: Section = section.parse().map_err(ApiError::BadRequest)?;
    let upload = read_upload(multipart).await?;
    let reply = state
        .generator
        .generate_section(&upload.content, &upload.request, section)
        .await?;

    Ok(Json(reply))
}

#[derive(Deserialize)]
struct ChatRequest {
    book_content: String,
    question: String,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default)]
    history: Vec<ChatTurn>,
}

fn default_language() -> String {
    "en".to_string()
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.question.trim().is_empty() {
        return Err(ApiError::BadRequest("question is empty".into()));
    }

    let reply = state
        .responder
        .answer(
            &request.book_content,
            &request.question,
            &request.language,
            &request.history,
        )
        .await?;

    let language = reply.language;
    let language_fallback = reply.language_fallback;
    let turns = reply.into_turns(&request.question);

    Ok(Json(json!({
        "answer": turns[1].content,
        "language": language,
        "language_fallback": language_fallback,
        "turns": turns,
    })))
}
