use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use bookshelf::{
    Author, Book, BookDraft, CatalogImporter, Config, ImportPolicy, SharedShelf, Shelf, ShelfError,
};

// === API Documentation ===

#[derive(OpenApi)]
#[openapi(
    paths(list_books, get_book, create_book, update_book, delete_book),
    components(schemas(Book, Author, BookDraft, ErrorResponse)),
    tags(
        (name = "books", description = "Book collection endpoints")
    )
)]
struct ApiDoc;

// === Shared State ===

#[derive(Clone)]
struct AppState {
    shelf: SharedShelf,
    importer: Arc<CatalogImporter>,
    /// With the on-list policy every list request re-imports first
    refresh_on_list: bool,
}

#[derive(Debug, Serialize, ToSchema)]
struct ErrorResponse {
    /// Error message
    error: String,
}

// === Helper Functions ===

fn error_response(err: ShelfError) -> Response {
    let status = match &err {
        ShelfError::BookNotFound(_) => StatusCode::NOT_FOUND,
        ShelfError::CatalogFetch(_)
        | ShelfError::CatalogStatus { .. }
        | ShelfError::CatalogDecode(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn join_error(err: tokio::task::JoinError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Task join error: {}", err),
        }),
    )
        .into_response()
}

// === Handlers ===

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books on the shelf", body = Vec<Book>),
        (status = 502, description = "Catalog import failed (on-list policy)", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn list_books(State(state): State<AppState>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        if state.refresh_on_list {
            // Fetch outside the lock, swap contents inside it
            let drafts = state.importer.fetch_works()?;
            let mut shelf = state.shelf.write().map_err(|_| ShelfError::LockPoisoned)?;
            Ok(shelf.restock(drafts))
        } else {
            let shelf = state.shelf.read().map_err(|_| ShelfError::LockPoisoned)?;
            Ok(shelf.list())
        }
    })
    .await;

    match result {
        Ok(Ok(books)) => (StatusCode::OK, Json(books)).into_response(),
        Ok(Err(e)) => error_response(e),
        Err(e) => join_error(e),
    }
}

/// Get a single book by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book identifier")
    ),
    responses(
        (status = 200, description = "The matching book", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let shelf = state.shelf.read().map_err(|_| ShelfError::LockPoisoned)?;
        shelf.get(&id).ok_or(ShelfError::BookNotFound(id))
    })
    .await;

    match result {
        Ok(Ok(book)) => (StatusCode::OK, Json(book)).into_response(),
        Ok(Err(e)) => error_response(e),
        Err(e) => join_error(e),
    }
}

/// Create a book from the request body
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookDraft,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 422, description = "Malformed request body"),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn create_book(
    State(state): State<AppState>,
    Json(draft): Json<BookDraft>,
) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let mut shelf = state.shelf.write().map_err(|_| ShelfError::LockPoisoned)?;
        Ok(shelf.create(draft))
    })
    .await;

    match result {
        Ok(Ok(book)) => (StatusCode::CREATED, Json(book)).into_response(),
        Ok(Err(e)) => error_response(e),
        Err(e) => join_error(e),
    }
}

/// Replace a book by id
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book identifier")
    ),
    request_body = BookDraft,
    responses(
        (status = 200, description = "Book replaced, id unchanged", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 422, description = "Malformed request body"),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<BookDraft>,
) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let mut shelf = state.shelf.write().map_err(|_| ShelfError::LockPoisoned)?;
        shelf.replace(&id, draft)
    })
    .await;

    match result {
        Ok(Ok(book)) => (StatusCode::OK, Json(book)).into_response(),
        Ok(Err(e)) => error_response(e),
        Err(e) => join_error(e),
    }
}

/// Delete a book by id
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book identifier")
    ),
    responses(
        (status = 200, description = "Remaining books, unchanged if the id was absent", body = Vec<Book>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn delete_book(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let mut shelf = state.shelf.write().map_err(|_| ShelfError::LockPoisoned)?;
        Ok(shelf.remove(&id))
    })
    .await;

    match result {
        Ok(Ok(books)) => (StatusCode::OK, Json(books)).into_response(),
        Ok(Err(e)) => error_response(e),
        Err(e) => join_error(e),
    }
}

// === Main ===

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Blocking client, built and used off the async runtime
    let importer = {
        let config = config.clone();
        Arc::new(tokio::task::spawn_blocking(move || CatalogImporter::new(&config)).await??)
    };

    let shelf = Shelf::new().into_shared();

    if config.import_policy == ImportPolicy::Startup {
        let seed_importer = Arc::clone(&importer);
        let drafts = tokio::task::spawn_blocking(move || seed_importer.fetch_works()).await?;

        match drafts {
            Ok(drafts) => {
                let mut guard = shelf.write().map_err(|_| ShelfError::LockPoisoned)?;
                let seeded = guard.restock(drafts);
                tracing::info!(count = seeded.len(), "seeded shelf from catalog");
            }
            Err(e) => {
                tracing::error!(error = %e, "startup catalog import failed");
                return Err(e.into());
            }
        }
    }

    let state = AppState {
        shelf,
        importer,
        refresh_on_list: config.import_policy == ImportPolicy::OnList,
    };

    let swagger = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    let app = Router::new()
        .merge(swagger)
        .route("/", get(|| async { Redirect::permanent("/swagger-ui") }))
        .route("/books", get(list_books))
        .route("/books", post(create_book))
        .route("/books/{id}", get(get_book))
        .route("/books/{id}", put(update_book))
        .route("/books/{id}", delete(delete_book))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_target()).await?;
    tracing::info!(addr = %config.bind_target(), "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
