use crate::error::{RpcError, RpcResult};
use crate::handlers::UserHandler;
use crate::request::{parse_fields, parse_user_id, require_json};
use crate::response::{json_response, CreatedBody, MessageBody};

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use user_service::{messages, StoreConfig};

/// Address used when none is configured
pub const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 5000);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
            store: StoreConfig::default(),
        }
    }
}

pub struct RpcServer {
    config: ServerConfig,
    user_handler: UserHandler,
}

impl RpcServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            user_handler: UserHandler::with_config(config.store),
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn user_handler(&self) -> &UserHandler {
        &self.user_handler
    }

    pub fn router(&self) -> Router {
        router(self.user_handler.clone())
    }

    pub async fn bind(&self) -> io::Result<TcpListener> {
        TcpListener::bind(self.config.bind_addr).await
    }

    /// Serve requests on `listener` until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(
            %addr,
            id_policy = %self.config.store.id_policy,
            update_validation = %self.config.store.update_validation,
            "user directory listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("user directory stopped");
        Ok(())
    }
}

impl Default for RpcServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on Ctrl-C
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}

pub fn router(handler: UserHandler) -> Router {
    Router::new()
        .route(
            "/api/user",
            post(create_user)
                .get(list_users)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/user/:id",
            get(get_user)
                .put(update_user)
                .delete(delete_user)
                .fallback(method_not_allowed),
        )
        .fallback(unknown_route)
        .with_state(handler)
}

async fn create_user(
    State(handler): State<UserHandler>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> RpcResult<Response> {
    require_json(&headers)?;
    let fields = parse_fields(&read_body(body)?)?;
    let id = handler.create_user(fields)?;

    info!(user_id = id, "user created");
    Ok(json_response(
        StatusCode::CREATED,
        &CreatedBody {
            message: messages::USER_CREATED,
            id,
        },
    ))
}

async fn list_users(State(handler): State<UserHandler>) -> RpcResult<Response> {
    let users = handler.list_users()?;
    Ok(json_response(StatusCode::OK, &users))
}

async fn get_user(
    State(handler): State<UserHandler>,
    path: Result<Path<String>, PathRejection>,
) -> RpcResult<Response> {
    let user = handler.get_user(path_user_id(path)?)?;
    Ok(json_response(StatusCode::OK, &user))
}

async fn update_user(
    State(handler): State<UserHandler>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> RpcResult<Response> {
    let id = path_user_id(path)?;
    require_json(&headers)?;
    let fields = parse_fields(&read_body(body)?)?;
    handler.update_user(id, fields)?;

    info!(user_id = id, "user updated");
    Ok(json_response(
        StatusCode::OK,
        &MessageBody {
            message: messages::USER_UPDATED,
        },
    ))
}

async fn delete_user(
    State(handler): State<UserHandler>,
    path: Result<Path<String>, PathRejection>,
) -> RpcResult<Response> {
    let id = path_user_id(path)?;
    handler.delete_user(id)?;

    info!(user_id = id, "user deleted");
    Ok(json_response(
        StatusCode::OK,
        &MessageBody {
            message: messages::USER_DELETED,
        },
    ))
}

async fn unknown_route(uri: Uri) -> RpcError {
    RpcError::UnknownRoute(uri.path().to_string())
}

async fn method_not_allowed(method: Method) -> RpcError {
    RpcError::MethodNotAllowed(method.to_string())
}

/// A path segment that cannot even be decoded is no user id either
fn path_user_id(path: Result<Path<String>, PathRejection>) -> RpcResult<u64> {
    match path {
        Ok(Path(raw_id)) => parse_user_id(&raw_id),
        Err(rejection) => Err(RpcError::InvalidUserId(rejection.body_text())),
    }
}

fn read_body(body: Result<Bytes, BytesRejection>) -> RpcResult<Bytes> {
    body.map_err(|rejection| RpcError::BodyRejected(rejection.status(), rejection.body_text()))
}
