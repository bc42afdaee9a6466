//! Application state wiring all services together.
//!
//! Services are generic over the repository and verifier ports; the default
//! type parameters pin them to the concrete infra implementations. Router
//! tests substitute other implementations.
//!
//! A service that cannot be built (missing credentials, unusable database) is
//! left as `None` and its endpoints answer "not configured".

use std::path::PathBuf;
use std::sync::Arc;

use mirrorchat_core::auth::verifier::TokenVerifier;
use mirrorchat_core::chat::deletion::DeletionService;
use mirrorchat_core::chat::repository::MessageRepository;
use mirrorchat_core::chat::service::ConversationService;
use mirrorchat_core::profile::repository::ProfileRepository;
use mirrorchat_infra::auth::FirebaseTokenVerifier;
use mirrorchat_infra::config::ServerConfig;
use mirrorchat_infra::llm::create_provider;
use mirrorchat_infra::sqlite::message::SqliteMessageRepository;
use mirrorchat_infra::sqlite::pool::DatabasePool;
use mirrorchat_infra::sqlite::profile::SqliteProfileRepository;

/// Shared application state used by the HTTP handlers.
pub struct AppState<
    M = SqliteMessageRepository,
    P = SqliteProfileRepository,
    V = Arc<FirebaseTokenVerifier>,
> where
    M: MessageRepository,
    P: ProfileRepository,
    V: TokenVerifier,
{
    pub conversation: Option<Arc<ConversationService<M, P, V>>>,
    pub deletion: Option<Arc<DeletionService<M, P, V>>>,
    pub default_app_id: String,
    pub static_dir: Option<PathBuf>,
}

impl<M, P, V> Clone for AppState<M, P, V>
where
    M: MessageRepository,
    P: ProfileRepository,
    V: TokenVerifier,
{
    fn clone(&self) -> Self {
        Self {
            conversation: self.conversation.clone(),
            deletion: self.deletion.clone(),
            default_app_id: self.default_app_id.clone(),
            static_dir: self.static_dir.clone(),
        }
    }
}

impl<M, P, V> AppState<M, P, V>
where
    M: MessageRepository,
    P: ProfileRepository,
    V: TokenVerifier,
{
    /// The request's app id, or the configured default when absent or blank.
    pub fn app_id<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(id) if !id.trim().is_empty() => id,
            _ => &self.default_app_id,
        }
    }
}

impl AppState {
    /// Connect to the database and wire services from `config`.
    ///
    /// Never fails: every unavailable dependency is logged and disables the
    /// endpoints that need it.
    pub async fn init(config: &ServerConfig) -> Self {
        let mut state = Self {
            conversation: None,
            deletion: None,
            default_app_id: config.default_app_id.clone(),
            static_dir: config.static_dir.clone(),
        };

        let Some(project_id) = config.firebase_project_id.as_deref() else {
            tracing::error!(
                "FIREBASE_PROJECT_ID is not set; /chat and /delete-data are disabled"
            );
            return state;
        };

        if let Err(e) = tokio::fs::create_dir_all(&config.data_dir).await {
            tracing::warn!(
                path = %config.data_dir.display(),
                error = %e,
                "Could not create data directory"
            );
        }

        let pool = match DatabasePool::new(&config.database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open database; /chat and /delete-data are disabled");
                return state;
            }
        };

        let verifier = Arc::new(FirebaseTokenVerifier::new(project_id));

        state.deletion = Some(Arc::new(DeletionService::new(
            SqliteMessageRepository::new(pool.clone()),
            SqliteProfileRepository::new(pool.clone()),
            Arc::clone(&verifier),
        )));

        match create_provider(&config.gemini) {
            Ok(provider) => {
                tracing::info!(
                    provider = provider.name(),
                    model = provider.model(),
                    "LLM provider ready"
                );
                let service = ConversationService::new(
                    SqliteMessageRepository::new(pool.clone()),
                    SqliteProfileRepository::new(pool),
                    verifier,
                    provider,
                )
                .with_config(config.conversation.clone());
                state.conversation = Some(Arc::new(service));
            }
            Err(e) => {
                tracing::error!(error = %e, "GEMINI_API_KEY is not set; /chat is disabled");
            }
        }

        state
    }
}
