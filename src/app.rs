use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::access::{permissions, AccessService, MemoryPermissions, PermissionStore, ProfileRoles};
use crate::config::{AppConfig, ViewConfig};
use crate::database::{
    DatabaseManager, EntityStore, MemoryStore, PgAnalytics, PgEntityStore, PgPermissionStore, StoreError,
    ValidatedStore,
};
use crate::entities::{AuditPack, Entity, Evidence, Organization, Reminder, Task, UserProfile};
use crate::handlers;
use crate::middleware::{
    require_admin, require_customer, require_permission, require_platform_admin, session_middleware,
    RequiredPermission,
};
use crate::services::{AnalyticsRpc, AuditPackService, DashboardService, EvidenceService, StoreAnalytics};
use crate::storage::{LocalEntityStore, LocalStore};

/// Everything a request handler can reach
#[derive(Clone)]
pub struct AppState {
    pub access: Arc<AccessService>,
    pub tasks: Arc<dyn EntityStore<Task>>,
    pub reminders: Arc<dyn EntityStore<Reminder>>,
    pub organizations: Arc<dyn EntityStore<Organization>>,
    pub profiles: Arc<dyn EntityStore<UserProfile>>,
    pub evidence: Arc<EvidenceService>,
    pub audit_packs: Arc<AuditPackService>,
    pub dashboards: Arc<DashboardService>,
    pub views: ViewConfig,
    pub jwt_secret: Arc<str>,
}

/// Raw stores before the validation boundary is applied
struct Stores {
    tasks: Arc<dyn EntityStore<Task>>,
    reminders: Arc<dyn EntityStore<Reminder>>,
    organizations: Arc<dyn EntityStore<Organization>>,
    profiles: Arc<dyn EntityStore<UserProfile>>,
    evidence: Arc<dyn EntityStore<Evidence>>,
    audit_packs: Arc<dyn EntityStore<AuditPack>>,
}

impl AppState {
    /// Postgres-backed state when `DATABASE_URL` is set, otherwise in-memory
    /// stores. Evidence and audit packs always live in the local store.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let local = Arc::new(LocalStore::new(&config.storage.local_store_dir));
        let evidence: Arc<dyn EntityStore<Evidence>> = Arc::new(LocalEntityStore::new(local.clone()));
        let audit_packs: Arc<dyn EntityStore<AuditPack>> = Arc::new(LocalEntityStore::new(local));

        if !DatabaseManager::is_configured() {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            let stores = Stores {
                tasks: Arc::new(MemoryStore::new()),
                reminders: Arc::new(MemoryStore::new()),
                organizations: Arc::new(MemoryStore::new()),
                profiles: Arc::new(MemoryStore::new()),
                evidence,
                audit_packs,
            };
            return Ok(Self::assemble(stores, Arc::new(MemoryPermissions::default_catalog()), None, config));
        }

        let pool = DatabaseManager::pool().await?;
        let stores = Stores {
            tasks: pg_store(&pool).await?,
            reminders: pg_store(&pool).await?,
            organizations: pg_store(&pool).await?,
            profiles: pg_store(&pool).await?,
            evidence,
            audit_packs,
        };
        let permissions = Arc::new(PgPermissionStore::new(pool.clone()));
        let analytics: Arc<dyn AnalyticsRpc> = Arc::new(PgAnalytics::new(pool));

        Ok(Self::assemble(stores, permissions, Some(analytics), config))
    }

    /// Fully in-process state with the default permission catalog
    pub fn in_memory(config: &AppConfig) -> Self {
        let stores = Stores {
            tasks: Arc::new(MemoryStore::new()),
            reminders: Arc::new(MemoryStore::new()),
            organizations: Arc::new(MemoryStore::new()),
            profiles: Arc::new(MemoryStore::new()),
            evidence: Arc::new(MemoryStore::new()),
            audit_packs: Arc::new(MemoryStore::new()),
        };
        Self::assemble(stores, Arc::new(MemoryPermissions::default_catalog()), None, config)
    }

    fn assemble(
        stores: Stores,
        permissions: Arc<dyn PermissionStore>,
        analytics: Option<Arc<dyn AnalyticsRpc>>,
        config: &AppConfig,
    ) -> Self {
        let tasks = ValidatedStore::shared(stores.tasks);
        let reminders = ValidatedStore::shared(stores.reminders);
        let organizations = ValidatedStore::shared(stores.organizations);
        let profiles = ValidatedStore::shared(stores.profiles);
        let evidence = ValidatedStore::shared(stores.evidence);
        let audit_packs = ValidatedStore::shared(stores.audit_packs);

        let analytics = analytics.unwrap_or_else(|| {
            Arc::new(StoreAnalytics::new(
                profiles.clone(),
                organizations.clone(),
                tasks.clone(),
                evidence.clone(),
                permissions.clone(),
            )) as Arc<dyn AnalyticsRpc>
        });

        let access = Arc::new(AccessService::new(
            Arc::new(ProfileRoles::new(profiles.clone())),
            permissions,
            config.access.clone(),
        ));

        Self {
            access,
            dashboards: Arc::new(DashboardService::new(
                tasks.clone(),
                reminders.clone(),
                evidence.clone(),
                organizations.clone(),
                analytics,
                config.views.clone(),
            )),
            audit_packs: Arc::new(AuditPackService::new(tasks.clone(), evidence.clone(), audit_packs)),
            evidence: Arc::new(EvidenceService::new(evidence)),
            tasks,
            reminders,
            organizations,
            profiles,
            views: config.views.clone(),
            jwt_secret: Arc::from(config.security.jwt_secret.as_str()),
        }
    }
}

async fn pg_store<E: Entity>(pool: &sqlx::PgPool) -> Result<Arc<dyn EntityStore<E>>, StoreError> {
    let store = PgEntityStore::<E>::new(pool.clone());
    store.ensure_table().await?;
    Ok(Arc::new(store))
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .merge(session_routes())
        // Guarded tiers
        .merge(customer_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .merge(platform_routes(state.clone()))
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config))
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
                .layer(from_fn_with_state(state.clone(), session_middleware)),
        )
        .with_state(state)
}

fn session_routes() -> Router<AppState> {
    use handlers::session;

    Router::new().route("/api/session", get(session::show).post(session::sign_in).delete(session::sign_out))
}

fn customer_routes(state: AppState) -> Router<AppState> {
    use handlers::customer::{agenda, audit_packs, dashboard, evidence, reminders, tasks};

    Router::new()
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route("/api/tasks/:id", get(tasks::get).put(tasks::update).delete(tasks::delete))
        .route("/api/tasks/:id/complete", post(tasks::complete))
        .route("/api/tasks/:id/reopen", post(tasks::reopen))
        .route("/api/reminders", get(reminders::list).post(reminders::create))
        .route("/api/reminders/:id", get(reminders::get).put(reminders::update).delete(reminders::delete))
        .route("/api/evidence", get(evidence::list).post(evidence::upload))
        .route("/api/evidence/:id", delete(evidence::delete))
        .route("/api/agenda", get(agenda::get))
        .route("/api/dashboard", get(dashboard::get))
        .route("/api/audit-packs", get(audit_packs::list).post(audit_packs::generate))
        .route_layer(from_fn_with_state(state, require_customer))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    use handlers::admin::{dashboard, organizations, users};

    let users = Router::new()
        .route("/api/admin/users", get(users::list).post(users::create))
        .route("/api/admin/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route_layer(from_fn_with_state(
            RequiredPermission::new(state.clone(), permissions::USERS_MANAGE),
            require_permission,
        ));

    Router::new()
        .route("/api/admin/organizations", get(organizations::list).post(organizations::create))
        .route(
            "/api/admin/organizations/:id",
            get(organizations::get).put(organizations::update).delete(organizations::delete),
        )
        .route("/api/admin/dashboard", get(dashboard::get))
        .merge(users)
        .route_layer(from_fn_with_state(state, require_admin))
}

fn platform_routes(state: AppState) -> Router<AppState> {
    use handlers::platform;

    Router::new()
        .route("/api/platform/dashboard", get(platform::dashboard))
        .route("/api/platform/roles", get(platform::roles))
        .route("/api/platform/permissions", get(platform::permissions))
        .route_layer(from_fn_with_state(state, require_platform_admin))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }
    let origins: Vec<_> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
