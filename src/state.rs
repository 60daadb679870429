use std::sync::Arc;

use crate::application::auth_service::{AuthService, SessionKeys};
use crate::application::catalog_service::CatalogService;
use crate::application::order_service::OrderService;
use crate::application::payment_handoff::PaymentHandoff;
use crate::application::payment_reconciler::PaymentReconciler;
use crate::config::Settings;
use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::{AdminRepository, OrderRepository, PaymentGateway, ProductCatalog};
use crate::infrastructure::admin_repo::DieselAdminRepository;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::paddle::PaddleGateway;
use crate::infrastructure::product_repo::DieselProductCatalog;

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub handoff: PaymentHandoff,
    pub reconciler: PaymentReconciler,
    pub auth: AuthService,
    pub paddle_client_token: Option<String>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        orders: Arc<dyn OrderRepository>,
        admins: Arc<dyn AdminRepository>,
        gateway: Option<Arc<dyn PaymentGateway>>,
        keys: SessionKeys,
        paddle_client_token: Option<String>,
    ) -> Self {
        let order_service = OrderService::new(catalog.clone(), orders);
        Self {
            catalog: CatalogService::new(catalog.clone()),
            handoff: PaymentHandoff::new(catalog),
            reconciler: PaymentReconciler::new(order_service.clone(), gateway),
            orders: order_service,
            auth: AuthService::new(admins, keys),
            paddle_client_token,
        }
    }

    /// Wire the Diesel repositories and, when a key is configured, the Paddle client.
    pub fn from_settings(pool: DbPool, settings: &Settings) -> Result<Self, DomainError> {
        let gateway: Option<Arc<dyn PaymentGateway>> =
            match (&settings.paddle_api_key, settings.resolved_paddle_api_base()) {
                (Some(key), Some(base)) => Some(Arc::new(PaddleGateway::new(
                    key.clone(),
                    &base,
                    settings.paddle_timeout,
                )?)),
                _ => None,
            };

        let keys = match &settings.session_secret {
            Some(secret) => SessionKeys::from_secret(secret.as_bytes()),
            None => {
                log::warn!("SESSION_SECRET not set; admin sessions will not survive a restart");
                SessionKeys::random()
            }
        };

        Ok(Self::new(
            Arc::new(DieselProductCatalog::new(pool.clone())),
            Arc::new(DieselOrderRepository::new(pool.clone())),
            Arc::new(DieselAdminRepository::new(pool)),
            gateway,
            keys,
            settings.paddle_client_token.clone(),
        ))
    }
}
