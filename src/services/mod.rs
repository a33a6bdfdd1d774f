//! Business logic services

pub mod inventory;
pub mod requests;
pub mod stats;
pub mod users;

use crate::{
    config::{AuthConfig, InventoryConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub inventory: inventory::InventoryService,
    pub requests: requests::RequestsService,
    pub users: users::UsersService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        inventory_config: InventoryConfig,
    ) -> Self {
        Self {
            inventory: inventory::InventoryService::new(repository.clone(), inventory_config),
            requests: requests::RequestsService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), auth_config),
            stats: stats::StatsService::new(repository.clone()),
            repository,
        }
    }
}
