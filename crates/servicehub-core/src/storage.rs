use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewServiceRequest, ServiceRequest, StatusChange};

/// Owner of the service-request collection. Only `status` and `history`
/// change after creation, and only through `update_status`.
pub trait RequestStore {
    fn create(&mut self, fields: NewServiceRequest) -> Result<ServiceRequest>;
    fn get(&self, id: &str) -> Result<ServiceRequest>;
    fn list(&self) -> Vec<ServiceRequest>;
    fn update_status(&mut self, id: &str, change: StatusChange) -> Result<ServiceRequest>;
}

/// Host key-value persistence, used for profile and session fields.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}
