use std::collections::HashMap;

use chrono::Utc;
use servicehub_core::{
    MarketError, NewServiceRequest, RequestStore, Result, ServiceRequest, StatusChange,
};
use tracing::{debug, info};

/// Process-lifetime request collection. Resets on restart.
#[derive(Debug, Default)]
pub struct InMemoryRequestStore {
    requests: Vec<ServiceRequest>,
    index: HashMap<String, usize>,
}

impl InMemoryRequestStore {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl RequestStore for InMemoryRequestStore {
    fn create(&mut self, fields: NewServiceRequest) -> Result<ServiceRequest> {
        fields.validate()?;
        if let Some(id) = fields.supplied_id() {
            if self.index.contains_key(id) {
                return Err(MarketError::DuplicateRequest(id.to_string()));
            }
        }

        let request = fields.into_request(Utc::now());
        self.index.insert(request.id.clone(), self.requests.len());
        self.requests.push(request.clone());

        info!(
            request_id = %request.id,
            service_id = %request.service_id,
            "service request created"
        );
        Ok(request)
    }

    fn get(&self, id: &str) -> Result<ServiceRequest> {
        self.index
            .get(id)
            .map(|&slot| self.requests[slot].clone())
            .ok_or_else(|| MarketError::not_found("Service request", id))
    }

    fn list(&self) -> Vec<ServiceRequest> {
        self.requests.clone()
    }

    fn update_status(&mut self, id: &str, change: StatusChange) -> Result<ServiceRequest> {
        let slot = *self
            .index
            .get(id)
            .ok_or_else(|| MarketError::not_found("Service request", id))?;
        let request = &mut self.requests[slot];

        if request.status != change.from {
            return Err(MarketError::InvalidState(format!(
                "request {id} is '{}', change expects '{}'",
                request.status, change.from
            )));
        }

        debug!(request_id = %id, from = %change.from, to = %change.to, "status persisted");
        request.status = change.to;
        request.history.push(change);
        Ok(request.clone())
    }
}
