//! Request context threaded explicitly through every tenant-scoped operation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// The already-resolved tenant and acting user for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
}

impl RequestContext {
    pub fn new(tenant_id: Uuid, actor_id: Uuid) -> Self {
        Self { tenant_id, actor_id }
    }

    /// Fail unless `tenant_id` belongs to this request's tenant.
    pub fn ensure_tenant(&self, tenant_id: Uuid) -> DomainResult<()> {
        if self.tenant_id == tenant_id {
            Ok(())
        } else {
            Err(DomainError::TenantMismatch {
                expected: self.tenant_id,
                actual: tenant_id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_tenant() {
        let tenant = Uuid::new_v4();
        let ctx = RequestContext::new(tenant, Uuid::new_v4());
        assert!(ctx.ensure_tenant(tenant).is_ok());
        assert!(matches!(
            ctx.ensure_tenant(Uuid::new_v4()),
            Err(DomainError::TenantMismatch { .. })
        ));
    }
}
