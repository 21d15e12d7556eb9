use canteen_auth::Role;
use canteen_core::CustomerId;

/// Authenticated identity for a request (customer + roles).
///
/// Inserted by the auth middleware; present on every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    customer_id: CustomerId,
    roles: Vec<Role>,
}

impl PrincipalContext {
    pub fn new(customer_id: CustomerId, roles: Vec<Role>) -> Self {
        Self { customer_id, roles }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| *r == Role::ADMIN)
    }
}
