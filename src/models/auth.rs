use serde::{Deserialize, Serialize};

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Driver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Driver => "driver",
        }
    }
}

/// Conjunto de roles autorizados para una acción
#[derive(Debug, Clone, Copy)]
pub struct RoleSet {
    pub action: &'static str,
    roles: &'static [Role],
}

impl RoleSet {
    pub const fn new(action: &'static str, roles: &'static [Role]) -> Self {
        Self { action, roles }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Tabla de acceso por acción
pub mod access {
    use super::{Role, RoleSet};

    pub const VIEW_DASHBOARD: RoleSet = RoleSet::new("view dashboard", &[Role::Admin]);
    pub const MANAGE_STORES: RoleSet = RoleSet::new("manage stores", &[Role::Admin]);
    pub const MANAGE_DRIVERS: RoleSet = RoleSet::new("manage drivers", &[Role::Admin]);
    pub const MANAGE_VEHICLES: RoleSet = RoleSet::new("manage vehicles", &[Role::Admin]);
    pub const LIST_STORES: RoleSet = RoleSet::new("list stores", &[Role::Admin, Role::Driver]);
    pub const CREATE_OPERATION: RoleSet =
        RoleSet::new("create operation", &[Role::Admin, Role::Driver]);
    pub const VIEW_HISTORY: RoleSet = RoleSet::new("view history", &[Role::Admin, Role::Driver]);
    pub const VIEW_REPORTS: RoleSet = RoleSet::new("view reports", &[Role::Admin, Role::Driver]);
}
