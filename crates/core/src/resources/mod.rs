//! Resource catalogue and generic handler logic
//!
//! The six resource kinds share one CRUD shape; they differ only in path
//! segment, credential class and whether the store-scope header applies.

pub mod batch;
pub mod diff;
pub mod import;

use ciam_domain::{impl_domain_enum_conversions, CredentialClass, HttpMethod, Operation};
use serde::{Deserialize, Serialize};

pub use batch::{run_batch, BatchReport};
pub use diff::{changed_fields, patch_body, FieldChange};
pub use import::{parse_user_import, UserImportFile};

/// Resource types exposed by the identity-management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Users,
    Groups,
    Orgs,
    Stores,
    Products,
    Clients,
}

impl_domain_enum_conversions!(ResourceKind {
    Users => "users",
    Groups => "groups",
    Orgs => "orgs",
    Stores => "stores",
    Products => "products",
    Clients => "clients",
});

impl ResourceKind {
    /// Singular noun for messages ("user", "org").
    pub const fn singular(&self) -> &'static str {
        match self {
            Self::Users => "user",
            Self::Groups => "group",
            Self::Orgs => "org",
            Self::Stores => "store",
            Self::Products => "product",
            Self::Clients => "client",
        }
    }

    pub const fn credential_class(&self) -> CredentialClass {
        match self {
            Self::Clients => CredentialClass::ClientOps,
            _ => CredentialClass::General,
        }
    }

    /// Stores are the store scope themselves; clients are tenant-wide.
    pub const fn requires_store_header(&self) -> bool {
        !matches!(self, Self::Stores | Self::Clients)
    }

    /// Whether `diff`/`apply` are offered.
    pub const fn supports_diff(&self) -> bool {
        matches!(self, Self::Orgs | Self::Stores)
    }

    pub fn list(&self) -> Operation {
        self.operation("list", HttpMethod::Get, false)
    }

    pub fn get(&self) -> Operation {
        self.operation("get", HttpMethod::Get, true)
    }

    pub fn create(&self) -> Operation {
        self.operation("create", HttpMethod::Post, false)
    }

    pub fn update(&self) -> Operation {
        self.operation("update", HttpMethod::Put, true)
    }

    pub fn patch(&self) -> Operation {
        self.operation("patch", HttpMethod::Patch, true)
    }

    pub fn delete(&self) -> Operation {
        self.operation("delete", HttpMethod::Delete, true)
    }

    fn operation(&self, action: &str, method: HttpMethod, by_id: bool) -> Operation {
        let path = if by_id { format!("/{}/{{id}}", self.as_str()) } else { format!("/{}", self.as_str()) };
        Operation::new(format!("{}.{action}", self.as_str()), method, path)
            .with_store_header(self.requires_store_header())
            .with_credential_class(self.credential_class())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn users_get_is_store_scoped_general() {
        let op = ResourceKind::Users.get();
        assert_eq!(op.name, "users.get");
        assert_eq!(op.method, HttpMethod::Get);
        assert_eq!(op.path, "/users/{id}");
        assert!(op.requires_store_header);
        assert_eq!(op.credential_class, CredentialClass::General);
    }

    #[test]
    fn stores_never_take_store_header() {
        for op in [
            ResourceKind::Stores.list(),
            ResourceKind::Stores.get(),
            ResourceKind::Stores.create(),
            ResourceKind::Stores.update(),
            ResourceKind::Stores.patch(),
            ResourceKind::Stores.delete(),
        ] {
            assert!(!op.requires_store_header, "{}", op.name);
        }
    }

    #[test]
    fn clients_use_clientops() {
        let op = ResourceKind::Clients.delete();
        assert_eq!(op.credential_class, CredentialClass::ClientOps);
        assert!(!op.requires_store_header);
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), "c-1".to_string());
        assert_eq!(op.render_path(&params).unwrap(), "/clients/c-1");
    }

    #[test]
    fn diff_only_for_orgs_and_stores() {
        let with_diff: Vec<_> = ResourceKind::ALL.iter().filter(|k| k.supports_diff()).collect();
        assert_eq!(with_diff, vec![&ResourceKind::Orgs, &ResourceKind::Stores]);
    }
}
