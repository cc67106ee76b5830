//! Backend route table.

use crate::domain::namespace::{ListScope, Namespace};
use crate::domain::resource::ResourceKind;

/// Login route of a namespace.
#[must_use]
pub const fn login(namespace: Namespace) -> &'static str {
    match namespace {
        Namespace::Company => "/auth/login",
        Namespace::Platform => "/superadmin/auth/login",
    }
}

/// Registration route of a namespace.
#[must_use]
pub const fn register(namespace: Namespace) -> &'static str {
    match namespace {
        Namespace::Company => "/auth/register",
        Namespace::Platform => "/superadmin/auth/register",
    }
}

/// Listing route of a collection within a scope.
#[must_use]
pub fn list(kind: ResourceKind, scope: &ListScope) -> String {
    match scope {
        ListScope::Company(id) => format!("/{}/compagnie/{id}", kind.collection()),
        ListScope::All => format!("/{}", kind.collection()),
    }
}

/// Creation route of a collection.
#[must_use]
pub fn create(kind: ResourceKind) -> String {
    format!("/{}", kind.collection())
}

/// Route of one record.
#[must_use]
pub fn record(kind: ResourceKind, id: &str) -> String {
    format!("/{}/{id}", kind.collection())
}

/// Dashboard route of a company.
#[must_use]
pub fn dashboard(company_id: &str) -> String {
    format!("/dashboard/compagnie/{company_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ResourceKind::Bus, ListScope::Company("c1".into()), "/buses/compagnie/c1")]
    #[test_case(ResourceKind::Payment, ListScope::Company("c1".into()), "/paiements/compagnie/c1")]
    #[test_case(ResourceKind::Company, ListScope::All, "/compagnies")]
    #[test_case(ResourceKind::ETicket, ListScope::All, "/ebills")]
    fn test_list_routes(kind: ResourceKind, scope: ListScope, expected: &str) {
        assert_eq!(list(kind, &scope), expected);
    }

    #[test]
    fn test_auth_routes_per_namespace() {
        assert_eq!(login(Namespace::Company), "/auth/login");
        assert_eq!(register(Namespace::Platform), "/superadmin/auth/register");
    }

    #[test]
    fn test_record_route() {
        assert_eq!(record(ResourceKind::Trip, "t9"), "/trajets/t9");
        assert_eq!(dashboard("c1"), "/dashboard/compagnie/c1");
    }
}
