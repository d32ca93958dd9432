//! Role table for the pcbook services

use crate::grpc::proto::methods;
use grpc_jwt_propagation::{AccessPolicy, AuthMethods};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Roles allowed per protected method; everything else, including Login, SearchLaptop
/// and the health service, is public
pub fn accessible_roles() -> AccessPolicy {
    AccessPolicy::builder()
        .allow(methods::CREATE_LAPTOP, [ROLE_ADMIN])
        .allow(methods::UPLOAD_IMAGE, [ROLE_ADMIN])
        .allow(methods::RATE_LAPTOP, [ROLE_ADMIN, ROLE_USER])
        .build()
}

/// Methods the client must attach a token to
pub fn auth_methods() -> AuthMethods {
    AuthMethods::from_policy(&accessible_roles())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_methods() {
        let policy = accessible_roles();

        assert!(!policy.is_protected(methods::LOGIN));
        assert!(!policy.is_protected(methods::SEARCH_LAPTOP));
        assert!(!policy.is_protected("/grpc.health.v1.Health/Check"));
    }

    #[test]
    fn test_protected_methods() {
        let policy = accessible_roles();

        let create = policy.required_roles(methods::CREATE_LAPTOP).unwrap();
        assert_eq!(create.len(), 1);
        assert!(create.contains(ROLE_ADMIN));

        let upload = policy.required_roles(methods::UPLOAD_IMAGE).unwrap();
        assert_eq!(upload.len(), 1);
        assert!(upload.contains(ROLE_ADMIN));

        let rate = policy.required_roles(methods::RATE_LAPTOP).unwrap();
        assert!(rate.contains(ROLE_ADMIN));
        assert!(rate.contains(ROLE_USER));
    }

    #[test]
    fn test_client_table_mirrors_server() {
        let methods_table = auth_methods();

        assert!(methods_table.requires_auth(methods::CREATE_LAPTOP));
        assert!(methods_table.requires_auth(methods::UPLOAD_IMAGE));
        assert!(methods_table.requires_auth(methods::RATE_LAPTOP));
        assert!(!methods_table.requires_auth(methods::SEARCH_LAPTOP));
        assert!(!methods_table.requires_auth(methods::LOGIN));
    }
}
