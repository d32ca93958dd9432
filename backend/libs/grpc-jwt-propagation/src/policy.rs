//! Method-level access tables
//!
//! [`AccessPolicy`] is the server's view: fully-qualified method path to the set of roles
//! allowed to call it. [`AuthMethods`] is the client's mirror: the set of methods for which
//! a token must be attached. Both are built once at startup and never mutated.
//!
//! Keys must match the gRPC path convention verbatim (`/<package>.<Service>/<Method>`).
//! A method missing from a table is public; there is no deny-by-default.

use std::collections::{HashMap, HashSet};

/// Server-side role table, keyed by method path
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    routes: HashMap<String, HashSet<String>>,
}

impl AccessPolicy {
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    /// Roles allowed to call `method`, or `None` if the method is public
    pub fn required_roles(&self, method: &str) -> Option<&HashSet<String>> {
        self.routes.get(method)
    }

    pub fn is_protected(&self, method: &str) -> bool {
        self.routes.contains_key(method)
    }

    /// Protected method paths
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct AccessPolicyBuilder {
    routes: HashMap<String, HashSet<String>>,
}

impl AccessPolicyBuilder {
    /// Allow `roles` on `method`; repeated calls for the same method accumulate roles
    pub fn allow<I, R>(mut self, method: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.routes
            .entry(method.into())
            .or_default()
            .extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> AccessPolicy {
        AccessPolicy {
            routes: self.routes,
        }
    }
}

/// Client-side table of methods that need a token attached
#[derive(Debug, Clone, Default)]
pub struct AuthMethods {
    methods: HashSet<String>,
}

impl AuthMethods {
    pub fn new<I, M>(methods: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }

    /// Mirror every protected method of a server policy
    pub fn from_policy(policy: &AccessPolicy) -> Self {
        Self::new(policy.methods())
    }

    pub fn requires_auth(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATE: &str = "/pcbook.LaptopService/CreateLaptop";
    const RATE: &str = "/pcbook.LaptopService/RateLaptop";
    const SEARCH: &str = "/pcbook.LaptopService/SearchLaptop";

    fn policy() -> AccessPolicy {
        AccessPolicy::builder()
            .allow(CREATE, ["admin"])
            .allow(RATE, ["admin", "user"])
            .build()
    }

    #[test]
    fn test_absent_method_is_public() {
        let policy = policy();

        assert!(policy.required_roles(SEARCH).is_none());
        assert!(!policy.is_protected(SEARCH));
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let policy = policy();

        assert!(policy.is_protected(CREATE));
        assert!(!policy.is_protected("/pcbook.laptopservice/createlaptop"));
        assert!(!policy.is_protected("pcbook.LaptopService/CreateLaptop"));
        assert!(!policy.is_protected("/pcbook.LaptopService/CreateLaptop/"));
    }

    #[test]
    fn test_allow_accumulates_roles() {
        let policy = AccessPolicy::builder()
            .allow(RATE, ["admin"])
            .allow(RATE, ["user"])
            .build();

        let roles = policy.required_roles(RATE).expect("method should be protected");
        assert_eq!(roles.len(), 2);
        assert!(roles.contains("admin"));
        assert!(roles.contains("user"));
    }

    #[test]
    fn test_auth_methods_mirror_policy() {
        let methods = AuthMethods::from_policy(&policy());

        assert_eq!(methods.len(), 2);
        assert!(methods.requires_auth(CREATE));
        assert!(methods.requires_auth(RATE));
        assert!(!methods.requires_auth(SEARCH));
    }
}
