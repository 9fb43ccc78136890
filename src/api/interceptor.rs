//! Request interceptors.
//!
//! Default headers are owned by whoever registered them: the session
//! manager registers a [`BearerAuth`] on login and deregisters it on logout,
//! so there is no anonymous global header map to mutate.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::traits::Headers;

/// Header carrying the bearer credential.
pub const AUTHORIZATION: &str = "Authorization";

/// Format a bearer header value.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// A hook that adds headers to every outgoing request.
pub trait RequestInterceptor: Send + Sync {
    /// Name for logging.
    fn name(&self) -> &str;

    /// Add or overwrite headers for an outgoing request.
    fn intercept(&self, headers: &mut Headers);
}

/// Injects `Authorization: Bearer <token>`.
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

// Keep the token out of Debug output.
impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth").finish_non_exhaustive()
    }
}

impl RequestInterceptor for BearerAuth {
    fn name(&self) -> &str {
        "bearer-auth"
    }

    fn intercept(&self, headers: &mut Headers) {
        headers.insert(AUTHORIZATION.to_string(), bearer(&self.token));
    }
}

/// Handle returned by [`InterceptorChain::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterceptorId(u64);

/// Ordered set of interceptors shared by every clone of an `ApiClient`.
#[derive(Default)]
pub struct InterceptorChain {
    next_id: AtomicU64,
    entries: RwLock<Vec<(InterceptorId, Arc<dyn RequestInterceptor>)>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor; it runs after those already registered.
    pub fn register(&self, interceptor: Arc<dyn RequestInterceptor>) -> InterceptorId {
        let id = InterceptorId(self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!("Registering request interceptor '{}'", interceptor.name());
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, interceptor));
        id
    }

    /// Remove an interceptor. Returns false if it was already gone.
    pub fn deregister(&self, id: InterceptorId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|(entry_id, interceptor)| {
            let keep = *entry_id != id;
            if !keep {
                tracing::debug!("Deregistering request interceptor '{}'", interceptor.name());
            }
            keep
        });
        entries.len() != before
    }

    /// Run every interceptor over `headers`, in registration order.
    pub fn apply(&self, headers: &mut Headers) {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        for (_, interceptor) in entries.iter() {
            interceptor.intercept(headers);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let names: Vec<&str> = entries.iter().map(|(_, i)| i.name()).collect();
        f.debug_struct("InterceptorChain")
            .field("interceptors", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticHeader(&'static str, &'static str);

    impl RequestInterceptor for StaticHeader {
        fn name(&self) -> &str {
            "static"
        }

        fn intercept(&self, headers: &mut Headers) {
            headers.insert(self.0.to_string(), self.1.to_string());
        }
    }

    #[test]
    fn test_bearer_auth_sets_header() {
        let mut headers = Headers::new();
        BearerAuth::new("t1").intercept(&mut headers);
        assert_eq!(headers.get(AUTHORIZATION), Some(&"Bearer t1".to_string()));
    }

    #[test]
    fn test_bearer_auth_debug_hides_token() {
        let debug = format!("{:?}", BearerAuth::new("secret-token"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_register_and_deregister() {
        let chain = InterceptorChain::new();
        assert!(chain.is_empty());

        let id = chain.register(Arc::new(BearerAuth::new("t1")));
        assert_eq!(chain.len(), 1);

        let mut headers = Headers::new();
        chain.apply(&mut headers);
        assert_eq!(headers.get(AUTHORIZATION), Some(&"Bearer t1".to_string()));

        assert!(chain.deregister(id));
        assert!(!chain.deregister(id));
        assert!(chain.is_empty());

        let mut headers = Headers::new();
        chain.apply(&mut headers);
        assert!(headers.is_empty());
    }

    #[test]
    fn test_later_registration_wins() {
        let chain = InterceptorChain::new();
        chain.register(Arc::new(StaticHeader("X-Env", "first")));
        chain.register(Arc::new(StaticHeader("X-Env", "second")));

        let mut headers = Headers::new();
        chain.apply(&mut headers);
        assert_eq!(headers.get("X-Env"), Some(&"second".to_string()));
    }

    #[test]
    fn test_ids_are_unique() {
        let chain = InterceptorChain::new();
        let a = chain.register(Arc::new(StaticHeader("A", "1")));
        let b = chain.register(Arc::new(StaticHeader("B", "2")));
        assert_ne!(a, b);
        assert!(chain.deregister(a));
        assert_eq!(chain.len(), 1);
    }
}
