//! Hostname resolution.

use std::collections::BTreeSet;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ResolveError(pub String);

/// Maps a hostname to its addresses.
pub trait HostResolver: Send + Sync {
    /// Addresses as strings, sorted and without duplicates.
    fn resolve<'a>(&'a self, hostname: &'a str) -> BoxFuture<'a, Result<Vec<String>, ResolveError>>;
}

/// Resolver using the system's `getaddrinfo` through Tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve<'a>(&'a self, hostname: &'a str) -> BoxFuture<'a, Result<Vec<String>, ResolveError>> {
        async move {
            let addrs = tokio::net::lookup_host((hostname, 0))
                .await
                .map_err(|e| ResolveError(e.to_string()))?;

            let unique: BTreeSet<String> = addrs.map(|addr| addr.ip().to_string()).collect();
            Ok(unique.into_iter().collect())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_ip_literal() {
        let addrs = SystemResolver.resolve("127.0.0.1").await.unwrap();
        assert_eq!(addrs, vec!["127.0.0.1".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_name_fails() {
        let result = SystemResolver.resolve("no such host.invalid").await;
        assert!(result.is_err());
    }
}
