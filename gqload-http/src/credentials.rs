//! Endpoint and credential resolution

use crate::errors::HttpError;
use gqload_config::{CredentialsConfig, TargetConfig};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use url::Url;

/// Where one request goes and the headers it carries
#[derive(Debug, Clone)]
pub struct RequestTarget {
    pub url: Url,
    pub headers: HeaderMap,
}

/// Resolves the endpoint and picks a bearer token per request.
///
/// Header values are validated once at construction, so resolving is
/// infallible and does no allocation beyond cloning the header map.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    url: Url,
    base_headers: HeaderMap,
    authorizations: Vec<HeaderValue>,
}

impl CredentialResolver {
    pub fn from_config(target: &TargetConfig, credentials: &CredentialsConfig) -> Result<Self, HttpError> {
        let url = Url::parse(&target.url).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", target.url, e)))?;

        let mut base_headers = HeaderMap::new();
        base_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &target.channel_token {
            let name = HeaderName::from_bytes(target.channel_header.as_bytes())
                .map_err(|_| HttpError::InvalidHeaderName(target.channel_header.clone()))?;
            let value =
                HeaderValue::from_str(token).map_err(|_| HttpError::InvalidHeaderValue(target.channel_header.clone()))?;
            base_headers.insert(name, value);
        }

        let authorizations = credentials
            .tokens
            .iter()
            .map(|token| {
                let mut value = HeaderValue::from_str(&format!("{} {}", credentials.scheme, token))
                    .map_err(|_| HttpError::InvalidHeaderValue(AUTHORIZATION.to_string()))?;
                value.set_sensitive(true);
                Ok(value)
            })
            .collect::<Result<Vec<_>, HttpError>>()?;

        Ok(Self {
            url,
            base_headers,
            authorizations,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn token_count(&self) -> usize {
        self.authorizations.len()
    }

    /// Target for a request using the token at `index`, or no token at all
    pub fn target_for(&self, index: Option<usize>) -> RequestTarget {
        let mut headers = self.base_headers.clone();
        if let Some(value) = index.and_then(|i| self.authorizations.get(i)) {
            headers.insert(AUTHORIZATION, value.clone());
        }
        RequestTarget {
            url: self.url.clone(),
            headers,
        }
    }

    /// Target for a request using a uniformly chosen token.
    ///
    /// With an empty pool no Authorization header is sent.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> RequestTarget {
        let index = if self.authorizations.is_empty() {
            None
        } else {
            Some(rng.gen_range(0..self.authorizations.len()))
        };
        self.target_for(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn resolver(tokens: &[&str]) -> CredentialResolver {
        let target = TargetConfig {
            channel_token: Some("channel-1".to_string()),
            ..Default::default()
        };
        let credentials = CredentialsConfig {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        CredentialResolver::from_config(&target, &credentials).unwrap()
    }

    #[test]
    fn test_headers_for_token() {
        let resolver = resolver(&["alpha", "beta"]);
        let target = resolver.target_for(Some(1));

        assert_eq!(target.url.as_str(), "http://localhost:3000/shop-api");
        assert_eq!(target.headers[CONTENT_TYPE], "application/json");
        assert_eq!(target.headers["vendure-token"], "channel-1");
        assert_eq!(target.headers[AUTHORIZATION], "bearer beta");
    }

    #[test]
    fn test_empty_pool_sends_no_authorization() {
        let resolver = resolver(&[]);
        let mut rng = StdRng::seed_from_u64(1);
        let target = resolver.resolve(&mut rng);
        assert!(target.headers.get(AUTHORIZATION).is_none());
        assert_eq!(target.headers["vendure-token"], "channel-1");
    }

    #[test]
    fn test_resolve_draws_from_whole_pool() {
        let resolver = resolver(&["a", "b", "c"]);
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<_> = (0..200)
            .map(|_| resolver.resolve(&mut rng).headers[AUTHORIZATION].to_str().unwrap().to_string())
            .collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_same_seed_same_tokens() {
        let resolver = resolver(&["a", "b", "c", "d"]);
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| resolver.resolve(&mut rng).headers[AUTHORIZATION].clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let credentials = CredentialsConfig::default();

        let bad_url = TargetConfig {
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            CredentialResolver::from_config(&bad_url, &credentials),
            Err(HttpError::InvalidUrl(_))
        ));

        let bad_header = TargetConfig {
            channel_header: "bad header".to_string(),
            channel_token: Some("x".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            CredentialResolver::from_config(&bad_header, &credentials),
            Err(HttpError::InvalidHeaderName(_))
        ));

        let bad_token = CredentialsConfig {
            tokens: vec!["line\nbreak".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            CredentialResolver::from_config(&TargetConfig::default(), &bad_token),
            Err(HttpError::InvalidHeaderValue(_))
        ));
    }
}
