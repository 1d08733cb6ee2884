//! HyperCLOVA X embedding configuration: model choice, credentials and API host.
//!
//! Values not passed to the builder are read from environment variables. The resulting
//! [`HyperClovaConfig`] is validated once and never changes afterwards.

use std::env;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use reqwest::header::HeaderValue;
use reqwest::Url;

use crate::error::{HyperClovaError, Result};

pub const API_KEY_ENV: &str = "NCP_CLOVASTUDIO_API_KEY";
pub const API_GATEWAY_KEY_ENV: &str = "NCP_APIGW_API_KEY";
pub const APP_ID_ENV: &str = "NCP_EMB_APP_ID";
pub const MODEL_ENV: &str = "NCP_EMB_MODEL";
pub const API_HOST_ENV: &str = "NCP_CLOVASTUDIO_API_HOST";

pub const DEFAULT_API_HOST: &str = "clovastudio.apigw.ntruss.com";

/// Embedding models served by the HyperCLOVA X embedding API tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HyperClovaModel {
    #[default]
    ClirEmbDolphin,
    ClirStsDolphin,
}

impl HyperClovaModel {
    pub const ALL: [HyperClovaModel; 2] = [Self::ClirEmbDolphin, Self::ClirStsDolphin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClirEmbDolphin => "clir-emb-dolphin",
            Self::ClirStsDolphin => "clir-sts-dolphin",
        }
    }
}

impl fmt::Display for HyperClovaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HyperClovaModel {
    type Err = HyperClovaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| {
                HyperClovaError::Configuration(format!(
                    "Invalid model '{}'. Choose from: {{'clir-emb-dolphin', 'clir-sts-dolphin'}}",
                    s
                ))
            })
    }
}

impl From<HyperClovaModel> for String {
    fn from(model: HyperClovaModel) -> Self {
        model.as_str().to_string()
    }
}

/// A credential that never shows up in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the plaintext value. Only for building request headers and URLs.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Validated, immutable client configuration.
#[derive(Debug, Clone)]
pub struct HyperClovaConfig {
    model: HyperClovaModel,
    api_key: SecretString,
    api_gateway_key: SecretString,
    app_id: SecretString,
    api_host: String,
    // Never holds the app id; the endpoint path is appended per request.
    base_url: Url,
    api_key_header: HeaderValue,
    api_gateway_key_header: HeaderValue,
}

impl HyperClovaConfig {
    pub fn builder() -> HyperClovaConfigBuilder {
        HyperClovaConfigBuilder::default()
    }

    /// Load everything from environment variables (defaults for model and host).
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    pub fn model(&self) -> HyperClovaModel {
        self.model
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn api_gateway_key(&self) -> &SecretString {
        &self.api_gateway_key
    }

    pub fn app_id(&self) -> &SecretString {
        &self.app_id
    }

    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// Full embedding endpoint URL. Contains the application id, so do not log it.
    ///
    /// Model and application id are percent-encoded as single path segments.
    pub fn endpoint_url(&self) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have a path, so this only fails for `cannot-be-a-base` URLs,
        // which `parse_base_url` rejects.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "testapp",
                "v1",
                "api-tools",
                "embedding",
                self.model.as_str(),
                self.app_id.expose_secret(),
            ]);
        }
        url
    }

    /// Sensitive header value for `X-NCP-CLOVASTUDIO-API-KEY`.
    pub(crate) fn api_key_header(&self) -> &HeaderValue {
        &self.api_key_header
    }

    /// Sensitive header value for `X-NCP-APIGW-API-KEY`.
    pub(crate) fn api_gateway_key_header(&self) -> &HeaderValue {
        &self.api_gateway_key_header
    }
}

/// Builder for [`HyperClovaConfig`]. Unset fields fall back to environment variables.
#[derive(Debug, Clone, Default)]
pub struct HyperClovaConfigBuilder {
    model: Option<String>,
    api_key: Option<SecretString>,
    api_gateway_key: Option<SecretString>,
    app_id: Option<SecretString>,
    api_host: Option<String>,
}

impl HyperClovaConfigBuilder {
    /// Model identifier; checked in `build`.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<SecretString>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn api_gateway_key(mut self, api_gateway_key: impl Into<SecretString>) -> Self {
        self.api_gateway_key = Some(api_gateway_key.into());
        self
    }

    pub fn app_id(mut self, app_id: impl Into<SecretString>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = Some(api_host.into());
        self
    }

    /// Resolve missing values from the process environment and validate.
    pub fn build(self) -> Result<HyperClovaConfig> {
        self.build_with_env(|name| env::var(name).ok())
    }

    /// Like [`build`](Self::build), but missing values are looked up through `lookup`
    /// instead of the process environment.
    pub fn build_with_env<F>(self, lookup: F) -> Result<HyperClovaConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = resolve_secret(self.api_key, API_KEY_ENV, "api_key", &lookup)?;
        let api_gateway_key = resolve_secret(
            self.api_gateway_key,
            API_GATEWAY_KEY_ENV,
            "api_gateway_key",
            &lookup,
        )?;
        let app_id = resolve_secret(self.app_id, APP_ID_ENV, "app_id", &lookup)?;

        let model = match self.model.or_else(|| lookup(MODEL_ENV)) {
            Some(model) => model.parse()?,
            None => HyperClovaModel::default(),
        };

        let api_host = self
            .api_host
            .filter(|h| !h.trim().is_empty())
            .or_else(|| lookup(API_HOST_ENV))
            .map(|h| h.trim().to_string())
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string());

        let base_url = parse_base_url(&api_host)?;
        let api_key_header = sensitive_header(API_KEY_ENV, &api_key)?;
        let api_gateway_key_header = sensitive_header(API_GATEWAY_KEY_ENV, &api_gateway_key)?;

        Ok(HyperClovaConfig {
            model,
            api_key,
            api_gateway_key,
            app_id,
            api_host,
            base_url,
            api_key_header,
            api_gateway_key_header,
        })
    }
}

fn resolve_secret<F>(
    explicit: Option<SecretString>,
    env_name: &str,
    field: &str,
    lookup: &F,
) -> Result<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .filter(|s| !s.expose_secret().trim().is_empty())
        .or_else(|| lookup(env_name).map(SecretString::from))
        .ok_or_else(|| {
            HyperClovaError::Configuration(format!(
                "{} is required: pass `{}` explicitly or set the {} environment variable",
                env_name, field, env_name
            ))
        })
}

/// A host with an explicit `http://` or `https://` scheme is taken as-is; a bare host is
/// reached over HTTPS. Plain HTTP is only allowed to loopback hosts (local mock servers),
/// since the request carries both keys in its headers.
fn parse_base_url(api_host: &str) -> Result<Url> {
    let raw = if api_host.starts_with("http://") || api_host.starts_with("https://") {
        api_host.to_string()
    } else {
        format!("https://{}", api_host)
    };
    let url = Url::parse(&raw).map_err(|e| {
        HyperClovaError::Configuration(format!("Invalid API host '{}': {}", api_host, e))
    })?;

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(HyperClovaError::Configuration(format!(
            "Invalid API host '{}'",
            api_host
        )));
    }
    if url.scheme() == "http" && !is_loopback(&url) {
        return Err(HyperClovaError::Configuration(format!(
            "Plain http is only allowed for loopback hosts, got '{}'; use https",
            api_host
        )));
    }
    Ok(url)
}

fn is_loopback(url: &Url) -> bool {
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false),
        None => false,
    }
}

fn sensitive_header(env_name: &str, secret: &SecretString) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(secret.expose_secret()).map_err(|_| {
        HyperClovaError::Configuration(format!(
            "{} contains characters not allowed in an HTTP header",
            env_name
        ))
    })?;
    value.set_sensitive(true);
    Ok(value)
}
