//! Keystone session establishment.
//!
//! Credentials and scope come from the standard `OS_*` environment variables.
//! A password authentication request against `{OS_AUTH_URL}/auth/tokens`
//! yields the subject token plus the service catalog, from which the
//! block-storage endpoint for the configured region and interface is picked.

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{http_reason, CliError};

const TOKEN_HEADER: &str = "x-auth-token";
const SUBJECT_TOKEN_HEADER: &str = "x-subject-token";

/// Session parameters read from the environment.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub project_domain_id: Option<String>,
    pub project_domain_name: Option<String>,
    pub user_domain_id: Option<String>,
    pub user_domain_name: Option<String>,
    pub region: String,
    pub interface: String,
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, CliError> {
        Ok(Self {
            auth_url: require("OS_AUTH_URL")?,
            username: require("OS_USERNAME")?,
            password: require("OS_PASSWORD")?,
            project_id: env::var("OS_PROJECT_ID").ok(),
            project_name: env::var("OS_PROJECT_NAME").ok(),
            project_domain_id: env::var("OS_PROJECT_DOMAIN_ID").ok(),
            project_domain_name: env::var("OS_PROJECT_DOMAIN_NAME").ok(),
            user_domain_id: env::var("OS_USER_DOMAIN_ID").ok(),
            user_domain_name: env::var("OS_USER_DOMAIN_NAME").ok(),
            region: env::var("OS_REGION_NAME").unwrap_or_else(|_| "RegionOne".to_string()),
            interface: env::var("OS_INTERFACE").unwrap_or_else(|_| "public".to_string()),
        })
    }

    fn auth_payload(&self) -> AuthRequest<'_> {
        let scope = if self.project_id.is_some() || self.project_name.is_some() {
            Some(Scope {
                project: ProjectScope {
                    id: self.project_id.as_deref(),
                    name: self.project_name.as_deref(),
                    domain: domain_ref(
                        self.project_domain_id.as_deref(),
                        self.project_domain_name.as_deref(),
                    ),
                },
            })
        } else {
            None
        };
        AuthRequest {
            auth: AuthSection {
                identity: Identity {
                    methods: ["password"],
                    password: PasswordMethod {
                        user: User {
                            name: &self.username,
                            password: &self.password,
                            domain: domain_ref(
                                self.user_domain_id.as_deref(),
                                self.user_domain_name.as_deref(),
                            ),
                        },
                    },
                },
                scope,
            },
        }
    }
}

fn require(name: &'static str) -> Result<String, CliError> {
    env::var(name).map_err(|_| CliError::MissingEnv(name))
}

fn domain_ref<'a>(id: Option<&'a str>, name: Option<&'a str>) -> Option<DomainRef<'a>> {
    if id.is_none() && name.is_none() {
        None
    } else {
        Some(DomainRef { id, name })
    }
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    auth: AuthSection<'a>,
}

#[derive(Serialize)]
struct AuthSection<'a> {
    identity: Identity<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<Scope<'a>>,
}

#[derive(Serialize)]
struct Identity<'a> {
    methods: [&'static str; 1],
    password: PasswordMethod<'a>,
}

#[derive(Serialize)]
struct PasswordMethod<'a> {
    user: User<'a>,
}

#[derive(Serialize)]
struct User<'a> {
    name: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<DomainRef<'a>>,
}

#[derive(Serialize)]
struct DomainRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct Scope<'a> {
    project: ProjectScope<'a>,
}

#[derive(Serialize)]
struct ProjectScope<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<DomainRef<'a>>,
}

#[derive(Deserialize)]
struct TokenReply {
    token: TokenPayload,
}

#[derive(Deserialize)]
struct TokenPayload {
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Deserialize)]
struct CatalogEndpoint {
    interface: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    region_id: Option<String>,
    url: String,
}

/// An authenticated control-plane session: the selected block-storage
/// endpoint, the subject token, and the HTTP client carrying both.
#[derive(Debug, Clone)]
pub struct Session {
    pub endpoint: String,
    pub token: String,
    client: Client,
}

impl Session {
    /// Build a session around an already-known endpoint and token.
    pub fn new(endpoint: &str, token: &str) -> Result<Self, CliError> {
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client: Client::builder().build()?,
        })
    }

    /// Authenticate with Keystone and locate the block-storage endpoint.
    pub async fn establish(config: &SessionConfig) -> Result<Self, CliError> {
        let client = Client::builder().build()?;
        let url = format!("{}/auth/tokens", config.auth_url.trim_end_matches('/'));
        let reply = client.post(&url).json(&config.auth_payload()).send().await?;
        let status = reply.status();
        if !status.is_success() {
            return Err(CliError::AuthFailed {
                status: status.as_u16(),
                reason: http_reason(status),
            });
        }
        let token = reply
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(CliError::TokenMissing)?;
        let body: TokenReply = reply.json().await?;
        let endpoint = select_endpoint(&body.token.catalog, &config.region, &config.interface)
            .ok_or_else(|| CliError::EndpointNotFound {
                interface: config.interface.clone(),
                region: config.region.clone(),
            })?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    pub async fn get(&self, url: &str) -> Result<Response, CliError> {
        Ok(self
            .client
            .get(url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?)
    }

    pub async fn post_json<T: Serialize>(&self, url: &str, body: &T) -> Result<Response, CliError> {
        Ok(self
            .client
            .post(url)
            .header(TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await?)
    }
}

fn select_endpoint(catalog: &[CatalogEntry], region: &str, interface: &str) -> Option<String> {
    catalog
        .iter()
        .filter(|entry| {
            entry.service_type == "volumev3" || entry.service_type == "block-storage"
        })
        .flat_map(|entry| entry.endpoints.iter())
        .find(|ep| {
            ep.interface == interface
                && (ep.region.as_deref() == Some(region) || ep.region_id.as_deref() == Some(region))
        })
        .map(|ep| ep.url.clone())
}
