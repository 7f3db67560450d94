//! Server Configuration
//!
//! Everything comes from the environment (plus `.env` in development).
//! Configuration is resolved once at startup and the process refuses to
//! boot on a broken setup, except for the payments block: the site runs
//! fine without a gateway, so that block is optional as a whole. A
//! half-configured gateway is still a startup error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

/// Acquiring-gateway settings; present only when all three are set
#[derive(Clone, Debug)]
pub struct PaymentsConfig {
    /// Gateway merchant API base URL
    pub gateway_base_url: String,

    /// Merchant API token
    pub gateway_token: String,

    /// Shared secret for webhook signatures
    pub webhook_secret: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the server listens on
    pub bind_addr: String,

    /// External base URL, used to build redirect and webhook URLs
    pub public_base_url: String,

    /// Token required on administrative endpoints
    pub admin_token: String,

    /// Studio inbox for lead notifications
    pub contact_email: String,

    /// Payments block; `None` disables the payment-link endpoints
    pub payments: Option<PaymentsConfig>,
}

fn optional(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn resolve_payments(
    base_url: Option<String>,
    token: Option<String>,
    secret: Option<String>,
) -> Result<Option<PaymentsConfig>, ConfigError> {
    match (base_url, token, secret) {
        (Some(gateway_base_url), Some(gateway_token), Some(webhook_secret)) => {
            Ok(Some(PaymentsConfig {
                gateway_base_url,
                gateway_token,
                webhook_secret,
            }))
        }
        (None, None, None) => Ok(None),
        _ => Err(ConfigError::Invalid(
            "GATEWAY_*",
            "set all of GATEWAY_BASE_URL, GATEWAY_TOKEN, WEBHOOK_SECRET \
             or none of them"
                .into(),
        )),
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into());
        let public_base_url = optional("PUBLIC_BASE_URL")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let admin_token = required("ADMIN_TOKEN")?;
        if admin_token.len() < 16 {
            return Err(ConfigError::Invalid(
                "ADMIN_TOKEN",
                "must be at least 16 characters".into(),
            ));
        }

        let contact_email = optional("CONTACT_EMAIL").unwrap_or_else(|| "hello@studio.test".into());

        let payments = resolve_payments(
            optional("GATEWAY_BASE_URL"),
            optional("GATEWAY_TOKEN"),
            optional("WEBHOOK_SECRET"),
        )?;

        Ok(Self {
            bind_addr,
            public_base_url,
            admin_token,
            contact_email,
            payments,
        })
    }
}
