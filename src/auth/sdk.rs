// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity SDK interface.
//!
//! The wallet never runs the login protocol itself. It consumes an SDK that
//! performs the provider login, keeps the session and hands back the private
//! key of the logged-in user.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zeroize::Zeroizing;

use crate::blockchain::ChainConfig;

/// Identity SDK deployment the client id is registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthNetwork {
    #[default]
    SapphireDevnet,
    SapphireMainnet,
}

impl FromStr for AuthNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sapphire_devnet" => Ok(AuthNetwork::SapphireDevnet),
            "sapphire_mainnet" => Ok(AuthNetwork::SapphireMainnet),
            other => Err(format!(
                "unknown auth network `{other}` (expected sapphire_devnet or sapphire_mainnet)"
            )),
        }
    }
}

/// Parameters handed to the SDK on initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkInitParams {
    pub client_id: String,
    pub network: AuthNetwork,
    pub redirect_url: String,
}

/// Supported login providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginProvider {
    Google,
    Facebook,
    Reddit,
    Discord,
    Twitch,
    Apple,
    Line,
    Github,
    Kakao,
    Linkedin,
    Twitter,
    Weibo,
    Wechat,
    EmailPasswordless,
    SmsPasswordless,
    Jwt,
}

impl LoginProvider {
    pub const ALL: [LoginProvider; 16] = [
        LoginProvider::Google,
        LoginProvider::Facebook,
        LoginProvider::Reddit,
        LoginProvider::Discord,
        LoginProvider::Twitch,
        LoginProvider::Apple,
        LoginProvider::Line,
        LoginProvider::Github,
        LoginProvider::Kakao,
        LoginProvider::Linkedin,
        LoginProvider::Twitter,
        LoginProvider::Weibo,
        LoginProvider::Wechat,
        LoginProvider::EmailPasswordless,
        LoginProvider::SmsPasswordless,
        LoginProvider::Jwt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoginProvider::Google => "google",
            LoginProvider::Facebook => "facebook",
            LoginProvider::Reddit => "reddit",
            LoginProvider::Discord => "discord",
            LoginProvider::Twitch => "twitch",
            LoginProvider::Apple => "apple",
            LoginProvider::Line => "line",
            LoginProvider::Github => "github",
            LoginProvider::Kakao => "kakao",
            LoginProvider::Linkedin => "linkedin",
            LoginProvider::Twitter => "twitter",
            LoginProvider::Weibo => "weibo",
            LoginProvider::Wechat => "wechat",
            LoginProvider::EmailPasswordless => "email_passwordless",
            LoginProvider::SmsPasswordless => "sms_passwordless",
            LoginProvider::Jwt => "jwt",
        }
    }

    /// Passwordless providers need a login hint (email address or phone number).
    pub fn requires_hint(&self) -> bool {
        matches!(
            self,
            LoginProvider::EmailPasswordless | LoginProvider::SmsPasswordless
        )
    }
}

impl fmt::Display for LoginProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoginProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LoginProvider::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| format!("unknown login provider `{}`", s.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MfaLevel {
    #[default]
    Default,
    Optional,
    Mandatory,
    None,
}

/// Options for a login request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginParams {
    pub provider: LoginProvider,
    pub redirect_url: String,
    pub mfa_level: MfaLevel,
    /// Email address or phone number for passwordless logins.
    pub login_hint: Option<String>,
}

/// Profile of the logged-in user as reported by the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: Option<String>,
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub verifier: String,
    pub verifier_id: String,
    pub type_of_login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
    #[error("SDK not initialized")]
    NotInitialized,

    #[error("no active session")]
    NoSession,

    #[error("login failed: {0}")]
    Login(String),

    #[error("unsupported request method `{0}`")]
    UnsupportedMethod(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Other(String),
}

/// External identity SDK.
///
/// Implementations own login, session persistence and credential storage.
#[async_trait]
pub trait AuthSdk: Send + Sync {
    async fn init(&self, params: &SdkInitParams) -> Result<(), SdkError>;

    fn ready(&self) -> bool;

    fn connected(&self) -> bool;

    async fn login(&self, params: LoginParams) -> Result<(), SdkError>;

    async fn logout(&self) -> Result<(), SdkError>;

    async fn user_info(&self) -> Result<UserInfo, SdkError>;

    /// Hex encoded private key of the current session.
    async fn private_key(&self) -> Result<Zeroizing<String>, SdkError>;

    /// Send a wallet request (e.g. `personal_sign`) through the SDK.
    async fn request(
        &self,
        chain: &ChainConfig,
        method: &str,
        params: Value,
    ) -> Result<Value, SdkError>;

    /// Open the SDK's hosted wallet UI for `chain`.
    async fn launch_wallet_services(&self, chain: &ChainConfig) -> Result<(), SdkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_provider_round_trip() {
        for provider in LoginProvider::ALL {
            assert_eq!(provider.as_str().parse::<LoginProvider>(), Ok(provider));
        }
        assert_eq!("Google".parse::<LoginProvider>(), Ok(LoginProvider::Google));
        assert!("myspace".parse::<LoginProvider>().is_err());
    }

    #[test]
    fn only_passwordless_providers_require_hints() {
        assert!(LoginProvider::EmailPasswordless.requires_hint());
        assert!(LoginProvider::SmsPasswordless.requires_hint());
        assert!(!LoginProvider::Google.requires_hint());
        assert!(!LoginProvider::Jwt.requires_hint());
    }

    #[test]
    fn auth_network_parsing() {
        assert_eq!("SAPPHIRE_MAINNET".parse::<AuthNetwork>(), Ok(AuthNetwork::SapphireMainnet));
        assert!("cyan".parse::<AuthNetwork>().is_err());
    }

    #[test]
    fn user_info_uses_camel_case() {
        let info: UserInfo = serde_json::from_str(
            r#"{"email":"a@b.c","verifier":"google","verifierId":"a@b.c","typeOfLogin":"google"}"#,
        )
        .unwrap();
        assert_eq!(info.verifier_id, "a@b.c");
        assert_eq!(info.type_of_login, "google");
    }
}
