// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Login is delegated to an external identity SDK.
//!
//! ## Auth Flow
//!
//! 1. The adapter initializes the SDK with the configured client id
//! 2. `login(provider, hint)` runs the provider login inside the SDK
//! 3. On success the adapter marks the session connected and attaches the
//!    key provider
//! 4. The custody manager pulls raw key material through the adapter, one
//!    operation at a time
//!
//! ## Security
//!
//! - Without a client id the adapter stays unready; nothing crashes
//! - Raw key material is only reachable from inside the crate
//! - Logout drops the provider and every address derived from it

pub mod adapter;
pub mod local;
pub mod sdk;

pub use adapter::{AuthConfig, AuthSessionAdapter};
pub use local::LocalAuthSdk;
pub use sdk::{
    AuthNetwork, AuthSdk, LoginParams, LoginProvider, MfaLevel, SdkError, SdkInitParams, UserInfo,
};
