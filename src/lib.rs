//! AppForge - client SDK for the AppForge cloud mobile-app build service
//!
//! The crate is organised around two pieces:
//! - [`auth::SessionManager`] holds the OAuth token pair and performs every
//!   authorized call, refreshing a stale token first
//! - [`project::Project`] mirrors one remote project, caches its
//!   configuration document and polls compilations until they settle
//!
//! ```ignore
//! use std::sync::Arc;
//! use appforge::prelude::*;
//!
//! let session = Arc::new(SessionManager::with_reqwest(SdkConfig::from_env())?);
//! session.setup_access(access, refresh, None, None).await?;
//!
//! let api = ProjectApi::new(session);
//! let project = Project::fetch(&api, "1234").await?;
//! project.compile(&[]).await?;
//! project
//!     .refresh_until_completed(PollOptions::default(), |s| println!("{:?}", s.compilations))
//!     .await?;
//! ```

pub mod adapters;
pub mod api;
pub mod auth;
pub mod config;
pub mod config_xml;
pub mod error;
pub mod logging;
pub mod models;
pub mod prelude;
pub mod project;
pub mod traits;
