//! Loader and validator for Android application build descriptors
//!
//! This crate turns a declarative packaging descriptor (the data of a
//! Flutter/Android `build.gradle.kts`, expressed as TOML or JSON) into a
//! validated, immutable [`model::ApplicationConfig`] for an external
//! packaging tool to consume:
//!
//! - **Descriptor parsing**: Gradle-spelled serde schema, TOML or JSON
//! - **Validation**: reverse-domain identifier grammar, version bounds,
//!   language-level compatibility, fail-fast with coded errors
//! - **Signing selection**: release signing with a recorded fallback to the
//!   debug identity when credentials are incomplete
//! - **Plugin resolution**: declaration-order constraints between platform,
//!   toolchain, and packaging-framework plugins
//! - **Credential hygiene**: advisory scan for secrets embedded inline
//!
//! # Example
//!
//! ```rust,no_run
//! use droidbuild_config::loader;
//! use droidbuild_config::model::BuildType;
//! use droidbuild_config::signing::select_signing;
//! use std::path::Path;
//!
//! let loaded = loader::load_path(Path::new("android/app.toml"), false)
//!     .expect("descriptor must validate");
//! for warning in &loaded.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//!
//! let selection = select_signing(&loaded.config, BuildType::Release);
//! if selection.warning.is_some() {
//!     eprintln!("release artifact will be debug-signed");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod descriptor;
pub mod loader;
pub mod model;
pub mod plugins;
pub mod secrets;
pub mod signing;

pub use descriptor::Descriptor;
pub use loader::{load, load_path, load_toml_str, LoadOptions, Loaded};
pub use model::{ApplicationConfig, BuildType, SigningConfig};
pub use plugins::{resolve_plugins, PluginKind, PluginRef};
pub use signing::{select_signing, DegradedSigningWarning, SigningChoice, SigningSelection};
