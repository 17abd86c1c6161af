//! Typed configuration model
//!
//! The immutable value types produced by a successful load. Constructed once
//! and handed to downstream consumers explicitly; nothing here is mutated
//! after load.

use droidbuild_core::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Java/Kotlin language level for compile options
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LanguageLevel {
    /// Java 8 (`1.8`)
    V8,
    /// Java 11
    V11,
    /// Java 17
    V17,
    /// Java 21
    V21,
}

impl LanguageLevel {
    /// Numeric form, as in `jvmTarget = "11"`
    pub fn numeric(self) -> u8 {
        match self {
            LanguageLevel::V8 => 8,
            LanguageLevel::V11 => 11,
            LanguageLevel::V17 => 17,
            LanguageLevel::V21 => 21,
        }
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.numeric())
    }
}

impl FromStr for LanguageLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // Accepts both the Gradle enum form (VERSION_11) and the numeric form
        let normalized = s.trim().strip_prefix("VERSION_").unwrap_or(s.trim());
        match normalized {
            "8" | "1.8" | "1_8" => Ok(LanguageLevel::V8),
            "11" => Ok(LanguageLevel::V11),
            "17" => Ok(LanguageLevel::V17),
            "21" => Ok(LanguageLevel::V21),
            other => Err(Error::new(
                ErrorCode::ValidationError,
                format!("Unsupported language level: {:?}", other),
            )
            .with_suggestion("Use one of: 1.8, 11, 17, 21")),
        }
    }
}

/// An SDK bound: either a concrete API level or a symbolic reference
/// resolved by the external build orchestrator (e.g. `flutter.targetSdkVersion`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SdkVersion {
    /// Concrete API level
    Api(u32),
    /// Symbolic reference, resolved externally
    Ref(String),
}

impl SdkVersion {
    /// Whether this bound is a concrete API level
    pub fn is_resolved(&self) -> bool {
        matches!(self, SdkVersion::Api(_))
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdkVersion::Api(level) => write!(f, "{}", level),
            SdkVersion::Ref(name) => write!(f, "{}", name),
        }
    }
}

/// A credential value that never leaves the process in clear text.
///
/// `Debug`, `Display`, and `Serialize` all redact; consumers that genuinely
/// need the value call [`Secret::expose`].
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a credential value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying value
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the credential is absent/blank
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(****)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str("****")
    }
}

/// Release signing credentials: keystore reference, passwords, key alias.
///
/// Owned one-to-one by its [`ApplicationConfig`]; built at load, never
/// mutated, discarded once the packaging step consumed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Keystore file reference
    pub store_file: PathBuf,
    /// Keystore password
    pub store_password: Secret,
    /// Alias of the signing key inside the keystore
    pub key_alias: String,
    /// Password for the signing key
    pub key_password: Secret,
}

impl SigningConfig {
    /// A block is usable for release signing only when all four fields are
    /// non-empty
    pub fn is_complete(&self) -> bool {
        !self.store_file.as_os_str().is_empty()
            && !self.store_password.is_empty()
            && !self.key_alias.trim().is_empty()
            && !self.key_password.is_empty()
    }
}

/// Maven dependency coordinate, `group:artifact:version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyCoordinate {
    /// Group id, e.g. `com.google.android.gms`
    pub group: String,
    /// Artifact id, e.g. `play-services-auth`
    pub artifact: String,
    /// Version string, e.g. `21.2.0`
    pub version: String,
}

impl fmt::Display for DependencyCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl FromStr for DependencyCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Self {
                    group: (*group).to_string(),
                    artifact: (*artifact).to_string(),
                    version: (*version).to_string(),
                })
            }
            _ => Err(Error::new(
                ErrorCode::InvalidCoordinate,
                format!("Invalid dependency coordinate: {:?}", s),
            )
            .with_suggestion("Use the `group:artifact:version` form")),
        }
    }
}

/// Source/target language compatibility levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Language level of the sources
    pub source: LanguageLevel,
    /// Language level of the emitted bytecode
    pub target: LanguageLevel,
}

impl CompileOptions {
    /// Source level must not exceed target level
    pub fn is_compatible(&self) -> bool {
        self.source <= self.target
    }
}

/// Kotlin compiler options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KotlinOptions {
    /// JVM bytecode target, must agree with [`CompileOptions::target`]
    pub jvm_target: LanguageLevel,
}

/// Which artifact flavor a build produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    /// Development build, debug-signed
    Debug,
    /// Store-ready build, release-signed when credentials allow
    Release,
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildType::Debug => f.write_str("debug"),
            BuildType::Release => f.write_str("release"),
        }
    }
}

/// The validated application packaging configuration.
///
/// An immutable value produced once by [`crate::loader::load`] and passed
/// explicitly to downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationConfig {
    /// Package namespace (reverse-domain identifier)
    pub namespace: String,
    /// Store-facing application id (reverse-domain identifier)
    pub application_id: String,
    /// SDK level the app is compiled against
    pub compile_sdk: SdkVersion,
    /// SDK level the app targets at runtime
    pub target_sdk: SdkVersion,
    /// Minimum supported API level
    pub min_sdk: u32,
    /// Pinned NDK toolchain version, if any
    pub ndk_version: Option<String>,
    /// Monotonically increasing store version counter
    pub version_code: u32,
    /// User-facing semantic version
    pub version_name: String,
    /// Java source/target compatibility
    pub compile_options: CompileOptions,
    /// Kotlin compiler options, if the Kotlin toolchain is declared
    pub kotlin_options: Option<KotlinOptions>,
    /// Declared plugin ids, in descriptor order
    pub plugins: Vec<String>,
    /// Android library dependencies
    pub dependencies: Vec<DependencyCoordinate>,
    /// Release signing credentials, absent for debug-only descriptors
    pub signing: Option<SigningConfig>,
    /// Whether release builds shrink/obfuscate
    pub minify_enabled: bool,
    /// Proguard rule files, in application order
    pub proguard_files: Vec<PathBuf>,
}

impl ApplicationConfig {
    /// The binary release-readiness decision: a release artifact can be
    /// produced only with a complete signing block
    pub fn release_ready(&self) -> bool {
        self.signing.as_ref().is_some_and(SigningConfig::is_complete)
    }
}
