//! Descriptor loading and validation
//!
//! Turns a parsed [`Descriptor`] into a validated [`ApplicationConfig`].
//! Loading is pure, synchronous, and fail-fast: the first hard violation
//! aborts the load and no partial configuration is ever returned. Advisory
//! findings (namespace/applicationId mismatch, inline credentials,
//! non-semver version names) are collected as warnings and never block.

use crate::descriptor::{Descriptor, RawSigningConfig};
use crate::model::{
    ApplicationConfig, CompileOptions, DependencyCoordinate, KotlinOptions, LanguageLevel,
    SdkVersion, Secret, SigningConfig,
};
use crate::secrets;
use droidbuild_core::error::{Error, ErrorCode, Result};
use droidbuild_core::validation::{ValidationError, Validator};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Reverse-domain identifier grammar for `namespace` and `applicationId`
static ID_GRAMMAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)+$").unwrap());

/// NDK toolchains are pinned as dotted triples, e.g. `27.0.12077973`
static NDK_GRAMMAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap());

/// How the loader treats file references in the descriptor
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Verify that proguard and keystore references resolve to existing files
    pub check_files: bool,
    /// Directory file references are resolved against
    pub base_dir: PathBuf,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            check_files: false,
            base_dir: PathBuf::from("."),
        }
    }
}

/// A successful load: the immutable config plus any advisory warnings
#[derive(Debug, Clone)]
pub struct Loaded {
    /// The validated configuration
    pub config: ApplicationConfig,
    /// Non-fatal findings recorded during the load
    pub warnings: Vec<ValidationError>,
}

/// Load and validate a descriptor with default options
pub fn load(descriptor: &Descriptor) -> Result<Loaded> {
    load_with(descriptor, &LoadOptions::default())
}

/// Load a TOML descriptor from a string, including a credential hygiene scan
/// of the raw text
pub fn load_toml_str(input: &str) -> Result<Loaded> {
    let descriptor = Descriptor::from_toml_str(input)?;
    let mut loaded = load(&descriptor)?;
    merge_credential_findings(input, &mut loaded);
    Ok(loaded)
}

/// Load a descriptor file, including a credential hygiene scan of the raw
/// text. File references are checked relative to the descriptor's directory.
///
/// The file is read once; the parser and the scanner see the same text.
pub fn load_path(path: &Path, check_files: bool) -> Result<Loaded> {
    if !path.exists() {
        return Err(Error::descriptor_not_found(path));
    }
    let text = std::fs::read_to_string(path)?;
    let descriptor = Descriptor::from_str_for(path, &text)?;
    let options = LoadOptions {
        check_files,
        base_dir: path.parent().unwrap_or(Path::new(".")).to_path_buf(),
    };
    let mut loaded = load_with(&descriptor, &options)?;
    merge_credential_findings(&text, &mut loaded);
    Ok(loaded)
}

fn merge_credential_findings(text: &str, loaded: &mut Loaded) {
    loaded
        .warnings
        .extend(secrets::scan(text).iter().map(|f| f.to_warning()));
}

/// Load and validate a descriptor
pub fn load_with(descriptor: &Descriptor, options: &LoadOptions) -> Result<Loaded> {
    let android = &descriptor.android;
    let default_config = &android.default_config;

    // Required fields, named by their descriptor path
    let namespace = android
        .namespace
        .as_deref()
        .ok_or_else(|| Error::missing_field("android.namespace"))?;
    let application_id = default_config
        .application_id
        .as_deref()
        .ok_or_else(|| Error::missing_field("android.defaultConfig.applicationId"))?;
    let min_sdk = default_config
        .min_sdk
        .ok_or_else(|| Error::missing_field("android.defaultConfig.minSdk"))?;
    let version_code = default_config
        .version_code
        .ok_or_else(|| Error::missing_field("android.defaultConfig.versionCode"))?;
    let version_name = default_config
        .version_name
        .as_deref()
        .ok_or_else(|| Error::missing_field("android.defaultConfig.versionName"))?;
    let compile_sdk = android
        .compile_sdk
        .clone()
        .ok_or_else(|| Error::missing_field("android.compileSdk"))?;
    // targetSdk may live at the android level or inside defaultConfig
    let target_sdk = android
        .target_sdk
        .clone()
        .or_else(|| default_config.target_sdk.clone())
        .ok_or_else(|| Error::missing_field("android.targetSdk"))?;
    let raw_compile_options = android
        .compile_options
        .as_ref()
        .ok_or_else(|| Error::missing_field("android.compileOptions"))?;

    validate_identifier("android.namespace", namespace)?;
    validate_identifier("android.defaultConfig.applicationId", application_id)?;

    let min_sdk = positive_u32("android.defaultConfig.minSdk", min_sdk)?;
    let version_code = positive_u32("android.defaultConfig.versionCode", version_code)?;

    if version_name.trim().is_empty() {
        return Err(Error::invalid_version(
            "android.defaultConfig.versionName",
            "(empty)",
        ));
    }

    let compile_options = CompileOptions {
        source: raw_compile_options.source_compatibility.parse()?,
        target: raw_compile_options.target_compatibility.parse()?,
    };
    if !compile_options.is_compatible() {
        return Err(Error::new(
            ErrorCode::IncompatibleLanguageLevels,
            format!(
                "sourceCompatibility {} exceeds targetCompatibility {}",
                compile_options.source, compile_options.target
            ),
        ));
    }

    let kotlin_options = match &android.kotlin_options {
        Some(raw) => {
            let jvm_target: LanguageLevel = raw.jvm_target.parse()?;
            if jvm_target != compile_options.target {
                return Err(Error::new(
                    ErrorCode::IncompatibleLanguageLevels,
                    format!(
                        "kotlinOptions.jvmTarget {} disagrees with targetCompatibility {}",
                        jvm_target, compile_options.target
                    ),
                ));
            }
            Some(KotlinOptions { jvm_target })
        }
        None => None,
    };

    let dependencies = android
        .dependencies
        .iter()
        .map(|raw| raw.parse::<DependencyCoordinate>())
        .collect::<Result<Vec<_>>>()?;

    let signing = android
        .signing_configs
        .as_ref()
        .and_then(|blocks| blocks.release.as_ref())
        .map(resolve_signing)
        .transpose()?;

    let release_build_type = android
        .build_types
        .as_ref()
        .and_then(|types| types.release.as_ref());
    let minify_enabled = release_build_type
        .and_then(|release| release.is_minify_enabled)
        .unwrap_or(false);
    let proguard_files: Vec<PathBuf> = release_build_type
        .map(|release| release.proguard_files.iter().map(PathBuf::from).collect())
        .unwrap_or_default();

    let mut validator = Validator::new();
    if let Some(ndk_version) = &android.ndk_version {
        validator = validator.pattern(
            "android.ndkVersion",
            ndk_version,
            &NDK_GRAMMAR,
            "a dotted NDK version triple (e.g. 27.0.12077973)",
        );
    }

    validator = validator
        .warn_if(
            "android.defaultConfig.applicationId",
            namespace != application_id,
            "namespace and applicationId differ; they usually name the same package",
        )
        .warn_if(
            "android.defaultConfig.versionName",
            semver::Version::parse(version_name).is_err(),
            "versionName is not a semantic version",
        )
        .warn_if(
            "android.buildTypes.release.signingConfig",
            release_build_type
                .and_then(|release| release.signing_config.as_deref())
                .is_some()
                && signing.is_none(),
            "release build type references a signing block that is not declared",
        );

    if options.check_files {
        for file in &proguard_files {
            validator = validator.path_exists(
                "android.buildTypes.release.proguardFiles",
                &options.base_dir.join(file),
            );
        }
        if let Some(signing) = &signing {
            validator = validator.path_exists(
                "android.signingConfigs.release.storeFile",
                &options.base_dir.join(&signing.store_file),
            );
        }
    }

    let result = validator.validate();
    let warnings = result.warnings().to_vec();
    result.to_result()?;

    Ok(Loaded {
        config: ApplicationConfig {
            namespace: namespace.to_string(),
            application_id: application_id.to_string(),
            compile_sdk,
            target_sdk,
            min_sdk,
            ndk_version: android.ndk_version.clone(),
            version_code,
            version_name: version_name.to_string(),
            compile_options,
            kotlin_options,
            plugins: descriptor.plugins.clone(),
            dependencies,
            signing,
            minify_enabled,
            proguard_files,
        },
        warnings,
    })
}

fn validate_identifier(field: &str, value: &str) -> Result<()> {
    if ID_GRAMMAR.is_match(value) {
        Ok(())
    } else {
        Err(Error::invalid_identifier(field, value))
    }
}

fn positive_u32(field: &str, value: i64) -> Result<u32> {
    if value < 1 {
        return Err(Error::invalid_version(field, value));
    }
    u32::try_from(value).map_err(|_| Error::invalid_version(field, value))
}

/// Build a [`SigningConfig`] from a raw block, resolving `env:VAR`
/// credential indirection. An incomplete block is not an error here; release
/// selection degrades to fallback signing instead.
fn resolve_signing(raw: &RawSigningConfig) -> Result<SigningConfig> {
    Ok(SigningConfig {
        store_file: PathBuf::from(raw.store_file.as_deref().unwrap_or_default()),
        store_password: Secret::new(resolve_credential(
            "android.signingConfigs.release.storePassword",
            raw.store_password.as_deref(),
        )?),
        key_alias: raw.key_alias.clone().unwrap_or_default(),
        key_password: Secret::new(resolve_credential(
            "android.signingConfigs.release.keyPassword",
            raw.key_password.as_deref(),
        )?),
    })
}

/// Resolve a credential value. `env:VAR` reads the named environment
/// variable at load time; anything else is taken verbatim.
fn resolve_credential(field: &str, value: Option<&str>) -> Result<String> {
    match value {
        None => Ok(String::new()),
        Some(raw) => match raw.strip_prefix("env:") {
            None => Ok(raw.to_string()),
            Some(var) => std::env::var(var).map_err(|_| {
                Error::new(
                    ErrorCode::MissingCredentialSource,
                    format!("Environment variable `{}` is not set", var),
                )
                .with_context(format!("While resolving {}", field))
                .with_suggestion(format!("Export {} before loading the descriptor", var))
            }),
        },
    }
}
