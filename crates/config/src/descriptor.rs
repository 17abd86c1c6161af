//! Raw descriptor schema
//!
//! Serde-facing mirror of the on-disk descriptor tree. Field names follow the
//! Gradle DSL spelling (`applicationId`, `minSdk`, `isMinifyEnabled`), so a
//! descriptor reads like the build file it replaces. Parsing is pure; all
//! semantic checks live in [`crate::loader`].

use crate::model::SdkVersion;
use droidbuild_core::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Top-level descriptor document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Descriptor {
    /// Plugin ids, in declaration order
    #[serde(default)]
    pub plugins: Vec<String>,

    /// The `android {}` block
    #[serde(default)]
    pub android: AndroidBlock,
}

/// The `android {}` block of the descriptor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AndroidBlock {
    pub namespace: Option<String>,
    pub compile_sdk: Option<SdkVersion>,
    pub target_sdk: Option<SdkVersion>,
    pub ndk_version: Option<String>,

    pub compile_options: Option<RawCompileOptions>,
    pub kotlin_options: Option<RawKotlinOptions>,

    #[serde(default)]
    pub default_config: RawDefaultConfig,

    pub signing_configs: Option<RawSigningConfigs>,
    pub build_types: Option<RawBuildTypes>,

    /// Library coordinates, `group:artifact:version`
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// `compileOptions {}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawCompileOptions {
    pub source_compatibility: String,
    pub target_compatibility: String,
}

/// `kotlinOptions {}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawKotlinOptions {
    pub jvm_target: String,
}

/// `defaultConfig {}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawDefaultConfig {
    pub application_id: Option<String>,
    pub min_sdk: Option<i64>,
    pub target_sdk: Option<SdkVersion>,
    pub version_code: Option<i64>,
    pub version_name: Option<String>,
}

/// `signingConfigs {}` — only the release block is modeled
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSigningConfigs {
    pub release: Option<RawSigningConfig>,
}

/// One named signing block
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawSigningConfig {
    pub store_file: Option<String>,
    pub store_password: Option<String>,
    pub key_alias: Option<String>,
    pub key_password: Option<String>,
}

/// `buildTypes {}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBuildTypes {
    pub release: Option<RawReleaseBuildType>,
}

/// The release build type
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawReleaseBuildType {
    /// Name of the signing block this build type uses
    pub signing_config: Option<String>,
    pub is_minify_enabled: Option<bool>,
    #[serde(default)]
    pub proguard_files: Vec<String>,
}

impl Descriptor {
    /// Parse a TOML descriptor
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Parse a JSON descriptor
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parse descriptor text as the format named by the path's extension
    /// (`.json` → JSON, anything else → TOML)
    pub fn from_str_for(path: &Path, content: &str) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(content),
            _ => Self::from_toml_str(content),
        }
    }

    /// Read and parse a descriptor file
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(droidbuild_core::Error::descriptor_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_str_for(path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SdkVersion;

    const MINIMAL: &str = r#"
        plugins = ["com.android.application"]

        [android]
        namespace = "com.example.app"
    "#;

    #[test]
    fn test_parse_minimal_toml() {
        let descriptor = Descriptor::from_toml_str(MINIMAL).unwrap();
        assert_eq!(descriptor.plugins, vec!["com.android.application"]);
        assert_eq!(
            descriptor.android.namespace.as_deref(),
            Some("com.example.app")
        );
        assert!(descriptor.android.signing_configs.is_none());
    }

    #[test]
    fn test_sdk_reference_or_level() {
        let descriptor = Descriptor::from_toml_str(
            r#"
            [android]
            compileSdk = "flutter.compileSdkVersion"
            targetSdk = 34
            "#,
        )
        .unwrap();
        assert_eq!(
            descriptor.android.compile_sdk,
            Some(SdkVersion::Ref("flutter.compileSdkVersion".to_string()))
        );
        assert_eq!(descriptor.android.target_sdk, Some(SdkVersion::Api(34)));
    }

    #[test]
    fn test_parse_json_descriptor() {
        let descriptor = Descriptor::from_json_str(
            r#"{
                "plugins": ["com.android.application", "kotlin-android"],
                "android": {
                    "namespace": "com.example.app",
                    "defaultConfig": {
                        "applicationId": "com.example.app",
                        "minSdk": 21,
                        "versionCode": 1,
                        "versionName": "1.0.0"
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(descriptor.android.default_config.min_sdk, Some(21));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = Descriptor::from_toml_str(
            r#"
            [android]
            namespaec = "com.example.app"
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err.code,
            droidbuild_core::ErrorCode::DescriptorParseError
        );
    }

    #[test]
    fn test_from_path_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("app.toml");
        std::fs::write(&toml_path, MINIMAL).unwrap();
        let descriptor = Descriptor::from_path(&toml_path).unwrap();
        assert_eq!(descriptor.plugins, vec!["com.android.application"]);

        let json_path = dir.path().join("app.json");
        std::fs::write(&json_path, r#"{"android": {"namespace": "com.example.app"}}"#).unwrap();
        let descriptor = Descriptor::from_path(&json_path).unwrap();
        assert_eq!(
            descriptor.android.namespace.as_deref(),
            Some("com.example.app")
        );
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Descriptor::from_path(Path::new("/droidbuild-no-such-descriptor.toml"))
            .unwrap_err();
        assert_eq!(
            err.code,
            droidbuild_core::ErrorCode::DescriptorNotFound
        );
    }

    #[test]
    fn test_gradle_spelling_of_minify_flag() {
        let descriptor = Descriptor::from_toml_str(
            r#"
            [android.buildTypes.release]
            isMinifyEnabled = true
            proguardFiles = ["proguard-android-optimize.txt", "proguard-rules.pro"]
            "#,
        )
        .unwrap();
        let release = descriptor.android.build_types.unwrap().release.unwrap();
        assert_eq!(release.is_minify_enabled, Some(true));
        assert_eq!(release.proguard_files.len(), 2);
    }
}
