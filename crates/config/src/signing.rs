//! Signing selection
//!
//! The one conditional decision in the configuration surface: a release
//! build uses the configured signing block when it is fully populated, and
//! otherwise degrades to the debug signing identity so a buildable artifact
//! remains available. The degradation is recorded, never silent.

use crate::model::{ApplicationConfig, BuildType, SigningConfig};
use serde::Serialize;
use std::fmt;

/// Which signing identity a build will use
#[derive(Debug, Clone, PartialEq)]
pub enum SigningChoice {
    /// The configured release signing block
    Release(SigningConfig),
    /// The debug signing identity
    Fallback,
}

impl SigningChoice {
    /// Whether the choice carries release credentials
    pub fn is_release(&self) -> bool {
        matches!(self, SigningChoice::Release(_))
    }
}

/// Advisory raised when a release build degrades to fallback signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegradedSigningWarning {
    /// Application the degradation applies to
    pub application_id: String,
    /// Why the release block was unusable
    pub reason: String,
}

impl fmt::Display for DegradedSigningWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: release build degraded to debug signing ({})",
            self.application_id, self.reason
        )
    }
}

/// The outcome of signing selection
#[derive(Debug, Clone, PartialEq)]
pub struct SigningSelection {
    /// The identity the packaging step will sign with
    pub choice: SigningChoice,
    /// Present when a release build fell back to debug signing
    pub warning: Option<DegradedSigningWarning>,
}

/// Select the signing identity for a build.
///
/// Release builds get the configured block only when all four of its fields
/// are populated; otherwise the build proceeds with fallback signing and the
/// degradation is recorded. Debug builds always use fallback signing.
pub fn select_signing(config: &ApplicationConfig, build_type: BuildType) -> SigningSelection {
    if build_type == BuildType::Debug {
        return SigningSelection {
            choice: SigningChoice::Fallback,
            warning: None,
        };
    }

    match &config.signing {
        Some(signing) if signing.is_complete() => SigningSelection {
            choice: SigningChoice::Release(signing.clone()),
            warning: None,
        },
        Some(_) => degraded(config, "signing block is incomplete"),
        None => degraded(config, "no release signing block is declared"),
    }
}

fn degraded(config: &ApplicationConfig, reason: &str) -> SigningSelection {
    let warning = DegradedSigningWarning {
        application_id: config.application_id.clone(),
        reason: reason.to_string(),
    };
    tracing::warn!(
        application_id = %warning.application_id,
        reason = %warning.reason,
        "release build degraded to debug signing"
    );
    SigningSelection {
        choice: SigningChoice::Fallback,
        warning: Some(warning),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;
    use crate::loader::load;
    use crate::model::Secret;
    use std::path::PathBuf;

    const FULLY_SIGNED: &str = r#"
        plugins = ["com.android.application", "kotlin-android"]

        [android]
        namespace = "com.sacral.app"
        compileSdk = "flutter.compileSdkVersion"

        [android.compileOptions]
        sourceCompatibility = "VERSION_11"
        targetCompatibility = "VERSION_11"

        [android.defaultConfig]
        applicationId = "com.sacral.app"
        minSdk = 21
        targetSdk = "flutter.targetSdkVersion"
        versionCode = 1
        versionName = "1.0.0"

        [android.signingConfigs.release]
        storeFile = "release-key.jks"
        storePassword = "1488228"
        keyAlias = "release"
        keyPassword = "1488228"

        [android.buildTypes.release]
        signingConfig = "release"
        isMinifyEnabled = true
        proguardFiles = ["proguard-android-optimize.txt", "proguard-rules.pro"]
    "#;

    const UNSIGNED: &str = r#"
        plugins = ["com.android.application", "kotlin-android"]

        [android]
        namespace = "com.yourcompany.dailyquotes"
        compileSdk = "flutter.compileSdkVersion"

        [android.compileOptions]
        sourceCompatibility = "VERSION_11"
        targetCompatibility = "VERSION_11"

        [android.defaultConfig]
        applicationId = "com.yourcompany.dailyquotes"
        minSdk = 21
        targetSdk = "flutter.targetSdkVersion"
        versionCode = 1
        versionName = "1.0.0"
    "#;

    fn config_from(toml: &str) -> crate::model::ApplicationConfig {
        load(&Descriptor::from_toml_str(toml).unwrap()).unwrap().config
    }

    #[test]
    fn test_release_with_full_block_returns_that_block() {
        let config = config_from(FULLY_SIGNED);
        let selection = select_signing(&config, BuildType::Release);

        match selection.choice {
            SigningChoice::Release(signing) => {
                assert_eq!(signing.store_file, PathBuf::from("release-key.jks"));
                assert_eq!(signing.key_alias, "release");
            }
            SigningChoice::Fallback => panic!("expected the configured block"),
        }
        assert!(selection.warning.is_none());
    }

    #[test]
    fn test_release_without_block_degrades_with_warning() {
        let config = config_from(UNSIGNED);
        let selection = select_signing(&config, BuildType::Release);

        assert_eq!(selection.choice, SigningChoice::Fallback);
        let warning = selection.warning.expect("degradation must be recorded");
        assert_eq!(warning.application_id, "com.yourcompany.dailyquotes");
    }

    #[test]
    fn test_release_with_incomplete_block_degrades() {
        let mut config = config_from(FULLY_SIGNED);
        if let Some(signing) = &mut config.signing {
            signing.store_password = Secret::new("");
        }
        let selection = select_signing(&config, BuildType::Release);

        assert_eq!(selection.choice, SigningChoice::Fallback);
        assert!(selection.warning.is_some());
        assert!(!config.release_ready());
    }

    #[test]
    fn test_debug_always_falls_back_silently() {
        for fixture in [FULLY_SIGNED, UNSIGNED] {
            let config = config_from(fixture);
            let selection = select_signing(&config, BuildType::Debug);
            assert_eq!(selection.choice, SigningChoice::Fallback);
            assert!(selection.warning.is_none());
        }
    }

    #[test]
    fn test_release_readiness_matches_selection() {
        let signed = config_from(FULLY_SIGNED);
        assert!(signed.release_ready());
        assert!(select_signing(&signed, BuildType::Release).choice.is_release());

        let unsigned = config_from(UNSIGNED);
        assert!(!unsigned.release_ready());
        assert!(!select_signing(&unsigned, BuildType::Release).choice.is_release());
    }
}
