//! Plugin declaration resolution
//!
//! Classifies the declared plugin ids and enforces the one ordering
//! invariant the packaging toolchain imposes: the packaging-framework plugin
//! registers against hooks installed by the platform and language-toolchain
//! plugins, so it must appear after them in the declared list.

use crate::model::ApplicationConfig;
use droidbuild_core::error::{Error, Result};

/// What role a declared plugin plays in the build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    /// The platform plugin (`com.android.application`, `com.android.library`)
    Platform,
    /// A language toolchain (`kotlin-android`, `org.jetbrains.kotlin.android`)
    LanguageToolchain,
    /// The packaging framework (`dev.flutter.flutter-gradle-plugin`)
    PackagingFramework,
    /// Anything else (service integrations, lint, custom plugins)
    Other,
}

/// A classified plugin declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRef {
    /// Declared plugin id
    pub id: String,
    /// Classified role
    pub kind: PluginKind,
}

/// Classify a plugin id by its role
pub fn classify(id: &str) -> PluginKind {
    match id {
        "com.android.application" | "com.android.library" => PluginKind::Platform,
        "kotlin-android" | "org.jetbrains.kotlin.android" => PluginKind::LanguageToolchain,
        "dev.flutter.flutter-gradle-plugin" => PluginKind::PackagingFramework,
        _ => PluginKind::Other,
    }
}

/// Resolve the declared plugin list into classified references, enforcing
/// declaration-order constraints.
///
/// The platform plugin is mandatory. When a packaging-framework plugin is
/// declared, it must come after every platform and language-toolchain plugin.
pub fn resolve_plugins(config: &ApplicationConfig) -> Result<Vec<PluginRef>> {
    let refs: Vec<PluginRef> = config
        .plugins
        .iter()
        .map(|id| PluginRef {
            id: id.clone(),
            kind: classify(id),
        })
        .collect();

    if !refs.iter().any(|p| p.kind == PluginKind::Platform) {
        return Err(Error::missing_field("plugins: com.android.application"));
    }

    let last_prerequisite = refs
        .iter()
        .rposition(|p| {
            matches!(
                p.kind,
                PluginKind::Platform | PluginKind::LanguageToolchain
            )
        })
        .unwrap_or(0);

    for (idx, plugin) in refs.iter().enumerate() {
        if plugin.kind == PluginKind::PackagingFramework && idx < last_prerequisite {
            return Err(Error::plugin_order(format!(
                "Plugin `{}` is declared before `{}`, which it depends on",
                plugin.id, refs[last_prerequisite].id
            )));
        }
    }

    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load;
    use crate::descriptor::Descriptor;

    fn config_with_plugins(plugins: &[&str]) -> ApplicationConfig {
        let plugin_list = plugins
            .iter()
            .map(|p| format!("{:?}", p))
            .collect::<Vec<_>>()
            .join(", ");
        let toml = format!(
            r#"
            plugins = [{plugin_list}]

            [android]
            namespace = "com.example.app"
            compileSdk = 34
            targetSdk = 34

            [android.compileOptions]
            sourceCompatibility = "VERSION_11"
            targetCompatibility = "VERSION_11"

            [android.defaultConfig]
            applicationId = "com.example.app"
            minSdk = 21
            versionCode = 1
            versionName = "1.0.0"
            "#
        );
        let descriptor = Descriptor::from_toml_str(&toml).unwrap();
        load(&descriptor).unwrap().config
    }

    #[test]
    fn test_well_ordered_plugins_resolve() {
        let config = config_with_plugins(&[
            "com.android.application",
            "kotlin-android",
            "dev.flutter.flutter-gradle-plugin",
            "com.google.gms.google-services",
        ]);
        let refs = resolve_plugins(&config).unwrap();
        assert_eq!(refs.len(), 4);
        assert_eq!(refs[0].kind, PluginKind::Platform);
        assert_eq!(refs[1].kind, PluginKind::LanguageToolchain);
        assert_eq!(refs[2].kind, PluginKind::PackagingFramework);
        assert_eq!(refs[3].kind, PluginKind::Other);
    }

    #[test]
    fn test_framework_before_toolchain_is_rejected() {
        let config = config_with_plugins(&[
            "com.android.application",
            "dev.flutter.flutter-gradle-plugin",
            "kotlin-android",
        ]);
        let err = resolve_plugins(&config).unwrap_err();
        assert_eq!(err.code, droidbuild_core::ErrorCode::PluginOrder);
    }

    #[test]
    fn test_framework_before_platform_is_rejected() {
        let config = config_with_plugins(&[
            "dev.flutter.flutter-gradle-plugin",
            "com.android.application",
        ]);
        let err = resolve_plugins(&config).unwrap_err();
        assert_eq!(err.code, droidbuild_core::ErrorCode::PluginOrder);
    }

    #[test]
    fn test_missing_platform_plugin_is_rejected() {
        let config = config_with_plugins(&["kotlin-android"]);
        let err = resolve_plugins(&config).unwrap_err();
        assert_eq!(err.code, droidbuild_core::ErrorCode::MissingField);
    }

    #[test]
    fn test_no_framework_plugin_is_fine() {
        let config = config_with_plugins(&["com.android.application", "kotlin-android"]);
        assert!(resolve_plugins(&config).is_ok());
    }
}
