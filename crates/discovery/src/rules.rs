//! Each rule names a registry skill and the packages whose presence means
//! the project needs it. The table is a compile-time constant.

/// Package names up to this many characters must match a dependency exactly.
///
/// Without this, `get` would match `widget` and `budget`.
pub const SHORT_PACKAGE_MAX_LEN: usize = 3;

/// Ties a skill id to the packages that indicate it is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionRule {
    /// Skill folder name within the category.
    pub id: &'static str,
    /// Dependency names or name fragments.
    pub packages: &'static [&'static str],
}

const fn rule(id: &'static str, packages: &'static [&'static str]) -> DetectionRule {
    DetectionRule { id, packages }
}

/// Detection rules grouped by registry category.
pub static SKILL_DETECTION_REGISTRY: &[(&str, &[DetectionRule])] = &[
    (
        "flutter",
        &[
            rule(
                "riverpod-state-management",
                &["flutter_riverpod", "riverpod"],
            ),
            rule("bloc-state-management", &["flutter_bloc", "bloc"]),
            rule("auto-route-navigation", &["auto_route"]),
            rule("go-router-navigation", &["go_router"]),
            rule("getx-navigation", &["get"]),
            rule("getx-state-management", &["get"]),
            rule("localization", &["easy_localization"]),
            rule("retrofit-networking", &["retrofit"]),
            rule("navigator-v1-navigation", &["flutter"]),
        ],
    ),
    (
        "nestjs",
        &[
            rule("caching", &["@nestjs/cache-manager", "cache-manager"]),
            rule(
                "database",
                &["@nestjs/typeorm", "@nestjs/prisma", "@nestjs/mongoose"],
            ),
            rule("security", &["@nestjs/passport", "passport", "helmet"]),
        ],
    ),
    (
        "android",
        &[
            rule("compose", &["androidx.compose.ui"]),
            rule("navigation", &["androidx.navigation:navigation-compose"]),
            rule(
                "legacy-navigation",
                &[
                    "androidx.navigation:navigation-fragment",
                    "androidx.navigation:navigation-ui",
                ],
            ),
            rule("di", &["hilt-android", "dagger-android"]),
            rule("persistence", &["androidx.room:room-runtime"]),
            rule("networking", &["retrofit"]),
            rule("concurrency", &["kotlinx-coroutines-android"]),
        ],
    ),
    (
        "ios",
        &[
            rule("networking", &["Alamofire", "Moya"]),
            rule("dependency-injection", &["Swinject", "Resolver"]),
            rule("persistence", &["Realm", "CoreData", "SQLite.swift"]),
            rule(
                "state-management",
                &["ComposableArchitecture", "CombineRuntime"],
            ),
            rule("ui-navigation", &["Coordinator", "Router"]),
        ],
    ),
    (
        "react-native",
        &[
            rule("navigation", &["@react-navigation/native"]),
            rule("state-management", &["zustand", "@reduxjs/toolkit"]),
            rule("deployment", &["react-native-code-push", "expo-updates"]),
            rule(
                "security",
                &["react-native-keychain", "react-native-ssl-pinning"],
            ),
            rule("performance", &["react-native-fast-image"]),
        ],
    ),
    (
        "laravel",
        &[
            rule("api", &["laravel/sanctum", "laravel/passport"]),
            rule("background-processing", &["laravel/horizon"]),
            rule("testing", &["pestphp/pest", "phpunit/phpunit"]),
            rule("tooling", &["laravel/pint", "laravel/sail"]),
        ],
    ),
];

/// Returns the rules for `category`, or an empty slice when it has none.
pub fn detection_rules(category: &str) -> &'static [DetectionRule] {
    SKILL_DETECTION_REGISTRY
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, rules)| *rules)
        .unwrap_or(&[])
}

/// Case-insensitive match of one rule package against one dependency name.
pub fn package_matches(package: &str, dependency: &str) -> bool {
    let package = package.to_lowercase();
    let dependency = dependency.to_lowercase();
    if package.chars().count() <= SHORT_PACKAGE_MAX_LEN {
        dependency == package
    } else {
        dependency.contains(&package)
    }
}

impl DetectionRule {
    /// True when any detected dependency matches any of the rule's packages.
    pub fn is_satisfied_by<I, S>(&self, dependencies: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        dependencies.into_iter().any(|dep| {
            self.packages
                .iter()
                .any(|pkg| package_matches(pkg, dep.as_ref()))
        })
    }
}
