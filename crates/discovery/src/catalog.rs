use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A framework with a matching skill category in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    /// Flutter (Dart).
    Flutter,
    /// NestJS.
    #[serde(rename = "nestjs")]
    NestJs,
    /// Go.
    Golang,
    /// Next.js.
    #[serde(rename = "nextjs")]
    NextJs,
    /// React.
    React,
    /// React Native.
    ReactNative,
    /// Angular.
    Angular,
    /// Spring Boot.
    SpringBoot,
    /// Native Android.
    Android,
    /// Native iOS.
    #[serde(rename = "ios")]
    Ios,
    /// Laravel.
    Laravel,
}

/// Static detection data for a [`Framework`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkDefinition {
    /// Display name.
    pub name: &'static str,
    /// Language categories the framework is written in, most likely first.
    pub languages: &'static [&'static str],
    /// Project-relative paths whose presence identifies the framework.
    pub detection_files: &'static [&'static str],
    /// `package.json` dependencies that identify the framework.
    pub detection_dependencies: &'static [&'static str],
    /// Language to marker paths. A marker that starts with `.` and has no
    /// `/` is a file extension looked up anywhere in the project.
    pub language_markers: &'static [(&'static str, &'static [&'static str])],
}

const JS_MARKERS: &[(&str, &[&str])] = &[
    ("typescript", &["tsconfig.json"]),
    ("javascript", &["jsconfig.json"]),
];

const JVM_MARKERS: &[(&str, &[&str])] = &[
    ("kotlin", &["src/main/kotlin", "build.gradle.kts"]),
    ("java", &["src/main/java"]),
];

impl Framework {
    /// Every supported framework, in catalog order.
    pub const ALL: [Framework; 11] = [
        Framework::Flutter,
        Framework::NestJs,
        Framework::Golang,
        Framework::NextJs,
        Framework::React,
        Framework::ReactNative,
        Framework::Angular,
        Framework::SpringBoot,
        Framework::Android,
        Framework::Ios,
        Framework::Laravel,
    ];

    /// Category name of the framework in the registry.
    pub fn as_str(self) -> &'static str {
        match self {
            Framework::Flutter => "flutter",
            Framework::NestJs => "nestjs",
            Framework::Golang => "golang",
            Framework::NextJs => "nextjs",
            Framework::React => "react",
            Framework::ReactNative => "react-native",
            Framework::Angular => "angular",
            Framework::SpringBoot => "spring-boot",
            Framework::Android => "android",
            Framework::Ios => "ios",
            Framework::Laravel => "laravel",
        }
    }

    /// Detection data for the framework.
    pub fn definition(self) -> FrameworkDefinition {
        match self {
            Framework::Flutter => FrameworkDefinition {
                name: "Flutter",
                languages: &["dart"],
                detection_files: &["pubspec.yaml"],
                detection_dependencies: &[],
                language_markers: &[],
            },
            Framework::NestJs => FrameworkDefinition {
                name: "NestJS",
                languages: &["typescript", "javascript"],
                detection_files: &["nest-cli.json"],
                detection_dependencies: &["@nestjs/core"],
                language_markers: JS_MARKERS,
            },
            Framework::Golang => FrameworkDefinition {
                name: "Go (Golang)",
                languages: &["go"],
                detection_files: &["go.mod"],
                detection_dependencies: &[],
                language_markers: &[],
            },
            Framework::NextJs => FrameworkDefinition {
                name: "Next.js",
                languages: &["typescript", "javascript"],
                detection_files: &["next.config.js", "next.config.mjs"],
                detection_dependencies: &["next"],
                language_markers: JS_MARKERS,
            },
            Framework::React => FrameworkDefinition {
                name: "React",
                languages: &["typescript", "javascript"],
                detection_files: &[],
                detection_dependencies: &["react", "react-dom"],
                language_markers: JS_MARKERS,
            },
            Framework::ReactNative => FrameworkDefinition {
                name: "React Native",
                languages: &["typescript", "javascript"],
                detection_files: &["metro.config.js"],
                detection_dependencies: &["react-native"],
                language_markers: JS_MARKERS,
            },
            Framework::Angular => FrameworkDefinition {
                name: "Angular",
                languages: &["typescript"],
                detection_files: &["angular.json"],
                detection_dependencies: &[],
                language_markers: &[],
            },
            Framework::SpringBoot => FrameworkDefinition {
                name: "Spring Boot",
                languages: &["java", "kotlin"],
                detection_files: &["pom.xml", "build.gradle", "build.gradle.kts"],
                detection_dependencies: &[],
                language_markers: JVM_MARKERS,
            },
            Framework::Android => FrameworkDefinition {
                name: "Android",
                languages: &["kotlin", "java"],
                detection_files: &["build.gradle", "build.gradle.kts", "AndroidManifest.xml"],
                detection_dependencies: &[],
                language_markers: JVM_MARKERS,
            },
            Framework::Ios => FrameworkDefinition {
                name: "iOS (Swift/SwiftUI)",
                languages: &["swift"],
                detection_files: &["Podfile", "Package.swift", "project.pbxproj", "Info.plist"],
                detection_dependencies: &[],
                language_markers: &[("swift", &[".swift"])],
            },
            Framework::Laravel => FrameworkDefinition {
                name: "Laravel",
                languages: &["php", "javascript"],
                detection_files: &["composer.json", "artisan"],
                detection_dependencies: &["laravel/framework"],
                language_markers: &[
                    ("php", &[".php"]),
                    ("javascript", &["resources/js", "vite.config.js"]),
                ],
            },
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Framework::ALL
            .into_iter()
            .find(|fw| fw.as_str() == needle)
            .ok_or_else(|| format!("unknown framework '{}'", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for fw in Framework::ALL {
            assert_eq!(fw.as_str().parse::<Framework>().unwrap(), fw);
        }
    }

    #[test]
    fn serde_ids_match_category_names() {
        let json = serde_json::to_string(&Framework::ReactNative).unwrap();
        assert_eq!(json, "\"react-native\"");
        let json = serde_json::to_string(&Framework::SpringBoot).unwrap();
        assert_eq!(json, "\"spring-boot\"");
    }
}
