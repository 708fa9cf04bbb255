use crate::scan::{scan_files, DEFAULT_SKIP_DIRS};
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Names of every dependency declared by a project.
pub type DependencySet = BTreeSet<String>;

/// Directory levels searched for Gradle build scripts.
const MAX_GRADLE_SCAN_DEPTH: usize = 3;

/// Version catalog locations, relative to the project root.
const VERSION_CATALOGS: &[&str] = &["gradle/libs.versions.toml", "gradle.libs.versions.toml"];

static GRADLE_DEPENDENCY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:implementation|api|ksp|kapt|annotationProcessor|compileOnly|runtimeOnly)",
        r#"\s*\(?\s*['"]([^'":\s]+(?::[^'":\s]+)?)(?::[^'"]*)?['"]\s*\)?"#,
    ))
    .expect("valid regex")
});

static POM_ARTIFACT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<dependency>.*?<artifactId>([^<]+)</artifactId>.*?</dependency>")
        .expect("valid regex")
});

/// Collects dependency names from every manifest the project has.
///
/// Reads `package.json`, `pubspec.yaml`, `composer.json`, `pom.xml`, Gradle
/// build scripts up to three directories deep, and Gradle version catalogs.
/// Gradle coordinates are reported as `group:artifact`. A manifest that
/// cannot be read or parsed contributes nothing.
pub fn project_dependencies(root: &Path) -> DependencySet {
    let mut deps = DependencySet::new();
    deps.extend(parse_package_json(root));
    deps.extend(parse_pubspec(root));
    deps.extend(parse_composer_json(root));
    deps.extend(parse_gradle_scripts(root));
    deps.extend(parse_version_catalogs(root));
    deps.extend(parse_maven_pom(root));
    tracing::debug!(count = deps.len(), root = %root.display(), "Detected project dependencies");
    deps
}

fn read_optional(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!(error = %e, path = %path.display(), "Could not read manifest");
            None
        }
    }
}

fn json_object_keys(doc: &serde_json::Value, sections: &[&str]) -> Vec<String> {
    sections
        .iter()
        .filter_map(|section| doc.get(section).and_then(|d| d.as_object()))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// Reads `dependencies` and `devDependencies` from `package.json`.
pub fn parse_package_json(root: &Path) -> Vec<String> {
    package_json_sections(root, &["dependencies", "devDependencies"])
}

pub(crate) fn package_json_sections(root: &Path, sections: &[&str]) -> Vec<String> {
    let path = root.join("package.json");
    let Some(text) = read_optional(&path) else {
        return Vec::new();
    };
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(doc) => json_object_keys(&doc, sections),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to parse package.json");
            Vec::new()
        }
    }
}

/// Reads `require` and `require-dev` from `composer.json`.
pub fn parse_composer_json(root: &Path) -> Vec<String> {
    let Some(text) = read_optional(&root.join("composer.json")) else {
        return Vec::new();
    };
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(doc) => json_object_keys(&doc, &["require", "require-dev"]),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to parse composer.json");
            Vec::new()
        }
    }
}

/// Reads package names from `dependencies` and `dev_dependencies` in `pubspec.yaml`.
///
/// The `flutter` SDK entry itself is not reported.
pub fn parse_pubspec(root: &Path) -> Vec<String> {
    let Some(text) = read_optional(&root.join("pubspec.yaml")) else {
        return Vec::new();
    };
    let doc: serde_yaml::Value = match serde_yaml::from_str(&text) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to parse pubspec.yaml");
            return Vec::new();
        }
    };
    ["dependencies", "dev_dependencies"]
        .iter()
        .filter_map(|section| doc.get(*section).and_then(|d| d.as_mapping()))
        .flat_map(|deps| deps.keys().filter_map(|k| k.as_str()))
        .filter(|name| *name != "flutter" && *name != "sdk")
        .map(str::to_string)
        .collect()
}

/// Extracts `group:artifact` coordinates from Gradle build scripts.
pub fn parse_gradle_scripts(root: &Path) -> Vec<String> {
    let scripts = scan_files(root, MAX_GRADLE_SCAN_DEPTH, DEFAULT_SKIP_DIRS, |path| {
        matches!(
            path.file_name().and_then(|n| n.to_str()),
            Some("build.gradle" | "build.gradle.kts")
        )
    });
    scripts
        .iter()
        .filter_map(|path| read_optional(path))
        .flat_map(|text| gradle_coordinates(&text))
        .collect()
}

fn gradle_coordinates(text: &str) -> Vec<String> {
    GRADLE_DEPENDENCY_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extracts library coordinates from Gradle version catalogs.
pub fn parse_version_catalogs(root: &Path) -> Vec<String> {
    let mut out = Vec::new();
    for rel in VERSION_CATALOGS {
        let Some(text) = read_optional(&root.join(rel)) else {
            continue;
        };
        match toml::from_str::<toml::Value>(&text) {
            Ok(doc) => out.extend(catalog_libraries(&doc)),
            Err(e) => {
                tracing::debug!(error = %e, catalog = *rel, "Failed to parse version catalog")
            }
        }
    }
    out
}

fn catalog_libraries(doc: &toml::Value) -> Vec<String> {
    let Some(libraries) = doc.get("libraries").and_then(|l| l.as_table()) else {
        return Vec::new();
    };
    libraries
        .values()
        .filter_map(|lib| match lib {
            // "group:artifact:version"
            toml::Value::String(notation) => {
                let mut parts = notation.splitn(3, ':');
                match (parts.next(), parts.next()) {
                    (Some(group), Some(name)) => Some(format!("{group}:{name}")),
                    _ => None,
                }
            }
            toml::Value::Table(table) => {
                if let Some(module) = table.get("module").and_then(|m| m.as_str()) {
                    return Some(module.to_string());
                }
                let group = table.get("group").and_then(|g| g.as_str())?;
                match table.get("name").and_then(|n| n.as_str()) {
                    Some(name) => Some(format!("{group}:{name}")),
                    None => Some(group.to_string()),
                }
            }
            _ => None,
        })
        .collect()
}

/// Extracts `artifactId` values of `<dependency>` blocks in `pom.xml`.
pub fn parse_maven_pom(root: &Path) -> Vec<String> {
    let Some(text) = read_optional(&root.join("pom.xml")) else {
        return Vec::new();
    };
    POM_ARTIFACT_REGEX
        .captures_iter(&text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}
