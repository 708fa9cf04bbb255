use crate::catalog::Framework;
use crate::dependencies::{package_json_sections, project_dependencies, DependencySet};
use crate::scan::{scan_files, DEFAULT_SKIP_DIRS};
use skillsrc_state::Agent;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory levels searched when a language marker is a file extension.
const MAX_EXTENSION_SCAN_DEPTH: usize = 3;

/// Everything `init` needs to know about a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    /// Project root that was analyzed.
    pub root: PathBuf,
    /// Frameworks whose markers were found, in catalog order.
    pub frameworks: Vec<Framework>,
    /// Agents whose markers were found, in catalog order.
    pub agents: Vec<Agent>,
    /// Declared dependency names.
    pub dependencies: DependencySet,
}

impl ProjectContext {
    /// Runs every detector against `root`.
    pub fn analyze(root: &Path) -> Self {
        let frameworks = detect_frameworks(root)
            .into_iter()
            .filter_map(|(fw, found)| found.then_some(fw))
            .collect();
        let agents = detect_agents(root)
            .into_iter()
            .filter_map(|(agent, found)| found.then_some(agent))
            .collect();
        Self {
            root: root.to_path_buf(),
            frameworks,
            agents,
            dependencies: project_dependencies(root),
        }
    }

    /// The first detected framework, if any.
    pub fn primary_framework(&self) -> Option<Framework> {
        self.frameworks.first().copied()
    }
}

fn any_exists(root: &Path, paths: &[&str]) -> bool {
    paths.iter().any(|p| root.join(p).exists())
}

/// Reports, for every framework, whether the project uses it.
///
/// Marker files are checked first; frameworks with `package.json`
/// detection dependencies are also matched by exact dependency name.
pub fn detect_frameworks(root: &Path) -> BTreeMap<Framework, bool> {
    let package_deps = package_json_sections(root, &["dependencies", "devDependencies"]);
    Framework::ALL
        .into_iter()
        .map(|fw| {
            let def = fw.definition();
            let by_marker = any_exists(root, def.detection_files);
            let by_dependency = def
                .detection_dependencies
                .iter()
                .any(|dep| package_deps.iter().any(|d| d == dep));
            (fw, by_marker || by_dependency)
        })
        .collect()
}

fn marker_present(root: &Path, marker: &str) -> bool {
    let is_extension = marker.starts_with('.') && !marker.contains('/') && marker.len() > 1;
    if !is_extension {
        return root.join(marker).exists();
    }
    let ext = &marker[1..];
    let has_ext = |path: &Path| path.extension().and_then(|e| e.to_str()) == Some(ext);
    let found = scan_files(root, MAX_EXTENSION_SCAN_DEPTH, DEFAULT_SKIP_DIRS, has_ext);
    !found.is_empty()
}

/// Language categories used by the project for `framework`.
///
/// Falls back to the framework's declared languages when no marker is found.
pub fn detect_languages(root: &Path, framework: Framework) -> Vec<&'static str> {
    let def = framework.definition();
    let detected: Vec<&'static str> = def
        .language_markers
        .iter()
        .filter(|(_, markers)| markers.iter().any(|m| marker_present(root, m)))
        .map(|(lang, _)| *lang)
        .collect();
    if detected.is_empty() {
        def.languages.to_vec()
    } else {
        detected
    }
}

/// Reports, for every agent, whether its marker files exist.
pub fn detect_agents(root: &Path) -> BTreeMap<Agent, bool> {
    Agent::ALL
        .into_iter()
        .map(|agent| {
            let files = agent.definition().detection_files;
            (agent, any_exists(root, files))
        })
        .collect()
}
