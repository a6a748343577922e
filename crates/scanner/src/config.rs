use crate::error::{Result, ScanError};
use crate::layout::ProjectLayout;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_STALE_DAYS: u64 = 7;
pub const CONFIG_FILE_NAME: &str = ".lens.toml";

const ROOT_ENV_KEYS: &[&str] = &["LENS_ROOT", "LENS_PROJECT_ROOT"];
const KNOWLEDGE_ENV_KEY: &str = "LENS_KNOWLEDGE_DIR";
const STALE_DAYS_ENV_KEY: &str = "LENS_STALE_DAYS";
const CONFIG_ENV_KEY: &str = "LENS_CONFIG";

/// Knowledge bases shipped in this workspace; used when no install location is found.
const WORKSPACE_KNOWLEDGE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../knowledge");

/// `[layout]` table of `.lens.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutOverrides {
    pub docs_dir: Option<String>,
    pub decisions_dir: Option<String>,
    pub audit_dir: Option<String>,
    pub state_file_name: Option<String>,
    pub source_dirs: Option<Vec<String>>,
    pub stale_days: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    layout: LayoutOverrides,
}

/// Process configuration: where the project and the bundled knowledge live.
#[derive(Debug, Clone)]
pub struct LensConfig {
    pub layout: ProjectLayout,
    pub knowledge_dir: PathBuf,
    pub stale_days: u64,
    explicit_config: Option<PathBuf>,
}

impl LensConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env(root_override: Option<&Path>) -> Result<Self> {
        Self::resolve(root_override, |key| std::env::var(key).ok())
    }

    /// Resolve configuration with an injectable environment lookup.
    pub fn resolve(
        root_override: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let lookup = |key: &str| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let root = match root_override {
            Some(root) => root.to_path_buf(),
            None => match ROOT_ENV_KEYS.iter().find_map(|key| lookup(*key)) {
                Some(root) => PathBuf::from(root),
                None => std::env::current_dir()?,
            },
        };

        let knowledge_dir = lookup(KNOWLEDGE_ENV_KEY)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_knowledge_dir(&root));

        let stale_days = match lookup(STALE_DAYS_ENV_KEY) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(days) => days,
                Err(_) => {
                    log::warn!(
                        "Ignoring {STALE_DAYS_ENV_KEY}={raw}: expected a whole number of days"
                    );
                    DEFAULT_STALE_DAYS
                }
            },
            None => DEFAULT_STALE_DAYS,
        };

        let config = Self {
            layout: ProjectLayout::new(&root),
            knowledge_dir,
            stale_days,
            explicit_config: lookup(CONFIG_ENV_KEY).map(PathBuf::from),
        };
        Ok(config.with_overrides_for_current_root())
    }

    /// Same configuration rebased onto another project root (per-request `path`).
    ///
    /// The root's own `.lens.toml` is re-read, so overrides follow the project.
    pub fn for_root(&self, root: &Path) -> Result<Self> {
        let canonical = root
            .canonicalize()
            .map_err(|err| ScanError::InvalidPath(format!("{}: {err}", root.display())))?;
        if !canonical.is_dir() {
            return Err(ScanError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let rebased = Self {
            layout: ProjectLayout::new(&canonical),
            knowledge_dir: self.knowledge_dir.clone(),
            stale_days: self.stale_days,
            explicit_config: self.explicit_config.clone(),
        };
        Ok(rebased.with_overrides_for_current_root())
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    fn with_overrides_for_current_root(mut self) -> Self {
        let path = self
            .explicit_config
            .clone()
            .unwrap_or_else(|| self.layout.root().join(CONFIG_FILE_NAME));
        match load_overrides(&path) {
            Ok(Some(overrides)) => {
                log::debug!("Applying layout overrides from {}", path.display());
                self.apply(overrides);
            }
            Ok(None) => {}
            Err(err) => log::warn!("{err}; using default layout"),
        }
        self
    }

    fn apply(&mut self, overrides: LayoutOverrides) {
        let mut layout = self.layout.clone();
        if let Some(dir) = overrides.docs_dir {
            layout = layout.with_docs_dir(dir);
        }
        if let Some(dir) = overrides.decisions_dir {
            layout = layout.with_decisions_dir(dir);
        }
        if let Some(dir) = overrides.audit_dir {
            layout = layout.with_audit_dir(dir);
        }
        if let Some(name) = overrides.state_file_name {
            layout = layout.with_state_file_name(name);
        }
        if let Some(dirs) = overrides.source_dirs {
            layout = layout.with_source_dirs(dirs);
        }
        if let Some(days) = overrides.stale_days {
            self.stale_days = days;
        }
        self.layout = layout;
    }
}

fn load_overrides(path: &Path) -> Result<Option<LayoutOverrides>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(invalid_config(path, err.to_string())),
    };
    let parsed: ConfigFile =
        toml::from_str(&raw).map_err(|err| invalid_config(path, err.to_string()))?;
    let overrides = parsed.layout;

    let dirs = [
        overrides.docs_dir.as_deref(),
        overrides.decisions_dir.as_deref(),
        overrides.audit_dir.as_deref(),
    ];
    let source_dirs = overrides.source_dirs.iter().flatten().map(String::as_str);
    for dir in dirs.into_iter().flatten().chain(source_dirs) {
        if !is_contained_relative(dir) {
            return Err(invalid_config(
                path,
                format!("'{dir}' must be a relative path inside the project"),
            ));
        }
    }
    if let Some(name) = overrides.state_file_name.as_deref() {
        if name.trim().is_empty() || name.contains(['/', '\\']) {
            return Err(invalid_config(
                path,
                format!("state_file_name '{name}' must be a plain file name"),
            ));
        }
    }
    Ok(Some(overrides))
}

fn invalid_config(path: &Path, message: String) -> ScanError {
    ScanError::InvalidConfig {
        path: path.display().to_string(),
        message,
    }
}

fn is_contained_relative(raw: &str) -> bool {
    let path = Path::new(raw);
    !raw.trim().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Locate the bundled knowledge bases: next to an installed binary, then this workspace,
/// then `<root>/knowledge`.
fn default_knowledge_dir(root: &Path) -> PathBuf {
    if let Some(dir) = std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(knowledge_dir_near_exe)
    {
        return dir;
    }
    let workspace = PathBuf::from(WORKSPACE_KNOWLEDGE_DIR);
    if workspace.is_dir() {
        return workspace;
    }
    root.join("knowledge")
}

fn knowledge_dir_near_exe(exe: &Path) -> Option<PathBuf> {
    let exe_dir = exe.parent()?;
    [
        exe_dir.join("knowledge"),
        exe_dir.join("../share/artifact-lens/knowledge"),
    ]
    .into_iter()
    .find(|candidate| candidate.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_root_and_stale_days_are_applied() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_string_lossy().into_owned();
        let config = LensConfig::resolve(
            None,
            env_from(&[
                ("LENS_ROOT", root.as_str()),
                ("LENS_STALE_DAYS", "3"),
                ("LENS_KNOWLEDGE_DIR", "/opt/kb"),
            ]),
        )
        .unwrap();
        assert_eq!(config.root(), tmp.path());
        assert_eq!(config.stale_days, 3);
        assert_eq!(config.knowledge_dir, PathBuf::from("/opt/kb"));
    }

    #[test]
    fn invalid_stale_days_falls_back_to_default() {
        let tmp = tempfile::tempdir().unwrap();
        let config =
            LensConfig::resolve(Some(tmp.path()), env_from(&[("LENS_STALE_DAYS", "soon")]))
                .unwrap();
        assert_eq!(config.stale_days, DEFAULT_STALE_DAYS);
    }

    #[test]
    fn project_config_file_overrides_layout() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[layout]\ndocs_dir = \"documentation\"\nsource_dirs = [\"programs\"]\nstale_days = 30\n",
        )
        .unwrap();
        let config = LensConfig::resolve(Some(tmp.path()), env_from(&[])).unwrap();
        assert_eq!(config.layout.docs_dir(), tmp.path().join("documentation"));
        assert_eq!(config.layout.source_dirs(), ["programs".to_string()]);
        assert_eq!(config.stale_days, 30);
    }

    #[test]
    fn escaping_config_file_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[layout]\ndocs_dir = \"../elsewhere\"\n",
        )
        .unwrap();
        let config = LensConfig::resolve(Some(tmp.path()), env_from(&[])).unwrap();
        assert_eq!(config.layout.docs_dir(), tmp.path().join("docs"));
    }

    #[test]
    fn malformed_config_file_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "[layout\n").unwrap();
        let config = LensConfig::resolve(Some(tmp.path()), env_from(&[])).unwrap();
        assert_eq!(config.layout, ProjectLayout::new(tmp.path()));
    }

    #[test]
    fn for_root_rejects_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LensConfig::resolve(Some(tmp.path()), env_from(&[])).unwrap();
        let err = config.for_root(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, ScanError::InvalidPath(_)));
    }
}
