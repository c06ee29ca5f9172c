//! Agent catalog: resolves named capability records.
//!
//! Records come from two places: inline registration (a workflow supplies
//! the record directly) or a directory of JSON files grouped by domain
//! subdirectory. Successful resolutions from disk are cached per
//! `(domain, name)` for the catalog's lifetime, so a second resolve never
//! re-reads the source.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use repolens_core::AgentSpec;

use crate::error::{OrchestratorError, Result};

/// Record directories starting with this prefix are framework-internal
/// and excluded from discovery.
const RESERVED_PREFIX: char = '_';

/// Catalog of agent capability records for one orchestrator.
#[derive(Debug, Default)]
pub struct AgentCatalog {
    agents_dir: Option<PathBuf>,
    inline: HashMap<String, AgentSpec>,
    cache: HashMap<String, AgentSpec>,
}

impl AgentCatalog {
    /// Catalog with no external source; only inline records resolve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog backed by a directory of `<domain>/<name>.json` records.
    pub fn with_source(agents_dir: impl Into<PathBuf>) -> Self {
        Self {
            agents_dir: Some(agents_dir.into()),
            ..Self::default()
        }
    }

    /// Register a record built in-process. Keyed by `spec.name`,
    /// last-write-wins.
    pub fn register(&mut self, spec: AgentSpec) {
        self.inline.insert(spec.name.clone(), spec);
    }

    /// Resolve a record by name, optionally scoped to a domain.
    ///
    /// Inline records take precedence; disk records are cached per
    /// `(domain, name)`.
    pub fn resolve(&mut self, name: &str, domain: Option<&str>) -> Result<AgentSpec> {
        if let Some(spec) = self.inline.get(name) {
            return Ok(spec.clone());
        }

        let cache_key = match domain {
            Some(domain) => format!("{}/{}", domain, name),
            None => name.to_string(),
        };
        if let Some(spec) = self.cache.get(&cache_key) {
            return Ok(spec.clone());
        }

        let discovered = self.discover(domain);
        let path = discovered
            .get(name)
            .ok_or_else(|| OrchestratorError::AgentNotFound(name.to_string()))?;

        let spec = Self::load_record(name, path)?;
        debug!(agent = name, path = %path.display(), "Loaded agent record");
        self.cache.insert(cache_key, spec.clone());
        Ok(spec)
    }

    /// Enumerate available record names, optionally filtered to a domain.
    ///
    /// Returns name -> file path. Directories whose name starts with the
    /// reserved prefix are skipped.
    pub fn discover(&self, domain: Option<&str>) -> BTreeMap<String, PathBuf> {
        let mut records = BTreeMap::new();

        let Some(ref agents_dir) = self.agents_dir else {
            return records;
        };

        let search_dirs: Vec<PathBuf> = match domain {
            Some(domain) => vec![agents_dir.join(domain)],
            None => fs::read_dir(agents_dir)
                .map(|entries| {
                    entries
                        .filter_map(|e| e.ok())
                        .map(|e| e.path())
                        .collect()
                })
                .unwrap_or_default(),
        };

        for dir in search_dirs {
            if !dir.is_dir() || Self::is_reserved(&dir) {
                continue;
            }

            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        records.insert(stem.to_string(), path);
                    }
                }
            }
        }

        records
    }

    /// Resolve every record of one domain.
    pub fn load_domain(&mut self, domain: &str) -> Result<HashMap<String, AgentSpec>> {
        let names: Vec<String> = self.discover(Some(domain)).into_keys().collect();

        let mut agents = HashMap::new();
        for name in names {
            let spec = self.resolve(&name, Some(domain))?;
            agents.insert(name, spec);
        }
        Ok(agents)
    }

    fn is_reserved(dir: &Path) -> bool {
        dir.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(RESERVED_PREFIX))
    }

    fn load_record(name: &str, path: &Path) -> Result<AgentSpec> {
        let raw = fs::read_to_string(path)?;
        let mut spec: AgentSpec = serde_json::from_str(&raw)
            .map_err(|e| OrchestratorError::malformed_agent(name, e))?;
        if spec.name.is_empty() {
            spec.name = name.to_string();
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repolens_core::DEFAULT_MODEL;
    use std::fs;
    use tempfile::TempDir;

    fn write_record(root: &Path, domain: &str, name: &str, body: &str) -> PathBuf {
        let dir = root.join(domain);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.json", name));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_resolve_inline() {
        let mut catalog = AgentCatalog::new();
        catalog.register(AgentSpec::new("analyzer", "Analyzes code", "You analyze."));

        let spec = catalog.resolve("analyzer", None).unwrap();
        assert_eq!(spec.description, "Analyzes code");
    }

    #[test]
    fn test_resolve_missing_is_not_found() {
        let mut catalog = AgentCatalog::new();
        let err = catalog.resolve("ghost", None).unwrap_err();
        assert!(matches!(err, OrchestratorError::AgentNotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_resolve_from_disk_with_defaults() {
        let root = TempDir::new().unwrap();
        write_record(
            root.path(),
            "ux",
            "ui-designer",
            r#"{"description": "Designs interfaces", "instructions": "You design."}"#,
        );

        let mut catalog = AgentCatalog::with_source(root.path());
        let spec = catalog.resolve("ui-designer", Some("ux")).unwrap();
        assert_eq!(spec.name, "ui-designer");
        assert!(spec.tools.is_empty());
        assert_eq!(spec.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_resolve_caches_per_domain_and_name() {
        let root = TempDir::new().unwrap();
        let path = write_record(
            root.path(),
            "ux",
            "ui-designer",
            r#"{"description": "Designs interfaces", "instructions": "You design."}"#,
        );

        let mut catalog = AgentCatalog::with_source(root.path());
        let first = catalog.resolve("ui-designer", Some("ux")).unwrap();

        // Removing the file proves the second resolve never re-reads disk.
        fs::remove_file(path).unwrap();
        let second = catalog.resolve("ui-designer", Some("ux")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_record() {
        let root = TempDir::new().unwrap();
        write_record(
            root.path(),
            "ux",
            "broken",
            r#"{"description": "Missing instructions"}"#,
        );

        let mut catalog = AgentCatalog::with_source(root.path());
        let err = catalog.resolve("broken", Some("ux")).unwrap_err();
        assert!(matches!(err, OrchestratorError::MalformedAgent { name, .. } if name == "broken"));
    }

    #[test]
    fn test_discovery_skips_reserved_dirs() {
        let root = TempDir::new().unwrap();
        write_record(
            root.path(),
            "architecture",
            "analyzer",
            r#"{"description": "d", "instructions": "i"}"#,
        );
        write_record(
            root.path(),
            "_internal",
            "hidden",
            r#"{"description": "d", "instructions": "i"}"#,
        );

        let catalog = AgentCatalog::with_source(root.path());
        let discovered = catalog.discover(None);
        assert!(discovered.contains_key("analyzer"));
        assert!(!discovered.contains_key("hidden"));
    }

    #[test]
    fn test_load_domain() {
        let root = TempDir::new().unwrap();
        write_record(
            root.path(),
            "architecture",
            "analyzer",
            r#"{"description": "d", "instructions": "i"}"#,
        );
        write_record(
            root.path(),
            "architecture",
            "doc-writer",
            r#"{"description": "d", "instructions": "i", "model": "opus"}"#,
        );

        let mut catalog = AgentCatalog::with_source(root.path());
        let agents = catalog.load_domain("architecture").unwrap();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents["doc-writer"].model, "opus");
    }
}
