//! The site context.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tome_cache::{
    CacheCategory, CacheManager, CategoryStats, ChangeSet, FileClassifier, FileEvent,
    FileEventKind, InvalidationOutcome,
};
use tome_common::normalize_path;
use tome_config::{load_config, load_config_file, BuildMode, ConfigError, LoadedConfig};
use tome_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use tome_paths::{AliasResolver, PathRegistry, ResolvedAlias};
use tome_theme::{ThemeConfig, ThemeError, ThemeResolver};

use crate::error::SiteError;

/// One site's registry, cache, diagnostics and theme resolution.
///
/// All mutation goes through `&mut self`. A host serving requests from
/// several threads wraps the context in its own lock.
#[derive(Debug)]
pub struct SiteContext {
    config: LoadedConfig,
    registry: PathRegistry,
    cache: CacheManager,
    sink: DiagnosticSink,
}

impl SiteContext {
    /// Builds a context from a loaded configuration.
    ///
    /// Initializes the path registry; fails if any configured directory is
    /// missing or a key is invalid.
    pub fn new(config: LoadedConfig) -> Result<Self, SiteError> {
        let mut registry = PathRegistry::new();
        registry.initialize(config.path_entries.iter().cloned())?;

        let mut classifier =
            FileClassifier::from_registry(&registry).with_builtin_theme_dir(&config.builtin_theme_dir);
        if let Some(path) = &config.config_path {
            classifier = classifier.with_site_config(path);
        }

        tracing::info!(
            root = %config.root_dir.display(),
            theme = %config.theme,
            mode = ?config.mode,
            "site context ready"
        );
        Ok(Self {
            config,
            registry,
            cache: CacheManager::new(classifier).with_fingerprints(),
            sink: DiagnosticSink::new(),
        })
    }

    /// Loads `tome.toml` from a project directory and builds a context.
    pub fn load(project_dir: &Path) -> Result<Self, SiteError> {
        Self::new(load_config(project_dir)?)
    }

    /// Loads an explicit configuration file and builds a context.
    pub fn from_config_file(path: &Path) -> Result<Self, SiteError> {
        Self::new(load_config_file(path)?)
    }

    /// The active configuration.
    pub fn config(&self) -> &LoadedConfig {
        &self.config
    }

    /// The initialized path registry.
    pub fn registry(&self) -> &PathRegistry {
        &self.registry
    }

    /// The cache, for hosts that store their own entries.
    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Mutable access to the cache.
    pub fn cache_mut(&mut self) -> &mut CacheManager {
        &mut self.cache
    }

    /// Resolves a symbolic reference strictly, recording a diagnostic on failure.
    pub fn resolve_alias(&mut self, reference: &str) -> Result<ResolvedAlias, SiteError> {
        AliasResolver::new(&self.registry)
            .resolve(reference)
            .map_err(|err| {
                self.sink
                    .emit(Diagnostic::error(DiagnosticCode::UNKNOWN_ALIAS, err.to_string()));
                err.into()
            })
    }

    /// Resolves an asset URL leniently; unknown references pass through.
    pub fn resolve_asset_url<'s>(&self, url: &'s str) -> Cow<'s, str> {
        AliasResolver::new(&self.registry).resolve_lenient(url)
    }

    /// A theme resolver borrowing this context's state.
    pub fn theme_resolver(&mut self) -> ThemeResolver<'_> {
        ThemeResolver::new(
            &self.registry,
            &self.config.builtin_theme_dir,
            &mut self.cache,
            &mut self.sink,
        )
    }

    /// Loads a single theme, without composing its ancestors.
    pub fn load_theme(&mut self, reference: &str) -> Result<Arc<ThemeConfig>, SiteError> {
        let result = self.theme_resolver().load(reference);
        result.map_err(|err| self.record_theme_error(err))
    }

    /// Composes a theme and its ancestors into one stylesheet.
    ///
    /// Failures are recorded in the diagnostic sink as well as returned.
    pub fn combine_theme(&mut self, reference: &str) -> Result<Arc<str>, SiteError> {
        let result = self.theme_resolver().combine(reference);
        result.map_err(|err| self.record_theme_error(err))
    }

    /// The configured theme's composed CSS.
    ///
    /// In development mode a failure is logged, recorded, and yields an
    /// empty stylesheet so the site keeps rendering. In production mode the
    /// error is returned.
    pub fn theme_css(&mut self) -> Result<Arc<str>, SiteError> {
        let reference = self.config.theme.clone();
        match self.combine_theme(&reference) {
            Ok(css) => Ok(css),
            Err(err) if self.config.mode == BuildMode::Development => {
                tracing::warn!(theme = %reference, "using empty theme css: {err}");
                Ok(Arc::from(""))
            }
            Err(err) => Err(err),
        }
    }

    /// Routes a file-system event to the cache.
    ///
    /// A change to the site configuration file also reloads the theme
    /// reference and build mode.
    pub fn on_file_event(&mut self, event: &FileEvent) -> InvalidationOutcome {
        let outcome = self.cache.on_file_event(event);
        if event.kind != FileEventKind::Delete && self.is_site_config(&event.path) {
            self.reload_config();
        }
        outcome
    }

    /// Handles a changed file.
    pub fn on_file_change(&mut self, path: impl Into<PathBuf>) -> InvalidationOutcome {
        self.on_file_event(&FileEvent::change(path))
    }

    /// Handles a created file.
    pub fn on_file_add(&mut self, path: impl Into<PathBuf>) -> InvalidationOutcome {
        self.on_file_event(&FileEvent::add(path))
    }

    /// Handles a removed file.
    pub fn on_file_delete(&mut self, path: impl Into<PathBuf>) -> InvalidationOutcome {
        self.on_file_event(&FileEvent::delete(path))
    }

    /// Checks recorded dependency fingerprints against the disk.
    ///
    /// Meant for the window before a file watcher is attached; `extra` names
    /// files that may have appeared since.
    pub fn reconcile(&mut self, extra: &[PathBuf]) -> ChangeSet {
        self.cache.reconcile(extra)
    }

    /// Statistics for every cache category.
    pub fn cache_stats(&self) -> Vec<(CacheCategory, CategoryStats)> {
        self.cache.all_stats()
    }

    /// Every diagnostic recorded since the last [`clear_all`](Self::clear_all).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.sink.diagnostics()
    }

    /// The diagnostic sink.
    pub fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }

    /// Empties every cache category, the memo and the diagnostic sink.
    pub fn clear_all(&mut self) {
        self.cache.clear_all();
        self.sink.clear();
    }

    fn record_theme_error(&mut self, err: ThemeError) -> SiteError {
        // Missing variables were already reported per variable during validation.
        if !matches!(err, ThemeError::MissingVariable { .. }) {
            self.sink.emit(err.to_diagnostic());
        }
        tracing::warn!("{err}");
        err.into()
    }

    fn is_site_config(&self, path: &Path) -> bool {
        self.config
            .config_path
            .as_deref()
            .is_some_and(|config| normalize_path(path) == config)
    }

    fn reload_config(&mut self) {
        let Some(path) = self.config.config_path.clone() else {
            return;
        };
        match load_config_file(&path) {
            Ok(fresh) => {
                if fresh.path_entries != self.config.path_entries {
                    tracing::warn!("path changes in {} take effect on restart", path.display());
                }
                if fresh.theme != self.config.theme || fresh.mode != self.config.mode {
                    tracing::info!(theme = %fresh.theme, mode = ?fresh.mode, "reloaded site configuration");
                }
                self.config.theme = fresh.theme;
                self.config.mode = fresh.mode;
            }
            Err(err) => self.record_config_error(&path, &err),
        }
    }

    fn record_config_error(&mut self, path: &Path, err: &ConfigError) {
        tracing::warn!(path = %path.display(), "keeping previous configuration: {err}");
        self.sink.emit(
            Diagnostic::error(DiagnosticCode::INVALID_CONFIG, err.to_string()).with_file(path),
        );
    }
}
