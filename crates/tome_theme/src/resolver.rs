//! Theme reference resolution, loading and chain composition.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tome_cache::{CacheCategory, CacheManager};
use tome_common::normalize_path;
use tome_diagnostics::DiagnosticSink;
use tome_paths::{AliasResolver, PathCategory, PathRegistry};

use crate::config::{push_file, ThemeConfig, ThemeLocation};
use crate::error::ThemeError;
use crate::manifest::{find_manifest, load_manifest, OverrideMode};
use crate::validate::validate;

/// The reference that always names the built-in theme.
pub const BUILTIN_THEME: &str = "default";

/// Resolves, loads and composes themes.
///
/// The resolver borrows the registry, cache and diagnostic sink of the
/// owning site for the duration of one operation. Loaded themes are cached
/// in [`CacheCategory::Theme`] and composed CSS in the cache's combined-CSS
/// memo, so repeated calls are cheap until a file event invalidates them.
pub struct ThemeResolver<'a> {
    registry: &'a PathRegistry,
    builtin_dir: &'a Path,
    cache: &'a mut CacheManager,
    sink: &'a mut DiagnosticSink,
}

impl<'a> ThemeResolver<'a> {
    /// Creates a resolver over borrowed site state.
    pub fn new(
        registry: &'a PathRegistry,
        builtin_dir: &'a Path,
        cache: &'a mut CacheManager,
        sink: &'a mut DiagnosticSink,
    ) -> Self {
        Self {
            registry,
            builtin_dir,
            cache,
            sink,
        }
    }

    /// Maps a theme reference to its directory.
    ///
    /// `default` is the built-in theme, `@key/sub` goes through the alias
    /// resolver, and a bare name is looked up as a subdirectory of every
    /// theme-category directory in registration order.
    pub fn resolve_reference(&self, reference: &str) -> Result<ThemeLocation, ThemeError> {
        let not_found = |searched: Vec<PathBuf>| ThemeError::NotFound {
            reference: reference.to_string(),
            searched,
        };

        if reference == BUILTIN_THEME {
            let dir = normalize_path(self.builtin_dir);
            return match find_manifest(&dir) {
                Some(_) => Ok(location(dir)),
                None => Err(not_found(vec![dir])),
            };
        }

        if AliasResolver::is_reference(reference) {
            let resolved = AliasResolver::new(self.registry).resolve(reference)?;
            let dir = resolved.absolute_path;
            return match find_manifest(&dir) {
                Some(_) => Ok(location(dir)),
                None => Err(not_found(vec![dir])),
            };
        }

        let mut searched = Vec::new();
        for entry in self.registry.entries_in(PathCategory::Theme) {
            let dir = normalize_path(&entry.absolute_path.join(reference));
            if find_manifest(&dir).is_some() {
                return Ok(location(dir));
            }
            searched.push(dir);
        }
        Err(not_found(searched))
    }

    /// Loads one theme without its parents, from the cache when possible.
    ///
    /// Validation warnings go to the diagnostic sink. A required variable
    /// that the theme cannot inherit is an error.
    pub fn load(&mut self, reference: &str) -> Result<Arc<ThemeConfig>, ThemeError> {
        if let Some(config) = self
            .cache
            .get_cached::<ThemeConfig>(CacheCategory::Theme, reference)
        {
            return Ok(config);
        }

        let location = self.resolve_reference(reference)?;
        let dir = location.physical_path;
        let (manifest_path, manifest) = load_manifest(&dir)?;

        let mut dependencies = vec![manifest_path.clone()];
        let mut per_file_css = Vec::new();
        let mut combined_css = String::new();
        for file in &manifest.files {
            let path = normalize_path(&dir.join(file));
            dependencies.push(path.clone());
            if !is_css(file) || !path.is_file() {
                continue;
            }
            let css = std::fs::read_to_string(&path).map_err(|source| ThemeError::Io {
                path: path.clone(),
                source,
            })?;
            push_file(&mut combined_css, &manifest.name, file, &css);
            per_file_css.push((file.clone(), css));
        }

        let own_css = per_file_css
            .iter()
            .map(|(_, css)| css.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let report = validate(
            &dir,
            &manifest_path,
            &manifest,
            &own_css,
            manifest.extends.is_some(),
        );
        for warning in &report.warnings {
            tracing::warn!(theme = %manifest.name, "{}", warning.message);
        }
        self.sink.extend(report.warnings.iter().cloned());
        if !report.is_ok() {
            self.sink.extend(report.errors);
            return Err(ThemeError::MissingVariable {
                theme: manifest.name,
                variables: report.missing_variables,
            });
        }

        tracing::debug!(
            reference,
            theme = %location.short_name,
            files = per_file_css.len(),
            "resolved theme"
        );
        let config = ThemeConfig {
            name: manifest.name.clone(),
            reference: reference.to_string(),
            path: dir,
            manifest_path,
            manifest,
            combined_css,
            per_file_css,
            dependencies: dependencies.clone(),
            warnings: report.warnings,
        };
        Ok(self
            .cache
            .set_cache(CacheCategory::Theme, reference, config, dependencies))
    }

    /// Loads the whole `extends` chain starting at `reference`, child first.
    ///
    /// Each element carries the set of file names to omit from that theme.
    /// Fails as soon as a theme directory is entered twice.
    pub fn chain(
        &mut self,
        reference: &str,
    ) -> Result<Vec<(Arc<ThemeConfig>, HashSet<String>)>, ThemeError> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut walked = Vec::new();
        let mut skip = HashSet::new();
        let mut current = reference.to_string();

        loop {
            walked.push(current.clone());
            let config = self.load(&current)?;
            if !visited.insert(config.path.clone()) {
                return Err(ThemeError::CircularInheritance { chain: walked });
            }

            let mode = config.manifest.override_mode;
            let parent = config.manifest.extends.clone();
            let next_skip = match mode {
                OverrideMode::Override => skip
                    .iter()
                    .cloned()
                    .chain(config.manifest.files.iter().cloned())
                    .collect(),
                OverrideMode::Merge | OverrideMode::Replace => skip.clone(),
            };
            chain.push((config, std::mem::replace(&mut skip, next_skip)));

            match (mode, parent) {
                (OverrideMode::Replace, _) | (_, None) => break,
                (_, Some(parent)) => current = parent,
            }
        }
        Ok(chain)
    }

    /// Composes the CSS of `reference` and its ancestors.
    ///
    /// The result is memoized per reference with every file of the chain as
    /// a dependency.
    pub fn combine(&mut self, reference: &str) -> Result<Arc<str>, ThemeError> {
        if let Some(css) = self.cache.combined_css(reference) {
            tracing::debug!(reference, "combined css memo hit");
            return Ok(css);
        }

        let chain = self.chain(reference)?;
        let mut css = String::new();
        let mut dependencies = Vec::new();
        for (config, skip) in chain.iter().rev() {
            for (file, text) in &config.per_file_css {
                if !skip.contains(file) {
                    push_file(&mut css, &config.name, file, text);
                }
            }
            dependencies.extend(config.dependencies.iter().cloned());
        }

        tracing::info!(reference, themes = chain.len(), bytes = css.len(), "combined theme css");
        let css: Arc<str> = css.into();
        self.cache
            .set_combined_css(reference, Arc::clone(&css), dependencies);
        Ok(css)
    }
}

fn location(physical_path: PathBuf) -> ThemeLocation {
    let short_name = physical_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    ThemeLocation {
        physical_path,
        short_name,
    }
}

fn is_css(file: &str) -> bool {
    Path::new(file)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("css"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tome_paths::PathEntry;

    struct Fixture {
        dir: tempfile::TempDir,
        registry: PathRegistry,
        builtin: PathBuf,
        cache: CacheManager,
        sink: DiagnosticSink,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir_all(dir.path().join("themes")).unwrap();
            fs::create_dir_all(dir.path().join("builtin")).unwrap();
            let mut registry = PathRegistry::new();
            registry
                .initialize(vec![PathEntry::new(
                    "themes",
                    dir.path().join("themes"),
                    PathCategory::Theme,
                )])
                .unwrap();
            Self {
                builtin: dir.path().join("builtin"),
                dir,
                registry,
                cache: CacheManager::default(),
                sink: DiagnosticSink::new(),
            }
        }

        fn theme(&self, name: &str, manifest: &str, files: &[(&str, &str)]) -> PathBuf {
            let dir = self.dir.path().join("themes").join(name);
            self.write_theme(&dir, manifest, files);
            dir
        }

        fn builtin(&self, manifest: &str, files: &[(&str, &str)]) {
            self.write_theme(&self.builtin, manifest, files);
        }

        fn write_theme(&self, dir: &Path, manifest: &str, files: &[(&str, &str)]) {
            fs::create_dir_all(dir).unwrap();
            fs::write(dir.join("theme.toml"), manifest).unwrap();
            for (name, css) in files {
                fs::write(dir.join(name), css).unwrap();
            }
        }

        fn resolver(&mut self) -> ThemeResolver<'_> {
            ThemeResolver::new(&self.registry, &self.builtin, &mut self.cache, &mut self.sink)
        }

        fn combine(&mut self, reference: &str) -> Result<String, ThemeError> {
            self.resolver().combine(reference).map(|css| css.to_string())
        }
    }

    fn manifest(name: &str, extends: Option<&str>, mode: &str, files: &[&str]) -> String {
        let extends = extends
            .map(|e| format!("extends = \"{e}\"\n"))
            .unwrap_or_default();
        let files = files
            .iter()
            .map(|f| format!("\"{f}\""))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "name = \"{name}\"\nversion = \"1.0.0\"\n{extends}override_mode = \"{mode}\"\nfiles = [{files}]\n"
        )
    }

    #[test]
    fn merge_chain_orders_root_first() {
        let mut fx = Fixture::new();
        fx.theme("c", &manifest("C", None, "merge", &["c.css"]), &[("c.css", ".c{}")]);
        fx.theme("b", &manifest("B", Some("c"), "merge", &["b.css"]), &[("b.css", ".b{}")]);
        fx.theme("a", &manifest("A", Some("b"), "merge", &["a.css"]), &[("a.css", ".a{}")]);

        let css = fx.combine("a").unwrap();
        let (c, b, a) = (
            css.find(".c{}").unwrap(),
            css.find(".b{}").unwrap(),
            css.find(".a{}").unwrap(),
        );
        assert!(c < b && b < a);
        assert_eq!(css.matches(".c{}").count(), 1);
        assert!(css.contains("/* tome: C/c.css */"));
    }

    #[test]
    fn override_skips_redeclared_parent_files() {
        let mut fx = Fixture::new();
        fx.theme(
            "c",
            &manifest("C", None, "merge", &["x.css", "y.css"]),
            &[("x.css", ".parent-x{}"), ("y.css", ".parent-y{}")],
        );
        fx.theme(
            "b",
            &manifest("B", Some("c"), "override", &["x.css"]),
            &[("x.css", ".child-x{}")],
        );

        let css = fx.combine("b").unwrap();
        assert!(!css.contains(".parent-x{}"));
        assert!(css.contains(".parent-y{}"));
        assert!(css.contains(".child-x{}"));
    }

    #[test]
    fn override_skip_set_accumulates_through_merge() {
        let mut fx = Fixture::new();
        fx.theme(
            "root",
            &manifest("Root", None, "merge", &["x.css", "z.css"]),
            &[("x.css", ".root-x{}"), ("z.css", ".root-z{}")],
        );
        fx.theme(
            "mid",
            &manifest("Mid", Some("root"), "merge", &["m.css"]),
            &[("m.css", ".mid{}")],
        );
        fx.theme(
            "leaf",
            &manifest("Leaf", Some("mid"), "override", &["x.css"]),
            &[("x.css", ".leaf-x{}")],
        );

        let css = fx.combine("leaf").unwrap();
        assert!(!css.contains(".root-x{}"));
        assert!(css.contains(".root-z{}"));
        assert!(css.contains(".mid{}"));
    }

    #[test]
    fn override_chain_cut_off_by_replace_ancestor() {
        let mut fx = Fixture::new();
        fx.theme("d", &manifest("D", None, "merge", &["d.css"]), &[("d.css", ".d{}")]);
        fx.theme(
            "c",
            &manifest("C", Some("d"), "replace", &["x.css", "y.css", "z.css"]),
            &[("x.css", ".c-x{}"), ("y.css", ".c-y{}"), ("z.css", ".c-z{}")],
        );
        fx.theme(
            "b",
            &manifest("B", Some("c"), "override", &["y.css"]),
            &[("y.css", ".b-y{}")],
        );
        fx.theme(
            "a",
            &manifest("A", Some("b"), "override", &["x.css"]),
            &[("x.css", ".a-x{}")],
        );

        let css = fx.combine("a").unwrap();
        let (z, y, x) = (
            css.find(".c-z{}").unwrap(),
            css.find(".b-y{}").unwrap(),
            css.find(".a-x{}").unwrap(),
        );
        assert!(z < y && y < x);
        assert!(!css.contains(".c-x{}"));
        assert!(!css.contains(".c-y{}"));
        assert!(!css.contains(".d{}"));
        assert!(!css.contains("/* tome: D/"));
        assert!(!fx.cache.contains(CacheCategory::Theme, "d"));
    }

    #[test]
    fn replace_never_consults_parent() {
        let mut fx = Fixture::new();
        fx.theme("c", &manifest("C", None, "merge", &["c.css"]), &[("c.css", ".c{}")]);
        fx.theme(
            "b",
            &manifest("B", Some("c"), "replace", &["b.css"]),
            &[("b.css", ".b{}")],
        );

        let css = fx.combine("b").unwrap();
        assert!(css.contains(".b{}"));
        assert!(!css.contains(".c{}"));
        assert!(!fx.cache.contains(CacheCategory::Theme, "c"));
    }

    #[test]
    fn circular_inheritance_detected() {
        let mut fx = Fixture::new();
        fx.theme("a", &manifest("A", Some("b"), "merge", &[]), &[]);
        fx.theme("b", &manifest("B", Some("a"), "merge", &[]), &[]);

        match fx.combine("a") {
            Err(ThemeError::CircularInheritance { chain }) => assert_eq!(chain, ["a", "b", "a"]),
            other => panic!("expected CircularInheritance, got {other:?}"),
        }
    }

    #[test]
    fn self_extension_is_circular() {
        let mut fx = Fixture::new();
        fx.theme("a", &manifest("A", Some("@themes/a"), "merge", &[]), &[]);
        assert!(matches!(
            fx.combine("a"),
            Err(ThemeError::CircularInheritance { .. })
        ));
    }

    #[test]
    fn extends_default_builtin_comes_first() {
        let mut fx = Fixture::new();
        fx.builtin(
            &manifest("Default", None, "merge", &["base.css"]),
            &[("base.css", ":root { --x: red; }")],
        );
        fx.theme(
            "T",
            &manifest("T", Some("default"), "merge", &["color.css"]),
            &[("color.css", ":root { --y: blue; }")],
        );

        let css = fx.combine("T").unwrap();
        let x = css.find("--x: red;").unwrap();
        let y = css.find("--y: blue;").unwrap();
        assert!(x < y);
    }

    #[test]
    fn combine_is_memoized_until_invalidated() {
        let mut fx = Fixture::new();
        let dir = fx.theme("a", &manifest("A", None, "merge", &["a.css"]), &[("a.css", ".one{}")]);

        assert!(fx.combine("a").unwrap().contains(".one{}"));
        fs::write(dir.join("a.css"), ".two{}").unwrap();
        assert!(fx.combine("a").unwrap().contains(".one{}"));

        fx.cache.on_file_change(dir.join("a.css"));
        assert!(fx.combine("a").unwrap().contains(".two{}"));
    }

    #[test]
    fn missing_file_is_skipped_with_diagnostic() {
        let mut fx = Fixture::new();
        fx.theme(
            "a",
            &manifest("A", None, "merge", &["a.css", "gone.css", "logo.svg"]),
            &[("a.css", ".a{}"), ("logo.svg", "<svg/>")],
        );

        let css = fx.combine("a").unwrap();
        assert!(css.contains(".a{}"));
        assert!(!css.contains("<svg/>"));
        assert_eq!(fx.sink.len(), 1);
        assert_eq!(
            fx.sink.diagnostics()[0].code,
            tome_diagnostics::DiagnosticCode::MISSING_FILE
        );
    }

    #[test]
    fn missing_variable_without_parent_is_fatal() {
        let mut fx = Fixture::new();
        fx.theme(
            "a",
            "name = \"A\"\nversion = \"1.0.0\"\nfiles = [\"a.css\"]\n[required_variables]\ncolors = [\"--color-primary\"]\n",
            &[("a.css", ".a { color: var(--color-primary); }")],
        );

        let err = fx.combine("a").unwrap_err();
        assert!(matches!(err, ThemeError::MissingVariable { ref variables, .. } if variables == &["--color-primary"]));
        assert!(fx.sink.has_errors());
    }

    #[test]
    fn delimiter_comments_do_not_satisfy_required_variables() {
        let mut fx = Fixture::new();
        fx.theme(
            "a",
            "name = \"A\"\nversion = \"1.0.0\"\nfiles = [\"a.css\"]\n[required_variables]\ncolors = [\"tome\"]\n",
            &[("a.css", ".a{}")],
        );

        let err = fx.combine("a").unwrap_err();
        assert!(matches!(err, ThemeError::MissingVariable { ref variables, .. } if variables == &["tome"]));
    }

    #[test]
    fn resolve_reference_forms() {
        let mut fx = Fixture::new();
        fx.builtin(&manifest("Default", None, "merge", &[]), &[]);
        let brand = fx.theme("brand", &manifest("Brand", None, "merge", &[]), &[]);
        let resolver = fx.resolver();

        assert_eq!(resolver.resolve_reference("brand").unwrap().physical_path, brand);
        assert_eq!(resolver.resolve_reference("@themes/brand").unwrap().short_name, "brand");
        assert!(resolver
            .resolve_reference("default")
            .unwrap()
            .physical_path
            .ends_with("builtin"));
    }

    #[test]
    fn resolve_reference_errors() {
        let mut fx = Fixture::new();
        let resolver = fx.resolver();

        match resolver.resolve_reference("nope") {
            Err(ThemeError::NotFound { searched, .. }) => assert_eq!(searched.len(), 1),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(matches!(
            resolver.resolve_reference("@assets/x"),
            Err(ThemeError::Path(_))
        ));
        assert!(matches!(
            resolver.resolve_reference("default"),
            Err(ThemeError::NotFound { .. })
        ));
    }
}
