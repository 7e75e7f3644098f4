//! Per-directory rendering context.
//!
//! One [`Context`] exists for every directory of the source tree. It is set
//! up once (template, style bundle, asset scan) and then converts its files
//! and recurses into subdirectories with child contexts. Children see a
//! snapshot of their parent's composed template and style markup, and look
//! up assets they don't own through the parent chain. A child's own template
//! wraps the parent's composed one, so page content sits innermost inside
//! the root's template.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use mdsite_markdown::{Document, LinkResolver};
use tracing::{debug, info, warn};

use crate::SiteError;
use crate::assets::{AssetTable, renamed};
use crate::page::render_page;
use crate::root::SiteRoot;
use crate::styles;

/// A parsed source and its generated HTML.
#[derive(Debug)]
pub struct Converted {
    pub document: Document,
    pub html: String,
}

/// Conversion state of one source directory.
pub struct Context<'a> {
    root: &'a SiteRoot,
    parent: Option<&'a Context<'a>>,
    source_dir: PathBuf,
    output_dir: PathBuf,
    depth: usize,
    /// Composed template: this directory's outermost, the root's innermost.
    template: String,
    /// Accumulated `<link>` markup, the parent's plus this directory's bundle.
    styles: String,
    assets: RefCell<AssetTable>,
}

impl<'a> Context<'a> {
    /// Context for the top of the source tree, writing into the root's output.
    pub fn root(root: &'a SiteRoot, source_dir: &Path) -> Result<Self, SiteError> {
        if !source_dir.is_dir() {
            return Err(SiteError::SourceNotFound(source_dir.to_path_buf()));
        }
        Self::new(
            root,
            None,
            source_dir.to_path_buf(),
            root.output_dir().to_path_buf(),
        )
    }

    /// Context for the subdirectory `name`, at the same relative path on
    /// both the source and output side.
    pub fn child(&self, name: &str) -> Result<Context<'_>, SiteError> {
        Context::new(
            self.root,
            Some(self),
            self.source_dir.join(name),
            self.output_dir.join(name),
        )
    }

    fn new(
        root: &'a SiteRoot,
        parent: Option<&'a Context<'a>>,
        source_dir: PathBuf,
        output_dir: PathBuf,
    ) -> Result<Self, SiteError> {
        let depth = parent.map_or(0, |p| p.depth + 1);
        let layout = root.layout();
        info!(depth, path = %source_dir.display(), "Scanning directory");

        // Assets come first so the template can reference them.
        let assets = AssetTable::scan(&source_dir.join(&layout.static_dir))?;
        for (relative, _) in assets.discovered() {
            debug!(depth, asset = relative, "Discovered asset");
        }

        let mut context = Self {
            root,
            parent,
            source_dir,
            output_dir,
            depth,
            template: String::new(),
            styles: parent.map(|p| p.styles.clone()).unwrap_or_default(),
            assets: RefCell::new(assets),
        };
        context.template = context.compose_template()?;
        context.bundle_styles()?;
        root.count(|s| s.directories += 1);
        Ok(context)
    }

    fn compose_template(&self) -> Result<String, SiteError> {
        let layout = self.root.layout();
        let path = self.source_dir.join(&layout.template_file);
        let own = if path.is_file() {
            info!(depth = self.depth, path = %path.display(), "Found template");
            let source = fs::read_to_string(&path).map_err(SiteError::io(&path))?;
            self.convert(&source, &path, None)?.html
        } else {
            layout.placeholder.clone()
        };

        // The parent's composed template goes inside this directory's own.
        Ok(match self.parent {
            Some(parent) => self.root.fill_template(&own, &parent.template),
            None => own,
        })
    }

    fn bundle_styles(&mut self) -> Result<(), SiteError> {
        let layout = self.root.layout();
        let dir = self.source_dir.join(&layout.styles_dir);
        if !dir.is_dir() {
            return Ok(());
        }

        let files = styles::stylesheets(&dir)?;
        let dir_name = self
            .source_dir
            .file_name()
            .map_or_else(|| "site".to_owned(), |n| n.to_string_lossy().into_owned());
        let bundle_name = format!("{dir_name}-{}.css", self.generate_id());
        info!(depth = self.depth, bundle = %bundle_name, "Found styles, generating bundle");
        for file in &files {
            debug!(depth = self.depth, stylesheet = %file.display(), "Bundling stylesheet");
        }

        let css = styles::bundle(&files)?;
        self.root.write_bundle(&bundle_name, &css)?;
        self.styles
            .push_str(&styles::link_tag(&layout.static_url(&bundle_name)));
        Ok(())
    }

    /// Parse `source` and generate its HTML against this context.
    ///
    /// `origin` names the source in errors. When `log_name` is given and
    /// debug logs are enabled, the node tree is dumped to `<stem>.log` in
    /// this directory's output folder.
    pub fn convert(
        &self,
        source: &str,
        origin: &Path,
        log_name: Option<&str>,
    ) -> Result<Converted, SiteError> {
        let document = Document::parse(source).map_err(|source| SiteError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        if let Some(file_name) = log_name
            && self.root.debug_logs()
        {
            let log_path = self.output_dir.join(format!("{}.log", page_stem(file_name)));
            fs::write(&log_path, document.debug_tree()).map_err(SiteError::io(&log_path))?;
        }

        let html = document.render(self)?;
        Ok(Converted { document, html })
    }

    /// Output URL of an asset referenced from this directory.
    ///
    /// The first request for an asset of this directory copies it into the
    /// shared static folder under a fresh name; later requests reuse that
    /// name. Assets not found here are looked up in the ancestors. Returns
    /// `Ok(None)` when no directory up to the root has the asset.
    pub fn asset_path(&self, path: &str) -> Result<Option<String>, SiteError> {
        {
            let mut assets = self.assets.borrow_mut();
            if let Some(source) = assets.take_unused(path) {
                let name = renamed(path, &self.generate_id());
                debug!(depth = self.depth, asset = path, renamed = %name, "Copying asset");
                self.root.copy_asset(&source, &name)?;
                assets.record(path, name);
            }
            if let Some(name) = assets.resolved(path) {
                return Ok(Some(self.root.layout().static_url(name)));
            }
        }

        match self.parent {
            Some(parent) => parent.asset_path(path),
            None => {
                warn!(depth = self.depth, asset = path, "Missing asset");
                Ok(None)
            }
        }
    }

    /// Identifier unique across the whole build.
    pub fn generate_id(&self) -> String {
        self.root.generate_id()
    }

    /// Convert one markdown file of this directory into a complete page.
    pub fn convert_file(&self, file_name: &str) -> Result<(), SiteError> {
        let in_file = self.source_dir.join(file_name);
        let out_file = self
            .output_dir
            .join(format!("{}.html", page_stem(file_name)));
        info!(
            depth = self.depth,
            source = %in_file.display(),
            output = %out_file.display(),
            "Converting page"
        );

        let source = fs::read_to_string(&in_file).map_err(SiteError::io(&in_file))?;
        let converted = self.convert(&source, &in_file, Some(file_name))?;
        let metadata = converted.document.metadata(in_file.display().to_string());

        let body = self.root.fill_template(&self.template, &converted.html);
        let html = render_page(&metadata.title, &self.styles, &body);
        fs::write(&out_file, html).map_err(SiteError::io(&out_file))?;

        self.root.count(|s| s.pages += 1);
        Ok(())
    }

    /// Convert every non-reserved file, then recurse into subdirectories.
    ///
    /// Entries are handled in name order.
    pub fn process(&self) -> Result<(), SiteError> {
        info!(depth = self.depth, path = %self.source_dir.display(), "Processing directory");
        fs::create_dir_all(&self.output_dir).map_err(SiteError::io(&self.output_dir))?;

        let layout = self.root.layout();
        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.source_dir).map_err(SiteError::io(&self.source_dir))? {
            let entry = entry.map_err(SiteError::io(&self.source_dir))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if layout.is_reserved(&name) {
                continue;
            }
            let path = entry.path();
            if path.is_file() {
                files.push(name);
            } else if path.is_dir() {
                dirs.push(name);
            }
        }
        files.sort();
        dirs.sort();

        for file in &files {
            self.convert_file(file)?;
        }
        for dir in &dirs {
            self.child(dir)?.process()?;
        }
        Ok(())
    }

    /// Nesting level below the root context.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn styles(&self) -> &str {
        &self.styles
    }
}

impl LinkResolver for Context<'_> {
    type Error = SiteError;

    fn resolve_asset(&self, path: &str) -> Result<Option<String>, SiteError> {
        self.asset_path(path)
    }
}

/// File name without a trailing `.md`.
fn page_stem(file_name: &str) -> &str {
    file_name.strip_suffix(".md").unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::{IdSource, SiteLayout};

    /// Ids `00000001`, `00000002`, ... in call order.
    fn counting_ids() -> IdSource {
        let mut n = 0u32;
        Box::new(move || {
            n += 1;
            format!("{n:08x}")
        })
    }

    fn new_root(temp: &TempDir) -> SiteRoot {
        SiteRoot::create(&temp.path().join("output"), SiteLayout::default())
            .unwrap()
            .with_id_source(counting_ids())
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn input(temp: &TempDir) -> PathBuf {
        temp.path().join("input")
    }

    fn build(temp: &TempDir) -> SiteRoot {
        let root = new_root(temp);
        Context::root(&root, &input(temp)).unwrap().process().unwrap();
        root
    }

    fn read_output(temp: &TempDir, relative: &str) -> String {
        fs::read_to_string(temp.path().join("output").join(relative)).unwrap()
    }

    #[test]
    fn test_page_with_template_and_styles() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("_template.md"), "# Site\n\n{{content}}\n");
        write(&src.join("_styles/main.css"), "body {}");
        write(&src.join("index.md"), "# Home\n\nHello");

        build(&temp);

        assert_eq!(
            read_output(&temp, "index.html"),
            concat!(
                "<!doctype html><html><head><title>Home</title><meta charset=\"utf-8\">",
                "<link rel=\"stylesheet\" type=\"text/css\" href=\"/_static/input-00000001.css\">",
                "</head><body><h1>Site</h1><h1>Home</h1><p>Hello</p></body></html>",
            )
        );
        let bundle = read_output(&temp, "_static/input-00000001.css");
        assert!(bundle.starts_with("/* "));
        assert!(bundle.contains("main.css */\nbody {}\n"));
    }

    #[test]
    fn test_three_level_template_nesting() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("_template.md"), "Root top\n\n{{content}}\n\nRoot bottom");
        write(&src.join("a/_template.md"), "A top\n\n{{content}}");
        write(&src.join("a/b/_template.md"), "B top\n\n{{content}}");
        write(&src.join("a/b/page.md"), "Leaf");

        build(&temp);

        let html = read_output(&temp, "a/b/page.html");
        let body = html
            .split("<body>")
            .nth(1)
            .and_then(|rest| rest.strip_suffix("</body></html>"))
            .unwrap();
        assert_eq!(
            body,
            "<p>B top</p><p>A top</p><p>Root top</p><p>Leaf</p><p>Root bottom</p>"
        );
        for marker in ["Root top", "A top", "B top", "Root bottom"] {
            assert_eq!(html.matches(marker).count(), 1, "{marker} must appear once");
        }
    }

    #[test]
    fn test_child_template_wraps_parent_template() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("_template.md"), "Root top\n\n{{content}}");
        write(&src.join("a/_template.md"), "A top\n\n{{content}}");
        write(&src.join("a/page.md"), "Leaf");

        build(&temp);

        let html = read_output(&temp, "a/page.html");
        assert!(html.contains("<body><p>A top</p><p>Root top</p><p>Leaf</p></body>"));
    }

    #[test]
    fn test_directory_without_template_inherits_parent() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("_template.md"), "Header\n\n{{content}}");
        write(&src.join("plain/page.md"), "Body");

        build(&temp);

        let html = read_output(&temp, "plain/page.html");
        assert!(html.contains("<body><p>Header</p><p>Body</p></body>"));
    }

    #[test]
    fn test_asset_resolution_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("_static/img/logo.png"), "PNG");

        let root = new_root(&temp);
        let context = Context::root(&root, &src).unwrap();

        let first = context.asset_path("img/logo.png").unwrap();
        let second = context.asset_path("img/logo.png").unwrap();
        assert_eq!(first.as_deref(), Some("/_static/logo-00000001.png"));
        assert_eq!(first, second);

        let copied: Vec<_> = fs::read_dir(root.static_dir()).unwrap().collect();
        assert_eq!(copied.len(), 1);
        assert_eq!(root.summary().assets, 1);
        assert_eq!(
            fs::read_to_string(root.static_dir().join("logo-00000001.png")).unwrap(),
            "PNG"
        );
    }

    #[test]
    fn test_child_resolves_ancestor_asset() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("_static/a.png"), "A");
        write(&src.join("sub/page.md"), "![x](a.png) [dl](asset://a.png)");

        build(&temp);

        let html = read_output(&temp, "sub/page.html");
        assert!(html.contains(
            r#"<p><img src="/_static/a-00000001.png" alt="x"> <a href="/_static/a-00000001.png">dl</a></p>"#
        ));
    }

    #[test]
    fn test_child_asset_shadows_ancestor() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("_static/a.png"), "root");
        write(&src.join("sub/_static/a.png"), "sub");

        let root = new_root(&temp);
        let top = Context::root(&root, &src).unwrap();
        let sub = top.child("sub").unwrap();

        let url = sub.asset_path("a.png").unwrap().unwrap();
        assert_eq!(url, "/_static/a-00000001.png");
        assert_eq!(
            fs::read_to_string(root.static_dir().join("a-00000001.png")).unwrap(),
            "sub"
        );
    }

    #[test]
    fn test_missing_asset_omits_attribute() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("page.md"), "![x](nope.png) [y](asset://nope.png)");

        build(&temp);

        let html = read_output(&temp, "page.html");
        assert!(html.contains(r#"<p><img alt="x"> <a>y</a></p>"#));
    }

    #[test]
    fn test_template_can_reference_own_assets() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("_static/logo.svg"), "<svg/>");
        write(&src.join("_template.md"), "![logo](logo.svg)\n\n{{content}}");
        write(&src.join("index.md"), "Hi");

        build(&temp);

        let html = read_output(&temp, "index.html");
        assert!(html.contains(r#"<p><img src="/_static/logo-00000001.svg" alt="logo"></p><p>Hi</p>"#));
    }

    #[test]
    fn test_styles_are_inherited_and_extended() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("_styles/a.css"), "a {}");
        write(&src.join("sub/_styles/b.css"), "b {}");
        write(&src.join("index.md"), "Top");
        write(&src.join("sub/page.md"), "Nested");

        let root = build(&temp);

        let root_link = r#"href="/_static/input-00000001.css""#;
        let sub_link = r#"href="/_static/sub-00000002.css""#;
        let top = read_output(&temp, "index.html");
        assert!(top.contains(root_link));
        assert!(!top.contains(sub_link));

        let nested = read_output(&temp, "sub/page.html");
        let root_at = nested.find(root_link).unwrap();
        let sub_at = nested.find(sub_link).unwrap();
        assert!(root_at < sub_at);
        assert_eq!(root.summary().stylesheets, 2);
    }

    #[test]
    fn test_reserved_entries_are_skipped() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("_draft.md"), "Draft");
        write(&src.join("_notes/page.md"), "Hidden");
        write(&src.join("index.md"), "Shown");

        let root = build(&temp);

        let out = temp.path().join("output");
        assert!(out.join("index.html").exists());
        assert!(!out.join("_draft.html").exists());
        assert!(!out.join("_notes").exists());
        assert_eq!(root.summary().pages, 1);
        assert_eq!(root.summary().directories, 1);
    }

    #[test]
    fn test_title_defaults_to_source_path() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("notes.md"), "No heading here");

        build(&temp);

        let html = read_output(&temp, "notes.html");
        let expected = format!("<title>{}</title>", src.join("notes.md").display());
        assert!(html.contains(&expected));
    }

    #[test]
    fn test_last_level_one_heading_is_title() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("page.md"), "# First\n\n## Sub\n\n# Second\n");

        build(&temp);

        assert!(read_output(&temp, "page.html").contains("<title>Second</title>"));
    }

    #[test]
    fn test_debug_logs_dump_node_tree() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("page.md"), "# Title");

        let root = new_root(&temp).with_debug_logs(true);
        Context::root(&root, &src).unwrap().process().unwrap();

        assert_eq!(
            read_output(&temp, "page.log"),
            "Heading(level=1):\n    Plain(\"Title\")\n"
        );
    }

    #[test]
    fn test_no_logs_by_default() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("page.md"), "# Title");

        build(&temp);

        assert!(!temp.path().join("output/page.log").exists());
    }

    #[test]
    fn test_parse_error_aborts_with_path() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        write(&src.join("broken.md"), "Some `unclosed code");

        let root = new_root(&temp);
        let err = Context::root(&root, &src).unwrap().process().unwrap_err();
        assert!(
            matches!(&err, SiteError::Parse { path, .. } if path.ends_with("broken.md")),
            "Expected parse error, got {err:?}"
        );
    }

    #[test]
    fn test_missing_source_dir() {
        let temp = TempDir::new().unwrap();
        let root = new_root(&temp);
        assert!(matches!(
            Context::root(&root, &temp.path().join("absent")),
            Err(SiteError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_child_depth() {
        let temp = TempDir::new().unwrap();
        let src = input(&temp);
        fs::create_dir_all(src.join("a/b")).unwrap();

        let root = new_root(&temp);
        let top = Context::root(&root, &src).unwrap();
        let a = top.child("a").unwrap();
        let b = a.child("b").unwrap();
        assert_eq!((top.depth(), a.depth(), b.depth()), (0, 1, 2));
        assert_eq!(b.template(), "{{content}}");
        assert_eq!(b.styles(), "");
    }

    #[test]
    fn test_page_stem() {
        assert_eq!(page_stem("index.md"), "index");
        assert_eq!(page_stem("notes.txt"), "notes.txt");
    }
}
