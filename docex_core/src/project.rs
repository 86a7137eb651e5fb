use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::DocexConfig;
use crate::DocexError;
use crate::DocexResult;
use crate::ExampleExtractor;

/// Options for controlling which documents are collected.
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Glob patterns restricting which documents to include. Empty means every
	/// markdown file.
	pub include_set: GlobSet,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			exclude_patterns: Vec::new(),
			include_set: GlobSet::empty(),
			disable_gitignore: false,
		}
	}
}

impl ScanOptions {
	/// Construct [`ScanOptions`] from a [`DocexConfig`].
	pub fn from_config(config: &DocexConfig) -> DocexResult<Self> {
		Ok(Self {
			exclude_patterns: config.exclude.patterns.clone(),
			include_set: build_glob_set(&config.include.patterns)?,
			disable_gitignore: config.disable_gitignore,
		})
	}
}

/// A markdown document found under a documentation directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Document {
	/// Absolute (or caller-relative) path used for reading.
	pub path: PathBuf,
	/// Path relative to the scanned directory.
	pub relative: PathBuf,
}

impl Document {
	/// Construct a document relative to `root`. Falls back to the file name
	/// when `path` is not below `root`.
	pub fn new(root: &Path, path: &Path) -> Self {
		let relative = path.strip_prefix(root).map_or_else(
			|_| {
				path.file_name()
					.map_or_else(|| path.to_path_buf(), PathBuf::from)
			},
			Path::to_path_buf,
		);

		Self {
			path: path.to_path_buf(),
			relative,
		}
	}

	/// The relative path with `/` separators on every platform.
	pub fn display_path(&self) -> String {
		normalize_path(&self.relative)
	}

	pub fn read(&self) -> DocexResult<String> {
		Ok(std::fs::read_to_string(&self.path)?)
	}
}

/// Render a path with `/` separators regardless of platform.
pub fn normalize_path(path: &Path) -> String {
	path.to_string_lossy().replace('\\', "/")
}

fn build_glob_set(patterns: &[String]) -> DocexResult<GlobSet> {
	if patterns.is_empty() {
		return Ok(GlobSet::empty());
	}

	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			DocexError::ConfigParse(format!("invalid include pattern `{pattern}`: {e}"))
		})?;
		builder.add(glob);
	}

	builder
		.build()
		.map_err(|e| DocexError::ConfigParse(format!("failed to build include rules: {e}")))
}

/// Build a `Gitignore` matcher from exclude patterns specified in
/// `docex.toml` `[exclude]`.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> DocexResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			DocexError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| DocexError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Build a `Gitignore` matcher from the directory's `.gitignore` file (if
/// any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		if let Some(err) = builder.add(&gitignore_path) {
			tracing::warn!(path = %gitignore_path.display(), "failed to read .gitignore: {err}");
		}
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

/// Collect every markdown document below `root`, sorted by path.
pub fn collect_documents(root: &Path, options: &ScanOptions) -> DocexResult<Vec<Document>> {
	let mut files = Vec::new();
	let mut ancestors = HashSet::new();

	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let custom_exclude = build_exclude_matcher(root, &options.exclude_patterns)?;

	walk_dir(
		root,
		&mut files,
		&gitignore,
		&custom_exclude,
		&mut ancestors,
	)?;

	let mut documents: Vec<Document> = files
		.into_iter()
		.map(|path| Document::new(root, &path))
		.filter(|document| {
			options.include_set.is_empty() || options.include_set.is_match(&document.relative)
		})
		.collect();
	// Sort for deterministic ordering.
	documents.sort();

	tracing::debug!(root = %root.display(), count = documents.len(), "collected documents");
	Ok(documents)
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn walk_dir(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	gitignore: &Gitignore,
	custom_exclude: &Gitignore,
	ancestors: &mut HashSet<PathBuf>,
) -> DocexResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// A directory that is its own ancestor means a symlink loop. Sibling links
	// to the same directory are fine.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !ancestors.insert(canonical.clone()) {
		return Err(DocexError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();

		if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
			if is_ignored_directory_name(name) {
				continue;
			}
		}

		let is_dir = path.is_dir();

		if gitignore.matched(&path, is_dir).is_ignore()
			|| custom_exclude.matched(&path, is_dir).is_ignore()
		{
			continue;
		}

		if is_dir {
			walk_dir(&path, files, gitignore, custom_exclude, ancestors)?;
		} else if is_markdown_file(&path) {
			files.push(path);
		}
	}

	ancestors.remove(&canonical);
	Ok(())
}

/// Check if a file is a markdown document.
pub fn is_markdown_file(path: &Path) -> bool {
	let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
		return false;
	};

	matches!(ext, "md" | "mdx" | "markdown")
}

/// Relative paths (with `/` separators) of every document below `root` that
/// yields at least one example. Documents violating the extractor's policy
/// are reported as errors.
pub fn list_documents_with_examples(
	root: &Path,
	options: &ScanOptions,
	extractor: &ExampleExtractor,
) -> DocexResult<Vec<String>> {
	let mut listed = Vec::new();

	for document in collect_documents(root, options)? {
		let display = document.display_path();
		let examples = extractor.extract_checked(&display, &document.read()?)?;
		if !examples.is_empty() {
			listed.push(display);
		}
	}

	Ok(listed)
}
