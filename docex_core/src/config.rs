use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::DocexError;
use crate::DocexResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["docex.toml", ".docex.toml", ".config/docex.toml"];

pub const DEFAULT_HEADING: &str = "Example";
pub const DEFAULT_LANGUAGE: &str = "cpp";
pub const DEFAULT_PREFIX: &str = "example_";
pub const DEFAULT_EXTENSION: &str = "cpp";
pub const DEFAULT_COMMENT: &str = "//";
pub const DEFAULT_BUILD_FILE: &str = "meson.build";
pub const DEFAULT_REGION_BEGIN: &str = "#pragma autogen push";
pub const DEFAULT_REGION_END: &str = "#pragma autogen pop";
pub const DEFAULT_BUILD_VARIABLE: &str = "docs";

/// Configuration loaded from a `docex.toml` file.
///
/// ```toml
/// [extract]
/// heading = "Example"
/// language = "cpp"
/// policy = "at-most-one"
///
/// [output]
/// prefix = "example_"
/// extension = "cpp"
/// comment = "//"
///
/// [[wrap]]
/// contains = "pro::skills::format"
/// template = """
/// #ifdef PRO4D_HAS_FORMAT
/// {{ code }}
/// #else
/// int main() { return 77; }
/// #endif"""
///
/// [build]
/// file = "meson.build"
/// variable = "docs"
///
/// [exclude]
/// patterns = ["drafts/"]
///
/// disable_gitignore = false
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct DocexConfig {
	/// Which section and which fenced blocks count as examples.
	#[serde(default)]
	pub extract: ExtractConfig,
	/// Naming and header of generated source files.
	#[serde(default)]
	pub output: OutputConfig,
	/// Templates applied to examples containing a literal substring.
	#[serde(default)]
	pub wrap: Vec<WrapRule>,
	/// Build file region that lists the documents with examples.
	#[serde(default)]
	pub build: BuildConfig,
	/// Documents to restrict the scan to.
	#[serde(default)]
	pub include: IncludeConfig,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
}

/// How many example blocks a single document may contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractPolicy {
	/// Every matching block is extracted.
	All,
	/// Documents without an example are skipped, more than one is an error.
	#[default]
	AtMostOne,
	/// Every document must contain exactly one example.
	ExactlyOne,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
	/// Text of the level-2 heading that opens an example section.
	#[serde(default = "default_heading")]
	pub heading: String,
	/// Info string of the fenced blocks to extract, compared
	/// case-insensitively.
	#[serde(default = "default_language")]
	pub language: String,
	#[serde(default)]
	pub policy: ExtractPolicy,
}

impl Default for ExtractConfig {
	fn default() -> Self {
		Self {
			heading: default_heading(),
			language: default_language(),
			policy: ExtractPolicy::default(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
	/// Prepended to every generated file name.
	#[serde(default = "default_prefix")]
	pub prefix: String,
	/// Extension of generated files, without the leading dot.
	#[serde(default = "default_extension")]
	pub extension: String,
	/// Line comment token used for the provenance header.
	#[serde(default = "default_comment")]
	pub comment: String,
}

impl Default for OutputConfig {
	fn default() -> Self {
		Self {
			prefix: default_prefix(),
			extension: default_extension(),
			comment: default_comment(),
		}
	}
}

/// Wrap an example in a template when its code contains `contains`. The
/// template receives the extracted code as `{{ code }}` and the document path
/// as `{{ source }}`.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct WrapRule {
	pub contains: String,
	pub template: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
	/// Build file name, relative to the documentation directory.
	#[serde(default = "default_build_file")]
	pub file: PathBuf,
	/// Line that opens the generated region.
	#[serde(default = "default_region_begin")]
	pub begin: String,
	/// Line that closes the generated region.
	#[serde(default = "default_region_end")]
	pub end: String,
	/// Name of the list variable assigned inside the region.
	#[serde(default = "default_build_variable")]
	pub variable: String,
	/// Custom minijinja template for the region body. Receives `variable` and
	/// `items`.
	#[serde(default)]
	pub template: Option<String>,
}

impl Default for BuildConfig {
	fn default() -> Self {
		Self {
			file: default_build_file(),
			begin: default_region_begin(),
			end: default_region_end(),
			variable: default_build_variable(),
			template: None,
		}
	}
}

/// Glob patterns restricting which documents are scanned.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeConfig {
	/// Relative to the documentation directory. When empty, every markdown
	/// file is a candidate.
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Configuration for excluding files and directories from scanning.
///
/// Patterns follow gitignore syntax and are applied on top of any `.gitignore`
/// rules (unless `disable_gitignore` is set).
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	/// Examples: `"drafts/"`, `"*.draft.md"`, `"!keep.md"`.
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_heading() -> String {
	DEFAULT_HEADING.to_string()
}

fn default_language() -> String {
	DEFAULT_LANGUAGE.to_string()
}

fn default_prefix() -> String {
	DEFAULT_PREFIX.to_string()
}

fn default_extension() -> String {
	DEFAULT_EXTENSION.to_string()
}

fn default_comment() -> String {
	DEFAULT_COMMENT.to_string()
}

fn default_build_file() -> PathBuf {
	PathBuf::from(DEFAULT_BUILD_FILE)
}

fn default_region_begin() -> String {
	DEFAULT_REGION_BEGIN.to_string()
}

fn default_region_end() -> String {
	DEFAULT_REGION_END.to_string()
}

fn default_build_variable() -> String {
	DEFAULT_BUILD_VARIABLE.to_string()
}

impl DocexConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> DocexResult<Option<DocexConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to the defaults when no file
	/// exists.
	pub fn load_or_default(root: &Path) -> DocexResult<DocexConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	pub fn parse(content: &str) -> DocexResult<DocexConfig> {
		toml::from_str(content).map_err(|e| DocexError::ConfigParse(e.to_string()))
	}
}
