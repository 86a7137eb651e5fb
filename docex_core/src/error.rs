use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DocexError {
	#[error(transparent)]
	#[diagnostic(code(docex::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(docex::config_parse),
		help("check that docex.toml is valid TOML with [extract], [output], [build] and/or [exclude] sections")
	)]
	ConfigParse(String),

	#[error("`{path}` contains {count} `## {heading}` {language} code blocks, expected at most one")]
	#[diagnostic(
		code(docex::multiple_examples),
		help("merge the blocks into a single example or set `policy = \"all\"` under [extract]")
	)]
	MultipleExamples {
		path: String,
		heading: String,
		language: String,
		count: usize,
	},

	#[error("`{path}` has no `## {heading}` {language} code block")]
	#[diagnostic(
		code(docex::missing_example),
		help("add a fenced ```{language} block under a `## {heading}` heading")
	)]
	MissingExample {
		path: String,
		heading: String,
		language: String,
	},

	#[error("no autogen region in `{path}`")]
	#[diagnostic(
		code(docex::missing_autogen_region),
		help("add a `{begin}` line followed by a `{end}` line to the build file")
	)]
	MissingAutogenRegion {
		path: String,
		begin: String,
		end: String,
	},

	#[error("`{first}` and `{second}` both generate `{target}`")]
	#[diagnostic(
		code(docex::duplicate_target),
		help("rename one of the documents so their output names differ")
	)]
	DuplicateTarget {
		target: String,
		first: String,
		second: String,
	},

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(docex::template_render))]
	TemplateRender(String),

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(docex::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

pub type DocexResult<T> = Result<T, DocexError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
