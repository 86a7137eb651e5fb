use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Turn the examples in your markdown docs into compiled, tested source files.",
	long_about = "docex extracts the fenced code blocks under an `## Example` heading in markdown \
	              documentation and writes each one to a standalone source file with a provenance \
	              header, so every documented example is built and tested with the \
	              project.\n\nQuick start:\n  docex init                 Create a docex.toml\n  \
	              docex extract docs out     Generate example sources\n  docex check docs out       \
	              Verify generated sources are current\n  docex autogen docs         Refresh the \
	              build file document list"
)]
pub struct DocexCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Project root used to discover `docex.toml`.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Override the heading that opens an example section.
	#[arg(long, global = true)]
	pub heading: Option<String>,

	/// Override the language of the code blocks to extract.
	#[arg(long, global = true)]
	pub language: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `docex.toml` in the project root.
	///
	/// If the file already exists, this command is a no-op and exits
	/// successfully.
	Init,
	/// Print the structural elements of a markdown document.
	///
	/// Shows every heading, paragraph and fenced code block the scanner finds,
	/// in source order. Useful for debugging why an example is or is not
	/// picked up.
	Scan {
		/// The markdown document to scan.
		file: PathBuf,

		/// Output format. Use `text` for a summary or `json` for the full
		/// element stream.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Generate a source file for every documented example.
	///
	/// Walks the input directory for markdown documents, extracts the example
	/// code of each, and writes `<prefix><path>.<extension>` files into the
	/// output directory. Files whose contents are unchanged are not touched.
	Extract {
		/// Directory containing the markdown documentation.
		input: PathBuf,

		/// Directory receiving the generated sources.
		output: PathBuf,

		/// Preview which files would change without writing them.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Watch the input directory and regenerate on changes.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Generate the source file for a single document.
	///
	/// Fails if the document does not contain exactly one example.
	File {
		/// The markdown document to extract from.
		document: PathBuf,

		/// The file to write.
		output: PathBuf,
	},
	/// List the documents that contain an example.
	///
	/// Paths are relative to the input directory and use `/` separators.
	List {
		/// Directory containing the markdown documentation.
		input: PathBuf,

		/// Separate entries with NUL instead of newlines, for build systems
		/// that split on `\0`.
		#[arg(long, default_value_t = false)]
		print0: bool,
	},
	/// Check that the generated sources are up to date.
	///
	/// Exits with a non-zero status code if any generated file is missing or
	/// differs from what `extract` would write. Ideal for CI pipelines.
	Check {
		/// Directory containing the markdown documentation.
		input: PathBuf,

		/// Directory holding the generated sources.
		output: PathBuf,

		/// Show a diff for each stale file.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Rewrite the document list inside the build file's autogen region.
	///
	/// The region is delimited by the configured marker lines (by default
	/// `#pragma autogen push` and `#pragma autogen pop`). The file is only
	/// written when the list changed.
	Autogen {
		/// Directory containing the markdown documentation and the build file.
		dir: PathBuf,

		/// Fail instead of writing when the region is out of date.
		#[arg(long, default_value_t = false)]
		check: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
