use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::DocexConfig;
use crate::DocexError;
use crate::DocexResult;
use crate::ExampleExtractor;
use crate::ExtractPolicy;
use crate::config::OutputConfig;
use crate::config::WrapRule;
use crate::project::Document;
use crate::project::ScanOptions;
use crate::project::collect_documents;
use crate::project::normalize_path;

/// A source file generated from a documentation example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
	/// The document the example was extracted from.
	pub source: PathBuf,
	/// Where the generated file is written.
	pub target: PathBuf,
	/// Provenance header followed by the (possibly wrapped) example code.
	pub content: String,
}

/// Counts reported by [`write_generated`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
	pub written: Vec<PathBuf>,
	pub unchanged: Vec<PathBuf>,
}

/// A generated file whose contents on disk differ from what would be written.
#[derive(Debug)]
pub struct StaleEntry {
	pub source: PathBuf,
	pub target: PathBuf,
	pub current_content: String,
	pub expected_content: String,
}

/// Result of comparing planned files against the output directory.
#[derive(Debug, Default)]
pub struct CheckResult {
	/// Files that exist but are out of date.
	pub stale: Vec<StaleEntry>,
	/// Files that have not been generated yet.
	pub missing: Vec<GeneratedFile>,
}

impl CheckResult {
	/// Returns true if every generated file is up to date.
	pub fn is_ok(&self) -> bool {
		self.stale.is_empty() && self.missing.is_empty()
	}
}

/// Turns the examples of documents into generated source files.
#[derive(Debug, Clone)]
pub struct Materializer {
	extractor: ExampleExtractor,
	output: OutputConfig,
	wrap: Vec<WrapRule>,
}

impl Default for Materializer {
	fn default() -> Self {
		Self::new(ExampleExtractor::default(), OutputConfig::default(), Vec::new())
	}
}

impl Materializer {
	pub fn new(extractor: ExampleExtractor, output: OutputConfig, wrap: Vec<WrapRule>) -> Self {
		Self {
			extractor,
			output,
			wrap,
		}
	}

	pub fn from_config(config: &DocexConfig) -> Self {
		Self::new(
			ExampleExtractor::from(&config.extract),
			config.output.clone(),
			config.wrap.clone(),
		)
	}

	#[must_use]
	pub fn with_extractor(mut self, extractor: ExampleExtractor) -> Self {
		self.extractor = extractor;
		self
	}

	pub fn extractor(&self) -> &ExampleExtractor {
		&self.extractor
	}

	/// File name for the `index`th example (zero based) of the document at
	/// `relative`: the directory components and the file stem joined by `_`.
	pub fn output_name(&self, relative: &Path, index: usize) -> String {
		let mut parts: Vec<String> = relative
			.parent()
			.map(|parent| {
				parent
					.components()
					.map(|component| component.as_os_str().to_string_lossy().into_owned())
					.collect()
			})
			.unwrap_or_default();

		if let Some(stem) = relative.file_stem() {
			parts.push(stem.to_string_lossy().into_owned());
		}

		let base = parts.join("_");
		let suffix = if index == 0 {
			String::new()
		} else {
			format!("_{}", index + 1)
		};

		format!(
			"{}{base}{suffix}.{}",
			self.output.prefix, self.output.extension
		)
	}

	/// The two-line provenance header, followed by a blank line.
	pub fn header(&self, source: &str) -> String {
		let comment = &self.output.comment;
		format!("{comment} This file was auto-generated from:\n{comment} {source}\n\n")
	}

	/// Apply the first wrap rule whose substring occurs in `code`.
	pub fn wrap(&self, source: &str, code: &str) -> DocexResult<String> {
		let Some(rule) = self.wrap.iter().find(|rule| code.contains(&rule.contains)) else {
			return Ok(code.to_string());
		};

		tracing::debug!(source, contains = %rule.contains, "wrapping example");

		let mut env = minijinja::Environment::new();
		env.set_keep_trailing_newline(true);
		env.add_template("__wrap__", &rule.template)
			.map_err(|e| DocexError::TemplateRender(e.to_string()))?;

		let template = env
			.get_template("__wrap__")
			.map_err(|e| DocexError::TemplateRender(e.to_string()))?;

		template
			.render(minijinja::context! { code => code, source => source })
			.map_err(|e| DocexError::TemplateRender(e.to_string()))
	}

	/// Header plus wrapped code.
	pub fn render(&self, source: &str, code: &str) -> DocexResult<String> {
		Ok(self.header(source) + &self.wrap(source, code)?)
	}

	/// Plan the generated files for one document. Documents without examples
	/// produce nothing unless the policy demands one.
	pub fn plan_document(
		&self,
		document: &Document,
		output_dir: &Path,
	) -> DocexResult<Vec<GeneratedFile>> {
		let source = normalize_path(&document.path);
		let examples = self
			.extractor
			.extract_checked(&document.display_path(), &document.read()?)?;

		examples
			.iter()
			.enumerate()
			.map(|(index, code)| {
				Ok(GeneratedFile {
					source: document.path.clone(),
					target: output_dir.join(self.output_name(&document.relative, index)),
					content: self.render(&source, code)?,
				})
			})
			.collect()
	}

	/// Plan the generated files for every document below `input_dir`.
	pub fn plan_directory(
		&self,
		input_dir: &Path,
		output_dir: &Path,
		options: &ScanOptions,
	) -> DocexResult<Vec<GeneratedFile>> {
		let mut files = Vec::new();
		for document in collect_documents(input_dir, options)? {
			files.extend(self.plan_document(&document, output_dir)?);
		}
		ensure_unique_targets(&files)?;

		tracing::info!(
			input = %input_dir.display(),
			count = files.len(),
			"planned generated files"
		);
		Ok(files)
	}

	/// Plan a single document written to an explicit `target`. The document
	/// must contain exactly one example.
	pub fn plan_file(&self, document: &Path, target: &Path) -> DocexResult<GeneratedFile> {
		let source = normalize_path(document);
		let text = std::fs::read_to_string(document)?;
		let extractor = self
			.extractor
			.clone()
			.with_policy(ExtractPolicy::ExactlyOne);
		let examples = extractor.extract_checked(&source, &text)?;

		Ok(GeneratedFile {
			source: document.to_path_buf(),
			target: target.to_path_buf(),
			content: self.render(&source, &examples[0])?,
		})
	}
}

/// Output names flatten directories with `_`, so `a/b_c.md` and `a_b/c.md`
/// both map to `a_b_c`. Two files must never share a target.
fn ensure_unique_targets(files: &[GeneratedFile]) -> DocexResult<()> {
	let mut sources: HashMap<&Path, &Path> = HashMap::with_capacity(files.len());

	for file in files {
		if let Some(first) = sources.insert(&file.target, &file.source) {
			return Err(DocexError::DuplicateTarget {
				target: normalize_path(&file.target),
				first: normalize_path(first),
				second: normalize_path(&file.source),
			});
		}
	}

	Ok(())
}

/// Write generated files, creating parent directories as needed. Files whose
/// contents already match are left untouched.
pub fn write_generated(files: &[GeneratedFile]) -> DocexResult<WriteSummary> {
	let mut summary = WriteSummary::default();

	for file in files {
		if read_existing(&file.target)?.as_deref() == Some(file.content.as_str()) {
			tracing::debug!(path = %file.target.display(), "generated file unchanged");
			summary.unchanged.push(file.target.clone());
			continue;
		}

		if let Some(parent) = file.target.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&file.target, &file.content)?;
		tracing::info!(path = %file.target.display(), "wrote generated file");
		summary.written.push(file.target.clone());
	}

	Ok(summary)
}

/// Compare planned files against the files on disk without writing.
pub fn check_generated(files: &[GeneratedFile]) -> DocexResult<CheckResult> {
	let mut result = CheckResult::default();

	for file in files {
		match read_existing(&file.target)? {
			None => result.missing.push(file.clone()),
			Some(current) if current != file.content => {
				result.stale.push(StaleEntry {
					source: file.source.clone(),
					target: file.target.clone(),
					current_content: current,
					expected_content: file.content.clone(),
				});
			}
			Some(_) => {}
		}
	}

	Ok(result)
}

fn read_existing(path: &Path) -> DocexResult<Option<String>> {
	match std::fs::read_to_string(path) {
		Ok(content) => Ok(Some(content)),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
		Err(e) => Err(e.into()),
	}
}
