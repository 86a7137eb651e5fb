use std::ops::Range;
use std::path::Path;
use std::path::PathBuf;

use crate::DocexConfig;
use crate::DocexError;
use crate::DocexResult;
use crate::ExampleExtractor;
use crate::config::BuildConfig;
use crate::project::ScanOptions;
use crate::project::list_documents_with_examples;

/// Default body of the generated region: a meson list assignment.
pub const DEFAULT_FRAGMENT_TEMPLATE: &str = "{{ variable }} = [{% if items %}\n{% for item in \
                                             items %}    {{ item | quote }},\n{% endfor %}{% \
                                             endif %}]\n";

/// What happened to a build file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutogenOutcome {
	/// The region already held the rendered fragment.
	Unchanged,
	/// The region was replaced. Holds the full new file content.
	Updated(String),
}

impl AutogenOutcome {
	pub fn is_changed(&self) -> bool {
		matches!(self, Self::Updated(_))
	}
}

/// The outcome of regenerating one build file.
#[derive(Debug, Clone)]
pub struct AutogenResult {
	pub path: PathBuf,
	/// Relative paths of the documents listed in the region.
	pub items: Vec<String>,
	pub outcome: AutogenOutcome,
}

/// Byte range of the lines strictly between the first `begin` marker line and
/// the first `end` marker line after it. Markers are compared after trimming.
pub fn find_region(content: &str, begin: &str, end: &str) -> Option<Range<usize>> {
	let mut offset = 0;
	let mut body_start = None;

	for line in content.split_inclusive('\n') {
		let trimmed = line.trim();
		match body_start {
			None if trimmed == begin => body_start = Some(offset + line.len()),
			Some(start) if trimmed == end => return Some(start..offset),
			_ => {}
		}
		offset += line.len();
	}

	None
}

/// Single-quote a string for meson, escaping backslashes and quotes.
fn quote(value: &str) -> String {
	format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Render the region body listing `items`.
pub fn render_fragment(config: &BuildConfig, items: &[String]) -> DocexResult<String> {
	let source = config
		.template
		.as_deref()
		.unwrap_or(DEFAULT_FRAGMENT_TEMPLATE);

	let mut env = minijinja::Environment::new();
	env.set_keep_trailing_newline(true);
	env.add_filter("quote", |value: String| quote(&value));
	env.add_template("__fragment__", source)
		.map_err(|e| DocexError::TemplateRender(e.to_string()))?;

	let template = env
		.get_template("__fragment__")
		.map_err(|e| DocexError::TemplateRender(e.to_string()))?;

	template
		.render(minijinja::context! { variable => &config.variable, items => items })
		.map_err(|e| DocexError::TemplateRender(e.to_string()))
}

/// Replace the generated region of `content`. `path` is only used in error
/// messages.
pub fn apply_fragment(
	path: &Path,
	content: &str,
	config: &BuildConfig,
	fragment: &str,
) -> DocexResult<AutogenOutcome> {
	let Some(region) = find_region(content, &config.begin, &config.end) else {
		return Err(DocexError::MissingAutogenRegion {
			path: path.display().to_string(),
			begin: config.begin.clone(),
			end: config.end.clone(),
		});
	};

	if content[region.clone()] == *fragment {
		return Ok(AutogenOutcome::Unchanged);
	}

	let mut updated = String::with_capacity(content.len() + fragment.len());
	updated.push_str(&content[..region.start]);
	updated.push_str(fragment);
	updated.push_str(&content[region.end..]);

	Ok(AutogenOutcome::Updated(updated))
}

/// Compute the new content of the build file in `dir` without writing it.
pub fn compute_autogen(
	dir: &Path,
	config: &DocexConfig,
	options: &ScanOptions,
	extractor: &ExampleExtractor,
) -> DocexResult<AutogenResult> {
	let path = dir.join(&config.build.file);
	let content = std::fs::read_to_string(&path)?;
	let items = list_documents_with_examples(dir, options, extractor)?;
	let fragment = render_fragment(&config.build, &items)?;
	let outcome = apply_fragment(&path, &content, &config.build, &fragment)?;

	tracing::debug!(
		path = %path.display(),
		items = items.len(),
		changed = outcome.is_changed(),
		"computed autogen region"
	);

	Ok(AutogenResult {
		path,
		items,
		outcome,
	})
}

/// Write the result of [`compute_autogen`] if the region changed.
pub fn write_autogen(result: &AutogenResult) -> DocexResult<()> {
	if let AutogenOutcome::Updated(content) = &result.outcome {
		std::fs::write(&result.path, content)?;
		tracing::info!(path = %result.path.display(), "updated autogen region");
	}

	Ok(())
}
