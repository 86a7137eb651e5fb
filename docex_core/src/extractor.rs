use derive_more::Deref;
use derive_more::DerefMut;

use crate::DocexError;
use crate::DocexResult;
use crate::Element;
use crate::ExtractPolicy;
use crate::config::DEFAULT_HEADING;
use crate::config::DEFAULT_LANGUAGE;
use crate::config::ExtractConfig;
use crate::scan;

/// Level of the heading that opens an example section.
const SECTION_LEVEL: usize = 2;

/// The code of every matching block found in a document, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct Examples(pub Vec<String>);

impl Examples {
	pub fn into_inner(self) -> Vec<String> {
		self.0
	}
}

/// Selects the code blocks of one language from the example section of a
/// document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleExtractor {
	heading: String,
	language: String,
	policy: ExtractPolicy,
}

impl Default for ExampleExtractor {
	fn default() -> Self {
		Self::new(DEFAULT_HEADING, DEFAULT_LANGUAGE)
	}
}

impl From<&ExtractConfig> for ExampleExtractor {
	fn from(config: &ExtractConfig) -> Self {
		Self::new(&config.heading, &config.language).with_policy(config.policy)
	}
}

impl ExampleExtractor {
	pub fn new(heading: impl Into<String>, language: impl Into<String>) -> Self {
		Self {
			heading: heading.into(),
			language: language.into(),
			policy: ExtractPolicy::default(),
		}
	}

	#[must_use]
	pub fn with_policy(mut self, policy: ExtractPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn heading(&self) -> &str {
		&self.heading
	}

	pub fn language(&self) -> &str {
		&self.language
	}

	pub fn policy(&self) -> ExtractPolicy {
		self.policy
	}

	/// Collect the content of every code block tagged with the target language
	/// that sits inside an example section.
	///
	/// A section opens at a level-2 heading whose trimmed text equals the
	/// marker and closes at the next heading of level 1 or 2. Deeper headings
	/// stay inside the section.
	pub fn extract(&self, text: &str) -> Examples {
		let mut examples = Vec::new();
		let mut inside_section = false;

		for element in scan(text) {
			match element {
				Element::Heading { level, text } if level <= SECTION_LEVEL => {
					inside_section = level == SECTION_LEVEL && text.trim() == self.heading;
				}
				Element::CodeBlock { language, content }
					if inside_section && language.eq_ignore_ascii_case(&self.language) =>
				{
					examples.push(content);
				}
				_ => {}
			}
		}

		Examples(examples)
	}

	/// Extract the examples of a document and enforce the configured policy.
	/// `path` is only used in error messages.
	pub fn extract_checked(&self, path: &str, text: &str) -> DocexResult<Examples> {
		let examples = self.extract(text);
		tracing::debug!(path, count = examples.len(), "extracted examples");
		self.apply_policy(path, examples)
	}

	/// Check the number of examples against the configured policy.
	pub fn apply_policy(&self, path: &str, examples: Examples) -> DocexResult<Examples> {
		match (self.policy, examples.len()) {
			(ExtractPolicy::ExactlyOne, 0) => {
				Err(DocexError::MissingExample {
					path: path.to_string(),
					heading: self.heading.clone(),
					language: self.language.clone(),
				})
			}
			(ExtractPolicy::AtMostOne | ExtractPolicy::ExactlyOne, count) if count > 1 => {
				Err(DocexError::MultipleExamples {
					path: path.to_string(),
					heading: self.heading.clone(),
					language: self.language.clone(),
					count,
				})
			}
			_ => Ok(examples),
		}
	}
}
