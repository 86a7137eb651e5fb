use serde::Deserialize;
use serde::Serialize;

/// A structural unit of a markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
	/// An ATX heading. `level` is the number of leading `#` characters.
	Heading { level: usize, text: String },
	/// Consecutive non-blank lines, joined with `\n`. Never empty.
	Paragraph { text: String },
	/// A backtick fenced block. The fence lines are not part of `content`.
	CodeBlock { language: String, content: String },
}

/// Mutable state owned by a single scan.
#[derive(Debug, Default)]
pub struct ScannerState {
	inside_code_block: bool,
	required_ticks: usize,
	language: String,
	code_lines: Vec<String>,
	paragraph_lines: Vec<String>,
}

impl ScannerState {
	pub fn is_inside_code_block(&self) -> bool {
		self.inside_code_block
	}

	/// Number of backticks the current block must be closed with.
	pub fn required_ticks(&self) -> usize {
		self.required_ticks
	}

	pub fn begin_code_block(&mut self, ticks: usize, language: &str) {
		self.inside_code_block = true;
		self.required_ticks = ticks;
		self.language = language.to_string();
		self.code_lines.clear();
	}

	pub fn push_code_line(&mut self, line: &str) {
		self.code_lines.push(line.to_string());
	}

	/// Close the current block and return it, leaving the state outside of any
	/// block.
	pub fn end_code_block(&mut self) -> Element {
		let element = Element::CodeBlock {
			language: std::mem::take(&mut self.language),
			content: std::mem::take(&mut self.code_lines).join("\n"),
		};
		self.inside_code_block = false;
		self.required_ticks = 0;
		element
	}

	pub fn push_paragraph_line(&mut self, line: &str) {
		self.paragraph_lines.push(line.to_string());
	}

	/// Flush the pending paragraph. Returns `None` when nothing non-blank has
	/// been accumulated.
	pub fn take_paragraph(&mut self) -> Option<Element> {
		let lines = std::mem::take(&mut self.paragraph_lines);
		if lines.iter().all(|line| line.trim().is_empty()) {
			return None;
		}

		Some(Element::Paragraph {
			text: lines.join("\n"),
		})
	}
}

/// Lazy iterator over the elements of a document. Created by [`scan`].
#[derive(Debug)]
pub struct Elements<'a> {
	lines: SplitLines<'a>,
	state: ScannerState,
	/// An element produced alongside a paragraph flush, returned on the next
	/// call.
	queued: Option<Element>,
	finished: bool,
}

/// Scan a markdown document into a stream of headings, paragraphs and code
/// blocks.
///
/// The scan never fails. A code block that is still open at the end of the
/// input is emitted with whatever content was accumulated. Lines end at `\n`,
/// `\r\n` or a bare `\r`.
///
/// ```rust
/// use docex_core::Element;
/// use docex_core::scan;
///
/// let elements: Vec<_> = scan("hello\n# Title\n").collect();
/// assert_eq!(elements, vec![
/// 	Element::Paragraph {
/// 		text: "hello".into()
/// 	},
/// 	Element::Heading {
/// 		level: 1,
/// 		text: "Title".into()
/// 	},
/// ]);
/// ```
pub fn scan(text: &str) -> Elements<'_> {
	Elements {
		lines: SplitLines { rest: text },
		state: ScannerState::default(),
		queued: None,
		finished: false,
	}
}

/// Splits on `\n`, `\r\n` and `\r`. A trailing terminator does not produce an
/// empty last line.
#[derive(Debug, Clone)]
struct SplitLines<'a> {
	rest: &'a str,
}

impl<'a> Iterator for SplitLines<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		if self.rest.is_empty() {
			return None;
		}

		let Some(end) = self.rest.find(['\n', '\r']) else {
			return Some(std::mem::take(&mut self.rest));
		};

		let line = &self.rest[..end];
		let terminator = if self.rest[end..].starts_with("\r\n") {
			2
		} else {
			1
		};
		self.rest = &self.rest[end + terminator..];
		Some(line)
	}
}

/// Number of leading `ch` characters in `line`, which is also the byte length
/// of the run since `ch` is ASCII.
fn count_leading(line: &str, ch: char) -> usize {
	line.len() - line.trim_start_matches(ch).len()
}

fn is_fence_start(line: &str) -> bool {
	line.starts_with("```")
}

/// Feed one line into the state machine. Returns the element completed by this
/// line, if any. A heading that flushes a paragraph is parked in `queued`.
fn process_line(
	state: &mut ScannerState,
	queued: &mut Option<Element>,
	line: &str,
) -> Option<Element> {
	if state.is_inside_code_block() {
		let ticks = count_leading(line, '`');
		let rest = &line[ticks..];

		if ticks == state.required_ticks() && rest.trim().is_empty() {
			return Some(state.end_code_block());
		}

		state.push_code_line(line);
		return None;
	}

	let trimmed = line.trim();

	if trimmed.starts_with('#') {
		let level = count_leading(trimmed, '#');
		let heading = Element::Heading {
			level,
			text: trimmed[level..].trim_start().to_string(),
		};

		return match state.take_paragraph() {
			Some(paragraph) => {
				*queued = Some(heading);
				Some(paragraph)
			}
			None => Some(heading),
		};
	}

	if is_fence_start(line) {
		let ticks = count_leading(line, '`');
		let paragraph = state.take_paragraph();
		state.begin_code_block(ticks, line[ticks..].trim());
		return paragraph;
	}

	if trimmed.is_empty() {
		return state.take_paragraph();
	}

	state.push_paragraph_line(line);
	None
}

impl Elements<'_> {
	fn finish(&mut self) -> Option<Element> {
		if let Some(paragraph) = self.state.take_paragraph() {
			// A fence start always flushes the paragraph, so an open code block
			// and a pending paragraph cannot coexist here.
			return Some(paragraph);
		}

		if self.state.is_inside_code_block() {
			return Some(self.state.end_code_block());
		}

		None
	}
}

impl Iterator for Elements<'_> {
	type Item = Element;

	fn next(&mut self) -> Option<Self::Item> {
		if let Some(element) = self.queued.take() {
			return Some(element);
		}

		if self.finished {
			return None;
		}

		for line in self.lines.by_ref() {
			if let Some(element) = process_line(&mut self.state, &mut self.queued, line) {
				return Some(element);
			}
		}

		let element = self.finish();
		if element.is_none() {
			self.finished = true;
		}
		element
	}
}

impl std::iter::FusedIterator for Elements<'_> {}
