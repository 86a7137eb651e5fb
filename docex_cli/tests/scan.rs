mod common;

use docex_core::AnyEmptyResult;
use serde_json::Value;

const DOCUMENT: &str = "# Title\n\nSome text\nmore text\n\n```cpp\nint x;\n```\n";

#[test]
fn scan_prints_text_summary() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("doc.md");
	std::fs::write(&file, DOCUMENT)?;

	common::docex_cmd()
		.arg("scan")
		.arg(&file)
		.assert()
		.success()
		.stdout("heading    # Title\nparagraph  2 line(s)\ncode       cpp 1 line(s)\n");

	Ok(())
}

#[test]
fn scan_prints_json_elements() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("doc.md");
	std::fs::write(&file, DOCUMENT)?;

	let output = common::docex_cmd()
		.arg("scan")
		.arg("--format")
		.arg("json")
		.arg(&file)
		.output()?;

	assert!(output.status.success());
	let elements: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(elements[0]["type"], "heading");
	assert_eq!(elements[0]["level"], 1);
	assert_eq!(elements[0]["text"], "Title");
	assert_eq!(elements[1]["type"], "paragraph");
	assert_eq!(elements[1]["text"], "Some text\nmore text");
	assert_eq!(elements[2]["type"], "codeBlock");
	assert_eq!(elements[2]["language"], "cpp");
	assert_eq!(elements[2]["content"], "int x;");

	Ok(())
}

#[test]
fn scan_missing_file_fails() {
	common::docex_cmd()
		.arg("scan")
		.arg("does/not/exist.md")
		.assert()
		.code(2);
}
