mod common;

use clap::Parser;
use docex_cli::Commands;
use docex_cli::DocexCli;
use docex_core::AnyEmptyResult;

#[test]
fn extract_writes_one_file_per_example() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let docs = tmp.path().join("docs");
	let out = tmp.path().join("out");
	common::write_file(&docs, "api/proxy.md", common::PROXY_DOC)?;
	common::write_file(&docs, "guide/intro.md", common::INTRO_DOC)?;
	common::write_file(&docs, "readme.md", common::PLAIN_DOC)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("extract")
		.arg(&docs)
		.arg(&out)
		.assert()
		.success()
		.stdout(predicates::str::contains("2 written"));

	let proxy = std::fs::read_to_string(out.join("example_api_proxy.cpp"))?;
	assert!(proxy.starts_with("// This file was auto-generated from:\n// "));
	assert!(proxy.ends_with("\n\nint main() { return 0; }"));
	assert!(!proxy.contains("ignored();"));

	let intro = std::fs::read_to_string(out.join("example_guide_intro.cpp"))?;
	assert!(intro.contains("puts(\"hi\");"));
	assert!(!out.join("example_readme.cpp").exists());

	Ok(())
}

#[test]
fn extract_leaves_unchanged_files_alone() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let docs = tmp.path().join("docs");
	let out = tmp.path().join("out");
	common::write_file(&docs, "api/proxy.md", common::PROXY_DOC)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("extract")
		.arg(&docs)
		.arg(&out)
		.assert()
		.success();

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("extract")
		.arg(&docs)
		.arg(&out)
		.assert()
		.success()
		.stdout(predicates::str::contains("0 written, 1 unchanged"));

	Ok(())
}

#[test]
fn extract_dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let docs = tmp.path().join("docs");
	let out = tmp.path().join("out");
	common::write_file(&docs, "api/proxy.md", common::PROXY_DOC)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("extract")
		.arg("--dry-run")
		.arg(&docs)
		.arg(&out)
		.assert()
		.success()
		.stdout(predicates::str::contains("example_api_proxy.cpp (new)"));

	assert!(!out.exists());

	Ok(())
}

#[test]
fn extract_uses_config_from_project_root() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let docs = tmp.path().join("docs");
	let out = tmp.path().join("out");
	common::write_file(
		&docs,
		"usage.md",
		"## Usage\n\n```rust\nfn main() {}\n```\n",
	)?;
	std::fs::write(
		tmp.path().join("docex.toml"),
		"[extract]\nheading = \"Usage\"\nlanguage = \"rust\"\n\n[output]\nprefix = \"\"\nextension = \
		 \"rs\"\n",
	)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("extract")
		.arg(&docs)
		.arg(&out)
		.assert()
		.success();

	let generated = std::fs::read_to_string(out.join("usage.rs"))?;
	assert!(generated.ends_with("fn main() {}"));

	Ok(())
}

#[test]
fn extract_language_flag_overrides_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let docs = tmp.path().join("docs");
	let out = tmp.path().join("out");
	common::write_file(&docs, "tool.md", "## Example\n\n```python\nprint(1)\n```\n")?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("--language")
		.arg("python")
		.arg("extract")
		.arg(&docs)
		.arg(&out)
		.assert()
		.success();

	assert!(out.join("example_tool.cpp").is_file());

	Ok(())
}

#[test]
fn extract_fails_on_multiple_examples() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let docs = tmp.path().join("docs");
	let out = tmp.path().join("out");
	common::write_file(
		&docs,
		"twice.md",
		"## Example\n\n```cpp\na();\n```\n\n```cpp\nb();\n```\n",
	)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("extract")
		.arg(&docs)
		.arg(&out)
		.assert()
		.code(2)
		.stderr(predicates::str::contains("docex::multiple_examples"));

	Ok(())
}

#[test]
fn extract_rejects_documents_sharing_an_output_name() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let docs = tmp.path().join("docs");
	let out = tmp.path().join("out");
	common::write_file(&docs, "a/b_c.md", common::INTRO_DOC)?;
	common::write_file(&docs, "a_b/c.md", common::INTRO_DOC)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("extract")
		.arg(&docs)
		.arg(&out)
		.assert()
		.code(2)
		.stderr(predicates::str::contains("docex::duplicate_target"))
		.stderr(predicates::str::contains("example_a_b_c.cpp"));

	assert!(!out.exists());

	Ok(())
}

#[test]
fn extract_numbers_additional_examples() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let docs = tmp.path().join("docs");
	let out = tmp.path().join("out");
	common::write_file(
		&docs,
		"twice.md",
		"## Example\n\n```cpp\na();\n```\n\n```cpp\nb();\n```\n",
	)?;
	std::fs::write(
		tmp.path().join("docex.toml"),
		"[extract]\npolicy = \"all\"\n",
	)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("extract")
		.arg(&docs)
		.arg(&out)
		.assert()
		.success();

	assert!(std::fs::read_to_string(out.join("example_twice.cpp"))?.ends_with("a();"));
	assert!(std::fs::read_to_string(out.join("example_twice_2.cpp"))?.ends_with("b();"));

	Ok(())
}

#[test]
fn extract_parses_watch_flag() {
	let cli = DocexCli::parse_from(["docex", "extract", "docs", "out", "--watch"]);
	let Some(Commands::Extract { watch, dry_run, .. }) = cli.command else {
		panic!("expected extract command");
	};
	assert!(watch);
	assert!(!dry_run);
}
