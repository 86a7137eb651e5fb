mod common;

use clap::Parser;
use docex_cli::Commands;
use docex_cli::DocexCli;
use docex_cli::OutputFormat;
use docex_core::AnyEmptyResult;
use serde_json::Value;

fn extract(root: &std::path::Path) {
	common::docex_cmd()
		.arg("--path")
		.arg(root)
		.arg("extract")
		.arg(root.join("docs"))
		.arg(root.join("out"))
		.assert()
		.success();
}

#[test]
fn check_passes_when_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "docs/api/proxy.md", common::PROXY_DOC)?;
	extract(tmp.path());

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("check")
		.arg(tmp.path().join("docs"))
		.arg(tmp.path().join("out"))
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"));

	Ok(())
}

#[test]
fn check_fails_when_missing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "docs/api/proxy.md", common::PROXY_DOC)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("check")
		.arg(tmp.path().join("docs"))
		.arg(tmp.path().join("out"))
		.assert()
		.code(1)
		.stderr(predicates::str::contains("missing files: 1"))
		.stderr(predicates::str::contains("example_api_proxy.cpp"));

	Ok(())
}

#[test]
fn check_fails_when_stale_and_shows_diff() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "docs/api/proxy.md", common::PROXY_DOC)?;
	extract(tmp.path());
	common::write_file(
		tmp.path(),
		"docs/api/proxy.md",
		&common::PROXY_DOC.replace("return 0;", "return 1;"),
	)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("check")
		.arg("--diff")
		.arg(tmp.path().join("docs"))
		.arg(tmp.path().join("out"))
		.assert()
		.code(1)
		.stderr(predicates::str::contains("stale files: 1"))
		.stderr(predicates::str::contains("-int main() { return 0; }"))
		.stderr(predicates::str::contains("+int main() { return 1; }"));

	Ok(())
}

#[test]
fn check_json_reports_stale_targets() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "docs/api/proxy.md", common::PROXY_DOC)?;
	extract(tmp.path());
	std::fs::write(
		tmp.path().join("out").join("example_api_proxy.cpp"),
		"// edited by hand\n",
	)?;

	let output = common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg(tmp.path().join("docs"))
		.arg(tmp.path().join("out"))
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let report: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(report["ok"], Value::Bool(false));
	assert_eq!(report["stale"][0]["target"], "example_api_proxy.cpp");
	assert_eq!(report["stale"][0]["source"], "api/proxy.md");
	assert_eq!(report["missing"].as_array().map(Vec::len), Some(0));

	Ok(())
}

#[test]
fn check_json_passes_when_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "docs/api/proxy.md", common::PROXY_DOC)?;
	extract(tmp.path());

	let output = common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg(tmp.path().join("docs"))
		.arg(tmp.path().join("out"))
		.output()?;

	assert!(output.status.success());
	let report: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(report["ok"], Value::Bool(true));

	Ok(())
}

#[test]
fn check_parses_format_flag() {
	let cli = DocexCli::parse_from(["docex", "check", "docs", "out", "--format", "json"]);
	let Some(Commands::Check { format, diff, .. }) = cli.command else {
		panic!("expected check command");
	};
	assert!(matches!(format, OutputFormat::Json));
	assert!(!diff);
}
