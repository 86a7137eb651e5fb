mod common;

use docex_core::AnyEmptyResult;

#[test]
fn list_prints_documents_with_examples() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let docs = tmp.path().join("docs");
	common::write_file(&docs, "api/proxy.md", common::PROXY_DOC)?;
	common::write_file(&docs, "guide/intro.md", common::INTRO_DOC)?;
	common::write_file(&docs, "readme.md", common::PLAIN_DOC)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("list")
		.arg(&docs)
		.assert()
		.success()
		.stdout("api/proxy.md\nguide/intro.md\n");

	Ok(())
}

#[test]
fn list_print0_separates_with_nul() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let docs = tmp.path().join("docs");
	common::write_file(&docs, "api/proxy.md", common::PROXY_DOC)?;
	common::write_file(&docs, "guide/intro.md", common::INTRO_DOC)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("list")
		.arg("--print0")
		.arg(&docs)
		.assert()
		.success()
		.stdout("api/proxy.md\0guide/intro.md\0");

	Ok(())
}

#[test]
fn list_respects_exclude_patterns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let docs = tmp.path().join("docs");
	common::write_file(&docs, "api/proxy.md", common::PROXY_DOC)?;
	common::write_file(&docs, "guide/intro.md", common::INTRO_DOC)?;
	std::fs::write(
		tmp.path().join("docex.toml"),
		"[exclude]\npatterns = [\"guide/\"]\n",
	)?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("list")
		.arg(&docs)
		.assert()
		.success()
		.stdout("api/proxy.md\n");

	Ok(())
}

#[test]
fn list_empty_directory_prints_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("docs"))?;

	common::docex_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("list")
		.arg(tmp.path().join("docs"))
		.assert()
		.success()
		.stdout("");

	Ok(())
}
