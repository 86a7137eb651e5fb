use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn docex_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("docex"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("DOCEX_LOG");
	cmd
}

/// Write `content` to `root/relative`, creating parent directories.
#[allow(dead_code)]
pub fn write_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

#[allow(dead_code)]
pub const PROXY_DOC: &str = "# Proxy\n\nForwards calls.\n\n## Example\n\n```cpp\nint main() { return \
                             0; }\n```\n\n## Notes\n\n```cpp\nignored();\n```\n";

#[allow(dead_code)]
pub const INTRO_DOC: &str = "# Intro\n\n## Example\n\n```cpp\n#include <cstdio>\nint main() { \
                             puts(\"hi\"); }\n```\n";

#[allow(dead_code)]
pub const PLAIN_DOC: &str = "# Readme\n\nNo examples here.\n";
