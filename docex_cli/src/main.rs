use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use docex_cli::Commands;
use docex_cli::DocexCli;
use docex_cli::OutputFormat;
use docex_core::DocexConfig;
use docex_core::Element;
use docex_core::ExampleExtractor;
use docex_core::Materializer;
use docex_core::autogen::AutogenOutcome;
use docex_core::autogen::compute_autogen;
use docex_core::autogen::write_autogen;
use docex_core::check_generated;
use docex_core::project::ScanOptions;
use docex_core::project::list_documents_with_examples;
use docex_core::scan;
use docex_core::write_generated;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
	let args = DocexCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Scan { file, format }) => run_scan(file, *format),
		Some(Commands::Extract {
			input,
			output,
			dry_run,
			watch,
		}) => run_extract(&args, input, output, *dry_run, *watch),
		Some(Commands::File { document, output }) => run_file(&args, document, output),
		Some(Commands::List { input, print0 }) => run_list(&args, input, *print0),
		Some(Commands::Check {
			input,
			output,
			diff,
			format,
		}) => run_check(&args, input, output, *diff, *format),
		Some(Commands::Autogen { dir, check }) => run_autogen(&args, dir, *check),
		None => {
			eprintln!("No subcommand specified. Run `docex --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<docex_core::DocexError>() {
			Ok(docex_err) => {
				let report: miette::Report = (*docex_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `DOCEX_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env("DOCEX_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &DocexCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Load `docex.toml` from the project root and apply command line overrides.
fn load_config(args: &DocexCli) -> CliResult<DocexConfig> {
	let root = resolve_root(args);
	let mut config = DocexConfig::load_or_default(&root)?;

	if let Some(heading) = &args.heading {
		config.extract.heading.clone_from(heading);
	}
	if let Some(language) = &args.language {
		config.extract.language.clone_from(language);
	}

	tracing::debug!(
		root = %root.display(),
		heading = %config.extract.heading,
		language = %config.extract.language,
		"loaded configuration"
	);
	Ok(config)
}

fn run_init(args: &DocexCli) -> CliResult<()> {
	let root = resolve_root(args);
	let config_path = root.join("docex.toml");

	if config_path.exists() {
		println!("Config file already exists: {}", config_path.display());
		return Ok(());
	}

	let sample_config = r##"# docex configuration

[extract]
# Level-2 heading that opens an example section.
heading = "Example"
# Info string of the fenced blocks to extract (case-insensitive).
language = "cpp"
# One of "all", "at-most-one", "exactly-one".
policy = "at-most-one"

[output]
prefix = "example_"
extension = "cpp"
comment = "//"

# Guard examples that need std::format so they still build without it.
# [[wrap]]
# contains = "pro::skills::format"
# template = "#include <proxy/proxy.h>\n#ifdef PRO4D_HAS_FORMAT\n{{ code }}\n#else\nint main() {\n  // std::format not available\n  return 77;\n}\n#endif"

[build]
file = "meson.build"
variable = "docs"
"##;

	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Add `## Example` sections with fenced code blocks to your docs");
	println!("  2. Run `docex extract <docs> <output>` to generate sources");
	println!("  3. Run `docex check <docs> <output>` in CI");

	Ok(())
}

fn run_scan(file: &Path, format: OutputFormat) -> CliResult<()> {
	let text = std::fs::read_to_string(file)?;

	match format {
		OutputFormat::Json => {
			let elements: Vec<Element> = scan(&text).collect();
			println!("{}", serde_json::to_string_pretty(&elements)?);
		}
		OutputFormat::Text => {
			for element in scan(&text) {
				match element {
					Element::Heading { level, text } => {
						println!("heading    {} {text}", "#".repeat(level));
					}
					Element::Paragraph { text } => {
						println!("paragraph  {} line(s)", text.lines().count());
					}
					Element::CodeBlock { language, content } => {
						let language = if language.is_empty() {
							"(none)"
						} else {
							language.as_str()
						};
						println!(
							"code       {language} {} line(s)",
							content.lines().count()
						);
					}
				}
			}
		}
	}

	Ok(())
}

fn run_extract(
	args: &DocexCli,
	input: &Path,
	output: &Path,
	dry_run: bool,
	watch: bool,
) -> CliResult<()> {
	run_extract_once(args, input, output, dry_run)?;

	if !watch {
		return Ok(());
	}

	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				let touches_markdown = event
					.paths
					.iter()
					.any(|path| docex_core::project::is_markdown_file(path));
				if touches_markdown
					&& matches!(
						event.kind,
						notify::EventKind::Modify(_)
							| notify::EventKind::Create(_)
							| notify::EventKind::Remove(_)
					) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(input, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, extracting...");
		if let Err(e) = run_extract_once(args, input, output, dry_run) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn run_extract_once(args: &DocexCli, input: &Path, output: &Path, dry_run: bool) -> CliResult<()> {
	let config = load_config(args)?;
	let options = ScanOptions::from_config(&config)?;
	let files = Materializer::from_config(&config).plan_directory(input, output, &options)?;

	if dry_run {
		let result = check_generated(&files)?;
		if result.is_ok() {
			println!("Dry run: all {} generated file(s) are up to date.", files.len());
			return Ok(());
		}

		println!("Dry run: would write");
		for file in &result.missing {
			println!("  {} (new)", make_relative(&file.target, output));
		}
		for entry in &result.stale {
			println!("  {}", make_relative(&entry.target, output));
		}
		return Ok(());
	}

	let summary = write_generated(&files)?;
	if args.verbose {
		for path in &summary.written {
			println!("  wrote {}", make_relative(path, output));
		}
	}
	println!(
		"Extracted {} example(s): {} written, {} unchanged.",
		files.len(),
		colored!(summary.written.len(), green),
		summary.unchanged.len()
	);

	Ok(())
}

fn run_file(args: &DocexCli, document: &Path, output: &Path) -> CliResult<()> {
	let config = load_config(args)?;
	let file = Materializer::from_config(&config).plan_file(document, output)?;
	let summary = write_generated(std::slice::from_ref(&file))?;

	if summary.written.is_empty() {
		println!("{} is up to date.", output.display());
	} else {
		println!("Wrote {}", output.display());
	}

	Ok(())
}

fn run_list(args: &DocexCli, input: &Path, print0: bool) -> CliResult<()> {
	let config = load_config(args)?;
	let options = ScanOptions::from_config(&config)?;
	let extractor = ExampleExtractor::from(&config.extract);
	let documents = list_documents_with_examples(input, &options, &extractor)?;

	let mut stdout = std::io::stdout().lock();
	for document in documents {
		if print0 {
			write!(stdout, "{document}\0")?;
		} else {
			writeln!(stdout, "{document}")?;
		}
	}
	stdout.flush()?;

	Ok(())
}

fn run_check(
	args: &DocexCli,
	input: &Path,
	output: &Path,
	show_diff: bool,
	format: OutputFormat,
) -> CliResult<()> {
	let config = load_config(args)?;
	let options = ScanOptions::from_config(&config)?;
	let files = Materializer::from_config(&config).plan_directory(input, output, &options)?;
	let result = check_generated(&files)?;

	if result.is_ok() {
		match format {
			OutputFormat::Json => {
				println!("{{\"ok\":true,\"stale\":[],\"missing\":[]}}");
			}
			OutputFormat::Text => {
				println!(
					"Check passed: all {} generated file(s) are up to date.",
					files.len()
				);
			}
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let stale: Vec<serde_json::Value> = result
				.stale
				.iter()
				.map(|entry| {
					serde_json::json!({
						"source": make_relative(&entry.source, input),
						"target": make_relative(&entry.target, output),
					})
				})
				.collect();
			let missing: Vec<serde_json::Value> = result
				.missing
				.iter()
				.map(|file| {
					serde_json::json!({
						"source": make_relative(&file.source, input),
						"target": make_relative(&file.target, output),
					})
				})
				.collect();
			let report = serde_json::json!({
				"ok": false,
				"stale": stale,
				"missing": missing,
			});
			println!("{report}");
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");
			eprintln!("  stale files: {}", result.stale.len());
			eprintln!("  missing files: {}", result.missing.len());

			if !result.missing.is_empty() {
				eprintln!();
				eprintln!("Missing:");
				for file in &result.missing {
					eprintln!(
						"  {} from {}",
						make_relative(&file.target, output),
						make_relative(&file.source, input)
					);
				}
			}

			if !result.stale.is_empty() {
				eprintln!();
				eprintln!("Out of date:");
				for entry in &result.stale {
					eprintln!(
						"  {} from {}",
						make_relative(&entry.target, output),
						make_relative(&entry.source, input)
					);
					if show_diff {
						print_diff(&entry.current_content, &entry.expected_content);
					}
				}
			}

			eprintln!();
			eprintln!(
				"{} run `docex extract` to regenerate the example sources",
				colored!("hint:", yellow)
			);
		}
	}

	process::exit(1);
}

fn run_autogen(args: &DocexCli, dir: &Path, check: bool) -> CliResult<()> {
	let config = load_config(args)?;
	let options = ScanOptions::from_config(&config)?;
	let extractor = ExampleExtractor::from(&config.extract);
	let result = compute_autogen(dir, &config, &options, &extractor)?;

	match (&result.outcome, check) {
		(AutogenOutcome::Unchanged, _) => {
			println!(
				"{} is up to date ({} document(s)).",
				result.path.display(),
				result.items.len()
			);
		}
		(AutogenOutcome::Updated(_), true) => {
			eprintln!(
				"{} is out of date. Run `docex autogen` to refresh it.",
				result.path.display()
			);
			process::exit(1);
		}
		(AutogenOutcome::Updated(_), false) => {
			write_autogen(&result)?;
			println!(
				"Updated {} ({} document(s)).",
				result.path.display(),
				colored!(result.items.len(), green)
			);
		}
	}

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
	if !expected.ends_with('\n') {
		eprintln!();
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
