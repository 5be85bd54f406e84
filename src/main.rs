use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use layout_patch::manifest::{
	BUILTIN_ORIGIN, Manifest, Rule, builtin_manifest, parse_manifest_file,
};
use layout_patch::patch::{PatchOptions, Patcher};
use layout_patch::rules::compile_rules;

#[derive(Parser)]
#[command(name = "layout-patch")]
#[command(
	author,
	version,
	about = "Apply a versioned find/replace manifest to front-end component files"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Manifest to apply instead of the builtin layout manifest
	#[arg(long, value_name = "FILE", global = true)]
	manifest: Option<PathBuf>,

	/// Directory the manifest paths are relative to
	#[arg(long, value_name = "DIR", default_value = ".")]
	root: PathBuf,

	/// Report what would change without writing anything
	#[arg(long)]
	dry_run: bool,

	/// Fail if any rule matches nothing
	#[arg(long)]
	strict: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Manifest inspection commands
	Manifest {
		#[command(subcommand)]
		action: ManifestAction,
	},
}

#[derive(Subcommand)]
enum ManifestAction {
	/// Display the effective manifest
	Show,
	/// Parse the manifest and compile every rule without touching any file
	Validate,
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	if let Some(Commands::Manifest { action }) = cli.command {
		return match action {
			ManifestAction::Show => handle_manifest_show(cli.manifest.as_deref()),
			ManifestAction::Validate => handle_manifest_validate(cli.manifest.as_deref()),
		};
	}

	let options = PatchOptions {
		dry_run: cli.dry_run,
		strict: cli.strict,
	};
	handle_apply(cli.manifest.as_deref(), &cli.root, options)
}

fn load_manifest(path: Option<&Path>) -> layout_patch::Result<Manifest> {
	match path {
		Some(path) => parse_manifest_file(path),
		None => builtin_manifest(),
	}
}

fn origin(path: Option<&Path>) -> String {
	path.map(|p| p.display().to_string())
		.unwrap_or_else(|| BUILTIN_ORIGIN.to_string())
}

fn handle_apply(
	manifest_path: Option<&Path>,
	root: &Path,
	options: PatchOptions,
) -> Result<ExitCode> {
	let manifest = load_manifest(manifest_path)
		.with_context(|| format!("Failed to load manifest {}", origin(manifest_path)))?;

	let patcher = Patcher::new(root, options);
	let mut stdout = std::io::stdout().lock();
	patcher
		.run(&manifest, &mut stdout)
		.with_context(|| format!("Failed to patch files under {}", patcher.root().display()))?;

	Ok(ExitCode::SUCCESS)
}

fn handle_manifest_show(manifest_path: Option<&Path>) -> Result<ExitCode> {
	let manifest = load_manifest(manifest_path)
		.with_context(|| format!("Failed to load manifest {}", origin(manifest_path)))?;

	println!("# Source: {}", origin(manifest_path));
	println!("# files: {}", manifest.files.len());
	println!("# rules: {}", manifest.rule_count());
	println!();

	for (i, file) in manifest.files.iter().enumerate() {
		println!("File {}: {}", i + 1, file.label);
		println!("  path: {}", file.path.display());
		println!("  confirmation: {}", file.confirmation_line());
		for (j, rule) in file.rules.iter().enumerate() {
			println!("  Rule {}: {}", j + 1, rule.display_name());
			print_rule(rule);
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn print_rule(rule: &Rule) {
	if let Some(ref find) = rule.find {
		println!("    find: {}", summarize(find));
	}
	if let Some(ref pattern) = rule.pattern {
		println!("    pattern: {}", summarize(pattern));
	}
	println!("    replace: {}", summarize(&rule.replace));
	if rule.dot_all {
		println!("    dot_all: true");
	}
	if let Some(ref guard) = rule.unless_contains {
		println!("    unless_contains: {}", guard);
	}
}

/// First line of a possibly multi-line value, with a count of the rest.
fn summarize(value: &str) -> String {
	let mut lines = value.lines();
	let first = lines.next().unwrap_or_default().trim();
	match lines.count() {
		0 => first.to_string(),
		rest => format!("{first} (+{rest} lines)"),
	}
}

fn handle_manifest_validate(manifest_path: Option<&Path>) -> Result<ExitCode> {
	let checked = load_manifest(manifest_path).and_then(|manifest| {
		for file in &manifest.files {
			compile_rules(&file.rules)?;
		}
		Ok(manifest)
	});

	match checked {
		Ok(manifest) => {
			println!(
				"Manifest is valid: {} ({} files, {} rules)",
				origin(manifest_path),
				manifest.files.len(),
				manifest.rule_count()
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Manifest error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
