use blobify::cli::{Cli, OutputFormat};
use blobify::{BlobifyConfig, Context, DiscoverySnapshot, FileState, Scanner, git};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    if cli.list_contexts {
        return list_contexts(&cli);
    }
    run_scan(&cli)
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.debug || config_requests_debug(cli) {
        EnvFilter::new("blobify=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// The `@debug` switch in the selected context enables debug logging the
/// same way the `--debug` flag does.
fn config_requests_debug(cli: &Cli) -> bool {
    let Ok(root) = cli.directory.canonicalize() else {
        return false;
    };
    let anchor = git::find_git_root(&root).unwrap_or(root);
    let Ok(config) = BlobifyConfig::from_file(&anchor.join(".blobify")) else {
        return false;
    };
    config
        .resolve(cli.context.as_deref())
        .is_ok_and(|resolved| resolved.has_switch("debug"))
}

fn run_scan(cli: &Cli) -> ExitCode {
    let scanner = match Scanner::new(&cli.directory) {
        Ok(scanner) => scanner,
        Err(error) => return fail(error),
    };
    let scanner = match &cli.context {
        Some(context) => scanner.with_context(context),
        None => scanner,
    };
    let snapshot = match scanner.scan() {
        Ok(snapshot) => snapshot,
        Err(error) => return fail(error),
    };

    match cli.format {
        OutputFormat::Text => {
            print_listing(&snapshot, cli.context.is_some());
            ExitCode::SUCCESS
        }
        OutputFormat::Json => print_json(&snapshot),
    }
}

fn print_listing(snapshot: &DiscoverySnapshot, context_requested: bool) {
    println!("# Source Directory: {}", snapshot.root().display());
    match snapshot.git_root() {
        Some(git_root) => println!("# Git repository: {}", git_root.display()),
        None => println!("# Not in a git repository"),
    }

    let context = snapshot.context();
    let includes = context.include_patterns().len();
    let excludes = context.exclude_patterns().len();
    let switches = context.switches().len();
    if includes > 0 || excludes > 0 {
        let context_info = if context_requested {
            format!(" (context: {})", context.name())
        } else {
            String::new()
        };
        let mut line = format!(
            "# .blobify configuration{context_info}: {includes} include patterns, {excludes} exclude patterns"
        );
        if switches > 0 {
            line.push_str(&format!(", {switches} switches"));
        }
        println!("{line}");
    }
    println!();

    for dir in snapshot.skipped_dirs() {
        println!("{dir} {}", "[IGNORED BY GITIGNORE]".yellow());
    }
    for file in snapshot.files() {
        match state_label(file.state) {
            Some(label) => println!("{} {label}", file.relative_path),
            None => println!("{}", file.relative_path),
        }
    }
}

fn state_label(state: FileState) -> Option<colored::ColoredString> {
    match state {
        FileState::Included => None,
        FileState::OverrideIncluded => Some("[INCLUDED BY .blobify]".green()),
        FileState::VcsIgnored => Some("[IGNORED BY GITIGNORE]".yellow()),
        FileState::OverrideExcluded => Some("[EXCLUDED BY .blobify]".red()),
    }
}

fn print_json(snapshot: &DiscoverySnapshot) -> ExitCode {
    match serde_json::to_string_pretty(snapshot) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(error) => fail(error),
    }
}

fn list_contexts(cli: &Cli) -> ExitCode {
    let root = match cli.directory.canonicalize() {
        Ok(root) => root,
        Err(error) => {
            return fail(format!(
                "cannot resolve {}: {error}",
                cli.directory.display()
            ));
        }
    };
    let anchor = git::find_git_root(&root).unwrap_or(root);
    let config = match BlobifyConfig::from_file(&anchor.join(".blobify")) {
        Ok(config) => config,
        Err(error) => return fail(error),
    };

    let mut contexts: Vec<&Context> = config.named_contexts().collect();
    if contexts.is_empty() {
        print_context_help();
        return ExitCode::SUCCESS;
    }
    contexts.sort_by(|a, b| a.name().cmp(b.name()));

    println!("Available contexts:");
    println!("{}", "=".repeat(20));
    for context in contexts {
        let mut line = format!("  {}", context.name());
        if !context.parents().is_empty() {
            line.push_str(&format!(" (inherits from {})", context.parents().join(",")));
        }
        if let Some(description) = context.description() {
            line.push_str(&format!(": {description}"));
        }
        println!("{line}");
    }
    println!();
    println!("Use with: bfy -x <context-name> or bfy --context=<context-name>");
    ExitCode::SUCCESS
}

fn print_context_help() {
    println!("No contexts found in .blobify file.");
    println!();
    println!("To create contexts, add sections like this to your .blobify file:");
    println!();
    println!("[docs-only]");
    println!("# Context for documentation files only");
    println!("-**");
    println!("+*.md");
    println!("+docs/**");
    println!();
    println!("Context inheritance:");
    println!();
    println!("[base]");
    println!("@clip");
    println!("+*.py");
    println!();
    println!("[extended:base]");
    println!("# Inherits @clip and +*.py from base");
    println!("+*.md");
    println!();
    println!("Multiple inheritance:");
    println!();
    println!("[combined:base,extended]");
    println!("+*.txt");
    println!();
    println!("Use with: bfy -x <context-name> or bfy --context=<context-name>");
}

fn fail(error: impl std::fmt::Display) -> ExitCode {
    eprintln!("Error: {error}");
    ExitCode::FAILURE
}
