//! apexdoc: re-indent Apex source and document its declarations.
//!
//! - `apexdoc format [FILES...]`: brace-depth re-indentation. Reads stdin
//!   when no files are given; `--write` rewrites in place and `--check`
//!   only reports.
//! - `apexdoc comment [FILE] --line N`: insert or refresh the `/** ... */`
//!   block of the class or method at the given lines.

use anyhow::{bail, Context, Result};
use apexdoc::config::Config;
use apexdoc::edit::Document;
use apexdoc::parser::{ModifierSet, SignatureParser};
use apexdoc::reindent::{reindent, MAX_INDENT_WIDTH};
use apexdoc::render::create_renderer;
use apexdoc::source::{Position, Selection};
use apexdoc::synthesize::{insert_comment, CommentOptions};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "apexdoc",
    version,
    about = "Re-indent Apex source and generate documentation comments"
)]
struct Cli {
    /// Configuration file (default: ./apexdoc.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Re-indent files, or stdin when none are given
    Format(FormatArgs),
    /// Insert or refresh the documentation block of a declaration
    Comment(CommentArgs),
}

#[derive(Args)]
struct FormatArgs {
    /// Files, directories or glob patterns
    files: Vec<String>,

    /// Rewrite files in place
    #[arg(long, conflicts_with = "check")]
    write: bool,

    /// List files that would change and exit 1 if there are any
    #[arg(long)]
    check: bool,

    /// Spaces per indent level
    #[arg(long, conflicts_with = "tabs")]
    indent_size: Option<usize>,

    /// Indent with tabs
    #[arg(long)]
    tabs: bool,
}

#[derive(Args)]
struct CommentArgs {
    /// Source file. If omitted, reads from stdin.
    file: Option<PathBuf>,

    /// First selected line (1-based)
    #[arg(long, required_unless_present = "selection", conflicts_with = "selection")]
    line: Option<usize>,

    /// Last selected line (1-based, defaults to --line)
    #[arg(long, requires = "line")]
    end_line: Option<usize>,

    /// Explicit range as LINE:COL-LINE:COL (1-based)
    #[arg(long)]
    selection: Option<String>,

    /// Rewrite the file in place
    #[arg(long, requires = "file")]
    write: bool,

    /// Output style: text (default) or snippet
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Date for new blocks, e.g. "5 March 2024" or 2024-03-05
    #[arg(long)]
    date: Option<String>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref(), Path::new("."))?;
    match cli.command {
        Command::Format(args) => format_command(args, config),
        Command::Comment(args) => comment_command(args, config),
    }
}

fn init_tracing(verbose: bool) {
    let directive = if verbose { "apexdoc=debug" } else { "apexdoc=warn" };
    let filter = match directive.parse() {
        Ok(d) => EnvFilter::from_default_env().add_directive(d),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn format_command(args: FormatArgs, mut config: Config) -> Result<ExitCode> {
    if let Some(size) = args.indent_size {
        if !(1..=MAX_INDENT_WIDTH).contains(&size) {
            bail!("--indent-size must be between 1 and {}", MAX_INDENT_WIDTH);
        }
        config.indent_size = size;
        config.use_tabs = false;
    }
    if args.tabs {
        config.use_tabs = true;
    }
    let unit = config.indent_unit();

    if args.files.is_empty() {
        if args.write {
            bail!("--write needs at least one file");
        }
        let input = read_stdin()?;
        let output = reindent(&input, &unit);
        if args.check {
            return Ok(if output == input {
                ExitCode::SUCCESS
            } else {
                println!("<stdin>");
                ExitCode::FAILURE
            });
        }
        print!("{}", output);
        return Ok(ExitCode::SUCCESS);
    }

    let mut changed = 0usize;
    for path in expand_globs(&args.files)? {
        let input = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let output = reindent(&input, &unit);
        if args.check {
            if output != input {
                println!("{}", path.display());
                changed += 1;
            }
        } else if args.write {
            if output != input {
                fs::write(&path, &output)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::debug!(path = %path.display(), "reformatted");
            }
        } else {
            print!("{}", output);
        }
    }

    Ok(if changed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn comment_command(args: CommentArgs, config: Config) -> Result<ExitCode> {
    let selection = match (&args.selection, args.line) {
        (Some(range), _) => parse_selection(range)?,
        (None, Some(first)) => line_selection(first, args.end_line.unwrap_or(first))?,
        (None, None) => bail!("either --line or --selection is required"),
    };

    let modifiers = ModifierSet::with_extra(config.extra_modifiers.as_slice())
        .context("invalid extra_modifiers in configuration")?;
    let today = match &args.date {
        Some(text) => parse_date(text)?,
        None => Local::now().date_naive(),
    };
    let options = CommentOptions {
        parser: SignatureParser::new(modifiers),
        renderer: create_renderer(&args.format)?,
        today,
    };

    let input = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => read_stdin()?,
    };

    let mut doc = Document::new(input);
    let inserted = insert_comment(&mut doc, selection, &options)
        .context("failed to insert documentation comment")?;
    if !inserted {
        tracing::warn!("selection is not a class or method declaration, nothing to document");
    }

    match &args.file {
        Some(path) if args.write => {
            if inserted {
                fs::write(path, doc.text())
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        _ => print!("{}", doc.text()),
    }
    Ok(ExitCode::SUCCESS)
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    Ok(input)
}

/// Whole lines `first..=last`, 1-based.
fn line_selection(first: usize, last: usize) -> Result<Selection> {
    if first == 0 || last == 0 {
        bail!("line numbers start at 1");
    }
    if last < first {
        bail!("--end-line {} is before --line {}", last, first);
    }
    Ok(Selection::lines(first - 1, last - 1))
}

/// `LINE:COL-LINE:COL`, 1-based.
fn parse_selection(range: &str) -> Result<Selection> {
    let (start, end) = range
        .split_once('-')
        .with_context(|| format!("invalid selection: {} (expected LINE:COL-LINE:COL)", range))?;
    Ok(Selection::new(parse_position(start)?, parse_position(end)?))
}

fn parse_position(text: &str) -> Result<Position> {
    let (line, column) = text
        .trim()
        .split_once(':')
        .with_context(|| format!("invalid position: {} (expected LINE:COL)", text))?;
    let line: usize = line
        .parse()
        .with_context(|| format!("invalid line number: {}", line))?;
    let column: usize = column
        .parse()
        .with_context(|| format!("invalid column: {}", column))?;
    if line == 0 || column == 0 {
        bail!("positions start at 1:1, got {}", text);
    }
    Ok(Position::new(line - 1, column - 1))
}

/// Accepts `5 March 2024` (the rendered form) or ISO `2024-03-05`.
fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%d %B %Y")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .with_context(|| format!("invalid date: {} (expected \"5 March 2024\" or 2024-03-05)", text))
}

/// File extensions recognized as Apex source.
const SUPPORTED_EXTENSIONS: &[&str] = &["cls", "trigger", "apex"];

/// Expand glob patterns into a list of real file paths.
/// Bare directories are scanned (non-recursively) for Apex files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                let supported = p
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
                if p.is_file() && supported {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn line_selection_is_zero_based_and_whole_line() {
        let sel = line_selection(2, 4).unwrap();
        assert_eq!(sel, Selection::lines(1, 3));
        assert!(line_selection(0, 1).is_err());
        assert!(line_selection(3, 2).is_err());
    }

    #[test]
    fn parses_explicit_selection() {
        let sel = parse_selection("2:5-3:1").unwrap();
        assert_eq!(sel.start, Position::new(1, 4));
        assert_eq!(sel.end, Position::new(2, 0));
    }

    #[test]
    fn rejects_malformed_selection() {
        assert!(parse_selection("2:5").is_err());
        assert!(parse_selection("a:1-2:1").is_err());
        assert!(parse_selection("0:1-2:1").is_err());
    }

    #[test]
    fn parses_both_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date("5 March 2024").unwrap(), expected);
        assert_eq!(parse_date("2024-03-05").unwrap(), expected);
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn directory_scan_keeps_apex_files_only() {
        let dir = TempDir::new().unwrap();
        for name in ["B.cls", "A.trigger", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let files = expand_globs(&[dir.path().to_string_lossy().to_string()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["A.trigger", "B.cls"]);
    }
}
