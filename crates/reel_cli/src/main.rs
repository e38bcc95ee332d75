use std::env;
use std::fs;
use std::process::ExitCode;

use reel_analyzer::analyze;
use reel_diagnostics::Issue;
use reel_formatter::{format_source, FormatOptions};
use reel_parser::parse_source;
use reel_syntax::ParseContext;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "check" => with_file(&args, |path, source| cmd_check(path, source)),
        "format" => with_file(&args, |_, source| {
            print!("{}", format_source(source, &FormatOptions::default()));
            ExitCode::SUCCESS
        }),
        "echo" => with_file(&args, |_, source| {
            print!("{}", format_source(source, &FormatOptions::passthrough()));
            ExitCode::SUCCESS
        }),
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("reel {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage(&args[0]);
            ExitCode::from(1)
        }
    }
}

fn print_usage(program: &str) {
    eprintln!(
        r#"reel - ABC notation toolchain

Usage: {} <command> <file.abc>

Commands:
  check <file>    Parse and analyze a file, listing issues
  format <file>   Reprint a file with normalized spacing
  echo <file>     Reprint a file verbatim (round-trip check)
  help            Show this help message
  version         Show version information

Examples:
  {} check tune.abc
  {} format tune.abc
"#,
        program, program, program
    );
}

fn with_file(args: &[String], run: impl Fn(&str, &str) -> ExitCode) -> ExitCode {
    if args.len() < 3 {
        eprintln!("Error: missing file path");
        eprintln!("Usage: {} {} <file.abc>", args[0], args[1]);
        return ExitCode::from(1);
    }
    let path = &args[2];
    match fs::read_to_string(path) {
        Ok(source) => run(path, &source),
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path, e);
            ExitCode::from(1)
        }
    }
}

fn cmd_check(path: &str, source: &str) -> ExitCode {
    let mut ctx = ParseContext::new();
    let ast = parse_source(source, &mut ctx);
    let mut issues: Vec<Issue> = ctx.into_issues().into_issues();
    issues.extend(analyze(&ast));

    for issue in &issues {
        print_issue(path, source, issue);
    }

    let tunes = ast
        .items
        .iter()
        .filter(|i| matches!(i, reel_parser::FileItem::Tune(_)))
        .count();

    if issues.is_empty() {
        eprintln!("{}: OK ({} tune{})", path, tunes, plural(tunes));
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "{}: {} issue{} in {} tune{}",
            path,
            issues.len(),
            plural(issues.len()),
            tunes,
            plural(tunes)
        );
        ExitCode::from(1)
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn print_issue(path: &str, source: &str, issue: &Issue) {
    let bold = "\x1b[1m";
    let red = "\x1b[31m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    eprintln!(
        "{}{}{}{}: {}",
        bold, red, issue.origin, reset, issue.message
    );
    eprintln!(
        "  {}-->{} {}:{}:{}",
        cyan,
        reset,
        path,
        issue.line_display(),
        issue.column_display()
    );

    if let Some(line_text) = source.lines().nth(issue.line as usize) {
        let line_num = issue.line_display().to_string();
        let padding = " ".repeat(line_num.len());
        let underline_len = issue
            .lexeme
            .as_ref()
            .map(|l| l.len().max(1))
            .unwrap_or(1);

        eprintln!("  {} {}|{}", padding, cyan, reset);
        eprintln!("  {}{} |{} {}", cyan, line_num, reset, line_text);
        eprintln!(
            "  {} {}|{} {}{}{}{}",
            padding,
            cyan,
            reset,
            " ".repeat(issue.column as usize),
            red,
            "^".repeat(underline_len),
            reset
        );
    }
    eprintln!();
}
