use clap::{Parser, Subcommand};
use colored::Colorize;
use fancy_regex::Regex;
use regexml::{Expression, ExpressionRegistry, FileResource, LoadOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "regexml")]
#[command(about = "Regexml - Regular expressions built from XML documents")]
#[command(version)]
struct Cli {
    /// Validate documents against the regexml schema before loading
    #[arg(long, global = true)]
    validate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every expression of a document
    List {
        /// The regexml document
        file: String,
    },
    /// Show the translated regex of an expression
    Show {
        /// The regexml document
        file: String,
        /// The expression id
        id: String,
    },
    /// Test an expression against input
    Test {
        /// The regexml document
        file: String,
        /// The expression id
        id: String,
        /// The input string to test
        input: String,
        /// Show capture groups
        #[arg(short, long)]
        verbose: bool,
    },
    /// Find all matches in input
    Find {
        /// The regexml document
        file: String,
        /// The expression id
        id: String,
        /// The input string
        input: String,
    },
    /// Check if an expression matches
    Match {
        /// The regexml document
        file: String,
        /// The expression id
        id: String,
        /// The input string
        input: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = LoadOptions {
        validate: cli.validate,
    };

    match cli.command {
        Commands::List { file } => cmd_list(&load(&file, options)),
        Commands::Show { file, id } => cmd_show(lookup(&load(&file, options), &id)),
        Commands::Test {
            file,
            id,
            input,
            verbose,
        } => cmd_test(lookup(&load(&file, options), &id), &input, verbose),
        Commands::Find { file, id, input } => {
            cmd_find(lookup(&load(&file, options), &id).pattern(), &input)
        }
        Commands::Match { file, id, input } => {
            cmd_match(lookup(&load(&file, options), &id).pattern(), &input)
        }
    }
}

fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), error);
    std::process::exit(2);
}

fn load(file: &str, options: LoadOptions) -> ExpressionRegistry {
    ExpressionRegistry::load_with(&FileResource::new(file), options).unwrap_or_else(|e| fail(e))
}

fn lookup<'a>(registry: &'a ExpressionRegistry, id: &str) -> &'a Expression {
    registry.get_expression(id).unwrap_or_else(|e| fail(e))
}

fn cmd_list(registry: &ExpressionRegistry) {
    if registry.is_empty() {
        println!("{}", "No expressions defined".yellow());
        return;
    }

    println!(
        "{} {}",
        "Loaded".bold(),
        format!("{} expression(s)", registry.len()).green()
    );
    println!();
    for expression in registry {
        println!("  {}  {}", expression.id().cyan(), expression.as_str());
    }
}

fn cmd_show(expression: &Expression) {
    println!("{}", "Expression".bold());
    println!("  Id:    {}", expression.id().cyan());
    println!("  Regex: {}", expression.as_str().green());
    println!("  Flags: {}", expression.flags());
}

fn cmd_test(expression: &Expression, input: &str, verbose: bool) {
    println!("{}", "Testing expression...".bold());
    println!("  Id:      {}", expression.id().cyan());
    println!("  Pattern: {}", expression.as_str().cyan());
    println!("  Input:   {}", input.yellow());
    println!();

    let caps = match expression.pattern().captures(input) {
        Ok(caps) => caps,
        Err(e) => fail(e),
    };

    let Some(caps) = caps else {
        println!("{}", "✗ No match".red());
        return;
    };

    if let Some(m) = caps.get(0) {
        println!("{}", "✓ Match found!".green().bold());
        println!("  Position: {}..{}", m.start(), m.end());
        println!("  Match:    {}", m.as_str().green());
    }

    if verbose && caps.len() > 1 {
        println!();
        println!("{}", "Capture groups:".bold());
        for idx in 1..caps.len() {
            match caps.get(idx) {
                Some(group) => println!(
                    "  Group {}: {}..{} = {}",
                    idx,
                    group.start(),
                    group.end(),
                    group.as_str().green()
                ),
                None => println!("  Group {}: {}", idx, "unmatched".dimmed()),
            }
        }
    }
}

fn cmd_find(pattern: &Regex, input: &str) {
    let matches = match pattern.find_iter(input).collect::<Result<Vec<_>, _>>() {
        Ok(matches) => matches,
        Err(e) => fail(e),
    };

    if matches.is_empty() {
        println!("{}", "No matches found".red());
    } else {
        println!(
            "{} {}",
            "Found".bold(),
            format!("{} match(es)", matches.len()).green()
        );
        println!();

        for (i, m) in matches.iter().enumerate() {
            println!(
                "  [{}] {}..{} = {}",
                i + 1,
                m.start(),
                m.end(),
                m.as_str().green()
            );
        }
    }
}

fn cmd_match(pattern: &Regex, input: &str) {
    match pattern.is_match(input) {
        Ok(true) => {
            println!("{}", "true".green());
            std::process::exit(0);
        }
        Ok(false) => {
            println!("{}", "false".red());
            std::process::exit(1);
        }
        Err(e) => fail(e),
    }
}
