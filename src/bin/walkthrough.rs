use colored::Colorize;
use std::env;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use pointer_strides::report::{render_json, render_text};
use pointer_strides::{Walkthrough, WalkthroughConfig};

const USAGE: &str = "Usage: walkthrough [CONFIG.toml] [--json]";

#[derive(Debug, Default, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    json: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    for arg in args {
        match arg.as_str() {
            "--json" => options.json = true,
            "--help" | "-h" => options.help = true,
            flag if flag.starts_with('-') => return Err(format!("unknown option '{flag}'")),
            path if options.config.is_none() => options.config = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument '{extra}'")),
        }
    }
    Ok(options)
}

fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &options.config {
        Some(path) => WalkthroughConfig::from_file(path)?,
        None => WalkthroughConfig::default(),
    };

    let trace = Walkthrough::run(&config)?;
    if options.json {
        println!("{}", render_json(&trace)?);
    } else {
        print!("{}", render_text(&trace));
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{} {}", "error:".red().bold(), message);
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };
    if options.help {
        println!("{USAGE}");
        return;
    }

    if let Err(err) = run(&options) {
        eprintln!("{} {}", "error:".red().bold(), err);
        process::exit(1);
    }
}
