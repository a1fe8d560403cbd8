use std::env;
use std::path::PathBuf;

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
pub struct CliOptions {
    /// Data file to open instead of the configured default.
    pub data_file: Option<PathBuf>,
    /// JSON file overriding plant constants.
    pub config: Option<PathBuf>,
    pub help: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.get(i).ok_or_else(|| {
                    "missing value for --config (expected a JSON file path)".to_string()
                })?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--help" | "-h" => opts.help = true,
            flag if flag.starts_with('-') => return Err(format!("unknown argument: {flag}")),
            path => {
                if opts.data_file.replace(PathBuf::from(path)).is_some() {
                    return Err("only one data file may be given".to_string());
                }
            }
        }
        i += 1;
    }

    Ok(opts)
}

pub fn usage() -> &'static str {
    "Usage: solar-dash [DATA_FILE] [--config FILE]\n\
     \n\
     DATA_FILE        plant data (.csv, .csv.zip or .parquet);\n\
     \x20                defaults to the config's data_path (Generation_data.csv.zip)\n\
     --config FILE    JSON file overriding plant constants\n\
     -h, --help       show this message\n\
     \n\
     Set RUST_LOG=info (or debug) for diagnostics."
}
