use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use hostlist_config::{load_default, load_from_path, HostlistConfig, OutputFormat};
use hostlist_core::{
    canonicalize_brackets, compress, read_file_into_string, readable_memory, Expander,
    HostlistError,
};

/// hostlist - expand and compress cluster host lists
///
/// Configuration discovery rules:
/// 1. If `--config PATH` (or `-c PATH`) is provided, that path is used.
/// 2. Otherwise, `hostlist_config::load_default()` is used, which probes:
///    - `/etc/hostlist/hostlist.toml`
///    - `./hostlist.toml`
/// 3. If neither exists, built-in defaults are used.
#[derive(Debug, Parser)]
#[command(
    name = "hostlist",
    version,
    about = "Expand and compress hostlist notation",
    long_about = "hostlist converts between compact host list notation such as cn[001-004,010] and explicit host names.",
    disable_help_subcommand = true
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long = "config", short = 'c', value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log level (overrides the config file and RUST_LOG).
    ///
    /// Accepts standard tracing levels (trace, debug, info, warn, error) or a
    /// full filter expression (e.g. "warn,hostlist_core=debug").
    #[arg(long = "log-level", short = 'L', value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Output format (overrides `output.format` from the config file).
    #[arg(long = "format", value_enum, global = true)]
    format: Option<FormatArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Expand host list notation into explicit host names.
    ///
    /// Arguments are joined with commas. Without arguments or `--file`, the
    /// host list is read from stdin.
    Expand {
        /// Host lists such as `cn[01-04],login01`.
        hostlists: Vec<String>,

        /// Read host lists from a file, one or more per line.
        #[arg(long = "file", short = 'f', value_name = "PATH")]
        file: Option<PathBuf>,

        /// Maximum number of hosts to produce (overrides `expand.max_hosts`).
        #[arg(long = "max-hosts", value_name = "N")]
        max_hosts: Option<usize>,
    },

    /// Compress explicit host names into host list notation.
    ///
    /// Without arguments or `--file`, host names are read from stdin,
    /// separated by whitespace or commas.
    Compress {
        /// Host names such as `cn01 cn02 cn03`.
        hosts: Vec<String>,

        /// Read host names from a file.
        #[arg(long = "file", short = 'f', value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Remove brackets around single values, e.g. `cn[5]` -> `cn5`.
    Canonicalize {
        /// Text to canonicalize.
        input: String,
    },

    /// Format a byte count in human units (B, K, M, G).
    Size {
        /// Number of bytes.
        bytes: u64,
    },

    /// Validate configuration, print a summary and exit.
    CheckConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Lines,
    Comma,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Lines => OutputFormat::Lines,
            FormatArg::Comma => OutputFormat::Comma,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // The log level may come from the config file, so the config is loaded
    // before telemetry exists and load errors go straight to stderr.
    let (config, source) = match load_config(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("hostlist: {}", err);
            process::exit(1);
        }
    };

    let level = cli.log_level.as_deref().or(config.logging.level.as_deref());
    if let Err(err) = hostlist_telemetry::init(level) {
        eprintln!("hostlist: failed to initialise telemetry: {}", err);
        process::exit(1);
    }

    tracing::debug!("using configuration from {}", source);

    if let Err(err) = config.validate() {
        tracing::error!("configuration validation failed: {}", err);
        process::exit(1);
    }

    if let Err(err) = run(&cli, &config, &source) {
        tracing::error!("{:#}", err);
        process::exit(1);
    }
}

/// Load the configuration and describe where it came from.
fn load_config(path: Option<&Path>) -> Result<(HostlistConfig, String), HostlistError> {
    if let Some(path) = path {
        return load_from_path(path).map(|cfg| (cfg, path.display().to_string()));
    }

    match load_default() {
        Ok(cfg) => Ok((cfg, "default locations".to_string())),
        Err(HostlistError::ConfigNotFound(_)) => {
            Ok((HostlistConfig::default(), "built-in defaults".to_string()))
        }
        Err(err) => Err(err),
    }
}

fn run(cli: &Cli, config: &HostlistConfig, source: &str) -> anyhow::Result<()> {
    let format = cli
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.output.format);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Expand {
            hostlists,
            file,
            max_hosts,
        } => {
            let expander = match max_hosts {
                Some(0) => bail!("--max-hosts must be greater than zero"),
                Some(n) => Expander::new(*n),
                None => config.expander(),
            };
            let raw = match gather_input(hostlists, file.as_deref())? {
                Some(raw) => raw,
                None => read_stdin()?,
            };
            let raw = join_host_lists(&raw);

            tracing::info!("expanding host list ({} bytes)", raw.len());
            let hosts = expander
                .expand(&raw)
                .with_context(|| format!("failed to expand '{}'", raw))?;
            tracing::info!("expanded to {} hosts", hosts.len());

            write_hosts(&mut out, &hosts, format)?;
        }
        Command::Compress { hosts, file } => {
            let hosts = match gather_input(hosts, file.as_deref())? {
                Some(raw) => split_host_names(&raw),
                None => split_host_names(&read_stdin()?),
            };

            tracing::info!("compressing {} hosts", hosts.len());
            let compressed = compress(&hosts);

            write_hosts(&mut out, &compressed, format)?;
        }
        Command::Canonicalize { input } => {
            writeln!(out, "{}", canonicalize_brackets(input))?;
        }
        Command::Size { bytes } => {
            writeln!(out, "{}", readable_memory(*bytes))?;
        }
        Command::CheckConfig => {
            tracing::info!("configuration is valid");
            print_config_summary(&mut out, config, source, format)?;
        }
    }

    Ok(())
}

/// Collect input from positional arguments or a file.
///
/// Returns `None` when neither was given, meaning stdin should be read.
fn gather_input(args: &[String], file: Option<&Path>) -> anyhow::Result<Option<String>> {
    if !args.is_empty() && file.is_some() {
        bail!("pass either positional arguments or --file, not both");
    }

    if let Some(path) = file {
        tracing::debug!("reading input from {}", path.display());
        return Ok(Some(read_file_into_string(path)?));
    }

    if args.is_empty() {
        Ok(None)
    } else {
        Ok(Some(args.join("\n")))
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

/// Join host lists given one per line into a single comma separated list,
/// skipping blank lines and `#` comments.
fn join_host_lists(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split explicit host names separated by whitespace or commas.
fn split_host_names(raw: &str) -> Vec<String> {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect()
}

fn write_hosts<W: Write>(out: &mut W, hosts: &[String], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Lines => {
            for host in hosts {
                writeln!(out, "{}", host)?;
            }
        }
        OutputFormat::Comma => writeln!(out, "{}", hosts.join(","))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(hosts)?)?,
    }
    Ok(())
}

/// Print a concise summary of the loaded configuration.
fn print_config_summary<W: Write>(
    out: &mut W,
    cfg: &HostlistConfig,
    source: &str,
    format: OutputFormat,
) -> io::Result<()> {
    writeln!(out, "hostlist configuration summary:")?;
    writeln!(out, "  source           = {}", source)?;
    writeln!(out, "  expand.max_hosts = {}", cfg.expand.max_hosts)?;
    writeln!(out, "  output.format    = {}", format)?;
    writeln!(
        out,
        "  logging.level    = {}",
        cfg.logging.level.as_deref().unwrap_or("<not set>")
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn render(hosts: &[&str], format: OutputFormat) -> String {
        let hosts: Vec<String> = hosts.iter().map(|h| h.to_string()).collect();
        let mut buf = Vec::new();
        write_hosts(&mut buf, &hosts, format).expect("write hosts");
        String::from_utf8(buf).expect("utf-8 output")
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_expand_with_global_flags() {
        let cli = Cli::try_parse_from([
            "hostlist",
            "expand",
            "cn[1-2]",
            "--format",
            "json",
            "--max-hosts",
            "10",
        ])
        .expect("parse args");

        assert_eq!(cli.format, Some(FormatArg::Json));
        match cli.command {
            Command::Expand {
                hostlists,
                max_hosts,
                ..
            } => {
                assert_eq!(hostlists, vec!["cn[1-2]"]);
                assert_eq!(max_hosts, Some(10));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn join_skips_blank_lines_and_comments() {
        let raw = "# compute\ncn[01-02]\n\n  gpu1 \n";
        assert_eq!(join_host_lists(raw), "cn[01-02],gpu1");
    }

    #[test]
    fn split_host_names_on_whitespace_and_commas() {
        let raw = "cn01 cn02,cn03\n# comment\n\tlogin\n";
        assert_eq!(
            split_host_names(raw),
            vec!["cn01", "cn02", "cn03", "login"]
        );
    }

    #[test]
    fn gather_prefers_arguments() {
        let args = vec!["cn1".to_string(), "cn2".to_string()];
        assert_eq!(
            gather_input(&args, None).unwrap().as_deref(),
            Some("cn1\ncn2")
        );
        assert!(gather_input(&[], None).unwrap().is_none());
    }

    #[test]
    fn gather_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "cn[1-3]").expect("write hosts");

        let raw = gather_input(&[], Some(file.path())).unwrap();
        assert_eq!(raw.as_deref(), Some("cn[1-3]\n"));
    }

    #[test]
    fn gather_rejects_arguments_and_file_together() {
        let args = vec!["cn1".to_string()];
        assert!(gather_input(&args, Some(Path::new("hosts.txt"))).is_err());
    }

    #[test]
    fn write_hosts_formats() {
        assert_eq!(render(&["cn1", "cn2"], OutputFormat::Lines), "cn1\ncn2\n");
        assert_eq!(render(&["cn1", "cn2"], OutputFormat::Comma), "cn1,cn2\n");
        assert_eq!(
            render(&["cn[1-2]"], OutputFormat::Json),
            "[\"cn[1-2]\"]\n"
        );
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        assert!(load_config(Some(Path::new("/this/definitely/does/not/exist.toml"))).is_err());
    }

    #[test]
    fn config_summary_mentions_source() {
        let mut buf = Vec::new();
        print_config_summary(
            &mut buf,
            &HostlistConfig::default(),
            "built-in defaults",
            OutputFormat::Lines,
        )
        .expect("write summary");

        let summary = String::from_utf8(buf).expect("utf-8 output");
        assert!(summary.contains("source           = built-in defaults"));
        assert!(summary.contains("output.format    = lines"));
    }
}
