use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::{env, path::PathBuf};

/// Fallback archive name used in the `Content-Disposition` header.
pub const DEFAULT_ARCHIVE_FILENAME: &str = "files.zip";

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub bucket_name: String,
    pub bucket_prefix: String,
    pub archive_filename: String,
    pub endpoint_url: Option<String>,
}

/// Run a single invocation instead of serving HTTP.
#[derive(Debug, Clone)]
pub struct OneShot {
    pub output: PathBuf,
    pub min_date: Option<String>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Zips every object under a bucket prefix into one download")]
pub struct Args {
    /// Host to bind to (overrides ARCHIVER_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides ARCHIVER_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Bucket holding the objects to archive (overrides BUCKET_NAME)
    #[arg(long)]
    pub bucket_name: Option<String>,

    /// Key prefix selecting the objects to archive (overrides BUCKET_PREFIX)
    #[arg(long)]
    pub bucket_prefix: Option<String>,

    /// File name advertised in Content-Disposition (overrides ARCHIVE_FILENAME)
    #[arg(long)]
    pub archive_filename: Option<String>,

    /// Custom S3 endpoint, e.g. MinIO (overrides S3_ENDPOINT_URL)
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Build one archive, write it to this path and exit
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// `min_date` passed to the one-shot invocation
    #[arg(long, requires = "output")]
    pub min_date: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the optional
    /// one-shot request.
    pub fn from_env_and_args() -> Result<(Self, Option<OneShot>)> {
        let args = Args::parse();
        Self::from_sources(args, |name| env::var(name))
    }

    /// Merge parsed args with a variable lookup. CLI values win over
    /// environment values, which win over defaults.
    pub fn from_sources<F>(args: Args, lookup: F) -> Result<(Self, Option<OneShot>)>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let var = |name: &str| -> Result<Option<String>> {
            match lookup(name) {
                Ok(value) => Ok(Some(value)),
                Err(env::VarError::NotPresent) => Ok(None),
                Err(err) => Err(err).with_context(|| format!("reading {}", name)),
            }
        };

        // --- Environment fallback ---
        let env_host = var("ARCHIVER_HOST")?.unwrap_or_else(|| "0.0.0.0".into());
        let env_port = match var("ARCHIVER_PORT")? {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing ARCHIVER_PORT value `{}`", value))?,
            None => 3000,
        };
        let env_bucket = var("BUCKET_NAME")?;
        let env_prefix = var("BUCKET_PREFIX")?.unwrap_or_default();
        let env_filename =
            var("ARCHIVE_FILENAME")?.unwrap_or_else(|| DEFAULT_ARCHIVE_FILENAME.into());
        let env_endpoint = var("S3_ENDPOINT_URL")?;

        // --- Merge ---
        let bucket_name = args
            .bucket_name
            .or(env_bucket)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| anyhow!("bucket name is required (set BUCKET_NAME or --bucket-name)"))?;

        let archive_filename = args.archive_filename.unwrap_or(env_filename);
        ensure_header_safe_filename(&archive_filename)?;

        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            bucket_name,
            bucket_prefix: args.bucket_prefix.unwrap_or(env_prefix),
            archive_filename,
            endpoint_url: args.endpoint_url.or(env_endpoint),
        };

        let one_shot = args.output.map(|output| OneShot {
            output,
            min_date: args.min_date,
        });

        Ok((cfg, one_shot))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The name is emitted unquoted in `Content-Disposition`, so it must be a
/// single printable ASCII token without quotes, separators or escapes.
fn ensure_header_safe_filename(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("archive filename must not be empty");
    }
    if let Some(bad) = name
        .chars()
        .find(|&c| !c.is_ascii_graphic() || matches!(c, '"' | ';' | '\\' | ','))
    {
        bail!("archive filename `{}` contains unsupported character {:?}", name, bad);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Result<String, env::VarError> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned().ok_or(env::VarError::NotPresent)
    }

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("bucket-archiver").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn env_values_fill_defaults() {
        let (cfg, one_shot) = AppConfig::from_sources(
            args(&[]),
            lookup_from(&[("BUCKET_NAME", "tapiwam-data-src"), ("BUCKET_PREFIX", "test")]),
        )
        .unwrap();

        assert_eq!(cfg.bucket_name, "tapiwam-data-src");
        assert_eq!(cfg.bucket_prefix, "test");
        assert_eq!(cfg.archive_filename, DEFAULT_ARCHIVE_FILENAME);
        assert_eq!(cfg.addr(), "0.0.0.0:3000");
        assert!(cfg.endpoint_url.is_none());
        assert!(one_shot.is_none());
    }

    #[test]
    fn cli_overrides_env() {
        let (cfg, _) = AppConfig::from_sources(
            args(&["--bucket-name", "from-cli", "--port", "8080"]),
            lookup_from(&[("BUCKET_NAME", "from-env"), ("ARCHIVER_PORT", "9000")]),
        )
        .unwrap();

        assert_eq!(cfg.bucket_name, "from-cli");
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn missing_bucket_is_an_error() {
        let err = AppConfig::from_sources(args(&[]), lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("BUCKET_NAME"));
    }

    #[test]
    fn bad_port_is_an_error() {
        let result = AppConfig::from_sources(
            args(&[]),
            lookup_from(&[("BUCKET_NAME", "b"), ("ARCHIVER_PORT", "not-a-port")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn output_flag_enables_one_shot() {
        let (_, one_shot) = AppConfig::from_sources(
            args(&["--output", "out.zip", "--min-date", "2024-01-01"]),
            lookup_from(&[("BUCKET_NAME", "b")]),
        )
        .unwrap();

        let one_shot = one_shot.unwrap();
        assert_eq!(one_shot.output, PathBuf::from("out.zip"));
        assert_eq!(one_shot.min_date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn archive_filename_is_configurable() {
        let (cfg, _) = AppConfig::from_sources(
            args(&["--archive-filename", "export-2024.zip"]),
            lookup_from(&[("BUCKET_NAME", "b")]),
        )
        .unwrap();
        assert_eq!(cfg.archive_filename, "export-2024.zip");
    }

    #[test]
    fn unsafe_archive_filenames_are_rejected() {
        for name in ["", "a\"b.zip", "a;b.zip", "my files.zip", "tab\t.zip", "nl\n.zip", "caf\u{e9}.zip"] {
            let result = AppConfig::from_sources(
                args(&[]),
                lookup_from(&[("BUCKET_NAME", "b"), ("ARCHIVE_FILENAME", name)]),
            );
            assert!(result.is_err(), "{:?} should be rejected", name);
        }
    }
}
