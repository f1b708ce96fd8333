//! # Container content transfer CLI
//!
//! Command line tool to export container filesystems and import tarballs
//! through a container daemon.

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::ffi::OsString;
use std::io::Write;

use crate::console::Console;
use crate::error::Error;
use crate::request::Destination;
use crate::transport::HttpTransport;

/// Printed when the deprecated `SOURCE REPOSITORY TAG` form is used.
const LEGACY_IMPORT_DEPRECATION: &str = "[DEPRECATED] The format 'file|URL|- [REPOSITORY [TAG]]' has been deprecated. Please use file|URL|- [REPOSITORY[:TAG]]";

/// Export a container's filesystem as a tar archive
#[derive(Debug, Parser)]
pub(crate) struct ExportOpts {
    /// Write to a file, instead of STDOUT
    #[clap(long, short = 'o')]
    pub(crate) output: Option<Utf8PathBuf>,

    /// Archive the diff of a container into a tarball
    #[clap(long)]
    pub(crate) diff: bool,

    /// Archive the metadata of a container into a tarball
    #[clap(long)]
    pub(crate) metadata: bool,

    /// The container to export
    pub(crate) container: String,
}

/// Import the contents from a tarball to create a filesystem image
#[derive(Debug, Parser)]
pub(crate) struct ImportOpts {
    /// Apply Dockerfile instruction to the created image
    #[clap(long = "change", short = 'c', value_name = "CHANGE")]
    pub(crate) changes: Vec<String>,

    /// Set commit message for imported image
    #[clap(long, short = 'm')]
    pub(crate) message: Option<String>,

    /// Import the diff of a container from a tarball
    #[clap(long, value_name = "CONTAINER", default_value = "")]
    pub(crate) diff: String,

    /// Import the metadata of a container from a tarball
    #[clap(long)]
    pub(crate) metadata: bool,

    /// A tarball path, a http(s) URL for the daemon to fetch, or `-` for stdin
    #[clap(value_name = "file|URL|-")]
    pub(crate) source: String,

    /// The destination image; the legacy `REPOSITORY TAG` form is deprecated
    #[clap(value_name = "REPOSITORY[:TAG]", num_args = 0..=2)]
    pub(crate) repository: Vec<String>,
}

impl ImportOpts {
    /// The destination image, warning about the deprecated three-argument
    /// form. A tag given that way is kept apart from the repository.
    pub(crate) fn destination(
        &self,
        stderr: &mut dyn Write,
    ) -> crate::error::Result<Option<Destination>> {
        match self.repository.as_slice() {
            [] => Ok(None),
            [repo] if repo.is_empty() => Ok(None),
            [repo] => Ok(Some(repo.as_str().into())),
            [repo, tag] => {
                // Nothing more we can do if stderr is gone
                let _ = writeln!(stderr, "{LEGACY_IMPORT_DEPRECATION}");
                Ok(Some(Destination {
                    repository: repo.clone(),
                    tag: Some(tag.clone()),
                }))
            }
            _ => Err(Error::invalid_arguments(
                "import accepts at most 3 arguments: file|URL|- [REPOSITORY[:TAG]]",
            )),
        }
    }
}

/// Options for man page generation
#[cfg(feature = "docgen")]
#[derive(Debug, Parser)]
pub(crate) struct ManOpts {
    #[clap(long)]
    /// Output to this directory
    pub(crate) directory: Utf8PathBuf,
}

/// Move container content in and out of a container daemon as tar streams.
#[derive(Debug, Parser)]
#[clap(name = "ctrctl")]
#[clap(rename_all = "kebab-case")]
pub(crate) struct Cli {
    /// Daemon address, e.g. `tcp://127.0.0.1:2375`; overrides `CTRCTL_HOST`
    #[clap(long, short = 'H', global = true)]
    pub(crate) host: Option<String>,

    #[clap(subcommand)]
    pub(crate) opt: Opt,
}

/// The subcommands.
#[derive(Debug, clap::Subcommand)]
pub(crate) enum Opt {
    /// Export a container's filesystem as a tar archive.
    ///
    /// The tar archive is streamed to STDOUT by default or written to a file.
    /// With `--diff` or `--metadata` only the changeset or the configuration
    /// of the container is archived.
    Export(ExportOpts),
    /// Import the contents from a tarball to create a filesystem image.
    ///
    /// The source is a path to a local tarball, a http(s) URL that the daemon
    /// downloads itself, or `-` to read from STDIN. With `--diff` or
    /// `--metadata` the tarball is applied to an existing container instead.
    Import(ImportOpts),
    #[clap(hide(true))]
    #[cfg(feature = "docgen")]
    Man(ManOpts),
}

fn daemon_transport(host: Option<&str>) -> Result<HttpTransport> {
    let config = crate::config::load_config()?;
    let env = std::env::var(crate::config::HOST_ENV).ok();
    let base = crate::config::resolve_host(host, env.as_deref(), &config)?;
    tracing::debug!("Using daemon at {base}");
    Ok(HttpTransport::new(base, config.user_agent())?)
}

/// Parse the provided arguments and execute.
/// Calls [`clap::Error::exit`] on failure, printing the error message and aborting the program.
pub fn run_from_iter<I>(args: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
{
    run_from_opt(Cli::parse_from(args))
}

/// Internal (non-generic/monomorphized) primary CLI entrypoint
fn run_from_opt(cli: Cli) -> Result<()> {
    let host = cli.host.as_deref();
    match cli.opt {
        // Arguments are fully validated before the daemon address is resolved
        Opt::Export(opts) => {
            let export = crate::export::Export::prepare(&opts)?;
            let transport = daemon_transport(host)?;
            export.run(&transport, &mut Console::from_process())?;
        }
        Opt::Import(opts) => {
            let mut console = Console::from_process();
            let import = crate::import::Import::prepare(&opts, &mut console.stderr)?;
            let transport = daemon_transport(host)?;
            import.run(&transport, &mut console)?;
        }
        #[cfg(feature = "docgen")]
        Opt::Man(manopts) => {
            crate::docgen::generate_manpages(&manopts.directory)?;
        }
    }
    Ok(())
}
