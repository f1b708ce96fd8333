//! # Client configuration
//!
//! The daemon address comes from `--host`, then the `CTRCTL_HOST`
//! environment variable, then TOML fragments such as
//! `/etc/ctrctl/client.d/10-host.toml`, and finally a built-in default.

use anyhow::{Context, Result};
use fn_error_context::context;
use serde::Deserialize;
use url::Url;

/// Environment variable naming the daemon address.
pub const HOST_ENV: &str = "CTRCTL_HOST";
/// Used when nothing else names a daemon.
pub const DEFAULT_HOST: &str = "http://127.0.0.1:2375";
const DEFAULT_USER_AGENT: &str = concat!("ctrctl/", env!("CARGO_PKG_VERSION"));

/// The toplevel config entry for client configs stored
/// in ctrctl/client.d (e.g. /etc/ctrctl/client.d/05-custom.toml)
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct ClientConfigurationToplevel {
    pub(crate) client: Option<ClientConfiguration>,
}

/// The serialized [client] section
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename = "client", rename_all = "kebab-case")]
pub struct ClientConfiguration {
    /// Daemon address
    pub host: Option<String>,
    /// Sent with every request
    pub user_agent: Option<String>,
}

impl ClientConfiguration {
    /// Apply any values in other, overriding any existing values in `self`.
    fn merge(&mut self, other: Self) {
        fn mergeopt<T>(s: &mut Option<T>, o: Option<T>) {
            if let Some(o) = o {
                *s = Some(o);
            }
        }
        mergeopt(&mut self.host, other.host);
        mergeopt(&mut self.user_agent, other.user_agent);
    }

    /// The user agent to send.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

fn parse_fragment(buf: &str, name: &str) -> Result<Option<ClientConfiguration>> {
    let mut unused = std::collections::BTreeSet::new();
    let de = toml::Deserializer::new(buf);
    let c: ClientConfigurationToplevel = serde_ignored::deserialize(de, |path| {
        unused.insert(path.to_string());
    })
    .with_context(|| format!("Parsing {name}"))?;
    for key in unused {
        tracing::warn!("{name}: Unknown key {key}");
    }
    Ok(c.client)
}

/// Load the client configuration, merging all found configuration files.
/// Having none at all is fine.
#[context("Loading configuration")]
pub(crate) fn load_config() -> Result<ClientConfiguration> {
    const SYSTEMD_CONVENTIONAL_BASES: &[&str] = &["/usr/lib", "/usr/local/lib", "/etc", "/run"];
    let fragments = liboverdrop::scan(
        SYSTEMD_CONVENTIONAL_BASES,
        "ctrctl/client.d",
        &["toml"],
        true,
    );
    let mut config = ClientConfiguration::default();
    for (_name, path) in fragments {
        let buf = std::fs::read_to_string(&path)
            .with_context(|| format!("Reading {path:?}"))?;
        if let Some(c) = parse_fragment(&buf, &path.to_string_lossy())? {
            tracing::debug!("Merging client config: {c:?}");
            config.merge(c);
        }
    }
    Ok(config)
}

/// Pick the daemon address and turn it into a base URL for API paths.
///
/// `tcp://` addresses are spoken to over plain HTTP.
pub(crate) fn resolve_host(
    flag: Option<&str>,
    env: Option<&str>,
    config: &ClientConfiguration,
) -> Result<Url> {
    let host = flag
        .or(env.filter(|v| !v.is_empty()))
        .or(config.host.as_deref())
        .unwrap_or(DEFAULT_HOST);
    let normalized = match host.strip_prefix("tcp://") {
        Some(rest) => format!("http://{rest}"),
        None => host.to_string(),
    };
    let mut url =
        Url::parse(&normalized).with_context(|| format!("Invalid daemon address {host:?}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("Unsupported daemon address {host:?}; expected tcp, http or https");
    }
    // API paths are joined onto this, so it must look like a directory
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
