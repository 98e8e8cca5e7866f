//! Runtime configuration for the exporter

use anyhow::{Context, Result};
use reqwest::Url;
use std::net::{IpAddr, SocketAddr};
use tracing::warn;

use crate::constants;

/// Resolved settings the entry point needs to start serving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Dashboard base URLs, in configuration order
    pub node_urls: Vec<String>,
    /// Address the scrape server listens on
    pub listen: SocketAddr,
}

impl Config {
    /// Combine CLI values with environment discovery.
    ///
    /// URLs given on the command line replace the numbered environment
    /// variables entirely. An empty result is an error.
    pub fn resolve<F>(cli_urls: &[String], bind: IpAddr, port: u16, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let node_urls = if cli_urls.is_empty() {
            discover_node_urls(lookup)
        } else {
            cli_urls
                .iter()
                .map(|raw| parse_node_url(raw).with_context(|| format!("Invalid --node-url '{}'", raw)))
                .collect::<Result<Vec<_>>>()?
        };

        if node_urls.is_empty() {
            anyhow::bail!(
                "No Storj node URLs found.\n\n\
                 Set {prefix}1{suffix}, {prefix}2{suffix}, ... in the environment\n\
                 or pass --node-url one or more times.",
                prefix = constants::NODE_URL_PREFIX,
                suffix = constants::NODE_URL_SUFFIX,
            );
        }

        Ok(Self {
            node_urls,
            listen: SocketAddr::new(bind, port),
        })
    }
}

/// Name of the environment variable holding the `index`-th node URL
pub fn node_url_var(index: usize) -> String {
    format!("{}{}{}", constants::NODE_URL_PREFIX, index, constants::NODE_URL_SUFFIX)
}

/// Scan `STORJ_NODE_<n>_URL` from n = 1 until the first unset or empty value.
///
/// Values that do not parse as URLs are logged and skipped; the scan still
/// continues past them.
pub fn discover_node_urls<F>(lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut urls = Vec::new();

    for index in 1.. {
        let var = node_url_var(index);
        let Some(raw) = lookup(&var).filter(|v| !v.trim().is_empty()) else {
            break;
        };

        match parse_node_url(&raw) {
            Ok(url) => urls.push(url),
            Err(e) => warn!(variable = %var, value = %raw, error = %e, "Skipping invalid node URL"),
        }
    }

    urls
}

fn parse_node_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Failed to parse URL '{}'", raw))?;

    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("Unsupported scheme '{}' in '{}'", url.scheme(), raw);
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::net::Ipv4Addr;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_node_url_var() {
        assert_eq!(node_url_var(1), "STORJ_NODE_1_URL");
        assert_eq!(node_url_var(12), "STORJ_NODE_12_URL");
    }

    #[test]
    fn test_discover_in_order_until_gap() {
        let lookup = env(&[
            ("STORJ_NODE_1_URL", "http://10.0.0.1:14002"),
            ("STORJ_NODE_2_URL", "http://10.0.0.2:14002/"),
            ("STORJ_NODE_4_URL", "http://10.0.0.4:14002"),
        ]);

        assert_eq!(
            discover_node_urls(lookup),
            vec!["http://10.0.0.1:14002", "http://10.0.0.2:14002"]
        );
    }

    #[test]
    fn test_discover_skips_invalid() {
        let lookup = env(&[
            ("STORJ_NODE_1_URL", "not a url"),
            ("STORJ_NODE_2_URL", "ftp://10.0.0.2"),
            ("STORJ_NODE_3_URL", "http://node3:14002"),
        ]);

        assert_eq!(discover_node_urls(lookup), vec!["http://node3:14002"]);
    }

    #[test]
    fn test_discover_stops_at_empty_value() {
        let lookup = env(&[("STORJ_NODE_1_URL", ""), ("STORJ_NODE_2_URL", "http://node2:14002")]);
        assert!(discover_node_urls(lookup).is_empty());
    }

    #[test]
    fn test_resolve_requires_a_node() {
        let err = Config::resolve(&[], IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8000, env(&[])).unwrap_err();
        assert!(err.to_string().contains("No Storj node URLs found"));
    }

    #[test]
    fn test_resolve_prefers_cli_urls() {
        let lookup = env(&[("STORJ_NODE_1_URL", "http://from-env:14002")]);
        let config = Config::resolve(
            &["http://from-cli:14002".to_string()],
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            9651,
            lookup,
        )
        .unwrap();

        assert_eq!(config.node_urls, vec!["http://from-cli:14002"]);
        assert_eq!(config.listen.to_string(), "127.0.0.1:9651");
    }

    #[test]
    fn test_resolve_rejects_invalid_cli_url() {
        let err = Config::resolve(
            &["::nope".to_string()],
            IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            8000,
            env(&[]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid --node-url"));
    }
}
