use std::env;

use anyhow::{anyhow, Result};
use log::warn;

const DEFAULT_API_URL: &str = "https://api.cloudflare.com/client/v4";

/// One DNS record this process keeps pointed at the public IP.
/// Assembled once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RecordTarget {
    pub api_token: String,
    pub zone_id: String,
    pub record_name: String,
    pub proxied: bool,
    pub api_url: String,
}

#[derive(Debug)]
pub struct Config {
    pub targets: Vec<RecordTarget>,
}

impl Config {
    /// Read the record set from the environment. Records come either as one
    /// unnumbered group (`API_TOKEN`, `ZONE_ID`, `RECORD_NAME`, optional
    /// `PROXIED` and `API_URL`) or as a numbered sequence of those names
    /// suffixed 1, 2, 3, … which stops at the first incomplete index.
    /// Numbered records win when both forms are present.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let numbered = Self::numbered_targets(get);
        if !numbered.is_empty() {
            return Ok(Self { targets: numbered });
        }

        if let Some(target) = Self::target_with_suffix(get, "") {
            return Ok(Self {
                targets: vec![target],
            });
        }

        let missing: Vec<&str> = ["API_TOKEN", "ZONE_ID", "RECORD_NAME"]
            .into_iter()
            .filter(|name| get(name).is_none())
            .collect();

        Err(anyhow!(
            "missing required environment variables: {}",
            missing.join(", ")
        ))
    }

    fn numbered_targets(get: &dyn Fn(&str) -> Option<String>) -> Vec<RecordTarget> {
        let mut targets = Vec::new();
        for index in 1.. {
            match Self::target_with_suffix(get, &index.to_string()) {
                Some(target) => targets.push(target),
                None => break,
            }
        }
        targets
    }

    fn target_with_suffix(
        get: &dyn Fn(&str) -> Option<String>,
        suffix: &str,
    ) -> Option<RecordTarget> {
        let api_token = get(&format!("API_TOKEN{suffix}"))?;
        let zone_id = get(&format!("ZONE_ID{suffix}"))?;
        let record_name = get(&format!("RECORD_NAME{suffix}"))?;

        Some(RecordTarget {
            api_token,
            zone_id,
            record_name,
            proxied: parse_proxied(get(&format!("PROXIED{suffix}")).as_deref()),
            api_url: get(&format!("API_URL{suffix}"))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}

/// Cloudflare proxies records unless told otherwise, so anything that is not
/// a recognized boolean keeps the proxied default.
fn parse_proxied(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return true;
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => true,
        "0" | "false" | "no" | "n" | "off" => false,
        other => {
            warn!("unrecognized PROXIED value {other:?}, keeping the record proxied");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| map.get(name).map(|value| value.to_string())
    }

    #[test]
    fn unnumbered_record_is_read() {
        let get = lookup(&[
            ("API_TOKEN", "tok"),
            ("ZONE_ID", "zone"),
            ("RECORD_NAME", "home.example.com"),
        ]);

        let config = Config::from_lookup(&get).unwrap();
        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].api_token, "tok");
        assert_eq!(config.targets[0].zone_id, "zone");
        assert_eq!(config.targets[0].record_name, "home.example.com");
        assert!(config.targets[0].proxied);
        assert_eq!(config.targets[0].api_url, DEFAULT_API_URL);
    }

    #[test]
    fn numbered_records_stop_at_first_gap() {
        let get = lookup(&[
            ("API_TOKEN1", "tok1"),
            ("ZONE_ID1", "z1"),
            ("RECORD_NAME1", "a.example.com"),
            ("PROXIED1", "yes"),
            ("API_TOKEN2", "tok2"),
            ("ZONE_ID2", "z2"),
            ("RECORD_NAME2", "b.example.com"),
            ("PROXIED2", "off"),
            // index 3 is missing its zone, index 4 must not be reached
            ("API_TOKEN3", "tok3"),
            ("RECORD_NAME3", "c.example.com"),
            ("API_TOKEN4", "tok4"),
            ("ZONE_ID4", "z4"),
            ("RECORD_NAME4", "d.example.com"),
        ]);

        let config = Config::from_lookup(&get).unwrap();
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.targets[0].zone_id, "z1");
        assert!(config.targets[0].proxied);
        assert_eq!(config.targets[1].zone_id, "z2");
        assert!(!config.targets[1].proxied);
    }

    #[test]
    fn numbered_records_take_precedence_over_unnumbered() {
        let get = lookup(&[
            ("API_TOKEN", "tok"),
            ("ZONE_ID", "zone"),
            ("RECORD_NAME", "home.example.com"),
            ("API_TOKEN1", "tok1"),
            ("ZONE_ID1", "z1"),
            ("RECORD_NAME1", "a.example.com"),
        ]);

        let config = Config::from_lookup(&get).unwrap();
        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].record_name, "a.example.com");
    }

    #[test]
    fn missing_configuration_names_the_absent_variables() {
        let get = lookup(&[("API_TOKEN", "tok")]);

        let err = Config::from_lookup(&get).unwrap_err().to_string();
        assert!(err.contains("ZONE_ID"));
        assert!(err.contains("RECORD_NAME"));
        assert!(!err.contains("API_TOKEN"));
    }

    #[test]
    fn proxied_parsing_defaults_and_recognized_values() {
        assert!(parse_proxied(None));
        for truthy in ["1", "true", "YES", " y ", "On"] {
            assert!(parse_proxied(Some(truthy)), "{truthy} should be truthy");
        }
        for falsy in ["0", "false", "NO", "n", " off "] {
            assert!(!parse_proxied(Some(falsy)), "{falsy} should be falsy");
        }
        assert!(parse_proxied(Some("maybe")));
    }
}
