use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::extraction::classify::DEFAULT_NAME_TOKENS;
use crate::extraction::types::Source;

const DEFAULT_CSV: &str = "scholarships.csv";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

const BUILTIN_SOURCES: &[(&str, &str, &str)] = &[
    ("VIT-AP", "https://vitap.ac.in/fees-and-scholarships", "Andhra Pradesh"),
    ("Manipal", "https://www.manipal.edu/scholarships", "Karnataka"),
    ("VIT Vellore", "https://vit.ac.in/scholarship", "Tamil Nadu"),
    ("SRM IST", "https://www.srmist.edu.in/policies/scholarship-policy/", "Tamil Nadu"),
    ("SRM AP", "https://srmap.edu.in/financial-aid-and-scholarship/", "Andhra Pradesh"),
    ("Woxsen University", "https://woxsen.edu.in/admissions/scholarship/", "Telangana"),
    ("Malla Reddy University", "https://www.mallareddyuniversity.ac.in/merit-scholarship", "Telangana"),
    ("Jain University", "https://www.jainuniversity.ac.in/academics/scholarships-offered-in-india", "Karnataka"),
    ("Christ University", "https://christuniversity.in/scholarships", "Karnataka"),
];

/// Ordered scholarship pages plus the deployment's scholarship-name tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<Source>,
    #[serde(default = "default_name_tokens")]
    pub name_tokens: Vec<String>,
}

fn default_name_tokens() -> Vec<String> {
    DEFAULT_NAME_TOKENS.iter().map(|t| t.to_string()).collect()
}

impl Default for SourcesFile {
    fn default() -> Self {
        SourcesFile {
            sources: BUILTIN_SOURCES.iter().map(|(n, u, s)| Source::new(*n, *u, *s)).collect(),
            name_tokens: default_name_tokens(),
        }
    }
}

impl SourcesFile {
    pub fn parse(json: &str) -> Result<Self> {
        let file: SourcesFile = serde_json::from_str(json).context("parse sources JSON")?;
        file.validate()?;
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read sources from {:?}", path))?;
        Self::parse(&content).with_context(|| format!("load sources from {:?}", path))
    }

    /// `--sources` wins over `SCHOLAR_SOURCES`; with neither, the built-in list.
    pub fn resolve(cli_path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let path = cli_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("SCHOLAR_SOURCES").ok().map(PathBuf::from));
        match path {
            Some(p) => Ok((Self::load(&p)?, Some(p))),
            None => Ok((Self::default(), None)),
        }
    }

    fn validate(&self) -> Result<()> {
        for s in &self.sources {
            if s.name.trim().is_empty() { bail!("source with url {} has an empty name", s.url); }
            if Url::parse(&s.url).is_err() { bail!("source {} has an invalid url: {}", s.name, s.url); }
        }
        Ok(())
    }

    /// Sources whose name matches one of `only` (case-insensitive); all when `only` is empty.
    pub fn select(&self, only: &[String]) -> Vec<Source> {
        self.sources
            .iter()
            .filter(|s| only.is_empty() || only.iter().any(|o| o.eq_ignore_ascii_case(&s.name)))
            .cloned()
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(timeout) = std::env::var("SCHOLAR_HTTP_TIMEOUT_SECS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                cfg.timeout = Duration::from_secs(parsed);
            }
        }
        if let Ok(ua) = std::env::var("SCHOLAR_USER_AGENT") {
            if !ua.trim().is_empty() { cfg.user_agent = ua; }
        }
        cfg
    }
}

pub fn csv_path(cli: Option<PathBuf>) -> PathBuf {
    cli.or_else(|| std::env::var("SCHOLAR_CSV").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sources_are_valid_and_ordered() {
        let file = SourcesFile::default();
        file.validate().unwrap();
        assert_eq!(file.sources.len(), 9);
        assert_eq!(file.sources[0].name, "VIT-AP");
        assert_eq!(file.sources[8].state, "Karnataka");
        assert!(file.name_tokens.iter().any(|t| t == "Kalam"));
    }

    #[test]
    fn parse_defaults_name_tokens() {
        let file = SourcesFile::parse(
            r#"{"sources":[{"name":"Demo","url":"https://demo.edu/aid","state":"Goa"}]}"#,
        )
        .unwrap();
        assert_eq!(file.sources[0], Source::new("Demo", "https://demo.edu/aid", "Goa"));
        assert_eq!(file.name_tokens, default_name_tokens());
    }

    #[test]
    fn parse_rejects_bad_urls() {
        let err = SourcesFile::parse(r#"{"sources":[{"name":"Demo","url":"not a url","state":"Goa"}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid url"));
    }

    #[test]
    fn select_filters_by_name() {
        let file = SourcesFile::default();
        let picked = file.select(&["manipal".to_string(), "SRM AP".to_string()]);
        let names: Vec<&str> = picked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Manipal", "SRM AP"]);
        assert_eq!(file.select(&[]).len(), 9);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.json");
        fs::write(&path, r#"{"sources":[],"name_tokens":["Vidya"]}"#).unwrap();
        let file = SourcesFile::load(&path).unwrap();
        assert!(file.sources.is_empty());
        assert_eq!(file.name_tokens, ["Vidya"]);
    }
}
