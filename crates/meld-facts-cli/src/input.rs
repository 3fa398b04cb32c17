//! Reading dumps from files or stdin.

use anyhow::{Context, Result};
use meld_facts::{parse_text, Database, NameFilter};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Where a dump comes from. `-` and an omitted path both mean stdin.
pub struct Source {
    path: Option<PathBuf>,
}

impl Source {
    pub fn new(path: Option<PathBuf>) -> Self {
        let path = path.filter(|p| p != Path::new("-"));
        Self { path }
    }

    pub fn label(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => "<stdin>".to_string(),
        }
    }

    pub fn read(&self) -> Result<String> {
        match &self.path {
            Some(p) => fs::read_to_string(p).with_context(|| format!("failed to read `{}`", p.display())),
            None => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read stdin")?;
                Ok(text)
            }
        }
    }

    pub fn load(&self, filter: Option<&NameFilter>) -> Result<Database> {
        let text = self.read()?;
        let db = parse_text(&text, filter).with_context(|| format!("failed to parse {}", self.label()))?;
        tracing::info!(
            source = %self.label(),
            nodes = db.len(),
            facts = db.fact_count(),
            "loaded database"
        );
        Ok(db)
    }
}

/// `--only` values as a filter; no values means keep everything.
pub fn name_filter(only: &[String]) -> Option<NameFilter> {
    (!only.is_empty()).then(|| only.iter().cloned().collect())
}
