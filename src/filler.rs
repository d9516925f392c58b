//! Generic activity descriptions used to pad days that lack assigned work.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Es,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    /// Built-in catalog for this locale.
    pub fn default_catalog(&self) -> FillerCatalog {
        let entries: &[&str] = match self {
            Locale::En => &[
                "General review and maintenance of systems",
                "Technical documentation update",
                "Code review and quality assurance",
                "Planning and follow-up meeting",
                "Research and analysis of technical improvements",
                "Support and incident monitoring",
            ],
            Locale::Es => &[
                "Revisión general y mantenimiento de sistemas",
                "Actualización de documentación técnica",
                "Revisión de código y aseguramiento de calidad",
                "Reunión de planeación y seguimiento",
                "Investigación y análisis de mejoras técnicas",
                "Soporte y monitoreo de incidentes",
            ],
        };
        FillerCatalog::new(entries.iter().copied())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            other => Err(format!("unknown locale '{other}' (expected en|es)")),
        }
    }
}

/// Ordered list of filler descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FillerCatalog {
    entries: Vec<String>,
}

impl FillerCatalog {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> FillerCursor<'_> {
        FillerCursor {
            catalog: self,
            index: 0,
        }
    }
}

/// Walks a catalog from the start, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct FillerCursor<'a> {
    catalog: &'a FillerCatalog,
    index: usize,
}

impl<'a> Iterator for FillerCursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.catalog.is_empty() {
            return None;
        }
        let entry = &self.catalog.entries[self.index % self.catalog.len()];
        self.index += 1;
        Some(entry.as_str())
    }
}
