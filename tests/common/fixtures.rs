//! Catalog and store fixtures.

use std::path::PathBuf;
use std::sync::Arc;

use researchmatch::catalog::{Catalog, Record};
use researchmatch::metrics::MetricsStore;
use tempfile::TempDir;

/// Raw catalog in the scraper's shapes: mapped and flat research areas, nested and flat
/// statistics, string counts with thousands separators, and one profile with no areas.
pub const CATALOG_JSON: &str = r#"[
  {
    "name": "Ada Lovelace",
    "title": "Professor",
    "research_areas": {
      "scholar": ["Machine Learning", "Natural Language Processing"],
      "site": ["Deep Learning"]
    },
    "statistics": {"all": {"citations": "12,400", "h-index": 48, "i10-index": 120}}
  },
  {
    "name": "Alan Turing",
    "research_areas": ["Theory of Computation", "Cryptography"],
    "statistics": {"citations": 9000, "h-index": 30, "i10-index": 60}
  },
  {
    "name": "Grace Hopper",
    "research_areas": ["Compilers", "Programming Languages"],
    "statistics": {"all": {"citations": "3,100", "h-index": 22, "i10-index": 41}}
  },
  {
    "name": "Barbara Liskov",
    "research_areas": ["Distributed Systems", "Programming Languages"],
    "statistics": {"all": {"citations": "15,000", "h-index": 55, "i10-index": 140}}
  },
  {
    "name": "Geoffrey Hinton",
    "research_areas": ["Deep Learning", "Neural Networks", "Machine Learning"],
    "statistics": {"all": {"citations": "500,000", "h-index": 180, "i10-index": 400}}
  },
  {
    "name": "Radia Perlman",
    "research_areas": ["Computer Networks", "Network Security"],
    "statistics": {"all": {"citations": "8,000", "h-index": 35, "i10-index": 70}}
  },
  {
    "name": "Whitfield Diffie",
    "research_areas": ["Cryptography", "Network Security"],
    "statistics": {"all": {"citations": "25,000", "h-index": 40, "i10-index": 80}}
  },
  {
    "name": "Empty Profile",
    "research_areas": []
  }
]"#;

pub const CATALOG_LEN: usize = 8;

/// A temp workspace holding a catalog file and a metrics path.
pub struct Workspace {
    pub dir: TempDir,
    pub catalog_path: PathBuf,
    pub metrics_path: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let catalog_path = dir.path().join("results.json");
        std::fs::write(&catalog_path, CATALOG_JSON).expect("write catalog");
        let metrics_path = dir.path().join("dashboard").join("matching_metrics.json");
        Self {
            dir,
            catalog_path,
            metrics_path,
        }
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::new(Catalog::load(&self.catalog_path).expect("load catalog"))
    }

    pub fn store(&self) -> Arc<MetricsStore> {
        Arc::new(MetricsStore::open(&self.metrics_path))
    }
}

pub fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_json_str(CATALOG_JSON).expect("valid catalog"))
}

pub fn names(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}
