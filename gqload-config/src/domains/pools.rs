//! Static id pools that scenario steps sample request arguments from

use crate::domains::utils::{read_string_entries, resolve_relative};
use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolsConfig {
    /// Collection ids for `seriesProducts`
    #[serde(default)]
    pub collection_ids: Vec<String>,

    /// JSON file with collection ids, `[{"id": 1}]` or `[1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections_file: Option<PathBuf>,

    /// Product ids for the product detail page
    #[serde(default)]
    pub product_ids: Vec<String>,

    /// JSON file with product ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_ids_file: Option<PathBuf>,
}

impl PoolsConfig {
    /// Append the contents of the pool files to the inline pools.
    pub fn load_files(&mut self, base_dir: Option<&Path>) -> ConfigResult<()> {
        if let Some(ref file) = self.collections_file {
            let path = resolve_relative(file, base_dir);
            self.collection_ids.extend(read_string_entries(&path, "id")?);
        }

        if let Some(ref file) = self.product_ids_file {
            let path = resolve_relative(file, base_dir);
            self.product_ids.extend(read_string_entries(&path, "id")?);
        }

        Ok(())
    }
}

impl Validatable for PoolsConfig {
    fn validate(&self) -> ConfigResult<()> {
        for id in self.collection_ids.iter().chain(self.product_ids.iter()) {
            validate_required_string(id, "id", self.domain_name())?;
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "pools"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_pool_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut collections = std::fs::File::create(dir.path().join("collections.json")).unwrap();
        write!(collections, r#"[{{"id": 3}}, {{"id": 7}}]"#).unwrap();
        let mut products = std::fs::File::create(dir.path().join("products.json")).unwrap();
        write!(products, r#"["4581", 4608]"#).unwrap();

        let mut config = PoolsConfig {
            collections_file: Some(PathBuf::from("collections.json")),
            product_ids_file: Some(dir.path().join("products.json")),
            ..Default::default()
        };
        config.load_files(Some(dir.path())).unwrap();

        assert_eq!(config.collection_ids, vec!["3", "7"]);
        assert_eq!(config.product_ids, vec!["4581", "4608"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_pool_file_is_an_error() {
        let mut config = PoolsConfig {
            collections_file: Some(PathBuf::from("/nonexistent/collections.json")),
            ..Default::default()
        };
        assert!(config.load_files(None).is_err());
    }
}
