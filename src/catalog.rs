//! The fixed membership package catalog.
//!
//! Packages are defined once and looked up by name. The catalog is
//! effectively a configuration table; the standard gym catalog is built by
//! [`PackageCatalog::standard`], and custom catalogs can be constructed for
//! testing or alternative deployments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A membership package: a duration in calendar months at a fixed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Unique package name, the lookup key.
    pub name: String,
    /// Subscription duration in calendar months.
    pub duration_months: u32,
    /// Price in the reference currency (Rs).
    pub price: Decimal,
}

/// Immutable package catalog, looked up by name.
///
/// Lookups are case-sensitive: package names are canonical identifiers, not
/// free text.
///
/// # Examples
///
/// ```
/// use gymstrive_core::catalog::PackageCatalog;
///
/// let catalog = PackageCatalog::standard();
/// let gold = catalog.lookup("Gold").unwrap();
/// assert_eq!(gold.duration_months, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageCatalog {
    packages: Vec<Package>,
}

impl PackageCatalog {
    /// Builds the standard gym catalog.
    ///
    /// | Package | Duration  | Price (Rs) |
    /// |---------|-----------|------------|
    /// | Silver  | 1 month   | 2000       |
    /// | Gold    | 3 months  | 5000       |
    /// | Diamond | 12 months | 20000      |
    #[must_use]
    pub fn standard() -> Self {
        Self {
            packages: vec![
                Package {
                    name: "Silver".to_owned(),
                    duration_months: 1,
                    price: Decimal::new(2000, 0),
                },
                Package {
                    name: "Gold".to_owned(),
                    duration_months: 3,
                    price: Decimal::new(5000, 0),
                },
                Package {
                    name: "Diamond".to_owned(),
                    duration_months: 12,
                    price: Decimal::new(20000, 0),
                },
            ],
        }
    }

    /// Builds a catalog from an explicit package list.
    #[must_use]
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    /// Looks up a package by its exact name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownPackage`] if no package with that name
    /// exists. Unknown names are rejected eagerly; the caller must surface a
    /// validation message instead of persisting a member without an end date.
    pub fn lookup(&self, name: &str) -> Result<&Package> {
        self.packages
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| CoreError::UnknownPackage(name.to_owned()))
    }

    /// Returns all packages in catalog order.
    #[must_use]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_contents() {
        let catalog = PackageCatalog::standard();
        assert_eq!(catalog.packages().len(), 3);

        let silver = catalog.lookup("Silver").unwrap();
        assert_eq!(silver.duration_months, 1);
        assert_eq!(silver.price, Decimal::new(2000, 0));

        let gold = catalog.lookup("Gold").unwrap();
        assert_eq!(gold.duration_months, 3);
        assert_eq!(gold.price, Decimal::new(5000, 0));

        let diamond = catalog.lookup("Diamond").unwrap();
        assert_eq!(diamond.duration_months, 12);
        assert_eq!(diamond.price, Decimal::new(20000, 0));
    }

    #[test]
    fn test_lookup_unknown_package_rejected() {
        let catalog = PackageCatalog::standard();
        let result = catalog.lookup("Platinum");
        assert!(matches!(result.unwrap_err(), CoreError::UnknownPackage(_)));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let catalog = PackageCatalog::standard();
        assert!(catalog.lookup("gold").is_err());
        assert!(catalog.lookup("GOLD").is_err());
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = PackageCatalog::new(vec![Package {
            name: "Trial".to_owned(),
            duration_months: 1,
            price: Decimal::ZERO,
        }]);
        assert!(catalog.lookup("Trial").is_ok());
        assert!(catalog.lookup("Silver").is_err());
    }

    #[test]
    fn test_catalog_serialization_roundtrip() {
        let catalog = PackageCatalog::standard();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: PackageCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.packages(), catalog.packages());
    }
}
