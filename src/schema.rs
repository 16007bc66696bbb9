//! Selectable column derivation and validation.

use airdash_cli::MissingColumnPolicy;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::{info, warn};

use crate::dataset::{ColumnKind, Dataset};

/// Listing headers offered by the fixed column policy, in display order.
pub const LISTING_COLUMNS: [&str; 28] = [
    "id",
    "log_price",
    "property_type",
    "room_type",
    "amenities",
    "accommodates",
    "bathrooms",
    "bed_type",
    "cancellation_policy",
    "cleaning_fee",
    "city",
    "description",
    "first_review",
    "host_has_profile_pic",
    "host_identity_verified",
    "host_response_rate",
    "host_since",
    "instant_bookable",
    "last_review",
    "latitude",
    "longitude",
    "name",
    "neighbourhood",
    "number_of_reviews",
    "review_scores_rating",
    "zipcode",
    "bedrooms",
    "beds",
];

/// Columns hidden by the denylist policy.
pub const DEFAULT_DENYLIST: [&str; 5] = [
    "amenities",
    "first_review",
    "host_since",
    "last_review",
    "longitude",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPolicy {
    /// Explicit ordered list of names.
    Fixed(Vec<String>),
    /// Every dataset column in file order except these.
    Denylist(Vec<String>),
}

impl ColumnPolicy {
    pub fn default_fixed() -> Self {
        Self::Fixed(LISTING_COLUMNS.iter().map(|s| s.to_string()).collect())
    }

    pub fn default_denylist() -> Self {
        Self::Denylist(DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect())
    }
}

/// Ordered selectable column names. Fixed lists are returned as given, even
/// when the dataset lacks some of the names.
pub fn derive_selectable_columns(dataset: &Dataset, policy: &ColumnPolicy) -> Vec<String> {
    match policy {
        ColumnPolicy::Fixed(names) => names.clone(),
        ColumnPolicy::Denylist(denied) => dataset
            .columns()
            .iter()
            .filter(|c| !denied.contains(&c.name))
            .map(|c| c.name.clone())
            .collect(),
    }
}

/// A selectable column. `kind` is `None` when the dataset does not have it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableColumn {
    pub name: String,
    pub kind: Option<ColumnKind>,
}

/// The validated selectable columns the option lists are built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectableSchema {
    columns: Vec<SelectableColumn>,
}

impl SelectableSchema {
    pub fn derive(
        dataset: &Dataset,
        policy: &ColumnPolicy,
        missing: MissingColumnPolicy,
    ) -> Result<Self> {
        let names = derive_selectable_columns(dataset, policy);
        let absent: Vec<&str> = names
            .iter()
            .filter(|n| !dataset.has_column(n))
            .map(String::as_str)
            .collect();

        if !absent.is_empty() {
            match missing {
                MissingColumnPolicy::Fail => {
                    return Err(eyre!(
                        "Selectable columns not found in the file: {}",
                        absent.join(", ")
                    ));
                }
                MissingColumnPolicy::Skip => {
                    warn!(missing = %absent.join(", "), "dropping selectable columns absent from the file");
                }
                MissingColumnPolicy::Keep => {
                    warn!(missing = %absent.join(", "), "keeping selectable columns absent from the file");
                }
            }
        }

        let columns: Vec<SelectableColumn> = names
            .into_iter()
            .filter_map(|name| {
                let kind = dataset.descriptor(&name).map(|d| d.kind);
                if kind.is_none() && missing == MissingColumnPolicy::Skip {
                    return None;
                }
                Some(SelectableColumn { name, kind })
            })
            .collect();

        info!(
            selectable = columns.len(),
            policy = missing.as_str(),
            "selectable schema derived"
        );
        Ok(Self { columns })
    }

    pub fn from_columns(columns: Vec<SelectableColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[SelectableColumn] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Names whose kind matches. Columns missing from the dataset never match.
    pub fn names_of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(move |c| c.kind == Some(kind))
            .map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
