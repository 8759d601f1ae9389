//! Fill-blanks merging.
//!
//! `higher.fill_blanks(&lower)` keeps every non-blank value of `higher` and
//! takes `lower`'s value wherever `higher` is blank:
//!
//! - strings: `higher` unless blank (empty or whitespace);
//! - optional strings: `higher` unless `None` or blank;
//! - lists and sets: `higher` as a whole unless empty;
//! - [`Flag`]s: the first explicitly set value.
//!
//! Merging a value with itself returns an equal value.

use std::collections::BTreeSet;

use crate::model::{
    is_blank, CentralPublisherConfig, Credentials, DeveloperInfo, Flag, LicenseInfo, ProjectInfo,
    PublishingOptions, ScmInfo, SigningConfig,
};

/// Merge that only fills gaps in `self` from a lower-precedence value.
pub trait FillBlanks {
    fn fill_blanks(&self, lower: &Self) -> Self;
}

/// Merge a precedence-ordered sequence (highest first) into one value.
pub fn merge_all<'a, T>(layers: impl IntoIterator<Item = &'a T>) -> T
where
    T: FillBlanks + Default + 'a,
{
    layers
        .into_iter()
        .fold(T::default(), |acc, layer| acc.fill_blanks(layer))
}

impl FillBlanks for String {
    fn fill_blanks(&self, lower: &Self) -> Self {
        if is_blank(self) {
            lower.clone()
        } else {
            self.clone()
        }
    }
}

impl FillBlanks for Option<String> {
    fn fill_blanks(&self, lower: &Self) -> Self {
        match self {
            Some(value) if !is_blank(value) => Some(value.clone()),
            _ => lower.clone(),
        }
    }
}

impl<T: Clone> FillBlanks for Vec<T> {
    fn fill_blanks(&self, lower: &Self) -> Self {
        if self.is_empty() {
            lower.clone()
        } else {
            self.clone()
        }
    }
}

impl<T: Clone + Ord> FillBlanks for BTreeSet<T> {
    fn fill_blanks(&self, lower: &Self) -> Self {
        if self.is_empty() {
            lower.clone()
        } else {
            self.clone()
        }
    }
}

impl FillBlanks for Flag {
    fn fill_blanks(&self, lower: &Self) -> Self {
        self.or(*lower)
    }
}

impl FillBlanks for Credentials {
    fn fill_blanks(&self, lower: &Self) -> Self {
        Self {
            username: self.username.fill_blanks(&lower.username),
            password: self.password.fill_blanks(&lower.password),
        }
    }
}

impl FillBlanks for LicenseInfo {
    fn fill_blanks(&self, lower: &Self) -> Self {
        Self {
            name: self.name.fill_blanks(&lower.name),
            url: self.url.fill_blanks(&lower.url),
            distribution: self.distribution.fill_blanks(&lower.distribution),
            comments: self.comments.fill_blanks(&lower.comments),
        }
    }
}

impl FillBlanks for ScmInfo {
    fn fill_blanks(&self, lower: &Self) -> Self {
        Self {
            url: self.url.fill_blanks(&lower.url),
            connection: self.connection.fill_blanks(&lower.connection),
            developer_connection: self
                .developer_connection
                .fill_blanks(&lower.developer_connection),
        }
    }
}

impl FillBlanks for ProjectInfo {
    fn fill_blanks(&self, lower: &Self) -> Self {
        Self {
            name: self.name.fill_blanks(&lower.name),
            description: self.description.fill_blanks(&lower.description),
            url: self.url.fill_blanks(&lower.url),
            license: self.license.fill_blanks(&lower.license),
            developers: fill_developers(&self.developers, &lower.developers),
            scm: self.scm.fill_blanks(&lower.scm),
        }
    }
}

/// The first non-empty developer list wins as a whole; individual developer
/// fields are never mixed across sources.
fn fill_developers(higher: &[DeveloperInfo], lower: &[DeveloperInfo]) -> Vec<DeveloperInfo> {
    if higher.is_empty() {
        lower.to_vec()
    } else {
        higher.to_vec()
    }
}

impl FillBlanks for SigningConfig {
    fn fill_blanks(&self, lower: &Self) -> Self {
        Self {
            key: self.key.fill_blanks(&lower.key),
            key_id: self.key_id.fill_blanks(&lower.key_id),
            password: self.password.fill_blanks(&lower.password),
            secret_key_ring_file: self
                .secret_key_ring_file
                .fill_blanks(&lower.secret_key_ring_file),
        }
    }
}

impl FillBlanks for PublishingOptions {
    fn fill_blanks(&self, lower: &Self) -> Self {
        Self {
            auto_publish: self.auto_publish.fill_blanks(&lower.auto_publish),
            aggregation: self.aggregation.fill_blanks(&lower.aggregation),
            dry_run: self.dry_run.fill_blanks(&lower.dry_run),
            exclude_modules: self.exclude_modules.fill_blanks(&lower.exclude_modules),
        }
    }
}

impl FillBlanks for CentralPublisherConfig {
    fn fill_blanks(&self, lower: &Self) -> Self {
        Self {
            credentials: self.credentials.fill_blanks(&lower.credentials),
            project_info: self.project_info.fill_blanks(&lower.project_info),
            signing: self.signing.fill_blanks(&lower.signing),
            publishing: self.publishing.fill_blanks(&lower.publishing),
        }
    }
}
