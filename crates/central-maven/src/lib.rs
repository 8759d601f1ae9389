//! Maven publication layout and POM metadata.

pub mod pom;
pub mod strategy;

pub use pom::{parse_pom_metadata, render_pom_metadata, PomCoordinates, PomDocument};
pub use strategy::{select_strategy, Publication, PublicationStrategy};
