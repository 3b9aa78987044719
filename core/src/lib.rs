#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Classification of callable genomic sites.
//!
//! This serves as the core library implementation for the `callable` CLI, but can also be used as
//! a free-standing library. Given a position-ordered stream of variant site records, repeat-region
//! masks, and per-site depth bounds, every position of a chromosome is assigned one of four
//! callability codes consumed by downstream population-genetic analyses.
//!
//! # Overview
//!
//! A [`Classifier`] combines a repeat [`Mask`], an ancestral-repeat [`Mask`], and run-wide
//! [`DepthBounds`] into a pure decision function over [`Site`] records. The resulting
//! [`SiteClass`] symbols are rendered with the line-wrapped [`fasta`] writer.
//!
//! # Example
//!
//! ```
//! use callable_core::{Classifier, DepthBounds, Mask, Site, SiteClass};
//!
//! let repeats = Mask::from_regions([(100, 200)]);
//! let bounds = DepthBounds::new(44.0, 2.0).unwrap();
//! let classifier = Classifier::new(repeats, Mask::default(), bounds, 10.0);
//!
//! // A repeat-free site with a locus mean depth of 45 is callable
//! let site = Site::new(50, false, Some(450));
//! assert_eq!(classifier.classify(&site), SiteClass::Callable);
//! ```

pub mod classify;
pub use classify::{Classifier, SiteClass};

pub mod depth;
pub use depth::DepthBounds;

pub mod fasta;

pub mod input;
pub use input::Input;

pub mod mask;
pub use mask::Mask;

pub mod site;
pub use site::Site;
