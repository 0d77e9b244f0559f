//! Kubeward Safety - risk classification for cluster commands.
//!
//! This crate provides:
//! - A deterministic, infallible two-tier pattern classifier
//! - An advisory [`SafetyAnalyzer`] seam for deeper external analysis
//!
//! # Fail-open policy
//!
//! The local classifier cannot error: anything it does not recognize
//! degrades to [`RiskLevel::Safe`](kubeward_core::RiskLevel::Safe). The
//! advisory analyzer is strictly additive: if it is unreachable or errors,
//! the local pattern result stands. A request is never blocked because the
//! deeper analysis failed. (The approval gateway takes the opposite default:
//! it fails *closed* on timeout.)

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod analyzer;
mod assessment;
mod classifier;

pub use analyzer::{AnalyzerError, SafetyAnalyzer, assess_with_analyzer};
pub use assessment::{AffectedScope, CommandCategory, RiskAssessment};
pub use classifier::RiskClassifier;
