//! Insight Engine - automatic fact statements for a selection
//!
//! Each check looks at the projected map rows (plus the table they came
//! from) and either produces one statement or stays silent. Checks are
//! independent: a missing precondition for one never suppresses another.
//!
//! ## Built-in Checks
//!
//! - **Regional Analysis** - average inflation across selected regions
//! - **Geographic Pattern** - region with the highest average inflation
//! - **Trend Alert** - direction of the selected country's inflation
//! - **High Inflation Alert** - countries above the threshold
//! - **Deflation Alert** - countries with falling prices
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inflatrack_core::insights::{generate_insights, InsightContext};
//!
//! let rows = project(&dataset, 2022, &reference);
//! let ctx = InsightContext::new(&rows, &dataset, &reference, 2022);
//! for insight in generate_insights(&ctx) {
//!     println!("{}", insight);
//! }
//! ```

pub mod alerts;
pub mod engine;
pub mod regional;
pub mod trend;
pub mod types;

pub use alerts::{DeflationCheck, HighInflationCheck};
pub use engine::{
    generate_insights, InsightCheck, InsightContext, InsightEngine, HIGH_INFLATION_THRESHOLD,
};
pub use regional::{GeographicPatternCheck, RegionalAverageCheck};
pub use trend::CountryTrendCheck;
pub use types::{Insight, InsightKind, Severity, TrendDirection};
