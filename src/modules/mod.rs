//! Report modules, one per pipeline output format.
//!
//! | Key | Input | Data file |
//! |-----|-------|-----------|
//! | `tso500` | `MetricsOutput.tsv` | `multiqc_tso500` |
//! | `exomedepth` | `*_readCount.csv` | `multiqc_exomedepth` |
//! | `sambamba_chanjo` | `*.chanjo_txt` | `multiqc_sambamba_chanjo` |
//! | `sompy` | `*.stats.csv` | `multiqc_sompy` |
//!
//! Modules are independent of each other; [`all_modules`] returns fresh
//! instances in a fixed order.

pub mod coverage;
pub mod exomedepth;
pub mod sompy;
pub mod tso500;

use crate::report::MetricsModule;

pub use coverage::CoverageModule;
pub use exomedepth::ExomeDepthModule;
pub use sompy::SompyModule;
pub use tso500::Tso500Module;

/// Project page shared by all modules
pub const PLUGIN_HREF: &str = "https://github.com/moka-guys/multiqc_plugins";

/// Fresh instances of every module, in report order
#[must_use]
pub fn all_modules() -> Vec<Box<dyn MetricsModule>> {
    vec![
        Box::new(Tso500Module::new()),
        Box::new(ExomeDepthModule::new()),
        Box::new(CoverageModule::new()),
        Box::new(SompyModule::new()),
    ]
}

/// Fresh instance of the module with `key`
#[must_use]
pub fn module_by_key(key: &str) -> Option<Box<dyn MetricsModule>> {
    all_modules().into_iter().find(|m| m.key() == key)
}

/// Keys of all known modules
#[must_use]
pub fn module_keys() -> Vec<&'static str> {
    all_modules().iter().map(|m| m.key()).collect()
}
