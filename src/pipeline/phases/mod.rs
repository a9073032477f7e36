// Pipeline phases, in execution order

#[path = "01_resolve.rs"]
pub mod resolve;
#[path = "02_prepare.rs"]
pub mod prepare;
#[path = "03_link.rs"]
pub mod link;
#[path = "04_bundle.rs"]
pub mod bundle;

pub use bundle::BundlePhase;
pub use link::LinkPhase;
pub use prepare::PreparePhase;
pub use resolve::ResolvePhase;
