//! Analytic steering: shortest bounded-curvature and bounded-sharpness
//! paths between planar poses, lowered to control primitives and
//! sampled at a fixed arc-length discretisation.

pub mod circle;
pub mod configuration;
pub mod paths;
pub mod trajectory;

pub(crate) mod hc_cc;
pub(crate) mod words;

pub mod dubins;
pub mod reeds_shepp;

pub mod cc00_dubins;
pub mod cc0pm_dubins;
pub mod ccpm0_dubins;
pub mod ccpmpm_dubins;
pub mod cc_dubins;

pub mod cc00_rs;
pub mod hc00_rs;
pub mod hc0pm_rs;
pub mod hcpm0_rs;
pub mod hcpmpm_rs;
pub mod hc_rs;

pub use cc00_dubins::Cc00DubinsStateSpace;
pub use cc00_rs::Cc00ReedsSheppStateSpace;
pub use cc0pm_dubins::Cc0pmDubinsStateSpace;
pub use cc_dubins::CcDubinsStateSpace;
pub use ccpm0_dubins::Ccpm0DubinsStateSpace;
pub use ccpmpm_dubins::CcpmpmDubinsStateSpace;
pub use dubins::DubinsStateSpace;
pub use hc00_rs::Hc00ReedsSheppStateSpace;
pub use hc0pm_rs::Hc0pmReedsSheppStateSpace;
pub use hc_rs::HcReedsSheppStateSpace;
pub use hcpm0_rs::Hcpm0ReedsSheppStateSpace;
pub use hcpmpm_rs::HcpmpmReedsSheppStateSpace;
pub use reeds_shepp::ReedsSheppStateSpace;
