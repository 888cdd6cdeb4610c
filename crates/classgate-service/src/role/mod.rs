//! Role promotion after enrollment grants, and its repair job.

pub mod promotion;
pub mod reconciler;

pub use promotion::RolePromotion;
pub use reconciler::{ReconcileReport, RoleReconciler};
