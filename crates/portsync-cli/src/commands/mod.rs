pub mod inspect;
pub mod reconcile;
