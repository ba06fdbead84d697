pub mod domain;
pub mod error;
pub mod kube;
pub mod protocol;
