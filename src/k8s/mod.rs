pub mod client;
pub mod lister;
pub mod types;

pub use client::{KubePodSource, PodSource};
pub use lister::{app_selector, PodLister};
pub use types::PodInfo;
