//! Core module: tree model, controller and everything the front ends share

pub mod catalog;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod error;
pub mod export;
pub mod label;
pub mod layout;
pub mod models;
pub mod reference;
pub mod transition;

pub use controller::{RenderFrame, TreeViewController, ViewSettings};
pub use models::{NodeId, Tree, TreeNode, ViewId};
