mod catalog;
mod context_doc;
mod dispatch;
mod schemas;

pub use dispatch::ArtifactLensService;
