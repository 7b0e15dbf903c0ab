//! Concrete collaborators used by the service binary.

mod pdf;
mod templates;
mod view;

pub use pdf::CommandPdfGenerator;
pub use templates::PrefixedTemplatePaths;
pub use view::FileViewGenerator;
