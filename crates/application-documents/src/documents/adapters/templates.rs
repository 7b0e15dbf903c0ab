use crate::documents::rendering::TemplatePathProvider;

/// Resolves template names to `/{prefix}/{name}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixedTemplatePaths {
    prefix: String,
    extension: String,
}

impl PrefixedTemplatePaths {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: "html".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

impl TemplatePathProvider for PrefixedTemplatePaths {
    fn template_path(&self, template: &str) -> String {
        let prefix = self.prefix.trim_matches('/');
        let extension = self.extension.trim_start_matches('.');
        if prefix.is_empty() {
            format!("/{template}.{extension}")
        } else {
            format!("/{prefix}/{template}.{extension}")
        }
    }
}
