//! Named generators for table-level model options.
//!
//! Every registered provider is asked for one option line per table, in
//! registration order. Returning `None` leaves the option out.

use autodefine_core::{ColumnDescription, Dialect, GeneratorOptions, TimestampField};

/// Inputs handed to an option provider for one table.
#[derive(Debug, Clone, Copy)]
pub struct OptionRequest<'a> {
    pub table: &'a str,
    pub columns: &'a [ColumnDescription],
    pub options: &'a GeneratorOptions,
    /// One indentation level.
    pub spaces: &'a str,
    pub dialect: Dialect,
}

pub trait OptionProvider: Send + Sync {
    fn option(&self, request: &OptionRequest<'_>) -> Option<String>;
}

impl<F> OptionProvider for F
where
    F: Fn(&OptionRequest<'_>) -> Option<String> + Send + Sync,
{
    fn option(&self, request: &OptionRequest<'_>) -> Option<String> {
        self(request)
    }
}

/// Ordered set of named option providers.
#[derive(Default)]
pub struct OptionRegistry {
    providers: Vec<(String, Box<dyn OptionProvider>)>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `additional` provider.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("additional", additional_options);
        registry
    }

    /// Register `provider` under `name`, replacing any provider with the same
    /// name in place.
    pub fn register(&mut self, name: impl Into<String>, provider: impl OptionProvider + 'static) {
        let name = name.into();
        let provider: Box<dyn OptionProvider> = Box::new(provider);
        match self.providers.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = provider,
            None => self.providers.push((name, provider)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|(name, _)| name.as_str())
    }

    /// Option lines for one table, skipping providers that return `None`.
    pub fn render(&self, request: &OptionRequest<'_>) -> Vec<String> {
        self.providers
            .iter()
            .filter_map(|(_, provider)| provider.option(request))
            .collect()
    }
}

impl std::fmt::Debug for OptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// `timestamps`, managed column names and literal `extra` options from
/// [`autodefine_core::AdditionalOptions`].
pub fn additional_options(request: &OptionRequest<'_>) -> Option<String> {
    let additional = &request.options.additional;
    let mut lines = Vec::new();

    if let Some(timestamps) = additional.timestamps {
        lines.push(format!("timestamps: {timestamps}"));
    }
    for (key, field) in [
        ("createdAt", &additional.created_at),
        ("updatedAt", &additional.updated_at),
        ("deletedAt", &additional.deleted_at),
    ] {
        match field {
            Some(TimestampField::Named(name)) => lines.push(format!("{key}: '{name}'")),
            Some(TimestampField::Enabled(false)) => lines.push(format!("{key}: false")),
            Some(TimestampField::Enabled(true)) | None => {}
        }
    }
    for (key, value) in &additional.extra {
        lines.push(format!("{key}: {value}"));
    }

    if lines.is_empty() {
        return None;
    }
    Some(lines.join(&format!(",\n{0}{0}", request.spaces)))
}
