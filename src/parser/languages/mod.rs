//! Language-specific tree-sitter configurations.
//!
//! Each language module provides:
//! - Construct queries, in priority order
//! - Regex fallbacks for construct names
//! - A `LanguageProvider` implementation

pub mod javascript;
pub mod python;
pub mod typescript;

use super::treesitter::LanguageProvider;
use super::LanguageRegistry;

/// All language providers compiled into this binary.
pub fn providers() -> Vec<Box<dyn LanguageProvider>> {
    vec![
        Box::new(python::PythonProvider),
        Box::new(javascript::JavaScriptProvider),
        Box::new(typescript::TypeScriptProvider),
    ]
}

/// Register all available language providers.
pub fn register_all(registry: &mut LanguageRegistry) {
    for provider in providers() {
        registry.register_provider(provider.as_ref());
    }
}
