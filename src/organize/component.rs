//! Component extraction candidates.
//!
//! Not implemented yet: the analyzer always reports zero candidates. It stays
//! registered so the module can be toggled and shows up in summaries.

use crate::tree::Document;

use super::{Analyzer, Candidates, Module, ModuleResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct ComponentAnalyzer;

impl Analyzer for ComponentAnalyzer {
    fn module(&self) -> Module {
        Module::Component
    }

    fn analyze(&self, _document: &Document) -> ModuleResult {
        ModuleResult::new(Module::Component, Candidates::Component(Vec::new()))
    }
}
