//! Collaborators and configuration shared by every lowering in a run.

use opgen_common::{DefaultNamer, DescriptionModel, Namer, Settings, StandardModel};

/// Settings plus the external services the pipeline consults.
#[derive(Debug)]
pub struct LoweringContext {
    settings: Settings,
    model: Box<dyn DescriptionModel>,
    namer: Box<dyn Namer>,
}

impl LoweringContext {
    /// A context using the standard description model and default casing.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            model: Box::new(StandardModel),
            namer: Box::new(DefaultNamer),
        }
    }

    /// Replace the description model.
    pub fn with_model(mut self, model: impl DescriptionModel + 'static) -> Self {
        self.model = Box::new(model);
        self
    }

    /// Replace the naming service.
    pub fn with_namer(mut self, namer: impl Namer + 'static) -> Self {
        self.namer = Box::new(namer);
        self
    }

    /// Generator settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Description model.
    pub fn model(&self) -> &dyn DescriptionModel {
        self.model.as_ref()
    }

    /// Naming service.
    pub fn namer(&self) -> &dyn Namer {
        self.namer.as_ref()
    }
}

impl Default for LoweringContext {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
