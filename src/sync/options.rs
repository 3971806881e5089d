/// Which vector namespaces a run writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamespaceSelection {
    /// Primary namespace only.
    Primary,
    /// Primary plus the dining namespace for classified sessions.
    #[default]
    Both,
}

/// Options for a sync run.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Regenerate every entity, ignoring cache validity.
    pub force_refresh: bool,
    /// Batch size override; `None` uses the configured default.
    pub batch_size: Option<usize>,
    /// Apply the text quality gate before generation.
    pub include_quality_check: bool,
    /// Namespace routing.
    pub namespaces: NamespaceSelection,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force_refresh: false,
            batch_size: None,
            include_quality_check: true,
            namespaces: NamespaceSelection::Both,
        }
    }
}

impl SyncOptions {
    /// Forces regeneration for every entity.
    pub fn forced() -> Self {
        Self {
            force_refresh: true,
            ..Default::default()
        }
    }

    /// Sets the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Restricts writes to the primary namespace.
    pub fn primary_only(mut self) -> Self {
        self.namespaces = NamespaceSelection::Primary;
        self
    }
}
