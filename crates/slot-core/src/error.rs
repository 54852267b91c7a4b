use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("no such slot \"{name}\"{}", did_you_mean(.suggestion))]
    NotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("slot \"{0}\" exists (use --force)")]
    Exists(String),

    #[error("duplicate slot \"{0}\" in store file")]
    DuplicateSlot(String),

    #[error("invalid slot name \"{0}\": must be non-empty and contain no whitespace")]
    InvalidName(String),

    #[error("invalid bindings: {}", .0.join("; "))]
    InvalidBindings(Vec<String>),

    #[error("missing template variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("template execution error: {0}")]
    TemplateRender(String),

    #[error("unsupported shell \"{0}\" (supported: bash, zsh)")]
    UnsupportedShell(String),

    #[error("invalid store path \"{path}\": {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("home directory not found: set HOME or pass --file")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SlotError>;

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(": did you mean \"{s}\"?"),
        None => String::new(),
    }
}
