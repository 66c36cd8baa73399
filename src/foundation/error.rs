/// Convenience result type used across the crate.
pub type CardResult<T> = Result<T, CardError>;

/// Error taxonomy for factory resolution, grid geometry and compositing.
///
/// Every message starts with a stable four-digit code so downstream tooling can
/// classify failures without parsing the rest of the text. [`CardError::code`]
/// returns the same code.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// A file could not be opened or read.
    #[error("0001 {op} {path}: {source}")]
    Io {
        /// Operation that failed (`open` or `read`).
        op: &'static str,
        /// Path or URI being accessed.
        path: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A document could not be decoded into the expected structure.
    #[error("0002 {message} when opening {path}")]
    Unmarshal {
        /// Source document.
        path: String,
        /// Decoder message, including line and column when known.
        message: String,
    },

    /// The root factory declares no frames.
    #[error("0003 No frames declared in {path}")]
    NoFrames {
        /// Root factory path.
        path: String,
    },

    /// Include nesting went deeper than the allowed depth.
    #[error(
        "0004 recursive set initialisation file detected, the maximum dotpath depth of {max} has been reached"
    )]
    IncludeDepth {
        /// Maximum nesting depth.
        max: usize,
    },

    /// The same alias was bound twice in one run.
    #[error("0006 the alias {alias} is repeated, every alias is required to be unique")]
    DuplicateAlias {
        /// Repeated alias.
        alias: String,
    },

    /// Source bytes are not UTF-8 text.
    #[error("0028 {message} for extracting the yaml bytes from {path}")]
    NonUtf8 {
        /// Source document.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// A grid range ends before it starts, or a pixel rectangle is empty.
    #[error(
        "0045 The grid dimensions of {expr} are invalid, received coordinates of ({},{})-({},{})",
        .coords.0, .coords.1, .coords.2, .coords.3
    )]
    InvalidRange {
        /// Expression as written.
        expr: String,
        /// Raw start and end coordinates.
        coords: (u64, u64, u64, u64),
    },

    /// The expression matches no grid notation and no registered alias.
    #[error("0046 {expr} is not a valid grid alias")]
    InvalidGridAlias {
        /// Expression as written.
        expr: String,
    },

    /// A resolved area extends past the canvas.
    #[error(
        "0047 Area outside of image bounds of ({width},{height}), received an x value of {x} and a y value of {y}"
    )]
    OutOfBounds {
        /// Canvas width.
        width: u32,
        /// Canvas height.
        height: u32,
        /// Exclusive right edge of the area.
        x: u64,
        /// Exclusive bottom edge of the area.
        y: u64,
    },

    /// A frame carries zero or several canvas option widgets.
    #[error("0061 {count} configs have been assigned, only assign one config")]
    CanvasOptions {
        /// Number of canvas option widgets found.
        count: usize,
    },

    /// Wrapped lower-level error from dependencies.
    #[error("0100 {0:#}")]
    Other(#[from] anyhow::Error),

    /// An include entry is malformed.
    #[error("0101 invalid include in {source_ref}: {message}")]
    Include {
        /// Document (and line) holding the entry.
        source_ref: String,
        /// What is wrong with it.
        message: String,
    },

    /// A frame outside the declared frame range was requested.
    #[error("0102 frame {frame} was requested but {frames} frames are declared")]
    FrameIndex {
        /// Requested frame.
        frame: usize,
        /// Declared frame count.
        frames: usize,
    },

    /// A generate rule is malformed.
    #[error("0103 invalid generate rule in {source_ref}: {message}")]
    Generate {
        /// Document (and line) holding the rule.
        source_ref: String,
        /// What is wrong with it.
        message: String,
    },

    /// A create or generate target names no include.
    #[error("0104 target {target} in {source_ref} does not match any include")]
    UnknownTarget {
        /// Document (and line) holding the target.
        source_ref: String,
        /// Target as written.
        target: String,
    },

    /// An argument binding names an argument the factory does not declare.
    #[error("0105 {name} is not an argument declared by {factory}")]
    UndeclaredArgument {
        /// Factory receiving the binding.
        factory: String,
        /// Argument name.
        name: String,
    },

    /// A segment map file is malformed.
    #[error("0110 invalid segment map {path}: {message}")]
    Flatmap {
        /// Segment map path.
        path: String,
        /// What is wrong with it.
        message: String,
    },

    /// A segment definition or lookup is invalid.
    #[error("0111 invalid segment {name}: {message}")]
    Segment {
        /// Segment name or lookup target.
        name: String,
        /// What is wrong with it.
        message: String,
    },

    /// A canvas cannot be spliced with the requested cell size.
    #[error("0112 cannot splice canvas: {0}")]
    Splice(String),

    /// An art key could not be resolved.
    #[error("0120 art key {expr}: {message}")]
    ArtKey {
        /// Key expression as written.
        expr: String,
        /// What went wrong.
        message: String,
    },

    /// The canvas configuration is unusable.
    #[error("0130 invalid canvas configuration: {0}")]
    Canvas(String),

    /// Several independent failures, reported together.
    #[error("{}", join_lines(.0))]
    Multiple(Vec<CardError>),
}

impl CardError {
    /// Build a [`CardError::Io`] value.
    pub fn io(op: &'static str, path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Build a [`CardError::Unmarshal`] value.
    pub fn unmarshal(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unmarshal {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Build a [`CardError::InvalidGridAlias`] value.
    pub fn invalid_grid_alias(expr: impl Into<String>) -> Self {
        Self::InvalidGridAlias { expr: expr.into() }
    }

    /// Build a [`CardError::DuplicateAlias`] value.
    pub fn duplicate_alias(alias: impl Into<String>) -> Self {
        Self::DuplicateAlias {
            alias: alias.into(),
        }
    }

    /// Build a [`CardError::Include`] value.
    pub fn include(source_ref: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Include {
            source_ref: source_ref.into(),
            message: message.into(),
        }
    }

    /// Build a [`CardError::Generate`] value.
    pub fn generate(source_ref: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generate {
            source_ref: source_ref.into(),
            message: message.into(),
        }
    }

    /// Build a [`CardError::Flatmap`] value.
    pub fn flatmap(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Flatmap {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Build a [`CardError::Segment`] value.
    pub fn segment(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Segment {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Build a [`CardError::ArtKey`] value.
    pub fn art_key(expr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArtKey {
            expr: expr.into(),
            message: message.into(),
        }
    }

    /// Build a [`CardError::Canvas`] value.
    pub fn canvas(msg: impl Into<String>) -> Self {
        Self::Canvas(msg.into())
    }

    /// Collapse collected errors: `None` when empty, the error itself when single.
    pub fn collect(mut errors: Vec<CardError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Stable four-digit code of this error.
    ///
    /// [`CardError::Multiple`] reports the code of its first error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "0001",
            Self::Unmarshal { .. } => "0002",
            Self::NoFrames { .. } => "0003",
            Self::IncludeDepth { .. } => "0004",
            Self::DuplicateAlias { .. } => "0006",
            Self::NonUtf8 { .. } => "0028",
            Self::InvalidRange { .. } => "0045",
            Self::InvalidGridAlias { .. } => "0046",
            Self::OutOfBounds { .. } => "0047",
            Self::CanvasOptions { .. } => "0061",
            Self::Other(_) => "0100",
            Self::Include { .. } => "0101",
            Self::FrameIndex { .. } => "0102",
            Self::Generate { .. } => "0103",
            Self::UnknownTarget { .. } => "0104",
            Self::UndeclaredArgument { .. } => "0105",
            Self::Flatmap { .. } => "0110",
            Self::Segment { .. } => "0111",
            Self::Splice(_) => "0112",
            Self::ArtKey { .. } => "0120",
            Self::Canvas(_) => "0130",
            Self::Multiple(errors) => errors.first().map_or("0000", CardError::code),
        }
    }
}

fn join_lines(errors: &[CardError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
