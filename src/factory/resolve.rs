use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::factory::frame::{FrameWalker, FrameWidgets};
use crate::factory::loader::{ByteLoader, join_uri, parent_dir};
use crate::factory::model::{Document, Factory, decode_document};
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::lines::{SourceKey, SourceLines};
use crate::grid::alias::AliasRegistry;

/// Deepest include nesting accepted below the root factory.
pub const MAX_INCLUDE_DEPTH: usize = 30;

/// Loaded factory with its includes resolved.
#[derive(Clone, Debug)]
pub(crate) struct FactoryNode {
    pub(crate) uri: String,
    pub(crate) source: SourceKey,
    pub(crate) factory: Arc<Factory>,
    pub(crate) children: Vec<ChildNode>,
}

#[derive(Clone, Debug)]
pub(crate) struct ChildNode {
    pub(crate) name: String,
    pub(crate) kind: ChildKind,
}

#[derive(Clone, Debug)]
pub(crate) enum ChildKind {
    Widget(Arc<Map<String, Value>>),
    Factory(Box<FactoryNode>),
}

#[derive(Clone, Debug)]
enum Loaded {
    Factory(Arc<Factory>),
    Widget(Arc<Map<String, Value>>),
}

/// A root factory with every include loaded.
///
/// Documents are never mutated after loading; each call to
/// [`ResolvedConfig::frame_widgets`] builds fresh instructions.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    path: String,
    frames: usize,
    root: FactoryNode,
    sources: SourceLines,
}

impl ResolvedConfig {
    /// Number of frames, one per root `create` entry.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Path the root factory was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Every document imported while resolving.
    pub fn sources(&self) -> &SourceLines {
        &self.sources
    }

    #[tracing::instrument(skip(self, registry), fields(path = %self.path))]
    /// Widgets of `frame` in compositing order.
    ///
    /// Each widget's `grid.alias` is bound to its `grid.location` in `registry`.
    pub fn frame_widgets(&self, frame: usize, registry: &AliasRegistry) -> CardResult<FrameWidgets> {
        if frame >= self.frames {
            return Err(CardError::FrameIndex {
                frame,
                frames: self.frames,
            });
        }

        let widgets = FrameWidgets::new(frame, FrameWalker::new(&self.sources, frame).walk(&self.root)?);
        for widget in &widgets {
            if let Some(alias) = widget.grid_alias() {
                let location = widget.grid_location().unwrap_or_default();
                if !registry.try_insert(alias, location) {
                    return Err(CardError::duplicate_alias(alias));
                }
            }
        }
        Ok(widgets)
    }
}

#[tracing::instrument(skip(loader))]
/// Load the factory at `path` and everything it includes.
///
/// Relative include URIs resolve against `base_dir`, or the root file's
/// directory when none is given. Every frame is generated once against a
/// scratch registry so alias clashes and bad rules fail here.
pub fn resolve_factory(
    path: &str,
    base_dir: Option<&Path>,
    loader: &dyn ByteLoader,
) -> CardResult<ResolvedConfig> {
    let base_dir = base_dir.map_or_else(|| parent_dir(path).to_path_buf(), Path::to_path_buf);
    let mut resolver = Resolver {
        loader,
        base_dir,
        sources: SourceLines::new(),
        documents: HashMap::new(),
    };

    let (source, loaded) = resolver.load(path)?;
    let factory = match loaded {
        Loaded::Factory(factory) => factory,
        Loaded::Widget(_) => Arc::new(Factory::default()),
    };
    if factory.create.is_empty() {
        return Err(CardError::NoFrames {
            path: path.to_string(),
        });
    }
    let frames = factory.create.len();
    let root = resolver.node(path.to_string(), source, factory, MAX_INCLUDE_DEPTH)?;

    let config = ResolvedConfig {
        path: path.to_string(),
        frames,
        root,
        sources: resolver.sources,
    };
    for frame in 0..frames {
        config.frame_widgets(frame, &AliasRegistry::new())?;
    }
    tracing::debug!(frames, documents = config.sources.len(), "factory resolved");
    Ok(config)
}

struct Resolver<'a> {
    loader: &'a dyn ByteLoader,
    base_dir: PathBuf,
    sources: SourceLines,
    documents: HashMap<String, Loaded>,
}

impl Resolver<'_> {
    fn load(&mut self, uri: &str) -> CardResult<(SourceKey, Loaded)> {
        let bytes = self.loader.load_bytes(uri)?;
        let (key, _) = self.sources.record(uri, &bytes);
        if let Some(loaded) = self.documents.get(&key.digest) {
            tracing::debug!(uri, "document cache hit");
            return Ok((key, loaded.clone()));
        }

        let loaded = match decode_document(uri, &bytes)? {
            Document::Factory(factory) => Loaded::Factory(Arc::new(factory)),
            Document::Widget(data) => Loaded::Widget(Arc::new(data)),
        };
        self.documents.insert(key.digest.clone(), loaded.clone());
        Ok((key, loaded))
    }

    fn node(
        &mut self,
        uri: String,
        source: SourceKey,
        factory: Arc<Factory>,
        depth: usize,
    ) -> CardResult<FactoryNode> {
        let mut names = HashSet::new();
        let mut children = Vec::with_capacity(factory.include.len());

        for include in &factory.include {
            let needle = if include.name.is_empty() {
                include.uri.as_str()
            } else {
                include.name.as_str()
            };
            let here = || self.sources.describe(&source, needle);

            if include.name.is_empty() || include.name.contains(['.', '[', ']']) {
                return Err(CardError::include(
                    here(),
                    format!(
                        "name {:?} must be non-empty and free of '.', '[' and ']'",
                        include.name
                    ),
                ));
            }
            if include.uri.trim().is_empty() {
                return Err(CardError::include(
                    here(),
                    format!("{} has no uri", include.name),
                ));
            }
            if !names.insert(include.name.clone()) {
                return Err(CardError::duplicate_alias(&include.name));
            }
            if depth == 0 {
                return Err(CardError::IncludeDepth {
                    max: MAX_INCLUDE_DEPTH,
                });
            }

            let child_uri = join_uri(&self.base_dir, &include.uri);
            tracing::debug!(parent = %uri, include = %child_uri, depth, "loading include");
            let (key, loaded) = self.load(&child_uri)?;
            let kind = match loaded {
                Loaded::Widget(data) => ChildKind::Widget(data),
                Loaded::Factory(inner) => {
                    ChildKind::Factory(Box::new(self.node(child_uri, key, inner, depth - 1)?))
                }
            };
            children.push(ChildNode {
                name: include.name.clone(),
                kind,
            });
        }

        Ok(FactoryNode {
            uri,
            source,
            factory,
            children,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/factory/resolve.rs"]
mod tests;
